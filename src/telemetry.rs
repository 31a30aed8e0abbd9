use anyhow::{Context, Result};
use opentelemetry::{global, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{runtime, Resource};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub service_name: String,
    pub service_version: String,
    pub environment: String,
    pub otlp_endpoint: Option<String>,
    pub export_timeout: Duration,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: env!("CARGO_PKG_NAME").to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            environment: std::env::var("DEPLOYMENT_ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
            otlp_endpoint: std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT").ok(),
            export_timeout: Duration::from_secs(30),
        }
    }
}

/// Handle for graceful shutdown of the tracing pipeline.
pub struct TelemetryHandles {
    _config: TelemetryConfig,
}

impl TelemetryHandles {
    pub async fn shutdown(self) -> Result<()> {
        info!("Shutting down telemetry providers...");
        global::shutdown_tracer_provider();
        Ok(())
    }
}

/// Sets up the tracing subscriber and, when an OTLP endpoint is configured,
/// a batch span exporter. Console-only tracing in development.
pub async fn init_telemetry(config: Option<TelemetryConfig>) -> Result<TelemetryHandles> {
    let config = config.unwrap_or_default();

    let resource = Resource::new(vec![
        KeyValue::new("service.name", config.service_name.clone()),
        KeyValue::new("service.version", config.service_version.clone()),
        KeyValue::new("deployment.environment", config.environment.clone()),
    ]);

    if let Some(endpoint) = &config.otlp_endpoint {
        opentelemetry_otlp::new_pipeline()
            .tracing()
            .with_exporter(
                opentelemetry_otlp::new_exporter()
                    .tonic()
                    .with_endpoint(endpoint)
                    .with_timeout(config.export_timeout),
            )
            .with_trace_config(
                opentelemetry_sdk::trace::config()
                    .with_resource(resource)
                    .with_sampler(opentelemetry_sdk::trace::Sampler::AlwaysOn),
            )
            .install_batch(runtime::Tokio)
            .context("Failed to initialize OTLP tracer")?;

        info!("Distributed tracing initialized with OTLP exporter");
    } else {
        info!("No OTLP endpoint configured, using console-only tracing");
    }

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("{}=debug", env!("CARGO_CRATE_NAME")).into());

    Registry::default()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    info!(
        "Telemetry initialized for service: {} v{} in environment: {}",
        config.service_name, config.service_version, config.environment
    );
    Ok(TelemetryHandles { _config: config })
}
