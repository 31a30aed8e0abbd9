use anyhow::Context;
use dotenv::dotenv;
use tracing::info;

mod app;
mod app_state;
mod config;
mod db;
mod error;
mod middleware;
mod modules;
mod scheduling;
mod telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let env = config::init()?;
    let telemetry = telemetry::init_telemetry(None).await?;

    let pool = db::init_pool().await?;
    let state = app_state::AppState::new(pool, env.clone());
    let app = app::create_router(state);

    let addr = env.server_addr();
    info!("{} listening on {}", env.app.name, addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .await
        .context("Failed to serve application")?;

    telemetry.shutdown().await?;
    Ok(())
}
