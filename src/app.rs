use axum::{http::HeaderValue, middleware, routing::get, Json, Router};
use serde_json::json;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::{
    app_state::AppState,
    middleware::tracing::observability_middleware,
    modules::{
        admin::routes::admin_routes, customer::routes::customer_routes,
        media::routes::media_routes, public::routes::public_routes,
    },
};

pub fn create_router(state: AppState) -> Router {
    let static_dir = state.env.app.static_dir.to_string();
    let cors = cors_layer(&state.env.app.allowed_origins);

    Router::new()
        .route("/", get(hello))
        .route("/health", get(health_check))
        .merge(public_routes())
        .nest("/customer", customer_routes())
        .nest("/admin", admin_routes())
        .nest("/upload", media_routes())
        .nest_service(
            "/static",
            tower_http::services::ServeDir::new(static_dir),
        )
        .layer(middleware::from_fn(observability_middleware))
        .layer(cors)
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn hello() -> &'static str {
    "Barbershop backend says hello!\n"
}

async fn health_check(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Json<serde_json::Value> {
    let db_result = sqlx::query("SELECT 1").execute(&state.db).await;

    let db_status = match db_result {
        Ok(_) => "healthy",
        Err(e) => {
            tracing::info!("Database health check failed: {}", e);
            "unhealthy"
        }
    };

    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "services": {
            "database": db_status,
        }
    }))
}
