use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, post},
    Router,
};

use crate::app_state::AppState;

use super::handlers::{delete_media, upload_appointment_media, MAX_VIDEO_BYTES};

pub fn media_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/appointments/:appointment_id/media",
            post(upload_appointment_media),
        )
        .route("/media/:media_id", delete(delete_media))
        .layer(DefaultBodyLimit::max(MAX_VIDEO_BYTES + 1024))
}
