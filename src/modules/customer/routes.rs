use axum::{
    routing::{get, post},
    Router,
};

use crate::app_state::AppState;

use super::handlers::{cancel_appointment, get_history, rate_appointment};

pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/history", get(get_history))
        .route("/appointments/:appointment_id/cancel", post(cancel_appointment))
        .route("/appointments/:appointment_id/rating", post(rate_appointment))
}
