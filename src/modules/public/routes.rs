use axum::{
    routing::{get, post},
    Router,
};

use crate::app_state::AppState;

use super::handlers::{
    book_appointment, get_availability, get_barber, get_barber_services, list_barbers,
    list_services,
};

pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/barbers", get(list_barbers))
        .route("/barbers/:barber_id", get(get_barber))
        .route("/barbers/:barber_id/services", get(get_barber_services))
        .route("/services", get(list_services))
        .route("/availability", get(get_availability))
        .route("/book", post(book_appointment))
}
