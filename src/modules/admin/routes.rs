use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::app_state::AppState;

use super::handlers::{
    complete_appointment, create_barber, create_barber_service, create_service, delete_barber,
    delete_barber_service, delete_service, get_barber, get_dashboard_stats, list_appointments,
    list_barber_services, list_barbers, list_services, no_show_appointment, update_barber,
    update_barber_service,
};

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/barbers", get(list_barbers).post(create_barber))
        .route(
            "/barbers/:barber_id",
            get(get_barber).put(update_barber).delete(delete_barber),
        )
        .route(
            "/barbers/:barber_id/services",
            get(list_barber_services).post(create_barber_service),
        )
        .route(
            "/barbers/:barber_id/services/:service_id",
            put(update_barber_service).delete(delete_barber_service),
        )
        .route("/services", get(list_services).post(create_service))
        .route("/services/:service_id", delete(delete_service))
        .route("/appointments", get(list_appointments))
        .route(
            "/appointments/:appointment_id/complete",
            post(complete_appointment),
        )
        .route(
            "/appointments/:appointment_id/no-show",
            post(no_show_appointment),
        )
        .route("/dashboard-stats", get(get_dashboard_stats))
}
