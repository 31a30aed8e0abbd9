use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;
use validator::Validate;

use crate::app_state::AppState;
use crate::db::models::{Appointment, AppointmentStatus, RateAppointmentPayload};
use crate::db::AppointmentRepository;
use crate::error::{AppError, AppResult};
use crate::scheduling::{authorize_rating, authorize_transition, Principal, Transition};

#[derive(Debug, Serialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub barber_name: Option<String>,
    pub service_name: Option<String>,
    pub duration_minutes: Option<i32>,
    pub price: Option<f64>,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub status: AppointmentStatus,
    pub rating: Option<i16>,
}

fn require_customer(principal: &Principal) -> AppResult<Uuid> {
    principal
        .customer_id()
        .ok_or_else(|| AppError::Forbidden("customer account required".into()))
}

pub async fn get_history(
    State(state): State<AppState>,
    principal: Principal,
) -> AppResult<Json<Vec<HistoryEntry>>> {
    let customer_id = require_customer(&principal)?;
    let listings = AppointmentRepository::list_for_customer(&state.db, customer_id).await?;

    let history = listings
        .into_iter()
        .map(|listing| HistoryEntry {
            id: listing.id,
            barber_name: listing.barber_name.clone(),
            service_name: listing.service_name.clone(),
            duration_minutes: listing.duration_minutes,
            price: listing.resolved_price(),
            start_time: listing.start_time,
            end_time: listing.end_time,
            status: listing.status,
            rating: listing.rating,
        })
        .collect();
    Ok(Json(history))
}

/// Cancels one of the customer's own scheduled appointments. The row stays
/// in history with status `cancelled`; past or already finalized
/// appointments are left untouched and the request fails.
pub async fn cancel_appointment(
    State(state): State<AppState>,
    principal: Principal,
    Path(appointment_id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    require_customer(&principal)?;

    let appointment = AppointmentRepository::find(&state.db, appointment_id)
        .await?
        .ok_or_else(|| AppError::NotFound("appointment".into()))?;

    let new_status = authorize_transition(
        &principal,
        &appointment,
        Transition::Cancel,
        Local::now().naive_local(),
    )?;
    let updated = AppointmentRepository::set_status(&state.db, appointment.id, new_status).await?;

    Ok(Json(json!({
        "message": "appointment cancelled",
        "status": updated.status,
    })))
}

pub async fn rate_appointment(
    State(state): State<AppState>,
    principal: Principal,
    Path(appointment_id): Path<Uuid>,
    Json(payload): Json<RateAppointmentPayload>,
) -> AppResult<Json<Appointment>> {
    payload.validate()?;
    require_customer(&principal)?;

    let appointment = AppointmentRepository::find(&state.db, appointment_id)
        .await?
        .ok_or_else(|| AppError::NotFound("appointment".into()))?;

    authorize_rating(&principal, &appointment)?;
    let updated = AppointmentRepository::set_rating(
        &state.db,
        appointment.id,
        payload.rating,
        payload.feedback.as_deref(),
    )
    .await?;
    Ok(Json(updated))
}
