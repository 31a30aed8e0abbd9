use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::app_state::AppState;
use crate::db::models::{Appointment, Barber, BarberService, BookAppointmentPayload, Service};
use crate::db::{BarberRepository, CustomerRepository, ServiceRepository};
use crate::error::{AppError, AppResult};
use crate::scheduling::{
    self, format_slot, free_slots, BookingOrder, BookingStore, DayCalendar, Occupancy, Principal,
};

/// Walk-in default when no service is specified on an availability query.
const DEFAULT_DURATION_MINUTES: i64 = 30;

pub async fn list_barbers(State(state): State<AppState>) -> AppResult<Json<Vec<Barber>>> {
    let barbers = BarberRepository::list_active(&state.db).await?;
    Ok(Json(barbers))
}

pub async fn get_barber(
    State(state): State<AppState>,
    Path(barber_id): Path<Uuid>,
) -> AppResult<Json<Barber>> {
    let barber = BarberRepository::find(&state.db, barber_id)
        .await?
        .ok_or_else(|| AppError::NotFound("barber".into()))?;
    Ok(Json(barber))
}

pub async fn get_barber_services(
    State(state): State<AppState>,
    Path(barber_id): Path<Uuid>,
) -> AppResult<Json<Vec<BarberService>>> {
    BarberRepository::find(&state.db, barber_id)
        .await?
        .ok_or_else(|| AppError::NotFound("barber".into()))?;
    let services = ServiceRepository::list_for_barber(&state.db, barber_id).await?;
    Ok(Json(services))
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub skip: i64,
    pub limit: Option<i64>,
}

pub async fn list_services(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> AppResult<Json<Vec<Service>>> {
    let services =
        ServiceRepository::list_services(&state.db, page.skip, page.limit.unwrap_or(100)).await?;
    Ok(Json(services))
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityParams {
    pub date: String,
    pub barber_id: Uuid,
    pub barber_service_id: Option<Uuid>,
    pub service_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub slots: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Open slots for one barber on one day. A pure read: nothing returned here
/// is reserved, and a concurrent booking may still win any of these slots
/// before the caller commits.
pub async fn get_availability(
    State(state): State<AppState>,
    Query(params): Query<AvailabilityParams>,
) -> AppResult<Json<AvailabilityResponse>> {
    let date = NaiveDate::parse_from_str(&params.date, "%Y-%m-%d")
        .map_err(|_| AppError::InvalidInput("date must be formatted YYYY-MM-DD".into()))?;

    let barber = BarberRepository::find(&state.db, params.barber_id)
        .await?
        .ok_or_else(|| AppError::NotFound("barber".into()))?;
    if !barber.is_active {
        return Ok(Json(AvailabilityResponse {
            slots: Vec::new(),
            message: Some("barber is not currently available".into()),
        }));
    }

    let duration = resolve_query_duration(&state, &barber, &params).await?;
    let calendar = DayCalendar::resolve(&barber, date);

    // Completed appointments still occupy past day views; only scheduled
    // ones block days that can still be booked.
    let occupancy = if date < Local::now().date_naive() {
        Occupancy::Historical
    } else {
        Occupancy::Blocking
    };
    let occupied = state
        .db
        .occupied_intervals(barber.id, calendar.work, occupancy)
        .await?;

    let slots = free_slots(&calendar, duration, &occupied)
        .into_iter()
        .map(format_slot)
        .collect();
    Ok(Json(AvailabilityResponse {
        slots,
        message: None,
    }))
}

/// Availability is lenient about the service reference: an unknown or
/// foreign offering falls back to the default duration rather than failing
/// the query. Booking is strict (see `book_appointment`).
async fn resolve_query_duration(
    state: &AppState,
    barber: &Barber,
    params: &AvailabilityParams,
) -> AppResult<i64> {
    if let Some(service_id) = params.barber_service_id {
        if let Some(offering) = ServiceRepository::find_barber_service(&state.db, service_id).await?
        {
            if offering.barber_id == barber.id && offering.duration_minutes > 0 {
                return Ok(i64::from(offering.duration_minutes));
            }
        }
    } else if let Some(service_id) = params.service_id {
        if let Some(service) = ServiceRepository::find_service(&state.db, service_id).await? {
            if service.duration_minutes > 0 {
                return Ok(i64::from(service.duration_minutes));
            }
        }
    }
    Ok(DEFAULT_DURATION_MINUTES)
}

/// Books a slot. The availability list the client saw is only a hint; the
/// store re-checks overlap atomically at commit time and answers 409 when a
/// concurrent booking got there first.
pub async fn book_appointment(
    State(state): State<AppState>,
    principal: Option<Principal>,
    Json(payload): Json<BookAppointmentPayload>,
) -> AppResult<(StatusCode, Json<Appointment>)> {
    payload.validate()?;

    let barber = BarberRepository::find(&state.db, payload.barber_id)
        .await?
        .ok_or_else(|| AppError::NotFound("barber".into()))?;

    let barber_service = match payload.barber_service_id {
        Some(service_id) => Some(
            ServiceRepository::find_barber_service(&state.db, service_id)
                .await?
                .ok_or_else(|| AppError::NotFound("service for this barber".into()))?,
        ),
        None => None,
    };
    let legacy_service = match (payload.barber_service_id, payload.service_id) {
        (None, Some(service_id)) => Some(
            ServiceRepository::find_service(&state.db, service_id)
                .await?
                .ok_or_else(|| AppError::NotFound("service".into()))?,
        ),
        _ => None,
    };

    let service =
        scheduling::resolve_service(&barber, barber_service.as_ref(), legacy_service.as_ref())?;

    // An authenticated customer gets the booking attached to their account;
    // anyone else books as a walk-in.
    let customer_id = match principal.as_ref().and_then(Principal::customer_id) {
        Some(id) => CustomerRepository::find(&state.db, id)
            .await?
            .map(|customer| customer.id),
        None => None,
    };

    let appointment = scheduling::place(
        &state.db,
        &barber,
        &service,
        BookingOrder {
            customer_name: payload.customer_name,
            customer_phone: payload.customer_phone,
            customer_id,
            start_time: payload.start_time,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(appointment)))
}
