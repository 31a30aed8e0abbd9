use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{Duration, Local, NaiveTime};
use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;
use validator::Validate;

use crate::app_state::AppState;
use crate::db::models::{
    Appointment, AppointmentListing, AppointmentStatus, Barber, BarberService, NewBarber,
    NewBarberService, NewService, Service, UpdateBarberPayload, UpdateBarberServicePayload,
};
use crate::db::{AppointmentRepository, BarberRepository, ServiceRepository};
use crate::error::{AppError, AppResult};
use crate::modules::public::handlers::Pagination;
use crate::scheduling::{authorize_transition, Principal, Transition};

fn require_admin(principal: &Principal) -> AppResult<()> {
    if principal.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden("admin access required".into()))
    }
}

fn require_manager(principal: &Principal, barber_id: Uuid) -> AppResult<()> {
    if principal.can_manage(barber_id) {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "only an admin or the barber themselves can do this".into(),
        ))
    }
}

// Barber directory

pub async fn list_barbers(
    State(state): State<AppState>,
    principal: Principal,
) -> AppResult<Json<Vec<Barber>>> {
    require_admin(&principal)?;
    let barbers = BarberRepository::list_all(&state.db).await?;
    Ok(Json(barbers))
}

pub async fn create_barber(
    State(state): State<AppState>,
    principal: Principal,
    Json(payload): Json<NewBarber>,
) -> AppResult<(StatusCode, Json<Barber>)> {
    require_admin(&principal)?;
    payload.validate()?;
    payload.validate_hours()?;
    let barber = BarberRepository::create(&state.db, &payload).await?;
    Ok((StatusCode::CREATED, Json(barber)))
}

pub async fn get_barber(
    State(state): State<AppState>,
    principal: Principal,
    Path(barber_id): Path<Uuid>,
) -> AppResult<Json<Barber>> {
    require_manager(&principal, barber_id)?;
    let barber = BarberRepository::find(&state.db, barber_id)
        .await?
        .ok_or_else(|| AppError::NotFound("barber".into()))?;
    Ok(Json(barber))
}

pub async fn update_barber(
    State(state): State<AppState>,
    principal: Principal,
    Path(barber_id): Path<Uuid>,
    Json(payload): Json<UpdateBarberPayload>,
) -> AppResult<Json<Barber>> {
    require_manager(&principal, barber_id)?;
    payload.validate()?;
    payload.validate_hours()?;
    let barber = BarberRepository::update(&state.db, barber_id, &payload)
        .await?
        .ok_or_else(|| AppError::NotFound("barber".into()))?;
    Ok(Json(barber))
}

/// Removing a barber from the shop. Their appointment history must survive,
/// so this deactivates instead of deleting.
pub async fn delete_barber(
    State(state): State<AppState>,
    principal: Principal,
    Path(barber_id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    require_admin(&principal)?;
    if !BarberRepository::deactivate(&state.db, barber_id).await? {
        return Err(AppError::NotFound("barber".into()));
    }
    Ok(Json(json!({ "ok": true })))
}

// Per-barber offerings

pub async fn list_barber_services(
    State(state): State<AppState>,
    principal: Principal,
    Path(barber_id): Path<Uuid>,
) -> AppResult<Json<Vec<BarberService>>> {
    require_manager(&principal, barber_id)?;
    BarberRepository::find(&state.db, barber_id)
        .await?
        .ok_or_else(|| AppError::NotFound("barber".into()))?;
    let services = ServiceRepository::list_for_barber(&state.db, barber_id).await?;
    Ok(Json(services))
}

pub async fn create_barber_service(
    State(state): State<AppState>,
    principal: Principal,
    Path(barber_id): Path<Uuid>,
    Json(payload): Json<NewBarberService>,
) -> AppResult<(StatusCode, Json<BarberService>)> {
    require_manager(&principal, barber_id)?;
    payload.validate()?;
    payload.validate_discount()?;
    BarberRepository::find(&state.db, barber_id)
        .await?
        .ok_or_else(|| AppError::NotFound("barber".into()))?;
    let service = ServiceRepository::create_for_barber(&state.db, barber_id, &payload).await?;
    Ok((StatusCode::CREATED, Json(service)))
}

pub async fn update_barber_service(
    State(state): State<AppState>,
    principal: Principal,
    Path((barber_id, service_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateBarberServicePayload>,
) -> AppResult<Json<BarberService>> {
    require_manager(&principal, barber_id)?;
    payload.validate()?;

    let current = ServiceRepository::find_barber_service(&state.db, service_id)
        .await?
        .filter(|service| service.barber_id == barber_id)
        .ok_or_else(|| AppError::NotFound("service".into()))?;

    // Cross-field rule when only one side changes in this request.
    let price = payload.price.unwrap_or(current.price);
    let discount = payload.discount_price.or(current.discount_price);
    if let Some(discount) = discount {
        if discount > price {
            return Err(AppError::InvalidInput(
                "discount cannot exceed the price".into(),
            ));
        }
    }

    let service = ServiceRepository::update_for_barber(&state.db, barber_id, service_id, &payload)
        .await?
        .ok_or_else(|| AppError::NotFound("service".into()))?;
    Ok(Json(service))
}

pub async fn delete_barber_service(
    State(state): State<AppState>,
    principal: Principal,
    Path((barber_id, service_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<Value>> {
    require_manager(&principal, barber_id)?;
    if !ServiceRepository::delete_for_barber(&state.db, barber_id, service_id).await? {
        return Err(AppError::NotFound("service".into()));
    }
    Ok(Json(json!({ "ok": true })))
}

// Legacy global catalog

pub async fn create_service(
    State(state): State<AppState>,
    principal: Principal,
    Json(payload): Json<NewService>,
) -> AppResult<(StatusCode, Json<Service>)> {
    require_admin(&principal)?;
    payload.validate()?;
    let service = ServiceRepository::create_service(&state.db, &payload).await?;
    Ok((StatusCode::CREATED, Json(service)))
}

pub async fn list_services(
    State(state): State<AppState>,
    principal: Principal,
    Query(page): Query<Pagination>,
) -> AppResult<Json<Vec<Service>>> {
    require_admin(&principal)?;
    let services =
        ServiceRepository::list_services(&state.db, page.skip, page.limit.unwrap_or(100)).await?;
    Ok(Json(services))
}

pub async fn delete_service(
    State(state): State<AppState>,
    principal: Principal,
    Path(service_id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    require_admin(&principal)?;
    if !ServiceRepository::delete_service(&state.db, service_id).await? {
        return Err(AppError::NotFound("service".into()));
    }
    Ok(Json(json!({ "ok": true })))
}

// Appointments

pub async fn list_appointments(
    State(state): State<AppState>,
    principal: Principal,
    Query(page): Query<Pagination>,
) -> AppResult<Json<Vec<AppointmentListing>>> {
    require_admin(&principal)?;
    let listings =
        AppointmentRepository::list(&state.db, page.skip, page.limit.unwrap_or(100)).await?;
    Ok(Json(listings))
}

pub async fn complete_appointment(
    State(state): State<AppState>,
    principal: Principal,
    Path(appointment_id): Path<Uuid>,
) -> AppResult<Json<Appointment>> {
    apply_transition(&state, &principal, appointment_id, Transition::Complete).await
}

pub async fn no_show_appointment(
    State(state): State<AppState>,
    principal: Principal,
    Path(appointment_id): Path<Uuid>,
) -> AppResult<Json<Appointment>> {
    apply_transition(&state, &principal, appointment_id, Transition::NoShow).await
}

async fn apply_transition(
    state: &AppState,
    principal: &Principal,
    appointment_id: Uuid,
    transition: Transition,
) -> AppResult<Json<Appointment>> {
    let appointment = AppointmentRepository::find(&state.db, appointment_id)
        .await?
        .ok_or_else(|| AppError::NotFound("appointment".into()))?;

    let new_status = authorize_transition(
        principal,
        &appointment,
        transition,
        Local::now().naive_local(),
    )?;
    let updated = AppointmentRepository::set_status(&state.db, appointment.id, new_status).await?;
    Ok(Json(updated))
}

// Reporting

#[derive(Debug, Serialize)]
pub struct ServiceDistribution {
    pub labels: Vec<String>,
    pub data: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub labels: Vec<String>,
    pub appointments_data: Vec<i64>,
    pub revenue_data: Vec<f64>,
    pub service_distribution: ServiceDistribution,
    pub total_revenue: f64,
    pub count_today: i64,
    pub barber_count: i64,
}

/// Seven-day reporting aggregate over committed appointments. Cancelled
/// rows stay out of both counts and revenue.
pub async fn get_dashboard_stats(
    State(state): State<AppState>,
    principal: Principal,
) -> AppResult<Json<DashboardStats>> {
    require_admin(&principal)?;

    let today = Local::now().date_naive();
    let start_date = today - Duration::days(6);
    let listings =
        AppointmentRepository::listings_since(&state.db, start_date.and_time(NaiveTime::MIN))
            .await?;

    let labels: Vec<String> = (0..7)
        .map(|offset| (start_date + Duration::days(offset)).format("%d/%m").to_string())
        .collect();
    let mut daily: HashMap<String, (i64, f64)> =
        labels.iter().map(|label| (label.clone(), (0, 0.0))).collect();
    let mut service_counts: HashMap<String, i64> = HashMap::new();

    let mut total_revenue = 0.0;
    let mut count_today = 0;

    for listing in &listings {
        if listing.status == AppointmentStatus::Cancelled {
            continue;
        }

        if listing.start_time.date() == today {
            count_today += 1;
        }

        let day_label = listing.start_time.format("%d/%m").to_string();
        if let Some((count, revenue)) = daily.get_mut(&day_label) {
            *count += 1;
            let price = listing.resolved_price().unwrap_or(0.0);
            *revenue += price;
            total_revenue += price;

            if let Some(name) = &listing.service_name {
                *service_counts.entry(name.clone()).or_insert(0) += 1;
            }
        }
    }

    let appointments_data = labels.iter().map(|label| daily[label].0).collect();
    let revenue_data = labels.iter().map(|label| daily[label].1).collect();

    let mut ranked: Vec<(String, i64)> = service_counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(5);
    let (dist_labels, dist_data) = ranked.into_iter().unzip();

    Ok(Json(DashboardStats {
        labels,
        appointments_data,
        revenue_data,
        service_distribution: ServiceDistribution {
            labels: dist_labels,
            data: dist_data,
        },
        total_revenue,
        count_today,
        barber_count: BarberRepository::count_active(&state.db).await?,
    }))
}
