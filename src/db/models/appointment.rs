use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use validator::Validate;

use crate::scheduling::Interval;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "appointment_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    NoShow,
    Cancelled,
}

impl AppointmentStatus {
    /// Every state except `scheduled` is terminal.
    pub fn is_terminal(&self) -> bool {
        *self != AppointmentStatus::Scheduled
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::NoShow => "no_show",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }
}

/// The central scheduling entity. `end_time` is computed once at booking and
/// never edited on its own; `status` only moves through the lifecycle rules.
/// Rows are finalized in place, never deleted.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub barber_id: Uuid,
    pub barber_service_id: Option<Uuid>,
    pub service_id: Option<Uuid>,
    pub customer_id: Option<Uuid>,
    pub customer_name: String,
    pub customer_phone: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub status: AppointmentStatus,
    pub rating: Option<i16>,
    pub feedback: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Appointment {
    pub fn interval(&self) -> Interval {
        Interval::new(self.start_time, self.end_time)
    }
}

/// Validated booking record the store inserts with status `scheduled`.
#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub barber_id: Uuid,
    pub barber_service_id: Option<Uuid>,
    pub service_id: Option<Uuid>,
    pub customer_id: Option<Uuid>,
    pub customer_name: String,
    pub customer_phone: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
}

#[derive(Debug, Deserialize, Validate)]
pub struct BookAppointmentPayload {
    pub barber_id: Uuid,
    pub barber_service_id: Option<Uuid>,
    pub service_id: Option<Uuid>,
    #[validate(length(min = 1, max = 120))]
    pub customer_name: String,
    #[validate(length(min = 8, max = 20))]
    pub customer_phone: String,
    pub start_time: NaiveDateTime,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RateAppointmentPayload {
    #[validate(range(min = 1, max = 5))]
    pub rating: i16,
    #[validate(length(max = 1000))]
    pub feedback: Option<String>,
}

/// Denormalized appointment row for customer history and admin listings,
/// with the service resolved from either the per-barber offering or the
/// legacy global catalog.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct AppointmentListing {
    pub id: Uuid,
    pub barber_id: Uuid,
    pub barber_name: Option<String>,
    pub service_name: Option<String>,
    pub duration_minutes: Option<i32>,
    pub price: Option<f64>,
    pub legacy_price: Option<String>,
    pub customer_name: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub status: AppointmentStatus,
    pub rating: Option<i16>,
}

impl AppointmentListing {
    /// Numeric price for reporting: the per-barber offering price when
    /// present, otherwise the legacy display string parsed leniently.
    pub fn resolved_price(&self) -> Option<f64> {
        self.price.or_else(|| {
            self.legacy_price
                .as_deref()
                .map(super::service::legacy_price_value)
        })
    }
}
