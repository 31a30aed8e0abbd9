use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;

/// Customer account owned by the identity subsystem. The scheduling engine
/// only reads it to link bookings made by an authenticated customer.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub created_at: NaiveDateTime,
}
