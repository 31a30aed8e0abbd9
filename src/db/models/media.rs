use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "media_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Image,
    Video,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Video => "video",
        }
    }

    /// Maps an upload's MIME type to the media kind we accept.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        match content_type {
            "image/jpeg" | "image/png" | "image/gif" | "image/webp" => Some(MediaType::Image),
            "video/mp4" | "video/webm" | "video/quicktime" => Some(MediaType::Video),
            _ => None,
        }
    }
}

/// Result photo or video attached to an appointment. Uploading one to a
/// scheduled appointment completes it as a side effect.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct AppointmentMedia {
    pub id: Uuid,
    pub appointment_id: Uuid,
    pub media_url: String,
    pub media_type: MediaType,
    pub created_at: NaiveDateTime,
}
