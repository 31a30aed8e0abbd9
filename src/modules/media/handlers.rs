use std::path::{Path as FsPath, PathBuf};

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::{info, warn};
use uuid::Uuid;

use crate::app_state::AppState;
use crate::db::models::{AppointmentStatus, MediaType};
use crate::db::{AppointmentRepository, MediaRepository};
use crate::error::{AppError, AppResult};
use crate::scheduling::{completes_on_media, Principal};

pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;
pub const MAX_VIDEO_BYTES: usize = 100 * 1024 * 1024;

const APPOINTMENT_SUBDIR: &str = "appointments";

/// Attaches a result photo or video to an appointment. Documenting the
/// haircut doubles as recording that it happened: a scheduled appointment
/// is completed as a side effect of the upload.
pub async fn upload_appointment_media(
    State(state): State<AppState>,
    principal: Principal,
    Path(appointment_id): Path<Uuid>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<Value>)> {
    let appointment = AppointmentRepository::find(&state.db, appointment_id)
        .await?
        .ok_or_else(|| AppError::NotFound("appointment".into()))?;
    if !principal.can_manage(appointment.barber_id) {
        return Err(AppError::Forbidden(
            "only an admin or the barber themselves can upload media".into(),
        ));
    }

    let field = multipart
        .next_field()
        .await
        .map_err(|err| AppError::InvalidInput(format!("invalid multipart body: {err}")))?
        .ok_or_else(|| AppError::InvalidInput("a file field is required".into()))?;

    let content_type = field.content_type().unwrap_or_default().to_string();
    let media_type = MediaType::from_content_type(&content_type).ok_or_else(|| {
        AppError::InvalidInput(
            "unsupported file type, use JPEG/PNG/GIF/WebP images or MP4/WebM videos".into(),
        )
    })?;
    let extension = field
        .file_name()
        .and_then(|name| FsPath::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_default();

    let bytes = field
        .bytes()
        .await
        .map_err(|err| AppError::InvalidInput(format!("failed to read upload: {err}")))?;
    let max_bytes = match media_type {
        MediaType::Image => MAX_IMAGE_BYTES,
        MediaType::Video => MAX_VIDEO_BYTES,
    };
    if bytes.len() > max_bytes {
        return Err(AppError::InvalidInput(format!(
            "file too large, limit is {} MB",
            max_bytes / (1024 * 1024)
        )));
    }

    let filename = format!("{}{extension}", Uuid::new_v4().simple());
    let dir = PathBuf::from(&state.env.app.upload_dir).join(APPOINTMENT_SUBDIR);
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|err| AppError::Internal(format!("failed to prepare upload dir: {err}")))?;
    tokio::fs::write(dir.join(&filename), &bytes)
        .await
        .map_err(|err| AppError::Internal(format!("failed to store upload: {err}")))?;

    let media_url = format!("/static/uploads/{APPOINTMENT_SUBDIR}/{filename}");
    let media =
        MediaRepository::create(&state.db, appointment.id, &media_url, media_type).await?;

    if completes_on_media(&appointment.status) {
        AppointmentRepository::set_status(&state.db, appointment.id, AppointmentStatus::Completed)
            .await?;
        info!(appointment_id = %appointment.id, "appointment completed via media upload");
    }

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": media.id,
            "media_url": media.media_url,
            "media_type": media.media_type,
        })),
    ))
}

pub async fn delete_media(
    State(state): State<AppState>,
    principal: Principal,
    Path(media_id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    let media = MediaRepository::find(&state.db, media_id)
        .await?
        .ok_or_else(|| AppError::NotFound("media".into()))?;

    let appointment = AppointmentRepository::find(&state.db, media.appointment_id).await?;
    let allowed = match &appointment {
        Some(appointment) => principal.can_manage(appointment.barber_id),
        None => principal.is_admin(),
    };
    if !allowed {
        return Err(AppError::Forbidden(
            "only an admin or the barber themselves can delete media".into(),
        ));
    }

    // Best effort on the file itself: losing a stray file is better than a
    // media row that cannot be removed.
    if let Some(relative) = media.media_url.strip_prefix("/static/") {
        let path = PathBuf::from(&state.env.app.static_dir).join(relative);
        if let Err(err) = tokio::fs::remove_file(&path).await {
            warn!(media_id = %media.id, error = %err, "could not remove media file");
        }
    }

    MediaRepository::delete(&state.db, media.id).await?;
    Ok(Json(json!({ "ok": true })))
}
