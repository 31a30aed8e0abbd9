use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::{AppointmentMedia, MediaType};
use crate::db::DatabaseError;

pub struct MediaRepository;

impl MediaRepository {
    pub async fn create(
        pool: &PgPool,
        appointment_id: Uuid,
        media_url: &str,
        media_type: MediaType,
    ) -> Result<AppointmentMedia, DatabaseError> {
        let media = sqlx::query_as::<_, AppointmentMedia>(
            r#"
            INSERT INTO appointment_media (appointment_id, media_url, media_type)
            VALUES ($1, $2, $3::media_type)
            RETURNING *
            "#,
        )
        .bind(appointment_id)
        .bind(media_url)
        .bind(media_type.as_str())
        .fetch_one(pool)
        .await?;
        Ok(media)
    }

    pub async fn find(
        pool: &PgPool,
        media_id: Uuid,
    ) -> Result<Option<AppointmentMedia>, DatabaseError> {
        let media =
            sqlx::query_as::<_, AppointmentMedia>("SELECT * FROM appointment_media WHERE id = $1")
                .bind(media_id)
                .fetch_optional(pool)
                .await?;
        Ok(media)
    }

    pub async fn delete(pool: &PgPool, media_id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM appointment_media WHERE id = $1")
            .bind(media_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
