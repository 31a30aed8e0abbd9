use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::{Barber, NewBarber, UpdateBarberPayload};
use crate::db::DatabaseError;

pub struct BarberRepository;

impl BarberRepository {
    pub async fn list_active(pool: &PgPool) -> Result<Vec<Barber>, DatabaseError> {
        let barbers = sqlx::query_as::<_, Barber>(
            "SELECT * FROM barbers WHERE is_active ORDER BY name",
        )
        .fetch_all(pool)
        .await?;
        Ok(barbers)
    }

    pub async fn list_all(pool: &PgPool) -> Result<Vec<Barber>, DatabaseError> {
        let barbers = sqlx::query_as::<_, Barber>("SELECT * FROM barbers ORDER BY name")
            .fetch_all(pool)
            .await?;
        Ok(barbers)
    }

    pub async fn find(pool: &PgPool, barber_id: Uuid) -> Result<Option<Barber>, DatabaseError> {
        let barber = sqlx::query_as::<_, Barber>("SELECT * FROM barbers WHERE id = $1")
            .bind(barber_id)
            .fetch_optional(pool)
            .await?;
        Ok(barber)
    }

    pub async fn create(pool: &PgPool, new_barber: &NewBarber) -> Result<Barber, DatabaseError> {
        let barber = sqlx::query_as::<_, Barber>(
            r#"
            INSERT INTO barbers (name, bio, open_time, close_time, break_start, break_end)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&new_barber.name)
        .bind(&new_barber.bio)
        .bind(&new_barber.open_time)
        .bind(&new_barber.close_time)
        .bind(&new_barber.break_start)
        .bind(&new_barber.break_end)
        .fetch_one(pool)
        .await?;
        Ok(barber)
    }

    pub async fn update(
        pool: &PgPool,
        barber_id: Uuid,
        payload: &UpdateBarberPayload,
    ) -> Result<Option<Barber>, DatabaseError> {
        let barber = sqlx::query_as::<_, Barber>(
            r#"
            UPDATE barbers
            SET
                name = COALESCE($1, name),
                bio = COALESCE($2, bio),
                is_active = COALESCE($3, is_active),
                open_time = COALESCE($4, open_time),
                close_time = COALESCE($5, close_time),
                break_start = COALESCE($6, break_start),
                break_end = COALESCE($7, break_end),
                updated_at = NOW()
            WHERE id = $8
            RETURNING *
            "#,
        )
        .bind(&payload.name)
        .bind(&payload.bio)
        .bind(payload.is_active)
        .bind(&payload.open_time)
        .bind(&payload.close_time)
        .bind(&payload.break_start)
        .bind(&payload.break_end)
        .bind(barber_id)
        .fetch_optional(pool)
        .await?;
        Ok(barber)
    }

    /// Appointments reference barbers forever, so removal from the shop is a
    /// deactivation, not a delete.
    pub async fn deactivate(pool: &PgPool, barber_id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            "UPDATE barbers SET is_active = FALSE, updated_at = NOW() WHERE id = $1",
        )
        .bind(barber_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count_active(pool: &PgPool) -> Result<i64, DatabaseError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM barbers WHERE is_active")
                .fetch_one(pool)
                .await?;
        Ok(count)
    }
}
