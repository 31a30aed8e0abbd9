use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::{
    BarberService, NewBarberService, NewService, Service, UpdateBarberServicePayload,
};
use crate::db::DatabaseError;

pub struct ServiceRepository;

impl ServiceRepository {
    // Per-barber offerings

    pub async fn list_for_barber(
        pool: &PgPool,
        barber_id: Uuid,
    ) -> Result<Vec<BarberService>, DatabaseError> {
        let services = sqlx::query_as::<_, BarberService>(
            "SELECT * FROM barber_services WHERE barber_id = $1 ORDER BY name",
        )
        .bind(barber_id)
        .fetch_all(pool)
        .await?;
        Ok(services)
    }

    pub async fn find_barber_service(
        pool: &PgPool,
        service_id: Uuid,
    ) -> Result<Option<BarberService>, DatabaseError> {
        let service =
            sqlx::query_as::<_, BarberService>("SELECT * FROM barber_services WHERE id = $1")
                .bind(service_id)
                .fetch_optional(pool)
                .await?;
        Ok(service)
    }

    pub async fn create_for_barber(
        pool: &PgPool,
        barber_id: Uuid,
        payload: &NewBarberService,
    ) -> Result<BarberService, DatabaseError> {
        let service = sqlx::query_as::<_, BarberService>(
            r#"
            INSERT INTO barber_services (barber_id, name, duration_minutes, price, discount_price)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(barber_id)
        .bind(&payload.name)
        .bind(payload.duration_minutes)
        .bind(payload.price)
        .bind(payload.discount_price)
        .fetch_one(pool)
        .await?;
        Ok(service)
    }

    pub async fn update_for_barber(
        pool: &PgPool,
        barber_id: Uuid,
        service_id: Uuid,
        payload: &UpdateBarberServicePayload,
    ) -> Result<Option<BarberService>, DatabaseError> {
        let service = sqlx::query_as::<_, BarberService>(
            r#"
            UPDATE barber_services
            SET
                name = COALESCE($1, name),
                duration_minutes = COALESCE($2, duration_minutes),
                price = COALESCE($3, price),
                discount_price = COALESCE($4, discount_price),
                updated_at = NOW()
            WHERE id = $5 AND barber_id = $6
            RETURNING *
            "#,
        )
        .bind(&payload.name)
        .bind(payload.duration_minutes)
        .bind(payload.price)
        .bind(payload.discount_price)
        .bind(service_id)
        .bind(barber_id)
        .fetch_optional(pool)
        .await?;
        Ok(service)
    }

    pub async fn delete_for_barber(
        pool: &PgPool,
        barber_id: Uuid,
        service_id: Uuid,
    ) -> Result<bool, DatabaseError> {
        let result =
            sqlx::query("DELETE FROM barber_services WHERE id = $1 AND barber_id = $2")
                .bind(service_id)
                .bind(barber_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    // Legacy global catalog

    pub async fn list_services(
        pool: &PgPool,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Service>, DatabaseError> {
        let services =
            sqlx::query_as::<_, Service>("SELECT * FROM services ORDER BY name OFFSET $1 LIMIT $2")
                .bind(offset)
                .bind(limit)
                .fetch_all(pool)
                .await?;
        Ok(services)
    }

    pub async fn find_service(
        pool: &PgPool,
        service_id: Uuid,
    ) -> Result<Option<Service>, DatabaseError> {
        let service = sqlx::query_as::<_, Service>("SELECT * FROM services WHERE id = $1")
            .bind(service_id)
            .fetch_optional(pool)
            .await?;
        Ok(service)
    }

    pub async fn create_service(
        pool: &PgPool,
        payload: &NewService,
    ) -> Result<Service, DatabaseError> {
        let service = sqlx::query_as::<_, Service>(
            r#"
            INSERT INTO services (name, duration_minutes, price)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&payload.name)
        .bind(payload.duration_minutes)
        .bind(&payload.price)
        .fetch_one(pool)
        .await?;
        Ok(service)
    }

    pub async fn delete_service(pool: &PgPool, service_id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM services WHERE id = $1")
            .bind(service_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
