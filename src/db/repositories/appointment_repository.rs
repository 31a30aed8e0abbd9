use anyhow::anyhow;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::{Appointment, AppointmentListing, AppointmentStatus, NewAppointment};
use crate::db::DatabaseError;
use crate::scheduling::{overlaps, BookingStore, Interval, Occupancy, SchedulingError};

const LISTING_SELECT: &str = r#"
    SELECT
        a.id,
        a.barber_id,
        b.name AS barber_name,
        COALESCE(bs.name, s.name) AS service_name,
        COALESCE(bs.duration_minutes, s.duration_minutes) AS duration_minutes,
        CASE WHEN bs.id IS NOT NULL THEN COALESCE(bs.discount_price, bs.price) END AS price,
        s.price AS legacy_price,
        a.customer_name,
        a.start_time,
        a.end_time,
        a.status,
        a.rating
    FROM appointments a
    LEFT JOIN barbers b ON b.id = a.barber_id
    LEFT JOIN barber_services bs ON bs.id = a.barber_service_id
    LEFT JOIN services s ON s.id = a.service_id
"#;

pub struct AppointmentRepository;

impl AppointmentRepository {
    pub async fn find(
        pool: &PgPool,
        appointment_id: Uuid,
    ) -> Result<Option<Appointment>, DatabaseError> {
        let appointment =
            sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE id = $1")
                .bind(appointment_id)
                .fetch_optional(pool)
                .await?;
        Ok(appointment)
    }

    pub async fn list(
        pool: &PgPool,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<AppointmentListing>, DatabaseError> {
        let sql = format!("{LISTING_SELECT} ORDER BY a.start_time DESC OFFSET $1 LIMIT $2");
        let listings = sqlx::query_as::<_, AppointmentListing>(&sql)
            .bind(offset)
            .bind(limit)
            .fetch_all(pool)
            .await?;
        Ok(listings)
    }

    pub async fn list_for_customer(
        pool: &PgPool,
        customer_id: Uuid,
    ) -> Result<Vec<AppointmentListing>, DatabaseError> {
        let sql = format!("{LISTING_SELECT} WHERE a.customer_id = $1 ORDER BY a.start_time DESC");
        let listings = sqlx::query_as::<_, AppointmentListing>(&sql)
            .bind(customer_id)
            .fetch_all(pool)
            .await?;
        Ok(listings)
    }

    /// Reporting source: everything starting on or after `since`.
    pub async fn listings_since(
        pool: &PgPool,
        since: NaiveDateTime,
    ) -> Result<Vec<AppointmentListing>, DatabaseError> {
        let sql = format!("{LISTING_SELECT} WHERE a.start_time >= $1 ORDER BY a.start_time");
        let listings = sqlx::query_as::<_, AppointmentListing>(&sql)
            .bind(since)
            .fetch_all(pool)
            .await?;
        Ok(listings)
    }

    pub async fn set_status(
        pool: &PgPool,
        appointment_id: Uuid,
        status: AppointmentStatus,
    ) -> Result<Appointment, DatabaseError> {
        let appointment = sqlx::query_as::<_, Appointment>(
            r#"
            UPDATE appointments
            SET status = $2::appointment_status, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(appointment_id)
        .bind(status.as_str())
        .fetch_one(pool)
        .await?;
        Ok(appointment)
    }

    pub async fn set_rating(
        pool: &PgPool,
        appointment_id: Uuid,
        rating: i16,
        feedback: Option<&str>,
    ) -> Result<Appointment, DatabaseError> {
        let appointment = sqlx::query_as::<_, Appointment>(
            r#"
            UPDATE appointments
            SET rating = $2, feedback = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(appointment_id)
        .bind(rating)
        .bind(feedback)
        .fetch_one(pool)
        .await?;
        Ok(appointment)
    }
}

/// Advisory-lock key derived from the barber id; bookings for the same
/// barber serialize on it, different barbers never contend.
fn barber_lock_key(barber_id: Uuid) -> i64 {
    let bytes = barber_id.as_bytes();
    let mut head = [0u8; 8];
    head.copy_from_slice(&bytes[..8]);
    i64::from_be_bytes(head)
}

fn store_error(err: sqlx::Error) -> SchedulingError {
    SchedulingError::Store(anyhow!(err))
}

#[async_trait]
impl BookingStore for PgPool {
    async fn occupied_intervals(
        &self,
        barber_id: Uuid,
        window: Interval,
        occupancy: Occupancy,
    ) -> Result<Vec<Interval>, SchedulingError> {
        let statuses: Vec<&str> = occupancy.statuses().iter().map(|s| s.as_str()).collect();
        let rows: Vec<(NaiveDateTime, NaiveDateTime)> = sqlx::query_as(
            r#"
            SELECT start_time, end_time
            FROM appointments
            WHERE barber_id = $1
              AND status::text = ANY($2)
              AND start_time < $3
              AND end_time > $4
            ORDER BY start_time
            "#,
        )
        .bind(barber_id)
        .bind(statuses)
        .bind(window.end)
        .bind(window.start)
        .fetch_all(self)
        .await
        .map_err(store_error)?;

        Ok(rows
            .into_iter()
            .map(|(start, end)| Interval::new(start, end))
            .collect())
    }

    async fn commit(&self, booking: NewAppointment) -> Result<Appointment, SchedulingError> {
        let mut tx = self.begin().await.map_err(store_error)?;

        // Serializes check-then-insert per barber; released at commit or
        // rollback.
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(barber_lock_key(booking.barber_id))
            .execute(&mut *tx)
            .await
            .map_err(store_error)?;

        let committed: Vec<(NaiveDateTime, NaiveDateTime)> = sqlx::query_as(
            r#"
            SELECT start_time, end_time
            FROM appointments
            WHERE barber_id = $1
              AND status = 'scheduled'
              AND start_time < $2
              AND end_time > $3
            "#,
        )
        .bind(booking.barber_id)
        .bind(booking.end_time)
        .bind(booking.start_time)
        .fetch_all(&mut *tx)
        .await
        .map_err(store_error)?;

        let candidate = Interval::new(booking.start_time, booking.end_time);
        if committed
            .iter()
            .any(|&(start, end)| overlaps(candidate, Interval::new(start, end)))
        {
            // Dropping the transaction rolls back and releases the lock.
            return Err(SchedulingError::Conflict);
        }

        let appointment = sqlx::query_as::<_, Appointment>(
            r#"
            INSERT INTO appointments (
                barber_id, barber_service_id, service_id, customer_id,
                customer_name, customer_phone, start_time, end_time, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'scheduled')
            RETURNING *
            "#,
        )
        .bind(booking.barber_id)
        .bind(booking.barber_service_id)
        .bind(booking.service_id)
        .bind(booking.customer_id)
        .bind(&booking.customer_name)
        .bind(&booking.customer_phone)
        .bind(booking.start_time)
        .bind(booking.end_time)
        .fetch_one(&mut *tx)
        .await
        .map_err(store_error)?;

        tx.commit().await.map_err(store_error)?;
        Ok(appointment)
    }
}
