use async_trait::async_trait;
use chrono::Local;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::db::models::{Appointment, AppointmentStatus, NewAppointment};

use super::slots::{overlaps, Interval};
use super::SchedulingError;

/// Which statuses count as occupying the calendar. Only `scheduled` rows
/// block new bookings; `completed` rows additionally occupy past day views.
/// Cancelled and no-show rows are history, never occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occupancy {
    Blocking,
    Historical,
}

impl Occupancy {
    pub fn statuses(self) -> &'static [AppointmentStatus] {
        match self {
            Occupancy::Blocking => &[AppointmentStatus::Scheduled],
            Occupancy::Historical => {
                &[AppointmentStatus::Scheduled, AppointmentStatus::Completed]
            }
        }
    }
}

/// Storage port of the booking engine. Implementations must make `commit`
/// atomic per barber: the overlap re-check and the insert happen as one
/// serialized unit, so two concurrent commits for overlapping intervals
/// resolve to exactly one success and one `Conflict`.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Committed occupancy for one barber intersecting `window`, as plain
    /// intervals.
    async fn occupied_intervals(
        &self,
        barber_id: Uuid,
        window: Interval,
        occupancy: Occupancy,
    ) -> Result<Vec<Interval>, SchedulingError>;

    /// Re-checks the requested interval against every committed `scheduled`
    /// appointment for the barber and inserts only if it stays free. The
    /// availability list the caller saw earlier is a hint, not a
    /// reservation.
    async fn commit(&self, booking: NewAppointment) -> Result<Appointment, SchedulingError>;
}

/// In-process store, serialized by a single mutex around the check-then-
/// insert section. Backs the engine tests; the production path lives on
/// `PgPool` in the repository layer.
#[derive(Default)]
pub struct MemoryStore {
    appointments: Mutex<Vec<Appointment>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn all(&self) -> Vec<Appointment> {
        self.appointments.lock().await.clone()
    }

    pub async fn set_status(&self, id: Uuid, status: AppointmentStatus) {
        let mut rows = self.appointments.lock().await;
        if let Some(row) = rows.iter_mut().find(|row| row.id == id) {
            row.status = status;
        }
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn occupied_intervals(
        &self,
        barber_id: Uuid,
        window: Interval,
        occupancy: Occupancy,
    ) -> Result<Vec<Interval>, SchedulingError> {
        let rows = self.appointments.lock().await;
        Ok(rows
            .iter()
            .filter(|row| row.barber_id == barber_id)
            .filter(|row| occupancy.statuses().contains(&row.status))
            .map(|row| row.interval())
            .filter(|busy| overlaps(*busy, window))
            .collect())
    }

    async fn commit(&self, booking: NewAppointment) -> Result<Appointment, SchedulingError> {
        let mut rows = self.appointments.lock().await;

        let candidate = Interval::new(booking.start_time, booking.end_time);
        let taken = rows
            .iter()
            .filter(|row| row.barber_id == booking.barber_id)
            .filter(|row| row.status == AppointmentStatus::Scheduled)
            .any(|row| overlaps(candidate, row.interval()));
        if taken {
            return Err(SchedulingError::Conflict);
        }

        let now = Local::now().naive_local();
        let appointment = Appointment {
            id: Uuid::new_v4(),
            barber_id: booking.barber_id,
            barber_service_id: booking.barber_service_id,
            service_id: booking.service_id,
            customer_id: booking.customer_id,
            customer_name: booking.customer_name,
            customer_phone: booking.customer_phone,
            start_time: booking.start_time,
            end_time: booking.end_time,
            status: AppointmentStatus::Scheduled,
            rating: None,
            feedback: None,
            created_at: now,
            updated_at: now,
        };
        rows.push(appointment.clone());
        Ok(appointment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use std::sync::Arc;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 8, 10)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn booking(barber_id: Uuid, start: NaiveDateTime, end: NaiveDateTime) -> NewAppointment {
        NewAppointment {
            barber_id,
            barber_service_id: None,
            service_id: None,
            customer_id: None,
            customer_name: "Pedro".into(),
            customer_phone: "11999990003".into(),
            start_time: start,
            end_time: end,
        }
    }

    #[tokio::test]
    async fn commit_rejects_overlap_and_keeps_invariant() {
        let store = MemoryStore::new();
        let barber = Uuid::new_v4();

        store
            .commit(booking(barber, at(9, 0), at(9, 45)))
            .await
            .unwrap();
        let err = store
            .commit(booking(barber, at(9, 30), at(10, 0)))
            .await
            .unwrap_err();
        assert!(matches!(err, SchedulingError::Conflict));

        // Back-to-back is fine under half-open semantics.
        store
            .commit(booking(barber, at(9, 45), at(10, 15)))
            .await
            .unwrap();

        // Persisted pairwise invariant over all scheduled rows.
        let rows = store.all().await;
        for a in &rows {
            for b in &rows {
                if a.id != b.id {
                    assert!(!overlaps(a.interval(), b.interval()));
                }
            }
        }
    }

    #[tokio::test]
    async fn cancelled_rows_free_the_slot() {
        let store = MemoryStore::new();
        let barber = Uuid::new_v4();

        let first = store
            .commit(booking(barber, at(10, 0), at(10, 30)))
            .await
            .unwrap();
        store.set_status(first.id, AppointmentStatus::Cancelled).await;

        store
            .commit(booking(barber, at(10, 0), at(10, 30)))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn different_barbers_never_contend() {
        let store = MemoryStore::new();

        store
            .commit(booking(Uuid::new_v4(), at(10, 0), at(10, 30)))
            .await
            .unwrap();
        store
            .commit(booking(Uuid::new_v4(), at(10, 0), at(10, 30)))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn occupancy_filter_is_parameterized() {
        let store = MemoryStore::new();
        let barber = Uuid::new_v4();
        let day = Interval::new(at(0, 0), at(23, 59));

        let done = store
            .commit(booking(barber, at(9, 0), at(9, 30)))
            .await
            .unwrap();
        store.set_status(done.id, AppointmentStatus::Completed).await;
        let missed = store
            .commit(booking(barber, at(10, 0), at(10, 30)))
            .await
            .unwrap();
        store.set_status(missed.id, AppointmentStatus::NoShow).await;
        store
            .commit(booking(barber, at(11, 0), at(11, 30)))
            .await
            .unwrap();

        let blocking = store
            .occupied_intervals(barber, day, Occupancy::Blocking)
            .await
            .unwrap();
        assert_eq!(blocking, vec![Interval::new(at(11, 0), at(11, 30))]);

        let historical = store
            .occupied_intervals(barber, day, Occupancy::Historical)
            .await
            .unwrap();
        assert_eq!(historical.len(), 2);
    }

    #[tokio::test]
    async fn concurrent_commits_have_one_winner() {
        let store = Arc::new(MemoryStore::new());
        let barber = Uuid::new_v4();

        let a = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.commit(booking(barber, at(14, 0), at(14, 30))).await })
        };
        let b = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.commit(booking(barber, at(14, 0), at(14, 30))).await })
        };

        let outcomes = [a.await.unwrap(), b.await.unwrap()];
        let wins = outcomes.iter().filter(|r| r.is_ok()).count();
        let conflicts = outcomes
            .iter()
            .filter(|r| matches!(r, Err(SchedulingError::Conflict)))
            .count();

        assert_eq!((wins, conflicts), (1, 1));
        assert_eq!(store.all().await.len(), 1);
    }
}
