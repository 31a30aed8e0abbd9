use chrono::{Duration, NaiveDateTime};
use tracing::info;
use uuid::Uuid;

use crate::db::models::{Appointment, Barber, BarberService, NewAppointment, Service};

use super::store::BookingStore;
use super::SchedulingError;

/// Service reference resolved against the barber's offerings, carrying the
/// duration the booking is priced and sized by.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedService {
    pub barber_service_id: Option<Uuid>,
    pub service_id: Option<Uuid>,
    pub duration_minutes: i64,
}

/// Customer-supplied half of a booking; the rest comes from the directories.
#[derive(Debug, Clone)]
pub struct BookingOrder {
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_id: Option<Uuid>,
    pub start_time: NaiveDateTime,
}

/// Picks the duration source: the barber's own offering wins over a legacy
/// global service, and an offering listed under another barber does not
/// exist as far as this booking is concerned.
pub fn resolve_service(
    barber: &Barber,
    barber_service: Option<&BarberService>,
    legacy: Option<&Service>,
) -> Result<ResolvedService, SchedulingError> {
    let resolved = if let Some(offering) = barber_service {
        if offering.barber_id != barber.id {
            return Err(SchedulingError::NotFound("service for this barber"));
        }
        ResolvedService {
            barber_service_id: Some(offering.id),
            service_id: None,
            duration_minutes: i64::from(offering.duration_minutes),
        }
    } else if let Some(service) = legacy {
        ResolvedService {
            barber_service_id: None,
            service_id: Some(service.id),
            duration_minutes: i64::from(service.duration_minutes),
        }
    } else {
        return Err(SchedulingError::InvalidInput(
            "a service must be provided".into(),
        ));
    };

    if resolved.duration_minutes <= 0 {
        return Err(SchedulingError::InvalidInput(
            "service duration must be positive".into(),
        ));
    }
    Ok(resolved)
}

/// Books the requested interval as one atomic unit: validates the barber,
/// computes the end instant from the service duration, and hands the commit
/// to the store, which re-checks overlap against everything committed in the
/// meantime. A `Conflict` means another request won the slot; the caller
/// should re-query availability.
pub async fn place(
    store: &dyn BookingStore,
    barber: &Barber,
    service: &ResolvedService,
    order: BookingOrder,
) -> Result<Appointment, SchedulingError> {
    if !barber.is_active {
        return Err(SchedulingError::Inactive);
    }

    let end_time = order.start_time + Duration::minutes(service.duration_minutes);
    let appointment = store
        .commit(NewAppointment {
            barber_id: barber.id,
            barber_service_id: service.barber_service_id,
            service_id: service.service_id,
            customer_id: order.customer_id,
            customer_name: order.customer_name,
            customer_phone: order.customer_phone,
            start_time: order.start_time,
            end_time,
        })
        .await?;

    info!(
        appointment_id = %appointment.id,
        barber_id = %barber.id,
        start = %appointment.start_time,
        "appointment booked"
    );
    Ok(appointment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduling::availability::free_slots;
    use crate::scheduling::calendar::DayCalendar;
    use crate::scheduling::slots::Interval;
    use crate::scheduling::store::{MemoryStore, Occupancy};
    use chrono::{Local, NaiveDate, NaiveDateTime};

    fn now() -> NaiveDateTime {
        Local::now().naive_local()
    }

    fn barber(active: bool) -> Barber {
        Barber {
            id: Uuid::new_v4(),
            name: "Rafael".into(),
            bio: None,
            avatar_url: None,
            is_active: active,
            open_time: Some("09:00".into()),
            close_time: Some("18:00".into()),
            break_start: Some("12:00".into()),
            break_end: Some("13:00".into()),
            created_at: now(),
            updated_at: now(),
        }
    }

    fn offering(barber_id: Uuid, duration: i32) -> BarberService {
        BarberService {
            id: Uuid::new_v4(),
            barber_id,
            name: "Corte".into(),
            duration_minutes: duration,
            price: 30.0,
            discount_price: None,
            created_at: now(),
            updated_at: now(),
        }
    }

    fn order(start: NaiveDateTime) -> BookingOrder {
        BookingOrder {
            customer_name: "Lucas".into(),
            customer_phone: "11999990004".into(),
            customer_id: None,
            start_time: start,
        }
    }

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 8, 10)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn offering_of_another_barber_is_not_found() {
        let barber = barber(true);
        let foreign = offering(Uuid::new_v4(), 30);
        let err = resolve_service(&barber, Some(&foreign), None).unwrap_err();
        assert!(matches!(err, SchedulingError::NotFound(_)));
    }

    #[test]
    fn missing_service_is_invalid_input() {
        let err = resolve_service(&barber(true), None, None).unwrap_err();
        assert!(matches!(err, SchedulingError::InvalidInput(_)));
    }

    #[test]
    fn nonpositive_duration_is_invalid_input() {
        let barber = barber(true);
        let broken = offering(barber.id, 0);
        let err = resolve_service(&barber, Some(&broken), None).unwrap_err();
        assert!(matches!(err, SchedulingError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn end_is_start_plus_duration() {
        let store = MemoryStore::new();
        let barber = barber(true);
        let service = resolve_service(&barber, Some(&offering(barber.id, 45)), None).unwrap();

        let apt = place(&store, &barber, &service, order(at(9, 0)))
            .await
            .unwrap();
        assert_eq!(apt.end_time, at(9, 45));
        assert_eq!(apt.end_time - apt.start_time, chrono::Duration::minutes(45));
    }

    #[tokio::test]
    async fn inactive_barber_cannot_be_booked() {
        let store = MemoryStore::new();
        let barber = barber(false);
        let service = resolve_service(&barber, Some(&offering(barber.id, 30)), None).unwrap();

        let err = place(&store, &barber, &service, order(at(9, 0)))
            .await
            .unwrap_err();
        assert!(matches!(err, SchedulingError::Inactive));
    }

    #[tokio::test]
    async fn booked_slot_disappears_from_requery() {
        let store = MemoryStore::new();
        let barber = barber(true);
        let service = resolve_service(&barber, Some(&offering(barber.id, 30)), None).unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 8, 10).unwrap();
        let calendar = DayCalendar::resolve(&barber, date);
        let day = Interval::new(at(0, 0), at(23, 59));

        let before = {
            let occupied = store
                .occupied_intervals(barber.id, day, Occupancy::Blocking)
                .await
                .unwrap();
            free_slots(&calendar, 30, &occupied)
        };
        assert!(before.contains(&at(10, 0)));

        place(&store, &barber, &service, order(at(10, 0)))
            .await
            .unwrap();

        let after = {
            let occupied = store
                .occupied_intervals(barber.id, day, Occupancy::Blocking)
                .await
                .unwrap();
            free_slots(&calendar, 30, &occupied)
        };

        // Exactly the booked slot vanished; everything else is untouched.
        assert!(!after.contains(&at(10, 0)));
        let missing: Vec<_> = before.iter().filter(|s| !after.contains(s)).collect();
        assert_eq!(missing, vec![&at(10, 0)]);
    }
}
