use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::db::models::{Appointment, AppointmentStatus};

use super::SchedulingError;

/// Authenticated capability attached to a request by the identity boundary.
/// All role branching in the engine happens against this value; handlers
/// never inspect raw roles themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Principal {
    Admin,
    Staff(Uuid),
    Customer(Uuid),
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        matches!(self, Principal::Admin)
    }

    /// Admins manage every calendar; a staff principal only their own.
    pub fn can_manage(&self, barber_id: Uuid) -> bool {
        match self {
            Principal::Admin => true,
            Principal::Staff(id) => *id == barber_id,
            Principal::Customer(_) => false,
        }
    }

    pub fn customer_id(&self) -> Option<Uuid> {
        match self {
            Principal::Customer(id) => Some(*id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Complete,
    NoShow,
    Cancel,
}

/// Validates a status transition and returns the new status without applying
/// it. `scheduled` is the only non-terminal state: once an appointment is
/// completed, cancelled or a no-show, nothing moves it again.
///
/// - `Complete` and `NoShow` need a managing principal and carry no time
///   constraint.
/// - `Cancel` is reserved to the owning customer, and only while the start
///   instant is still in the future.
pub fn authorize_transition(
    principal: &Principal,
    appointment: &Appointment,
    transition: Transition,
    now: NaiveDateTime,
) -> Result<AppointmentStatus, SchedulingError> {
    match transition {
        Transition::Complete | Transition::NoShow => {
            if !principal.can_manage(appointment.barber_id) {
                return Err(SchedulingError::Forbidden(
                    "only the barber or an admin can record the outcome".into(),
                ));
            }
            if appointment.status.is_terminal() {
                return Err(SchedulingError::Forbidden(format!(
                    "appointment is already {} and cannot change",
                    appointment.status.as_str()
                )));
            }
            Ok(match transition {
                Transition::Complete => AppointmentStatus::Completed,
                _ => AppointmentStatus::NoShow,
            })
        }
        Transition::Cancel => {
            let owner = appointment.customer_id.is_some()
                && principal.customer_id() == appointment.customer_id;
            if !owner {
                return Err(SchedulingError::Forbidden(
                    "only the owning customer can cancel".into(),
                ));
            }
            if appointment.status.is_terminal() {
                return Err(SchedulingError::Forbidden(
                    "only scheduled appointments can be cancelled".into(),
                ));
            }
            if appointment.start_time <= now {
                return Err(SchedulingError::PastDeadline);
            }
            Ok(AppointmentStatus::Cancelled)
        }
    }
}

/// Uploading result media documents that the haircut happened; a scheduled
/// appointment is completed as a side effect. Finalized appointments keep
/// their status.
pub fn completes_on_media(status: &AppointmentStatus) -> bool {
    *status == AppointmentStatus::Scheduled
}

/// Post-hoc rating is open to the owning customer once the visit actually
/// took place.
pub fn authorize_rating(
    principal: &Principal,
    appointment: &Appointment,
) -> Result<(), SchedulingError> {
    let owner =
        appointment.customer_id.is_some() && principal.customer_id() == appointment.customer_id;
    if !owner {
        return Err(SchedulingError::Forbidden(
            "only the owning customer can rate".into(),
        ));
    }
    if appointment.status != AppointmentStatus::Completed {
        return Err(SchedulingError::Forbidden(
            "only completed appointments can be rated".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Local, NaiveDateTime};

    fn now() -> NaiveDateTime {
        Local::now().naive_local()
    }

    fn appointment(
        barber_id: Uuid,
        customer_id: Option<Uuid>,
        status: AppointmentStatus,
        start: NaiveDateTime,
    ) -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            barber_id,
            barber_service_id: None,
            service_id: None,
            customer_id,
            customer_name: "Ana".into(),
            customer_phone: "11999990001".into(),
            start_time: start,
            end_time: start + Duration::minutes(30),
            status,
            rating: None,
            feedback: None,
            created_at: now(),
            updated_at: now(),
        }
    }

    #[test]
    fn staff_completes_own_appointment() {
        let barber = Uuid::new_v4();
        let apt = appointment(barber, None, AppointmentStatus::Scheduled, now());

        let status =
            authorize_transition(&Principal::Staff(barber), &apt, Transition::Complete, now())
                .unwrap();
        assert_eq!(status, AppointmentStatus::Completed);
    }

    #[test]
    fn staff_cannot_touch_another_calendar() {
        let apt = appointment(Uuid::new_v4(), None, AppointmentStatus::Scheduled, now());

        let err = authorize_transition(
            &Principal::Staff(Uuid::new_v4()),
            &apt,
            Transition::NoShow,
            now(),
        )
        .unwrap_err();
        assert!(matches!(err, SchedulingError::Forbidden(_)));
    }

    #[test]
    fn no_show_on_completed_is_rejected() {
        // Terminal states are immutable, even for admins.
        let apt = appointment(Uuid::new_v4(), None, AppointmentStatus::Completed, now());

        let err = authorize_transition(&Principal::Admin, &apt, Transition::NoShow, now())
            .unwrap_err();
        assert!(matches!(err, SchedulingError::Forbidden(_)));
    }

    #[test]
    fn customer_cancels_future_appointment() {
        let customer = Uuid::new_v4();
        let apt = appointment(
            Uuid::new_v4(),
            Some(customer),
            AppointmentStatus::Scheduled,
            now() + Duration::hours(2),
        );

        let status = authorize_transition(
            &Principal::Customer(customer),
            &apt,
            Transition::Cancel,
            now(),
        )
        .unwrap();
        assert_eq!(status, AppointmentStatus::Cancelled);
    }

    #[test]
    fn cancel_after_start_is_past_deadline() {
        let customer = Uuid::new_v4();
        let apt = appointment(
            Uuid::new_v4(),
            Some(customer),
            AppointmentStatus::Scheduled,
            now() - Duration::hours(1),
        );

        let err = authorize_transition(
            &Principal::Customer(customer),
            &apt,
            Transition::Cancel,
            now(),
        )
        .unwrap_err();
        assert!(matches!(err, SchedulingError::PastDeadline));
        // The caller leaves the row untouched on error; status is unchanged.
        assert_eq!(apt.status, AppointmentStatus::Scheduled);
    }

    #[test]
    fn cancelling_twice_is_rejected() {
        let customer = Uuid::new_v4();
        let apt = appointment(
            Uuid::new_v4(),
            Some(customer),
            AppointmentStatus::Cancelled,
            now() + Duration::hours(2),
        );

        let err = authorize_transition(
            &Principal::Customer(customer),
            &apt,
            Transition::Cancel,
            now(),
        )
        .unwrap_err();
        assert!(matches!(err, SchedulingError::Forbidden(_)));
    }

    #[test]
    fn other_customer_cannot_cancel() {
        let apt = appointment(
            Uuid::new_v4(),
            Some(Uuid::new_v4()),
            AppointmentStatus::Scheduled,
            now() + Duration::hours(2),
        );

        let err = authorize_transition(
            &Principal::Customer(Uuid::new_v4()),
            &apt,
            Transition::Cancel,
            now(),
        )
        .unwrap_err();
        assert!(matches!(err, SchedulingError::Forbidden(_)));
    }

    #[test]
    fn walk_in_without_account_cannot_be_cancelled_online() {
        let apt = appointment(
            Uuid::new_v4(),
            None,
            AppointmentStatus::Scheduled,
            now() + Duration::hours(2),
        );

        let err = authorize_transition(
            &Principal::Customer(Uuid::new_v4()),
            &apt,
            Transition::Cancel,
            now(),
        )
        .unwrap_err();
        assert!(matches!(err, SchedulingError::Forbidden(_)));
    }

    #[test]
    fn media_completes_only_scheduled() {
        assert!(completes_on_media(&AppointmentStatus::Scheduled));
        assert!(!completes_on_media(&AppointmentStatus::Completed));
        assert!(!completes_on_media(&AppointmentStatus::Cancelled));
        assert!(!completes_on_media(&AppointmentStatus::NoShow));
    }

    #[test]
    fn rating_requires_owner_and_completion() {
        let customer = Uuid::new_v4();
        let done = appointment(
            Uuid::new_v4(),
            Some(customer),
            AppointmentStatus::Completed,
            now(),
        );
        assert!(authorize_rating(&Principal::Customer(customer), &done).is_ok());

        let pending = appointment(
            Uuid::new_v4(),
            Some(customer),
            AppointmentStatus::Scheduled,
            now(),
        );
        assert!(authorize_rating(&Principal::Customer(customer), &pending).is_err());
        assert!(authorize_rating(&Principal::Customer(Uuid::new_v4()), &done).is_err());
        assert!(authorize_rating(&Principal::Admin, &done).is_err());
    }
}
