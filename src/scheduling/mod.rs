mod availability;
mod booking;
mod calendar;
mod lifecycle;
mod slots;
mod store;

pub use availability::{format_slot, free_slots};
pub use booking::{place, resolve_service, BookingOrder, ResolvedService};
pub use calendar::DayCalendar;
pub use lifecycle::{authorize_rating, authorize_transition, completes_on_media, Principal, Transition};
pub use slots::{overlaps, slot_starts, Interval, SLOT_STEP_MINUTES};
pub use store::{BookingStore, MemoryStore, Occupancy};

use thiserror::Error;

/// Failure taxonomy of the scheduling engine. Terminal user errors are
/// reported immediately and never retried; `Conflict` is expected under
/// contention and the caller is supposed to re-query availability.
#[derive(Debug, Error)]
pub enum SchedulingError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    InvalidInput(String),

    #[error("barber is not available for booking")]
    Inactive,

    #[error("slot already taken")]
    Conflict,

    #[error("{0}")]
    Forbidden(String),

    #[error("appointment start time has already passed")]
    PastDeadline,

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}
