use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use validator::{Validate, ValidationError};

/// Working staff member. Hours are kept as `"HH:MM"` time-of-day strings,
/// not tied to a date; the scheduling calendar materializes them per day and
/// tolerates corrupt values, so these invariants are enforced only at the
/// staff-management boundary.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Barber {
    pub id: Uuid,
    pub name: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub is_active: bool,
    pub open_time: Option<String>,
    pub close_time: Option<String>,
    pub break_start: Option<String>,
    pub break_end: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewBarber {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub bio: Option<String>,
    pub open_time: Option<String>,
    pub close_time: Option<String>,
    pub break_start: Option<String>,
    pub break_end: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateBarberPayload {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    #[validate(length(max = 2000))]
    pub bio: Option<String>,
    pub is_active: Option<bool>,
    pub open_time: Option<String>,
    pub close_time: Option<String>,
    pub break_start: Option<String>,
    pub break_end: Option<String>,
}

impl NewBarber {
    /// Cross-field working-hours rules, checked alongside `validate()`.
    pub fn validate_hours(&self) -> Result<(), ValidationError> {
        check_hours(
            self.open_time.as_deref(),
            self.close_time.as_deref(),
            self.break_start.as_deref(),
            self.break_end.as_deref(),
        )
    }
}

impl UpdateBarberPayload {
    pub fn validate_hours(&self) -> Result<(), ValidationError> {
        check_hours(
            self.open_time.as_deref(),
            self.close_time.as_deref(),
            self.break_start.as_deref(),
            self.break_end.as_deref(),
        )
    }
}

/// `open < close`, and any break must sit inside the working window. Only
/// fields present in the payload are checked; cross-field rules apply when
/// both sides are supplied.
fn check_hours(
    open: Option<&str>,
    close: Option<&str>,
    break_start: Option<&str>,
    break_end: Option<&str>,
) -> Result<(), ValidationError> {
    let parse = |raw: &str| -> Result<NaiveTime, ValidationError> {
        NaiveTime::parse_from_str(raw.trim(), "%H:%M")
            .map_err(|_| ValidationError::new("working_hours_format"))
    };

    let open = open.map(parse).transpose()?;
    let close = close.map(parse).transpose()?;
    let break_start = break_start.map(parse).transpose()?;
    let break_end = break_end.map(parse).transpose()?;

    if let (Some(open), Some(close)) = (open, close) {
        if open >= close {
            return Err(ValidationError::new("working_hours_order"));
        }
    }
    match (break_start, break_end) {
        (Some(start), Some(end)) => {
            if start >= end {
                return Err(ValidationError::new("break_order"));
            }
            if let Some(open) = open {
                if start < open {
                    return Err(ValidationError::new("break_outside_window"));
                }
            }
            if let Some(close) = close {
                if end > close {
                    return Err(ValidationError::new("break_outside_window"));
                }
            }
        }
        (Some(_), None) | (None, Some(_)) => {
            return Err(ValidationError::new("break_incomplete"));
        }
        (None, None) => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(hours: [Option<&str>; 4]) -> NewBarber {
        NewBarber {
            name: "Jorge".into(),
            bio: None,
            open_time: hours[0].map(Into::into),
            close_time: hours[1].map(Into::into),
            break_start: hours[2].map(Into::into),
            break_end: hours[3].map(Into::into),
        }
    }

    #[test]
    fn accepts_well_formed_hours() {
        assert!(payload([Some("09:00"), Some("18:00"), Some("12:00"), Some("13:00")])
            .validate_hours()
            .is_ok());
        assert!(payload([Some("08:30"), Some("17:30"), None, None])
            .validate_hours()
            .is_ok());
        assert!(payload([None, None, None, None]).validate_hours().is_ok());
    }

    #[test]
    fn rejects_inverted_or_partial_windows() {
        assert!(payload([Some("18:00"), Some("09:00"), None, None])
            .validate_hours()
            .is_err());
        assert!(payload([Some("09:00"), Some("18:00"), Some("13:00"), Some("12:00")])
            .validate_hours()
            .is_err());
        assert!(payload([Some("09:00"), Some("18:00"), Some("12:00"), None])
            .validate_hours()
            .is_err());
        assert!(payload([Some("09:00"), Some("18:00"), Some("08:00"), Some("08:30")])
            .validate_hours()
            .is_err());
        assert!(payload([Some("nine"), Some("18:00"), None, None])
            .validate_hours()
            .is_err());
    }
}
