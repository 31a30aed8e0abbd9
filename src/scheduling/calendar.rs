use chrono::{NaiveDate, NaiveTime};
use tracing::warn;

use crate::db::models::Barber;

use super::slots::Interval;

const DEFAULT_OPEN: &str = "09:00";
const DEFAULT_CLOSE: &str = "18:00";

/// A barber's bookable window materialized onto a concrete date.
#[derive(Debug, Clone, Copy)]
pub struct DayCalendar {
    pub work: Interval,
    pub break_interval: Option<Interval>,
}

impl DayCalendar {
    /// Derives the working window for `date` from the barber's stored
    /// `"HH:MM"` hours. A missing or malformed calendar falls back to the
    /// default 09:00-18:00 window with no break: a corrupt staff record must
    /// never take availability queries down with it.
    pub fn resolve(barber: &Barber, date: NaiveDate) -> Self {
        let parsed = barber
            .open_time
            .as_deref()
            .and_then(parse_hhmm)
            .zip(barber.close_time.as_deref().and_then(parse_hhmm));

        let (open, close) = match parsed {
            Some(window) => window,
            None => {
                warn!(barber_id = %barber.id, "unparseable working hours, using default window");
                (default_time(DEFAULT_OPEN), default_time(DEFAULT_CLOSE))
            }
        };

        let work = Interval::new(date.and_time(open), date.and_time(close));

        let break_interval = barber
            .break_start
            .as_deref()
            .and_then(parse_hhmm)
            .zip(barber.break_end.as_deref().and_then(parse_hhmm))
            .filter(|(start, end)| start < end)
            .map(|(start, end)| Interval::new(date.and_time(start), date.and_time(end)));

        Self {
            work,
            break_interval,
        }
    }
}

fn parse_hhmm(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M").ok()
}

fn default_time(raw: &str) -> NaiveTime {
    // Both defaults are compile-time constants in HH:MM form.
    parse_hhmm(raw).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, NaiveDateTime};
    use uuid::Uuid;

    fn barber(hours: [Option<&str>; 4]) -> Barber {
        let now = Local::now().naive_local();
        Barber {
            id: Uuid::new_v4(),
            name: "Marcos".into(),
            bio: None,
            avatar_url: None,
            is_active: true,
            open_time: hours[0].map(Into::into),
            close_time: hours[1].map(Into::into),
            break_start: hours[2].map(Into::into),
            break_end: hours[3].map(Into::into),
            created_at: now,
            updated_at: now,
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 10).unwrap()
    }

    fn at(h: u32, m: u32) -> NaiveDateTime {
        date().and_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn resolves_stored_hours_onto_date() {
        let cal = DayCalendar::resolve(
            &barber([Some("08:30"), Some("17:00"), Some("12:00"), Some("13:00")]),
            date(),
        );
        assert_eq!(cal.work, Interval::new(at(8, 30), at(17, 0)));
        assert_eq!(cal.break_interval, Some(Interval::new(at(12, 0), at(13, 0))));
    }

    #[test]
    fn malformed_hours_fall_back_to_default_window() {
        let cal = DayCalendar::resolve(&barber([Some("9h"), Some("18:00"), None, None]), date());
        assert_eq!(cal.work, Interval::new(at(9, 0), at(18, 0)));
        assert_eq!(cal.break_interval, None);
    }

    #[test]
    fn missing_hours_fall_back_to_default_window() {
        let cal = DayCalendar::resolve(&barber([None, None, None, None]), date());
        assert_eq!(cal.work, Interval::new(at(9, 0), at(18, 0)));
    }

    #[test]
    fn bad_break_is_dropped_but_window_survives() {
        // Inverted break
        let cal = DayCalendar::resolve(
            &barber([Some("09:00"), Some("18:00"), Some("13:00"), Some("12:00")]),
            date(),
        );
        assert_eq!(cal.work, Interval::new(at(9, 0), at(18, 0)));
        assert_eq!(cal.break_interval, None);

        // Malformed break end
        let cal = DayCalendar::resolve(
            &barber([Some("09:00"), Some("18:00"), Some("12:00"), Some("noon")]),
            date(),
        );
        assert_eq!(cal.break_interval, None);
    }
}
