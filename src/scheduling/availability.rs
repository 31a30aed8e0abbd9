use chrono::NaiveDateTime;

use super::calendar::DayCalendar;
use super::slots::{overlaps, slot_starts, Interval};

/// Free candidate starts for one day, ascending. Purely computational: the
/// caller supplies the committed occupancy, nothing is locked or reserved,
/// and a returned slot can still be lost to a concurrent booking before the
/// caller commits.
pub fn free_slots(
    calendar: &DayCalendar,
    duration_minutes: i64,
    occupied: &[Interval],
) -> Vec<NaiveDateTime> {
    slot_starts(calendar.work, duration_minutes)
        .filter(|&start| {
            let candidate = Interval::with_duration(start, duration_minutes);
            if let Some(pause) = calendar.break_interval {
                if overlaps(candidate, pause) {
                    return false;
                }
            }
            !occupied.iter().any(|&busy| overlaps(candidate, busy))
        })
        .collect()
}

pub fn format_slot(start: NaiveDateTime) -> String {
    start.format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 8, 10)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn labels(slots: &[NaiveDateTime]) -> Vec<String> {
        slots.iter().copied().map(format_slot).collect()
    }

    #[test]
    fn full_day_with_lunch_break() {
        let calendar = DayCalendar {
            work: Interval::new(at(9, 0), at(18, 0)),
            break_interval: Some(Interval::new(at(12, 0), at(13, 0))),
        };

        let slots = free_slots(&calendar, 30, &[]);
        let got = labels(&slots);

        let mut want = Vec::new();
        for hour in 9..18 {
            if hour == 12 {
                continue;
            }
            want.push(format!("{hour:02}:00"));
            want.push(format!("{hour:02}:30"));
        }
        assert_eq!(got, want);
        assert_eq!(got.len(), 18);
    }

    #[test]
    fn booked_slot_is_excluded_others_untouched() {
        let calendar = DayCalendar {
            work: Interval::new(at(9, 0), at(10, 0)),
            break_interval: None,
        };

        let busy = [Interval::new(at(9, 0), at(9, 30))];
        assert_eq!(labels(&free_slots(&calendar, 30, &busy)), vec!["09:30"]);
    }

    #[test]
    fn longer_service_blocks_grid_neighbours() {
        let calendar = DayCalendar {
            work: Interval::new(at(9, 0), at(12, 0)),
            break_interval: None,
        };

        // A 45 minute appointment at 09:00 runs to 09:45, so the 09:30 grid
        // start collides but 10:00 onward is open.
        let busy = [Interval::new(at(9, 0), at(9, 45))];
        assert_eq!(
            labels(&free_slots(&calendar, 30, &busy)),
            vec!["10:00", "10:30", "11:00", "11:30"]
        );
    }

    #[test]
    fn back_to_back_with_break_boundaries() {
        let calendar = DayCalendar {
            work: Interval::new(at(11, 0), at(14, 0)),
            break_interval: Some(Interval::new(at(12, 0), at(13, 0))),
        };

        // 11:30-12:00 ends exactly at the break start and 13:00 starts
        // exactly at the break end; both sides stay bookable.
        assert_eq!(
            labels(&free_slots(&calendar, 30, &[])),
            vec!["11:00", "11:30", "13:00", "13:30"]
        );
    }
}
