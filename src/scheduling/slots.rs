use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

/// Candidate starts are aligned to a fixed 30 minute grid regardless of the
/// service duration. A 45 minute service therefore still begins on the half
/// hour, which leaves some non-overlapping windows unoffered on purpose.
pub const SLOT_STEP_MINUTES: i64 = 30;

/// Half-open time range `[start, end)`. The end instant is excluded, so
/// back-to-back appointments do not collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Interval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Interval {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    pub fn with_duration(start: NaiveDateTime, minutes: i64) -> Self {
        Self {
            start,
            end: start + Duration::minutes(minutes),
        }
    }
}

/// Single source of truth for interval collision, used by the availability
/// read path and re-run inside the booking commit.
pub fn overlaps(a: Interval, b: Interval) -> bool {
    a.start < b.end && a.end > b.start
}

/// Enumerates every candidate start `t` inside `work` with
/// `t + duration <= work.end`, advancing by [`SLOT_STEP_MINUTES`]. This is an
/// enumeration, not a search: existing bookings are filtered out later.
pub fn slot_starts(work: Interval, duration_minutes: i64) -> SlotStarts {
    SlotStarts {
        next: work.start,
        work_end: work.end,
        duration: Duration::minutes(duration_minutes.max(0)),
        exhausted: duration_minutes <= 0,
    }
}

pub struct SlotStarts {
    next: NaiveDateTime,
    work_end: NaiveDateTime,
    duration: Duration,
    exhausted: bool,
}

impl Iterator for SlotStarts {
    type Item = NaiveDateTime;

    fn next(&mut self) -> Option<NaiveDateTime> {
        if self.exhausted || self.next + self.duration > self.work_end {
            self.exhausted = true;
            return None;
        }
        let start = self.next;
        self.next += Duration::minutes(SLOT_STEP_MINUTES);
        Some(start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 8, 10)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn overlap_is_half_open() {
        let existing = Interval::new(at(10, 0), at(10, 30));

        // Candidate ending exactly at the existing start is free.
        assert!(!overlaps(Interval::new(at(9, 30), at(10, 0)), existing));
        // Candidate starting exactly at the existing end is free.
        assert!(!overlaps(Interval::new(at(10, 30), at(11, 0)), existing));
        // One shared minute collides.
        assert!(overlaps(Interval::new(at(10, 29), at(10, 59)), existing));
        assert!(overlaps(Interval::new(at(9, 31), at(10, 1)), existing));
    }

    #[test]
    fn overlap_containment_and_identity() {
        let a = Interval::new(at(9, 0), at(12, 0));
        let b = Interval::new(at(10, 0), at(10, 30));
        assert!(overlaps(a, b));
        assert!(overlaps(b, a));
        assert!(overlaps(a, a));
    }

    #[test]
    fn enumerates_full_window_on_grid() {
        let work = Interval::new(at(9, 0), at(11, 0));
        let starts: Vec<_> = slot_starts(work, 30).collect();
        assert_eq!(starts, vec![at(9, 0), at(9, 30), at(10, 0), at(10, 30)]);
    }

    #[test]
    fn last_slot_must_fit_before_close() {
        // 45 minute service on the 30 minute grid: 10:30 would end 11:15.
        let work = Interval::new(at(9, 0), at(11, 0));
        let starts: Vec<_> = slot_starts(work, 45).collect();
        assert_eq!(starts, vec![at(9, 0), at(9, 30), at(10, 0)]);
    }

    #[test]
    fn window_too_small_for_duration() {
        let work = Interval::new(at(9, 0), at(9, 20));
        assert_eq!(slot_starts(work, 30).count(), 0);
    }

    #[test]
    fn nonpositive_duration_yields_nothing() {
        let work = Interval::new(at(9, 0), at(18, 0));
        assert_eq!(slot_starts(work, 0).count(), 0);
        assert_eq!(slot_starts(work, -15).count(), 0);
    }

    #[test]
    fn iterator_is_restartable() {
        let work = Interval::new(at(9, 0), at(12, 0));
        let first: Vec<_> = slot_starts(work, 30).collect();
        let second: Vec<_> = slot_starts(work, 30).collect();
        assert_eq!(first, second);
    }
}
