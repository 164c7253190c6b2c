//! Daily streaks derived from record history.
//!
//! A day counts toward a streak when at least one face-off slot was
//! completed on it. Today is still in progress, so a streak ending yesterday
//! is still current until today is over.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::record::DailyRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakSummary {
    pub current: u32,
    pub longest: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_active: Option<NaiveDate>,
}

/// Compute current and longest streaks as of `today`.
///
/// Records dated after `today` are ignored.
pub fn compute_streaks<'a, I>(records: I, today: NaiveDate) -> StreakSummary
where
    I: IntoIterator<Item = &'a DailyRecord>,
{
    streaks_from_dates(
        records
            .into_iter()
            .filter(|r| r.is_active_day())
            .map(|r| r.date),
        today,
    )
}

/// Same as [`compute_streaks`] over dates already known to be active.
/// Order and duplicates do not matter.
pub fn streaks_from_dates<I>(active_dates: I, today: NaiveDate) -> StreakSummary
where
    I: IntoIterator<Item = NaiveDate>,
{
    let active: BTreeSet<NaiveDate> = active_dates
        .into_iter()
        .filter(|date| *date <= today)
        .collect();

    let mut longest = 0u32;
    let mut run = 0u32;
    let mut prev: Option<NaiveDate> = None;
    for date in &active {
        run = match prev {
            Some(p) if p.succ_opt() == Some(*date) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        prev = Some(*date);
    }

    let last_active = active.iter().next_back().copied();
    let current = match last_active {
        Some(last) if last == today || last.succ_opt() == Some(today) => run,
        _ => 0,
    };

    StreakSummary {
        current,
        longest,
        last_active,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FaceOffSlot;
    use chrono::Utc;

    fn active(y: i32, m: u32, d: u32) -> DailyRecord {
        let mut r = DailyRecord::new(NaiveDate::from_ymd_opt(y, m, d).unwrap());
        r.complete_slot(FaceOffSlot::Dawn, Utc::now());
        r
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn no_records_no_streak() {
        let none: Vec<DailyRecord> = Vec::new();
        assert_eq!(compute_streaks(&none, date(2024, 1, 1)), StreakSummary::default());
    }

    #[test]
    fn consecutive_days_through_today() {
        let records = vec![active(2024, 1, 1), active(2024, 1, 2), active(2024, 1, 3)];
        let s = compute_streaks(&records, date(2024, 1, 3));
        assert_eq!(s.current, 3);
        assert_eq!(s.longest, 3);
        assert_eq!(s.last_active, Some(date(2024, 1, 3)));
    }

    #[test]
    fn yesterday_keeps_streak_alive() {
        let records = vec![active(2024, 1, 1), active(2024, 1, 2)];
        assert_eq!(compute_streaks(&records, date(2024, 1, 3)).current, 2);
        assert_eq!(compute_streaks(&records, date(2024, 1, 4)).current, 0);
    }

    #[test]
    fn gaps_reset_current_but_not_longest() {
        let records = vec![
            active(2024, 2, 27),
            active(2024, 2, 28),
            active(2024, 2, 29),
            active(2024, 3, 1),
            active(2024, 3, 5),
        ];
        let s = compute_streaks(&records, date(2024, 3, 5));
        assert_eq!(s.current, 1);
        assert_eq!(s.longest, 4);
    }

    #[test]
    fn inactive_records_do_not_count() {
        let records = vec![
            active(2024, 1, 1),
            DailyRecord::new(date(2024, 1, 2)),
            active(2024, 1, 3),
        ];
        let s = compute_streaks(&records, date(2024, 1, 3));
        assert_eq!(s.current, 1);
        assert_eq!(s.longest, 1);
    }

    #[test]
    fn future_records_are_ignored() {
        let records = vec![active(2024, 1, 1), active(2024, 1, 9)];
        let s = compute_streaks(&records, date(2024, 1, 2));
        assert_eq!(s.current, 1);
        assert_eq!(s.last_active, Some(date(2024, 1, 1)));
    }

    #[test]
    fn dates_and_records_agree() {
        let records = vec![active(2024, 1, 1), active(2024, 1, 2), active(2024, 1, 4)];
        let dates = [date(2024, 1, 4), date(2024, 1, 1), date(2024, 1, 2), date(2024, 1, 2)];
        assert_eq!(
            streaks_from_dates(dates, date(2024, 1, 5)),
            compute_streaks(&records, date(2024, 1, 5))
        );
    }
}
