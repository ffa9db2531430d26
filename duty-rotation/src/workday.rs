use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, Weekday};

/// date -> is_workday。ここにある日付は曜日のルールより優先
pub type HolidayOverrides = HashMap<NaiveDate, bool>;

/// 既定では月-金が勤務日、土日は休み
pub fn is_default_workday(weekday: Weekday) -> bool {
    !matches!(weekday, Weekday::Sat | Weekday::Sun)
}

/// `date` に担当者が必要か
///
/// ```text
///              no override   override(true)   override(false)
/// Mon - Fri    yes           yes              no
/// Sat, Sun     no            yes              no
/// ```
pub fn requires_coverage(date: NaiveDate, overrides: &HolidayOverrides) -> bool {
    match overrides.get(&date) {
        Some(is_workday) => *is_workday,
        None => is_default_workday(date.weekday()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn weekdays_need_coverage_without_overrides() {
        let overrides = HolidayOverrides::new();
        // 2024-01-01 は月曜
        for day in 1..=5 {
            assert!(requires_coverage(d(2024, 1, day), &overrides));
        }
        assert!(!requires_coverage(d(2024, 1, 6), &overrides));
        assert!(!requires_coverage(d(2024, 1, 7), &overrides));
    }

    #[test]
    fn override_wins_in_both_directions() {
        let mut overrides = HolidayOverrides::new();
        overrides.insert(d(2024, 10, 1), false); // Tuesday off
        overrides.insert(d(2024, 10, 12), true); // Saturday on

        assert!(!requires_coverage(d(2024, 10, 1), &overrides));
        assert!(requires_coverage(d(2024, 10, 12), &overrides));
        // 前後の日は曜日のルールに戻る
        assert!(requires_coverage(d(2024, 10, 2), &overrides));
        assert!(!requires_coverage(d(2024, 10, 13), &overrides));
    }

    #[test]
    fn redundant_overrides_change_nothing() {
        let mut overrides = HolidayOverrides::new();
        overrides.insert(d(2024, 1, 2), true);
        overrides.insert(d(2024, 1, 6), false);

        assert!(requires_coverage(d(2024, 1, 2), &overrides));
        assert!(!requires_coverage(d(2024, 1, 6), &overrides));
    }
}
