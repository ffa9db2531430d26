// ローテーションエンジンが作る年間計画

#[cfg(test)]
mod rotation_test {
    use chrono::{Datelike, NaiveDate, Weekday};
    use duty_rotation::{
        plan_year, ContinuationPolicy, DayStatus, HolidayOverrides, RosterError, StaffMember,
    };

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn roster(names: &[&str]) -> Vec<StaffMember> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| StaffMember::new(i as i64 + 1, *name))
            .collect()
    }

    fn weekdays_in(year: i32) -> usize {
        d(year, 1, 1)
            .iter_days()
            .take_while(|date| date.year() == year)
            .filter(|date| !matches!(date.weekday(), Weekday::Sat | Weekday::Sun))
            .count()
    }

    /// 休日設定が無ければ月-金に1人ずつ
    #[test]
    fn assignment_count_matches_weekdays() {
        let staff = roster(&["A", "B", "C"]);
        for year in [2023, 2024, 2025, 2028] {
            let plan = plan_year(year, &staff, &HolidayOverrides::new(), None, None).unwrap();
            assert_eq!(plan.assignments().len(), weekdays_in(year), "year {year}");
        }
        assert_eq!(weekdays_in(2024), 262);
    }

    /// 休日設定で平日を外し、週末を足す
    #[test]
    fn overrides_shape_the_year() {
        let staff = roster(&["A", "B"]);
        let mut overrides = HolidayOverrides::new();
        overrides.insert(d(2024, 10, 1), false); // Tue
        overrides.insert(d(2024, 10, 2), false); // Wed
        overrides.insert(d(2024, 10, 12), true); // Sat

        let plan = plan_year(2024, &staff, &overrides, None, None).unwrap();

        assert!(plan.staff_on(d(2024, 10, 1)).is_none());
        assert!(plan.staff_on(d(2024, 10, 2)).is_none());
        assert!(plan.staff_on(d(2024, 10, 12)).is_some());
        assert_eq!(plan.assignments().len(), weekdays_in(2024) - 2 + 1);
    }

    /// 単純なラウンドロビン: i 番目の勤務日は roster[i % len]
    #[test]
    fn round_robin_without_continuation_member() {
        let staff = roster(&["A", "B", "C", "D"]);
        let mut overrides = HolidayOverrides::new();
        overrides.insert(d(2025, 5, 1), false);
        overrides.insert(d(2025, 5, 3), true);
        let policy = ContinuationPolicy::on_monday("nobody");

        let plan = plan_year(2025, &staff, &overrides, Some(&policy), None).unwrap();

        for (i, assignment) in plan.assignments().iter().enumerate() {
            assert_eq!(assignment.staff_id, staff[i % staff.len()].id, "{}", assignment.date);
        }
        assert_eq!(plan.carried_over_days(), 0);
    }

    /// 日曜が空なら月曜の C はそのまま
    #[test]
    fn continuation_without_previous_day_keeps_candidate() {
        let staff = roster(&["A", "B", "C"]);
        let policy = ContinuationPolicy::on_monday("C");

        let plan = plan_year(2024, &staff, &HolidayOverrides::new(), Some(&policy), None).unwrap();

        // 1日(月)..5日(金) がカーソル 0..4、8日(月) は 5 -> C
        assert_eq!(plan.staff_on(d(2024, 1, 7)), None);
        assert_eq!(plan.staff_on(d(2024, 1, 8)), Some(3));
        assert!(matches!(
            plan.status_on(d(2024, 1, 8)),
            Some(DayStatus::Covered { cursor: 5, carried_over: false, .. })
        ));
    }

    /// 日曜の担当者が月曜の C の番を続ける
    #[test]
    fn continuation_inherits_previous_day() {
        let staff = roster(&["A", "B", "C"]);
        let policy = ContinuationPolicy::on_monday("C");
        let mut overrides = HolidayOverrides::new();
        overrides.insert(d(2024, 1, 5), false); // Fri off
        overrides.insert(d(2024, 1, 7), true); // Sun on

        let plan = plan_year(2024, &staff, &overrides, Some(&policy), None).unwrap();

        // 月 A, 火 B, 水 C, 木 A, 日 B、月曜の候補者は C
        assert_eq!(plan.staff_on(d(2024, 1, 7)), Some(2));
        assert_eq!(plan.staff_on(d(2024, 1, 8)), Some(2));
        assert!(matches!(
            plan.status_on(d(2024, 1, 8)),
            Some(DayStatus::Covered { cursor: 5, carried_over: true, .. })
        ));
        // カーソルは C の分も進んでいる
        assert_eq!(plan.staff_on(d(2024, 1, 9)), Some(1));
    }

    /// 1月1日は前年12月31日を見る
    #[test]
    fn continuation_uses_carry_in_on_new_year() {
        let staff = roster(&["C", "A"]);
        let policy = ContinuationPolicy::on_monday("C");

        // 2024-01-01 は月曜でカーソル0は C
        let with_carry = plan_year(2024, &staff, &HolidayOverrides::new(), Some(&policy), Some(2))
            .unwrap();
        let without = plan_year(2024, &staff, &HolidayOverrides::new(), Some(&policy), None)
            .unwrap();

        assert_eq!(with_carry.staff_on(d(2024, 1, 1)), Some(2));
        assert_eq!(without.staff_on(d(2024, 1, 1)), Some(1));
        // 引き継ぎは1月1日だけ
        assert_eq!(with_carry.staff_on(d(2024, 1, 2)), Some(2));
    }

    /// 名簿から外れた前年の担当者は1月1日に引き継がれない
    #[test]
    fn carry_in_of_removed_staff_is_ignored() {
        let staff = roster(&["C", "A"]);
        let policy = ContinuationPolicy::on_monday("C");

        // id 9 は名簿にいない
        let plan = plan_year(2024, &staff, &HolidayOverrides::new(), Some(&policy), Some(9))
            .unwrap();

        assert_eq!(plan.staff_on(d(2024, 1, 1)), Some(1));
        assert!(matches!(
            plan.status_on(d(2024, 1, 1)),
            Some(DayStatus::Covered { carried_over: false, .. })
        ));
        assert!(plan.assignments().iter().all(|a| a.staff_id != 9));
    }

    /// 2024年の例を別のシミュレーションと突き合わせる
    #[test]
    fn example_2024_against_simulation() {
        let names = ["刘", "谭", "莫", "张", "王"];
        let staff = roster(&names);
        let policy = ContinuationPolicy::on_monday("莫");
        let plan = plan_year(2024, &staff, &HolidayOverrides::new(), Some(&policy), None).unwrap();

        // 週末の勤務が無いので月曜に継ぐ前日は無く、平日を数えるだけになる
        let mut expected = Vec::new();
        let mut count = 0usize;
        let mut date = d(2024, 1, 1);
        while date.year() == 2024 {
            if date.weekday().number_from_monday() <= 5 {
                expected.push((date, names[count % names.len()]));
                count += 1;
            }
            date = date.succ_opt().unwrap();
        }

        let by_id = |id: i64| staff.iter().find(|s| s.id == id).unwrap().name.as_str();
        let actual: Vec<_> = plan
            .assignments()
            .iter()
            .map(|a| (a.date, by_id(a.staff_id)))
            .collect();

        assert_eq!(actual, expected);
        assert_eq!(plan.staff_on(d(2024, 1, 1)).map(by_id), Some("刘"));
        assert_eq!(plan.carried_over_days(), 0);
    }

    #[test]
    fn empty_roster() {
        let r = plan_year(2024, &[], &HolidayOverrides::new(), None, None);
        assert!(matches!(r, Err(RosterError::EmptyRoster)));
    }
}
