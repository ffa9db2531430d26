use chrono::{Datelike, Local, NaiveDate};

/// ホストのローカル日付
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn current_year() -> i32 {
    today().year()
}

/// `year` の前年12月31日。chrono で表せなければ None
pub fn last_day_of_previous_year(year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.checked_sub(1)?, 12, 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn previous_year_end() {
        assert_eq!(
            last_day_of_previous_year(2024),
            NaiveDate::from_ymd_opt(2023, 12, 31)
        );
        assert_eq!(last_day_of_previous_year(i32::MIN), None);
    }
}
