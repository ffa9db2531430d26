use chrono::{Datelike, NaiveDate, Weekday};

/// `weekday` の `staff_name` の番は、前日に担当者が居ればその人が続ける
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContinuationPolicy {
    pub staff_name: String,
    pub weekday: Weekday,
}

impl ContinuationPolicy {
    pub fn new(staff_name: impl Into<String>, weekday: Weekday) -> Self {
        Self {
            staff_name: staff_name.into(),
            weekday,
        }
    }

    pub fn on_monday(staff_name: impl Into<String>) -> Self {
        Self::new(staff_name, Weekday::Mon)
    }

    /// 名前は名簿と同じく完全一致で比べる
    pub fn applies_to(&self, candidate_name: &str, date: NaiveDate) -> bool {
        candidate_name == self.staff_name && date.weekday() == self.weekday
    }
}
