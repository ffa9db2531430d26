use chrono::NaiveDate;
use thiserror::Error;

/// 名簿操作の前提条件エラー
///
/// どれも書き込み前に検出する。受け取った側は保存内容が変わっていないとみなしてよい
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    /// 名簿が空のまま年を初期化した
    #[error("the roster is empty, add staff before initializing a year")]
    EmptyRoster,

    #[error("no assignment on {0}")]
    NoAssignment(NaiveDate),

    #[error("staff member {0:?} already exists")]
    DuplicateStaff(String),

    #[error("staff member {0:?} not found")]
    StaffNotFound(String),

    #[error("staff name must not be empty")]
    InvalidStaffName,

    #[error("year {0} is outside the supported calendar range")]
    InvalidYear(i32),

    #[error("month {0} is not in 1-12")]
    InvalidMonth(u32),

    #[error("start date {start} is earlier than today ({today})")]
    StartDateInPast { start: NaiveDate, today: NaiveDate },
}
