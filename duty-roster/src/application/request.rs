// =====================
// Typed requests
// =====================
//
// リクエスト層の文字列はコマンドの前にここで解釈する。
// 日付は `%Y-%m-%d`、名前は前後の空白を取る

use chrono::NaiveDate;
use duty_rotation::{normalize_staff_name, RosterError};
use serde::Serialize;

use crate::error::{AppError, AppResult};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_date(field: &str, raw: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| {
        AppError::InvalidRequest(format!("{field}: expected YYYY-MM-DD, got {raw:?}"))
    })
}

/// 空文字は未指定と同じ
fn optional_name(raw: Option<&str>) -> AppResult<Option<String>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(name) => Ok(Some(normalize_staff_name(name)?)),
    }
}

// --- swap ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SwapRequest {
    pub first: NaiveDate,
    pub second: NaiveDate,
}

impl SwapRequest {
    pub fn parse(first: &str, second: &str) -> AppResult<Self> {
        Ok(Self {
            first: parse_date("date1", first)?,
            second: parse_date("date2", second)?,
        })
    }
}

// --- remove staff ---
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoveStaffRequest {
    pub name: String,
    pub effective_from: NaiveDate,
}

impl RemoveStaffRequest {
    pub fn parse(name: &str, effective_from: &str) -> AppResult<Self> {
        Ok(Self {
            name: normalize_staff_name(name)?,
            effective_from: parse_date("from", effective_from)?,
        })
    }
}

// --- roster update ---
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateRosterRequest {
    pub start_date: NaiveDate,
    pub remove: Option<String>,
    pub add: Option<String>,
}

impl UpdateRosterRequest {
    pub fn parse(start_date: &str, remove: Option<&str>, add: Option<&str>) -> AppResult<Self> {
        Ok(Self {
            start_date: parse_date("start_date", start_date)?,
            remove: optional_name(remove)?,
            add: optional_name(add)?,
        })
    }

    /// `today` より前からは変更できない
    pub fn validate(&self, today: NaiveDate) -> AppResult<()> {
        if self.start_date < today {
            return Err(RosterError::StartDateInPast {
                start: self.start_date,
                today,
            }
            .into());
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.remove.is_none() && self.add.is_none()
    }
}

// --- holiday override ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HolidayRequest {
    pub date: NaiveDate,
    pub is_workday: bool,
}

impl HolidayRequest {
    pub fn parse(date: &str, is_workday: bool) -> AppResult<Self> {
        Ok(Self {
            date: parse_date("date", date)?,
            is_workday,
        })
    }
}
