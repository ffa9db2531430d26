use chrono::{Datelike, NaiveDate};

use crate::error::RosterError;

/// カレンダーの1行。月曜始まりで、0 は月の外
pub type Week = [u32; 7];

fn first_of_month(year: i32, month: u32) -> Result<NaiveDate, RosterError> {
    if !(1..=12).contains(&month) {
        return Err(RosterError::InvalidMonth(month));
    }
    NaiveDate::from_ymd_opt(year, month, 1).ok_or(RosterError::InvalidYear(year))
}

pub fn days_in_month(year: i32, month: u32) -> Result<u32, RosterError> {
    let first_day = first_of_month(year, month)?;
    // 翌月の1日。12月は翌年へ
    let next_month = if month == 12 {
        first_of_month(year + 1, 1)?
    } else {
        first_of_month(year, month + 1)?
    };
    Ok(next_month.signed_duration_since(first_day).num_days() as u32)
}

/// 月曜始まりのカレンダーで必要な行数
pub fn weeks_in_month(year: i32, month: u32) -> Result<u32, RosterError> {
    let start_offset = first_of_month(year, month)?.weekday().num_days_from_monday();
    let total_cells = days_in_month(year, month)? + start_offset;
    Ok(total_cells.div_ceil(7))
}

/// 月を月曜始まりの週に並べる
///
/// ```text
///    January 2023
/// Mo Tu We Th Fr Sa Su
///  0  0  0  0  0  0  1
///  2  3  4  5  6  7  8
///  ...
/// 30 31  0  0  0  0  0
/// ```
pub fn month_grid(year: i32, month: u32) -> Result<Vec<Week>, RosterError> {
    let start_offset = first_of_month(year, month)?.weekday().num_days_from_monday() as usize;
    let days = days_in_month(year, month)?;
    let rows = weeks_in_month(year, month)? as usize;

    let mut grid = vec![[0u32; 7]; rows];
    for day in 1..=days {
        let cell = start_offset + (day as usize - 1);
        grid[cell / 7][cell % 7] = day;
    }
    Ok(grid)
}
