use std::collections::BTreeMap;

use duty_rotation::month_grid::Week;
use duty_rotation::Color;
use serde::Serialize;

/// カレンダーに表示する1日分
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayCell {
    pub name: String,
    pub color: Color,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthView {
    pub month: u32, // 1-12
    pub grid: Vec<Week>, // 月曜始まり。0 は月の外
    pub days: BTreeMap<u32, DayCell>, // 日 -> 担当者。割り当てのある日だけ
}

/// 表示用の1年分のカレンダー
#[derive(Debug, Clone, Serialize)]
pub struct YearView {
    pub year: i32,
    pub is_admin: bool,
    pub months: Vec<MonthView>,
}

impl YearView {
    pub fn assigned_days(&self) -> usize {
        self.months.iter().map(|m| m.days.len()).sum()
    }
}

/// 年の初期化の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InitSummary {
    pub year: i32,
    pub coverage_days: usize,
    pub carried_over_days: usize,
    pub replaced: u64,
    pub inserted: u64,
}
