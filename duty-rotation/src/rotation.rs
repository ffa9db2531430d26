// --- Year rotation engine ---

use chrono::NaiveDate;

use crate::continuation::ContinuationPolicy;
use crate::error::RosterError;
use crate::model::{Assignment, StaffId, StaffMember};
use crate::workday::{requires_coverage, HolidayOverrides};

/// 勤務日のたびに進むカウンタ。名簿のインデックスとして使う
pub type Cursor = usize;

/// 計画した1日分の状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayStatus {
    Covered {
        cursor: Cursor,
        staff_id: StaffId,
        /// 継続ルールで本来の候補者が置き換えられた日は true
        carried_over: bool,
    },
    Skipped,
}

/// 1年分を走査した結果
///
/// `timeline[i]` は `first_day + i日` の状態。
/// 次に push する日の直前の要素は、常に暦の前日になる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearPlan {
    pub year: i32,
    pub first_day: NaiveDate,
    pub timeline: Vec<DayStatus>,
}

impl YearPlan {
    pub fn status_on(&self, date: NaiveDate) -> Option<&DayStatus> {
        let offset = date.signed_duration_since(self.first_day).num_days();
        if offset < 0 {
            return None;
        }
        self.timeline.get(offset as usize)
    }

    pub fn staff_on(&self, date: NaiveDate) -> Option<StaffId> {
        match self.status_on(date)? {
            DayStatus::Covered { staff_id, .. } => Some(*staff_id),
            DayStatus::Skipped => None,
        }
    }

    /// 保存する行 (日付順)
    pub fn assignments(&self) -> Vec<Assignment> {
        self.first_day
            .iter_days()
            .zip(self.timeline.iter())
            .filter_map(|(date, status)| match status {
                DayStatus::Covered { staff_id, .. } => Some(Assignment {
                    date,
                    staff_id: *staff_id,
                }),
                DayStatus::Skipped => None,
            })
            .collect()
    }

    pub fn coverage_days(&self) -> usize {
        self.timeline
            .iter()
            .filter(|status| matches!(status, DayStatus::Covered { .. }))
            .count()
    }

    pub fn carried_over_days(&self) -> usize {
        self.timeline
            .iter()
            .filter(|status| {
                matches!(
                    status,
                    DayStatus::Covered {
                        carried_over: true,
                        ..
                    }
                )
            })
            .count()
    }

    /// これから push する日の前日の担当者
    fn previous_day_staff(&self, carry_in: Option<StaffId>) -> Option<StaffId> {
        match self.timeline.last() {
            Some(DayStatus::Covered { staff_id, .. }) => Some(*staff_id),
            Some(DayStatus::Skipped) => None,
            // 1月1日: 前日は前年に属する
            None => carry_in,
        }
    }
}

/// `year` の1月1日と12月31日
pub fn year_bounds(year: i32) -> Result<(NaiveDate, NaiveDate), RosterError> {
    let first = NaiveDate::from_ymd_opt(year, 1, 1).ok_or(RosterError::InvalidYear(year))?;
    let last = NaiveDate::from_ymd_opt(year, 12, 31).ok_or(RosterError::InvalidYear(year))?;
    Ok((first, last))
}

/// `year` の勤務日すべてに担当者を1人ずつ割り当てる
///
/// - `roster` は作成順。カーソルでインデックスする
/// - `carry_in` は前年12月31日の担当者。1月1日に継続ルールが効くときだけ使う。
///   `roster` にいない (削除済みの) 担当者は引き継がない
///
/// ```text
/// roster [A, B, C], 継続ルール: 月曜の C
///
///            Fri  Sat  Sun  Mon
/// cursor      4    -    -    5      roster[5 % 3] = C
/// assigned    B    -    -    C      日曜が空なので C のまま
///
///            Thu  Fri* Sat  Sun* Mon     (* override)
/// cursor      3    -    -    4    5
/// assigned    A    -    -    B    B     日曜の B が月曜も続ける
/// ```
pub fn plan_year(
    year: i32,
    roster: &[StaffMember],
    overrides: &HolidayOverrides,
    policy: Option<&ContinuationPolicy>,
    carry_in: Option<StaffId>,
) -> Result<YearPlan, RosterError> {
    if roster.is_empty() {
        return Err(RosterError::EmptyRoster);
    }
    let (first_day, last_day) = year_bounds(year)?;

    // 名簿から外れた人に新しい年の担当は付けない
    let carry_in = carry_in.filter(|id| roster.iter().any(|staff| staff.id == *id));

    let mut plan = YearPlan {
        year,
        first_day,
        timeline: Vec::with_capacity(366),
    };
    let mut cursor: Cursor = 0;

    for date in first_day.iter_days().take_while(|date| *date <= last_day) {
        // 1. 勤務日でなければカーソルはそのまま
        if !requires_coverage(date, overrides) {
            plan.timeline.push(DayStatus::Skipped);
            continue;
        }

        // 2. ラウンドロビンの候補者
        let candidate = &roster[cursor % roster.len()];

        // 3. 継続ルール。前日が空なら候補者に戻る
        let carried = match policy {
            Some(policy) if policy.applies_to(&candidate.name, date) => {
                plan.previous_day_staff(carry_in)
            }
            _ => None,
        };

        let status = match carried {
            Some(staff_id) => DayStatus::Covered {
                cursor,
                staff_id,
                carried_over: true,
            },
            None => DayStatus::Covered {
                cursor,
                staff_id: candidate.id,
                carried_over: false,
            },
        };
        plan.timeline.push(status);

        // 4. どちらの分岐でも勤務日ごとに進める
        cursor += 1;
    }

    Ok(plan)
}
