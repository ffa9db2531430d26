// =====================
// Stored rows
// =====================

use chrono::NaiveDate;
use duty_rotation::{StaffId, StaffMember};
use serde::Serialize;
use sqlx::FromRow;

// --- staff ---
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct StaffRow {
    pub id: StaffId,
    pub name: String,
    pub sort_order: i64,
    /// 名簿から外すと false。過去の割り当てが参照するので行は残す
    pub active: bool,
}

impl StaffRow {
    pub fn to_member(&self) -> StaffMember {
        StaffMember::new(self.id, self.name.clone())
    }
}

// --- schedules joined with staff ---
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct ScheduleRow {
    pub date: NaiveDate,
    pub staff_id: StaffId,
    pub staff_name: String,
}

// --- holidays ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, FromRow)]
pub struct HolidayRow {
    pub date: NaiveDate,
    pub is_workday: bool,
}

// --- users ---
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub is_admin: bool,
}
