// =====================
// Domain model
// =====================

use chrono::NaiveDate;

use crate::error::RosterError;

pub type StaffId = i64;

/// 名簿の1人。並び順 (作成順) はここに持たず、呼び出し側がその順のスライスを渡す
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffMember {
    pub id: StaffId,
    pub name: String,
}

impl StaffMember {
    pub fn new(id: StaffId, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }
}

/// ある日の担当者
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Assignment {
    pub date: NaiveDate,
    pub staff_id: StaffId,
}

/// 前後の空白を取る。以降の比較は大文字小文字を区別する
pub fn normalize_staff_name(raw: &str) -> Result<String, RosterError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(RosterError::InvalidStaffName);
    }
    Ok(name.to_string())
}
