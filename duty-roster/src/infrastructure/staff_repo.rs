use chrono::NaiveDate;
use duty_rotation::{RosterError, StaffId};
use serde::Serialize;
use sqlx::{SqliteConnection, SqlitePool};

use crate::domain::models::StaffRow;
use crate::error::AppResult;
use crate::infrastructure::database::begin_write;

pub struct StaffRepository {
    pool: SqlitePool,
}

/// 削除の結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemovedStaff {
    pub staff_id: StaffId,
    pub name: String,
    pub effective_from: NaiveDate,
    pub deleted_assignments: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterUpdate {
    pub removed: Option<RemovedStaff>,
    pub added: Option<StaffRow>,
}

impl StaffRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// 在籍中のメンバーを名簿順で
    pub async fn list_roster(&self) -> AppResult<Vec<StaffRow>> {
        let mut conn = self.pool.acquire().await?;
        list_roster_in(&mut *conn).await
    }

    /// 削除済みも含む
    pub async fn list_all(&self) -> AppResult<Vec<StaffRow>> {
        let rows = sqlx::query_as::<_, StaffRow>(
            "SELECT id, name, sort_order, active FROM staff ORDER BY sort_order ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<StaffRow>> {
        let row = sqlx::query_as::<_, StaffRow>(
            "SELECT id, name, sort_order, active FROM staff WHERE name = ?",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn add(&self, name: &str) -> AppResult<StaffRow> {
        let mut tx = begin_write(&self.pool).await?;
        let row = add_in(&mut *tx, name).await?;
        tx.commit().await?;
        Ok(row)
    }

    /// `effective_from` 以降の割り当てを消してから名簿から外す。
    /// 1つのトランザクションで、この順に行う
    pub async fn remove(&self, name: &str, effective_from: NaiveDate) -> AppResult<RemovedStaff> {
        let mut tx = begin_write(&self.pool).await?;
        let removed = remove_in(&mut *tx, name, effective_from).await?;
        tx.commit().await?;
        Ok(removed)
    }

    /// 削除してから追加。どちらかが失敗すれば両方とも戻す
    pub async fn apply_update(
        &self,
        effective_from: NaiveDate,
        remove: Option<&str>,
        add: Option<&str>,
    ) -> AppResult<RosterUpdate> {
        let mut tx = begin_write(&self.pool).await?;

        let removed = match remove {
            Some(name) => Some(remove_in(&mut *tx, name, effective_from).await?),
            None => None,
        };
        let added = match add {
            Some(name) => Some(add_in(&mut *tx, name).await?),
            None => None,
        };

        tx.commit().await?;
        Ok(RosterUpdate { removed, added })
    }
}

pub async fn list_roster_in(conn: &mut SqliteConnection) -> AppResult<Vec<StaffRow>> {
    let rows = sqlx::query_as::<_, StaffRow>(
        "SELECT id, name, sort_order, active FROM staff WHERE active = 1 ORDER BY sort_order ASC, id ASC",
    )
    .fetch_all(&mut *conn)
    .await?;
    Ok(rows)
}

pub async fn add_in(conn: &mut SqliteConnection, name: &str) -> AppResult<StaffRow> {
    let existing = sqlx::query_as::<_, StaffRow>(
        "SELECT id, name, sort_order, active FROM staff WHERE name = ?",
    )
    .bind(name)
    .fetch_optional(&mut *conn)
    .await?;

    // 再追加は名簿の末尾へ
    let next_order: i64 =
        sqlx::query_scalar("SELECT COALESCE(MAX(sort_order), -1) + 1 FROM staff")
            .fetch_one(&mut *conn)
            .await?;

    let id = match existing {
        Some(row) if row.active => {
            return Err(RosterError::DuplicateStaff(name.to_string()).into());
        }
        Some(row) => {
            sqlx::query("UPDATE staff SET active = 1, sort_order = ? WHERE id = ?")
                .bind(next_order)
                .bind(row.id)
                .execute(&mut *conn)
                .await?;
            row.id
        }
        None => sqlx::query("INSERT INTO staff (name, sort_order, active) VALUES (?, ?, 1)")
            .bind(name)
            .bind(next_order)
            .execute(&mut *conn)
            .await?
            .last_insert_rowid(),
    };

    Ok(StaffRow {
        id,
        name: name.to_string(),
        sort_order: next_order,
        active: true,
    })
}

pub async fn remove_in(
    conn: &mut SqliteConnection,
    name: &str,
    effective_from: NaiveDate,
) -> AppResult<RemovedStaff> {
    let staff_id: Option<StaffId> =
        sqlx::query_scalar("SELECT id FROM staff WHERE name = ? AND active = 1")
            .bind(name)
            .fetch_optional(&mut *conn)
            .await?;
    let staff_id = staff_id.ok_or_else(|| RosterError::StaffNotFound(name.to_string()))?;

    let deleted_assignments = sqlx::query("DELETE FROM schedules WHERE staff_id = ? AND date >= ?")
        .bind(staff_id)
        .bind(effective_from)
        .execute(&mut *conn)
        .await?
        .rows_affected();

    sqlx::query("UPDATE staff SET active = 0 WHERE id = ?")
        .bind(staff_id)
        .execute(&mut *conn)
        .await?;

    Ok(RemovedStaff {
        staff_id,
        name: name.to_string(),
        effective_from,
        deleted_assignments,
    })
}
