use chrono::NaiveDate;
use duty_rotation::{Assignment, RosterError, StaffId};
use serde::Serialize;
use sqlx::{SqliteConnection, SqlitePool};

use crate::domain::models::ScheduleRow;
use crate::error::AppResult;
use crate::infrastructure::database::begin_write;

pub struct ScheduleRepository {
    pool: SqlitePool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReplaceSummary {
    pub deleted: u64,
    pub inserted: u64,
}

const SELECT_WITH_STAFF: &str = "SELECT s.date AS date, s.staff_id AS staff_id, st.name AS staff_name
     FROM schedules s
     JOIN staff st ON st.id = s.staff_id";

impl ScheduleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// `[from, to]` の中身を `assignments` で置き換える。
    /// エラー時は元の行がそのまま残る
    pub async fn replace_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        assignments: &[Assignment],
    ) -> AppResult<ReplaceSummary> {
        let mut tx = begin_write(&self.pool).await?;
        let summary = replace_range_in(&mut *tx, from, to, assignments).await?;
        tx.commit().await?;
        Ok(summary)
    }

    pub async fn find_by_date(&self, date: NaiveDate) -> AppResult<Option<ScheduleRow>> {
        let mut conn = self.pool.acquire().await?;
        find_by_date_in(&mut *conn, date).await
    }

    /// 両端を含む。日付順
    pub async fn find_in_range(&self, from: NaiveDate, to: NaiveDate) -> AppResult<Vec<ScheduleRow>> {
        let rows = sqlx::query_as::<_, ScheduleRow>(&format!(
            "{SELECT_WITH_STAFF} WHERE s.date BETWEEN ?1 AND ?2 ORDER BY s.date ASC"
        ))
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// 2日分の担当者を入れ替える。両方に行が必要で、
    /// 無ければ最初に見つからなかった日付を返して何も変えない
    pub async fn swap(&self, first: NaiveDate, second: NaiveDate) -> AppResult<()> {
        let mut tx = begin_write(&self.pool).await?;

        let first_staff: Option<StaffId> =
            sqlx::query_scalar("SELECT staff_id FROM schedules WHERE date = ?1")
                .bind(first)
                .fetch_optional(&mut *tx)
                .await?;
        let first_staff = first_staff.ok_or(RosterError::NoAssignment(first))?;

        let second_staff: Option<StaffId> =
            sqlx::query_scalar("SELECT staff_id FROM schedules WHERE date = ?1")
                .bind(second)
                .fetch_optional(&mut *tx)
                .await?;
        let second_staff = second_staff.ok_or(RosterError::NoAssignment(second))?;

        for (date, staff_id) in [(first, second_staff), (second, first_staff)] {
            sqlx::query("UPDATE schedules SET staff_id = ?1 WHERE date = ?2")
                .bind(staff_id)
                .bind(date)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// 割り当てに出てくる全員の名前。削除済みも含む
    pub async fn referenced_staff_names(&self) -> AppResult<Vec<String>> {
        let names = sqlx::query_scalar(
            "SELECT DISTINCT st.name FROM schedules s JOIN staff st ON st.id = s.staff_id ORDER BY st.name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(names)
    }
}

pub async fn find_by_date_in(conn: &mut SqliteConnection, date: NaiveDate) -> AppResult<Option<ScheduleRow>> {
    let row = sqlx::query_as::<_, ScheduleRow>(&format!("{SELECT_WITH_STAFF} WHERE s.date = ?1"))
        .bind(date)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(row)
}

/// 呼び出し側のトランザクション内で、範囲の削除と挿入を行う
pub async fn replace_range_in(
    conn: &mut SqliteConnection,
    from: NaiveDate,
    to: NaiveDate,
    assignments: &[Assignment],
) -> AppResult<ReplaceSummary> {
    // 1. 範囲をクリア
    let deleted = sqlx::query("DELETE FROM schedules WHERE date BETWEEN ?1 AND ?2")
        .bind(from)
        .bind(to)
        .execute(&mut *conn)
        .await?
        .rows_affected();

    // 2. 新しい行を挿入
    let mut inserted = 0;
    for assignment in assignments {
        inserted += sqlx::query("INSERT INTO schedules (date, staff_id) VALUES (?1, ?2)")
            .bind(assignment.date)
            .bind(assignment.staff_id)
            .execute(&mut *conn)
            .await?
            .rows_affected();
    }

    Ok(ReplaceSummary { deleted, inserted })
}
