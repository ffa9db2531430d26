use chrono::NaiveDate;
use duty_rotation::HolidayOverrides;
use sqlx::{SqliteConnection, SqlitePool};

use crate::domain::models::HolidayRow;
use crate::error::AppResult;

pub struct HolidayRepository {
    pool: SqlitePool,
}

impl HolidayRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// `date` の設定を追加、あれば上書き
    pub async fn set(&self, date: NaiveDate, is_workday: bool) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO holidays (date, is_workday) VALUES (?1, ?2)
             ON CONFLICT(date) DO UPDATE SET is_workday = excluded.is_workday",
        )
        .bind(date)
        .bind(is_workday)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// 消した行数 (0 か 1)
    pub async fn clear(&self, date: NaiveDate) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM holidays WHERE date = ?1")
            .bind(date)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn list_in_range(&self, from: NaiveDate, to: NaiveDate) -> AppResult<Vec<HolidayRow>> {
        let rows = sqlx::query_as::<_, HolidayRow>(
            "SELECT date, is_workday FROM holidays WHERE date BETWEEN ?1 AND ?2 ORDER BY date ASC",
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn overrides(&self) -> AppResult<HolidayOverrides> {
        let mut conn = self.pool.acquire().await?;
        overrides_in(&mut *conn).await
    }
}

/// テーブル全体を date -> is_workday で。エンジン1回につき1度だけ読む
pub async fn overrides_in(conn: &mut SqliteConnection) -> AppResult<HolidayOverrides> {
    let rows = sqlx::query_as::<_, HolidayRow>("SELECT date, is_workday FROM holidays")
        .fetch_all(&mut *conn)
        .await?;
    Ok(rows.into_iter().map(|row| (row.date, row.is_workday)).collect())
}
