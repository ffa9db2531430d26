use bcrypt::{hash, verify, DEFAULT_COST};
use sqlx::SqlitePool;

use tracing::warn;

use crate::domain::models::UserRow;
use crate::error::{AppError, AppResult};

pub struct UserRepository {
    pool: SqlitePool,
    cost: u32,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_cost(pool, DEFAULT_COST)
    }

    /// bcrypt のコスト。テストでは最小値 (4)
    pub fn with_cost(pool: SqlitePool, cost: u32) -> Self {
        Self { pool, cost }
    }

    pub async fn create_user(&self, username: &str, password: &str, is_admin: bool) -> AppResult<i64> {
        let password_hash = hash(password, self.cost)?;
        let id = sqlx::query("INSERT INTO users (username, password_hash, is_admin) VALUES (?1, ?2, ?3)")
            .bind(username)
            .bind(password_hash)
            .bind(is_admin)
            .execute(&self.pool)
            .await?
            .last_insert_rowid();
        Ok(id)
    }

    pub async fn count(&self) -> AppResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// ログインできるのは管理者だけ。
    /// 失敗の理由は区別せず同じエラーを返す
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<UserRow> {
        let user = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, password_hash, is_admin FROM users WHERE username = ?1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        match user {
            Some(user) if user.is_admin && verify(password, &user.password_hash)? => Ok(user),
            _ => {
                warn!(username, "login rejected");
                Err(AppError::AuthenticationFailed)
            }
        }
    }
}

#[cfg(test)]
mod repository_tests {
    use super::*;
    use crate::infrastructure::database::open_in_memory;

    #[tokio::test]
    async fn test_password_is_hashed_and_verified() {
        let pool = open_in_memory().await.unwrap();
        let repo = UserRepository::with_cost(pool.clone(), 4);

        repo.create_user("admin", "admin123", true).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 1);

        let stored: String = sqlx::query_scalar("SELECT password_hash FROM users WHERE username = 'admin'")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_ne!(stored, "admin123");

        let user = repo.authenticate("admin", "admin123").await.unwrap();
        assert_eq!(user.username, "admin");
        assert!(matches!(
            repo.authenticate("admin", "wrong").await,
            Err(AppError::AuthenticationFailed)
        ));
        assert!(matches!(
            repo.authenticate("nobody", "admin123").await,
            Err(AppError::AuthenticationFailed)
        ));
    }

    #[tokio::test]
    async fn test_non_admin_cannot_log_in() {
        let repo = UserRepository::with_cost(open_in_memory().await.unwrap(), 4);
        repo.create_user("viewer", "secret", false).await.unwrap();

        let r = repo.authenticate("viewer", "secret").await;
        assert!(matches!(r, Err(AppError::AuthenticationFailed)));
    }
}
