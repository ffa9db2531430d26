use std::path::PathBuf;

use duty_rotation::RosterError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Roster(#[from] RosterError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("failed to set up logging: {0}")]
    Logging(String),

    #[error("administrator permission required")]
    Forbidden,

    #[error("invalid username or password")]
    AuthenticationFailed,

    #[error("password hashing failed: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl AppError {
    /// 利用者が直せる入力側のエラーなら true。それ以外は基盤側の問題
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            AppError::Roster(_)
                | AppError::Forbidden
                | AppError::AuthenticationFailed
                | AppError::InvalidRequest(_)
        )
    }
}

pub type AppResult<T> = Result<T, AppError>;
