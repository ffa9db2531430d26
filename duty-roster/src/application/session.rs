use serde::Serialize;

use crate::error::{AppError, AppResult};

/// 呼び出し元。リクエスト層で作り、コマンドは見るだけ
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Session {
    pub username: Option<String>,
    pub authenticated: bool,
    pub is_admin: bool,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn admin(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            authenticated: true,
            is_admin: true,
        }
    }

    pub fn require_admin(&self) -> AppResult<()> {
        if self.authenticated && self.is_admin {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}
