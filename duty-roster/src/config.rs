use std::path::{Path, PathBuf};

use chrono::Weekday;
use duty_rotation::ContinuationPolicy;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

pub const DEFAULT_CONFIG_FILE: &str = "duty_roster.toml";
pub const DATABASE_URL_ENV: &str = "DUTY_ROSTER_DATABASE_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    pub database_url: String,
    pub log_level: String,
    /// stderr の代わりにこのファイルへ追記
    pub log_file: Option<PathBuf>,
    pub continuation: Option<ContinuationConfig>,
    pub seed: SeedConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContinuationConfig {
    pub staff: String,
    #[serde(default = "default_trigger_weekday")]
    pub weekday: Weekday,
}

fn default_trigger_weekday() -> Weekday {
    Weekday::Mon
}

/// 初回起動時、空の DB に書き込む
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    pub admin_username: String,
    pub admin_password: String,
    pub staff: Vec<String>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            admin_username: "admin".to_string(),
            admin_password: "admin123".to_string(),
            staff: ["刘", "谭", "莫", "张", "王"]
                .iter()
                .map(|name| name.to_string())
                .collect(),
        }
    }
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://duty_roster.db".to_string(),
            log_level: "info".to_string(),
            log_file: None,
            continuation: Some(ContinuationConfig {
                staff: "莫".to_string(),
                weekday: Weekday::Mon,
            }),
            seed: SeedConfig::default(),
        }
    }
}

impl RosterConfig {
    /// `path` を読む。無指定なら作業ディレクトリの `duty_roster.toml`、
    /// それも無ければデフォルト値。
    /// `DUTY_ROSTER_DATABASE_URL` はファイルより優先
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let mut config = match path {
            Some(path) => Self::read(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::read(default_path)?
                } else {
                    Self::default()
                }
            }
        };

        if let Ok(url) = std::env::var(DATABASE_URL_ENV) {
            config.database_url = url;
        }
        Ok(config)
    }

    fn read(path: &Path) -> AppResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| AppError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> AppResult<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn continuation_policy(&self) -> Option<ContinuationPolicy> {
        self.continuation
            .as_ref()
            .map(|c| ContinuationPolicy::new(c.staff.clone(), c.weekday))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = RosterConfig::from_toml_str(
            r#"
            database_url = "sqlite::memory:"

            [continuation]
            staff = "C"
            "#,
        )
        .unwrap();

        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.seed, SeedConfig::default());
        assert_eq!(
            config.continuation_policy(),
            Some(ContinuationPolicy::on_monday("C"))
        );
    }

    #[test]
    fn weekday_and_seed_from_file() {
        let config = RosterConfig::from_toml_str(
            r#"
            [continuation]
            staff = "Z"
            weekday = "Fri"

            [seed]
            staff = ["X", "Y"]
            "#,
        )
        .unwrap();

        assert_eq!(
            config.continuation_policy(),
            Some(ContinuationPolicy::new("Z", Weekday::Fri))
        );
        assert_eq!(config.seed.staff, vec!["X", "Y"]);
        assert_eq!(config.seed.admin_username, "admin");
    }

    #[test]
    fn load_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "log_level = \"debug\"").unwrap();

        let config = RosterConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn missing_explicit_path_is_an_error() {
        let r = RosterConfig::load(Some(Path::new("/definitely/not/here.toml")));
        assert!(matches!(r, Err(AppError::ConfigRead { .. })));
    }

    #[test]
    fn bad_toml() {
        let r = RosterConfig::from_toml_str("log_level = ");
        assert!(matches!(r, Err(AppError::ConfigParse(_))));
    }
}
