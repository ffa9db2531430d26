use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::config::RosterConfig;
use crate::error::{AppError, AppResult};

/// `-v` は少なくとも debug、`-vv` 以上は trace。
/// 設定の方が詳しければ設定を残す
fn level_for(configured: &str, verbose: u8) -> String {
    match verbose {
        0 => configured.to_string(),
        1 => match configured.trim().parse::<LevelFilter>() {
            Ok(level) if level >= LevelFilter::DEBUG => configured.to_string(),
            _ => LevelFilter::DEBUG.to_string(),
        },
        _ => "trace,sqlx=debug".to_string(),
    }
}

/// グローバルな subscriber を登録する。`RUST_LOG` があれば設定より優先
pub fn init(config: &RosterConfig, verbose: u8) -> AppResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level_for(&config.log_level, verbose)))
        .map_err(|e| AppError::Logging(e.to_string()))?;

    let result = match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| AppError::Logging(format!("{}: {}", path.display(), e)))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(verbose >= 2)
            .with_writer(std::io::stderr)
            .try_init(),
    };

    result.map_err(|e| AppError::Logging(e.to_string()))
}
