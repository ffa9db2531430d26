use duty_rotation::{ColorRegistry, ContinuationPolicy};
use sqlx::SqlitePool;
use tokio::sync::{Mutex, MutexGuard};
use tracing::info;

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod logging;

use config::{RosterConfig, SeedConfig};
use error::AppResult;
use infrastructure::holiday_repo::HolidayRepository;
use infrastructure::schedule_repo::ScheduleRepository;
use infrastructure::staff_repo::StaffRepository;
use infrastructure::user_repo::UserRepository;

// コマンドが使うものをまとめたもの
pub struct AppServices {
    pub pool: SqlitePool,
    pub staff: StaffRepository,
    pub schedule: ScheduleRepository,
    pub holiday: HolidayRepository,
    pub user: UserRepository,
    pub colors: ColorRegistry,
    pub continuation: Option<ContinuationPolicy>,
    write_gate: Mutex<()>,
}

impl AppServices {
    pub fn new(pool: SqlitePool, continuation: Option<ContinuationPolicy>) -> Self {
        Self {
            staff: StaffRepository::new(pool.clone()),
            schedule: ScheduleRepository::new(pool.clone()),
            holiday: HolidayRepository::new(pool.clone()),
            user: UserRepository::new(pool.clone()),
            colors: ColorRegistry::new(),
            continuation,
            write_gate: Mutex::new(()),
            pool,
        }
    }

    pub fn with_colors(mut self, colors: ColorRegistry) -> Self {
        self.colors = colors;
        self
    }

    /// 新規ユーザーの bcrypt コスト
    pub fn with_password_cost(mut self, cost: u32) -> Self {
        self.user = UserRepository::with_cost(self.pool.clone(), cost);
        self
    }

    /// 更新系コマンドの間ずっと持つ。プロセス内の書き込みは常に1つ
    pub(crate) async fn write_gate(&self) -> MutexGuard<'_, ()> {
        self.write_gate.lock().await
    }
}

// =====================
// Startup
// =====================

/// 設定の DB を開き、初回なら初期データを入れる
pub async fn bootstrap(config: &RosterConfig) -> AppResult<AppServices> {
    let pool = infrastructure::database::open(&config.database_url).await?;
    let services = AppServices::new(pool, config.continuation_policy());
    seed(&services, &config.seed).await?;
    Ok(services)
}

/// ユーザーが居なければ管理者を、staff が空なら初期名簿を作る。
/// どちらも DB ごとに1回だけ
pub async fn seed(services: &AppServices, seed: &SeedConfig) -> AppResult<()> {
    if services.user.count().await? == 0 {
        services
            .user
            .create_user(&seed.admin_username, &seed.admin_password, true)
            .await?;
        info!(username = %seed.admin_username, "admin user created");
    }

    if services.staff.list_all().await?.is_empty() {
        for name in &seed.staff {
            let name = duty_rotation::normalize_staff_name(name)?;
            services.staff.add(&name).await?;
        }
        info!(count = seed.staff.len(), "initial roster created");
    }
    Ok(())
}
