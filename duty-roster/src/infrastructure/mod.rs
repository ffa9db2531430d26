pub mod database;
pub mod holiday_repo;
pub mod schedule_repo;
pub mod staff_repo;
pub mod user_repo;
