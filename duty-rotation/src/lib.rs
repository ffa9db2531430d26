//! 当番表の純粋なロジック。勤務日の判定、担当者の決定、カレンダーの色。
//! このクレートはストレージに触れない

pub mod color;
pub mod continuation;
pub mod error;
pub mod model;
pub mod month_grid;
pub mod rotation;
pub mod workday;

pub use color::{Color, ColorRegistry};
pub use continuation::ContinuationPolicy;
pub use error::RosterError;
pub use model::{normalize_staff_name, Assignment, StaffId, StaffMember};
pub use rotation::{plan_year, year_bounds, DayStatus, YearPlan};
pub use workday::{requires_coverage, HolidayOverrides};
