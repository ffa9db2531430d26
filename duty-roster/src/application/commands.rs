use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use duty_rotation::month_grid::month_grid;
use duty_rotation::{plan_year, year_bounds, RosterError, StaffMember};
use tracing::{debug, info, warn};

use crate::application::dto::{DayCell, InitSummary, MonthView, YearView};
use crate::application::request::{HolidayRequest, RemoveStaffRequest, SwapRequest, UpdateRosterRequest};
use crate::application::session::Session;
use crate::application::time::last_day_of_previous_year;
use crate::domain::models::{HolidayRow, StaffRow};
use crate::error::{AppError, AppResult};
use crate::infrastructure::database::begin_write;
use crate::infrastructure::staff_repo::{RemovedStaff, RosterUpdate};
use crate::infrastructure::{holiday_repo, schedule_repo, staff_repo};
use crate::AppServices;

fn authorize(session: &Session, action: &str) -> AppResult<()> {
    session.require_admin().inspect_err(|_| {
        warn!(action, user = session.username.as_deref().unwrap_or("-"), "forbidden");
    })
}

// --- Session ---
pub async fn login(services: &AppServices, username: &str, password: &str) -> AppResult<Session> {
    let user = services.user.authenticate(username, password).await?;
    info!(username = %user.username, "logged in");
    Ok(Session::admin(user.username))
}

// --- Year ---

/// 現在の名簿で `year` を計画し、保存済みの1年分を置き換える
///
/// 読み込みから置き換えまでを1つの `BEGIN IMMEDIATE` トランザクションで行う。
/// 計画が最後まで出来なければ何も書かない。
pub async fn initialize_year(services: &AppServices, session: &Session, year: i32) -> AppResult<InitSummary> {
    authorize(session, "initialize_year")?;
    let (first_day, last_day) = year_bounds(year)?;
    let _gate = services.write_gate().await;

    // 1. 書き込みロックを先に取る
    let mut tx = begin_write(&services.pool).await?;

    // 2. 作成順の名簿
    let roster: Vec<StaffMember> = staff_repo::list_roster_in(&mut *tx)
        .await?
        .iter()
        .map(StaffRow::to_member)
        .collect();
    if roster.is_empty() {
        return Err(RosterError::EmptyRoster.into());
    }

    // 3. 休日設定と前年12月31日の担当者
    let overrides = holiday_repo::overrides_in(&mut *tx).await?;
    let carry_in = match last_day_of_previous_year(year) {
        Some(date) => schedule_repo::find_by_date_in(&mut *tx, date)
            .await?
            .map(|row| row.staff_id),
        None => None,
    };

    // 4. 計画 (DB には触れない)
    let plan = plan_year(year, &roster, &overrides, services.continuation.as_ref(), carry_in)?;
    debug!(
        year,
        coverage_days = plan.coverage_days(),
        carried_over_days = plan.carried_over_days(),
        "year planned"
    );

    // 5. 置き換えてコミット
    let summary = schedule_repo::replace_range_in(&mut *tx, first_day, last_day, &plan.assignments()).await?;
    tx.commit().await?;

    info!(year, inserted = summary.inserted, replaced = summary.deleted, "year initialized");
    Ok(InitSummary {
        year,
        coverage_days: plan.coverage_days(),
        carried_over_days: plan.carried_over_days(),
        replaced: summary.deleted,
        inserted: summary.inserted,
    })
}

// --- Swap ---
pub async fn swap_assignments(services: &AppServices, session: &Session, request: SwapRequest) -> AppResult<()> {
    authorize(session, "swap")?;
    let _gate = services.write_gate().await;

    services.schedule.swap(request.first, request.second).await?;
    info!(first = %request.first, second = %request.second, "assignments swapped");
    Ok(())
}

// --- Roster ---
pub async fn list_roster(services: &AppServices) -> AppResult<Vec<StaffRow>> {
    services.staff.list_roster().await
}

pub async fn add_staff(services: &AppServices, session: &Session, name: &str) -> AppResult<StaffRow> {
    authorize(session, "add_staff")?;
    let name = duty_rotation::normalize_staff_name(name)?;
    let _gate = services.write_gate().await;

    let row = services.staff.add(&name).await?;
    let color = services.colors.color_for(&row.name);
    info!(name = %row.name, %color, "staff added");
    Ok(row)
}

pub async fn remove_staff(
    services: &AppServices,
    session: &Session,
    request: RemoveStaffRequest,
) -> AppResult<RemovedStaff> {
    authorize(session, "remove_staff")?;
    let _gate = services.write_gate().await;

    let removed = services.staff.remove(&request.name, request.effective_from).await?;
    services.colors.evict(&removed.name);
    info!(
        name = %removed.name,
        from = %removed.effective_from,
        deleted = removed.deleted_assignments,
        "staff removed"
    );
    Ok(removed)
}

/// 削除してから追加する。`request.start_date` から有効で、`today` より前は不可
pub async fn update_roster(
    services: &AppServices,
    session: &Session,
    request: &UpdateRosterRequest,
    today: NaiveDate,
) -> AppResult<RosterUpdate> {
    authorize(session, "update_roster")?;
    request.validate(today)?;
    if request.is_empty() {
        return Err(AppError::InvalidRequest("nothing to remove or add".to_string()));
    }
    let _gate = services.write_gate().await;

    let update = services
        .staff
        .apply_update(request.start_date, request.remove.as_deref(), request.add.as_deref())
        .await?;

    if let Some(removed) = &update.removed {
        services.colors.evict(&removed.name);
    }
    if let Some(added) = &update.added {
        services.colors.color_for(&added.name);
    }
    info!(
        start = %request.start_date,
        removed = ?update.removed.as_ref().map(|r| &r.name),
        added = ?update.added.as_ref().map(|a| &a.name),
        "roster updated"
    );
    Ok(update)
}

// --- Holidays ---
pub async fn set_holiday(services: &AppServices, session: &Session, request: HolidayRequest) -> AppResult<()> {
    authorize(session, "set_holiday")?;
    let _gate = services.write_gate().await;

    services.holiday.set(request.date, request.is_workday).await?;
    info!(date = %request.date, is_workday = request.is_workday, "holiday override set");
    Ok(())
}

pub async fn clear_holiday(services: &AppServices, session: &Session, date: NaiveDate) -> AppResult<u64> {
    authorize(session, "clear_holiday")?;
    let _gate = services.write_gate().await;

    let removed = services.holiday.clear(date).await?;
    info!(%date, removed, "holiday override cleared");
    Ok(removed)
}

pub async fn list_holidays(services: &AppServices, year: i32) -> AppResult<Vec<HolidayRow>> {
    let (first_day, last_day) = year_bounds(year)?;
    services.holiday.list_in_range(first_day, last_day).await
}

// --- Year view ---

/// `year` のカレンダー。匿名セッションでも見られる
pub async fn year_view(services: &AppServices, session: &Session, year: i32) -> AppResult<YearView> {
    let (first_day, last_day) = year_bounds(year)?;

    // 1. データ
    let roster = services.staff.list_roster().await?;
    let rows = services.schedule.find_in_range(first_day, last_day).await?;

    // 2. 色: 初回はこれまでに割り当てられた全員、以降は未登録の名前だけ
    if !services.colors.is_initialized() {
        let referenced = services.schedule.referenced_staff_names().await?;
        let names = roster.iter().map(|s| s.name.as_str()).chain(referenced.iter().map(String::as_str));
        if services.colors.initialize_with(names) {
            debug!("color registry initialized");
        }
    }
    services.colors.ensure_colors(
        roster
            .iter()
            .map(|s| s.name.as_str())
            .chain(rows.iter().map(|r| r.staff_name.as_str())),
    );

    // 3. 月ごとにまとめる
    let mut days_by_month: BTreeMap<u32, BTreeMap<u32, DayCell>> = BTreeMap::new();
    for row in rows {
        let color = services.colors.color_for(&row.staff_name);
        days_by_month.entry(row.date.month()).or_default().insert(
            row.date.day(),
            DayCell {
                name: row.staff_name,
                color,
            },
        );
    }

    let mut months = Vec::with_capacity(12);
    for month in 1..=12 {
        months.push(MonthView {
            month,
            grid: month_grid(year, month)?,
            days: days_by_month.remove(&month).unwrap_or_default(),
        });
    }

    Ok(YearView {
        year,
        is_admin: session.require_admin().is_ok(),
        months,
    })
}
