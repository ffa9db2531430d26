use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;
use tracing::debug;

use duty_roster_lib::application::commands;
use duty_roster_lib::application::dto::{MonthView, YearView};
use duty_roster_lib::application::request::{
    parse_date, HolidayRequest, RemoveStaffRequest, SwapRequest, UpdateRosterRequest,
};
use duty_roster_lib::application::session::Session;
use duty_roster_lib::application::time;
use duty_roster_lib::config::RosterConfig;
use duty_roster_lib::error::AppError;
use duty_roster_lib::{bootstrap, logging, AppServices};

#[derive(Parser)]
#[command(name = "duty_tools")]
#[command(version = "0.1.0")]
#[command(about = "Duty roster: plan a year, swap days, manage staff", long_about = None)]
struct Cli {
    /// Config file (default: ./duty_roster.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// -v debug, -vv trace
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Administrator name, required for every command that changes data
    #[arg(long, env = "DUTY_ROSTER_USER", global = true)]
    user: Option<String>,

    #[arg(long, env = "DUTY_ROSTER_PASSWORD", hide_env_values = true, global = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the calendar of a year
    Show {
        #[arg(short, long)]
        year: Option<i32>,

        /// Only this month (1-12)
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,

        #[arg(long)]
        json: bool,
    },
    /// (Re)build the schedule of a year from the current roster
    Init {
        #[arg(short, long)]
        year: Option<i32>,
    },
    /// Exchange the staff of two dates (YYYY-MM-DD)
    Swap { date1: String, date2: String },
    /// Add a staff member at the end of the roster
    AddStaff { name: String },
    /// Take a staff member off the roster, dropping their duties from a date on
    RemoveStaff {
        name: String,

        #[arg(long)]
        from: String,
    },
    /// Remove and/or add staff, effective from a date not in the past
    Update {
        #[arg(long)]
        start: String,

        #[arg(long)]
        remove: Option<String>,

        #[arg(long)]
        add: Option<String>,
    },
    /// Holiday and extra workday overrides
    Holiday {
        #[command(subcommand)]
        action: HolidayCommand,
    },
    /// List the active roster in rotation order
    Roster {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum HolidayCommand {
    /// Mark a date as day off, or as workday with --workday
    Set {
        date: String,

        #[arg(long)]
        workday: bool,
    },
    /// Back to the weekday rule
    Clear { date: String },
    List {
        #[arg(short, long)]
        year: Option<i32>,
    },
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// =====================
// Text calendar
// =====================

const CELL_WIDTH: usize = 10;

fn render_month(year: i32, month: &MonthView) -> String {
    let mut out = format!("{year}-{:02}\n", month.month);
    for label in ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"] {
        out.push_str(&format!("{label:<CELL_WIDTH$}"));
    }
    out.push('\n');

    for week in &month.grid {
        for &day in week {
            let cell = match (day, month.days.get(&day)) {
                (0, _) => String::new(),
                (_, Some(cell)) => format!("{day:>2} {}", cell.name),
                (_, None) => format!("{day:>2}"),
            };
            out.push_str(&format!("{cell:<CELL_WIDTH$}"));
        }
        out.push('\n');
    }
    out
}

fn render_year(view: &YearView, only_month: Option<u32>) -> String {
    let mut out = String::new();
    let mut legend = BTreeMap::new();

    for month in view
        .months
        .iter()
        .filter(|m| only_month.is_none_or(|wanted| m.month == wanted))
    {
        out.push_str(&render_month(view.year, month));
        out.push('\n');
        for cell in month.days.values() {
            legend.insert(cell.name.as_str(), cell.color);
        }
    }

    for (name, color) in legend {
        out.push_str(&format!("{color} {name}\n"));
    }
    out
}

// =====================
// Dispatch
// =====================

async fn open_session(services: &AppServices, cli: &Cli) -> anyhow::Result<Session> {
    match (&cli.user, &cli.password) {
        (Some(user), Some(password)) => Ok(commands::login(services, user, password).await?),
        (Some(_), None) => anyhow::bail!("--user given without --password"),
        _ => Ok(Session::anonymous()),
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = RosterConfig::load(cli.config.as_deref()).context("loading configuration")?;
    logging::init(&config, cli.verbose)?;
    debug!(database_url = %config.database_url, "configuration loaded");

    let services = bootstrap(&config).await.context("opening the database")?;
    let session = open_session(&services, &cli).await?;

    match cli.command {
        Commands::Show { year, month, json } => {
            let year = year.unwrap_or_else(time::current_year);
            let view = commands::year_view(&services, &session, year).await?;
            if json {
                print_json(&view)?;
            } else {
                print!("{}", render_year(&view, month));
            }
        }
        Commands::Init { year } => {
            let year = year.unwrap_or_else(time::current_year);
            let summary = commands::initialize_year(&services, &session, year).await?;
            println!(
                "{}: {} days assigned ({} by continuation), {} replaced",
                summary.year, summary.inserted, summary.carried_over_days, summary.replaced
            );
        }
        Commands::Swap { date1, date2 } => {
            let request = SwapRequest::parse(&date1, &date2)?;
            commands::swap_assignments(&services, &session, request).await?;
            println!("swapped {} and {}", request.first, request.second);
        }
        Commands::AddStaff { name } => {
            let row = commands::add_staff(&services, &session, &name).await?;
            println!("added {} (position {})", row.name, row.sort_order);
        }
        Commands::RemoveStaff { name, from } => {
            let request = RemoveStaffRequest::parse(&name, &from)?;
            let removed = commands::remove_staff(&services, &session, request).await?;
            println!(
                "removed {} from {}, {} assignments dropped",
                removed.name, removed.effective_from, removed.deleted_assignments
            );
        }
        Commands::Update { start, remove, add } => {
            let request = UpdateRosterRequest::parse(&start, remove.as_deref(), add.as_deref())?;
            let update = commands::update_roster(&services, &session, &request, time::today()).await?;
            print_json(&update)?;
        }
        Commands::Holiday { action } => match action {
            HolidayCommand::Set { date, workday } => {
                let request = HolidayRequest::parse(&date, workday)?;
                commands::set_holiday(&services, &session, request).await?;
                let kind = if request.is_workday { "workday" } else { "day off" };
                println!("{} is now a {kind}", request.date);
            }
            HolidayCommand::Clear { date } => {
                let date = parse_date("date", &date)?;
                let removed = commands::clear_holiday(&services, &session, date).await?;
                if removed == 0 {
                    println!("no override on {date}");
                } else {
                    println!("override on {date} cleared");
                }
            }
            HolidayCommand::List { year } => {
                let year = year.unwrap_or_else(time::current_year);
                for row in commands::list_holidays(&services, year).await? {
                    let kind = if row.is_workday { "workday" } else { "day off" };
                    println!("{} {kind}", row.date);
                }
            }
        },
        Commands::Roster { json } => {
            let roster = commands::list_roster(&services).await?;
            if json {
                print_json(&roster)?;
            } else {
                for (position, row) in roster.iter().enumerate() {
                    println!("{:>2}. {}", position + 1, row.name);
                }
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            // 2 = the request was refused, 1 = something broke
            match e.downcast_ref::<AppError>() {
                Some(app_error) if app_error.is_user_error() => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            }
        }
    }
}
