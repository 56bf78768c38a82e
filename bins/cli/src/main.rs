//! Burnrate command-line front-end.
//!
//! Drives the cycle store and prints what the pacing engine computes.

mod commands;
mod render;

use std::io;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::{debug, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use burnrate_core::cycle::{Category, CycleRules, Moment};
use burnrate_core::store::{CycleStore, FileStore};
use burnrate_shared::{AppConfig, AppError};

/// Spending-cycle tracker that keeps daily spend on pace.
#[derive(Parser, Debug)]
#[command(name = "burnrate", version, about)]
struct Cli {
    /// Evaluate as of this day instead of the system date (YYYY-MM-DD)
    #[arg(long, global = true)]
    today: Option<NaiveDate>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Archive the active cycle, if any, and start a new one
    Start {
        /// Budget for the whole cycle
        #[arg(long)]
        budget: Decimal,
        /// First day; defaults to the first of the current month
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Last day; defaults to the end of the start month
        #[arg(long)]
        end: Option<NaiveDate>,
    },
    /// Log an expense against the active cycle
    Spend {
        /// Amount spent
        amount: Decimal,
        /// One of food, transport, housing, utilities, health, entertainment, shopping, other
        #[arg(long)]
        category: Option<Category>,
        /// Free-form note
        #[arg(long)]
        comment: Option<String>,
        /// Day of the expense; defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Emergency budget change; negative values decrease it
    Adjust {
        /// Signed change to the budget
        #[arg(allow_hyphen_values = true)]
        delta: Decimal,
    },
    /// Show the pacing snapshot for the active cycle
    Status {
        /// Print the snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the run-out prediction and pace curves
    Details,
    /// List archived cycles
    History,
    /// Forget the active cycle without archiving it
    Reset,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "burnrate=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::load().map_err(AppError::from)?;
    debug!(
        namespace = %config.store.namespace,
        path = %config.store.path.display(),
        "Configuration loaded"
    );

    let backend = FileStore::open(&config.store.path).map_err(AppError::from)?;
    let mut store = CycleStore::new(
        backend,
        config.store.namespace.clone(),
        CycleRules::from(&config.cycle),
    );

    let now = cli.today.map_or_else(Moment::now, Moment::on);
    let mut out = io::stdout().lock();
    commands::execute(cli.command, &mut store, now, &mut out)
}

fn main() -> ExitCode {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_tracing();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "Command failed");
            eprintln!("error: {err}");
            ExitCode::from(err.downcast_ref::<AppError>().map_or(1, AppError::exit_code))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_start_with_dates() {
        let cli = parse(&[
            "burnrate", "start", "--budget", "3000", "--start", "2024-01-01", "--end", "2024-01-31",
        ]);
        match cli.command {
            Command::Start { budget, start, end } => {
                assert_eq!(budget, Decimal::from(3000));
                assert_eq!(start, NaiveDate::from_ymd_opt(2024, 1, 1));
                assert_eq!(end, NaiveDate::from_ymd_opt(2024, 1, 31));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_spend_with_category_and_global_today() {
        let cli = parse(&[
            "burnrate", "spend", "42.50", "--category", "food", "--comment", "lunch", "--today",
            "2024-01-09",
        ]);
        assert_eq!(cli.today, NaiveDate::from_ymd_opt(2024, 1, 9));
        match cli.command {
            Command::Spend {
                amount,
                category,
                comment,
                date,
            } => {
                assert_eq!(amount, Decimal::new(4250, 2));
                assert_eq!(category, Some(Category::Food));
                assert_eq!(comment.as_deref(), Some("lunch"));
                assert_eq!(date, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_negative_adjustment() {
        let cli = parse(&["burnrate", "adjust", "-250"]);
        assert!(matches!(cli.command, Command::Adjust { delta } if delta == Decimal::from(-250)));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(Cli::try_parse_from(["burnrate", "spend", "ten"]).is_err());
        assert!(Cli::try_parse_from(["burnrate", "spend", "10", "--category", "rent"]).is_err());
        assert!(Cli::try_parse_from(["burnrate", "status", "--today", "31/01/2024"]).is_err());
        assert!(Cli::try_parse_from(["burnrate", "start"]).is_err());
    }
}
