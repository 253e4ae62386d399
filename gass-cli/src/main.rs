use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{ArgAction, Args, Parser, Subcommand};
use gass_core::range::DateRange;
use gass_core::time::{format_local, parse_iso_date};
use gass_finance::SettlementReport;
use gass_ingest::{Dataset, list_datasets, load_ledger, select_dataset};
use rust_decimal::Decimal;
use std::io;
use std::path::{Path, PathBuf};

mod config;
mod logging;
mod prompt;
mod rate;
mod report_writer;
mod state;

use config::Config;

#[derive(Parser, Debug)]
#[command(
    name = "gass",
    version,
    about = "Global Assets Settlement: settle reward ledgers into USDT and VES payouts"
)]
struct Cli {
    /// Config file (default: ~/.gass/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More diagnostics on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Defaults to `settle` with every value prompted for
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Settle one account for a date range and save the report
    Settle(SettleArgs),

    /// List the account datasets available for settlement
    Datasets {
        /// Directory holding the account ledgers (default from config)
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },

    /// Look up the official BCV rate and print it
    Rate,

    /// Configuration file commands
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Args, Debug, Default)]
struct SettleArgs {
    /// Account number from the listing, or the dataset name
    #[arg(long)]
    account: Option<String>,

    /// First settled day (YYYY-MM-DD, inclusive)
    #[arg(long, value_parser = parse_date_arg)]
    start: Option<NaiveDate>,

    /// Last settled day (YYYY-MM-DD, inclusive)
    #[arg(long, value_parser = parse_date_arg)]
    end: Option<NaiveDate>,

    /// Official rate in VES/USD; skips the online lookup
    #[arg(long, value_parser = parse_rate_arg)]
    rate: Option<Decimal>,

    /// Do not try the online lookup; ask for the rate directly
    #[arg(long)]
    no_fetch: bool,

    /// Directory holding the account ledgers (default from config)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Directory for saved reports (default from config)
    #[arg(long)]
    reports_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config file if none exists
    Init,
    /// Print the effective configuration
    Show,
}

fn parse_date_arg(s: &str) -> std::result::Result<NaiveDate, String> {
    parse_iso_date(s).map_err(|e| e.to_string())
}

fn parse_rate_arg(s: &str) -> std::result::Result<Decimal, String> {
    rate::parse_positive_rate(s).map_err(|e| e.to_string())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose)?;

    let config_path = cli.config.as_deref();

    match cli.command.unwrap_or(Command::Settle(SettleArgs::default())) {
        Command::Settle(args) => {
            let cfg = config::load_config(config_path)?;
            run_settle(&cfg, args).await?;
        }

        Command::Datasets { data_dir } => {
            let cfg = config::load_config(config_path)?;
            let dir = data_dir.unwrap_or(cfg.paths.data_dir);
            let datasets = list_datasets(&dir)?;
            print_datasets(&datasets);
        }

        Command::Rate => {
            let cfg = config::load_config(config_path)?;
            let rate = rate::fetch_official_rate(&cfg.rate).await?;
            println!("Official Rate: {rate} VES/USD");
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config(config_path)?,
            ConfigCommand::Show => {
                let cfg = config::load_config(config_path)?;
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

fn print_datasets(datasets: &[Dataset]) {
    println!("\n--- Available Accounts for Settlement ---");
    for (i, ds) in datasets.iter().enumerate() {
        println!("{}. {}", i + 1, ds.file_name);
    }
}

async fn run_settle(cfg: &Config, args: SettleArgs) -> Result<()> {
    let official_rate = rate::resolve_official_rate(
        &cfg.rate,
        args.rate,
        args.no_fetch,
        &mut io::stdin().lock(),
        &mut io::stdout(),
    )
    .await?;

    let data_dir = args.data_dir.unwrap_or_else(|| cfg.paths.data_dir.clone());
    let reports_dir = args.reports_dir.unwrap_or_else(|| cfg.paths.reports_dir.clone());

    let datasets = list_datasets(&data_dir)?;
    let choice = match args.account {
        Some(choice) => choice,
        None => {
            print_datasets(&datasets);
            println!();
            prompt::stdin_line("Select account number to process")?
        }
    };
    let dataset = select_dataset(&datasets, &choice)?;
    tracing::info!(account = %dataset.account_id, file = %dataset.path.display(), "dataset selected");

    let records = load_ledger(&dataset.path)
        .with_context(|| format!("loading {}", dataset.path.display()))?;

    let range = settlement_range(args.start, args.end)?;
    let generated_at = format_local(Utc::now(), &cfg.report.timezone)?;

    let report = SettlementReport::build(
        &dataset.account_id,
        &records,
        range,
        official_rate,
        generated_at,
    )?;

    let path = state::report_path(&reports_dir, &report.file_name())?;
    report_writer::write_report(&report.lines(), &path)?;

    println!("\nReport saved at:\n{}", display_path(&path));
    Ok(())
}

/// Dates given on the command line must be valid as-is; prompted dates are
/// re-asked until they form a range.
fn settlement_range(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<DateRange> {
    let start = match start {
        Some(d) => d,
        None => prompt::stdin_until("Settlement Start Date (YYYY-MM-DD)", parse_iso_date)?,
    };

    match end {
        Some(end) => DateRange::new(start, end),
        None => prompt::stdin_until("Settlement End Date (YYYY-MM-DD)", |s| {
            DateRange::new(start, parse_iso_date(s)?)
        }),
    }
}

fn display_path(path: &Path) -> String {
    if path.is_relative() {
        format!("./{}", path.display())
    } else {
        path.display().to_string()
    }
}
