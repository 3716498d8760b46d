//! Command-line front end for the tax rate store.
//!
//! # Responsibility
//! - Map subcommands onto `TaxService` calls against one backing file.
//! - Print results to stdout and errors to stderr with a non-zero exit.

use clap::{Parser, Subcommand};
use log::debug;
use rust_decimal::Decimal;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use taxstore_core::{
    default_log_level, init_logging, LoggingError, RepoError, StoreConfig, TaxRecord, TaxService,
    TaxStore, DEFAULT_BACKUP_SUFFIX,
};

#[derive(Debug, Parser)]
#[command(name = "taxstore", version, about = "Manage per-region tax rates")]
struct Cli {
    /// Backing data file.
    #[arg(long, short = 'f')]
    file: PathBuf,

    /// Create a header-only data file when it does not exist.
    #[arg(long)]
    create: bool,

    /// Suffix appended to the data file path for the pre-commit backup.
    #[arg(long, default_value = DEFAULT_BACKUP_SUFFIX)]
    backup_suffix: String,

    /// Absolute directory for rotating log files. Logging is off when omitted.
    #[arg(long)]
    log_dir: Option<String>,

    /// trace|debug|info|warn|error
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List all regions sorted by key.
    List,
    /// Show one region.
    Get { key: String },
    /// Add a new region; fails if the key exists.
    Add {
        key: String,
        name: String,
        #[arg(value_parser = parse_rate)]
        rate: Decimal,
    },
    /// Replace an existing region.
    Update {
        key: String,
        name: String,
        #[arg(value_parser = parse_rate)]
        rate: Decimal,
    },
    /// Change only the rate of an existing region.
    SetRate {
        key: String,
        #[arg(value_parser = parse_rate)]
        rate: Decimal,
    },
    /// Remove a region.
    Remove { key: String },
}

#[derive(Debug)]
enum CliError {
    Logging(LoggingError),
    Repo(RepoError),
    NotFound(String),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Logging(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::NotFound(key) => write!(f, "no tax record for `{key}`"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Logging(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::NotFound(_) => None,
        }
    }
}

impl From<LoggingError> for CliError {
    fn from(value: LoggingError) -> Self {
        Self::Logging(value)
    }
}

impl From<RepoError> for CliError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

fn parse_rate(value: &str) -> Result<Decimal, String> {
    Decimal::from_str(value.trim()).map_err(|err| format!("invalid decimal rate `{value}`: {err}"))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir)?;
    }

    let config = StoreConfig::new(cli.file).with_backup_suffix(cli.backup_suffix);
    debug!(
        "event=cli_start module=cli status=ok path={} create={}",
        config.data_path().display(),
        cli.create
    );
    let store = if cli.create {
        TaxStore::open_or_create(config)?
    } else {
        TaxStore::open(config)?
    };
    let mut service = TaxService::new(store);

    match cli.command {
        Command::List => {
            for record in service.all_rates()? {
                print_record(&record);
            }
        }
        Command::Get { key } => {
            let record = service.rate_for(&key)?.ok_or(CliError::NotFound(key))?;
            print_record(&record);
        }
        Command::Add { key, name, rate } => {
            let record = service.add_rate(key, name, rate)?;
            print_record(&record);
        }
        Command::Update { key, name, rate } => {
            let record = TaxRecord::new(key, name, rate);
            service.update_record(&record)?;
            print_record(&record);
        }
        Command::SetRate { key, rate } => {
            let record = service.change_rate(&key, rate)?;
            print_record(&record);
        }
        Command::Remove { key } => {
            if !service.remove_rate(&key)? {
                return Err(CliError::NotFound(key));
            }
            println!("removed {key}");
        }
    }

    Ok(())
}

fn print_record(record: &TaxRecord) {
    println!(
        "{}\t{}\t{}",
        record.region_key, record.region_name, record.rate
    );
}
