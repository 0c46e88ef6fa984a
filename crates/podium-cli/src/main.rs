use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use podium_etl::Config;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "podium", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the database (default: ~/.local/share/podium/orchestra.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Rebuild the roster database from the source files
    ///
    /// Runs the full pipeline:
    ///
    /// - Reads the instrument list, the canonical name list, and the
    ///   assignment list, lowercasing every field
    /// - Parses each free-text name into first/middle/last components
    /// - Moves any existing database aside to <db>.<timestamp>.bak
    /// - Loads instruments, persons, and raw assignments in one transaction
    /// - Links each assignment to every person it matches, by first name or,
    ///   when the assignment's first name is only an initial, by middle name
    ///
    /// Names that fit no known shape and assignments that match nobody are
    /// logged and counted but do not fail the run. A record missing a
    /// required field aborts the load and nothing is written.
    Run {
        /// Instrument list (instrument,section CSV)
        #[arg(long)]
        instruments: Option<PathBuf>,
        /// Canonical name list (one name per line)
        #[arg(long)]
        names: Option<PathBuf>,
        /// Assignment list (name,instrument CSV)
        #[arg(long)]
        assignments: Option<PathBuf>,
    },
    /// Regenerate person/instrument links from the current database
    Reconcile,
    /// List the available reports, or print one
    Report {
        /// Report name (e.g. all_musicians)
        name: Option<String>,
    },
    /// Show row counts and unmatched assignments
    Status,
    /// Show how names are classified and matched
    Parse {
        /// Names to parse
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, clap::Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Print the config file path
    Path,
    /// Create the config file with defaults
    Init,
    /// Print an example config file
    Example,
    /// Print one config value, or the whole file
    Get {
        /// Config key (e.g. database_path)
        key: Option<String>,
    },
}

fn init_logging(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match cli.db {
        Some(db) => Config::load_with_db_path(db)?,
        None => Config::load()?,
    };

    init_logging(&config.log_level);

    let db_path = config.database_path.clone();

    // Ensure database directory exists
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    match cli.command {
        Commands::Run {
            instruments,
            names,
            assignments,
        } => {
            let mut sources = config.sources();
            if let Some(path) = instruments {
                sources.instruments = path;
            }
            if let Some(path) = names {
                sources.names = path;
            }
            if let Some(path) = assignments {
                sources.assignments = path;
            }
            commands::run_pipeline(sources, db_path).await?;
        }
        Commands::Reconcile => {
            commands::run_reconcile(db_path).await?;
        }
        Commands::Report { name } => {
            commands::show_report(&db_path, name.as_deref())?;
        }
        Commands::Status => {
            commands::show_status(&db_path)?;
        }
        Commands::Parse { names } => {
            commands::show_parse(&names);
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show_config(&config)?,
            ConfigAction::Path => commands::config::show_path(),
            ConfigAction::Init => commands::config::init_config()?,
            ConfigAction::Example => commands::config::show_example(),
            ConfigAction::Get { key } => commands::config::get_config(&config, key.as_deref())?,
        },
    }

    Ok(())
}
