//! Command-line interface argument parsing for cta-ridership.
//!
//! - `cta-ridership` starts the interactive command loop
//! - `cta-ridership compare --year 2019 --station1 Addison --station2 Belmont`
//!   runs a single comparison without prompting

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Default database file name, as shipped with the CTA dataset
pub const DB_FILE_NAME: &str = "CTA2_L_daily_ridership.db";

/// Environment variable that overrides the database location
pub const DB_ENV_VAR: &str = "CTA_DB";

/// Console reports over the CTA L daily ridership database.
#[derive(Parser, Debug)]
#[command(name = "cta-ridership")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the ridership SQLite database
    #[arg(long, global = true)]
    pub db_path: Option<PathBuf>,

    /// Log debug output to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compare two stations' daily ridership within one year
    Compare {
        /// Four-digit year, e.g. 2019
        #[arg(short, long)]
        year: String,

        /// Name pattern for station 1 (wildcards _ and %)
        #[arg(long)]
        station1: String,

        /// Name pattern for station 2 (wildcards _ and %)
        #[arg(long)]
        station2: String,

        /// Draw the chart after the summary
        #[arg(short, long)]
        plot: bool,

        /// Print the comparison as JSON instead of text
        #[arg(long, conflicts_with = "plot")]
        json: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

/// Configuration derived from CLI arguments and the environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub verbose: bool,
}

impl AppConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        AppConfig {
            db_path: resolve_db_path(cli.db_path.clone(), std::env::var_os(DB_ENV_VAR)),
            verbose: cli.verbose,
        }
    }
}

/// Pick the database file: explicit flag, then environment, then the
/// working directory, then the user data directory.
fn resolve_db_path(flag: Option<PathBuf>, env: Option<std::ffi::OsString>) -> PathBuf {
    if let Some(path) = flag {
        return path;
    }
    if let Some(path) = env.filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }
    let local = PathBuf::from(DB_FILE_NAME);
    if local.exists() {
        return local;
    }
    dirs::data_dir()
        .map(|dir| dir.join("cta-ridership").join(DB_FILE_NAME))
        .unwrap_or(local)
}
