//! cta-ridership: console reports over the CTA L daily ridership database.
//!
//! The interactive loop prints general stats and serves the station
//! comparison command; `compare` runs one comparison from the command line.

mod app;
mod cli;
mod comparison;
mod console;
mod data;
mod ui;

use std::process::ExitCode;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use cli::{AppConfig, Cli, Commands};
use comparison::CompareError;
use console::Console;
use data::{ResolveError, Storage};
use ui::{ChartRenderer, InlineChartRenderer};

/// Logs go to stderr so they never interleave with report output
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<ExitCode> {
    // Parse CLI arguments
    let cli = Cli::parse_args();
    let config = AppConfig::from_cli(&cli);
    init_logging(config.verbose);

    let storage = match Storage::open(&config.db_path) {
        Ok(storage) => storage,
        Err(e) => {
            eprintln!("{e:#}");
            eprintln!("Specify the database with --db-path or the {} variable", cli::DB_ENV_VAR);
            return Ok(ExitCode::FAILURE);
        }
    };
    let mut renderer = InlineChartRenderer::default();

    match cli.command {
        None => {
            let mut app = app::App::new(&storage, Console::stdio(), &mut renderer);
            app.run()?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Compare {
            year,
            station1,
            station2,
            plot,
            json,
        }) => match comparison::compare(&storage, &station1, &station2, &year) {
            Ok(result) => {
                if json {
                    println!("{}", serde_json::to_string_pretty(&result)?);
                } else {
                    print!("{result}");
                }
                if plot {
                    renderer.render(&result.chart())?;
                }
                Ok(ExitCode::SUCCESS)
            }
            Err(CompareError::Storage(e)) | Err(CompareError::Resolve(ResolveError::Storage(e))) => {
                Err(e)
            }
            Err(e) => {
                println!("{e}");
                Ok(ExitCode::FAILURE)
            }
        },
    }
}
