//! Interactive command loop.
//!
//! Commands are parsed into [`Command`] before anything runs, so the
//! comparison flow can be driven from tests without a terminal.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::comparison::Comparison;
use crate::console::Console;
use crate::data::{resolve, ResolveError, Station, Storage, SystemStats, Year};
use crate::ui::{format_share, format_thousands, ChartRenderer};

const COMMAND_PROMPT: &str = "Please enter a command (8 to compare, x to exit): ";
const UNKNOWN_COMMAND: &str = "**Error, unknown command, try again...\n";

/// Commands accepted at the main prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Compare two stations' daily ridership over one year
    Compare,
    Exit,
}

/// Input text for each command
const COMMANDS: &[(&str, Command)] = &[("8", Command::Compare), ("x", Command::Exit)];

impl Command {
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        COMMANDS
            .iter()
            .find(|(key, _)| *key == input)
            .map(|(_, command)| *command)
    }
}

/// Whether the loop keeps prompting after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Application state: the database handle plus the I/O collaborators
pub struct App<'a, R, W> {
    storage: &'a Storage,
    console: Console<R, W>,
    renderer: &'a mut dyn ChartRenderer,
}

impl<'a, R: BufRead, W: Write> App<'a, R, W> {
    pub fn new(
        storage: &'a Storage,
        console: Console<R, W>,
        renderer: &'a mut dyn ChartRenderer,
    ) -> Self {
        App {
            storage,
            console,
            renderer,
        }
    }

    /// Print the welcome banner and stats, then serve commands until `x` or EOF
    pub fn run(&mut self) -> Result<()> {
        self.console.say("** Welcome to CTA L analysis app **")?;
        self.console.blank_line()?;
        self.print_stats()?;
        self.console.blank_line()?;

        loop {
            let Some(input) = self.console.prompt(COMMAND_PROMPT)? else {
                debug!("input closed, leaving command loop");
                return Ok(());
            };

            let flow = match Command::parse(&input) {
                Some(command) => self.dispatch(command),
                None => {
                    debug!(input = %input, "unknown command");
                    self.console.say(UNKNOWN_COMMAND)?;
                    Ok(Flow::Continue)
                }
            };

            match flow {
                Ok(Flow::Quit) => return Ok(()),
                Ok(Flow::Continue) => {}
                Err(e) => {
                    warn!(error = %format!("{e:#}"), "command failed");
                    self.console.say(format!("**Error: {e:#}"))?;
                    self.console.blank_line()?;
                }
            }
        }
    }

    fn dispatch(&mut self, command: Command) -> Result<Flow> {
        info!(?command, "running command");
        match command {
            Command::Compare => {
                self.console.blank_line()?;
                self.compare_stations()?;
                self.console.blank_line()?;
                Ok(Flow::Continue)
            }
            Command::Exit => Ok(Flow::Quit),
        }
    }

    fn print_stats(&mut self) -> Result<()> {
        let stats = self
            .storage
            .system_stats()
            .context("Failed to read general stats")?;
        for line in stats_lines(&stats) {
            self.console.say(line)?;
        }
        Ok(())
    }

    /// Ask for a station pattern and resolve it, reporting failures.
    ///
    /// `Ok(None)` means the comparison should stop here.
    fn prompt_station(&mut self, number: usize) -> Result<Option<Station>> {
        let prompt = format!("Enter station {number} (wildcards _ and %): ");
        let Some(pattern) = self.console.prompt(&prompt)? else {
            return Ok(None);
        };
        match resolve(self.storage, &pattern) {
            Ok(station) => Ok(Some(station)),
            Err(ResolveError::Storage(e)) => Err(e),
            Err(e) => {
                if let ResolveError::Ambiguous { matches, .. } = &e {
                    let names: Vec<&str> = matches.iter().map(|s| s.name.as_str()).collect();
                    debug!(?names, "ambiguous station pattern");
                }
                info!(pattern = e.pattern().unwrap_or_default(), reason = %e, "station not resolved");
                self.console.say(e)?;
                Ok(None)
            }
        }
    }

    /// The interactive comparison: year, station 1, station 2, summary, plot
    fn compare_stations(&mut self) -> Result<()> {
        let Some(year_input) = self.console.prompt("Year to compare against? ")? else {
            return Ok(());
        };
        let year = match Year::parse(&year_input) {
            Ok(year) => year,
            Err(e) => {
                self.console.say(format!("**{e}"))?;
                return Ok(());
            }
        };
        self.console.blank_line()?;

        let Some(first) = self.prompt_station(1)? else {
            return Ok(());
        };
        self.console.blank_line()?;
        let Some(second) = self.prompt_station(2)? else {
            return Ok(());
        };

        let comparison = Comparison::build(self.storage, year, &first, &second)?;
        self.console.write(&comparison)?;
        self.console.blank_line()?;

        let Some(answer) = self.console.prompt("Plot? (y/n) ")? else {
            return Ok(());
        };
        if answer == "y" {
            if let Err(e) = self.renderer.render(&comparison.chart()) {
                warn!(error = %format!("{e:#}"), "chart rendering failed");
                self.console.say(format!("**Unable to draw chart: {e:#}"))?;
            }
        }
        Ok(())
    }
}

/// Lines of the startup banner
fn stats_lines(stats: &SystemStats) -> Vec<String> {
    let date_range = match (&stats.first_date, &stats.last_date) {
        (Some(first), Some(last)) => format!("{first} - {last}"),
        _ => "(no ridership)".to_string(),
    };
    let with_share =
        |riders: i64| format!("{} {}", format_thousands(riders), format_share(stats.share(riders)));

    vec![
        "General stats:".to_string(),
        format!("  # of stations: {}", format_thousands(stats.stations)),
        format!("  # of stops: {}", format_thousands(stats.stops)),
        format!("  # of ride entries: {}", format_thousands(stats.ride_entries)),
        format!("  date range: {date_range}"),
        format!("  Total ridership: {}", format_thousands(stats.total_riders)),
        format!("  Weekday ridership: {}", with_share(stats.weekday_riders)),
        format!("  Saturday ridership: {}", with_share(stats.saturday_riders)),
        format!("  Sunday/holiday ridership: {}", with_share(stats.sunday_holiday_riders)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures;
    use crate::ui::ChartSpec;

    #[derive(Default)]
    struct RecordingRenderer {
        charts: Vec<ChartSpec>,
        fail: bool,
    }

    impl ChartRenderer for RecordingRenderer {
        fn render(&mut self, chart: &ChartSpec) -> Result<()> {
            if self.fail {
                anyhow::bail!("no terminal");
            }
            self.charts.push(chart.clone());
            Ok(())
        }
    }

    fn run_session(storage: &Storage, input: &str, renderer: &mut RecordingRenderer) -> String {
        let mut out = Vec::new();
        {
            let console = Console::new(input.as_bytes(), &mut out);
            let mut app = App::new(storage, console, renderer);
            app.run().unwrap();
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_command_parse() {
        assert_eq!(Command::parse("8"), Some(Command::Compare));
        assert_eq!(Command::parse(" 8 "), Some(Command::Compare));
        assert_eq!(Command::parse("x"), Some(Command::Exit));
        assert_eq!(Command::parse("X"), None);
        assert_eq!(Command::parse("1"), None);
        assert_eq!(Command::parse(""), None);
    }

    #[test]
    fn test_full_comparison_with_plot() {
        let storage = fixtures::storage();
        let mut renderer = RecordingRenderer::default();
        let out = run_session(&storage, "8\n2019\nAddison\nBelmont\ny\nx\n", &mut renderer);

        assert!(out.starts_with("** Welcome to CTA L analysis app **\n\nGeneral stats:\n"));
        assert!(out.contains("Year to compare against? \nEnter station 1 (wildcards _ and %): "));
        assert!(out.contains("Station 1: 30091 Addison\n2019-01-01 1060\n"));
        assert!(out.contains("Station 2: 30255 Belmont\n2019-01-01 2010\n"));
        assert!(out.contains("Plot? (y/n) "));

        assert_eq!(renderer.charts.len(), 1);
        let chart = &renderer.charts[0];
        assert_eq!(chart.title, "riders each day of 2019");
        assert_eq!(chart.series[0].0, "Addison");
        assert_eq!(chart.series[1].0, "Belmont");
    }

    #[test]
    fn test_plot_declined() {
        let storage = fixtures::storage();
        let mut renderer = RecordingRenderer::default();
        let out = run_session(&storage, "8\n2019\nAddison\nBelmont\nn\nx\n", &mut renderer);
        assert!(out.contains("Station 2: 30255 Belmont"));
        assert!(renderer.charts.is_empty());
    }

    #[test]
    fn test_not_found_skips_second_prompt() {
        let storage = fixtures::storage();
        let mut renderer = RecordingRenderer::default();
        let out = run_session(&storage, "8\n2019\nZzzz%\nx\n", &mut renderer);

        assert!(out.contains("**No station found..."));
        assert!(!out.contains("Enter station 2"));
        assert!(!out.contains("Station 1:"));
        // loop is still available afterwards
        assert_eq!(out.matches(COMMAND_PROMPT).count(), 2);
    }

    #[test]
    fn test_ambiguous_first_station_aborts() {
        let storage = fixtures::storage();
        let mut renderer = RecordingRenderer::default();
        let out = run_session(&storage, "8\n2019\n%a%\nx\n", &mut renderer);
        assert!(out.contains("**Multiple stations found..."));
        assert!(!out.contains("Enter station 2"));
    }

    #[test]
    fn test_second_station_failure() {
        let storage = fixtures::storage();
        let mut renderer = RecordingRenderer::default();
        let out = run_session(&storage, "8\n2019\nAddison\nZzzz%\nx\n", &mut renderer);
        assert!(out.contains("Enter station 2"));
        assert!(out.contains("**No station found..."));
        assert!(!out.contains("Station 1:"));
        assert!(!out.contains("Plot?"));
    }

    #[test]
    fn test_invalid_year_aborts_before_stations() {
        let storage = fixtures::storage();
        let mut renderer = RecordingRenderer::default();
        let out = run_session(&storage, "8\n19\nx\n", &mut renderer);
        assert!(out.contains("**invalid year"));
        assert!(!out.contains("Enter station 1"));
    }

    #[test]
    fn test_unknown_command_reprompts() {
        let storage = fixtures::storage();
        let mut renderer = RecordingRenderer::default();
        let out = run_session(&storage, "3\nx\n", &mut renderer);
        assert!(out.contains(UNKNOWN_COMMAND));
        assert_eq!(out.matches(COMMAND_PROMPT).count(), 2);
    }

    #[test]
    fn test_eof_ends_loop() {
        let storage = fixtures::storage();
        let mut renderer = RecordingRenderer::default();
        let out = run_session(&storage, "8\n2019\n", &mut renderer);
        assert!(out.contains("Enter station 1"));
        assert!(!out.contains("Station 1:"));
    }

    #[test]
    fn test_chart_failure_keeps_loop_running() {
        let storage = fixtures::storage();
        let mut renderer = RecordingRenderer {
            fail: true,
            ..RecordingRenderer::default()
        };
        let out = run_session(&storage, "8\n2019\nAddison\nBelmont\ny\nx\n", &mut renderer);
        assert!(out.contains("**Unable to draw chart: no terminal"));
        assert_eq!(out.matches(COMMAND_PROMPT).count(), 2);
    }

    #[test]
    fn test_storage_error_keeps_loop_running() {
        let storage = fixtures::storage_without_station_names();
        let mut renderer = RecordingRenderer::default();
        let out = run_session(&storage, "8\n2019\nAddison\nx\n", &mut renderer);

        assert!(out.contains("**Error: "));
        assert!(out.contains("Station_Name"));
        assert!(!out.contains("Enter station 2"));
        assert_eq!(out.matches(COMMAND_PROMPT).count(), 2);
    }

    #[test]
    fn test_missing_rider_counts_still_compare() {
        let storage = fixtures::storage_with_missing_riders();
        let mut renderer = RecordingRenderer::default();
        let out = run_session(&storage, "8\n2019\nAddison\nBelmont\nn\nx\n", &mut renderer);

        assert!(!out.contains("**Error"));
        assert!(out.contains("Station 1: 30091 Addison\n"));
        assert!(out.contains(&format!("{} 0\n", fixtures::MISSING_RIDERS_DATE)));
        assert!(out.contains("Station 2: 30255 Belmont\n"));
    }

    #[test]
    fn test_repeated_comparisons_match() {
        let storage = fixtures::storage();
        let mut renderer = RecordingRenderer::default();
        let out = run_session(
            &storage,
            "8\n2019\nAddison\nBelmont\nn\n8\n2019\nAddison\nBelmont\nn\nx\n",
            &mut renderer,
        );
        let reports: Vec<&str> = out.split("Year to compare against? ").skip(1).collect();
        assert_eq!(reports.len(), 2);
        let first_report = reports[0].split("Plot?").next().unwrap();
        let second_report = reports[1].split("Plot?").next().unwrap();
        assert_eq!(first_report, second_report);
    }

    #[test]
    fn test_stats_banner() {
        let storage = fixtures::storage();
        let stats = storage.system_stats().unwrap();
        let lines = stats_lines(&stats);
        assert_eq!(lines[0], "General stats:");
        assert_eq!(lines[1], "  # of stations: 17");
        assert_eq!(lines[2], "  # of stops: 3");
        assert_eq!(lines[4], "  date range: 2018-12-31 - 2020-01-01");
        assert!(lines[6].starts_with("  Weekday ridership: "));
        assert!(lines[6].ends_with("%)"));
    }

    #[test]
    fn test_stats_banner_without_ridership() {
        let lines = stats_lines(&SystemStats::default());
        assert_eq!(lines[4], "  date range: (no ridership)");
        assert_eq!(lines[5], "  Total ridership: 0");
        assert_eq!(lines[6], "  Weekday ridership: 0 (0.00%)");
    }
}
