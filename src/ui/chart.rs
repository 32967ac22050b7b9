//! Line chart of daily ridership, drawn with ratatui.

use std::io;

use anyhow::{Context, Result};
use crossterm::tty::IsTty;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Position, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, LegendPosition, Paragraph},
    Frame, Terminal, TerminalOptions, Viewport,
};

use super::format::format_thousands;
use super::theme::Theme;

/// Rows used by the inline chart viewport
pub const DEFAULT_CHART_HEIGHT: u16 = 20;

/// Everything needed to draw one chart: shared x values and labelled y series
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x: Vec<f64>,
    pub series: Vec<(String, Vec<f64>)>,
}

impl ChartSpec {
    /// (label, points) per series. Each series is zipped with the x values
    /// on its own, so it stops at whichever of the two runs out first.
    pub fn lines(&self) -> Vec<(&str, Vec<(f64, f64)>)> {
        self.series
            .iter()
            .map(|(label, ys)| {
                let points = self.x.iter().copied().zip(ys.iter().copied()).collect();
                (label.as_str(), points)
            })
            .collect()
    }
}

/// Something that can display a [`ChartSpec`]
pub trait ChartRenderer {
    fn render(&mut self, chart: &ChartSpec) -> Result<()>;
}

/// Draws charts into an inline viewport below the current output line.
///
/// Drawing returns as soon as the frame is flushed; nothing waits on the chart.
pub struct InlineChartRenderer {
    height: u16,
    theme: Theme,
}

impl InlineChartRenderer {
    pub fn new(height: u16) -> Self {
        InlineChartRenderer {
            height,
            theme: Theme::default(),
        }
    }
}

impl Default for InlineChartRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_CHART_HEIGHT)
    }
}

impl ChartRenderer for InlineChartRenderer {
    fn render(&mut self, chart: &ChartSpec) -> Result<()> {
        if !io::stdout().is_tty() {
            anyhow::bail!("standard output is not a terminal");
        }
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::with_options(
            backend,
            TerminalOptions {
                viewport: Viewport::Inline(self.height),
            },
        )
        .context("Failed to create inline chart viewport")?;

        terminal
            .draw(|frame| {
                let area = frame.area();
                RidershipChart::new(chart, &self.theme).render(frame, area);
                // Leave the cursor on the last chart row so output continues below it
                frame.set_cursor_position(Position::new(0, area.bottom().saturating_sub(1)));
            })
            .context("Failed to draw chart")?;

        println!();
        Ok(())
    }
}

/// Chart widget plotting each station's riders against the day index
pub struct RidershipChart<'a> {
    spec: &'a ChartSpec,
    theme: &'a Theme,
}

impl<'a> RidershipChart<'a> {
    pub fn new(spec: &'a ChartSpec, theme: &'a Theme) -> Self {
        RidershipChart { spec, theme }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let lines = self.spec.lines();
        if lines.iter().all(|(_, points)| points.is_empty()) {
            self.render_empty(frame, area);
            return;
        }

        let mut x_min = f64::MAX;
        let mut x_max = f64::MIN;
        let mut y_min = f64::MAX;
        let mut y_max = f64::MIN;
        for (x, y) in lines.iter().flat_map(|(_, points)| points.iter()) {
            x_min = x_min.min(*x);
            x_max = x_max.max(*x);
            y_min = y_min.min(*y);
            y_max = y_max.max(*y);
        }

        // Ensure we have valid bounds
        if x_min >= x_max {
            x_max = x_min + 1.0;
        }
        if y_min >= y_max {
            y_max = y_min + 1.0;
        }

        // Add some padding to y-axis
        let y_range = y_max - y_min;
        y_min = (y_min - y_range * 0.05).max(0.0);
        y_max += y_range * 0.05;

        let datasets: Vec<Dataset> = lines
            .iter()
            .enumerate()
            .map(|(i, (label, points))| {
                Dataset::default()
                    .name(label.to_string())
                    .marker(Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(self.theme.chart_color(i)))
                    .data(points)
            })
            .collect();

        let x_labels = vec![
            Span::raw(format!("{:.0}", x_min)),
            Span::raw(format!("{:.0}", (x_min + x_max) / 2.0)),
            Span::raw(format!("{:.0}", x_max)),
        ];

        let y_labels = vec![
            Span::raw(format_axis_value(y_min)),
            Span::raw(format_axis_value((y_min + y_max) / 2.0)),
            Span::raw(format_axis_value(y_max)),
        ];

        let chart = Chart::new(datasets)
            .block(self.block())
            .legend_position(Some(LegendPosition::TopRight))
            .hidden_legend_constraints((Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)))
            .x_axis(
                Axis::default()
                    .title(Span::styled(
                        self.spec.x_label.clone(),
                        self.theme.axis_title_style(),
                    ))
                    .style(self.theme.normal_style())
                    .bounds([x_min, x_max])
                    .labels(x_labels),
            )
            .y_axis(
                Axis::default()
                    .title(Span::styled(
                        self.spec.y_label.clone(),
                        self.theme.axis_title_style(),
                    ))
                    .style(self.theme.normal_style())
                    .bounds([y_min, y_max])
                    .labels(y_labels),
            );

        frame.render_widget(chart, area);
    }

    fn block(&self) -> Block<'static> {
        Block::default()
            .title(format!(" {} ", self.spec.title))
            .borders(Borders::ALL)
            .border_style(self.theme.border_style())
            .title_style(self.theme.title_style())
    }

    fn render_empty(&self, frame: &mut Frame, area: Rect) {
        let block = self.block();
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let message = Paragraph::new("No data available")
            .style(Style::default().add_modifier(Modifier::DIM))
            .alignment(Alignment::Center);

        frame.render_widget(message, inner);
    }
}

/// Rider counts on the y-axis are whole numbers
fn format_axis_value(value: f64) -> String {
    format_thousands(value.round() as i64)
}
