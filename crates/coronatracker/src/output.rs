//! Output formatting: table, JSON, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! JSON uses serde, plain emits one value per line.

use std::io::{self, IsTerminal, Write};

use chrono::{DateTime, Utc};
use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::{Table, Tabled, builder::Builder, settings::Style};

use coronatracker_core::{Country, FetchResult, PieEntry, Summary};

use crate::cli::{ColorMode, OutputFormat};

// ── Color helpers ────────────────────────────────────────────────────

/// Whether stderr should get color codes.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
    }
}

/// Report a failed refresh the way the app's snackbar does.
pub fn print_fetch_event(result: FetchResult, color: bool) {
    let mut stderr = io::stderr().lock();
    let message = result.message();
    let _ = if color {
        writeln!(stderr, "{}  {}", message.red().bold(), "(retry with --force)".dimmed())
    } else {
        writeln!(stderr, "{message}  (retry with --force)")
    };
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
pub fn render_list<T, R>(
    format: OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Table::new(rows).with(Style::rounded()).to_string()
        }
        OutputFormat::Json => render_json(data),
        OutputFormat::Plain => data.iter().map(&id_fn).collect::<Vec<_>>().join("\n"),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

pub(crate) fn render_json<T: Serialize + ?Sized>(data: &T) -> String {
    serde_json::to_string_pretty(data).expect("serialization should not fail")
}

// ── Summaries ────────────────────────────────────────────────────────

/// A summary as printed: counters, derived active cases and chart slices.
#[derive(Debug, Serialize)]
pub struct SummaryView {
    pub region: String,
    pub confirmed: Option<u64>,
    pub active: Option<u64>,
    pub recovered: Option<u64>,
    pub deaths: Option<u64>,
    pub last_update: Option<DateTime<Utc>>,
    pub chart: Vec<PieEntry>,
}

impl SummaryView {
    /// `chart` is the view model's pie chart for `summary`.
    pub fn new(
        region: impl Into<String>,
        summary: Option<&Summary>,
        chart: Vec<PieEntry>,
    ) -> Self {
        Self {
            region: region.into(),
            confirmed: summary.and_then(|s| s.confirmed),
            active: summary.and_then(Summary::active),
            recovered: summary.and_then(|s| s.recovered),
            deaths: summary.and_then(|s| s.deaths),
            last_update: summary.and_then(|s| s.last_update),
            chart,
        }
    }

    fn rows(&self) -> [(&'static str, String); 6] {
        [
            ("Region", self.region.clone()),
            ("Confirmed", format_count(self.confirmed)),
            ("Active", format_count(self.active)),
            ("Recovered", format_count(self.recovered)),
            ("Deaths", format_count(self.deaths)),
            (
                "Last update",
                self.last_update.map_or_else(
                    || "no data".into(),
                    |at| at.format("%Y-%m-%d %H:%M UTC").to_string(),
                ),
            ),
        ]
    }
}

pub fn render_summary(format: OutputFormat, view: &SummaryView) -> String {
    match format {
        OutputFormat::Table => {
            let mut builder = Builder::default();
            for (label, value) in view.rows() {
                builder.push_record([label.to_owned(), value]);
            }
            let mut table = builder.build();
            table.with(Style::rounded());
            table.to_string()
        }
        OutputFormat::Json => render_json(view),
        OutputFormat::Plain => view
            .rows()
            .iter()
            .map(|(label, value)| format!("{}\t{value}", label.to_lowercase().replace(' ', "_")))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// `1234567` → `1,234,567`; absent counters read "no data".
pub fn format_count(value: Option<u64>) -> String {
    let Some(value) = value else {
        return "no data".into();
    };
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// ── Countries ────────────────────────────────────────────────────────

#[derive(Tabled)]
pub struct CountryRow {
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "ISO2")]
    pub iso2: String,
    #[tabled(rename = "ISO3")]
    pub iso3: String,
}

impl From<&Country> for CountryRow {
    fn from(c: &Country) -> Self {
        Self {
            name: c.name.clone(),
            iso2: c.iso2.clone().unwrap_or_else(|| "-".into()),
            iso3: c.iso3.clone().unwrap_or_else(|| "-".into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_are_grouped() {
        assert_eq!(format_count(Some(0)), "0");
        assert_eq!(format_count(Some(999)), "999");
        assert_eq!(format_count(Some(1_000)), "1,000");
        assert_eq!(format_count(Some(1_234_567)), "1,234,567");
        assert_eq!(format_count(None), "no data");
    }

    #[test]
    fn plain_summary_is_tab_separated() {
        let summary = Summary {
            confirmed: Some(100),
            recovered: Some(40),
            deaths: Some(10),
            last_update: None,
        };
        let chart = PieEntry::from_summary(Some(&summary));
        let view = SummaryView::new("Poland", Some(&summary), chart);
        let text = render_summary(OutputFormat::Plain, &view);
        assert!(text.contains("region\tPoland"));
        assert!(text.contains("active\t50"));
        assert!(text.contains("last_update\tno data"));
    }

    #[test]
    fn missing_summary_renders_no_data() {
        let view = SummaryView::new("Worldwide", None, Vec::new());
        assert!(view.chart.is_empty());
        let text = render_summary(OutputFormat::Table, &view);
        assert!(text.contains("no data"));
    }
}
