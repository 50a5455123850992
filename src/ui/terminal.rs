//! Terminal implementations of the collaborator traits.
//!
//! Progress goes to stderr through indicatif, tables and results to stdout.

use std::fmt::Write as _;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use super::{Analytics, AssetListRenderer, LoadingIndicator, Modal, Notifier, UploadView};
use crate::listing::ListingView;
use crate::paging::Direction;

/// Width of error box separators.
const ERROR_BOX_WIDTH: usize = 60;

const SPINNER_TICK: Duration = Duration::from_millis(80);

/// Print an error box with a title and optional body.
///
/// ```text
/// ============================================================
/// Your file could not be uploaded
/// ============================================================
///
/// File lecture.mp4 exceeds maximum size of 10 MB
/// ```
pub fn print_error_box(title: &str, body: Option<&str>) {
    eprintln!("\n{}", "=".repeat(ERROR_BOX_WIDTH));
    eprintln!("{title}");
    eprintln!("{}", "=".repeat(ERROR_BOX_WIDTH));

    if let Some(body) = body
        && !body.is_empty()
    {
        eprintln!("\n{body}");
    }
}

/// Spinner shown while a listing fetch is outstanding.
#[derive(Debug, Default)]
pub struct TerminalLoading {
    spinner: Option<ProgressBar>,
}

impl LoadingIndicator for TerminalLoading {
    fn show(&mut self) {
        if self.spinner.is_some() {
            return;
        }
        let spinner = ProgressBar::new_spinner();
        spinner.set_message("Loading assets...");
        spinner.enable_steady_tick(SPINNER_TICK);
        self.spinner = Some(spinner);
    }

    fn hide(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

/// Per-file progress bar.
#[derive(Debug, Default)]
pub struct TerminalUploadView {
    bar: Option<ProgressBar>,
    visible: bool,
}

impl TerminalUploadView {
    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("{prefix:.bold} [{bar:40.cyan/blue}] {pos:>3}% {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ")
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

impl Modal for TerminalUploadView {
    fn show(&mut self) {
        self.visible = true;
    }

    fn hide(&mut self) {
        self.reset();
        self.visible = false;
    }
}

impl UploadView for TerminalUploadView {
    fn reset(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }

    fn started(&mut self, filename: &str) {
        self.reset();
        let bar = ProgressBar::new(100);
        bar.set_style(Self::bar_style());
        bar.set_prefix(filename.to_string());
        self.bar = Some(bar);
    }

    fn progress(&mut self, percent: u8) {
        if let Some(bar) = &self.bar {
            bar.set_position(u64::from(percent));
        }
    }

    fn finished(&mut self, portable_url: &str, message: &str, _again_label: &str) {
        if let Some(bar) = self.bar.take() {
            bar.set_position(100);
            bar.finish_with_message(message.to_string());
        }
        println!("{portable_url}");
    }

    fn failed(&mut self, message: &str, _again_label: &str) {
        match self.bar.take() {
            Some(bar) => {
                bar.set_position(0);
                bar.abandon_with_message(message.to_string());
            },
            None => eprintln!("{message}"),
        }
    }
}

/// Error notifications printed as boxes on stderr.
#[derive(Debug, Default)]
pub struct TerminalNotifier {
    showing: bool,
}

impl TerminalNotifier {
    /// Whether an error is showing and has not been dismissed.
    #[must_use]
    pub fn is_showing(&self) -> bool {
        self.showing
    }
}

impl Notifier for TerminalNotifier {
    fn error(&mut self, title: &str, message: &str) {
        print_error_box(title, Some(message));
        self.showing = true;
    }

    fn dismiss(&mut self) {
        self.showing = false;
    }
}

/// Prints the listing as a plain text table.
#[derive(Debug, Default)]
pub struct TableRenderer {
    /// Suppresses stdout, keeping only the last rendered text.
    quiet: bool,
    last: String,
}

impl TableRenderer {
    /// Renderer that records output without printing it.
    #[must_use]
    pub fn quiet() -> Self {
        Self {
            quiet: true,
            last: String::new(),
        }
    }

    /// Text of the most recent render.
    #[must_use]
    pub fn last(&self) -> &str {
        &self.last
    }
}

impl AssetListRenderer for TableRenderer {
    fn render(&mut self, view: &ListingView) {
        self.last = format_table(view);
        if !self.quiet {
            print!("{}", self.last);
        }
    }
}

/// Format a listing view as a table with a header and page footer.
#[must_use]
pub fn format_table(view: &ListingView) -> String {
    let arrow = match view.direction {
        Direction::Asc => "ascending",
        Direction::Desc => "descending",
    };
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Sorted by {} ({arrow}), type: {}",
        view.sort_label, view.filter_label
    );

    if !view.has_assets {
        if view.filtered {
            let _ = writeln!(out, "No {} assets found.", view.filter_label);
        } else {
            let _ = writeln!(out, "You haven't added any assets to this course yet.");
        }
        return out;
    }

    let headers = ["Name", "Type", "Date Added", "Locked", "URL"];
    let cells: Vec<[String; 5]> = view
        .rows
        .iter()
        .map(|r| {
            [
                r.name.clone(),
                r.asset_type.clone(),
                r.date_added.clone(),
                if r.locked { "yes" } else { "no" }.to_string(),
                r.portable_url.clone(),
            ]
        })
        .collect();

    let mut widths = headers.map(str::len);
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    write_row(&mut out, &headers.map(str::to_string), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", rule.join("  "));
    for row in &cells {
        write_row(&mut out, row, &widths);
    }

    if let Some((first, last)) = view.range {
        let _ = writeln!(
            out,
            "Showing {first}-{last} of {} (page {} of {})",
            view.total_count,
            view.current_page.saturating_add(1),
            view.total_pages
        );
    }
    out
}

fn write_row(out: &mut String, cells: &[String; 5], widths: &[usize; 5]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    let _ = writeln!(out, "{}", padded.join("  ").trim_end());
}

/// Analytics events emitted as structured log records.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAnalytics;

impl Analytics for TracingAnalytics {
    fn track(&mut self, event: &str, properties: serde_json::Value) {
        info!(event, properties = %properties, "Analytics event");
    }
}
