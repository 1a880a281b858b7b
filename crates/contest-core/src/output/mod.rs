//! Report Output
//!
//! Text rendering of a batch histogram and JSON export of the full report.

use contest_model::BatchReport;
use std::fs;
use std::io;
use std::path::Path;

/// Width of the longest bar in the text histogram
const BAR_WIDTH: usize = 40;

/// Render the histogram as a table with one bar per label, most frequent first
pub fn render_histogram(report: &BatchReport) -> String {
    let ranked = report.histogram.ranked();
    let label_width = ranked
        .iter()
        .map(|(label, _)| label.len())
        .max()
        .unwrap_or(0)
        .max("Outcome".len());
    let peak = ranked.first().map(|(_, count)| *count).unwrap_or(0);

    let mut out = format!(
        "{:<width$}  {:>8}  {:>6}\n",
        "Outcome",
        "Count",
        "Share",
        width = label_width
    );
    for (label, count) in &ranked {
        let bar_len = if peak == 0 {
            0
        } else {
            ((*count as f64 / peak as f64) * BAR_WIDTH as f64).round() as usize
        };
        out.push_str(&format!(
            "{:<width$}  {:>8}  {:>5.1}%  {}\n",
            label,
            count,
            report.share(label) * 100.0,
            "#".repeat(bar_len),
            width = label_width
        ));
    }

    out.push_str(&format!(
        "{} of {} trials completed",
        report.completed(),
        report.trial_count
    ));
    if report.failed() > 0 {
        out.push_str(&format!(", {} failed", report.failed()));
    }
    out.push_str(&format!(
        " (mean {:.1} rounds, master seed {})\n",
        report.mean_rounds(),
        report.master_seed
    ));
    out
}

/// Write the report as pretty JSON, creating parent directories as needed
pub fn write_report(path: impl AsRef<Path>, report: &BatchReport) -> io::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let json = report.to_json_pretty().map_err(io::Error::other)?;

    fs::write(path, json)
}
