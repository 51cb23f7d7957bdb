//! ASCII bar chart for terminal output.
//!
//! This is intentionally "dumb" (fixed-width bars), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)

use crate::domain::ApplicantRecord;

pub const OVERVIEW_TITLE: &str = "Income & Loan Overview";

/// Render the applicant's financial figures as horizontal bars.
pub fn render_overview(record: &ApplicantRecord, width: usize) -> String {
    render_bar_chart(OVERVIEW_TITLE, &record.financial_figures(), width)
}

/// Render labeled horizontal bars scaled to the largest value.
///
/// Each bar is followed by its value with two decimals.
pub fn render_bar_chart(title: &str, bars: &[(&str, f64)], width: usize) -> String {
    let width = width.max(10);
    let label_width = bars.iter().map(|(l, _)| l.len()).max().unwrap_or(0);
    let max = bars
        .iter()
        .map(|&(_, v)| v)
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);

    let mut out = String::new();
    out.push_str(title);
    out.push('\n');
    for &(label, value) in bars {
        let len = if max > 0.0 && value.is_finite() && value > 0.0 {
            ((value / max) * width as f64).round().max(1.0) as usize
        } else {
            0
        };
        out.push_str(&format!("{label:<label_width$} |{} {value:.2}\n", "#".repeat(len)));
    }
    out
}
