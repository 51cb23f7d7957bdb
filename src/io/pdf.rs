//! Single-page PDF report of a prediction.
//!
//! The report is plain text: title, verdict, one `Field: value` line per record
//! field, and the generation timestamp. Text is set in the standard Helvetica
//! font, so no font data is embedded and the file stays a few hundred bytes.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tracing::info;

use crate::app::pipeline::Outcome;
use crate::domain::{ApplicantRecord, Decision};
use crate::encode::display_fields;
use crate::error::{AppError, EXIT_IO};
use crate::io::export::{PDF_PREFIX, export_file_name};

pub const REPORT_TITLE: &str = "Loan Prediction Report";

/// A4 portrait, in points.
const PAGE_WIDTH: f64 = 595.0;
const PAGE_HEIGHT: f64 = 842.0;
const MARGIN_LEFT: f64 = 56.0;
const MARGIN_TOP: f64 = 56.0;

/// One line of report text.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportLine {
    pub text: String,
    pub font_size: f64,
    /// Extra space above the line, in points.
    pub gap_before: f64,
    pub centered: bool,
}

impl ReportLine {
    fn new(text: impl Into<String>, font_size: f64) -> Self {
        Self {
            text: text.into(),
            font_size,
            gap_before: 0.0,
            centered: false,
        }
    }

    fn gap(mut self, points: f64) -> Self {
        self.gap_before = points;
        self
    }
}

/// Report text, top to bottom.
pub fn report_lines(record: &ApplicantRecord, decision: Decision, generated_at: NaiveDateTime) -> Vec<ReportLine> {
    let mut lines = vec![ReportLine {
        centered: true,
        ..ReportLine::new(REPORT_TITLE, 14.0)
    }];
    lines.push(ReportLine::new(format!("Prediction Result: {}", decision.label()), 12.0).gap(12.0));

    let mut first = true;
    for (column, value) in display_fields(record) {
        let line = ReportLine::new(format!("{}: {value}", column.name()), 12.0);
        lines.push(if first { line.gap(6.0) } else { line });
        first = false;
    }

    lines.push(
        ReportLine::new(
            format!("Generated on: {}", generated_at.format("%Y-%m-%d %H:%M:%S")),
            9.0,
        )
        .gap(12.0),
    );
    lines
}

/// Render the report as PDF bytes.
pub fn render_pdf(lines: &[ReportLine]) -> Vec<u8> {
    let content = content_stream(lines);

    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
             /Resources << /Font << /F1 4 0 R >> >> /Contents 5 0 R >>"
        ),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>".to_string(),
        format!("<< /Length {} >>\nstream\n{content}\nendstream", content.len()),
    ];

    let mut out: Vec<u8> = Vec::new();
    out.extend_from_slice(b"%PDF-1.4\n");

    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
    }

    let xref_at = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
    out.extend_from_slice(b"0000000000 65535 f \n");
    for off in offsets {
        out.extend_from_slice(format!("{off:010} 00000 n \n").as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
            objects.len() + 1
        )
        .as_bytes(),
    );
    out
}

/// Write the PDF report for an outcome into `dir`; returns the path.
pub fn write_report_pdf(dir: &Path, outcome: &Outcome) -> Result<PathBuf, AppError> {
    let path = dir.join(export_file_name(PDF_PREFIX, "pdf", outcome.generated_at));
    let bytes = render_pdf(&report_lines(&outcome.record, outcome.decision, outcome.generated_at));

    let mut file = File::create(&path)
        .map_err(|e| AppError::new(EXIT_IO, format!("Failed to create PDF report '{}': {e}", path.display())))?;
    file.write_all(&bytes)
        .map_err(|e| AppError::new(EXIT_IO, format!("Failed to write PDF report: {e}")))?;

    info!(path = %path.display(), bytes = bytes.len(), "wrote PDF report");
    Ok(path)
}

fn content_stream(lines: &[ReportLine]) -> String {
    let mut out = String::new();
    let mut y = PAGE_HEIGHT - MARGIN_TOP;
    for line in lines {
        y -= line.gap_before + line.font_size * 1.6;
        let x = if line.centered {
            // Helvetica averages roughly half an em per character.
            ((PAGE_WIDTH - line.text.chars().count() as f64 * line.font_size * 0.5) / 2.0).max(MARGIN_LEFT)
        } else {
            MARGIN_LEFT
        };
        out.push_str(&format!(
            "BT /F1 {} Tf {x:.2} {y:.2} Td ({}) Tj ET\n",
            line.font_size,
            escape_text(&line.text)
        ));
    }
    out
}

/// Escape PDF string delimiters; characters outside printable ASCII become `?`.
fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '(' | ')' => {
                out.push('\\');
                out.push(c);
            }
            ' '..='~' => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}
