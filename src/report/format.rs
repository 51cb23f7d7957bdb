//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the encoding/prediction code stays clean and testable
//! - output changes are localized (important for snapshot tests)

use crate::app::pipeline::Outcome;
use crate::domain::{ApplicantRecord, EncodedFeatureVector};
use crate::encode::display_fields;

/// Verdict block printed after a prediction.
pub fn format_outcome(outcome: &Outcome) -> String {
    let mut out = String::new();
    out.push_str("=== loan - Prediction ===\n");
    out.push_str(outcome.decision.headline());
    out.push('\n');
    out.push_str(&format!("Model output: {}\n", outcome.verdict));
    if let Some(p) = outcome.approval_probability {
        out.push_str(&format!("Approval probability: {:.1}%\n", p * 100.0));
    }
    out.push_str(&format!(
        "Generated on: {}\n",
        outcome.generated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    out
}

/// KPI row: applicant, coapplicant and total income.
pub fn format_kpis(record: &ApplicantRecord) -> String {
    format!(
        "Applicant Income: {:.2} | Coapplicant Income: {:.2} | Total Income: {:.2}\n",
        record.applicant_income,
        record.coapplicant_income,
        record.total_income()
    )
}

/// Two-column table of the fields as entered.
pub fn format_preview(record: &ApplicantRecord) -> String {
    let fields = display_fields(record);
    let width = fields.iter().map(|(c, _)| c.name().len()).max().unwrap_or(0);

    let mut out = String::from("Entered Data Preview\n");
    out.push_str(&format!("{:<width$}  {}\n", "Field", "Value"));
    out.push_str(&format!("{}  {}\n", "-".repeat(width), "-".repeat(12)));
    for (column, value) in fields {
        out.push_str(&format!("{:<width$}  {value}\n", column.name()));
    }
    out
}

/// Encoded model input, one column per line.
pub fn format_encoded(features: &EncodedFeatureVector) -> String {
    let mut out = String::from("Model input:\n");
    for (column, value) in features.iter() {
        out.push_str(&format!("  {:<18} {value}\n", column.name()));
    }
    out
}

pub fn format_warnings(warnings: &[String]) -> String {
    warnings.iter().map(|w| format!("Warning: {w}\n")).collect()
}
