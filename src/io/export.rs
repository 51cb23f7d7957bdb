//! Export the entered applicant record to CSV.
//!
//! One header row (training-data column names) and one data row with the values
//! exactly as entered, in record order.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tracing::info;

use crate::domain::{ApplicantRecord, FeatureColumn};
use crate::encode::display_fields;
use crate::error::{AppError, EXIT_IO};

/// Prefix of CSV export file names.
pub const CSV_PREFIX: &str = "loan_input";
/// Prefix of PDF report file names.
pub const PDF_PREFIX: &str = "loan_prediction_report";

/// `<prefix>_YYYYmmdd_HHMMSS.<ext>`
pub fn export_file_name(prefix: &str, ext: &str, at: NaiveDateTime) -> String {
    format!("{prefix}_{}.{ext}", at.format("%Y%m%d_%H%M%S"))
}

/// Write the header and the record row as CSV.
pub fn write_csv<W: Write>(out: W, record: &ApplicantRecord) -> csv::Result<()> {
    let mut writer = csv::WriterBuilder::new().from_writer(out);
    writer.write_record(FeatureColumn::ALL.iter().map(|c| c.name()))?;
    writer.write_record(display_fields(record).iter().map(|(_, value)| value.as_str()))?;
    writer.flush()?;
    Ok(())
}

/// Write the record CSV into `dir` with a timestamped name; returns the path.
pub fn write_record_csv(dir: &Path, record: &ApplicantRecord, at: NaiveDateTime) -> Result<PathBuf, AppError> {
    let path = dir.join(export_file_name(CSV_PREFIX, "csv", at));
    let file = File::create(&path)
        .map_err(|e| AppError::new(EXIT_IO, format!("Failed to create export CSV '{}': {e}", path.display())))?;

    write_csv(file, record).map_err(|e| AppError::new(EXIT_IO, format!("Failed to write export CSV: {e}")))?;

    info!(path = %path.display(), "wrote applicant CSV");
    Ok(path)
}
