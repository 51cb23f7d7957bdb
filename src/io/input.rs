//! Read an applicant record from a JSON file.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::domain::RawApplicant;
use crate::error::{AppError, EXIT_IO};

/// Read a JSON object with the eleven applicant fields.
///
/// Keys may use training-data names (`ApplicantIncome`) or snake case
/// (`applicant_income`).
pub fn read_applicant_json(path: &Path) -> Result<RawApplicant, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(EXIT_IO, format!("Failed to open applicant JSON '{}': {e}", path.display())))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AppError::new(EXIT_IO, format!("Invalid applicant JSON '{}': {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_snake_case_keys() {
        let path = std::env::temp_dir().join(format!("loan-screen-{}-applicant.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{"gender":"Female","married":"No","dependents":"3+","education":"Graduate",
                "self_employed":"No","applicant_income":3000,"coapplicant_income":0,
                "loan_amount":66,"loan_term":360,"credit_history":"1.0","property_area":"Urban"}"#,
        )
        .unwrap();
        let raw = read_applicant_json(&path).unwrap();
        assert_eq!(raw.gender, "Female");
        assert_eq!(raw.dependents, "3+");
        assert_eq!(raw.loan_amount, 66.0);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_applicant_json(Path::new("/definitely/not/here.json")).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_IO);
    }
}
