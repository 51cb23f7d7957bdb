//! Shared domain types.
//!
//! These types are intentionally kept lightweight so they can be:
//!
//! - built fresh per submission (form, CLI flags, JSON input)
//! - encoded into the numeric layout a trained model expects
//! - rendered into previews and exports without transformation

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// A model-input column, named the way the training data named it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureColumn {
    Gender,
    Married,
    Dependents,
    Education,
    #[serde(rename = "Self_Employed")]
    SelfEmployed,
    ApplicantIncome,
    CoapplicantIncome,
    LoanAmount,
    #[serde(rename = "Loan_Amount_Term")]
    LoanAmountTerm,
    #[serde(rename = "Credit_History")]
    CreditHistory,
    #[serde(rename = "Property_Area")]
    PropertyArea,
}

impl FeatureColumn {
    /// Every column, in applicant-record order.
    pub const ALL: [FeatureColumn; 11] = [
        FeatureColumn::Gender,
        FeatureColumn::Married,
        FeatureColumn::Dependents,
        FeatureColumn::Education,
        FeatureColumn::SelfEmployed,
        FeatureColumn::ApplicantIncome,
        FeatureColumn::CoapplicantIncome,
        FeatureColumn::LoanAmount,
        FeatureColumn::LoanAmountTerm,
        FeatureColumn::CreditHistory,
        FeatureColumn::PropertyArea,
    ];

    /// Column name as used in training data, CSV headers and model artifacts.
    pub fn name(self) -> &'static str {
        match self {
            FeatureColumn::Gender => "Gender",
            FeatureColumn::Married => "Married",
            FeatureColumn::Dependents => "Dependents",
            FeatureColumn::Education => "Education",
            FeatureColumn::SelfEmployed => "Self_Employed",
            FeatureColumn::ApplicantIncome => "ApplicantIncome",
            FeatureColumn::CoapplicantIncome => "CoapplicantIncome",
            FeatureColumn::LoanAmount => "LoanAmount",
            FeatureColumn::LoanAmountTerm => "Loan_Amount_Term",
            FeatureColumn::CreditHistory => "Credit_History",
            FeatureColumn::PropertyArea => "Property_Area",
        }
    }

    /// Human-readable label for form fields and charts.
    pub fn display_name(self) -> &'static str {
        match self {
            FeatureColumn::Gender => "Gender",
            FeatureColumn::Married => "Married",
            FeatureColumn::Dependents => "Dependents",
            FeatureColumn::Education => "Education",
            FeatureColumn::SelfEmployed => "Self Employed",
            FeatureColumn::ApplicantIncome => "Applicant Income",
            FeatureColumn::CoapplicantIncome => "Coapplicant Income",
            FeatureColumn::LoanAmount => "Loan Amount",
            FeatureColumn::LoanAmountTerm => "Loan Term",
            FeatureColumn::CreditHistory => "Credit History",
            FeatureColumn::PropertyArea => "Property Area",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    /// Numeric columns pass through the encoder unchanged (and may be scaled).
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            FeatureColumn::ApplicantIncome
                | FeatureColumn::CoapplicantIncome
                | FeatureColumn::LoanAmount
                | FeatureColumn::LoanAmountTerm
        )
    }
}

impl fmt::Display for FeatureColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Married {
    Yes,
    No,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dependents {
    Zero,
    One,
    Two,
    /// Three or more, entered as `3+`.
    ThreePlus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Education {
    Graduate,
    NotGraduate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelfEmployed {
    Yes,
    No,
}

/// Whether the applicant's credit history meets guidelines (`1.0`) or not (`0.0`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CreditHistory {
    Good,
    Bad,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyArea {
    Urban,
    Rural,
    Semiurban,
}

/// A validated applicant record.
///
/// Categorical fields are closed enums, so an `ApplicantRecord` can only hold
/// values the encoder knows how to map. Free-form input goes through
/// [`RawApplicant`] and the encoder's parse step first.
///
/// `loan_term` is stored as entered; its unit (months or days) belongs to the
/// model artifact, see [`LoanTermPolicy`].
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicantRecord {
    pub gender: Gender,
    pub married: Married,
    pub dependents: Dependents,
    pub education: Education,
    pub self_employed: SelfEmployed,
    pub applicant_income: f64,
    pub coapplicant_income: f64,
    pub loan_amount: f64,
    pub loan_term: f64,
    pub credit_history: CreditHistory,
    pub property_area: PropertyArea,
}

impl Default for ApplicantRecord {
    /// The form's initial selection: first option of every list, zero amounts.
    fn default() -> Self {
        Self {
            gender: Gender::Male,
            married: Married::Yes,
            dependents: Dependents::Zero,
            education: Education::Graduate,
            self_employed: SelfEmployed::Yes,
            applicant_income: 0.0,
            coapplicant_income: 0.0,
            loan_amount: 0.0,
            loan_term: 360.0,
            credit_history: CreditHistory::Good,
            property_area: PropertyArea::Urban,
        }
    }
}

impl ApplicantRecord {
    pub fn total_income(&self) -> f64 {
        self.applicant_income + self.coapplicant_income
    }

    /// Financial figures shown in the overview chart and KPI row.
    pub fn financial_figures(&self) -> [(&'static str, f64); 3] {
        [
            ("Applicant Income", self.applicant_income),
            ("Coapplicant Income", self.coapplicant_income),
            ("Loan Amount", self.loan_amount),
        ]
    }
}

/// An applicant record exactly as a form, flag set, or JSON file supplied it.
///
/// Field names follow the training-data column names so that a CSV export row
/// and a JSON input file use the same vocabulary. Categorical values are plain
/// text; numbers given for `Dependents` or `Credit_History` are accepted and
/// turned into their text form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawApplicant {
    #[serde(rename = "Gender", alias = "gender")]
    pub gender: String,
    #[serde(rename = "Married", alias = "married")]
    pub married: String,
    #[serde(rename = "Dependents", alias = "dependents", deserialize_with = "label_or_number")]
    pub dependents: String,
    #[serde(rename = "Education", alias = "education")]
    pub education: String,
    #[serde(rename = "Self_Employed", alias = "self_employed")]
    pub self_employed: String,
    #[serde(rename = "ApplicantIncome", alias = "applicant_income")]
    pub applicant_income: f64,
    #[serde(rename = "CoapplicantIncome", alias = "coapplicant_income")]
    pub coapplicant_income: f64,
    #[serde(rename = "LoanAmount", alias = "loan_amount")]
    pub loan_amount: f64,
    #[serde(rename = "Loan_Amount_Term", alias = "loan_term")]
    pub loan_term: f64,
    #[serde(rename = "Credit_History", alias = "credit_history", deserialize_with = "label_or_number")]
    pub credit_history: String,
    #[serde(rename = "Property_Area", alias = "property_area")]
    pub property_area: String,
}

impl Default for RawApplicant {
    fn default() -> Self {
        Self {
            gender: "Male".to_string(),
            married: "Yes".to_string(),
            dependents: "0".to_string(),
            education: "Graduate".to_string(),
            self_employed: "Yes".to_string(),
            applicant_income: 0.0,
            coapplicant_income: 0.0,
            loan_amount: 0.0,
            loan_term: 360.0,
            credit_history: "1.0".to_string(),
            property_area: "Urban".to_string(),
        }
    }
}

fn label_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum LabelOrNumber {
        Label(String),
        Number(f64),
    }

    Ok(match LabelOrNumber::deserialize(deserializer)? {
        LabelOrNumber::Label(s) => s,
        LabelOrNumber::Number(n) => format_number(n),
    })
}

/// Format a number the way the form shows it: integers without a fraction,
/// everything else with its shortest exact representation.
pub fn format_number(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

/// Unit of the `Loan_Amount_Term` column a model was trained with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TermUnit {
    Months,
    Days,
}

impl fmt::Display for TermUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TermUnit::Months => f.write_str("months"),
            TermUnit::Days => f.write_str("days"),
        }
    }
}

/// How a model artifact interprets the loan term.
///
/// `allowed = None` accepts any positive term (in `unit`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTermPolicy {
    pub unit: TermUnit,
    #[serde(default)]
    pub allowed: Option<Vec<f64>>,
}

/// Loan terms offered by the application form, in months.
pub const STANDARD_TERMS_MONTHS: [f64; 4] = [360.0, 180.0, 120.0, 60.0];

impl Default for LoanTermPolicy {
    fn default() -> Self {
        Self {
            unit: TermUnit::Months,
            allowed: Some(STANDARD_TERMS_MONTHS.to_vec()),
        }
    }
}

impl LoanTermPolicy {
    pub fn accepts(&self, term: f64) -> bool {
        if !(term.is_finite() && term > 0.0) {
            return false;
        }
        match &self.allowed {
            Some(values) => values.iter().any(|&v| v == term),
            None => true,
        }
    }

    /// Terms a form should offer; empty when any positive value is accepted.
    pub fn choices(&self) -> &[f64] {
        self.allowed.as_deref().unwrap_or(&[])
    }

    pub fn describe_allowed(&self) -> String {
        match &self.allowed {
            Some(values) => values.iter().map(|v| format_number(*v)).collect::<Vec<_>>().join(", "),
            None => "any positive value".to_string(),
        }
    }
}

/// Raw predictor output before normalization.
///
/// Classifiers trained on this data emit either the training target labels
/// (`"Y"`/`"N"`, `"Yes"`/`"No"`) or numeric classes (`1`/`0`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawVerdict {
    Text(String),
    Number(f64),
}

impl fmt::Display for RawVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawVerdict::Text(s) => f.write_str(s),
            RawVerdict::Number(n) => f.write_str(&format_number(*n)),
        }
    }
}

/// Normalized loan decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    Approved,
    Rejected,
}

impl Decision {
    pub fn is_approved(self) -> bool {
        self == Decision::Approved
    }

    pub fn label(self) -> &'static str {
        match self {
            Decision::Approved => "Approved",
            Decision::Rejected => "Rejected",
        }
    }

    /// One-line message shown after a prediction.
    pub fn headline(self) -> &'static str {
        match self {
            Decision::Approved => "Loan will be Approved!",
            Decision::Rejected => "Loan will be Rejected.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_names_round_trip() {
        for col in FeatureColumn::ALL {
            assert_eq!(FeatureColumn::from_name(col.name()), Some(col));
        }
        assert_eq!(FeatureColumn::from_name("self_employed"), None);
    }

    #[test]
    fn raw_applicant_accepts_numbers_for_labels() {
        let json = r#"{
            "Gender": "Female", "Married": "No", "Dependents": 2,
            "Education": "Not Graduate", "Self_Employed": "No",
            "ApplicantIncome": 4000, "CoapplicantIncome": 0.0, "LoanAmount": 120,
            "Loan_Amount_Term": 180, "Credit_History": 1.0, "Property_Area": "Rural"
        }"#;
        let raw: RawApplicant = serde_json::from_str(json).unwrap();
        assert_eq!(raw.dependents, "2");
        assert_eq!(raw.credit_history, "1");
        assert_eq!(raw.loan_term, 180.0);
    }

    #[test]
    fn loan_term_policy_defaults_to_standard_months() {
        let policy = LoanTermPolicy::default();
        assert_eq!(policy.unit, TermUnit::Months);
        assert!(policy.accepts(360.0));
        assert!(!policy.accepts(240.0));

        let days = LoanTermPolicy { unit: TermUnit::Days, allowed: None };
        assert!(days.accepts(10950.0));
        assert!(!days.accepts(0.0));
        assert!(days.choices().is_empty());
    }

    #[test]
    fn format_number_drops_integral_fraction() {
        assert_eq!(format_number(360.0), "360");
        assert_eq!(format_number(1.5), "1.5");
    }
}
