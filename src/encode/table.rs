//! Category tables.
//!
//! The integer codes were fixed when the classifier was trained. They are not
//! "natural" orderings (e.g. `Property_Area` maps Urban to 2 and Rural to 0) and
//! must be reproduced exactly.

use crate::domain::{
    CreditHistory, Dependents, Education, FeatureColumn, Gender, Married, PropertyArea, SelfEmployed,
    format_number,
};
use crate::encode::EncodeError;

/// A closed set of labels with fixed numeric codes for one model column.
pub trait Categorical: Copy + PartialEq + Sized + 'static {
    const COLUMN: FeatureColumn;

    /// `(variant, label, code)` for every variant, in the order a form offers them.
    const TABLE: &'static [(Self, &'static str, i64)];

    /// Additional accepted spellings of a label.
    const ALIASES: &'static [(&'static str, Self)] = &[];

    fn label(self) -> &'static str {
        Self::TABLE
            .iter()
            .find(|(v, _, _)| *v == self)
            .map(|(_, label, _)| *label)
            .unwrap_or_default()
    }

    fn code(self) -> i64 {
        Self::TABLE
            .iter()
            .find(|(v, _, _)| *v == self)
            .map(|(_, _, code)| *code)
            .unwrap_or_default()
    }

    fn from_label(label: &str) -> Result<Self, EncodeError> {
        Self::TABLE
            .iter()
            .find(|(_, l, _)| *l == label)
            .map(|(v, _, _)| *v)
            .or_else(|| Self::ALIASES.iter().find(|(l, _)| *l == label).map(|(_, v)| *v))
            .ok_or_else(|| unmapped::<Self>(label.to_string()))
    }

    fn from_code(code: f64) -> Result<Self, EncodeError> {
        Self::TABLE
            .iter()
            .find(|(_, _, c)| *c as f64 == code)
            .map(|(v, _, _)| *v)
            .ok_or_else(|| unmapped::<Self>(format_number(code)))
    }

    fn labels() -> Vec<&'static str> {
        Self::TABLE.iter().map(|(_, label, _)| *label).collect()
    }

    /// Next option in form order (wraps).
    fn next(self) -> Self {
        let idx = Self::TABLE.iter().position(|(v, _, _)| *v == self).unwrap_or(0);
        Self::TABLE[(idx + 1) % Self::TABLE.len()].0
    }

    /// Previous option in form order (wraps).
    fn prev(self) -> Self {
        let idx = Self::TABLE.iter().position(|(v, _, _)| *v == self).unwrap_or(0);
        Self::TABLE[(idx + Self::TABLE.len() - 1) % Self::TABLE.len()].0
    }
}

fn unmapped<T: Categorical>(value: String) -> EncodeError {
    EncodeError::UnmappedCategory {
        column: T::COLUMN,
        value,
        expected: T::labels().join(", "),
    }
}

impl Categorical for Gender {
    const COLUMN: FeatureColumn = FeatureColumn::Gender;
    const TABLE: &'static [(Self, &'static str, i64)] = &[(Gender::Male, "Male", 1), (Gender::Female, "Female", 0)];
}

impl Categorical for Married {
    const COLUMN: FeatureColumn = FeatureColumn::Married;
    const TABLE: &'static [(Self, &'static str, i64)] = &[(Married::Yes, "Yes", 1), (Married::No, "No", 0)];
}

impl Categorical for Dependents {
    const COLUMN: FeatureColumn = FeatureColumn::Dependents;
    const TABLE: &'static [(Self, &'static str, i64)] = &[
        (Dependents::Zero, "0", 0),
        (Dependents::One, "1", 1),
        (Dependents::Two, "2", 2),
        (Dependents::ThreePlus, "3+", 3),
    ];
}

impl Categorical for Education {
    const COLUMN: FeatureColumn = FeatureColumn::Education;
    const TABLE: &'static [(Self, &'static str, i64)] = &[
        (Education::Graduate, "Graduate", 1),
        (Education::NotGraduate, "Not Graduate", 0),
    ];
    const ALIASES: &'static [(&'static str, Self)] = &[("NotGraduate", Education::NotGraduate)];
}

impl Categorical for SelfEmployed {
    const COLUMN: FeatureColumn = FeatureColumn::SelfEmployed;
    const TABLE: &'static [(Self, &'static str, i64)] =
        &[(SelfEmployed::Yes, "Yes", 1), (SelfEmployed::No, "No", 0)];
}

impl Categorical for CreditHistory {
    const COLUMN: FeatureColumn = FeatureColumn::CreditHistory;
    const TABLE: &'static [(Self, &'static str, i64)] =
        &[(CreditHistory::Good, "1.0", 1), (CreditHistory::Bad, "0.0", 0)];
    const ALIASES: &'static [(&'static str, Self)] = &[("1", CreditHistory::Good), ("0", CreditHistory::Bad)];
}

impl Categorical for PropertyArea {
    const COLUMN: FeatureColumn = FeatureColumn::PropertyArea;
    const TABLE: &'static [(Self, &'static str, i64)] = &[
        (PropertyArea::Urban, "Urban", 2),
        (PropertyArea::Rural, "Rural", 0),
        (PropertyArea::Semiurban, "Semiurban", 1),
    ];
}
