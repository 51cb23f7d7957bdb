//! Applicant record <-> encoded feature vector.

use crate::domain::{
    ApplicantRecord, CreditHistory, Dependents, Education, EncodedFeatureVector, FeatureColumn, FeatureLayout,
    Gender, LoanTermPolicy, Married, PropertyArea, RawApplicant, SelfEmployed, format_number,
};
use crate::encode::{Categorical, EncodeError, ScalingStage, apply_scaling};

/// Encodes applicant records into the layout a specific model was trained on.
///
/// The encoder is configuration only (column order, loan-term policy, and the
/// columns the model expects to be rescaled); encoding is a pure function of
/// that configuration and the record.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureEncoder {
    layout: FeatureLayout,
    loan_term: LoanTermPolicy,
    scaled_columns: Vec<FeatureColumn>,
}

impl FeatureEncoder {
    pub fn new(layout: FeatureLayout, loan_term: LoanTermPolicy) -> Self {
        Self {
            layout,
            loan_term,
            scaled_columns: Vec::new(),
        }
    }

    /// Declare the numeric columns (in fitted order) the model expects to be rescaled.
    pub fn with_scaled_columns(mut self, columns: Vec<FeatureColumn>) -> Result<Self, EncodeError> {
        if let Some(col) = columns.iter().find(|c| !c.is_numeric()) {
            return Err(EncodeError::InvalidScaler(format!("{col} is categorical and cannot be scaled")));
        }
        self.scaled_columns = columns;
        Ok(self)
    }

    pub fn layout(&self) -> &FeatureLayout {
        &self.layout
    }

    pub fn loan_term(&self) -> &LoanTermPolicy {
        &self.loan_term
    }

    pub fn scaled_columns(&self) -> &[FeatureColumn] {
        &self.scaled_columns
    }

    /// Map free-form input onto the closed enumerations.
    ///
    /// Fails on the first label outside its table; nothing is defaulted.
    pub fn parse(&self, raw: &RawApplicant) -> Result<ApplicantRecord, EncodeError> {
        let record = ApplicantRecord {
            gender: Gender::from_label(&raw.gender)?,
            married: Married::from_label(&raw.married)?,
            dependents: Dependents::from_label(&raw.dependents)?,
            education: Education::from_label(&raw.education)?,
            self_employed: SelfEmployed::from_label(&raw.self_employed)?,
            applicant_income: raw.applicant_income,
            coapplicant_income: raw.coapplicant_income,
            loan_amount: raw.loan_amount,
            loan_term: raw.loan_term,
            credit_history: CreditHistory::from_label(&raw.credit_history)?,
            property_area: PropertyArea::from_label(&raw.property_area)?,
        };
        self.validate(&record)?;
        Ok(record)
    }

    /// Categorical columns become their table codes; numeric columns pass through.
    pub fn encode(&self, record: &ApplicantRecord) -> Result<EncodedFeatureVector, EncodeError> {
        self.validate(record)?;
        let values = self
            .layout
            .columns()
            .iter()
            .map(|&col| column_value(record, col))
            .collect();
        Ok(EncodedFeatureVector::new(self.layout.clone(), values))
    }

    pub fn encode_raw(&self, raw: &RawApplicant) -> Result<EncodedFeatureVector, EncodeError> {
        let record = self.parse(raw)?;
        self.encode(&record)
    }

    /// Encode, then run the scaling stage the model expects (if any).
    pub fn encode_scaled(
        &self,
        record: &ApplicantRecord,
        scaler: Option<&ScalingStage>,
    ) -> Result<EncodedFeatureVector, EncodeError> {
        let encoded = self.encode(record)?;
        apply_scaling(&self.scaled_columns, scaler, encoded)
    }

    /// Inverse of [`encode`](Self::encode) for unscaled vectors.
    pub fn decode(&self, vector: &EncodedFeatureVector) -> Result<ApplicantRecord, EncodeError> {
        let record = ApplicantRecord {
            gender: Gender::from_code(vector.get(FeatureColumn::Gender))?,
            married: Married::from_code(vector.get(FeatureColumn::Married))?,
            dependents: Dependents::from_code(vector.get(FeatureColumn::Dependents))?,
            education: Education::from_code(vector.get(FeatureColumn::Education))?,
            self_employed: SelfEmployed::from_code(vector.get(FeatureColumn::SelfEmployed))?,
            applicant_income: vector.get(FeatureColumn::ApplicantIncome),
            coapplicant_income: vector.get(FeatureColumn::CoapplicantIncome),
            loan_amount: vector.get(FeatureColumn::LoanAmount),
            loan_term: vector.get(FeatureColumn::LoanAmountTerm),
            credit_history: CreditHistory::from_code(vector.get(FeatureColumn::CreditHistory))?,
            property_area: PropertyArea::from_code(vector.get(FeatureColumn::PropertyArea))?,
        };
        Ok(record)
    }

    fn validate(&self, record: &ApplicantRecord) -> Result<(), EncodeError> {
        for (column, value) in [
            (FeatureColumn::ApplicantIncome, record.applicant_income),
            (FeatureColumn::CoapplicantIncome, record.coapplicant_income),
            (FeatureColumn::LoanAmount, record.loan_amount),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(EncodeError::InvalidNumeric { column, value });
            }
        }

        if !self.loan_term.accepts(record.loan_term) {
            return Err(EncodeError::UnsupportedLoanTerm {
                value: record.loan_term,
                unit: self.loan_term.unit,
                allowed: self.loan_term.describe_allowed(),
            });
        }
        Ok(())
    }
}

fn column_value(record: &ApplicantRecord, column: FeatureColumn) -> f64 {
    match column {
        FeatureColumn::Gender => record.gender.code() as f64,
        FeatureColumn::Married => record.married.code() as f64,
        FeatureColumn::Dependents => record.dependents.code() as f64,
        FeatureColumn::Education => record.education.code() as f64,
        FeatureColumn::SelfEmployed => record.self_employed.code() as f64,
        FeatureColumn::ApplicantIncome => record.applicant_income,
        FeatureColumn::CoapplicantIncome => record.coapplicant_income,
        FeatureColumn::LoanAmount => record.loan_amount,
        FeatureColumn::LoanAmountTerm => record.loan_term,
        FeatureColumn::CreditHistory => record.credit_history.code() as f64,
        FeatureColumn::PropertyArea => record.property_area.code() as f64,
    }
}

/// Field values as entered, in record order (for previews and exports).
pub fn display_fields(record: &ApplicantRecord) -> Vec<(FeatureColumn, String)> {
    FeatureColumn::ALL
        .iter()
        .map(|&col| {
            let value = match col {
                FeatureColumn::Gender => record.gender.label().to_string(),
                FeatureColumn::Married => record.married.label().to_string(),
                FeatureColumn::Dependents => record.dependents.label().to_string(),
                FeatureColumn::Education => record.education.label().to_string(),
                FeatureColumn::SelfEmployed => record.self_employed.label().to_string(),
                FeatureColumn::ApplicantIncome => format!("{:?}", record.applicant_income),
                FeatureColumn::CoapplicantIncome => format!("{:?}", record.coapplicant_income),
                FeatureColumn::LoanAmount => format!("{:?}", record.loan_amount),
                FeatureColumn::LoanAmountTerm => format_number(record.loan_term),
                FeatureColumn::CreditHistory => record.credit_history.label().to_string(),
                FeatureColumn::PropertyArea => record.property_area.label().to_string(),
            };
            (col, value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TermUnit;
    use proptest::prelude::*;

    fn sample_record() -> ApplicantRecord {
        ApplicantRecord {
            gender: Gender::Male,
            married: Married::Yes,
            dependents: Dependents::Two,
            education: Education::Graduate,
            self_employed: SelfEmployed::No,
            applicant_income: 5000.0,
            coapplicant_income: 2000.0,
            loan_amount: 150.0,
            loan_term: 360.0,
            credit_history: CreditHistory::Good,
            property_area: PropertyArea::Urban,
        }
    }

    #[test]
    fn encodes_reference_applicant_in_training_order() {
        let encoder = FeatureEncoder::default();
        let v = encoder.encode(&sample_record()).unwrap();
        assert_eq!(
            v.values(),
            &[1.0, 1.0, 2.0, 1.0, 0.0, 5000.0, 2000.0, 150.0, 360.0, 1.0, 2.0]
        );
        assert_eq!(v.layout().columns(), &FeatureColumn::ALL);
    }

    #[test]
    fn encode_follows_configured_layout() {
        let mut cols = FeatureColumn::ALL.to_vec();
        cols.swap(0, 10);
        let layout = FeatureLayout::from_columns(cols).unwrap();
        let encoder = FeatureEncoder::new(layout, LoanTermPolicy::default());
        let v = encoder.encode(&sample_record()).unwrap();
        assert_eq!(v.values()[0], 2.0);
        assert_eq!(v.values()[10], 1.0);
        assert_eq!(v.get(FeatureColumn::PropertyArea), 2.0);
    }

    #[test]
    fn parse_rejects_unknown_gender() {
        let raw = RawApplicant {
            gender: "Other".to_string(),
            ..RawApplicant::default()
        };
        let err = FeatureEncoder::default().encode_raw(&raw).unwrap_err();
        assert!(matches!(
            err,
            EncodeError::UnmappedCategory { column: FeatureColumn::Gender, ref value, .. } if value == "Other"
        ));
    }

    #[test]
    fn negative_income_is_rejected() {
        let record = ApplicantRecord {
            coapplicant_income: -1.0,
            ..sample_record()
        };
        let err = FeatureEncoder::default().encode(&record).unwrap_err();
        assert_eq!(
            err,
            EncodeError::InvalidNumeric {
                column: FeatureColumn::CoapplicantIncome,
                value: -1.0
            }
        );
    }

    #[test]
    fn loan_term_checked_against_model_policy() {
        let record = ApplicantRecord {
            loan_term: 240.0,
            ..sample_record()
        };
        let err = FeatureEncoder::default().encode(&record).unwrap_err();
        assert!(matches!(err, EncodeError::UnsupportedLoanTerm { unit: TermUnit::Months, .. }));

        let days = LoanTermPolicy { unit: TermUnit::Days, allowed: None };
        let encoder = FeatureEncoder::new(FeatureLayout::canonical(), days);
        let record = ApplicantRecord {
            loan_term: 10950.0,
            ..sample_record()
        };
        assert_eq!(encoder.encode(&record).unwrap().get(FeatureColumn::LoanAmountTerm), 10950.0);
    }

    #[test]
    fn decode_rejects_unknown_codes() {
        let encoder = FeatureEncoder::default();
        let mut v = encoder.encode(&sample_record()).unwrap();
        v.set(FeatureColumn::Married, 5.0);
        assert!(matches!(
            encoder.decode(&v),
            Err(EncodeError::UnmappedCategory { column: FeatureColumn::Married, .. })
        ));
    }

    #[test]
    fn categorical_columns_cannot_be_scaled() {
        let err = FeatureEncoder::default()
            .with_scaled_columns(vec![FeatureColumn::Gender])
            .unwrap_err();
        assert!(matches!(err, EncodeError::InvalidScaler(_)));
    }

    #[test]
    fn display_fields_keep_record_order_and_labels() {
        let fields = display_fields(&sample_record());
        assert_eq!(fields.len(), 11);
        assert_eq!(fields[2], (FeatureColumn::Dependents, "2".to_string()));
        assert_eq!(fields[5], (FeatureColumn::ApplicantIncome, "5000.0".to_string()));
        assert_eq!(fields[8], (FeatureColumn::LoanAmountTerm, "360".to_string()));
        assert_eq!(fields[9], (FeatureColumn::CreditHistory, "1.0".to_string()));
    }

    fn arb_record() -> impl Strategy<Value = ApplicantRecord> {
        (
            (
                prop::sample::select(vec![Gender::Male, Gender::Female]),
                prop::sample::select(vec![Married::Yes, Married::No]),
                prop::sample::select(vec![
                    Dependents::Zero,
                    Dependents::One,
                    Dependents::Two,
                    Dependents::ThreePlus,
                ]),
                prop::sample::select(vec![Education::Graduate, Education::NotGraduate]),
                prop::sample::select(vec![SelfEmployed::Yes, SelfEmployed::No]),
                prop::sample::select(vec![CreditHistory::Good, CreditHistory::Bad]),
                prop::sample::select(vec![PropertyArea::Urban, PropertyArea::Rural, PropertyArea::Semiurban]),
            ),
            (
                0.0..1e6f64,
                0.0..1e6f64,
                0.0..1e4f64,
                prop::sample::select(vec![360.0, 180.0, 120.0, 60.0]),
            ),
        )
            .prop_map(
                |(
                    (gender, married, dependents, education, self_employed, credit_history, property_area),
                    (applicant_income, coapplicant_income, loan_amount, loan_term),
                )| ApplicantRecord {
                    gender,
                    married,
                    dependents,
                    education,
                    self_employed,
                    applicant_income,
                    coapplicant_income,
                    loan_amount,
                    loan_term,
                    credit_history,
                    property_area,
                },
            )
    }

    proptest! {
        #[test]
        fn decode_inverts_encode(record in arb_record()) {
            let encoder = FeatureEncoder::default();
            let v = encoder.encode(&record).unwrap();
            prop_assert_eq!(encoder.decode(&v).unwrap(), record);
        }

        #[test]
        fn encoding_is_deterministic(record in arb_record()) {
            let encoder = FeatureEncoder::default();
            prop_assert_eq!(encoder.encode(&record).unwrap(), encoder.encode(&record).unwrap());
        }

        #[test]
        fn labels_survive_parse(record in arb_record()) {
            let raw = RawApplicant {
                gender: record.gender.label().to_string(),
                married: record.married.label().to_string(),
                dependents: record.dependents.label().to_string(),
                education: record.education.label().to_string(),
                self_employed: record.self_employed.label().to_string(),
                applicant_income: record.applicant_income,
                coapplicant_income: record.coapplicant_income,
                loan_amount: record.loan_amount,
                loan_term: record.loan_term,
                credit_history: record.credit_history.label().to_string(),
                property_area: record.property_area.label().to_string(),
            };
            prop_assert_eq!(FeatureEncoder::default().parse(&raw).unwrap(), record.clone());
            prop_assert_eq!(format_number(record.loan_term).parse::<f64>().unwrap(), record.loan_term);
        }
    }
}
