//! Scoring request schema: the eighteen raw fields as submitted by the simulator form,
//! with the declared ranges and vocabularies checked on conversion to a [`CustomerRecord`].

use super::categories::{
    CardCategory, Categorical, EducationLevel, Gender, IncomeCategory, MaritalStatus,
};
use super::CustomerRecord;
use crate::error::ScoringError;
use serde::{Deserialize, Serialize};

/// Closed numeric range for one request field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct FieldRange {
    pub field: &'static str,
    pub min: f64,
    pub max: f64,
    /// Counts and months must be whole numbers
    pub integral: bool,
}

const fn count(field: &'static str, min: f64, max: f64) -> FieldRange {
    FieldRange { field, min, max, integral: true }
}

const fn amount(field: &'static str, min: f64, max: f64) -> FieldRange {
    FieldRange { field, min, max, integral: false }
}

pub(crate) const CUSTOMER_AGE: FieldRange = count("customer_age", 18.0, 100.0);
pub(crate) const DEPENDENT_COUNT: FieldRange = count("dependent_count", 0.0, 10.0);
pub(crate) const MONTHS_ON_BOOK: FieldRange = count("months_on_book", 0.0, 120.0);
pub(crate) const TOTAL_RELATIONSHIP_COUNT: FieldRange = count("total_relationship_count", 1.0, 10.0);
pub(crate) const MONTHS_INACTIVE_12_MON: FieldRange = count("months_inactive_12_mon", 0.0, 12.0);
pub(crate) const CONTACTS_COUNT_12_MON: FieldRange = count("contacts_count_12_mon", 0.0, 12.0);
pub(crate) const CREDIT_LIMIT: FieldRange = amount("credit_limit", 0.0, 50_000.0);
pub(crate) const TOTAL_REVOLVING_BAL: FieldRange = amount("total_revolving_bal", 0.0, 5_000.0);
pub(crate) const TOTAL_AMT_CHNG_Q4_Q1: FieldRange = amount("total_amt_chng_q4_q1", 0.0, 5.0);
pub(crate) const TOTAL_TRANS_AMT: FieldRange = amount("total_trans_amt", 0.0, 20_000.0);
pub(crate) const TOTAL_TRANS_CT: FieldRange = count("total_trans_ct", 0.0, 200.0);
pub(crate) const TOTAL_CT_CHNG_Q4_Q1: FieldRange = amount("total_ct_chng_q4_q1", 0.0, 5.0);
pub(crate) const AVG_UTILIZATION_RATIO: FieldRange = amount("avg_utilization_ratio", 0.0, 1.0);

impl FieldRange {
    pub(crate) fn check(&self, value: f64) -> Result<f64, ScoringError> {
        if !value.is_finite() {
            return Err(ScoringError::invalid(self.field, "must be a finite number"));
        }
        if value < self.min || value > self.max {
            return Err(ScoringError::invalid(
                self.field,
                format!("{} is outside [{}, {}]", value, self.min, self.max),
            ));
        }
        if self.integral && value.fract() != 0.0 {
            return Err(ScoringError::invalid(
                self.field,
                format!("{} is not a whole number", value),
            ));
        }
        Ok(value)
    }

    fn check_count(&self, value: f64) -> Result<u32, ScoringError> {
        // range already bounds the value well inside u32
        self.check(value).map(|v| v as u32)
    }
}

/// Raw simulator request. Every field is required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScoringRequest {
    pub customer_age: f64,
    pub gender: String,
    pub dependent_count: f64,
    pub education_level: String,
    pub marital_status: String,
    pub income_category: String,
    pub card_category: String,
    pub months_on_book: f64,
    pub total_relationship_count: f64,
    pub months_inactive_12_mon: f64,
    pub contacts_count_12_mon: f64,
    pub credit_limit: f64,
    pub total_revolving_bal: f64,
    pub total_amt_chng_q4_q1: f64,
    pub total_trans_amt: f64,
    pub total_trans_ct: f64,
    pub total_ct_chng_q4_q1: f64,
    pub avg_utilization_ratio: f64,
}

fn category<T: Categorical>(field: &'static str, raw: &str) -> Result<T, ScoringError> {
    T::parse(raw).map_err(|reason| ScoringError::invalid(field, reason))
}

impl TryFrom<&ScoringRequest> for CustomerRecord {
    type Error = ScoringError;

    fn try_from(r: &ScoringRequest) -> Result<Self, Self::Error> {
        Ok(CustomerRecord {
            customer_age: CUSTOMER_AGE.check_count(r.customer_age)?,
            gender: category::<Gender>("gender", &r.gender)?,
            dependent_count: DEPENDENT_COUNT.check_count(r.dependent_count)?,
            education_level: category::<EducationLevel>("education_level", &r.education_level)?,
            marital_status: category::<MaritalStatus>("marital_status", &r.marital_status)?,
            income_category: category::<IncomeCategory>("income_category", &r.income_category)?,
            card_category: category::<CardCategory>("card_category", &r.card_category)?,
            months_on_book: MONTHS_ON_BOOK.check_count(r.months_on_book)?,
            total_relationship_count: TOTAL_RELATIONSHIP_COUNT
                .check_count(r.total_relationship_count)?,
            months_inactive_12_mon: MONTHS_INACTIVE_12_MON.check_count(r.months_inactive_12_mon)?,
            contacts_count_12_mon: CONTACTS_COUNT_12_MON.check_count(r.contacts_count_12_mon)?,
            credit_limit: CREDIT_LIMIT.check(r.credit_limit)?,
            total_revolving_bal: TOTAL_REVOLVING_BAL.check(r.total_revolving_bal)?,
            total_amt_chng_q4_q1: TOTAL_AMT_CHNG_Q4_Q1.check(r.total_amt_chng_q4_q1)?,
            total_trans_amt: TOTAL_TRANS_AMT.check(r.total_trans_amt)?,
            total_trans_ct: TOTAL_TRANS_CT.check_count(r.total_trans_ct)?,
            total_ct_chng_q4_q1: TOTAL_CT_CHNG_Q4_Q1.check(r.total_ct_chng_q4_q1)?,
            avg_utilization_ratio: AVG_UTILIZATION_RATIO.check(r.avg_utilization_ratio)?,
        })
    }
}

impl TryFrom<ScoringRequest> for CustomerRecord {
    type Error = ScoringError;

    fn try_from(r: ScoringRequest) -> Result<Self, Self::Error> {
        CustomerRecord::try_from(&r)
    }
}

impl From<&CustomerRecord> for ScoringRequest {
    fn from(c: &CustomerRecord) -> Self {
        Self {
            customer_age: c.customer_age as f64,
            gender: c.gender.as_str().to_string(),
            dependent_count: c.dependent_count as f64,
            education_level: c.education_level.as_str().to_string(),
            marital_status: c.marital_status.as_str().to_string(),
            income_category: c.income_category.as_str().to_string(),
            card_category: c.card_category.as_str().to_string(),
            months_on_book: c.months_on_book as f64,
            total_relationship_count: c.total_relationship_count as f64,
            months_inactive_12_mon: c.months_inactive_12_mon as f64,
            contacts_count_12_mon: c.contacts_count_12_mon as f64,
            credit_limit: c.credit_limit,
            total_revolving_bal: c.total_revolving_bal,
            total_amt_chng_q4_q1: c.total_amt_chng_q4_q1,
            total_trans_amt: c.total_trans_amt,
            total_trans_ct: c.total_trans_ct as f64,
            total_ct_chng_q4_q1: c.total_ct_chng_q4_q1,
            avg_utilization_ratio: c.avg_utilization_ratio,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form_defaults() -> ScoringRequest {
        ScoringRequest::from(&CustomerRecord::example())
    }

    #[test]
    fn form_defaults_are_valid() {
        let rec = CustomerRecord::try_from(form_defaults()).unwrap();
        assert_eq!(rec, CustomerRecord::example());
    }

    #[test]
    fn rejects_empty_education_level() {
        let mut req = form_defaults();
        req.education_level = String::new();
        match CustomerRecord::try_from(&req) {
            Err(ScoringError::InvalidInput { field, .. }) => assert_eq!(field, "education_level"),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn rejects_respaced_labels() {
        let mut req = form_defaults();
        req.education_level = "HighSchool".into();
        let err = CustomerRecord::try_from(&req).unwrap_err();
        assert!(matches!(err, ScoringError::InvalidInput { field: "education_level", .. }));

        let mut req = form_defaults();
        req.marital_status = "Mar\tried".into();
        let err = CustomerRecord::try_from(&req).unwrap_err();
        assert!(matches!(err, ScoringError::InvalidInput { field: "marital_status", .. }));

        let mut req = form_defaults();
        req.income_category = "$120K+".into();
        assert!(CustomerRecord::try_from(&req).is_ok());
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let mut req = form_defaults();
        req.customer_age = 18.0;
        req.months_on_book = 0.0;
        req.credit_limit = 0.0;
        req.avg_utilization_ratio = 1.0;
        assert!(CustomerRecord::try_from(&req).is_ok());

        req.customer_age = 101.0;
        let err = CustomerRecord::try_from(&req).unwrap_err();
        assert!(matches!(err, ScoringError::InvalidInput { field: "customer_age", .. }));
    }

    #[test]
    fn counts_must_be_whole() {
        let mut req = form_defaults();
        req.total_trans_ct = 60.5;
        let err = CustomerRecord::try_from(&req).unwrap_err();
        assert!(matches!(err, ScoringError::InvalidInput { field: "total_trans_ct", .. }));
    }

    #[test]
    fn nan_is_rejected() {
        let mut req = form_defaults();
        req.total_amt_chng_q4_q1 = f64::NAN;
        assert!(CustomerRecord::try_from(&req).is_err());
    }

    #[test]
    fn missing_field_fails_to_parse() {
        let json = r#"{"customer_age": 45, "gender": "M"}"#;
        assert!(serde_json::from_str::<ScoringRequest>(json).is_err());
    }
}
