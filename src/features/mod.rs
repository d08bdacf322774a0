//! Customer records and the fixed feature-engineering transform applied before inference.

mod categories;
mod derive;
mod schema;

pub use categories::{
    CardCategory, Categorical, EducationLevel, Gender, IncomeCategory, MaritalStatus,
};
pub use derive::{
    derive_batch, derive_features, AgeGroup, DerivedFeatures, TenureSegment, UtilizationStatus,
};
pub use schema::ScoringRequest;

use serde::{Deserialize, Serialize};

/// One customer as submitted for scoring. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub customer_age: u32,
    pub gender: Gender,
    pub dependent_count: u32,
    pub education_level: EducationLevel,
    pub marital_status: MaritalStatus,
    pub income_category: IncomeCategory,
    pub card_category: CardCategory,
    /// Tenure in months
    pub months_on_book: u32,
    pub total_relationship_count: u32,
    pub months_inactive_12_mon: u32,
    pub contacts_count_12_mon: u32,
    pub credit_limit: f64,
    pub total_revolving_bal: f64,
    pub total_amt_chng_q4_q1: f64,
    pub total_trans_amt: f64,
    pub total_trans_ct: u32,
    pub total_ct_chng_q4_q1: f64,
    pub avg_utilization_ratio: f64,
}

impl CustomerRecord {
    /// The simulator form's initial values.
    pub fn example() -> Self {
        Self {
            customer_age: 45,
            gender: Gender::M,
            dependent_count: 2,
            education_level: EducationLevel::Uneducated,
            marital_status: MaritalStatus::Divorced,
            income_category: IncomeCategory::LessThan40K,
            card_category: CardCategory::Blue,
            months_on_book: 36,
            total_relationship_count: 3,
            months_inactive_12_mon: 1,
            contacts_count_12_mon: 2,
            credit_limit: 10_000.0,
            total_revolving_bal: 1_000.0,
            total_amt_chng_q4_q1: 0.7,
            total_trans_amt: 4_000.0,
            total_trans_ct: 60,
            total_ct_chng_q4_q1: 0.7,
            avg_utilization_ratio: 0.2,
        }
    }
}

/// CustomerRecord plus the derived columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedRecord {
    #[serde(flatten)]
    pub record: CustomerRecord,
    #[serde(flatten)]
    pub derived: DerivedFeatures,
}

/// Cell of the table handed to the classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Numeric(f64),
    Categorical(String),
}

/// One row of named columns, in pipeline input order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureRow {
    columns: Vec<(&'static str, FeatureValue)>,
}

impl FeatureRow {
    pub fn push(&mut self, name: &'static str, value: FeatureValue) {
        self.columns.push((name, value));
    }

    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.columns
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }

    pub fn columns(&self) -> impl Iterator<Item = (&'static str, &FeatureValue)> {
        self.columns.iter().map(|(n, v)| (*n, v))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl DerivedRecord {
    /// Raw columns first (request order), then derived columns (derivation order).
    pub fn to_row(&self) -> FeatureRow {
        use FeatureValue::{Categorical as Cat, Numeric as Num};

        let r = &self.record;
        let d = &self.derived;
        let mut row = FeatureRow::default();
        row.push("customer_age", Num(r.customer_age as f64));
        row.push("gender", Cat(r.gender.as_str().into()));
        row.push("dependent_count", Num(r.dependent_count as f64));
        row.push("education_level", Cat(r.education_level.as_str().into()));
        row.push("marital_status", Cat(r.marital_status.as_str().into()));
        row.push("income_category", Cat(r.income_category.as_str().into()));
        row.push("card_category", Cat(r.card_category.as_str().into()));
        row.push("months_on_book", Num(r.months_on_book as f64));
        row.push("total_relationship_count", Num(r.total_relationship_count as f64));
        row.push("months_inactive_12_mon", Num(r.months_inactive_12_mon as f64));
        row.push("contacts_count_12_mon", Num(r.contacts_count_12_mon as f64));
        row.push("credit_limit", Num(r.credit_limit));
        row.push("total_revolving_bal", Num(r.total_revolving_bal));
        row.push("total_amt_chng_q4_q1", Num(r.total_amt_chng_q4_q1));
        row.push("total_trans_amt", Num(r.total_trans_amt));
        row.push("total_trans_ct", Num(r.total_trans_ct as f64));
        row.push("total_ct_chng_q4_q1", Num(r.total_ct_chng_q4_q1));
        row.push("avg_utilization_ratio", Num(r.avg_utilization_ratio));

        row.push("age_group", Cat(d.age_group.as_str().into()));
        row.push("tenure_segment", Cat(d.tenure_segment.as_str().into()));
        row.push("trans_per_month", Num(d.trans_per_month));
        row.push("amt_per_month", Num(d.amt_per_month));
        row.push("utilization_status", Cat(d.utilization_status.as_str().into()));
        row.push("revolving_ratio", Num(d.revolving_ratio));
        row.push("inactive_ratio", Num(d.inactive_ratio));
        row.push("util_gap", Num(d.util_gap));
        row.push("product_per_year", Num(d.product_per_year));
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_has_raw_then_derived_columns() {
        let row = derive_features(&CustomerRecord::example()).to_row();
        assert_eq!(row.len(), 27);
        let names: Vec<&str> = row.columns().map(|(n, _)| n).collect();
        assert_eq!(names[0], "customer_age");
        assert_eq!(names[17], "avg_utilization_ratio");
        assert_eq!(names[18], "age_group");
        assert_eq!(names[26], "product_per_year");
        assert_eq!(
            row.get("income_category"),
            Some(&FeatureValue::Categorical("Less than $40K".into()))
        );
    }

    #[test]
    fn derived_record_serializes_flat() {
        let d = derive_features(&CustomerRecord::example());
        let v = serde_json::to_value(&d).unwrap();
        assert_eq!(v["customer_age"], 45);
        assert_eq!(v["age_group"], "Senior");
        assert_eq!(v["education_level"], "Uneducated");
    }
}
