//! Feature deriver: per-record bucketing and ratio columns.
//!
//! Every derived column is a pure function of a single [`CustomerRecord`]. The `+ 1`
//! denominators are part of the transform the model was fitted against and must not change.

use super::{CustomerRecord, DerivedRecord};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    Young,
    Adult,
    Senior,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TenureSegment {
    New,
    Mid,
    Long,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UtilizationStatus {
    Low,
    Medium,
    High,
}

impl AgeGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgeGroup::Young => "Young",
            AgeGroup::Adult => "Adult",
            AgeGroup::Senior => "Senior",
        }
    }
}

impl TenureSegment {
    pub fn as_str(&self) -> &'static str {
        match self {
            TenureSegment::New => "New",
            TenureSegment::Mid => "Mid",
            TenureSegment::Long => "Long",
        }
    }
}

impl UtilizationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UtilizationStatus::Low => "Low",
            UtilizationStatus::Medium => "Medium",
            UtilizationStatus::High => "High",
        }
    }
}

/// Ordered `(exclusive upper bound, label)` pairs; first match wins, `default` otherwise.
/// Lower bounds are implied by the previous row, so buckets are half-open `[lo, hi)`.
struct Buckets<T: 'static> {
    bounds: &'static [(f64, T)],
    default: T,
}

impl<T: Copy + 'static> Buckets<T> {
    fn assign(&self, value: f64) -> T {
        self.bounds
            .iter()
            .find(|(upper, _)| value < *upper)
            .map(|(_, label)| *label)
            .unwrap_or(self.default)
    }
}

const AGE_GROUPS: Buckets<AgeGroup> = Buckets {
    bounds: &[(30.0, AgeGroup::Young), (45.0, AgeGroup::Adult)],
    default: AgeGroup::Senior,
};

const TENURE_SEGMENTS: Buckets<TenureSegment> = Buckets {
    bounds: &[(24.0, TenureSegment::New), (48.0, TenureSegment::Mid)],
    default: TenureSegment::Long,
};

const UTILIZATION: Buckets<UtilizationStatus> = Buckets {
    bounds: &[(0.3, UtilizationStatus::Low), (0.7, UtilizationStatus::Medium)],
    default: UtilizationStatus::High,
};

/// Columns added by the transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedFeatures {
    pub age_group: AgeGroup,
    pub tenure_segment: TenureSegment,
    pub trans_per_month: f64,
    pub amt_per_month: f64,
    pub utilization_status: UtilizationStatus,
    pub revolving_ratio: f64,
    pub inactive_ratio: f64,
    pub util_gap: f64,
    pub product_per_year: f64,
}

impl DerivedFeatures {
    pub fn compute(r: &CustomerRecord) -> Self {
        let tenure = r.months_on_book as f64;
        let tenure_plus_one = tenure + 1.0;

        Self {
            age_group: AGE_GROUPS.assign(r.customer_age as f64),
            tenure_segment: TENURE_SEGMENTS.assign(tenure),
            trans_per_month: r.total_trans_ct as f64 / tenure_plus_one,
            amt_per_month: r.total_trans_amt / tenure_plus_one,
            utilization_status: UTILIZATION.assign(r.avg_utilization_ratio),
            revolving_ratio: r.total_revolving_bal / (r.credit_limit + 1.0),
            inactive_ratio: r.months_inactive_12_mon as f64 / tenure_plus_one,
            util_gap: 1.0 - r.avg_utilization_ratio,
            product_per_year: r.total_relationship_count as f64 / (tenure / 12.0 + 1.0),
        }
    }
}

/// Extend one record with its derived columns. The input is left untouched.
pub fn derive_features(record: &CustomerRecord) -> DerivedRecord {
    DerivedRecord {
        record: record.clone(),
        derived: DerivedFeatures::compute(record),
    }
}

/// Row-wise [`derive_features`] over a batch; output order follows input order.
pub fn derive_batch(records: &[CustomerRecord]) -> Vec<DerivedRecord> {
    records.iter().map(derive_features).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn with_age(age: u32) -> CustomerRecord {
        CustomerRecord {
            customer_age: age,
            ..CustomerRecord::example()
        }
    }

    fn with_tenure(months: u32) -> CustomerRecord {
        CustomerRecord {
            months_on_book: months,
            ..CustomerRecord::example()
        }
    }

    fn with_utilization(ratio: f64) -> CustomerRecord {
        CustomerRecord {
            avg_utilization_ratio: ratio,
            ..CustomerRecord::example()
        }
    }

    #[test]
    fn age_buckets_are_half_open() {
        let group = |age| DerivedFeatures::compute(&with_age(age)).age_group;
        assert_eq!(group(18), AgeGroup::Young);
        assert_eq!(group(29), AgeGroup::Young);
        assert_eq!(group(30), AgeGroup::Adult);
        assert_eq!(group(44), AgeGroup::Adult);
        assert_eq!(group(45), AgeGroup::Senior);
        assert_eq!(group(100), AgeGroup::Senior);
    }

    #[test]
    fn tenure_buckets_are_half_open() {
        let seg = |m| DerivedFeatures::compute(&with_tenure(m)).tenure_segment;
        assert_eq!(seg(0), TenureSegment::New);
        assert_eq!(seg(23), TenureSegment::New);
        assert_eq!(seg(24), TenureSegment::Mid);
        assert_eq!(seg(47), TenureSegment::Mid);
        assert_eq!(seg(48), TenureSegment::Long);
    }

    #[test]
    fn utilization_buckets_are_half_open() {
        let status = |r| DerivedFeatures::compute(&with_utilization(r)).utilization_status;
        assert_eq!(status(0.0), UtilizationStatus::Low);
        assert_eq!(status(0.29999), UtilizationStatus::Low);
        assert_eq!(status(0.3), UtilizationStatus::Medium);
        assert_eq!(status(0.69999), UtilizationStatus::Medium);
        assert_eq!(status(0.7), UtilizationStatus::High);
        assert_eq!(status(1.0), UtilizationStatus::High);
    }

    #[test]
    fn zero_tenure_and_limit_stay_finite() {
        let rec = CustomerRecord {
            months_on_book: 0,
            credit_limit: 0.0,
            ..CustomerRecord::example()
        };
        let d = DerivedFeatures::compute(&rec);
        assert_eq!(d.trans_per_month, 60.0);
        assert_eq!(d.amt_per_month, 4_000.0);
        assert_eq!(d.inactive_ratio, 1.0);
        assert_eq!(d.revolving_ratio, 1_000.0);
        assert_eq!(d.product_per_year, 3.0);
    }

    #[test]
    fn trans_per_month_uses_tenure_plus_one() {
        for months in [0u32, 1, 11, 36, 120] {
            let d = DerivedFeatures::compute(&with_tenure(months));
            assert!(d.trans_per_month.is_finite());
            assert_eq!(d.trans_per_month, 60.0 / (months as f64 + 1.0));
        }
    }

    #[test]
    fn util_gap_complements_ratio() {
        for r in [0.0, 0.05, 0.2, 0.3, 0.5, 0.73, 0.999, 1.0] {
            let d = DerivedFeatures::compute(&with_utilization(r));
            assert_eq!(d.util_gap + r, 1.0, "ratio {}", r);
        }
    }

    #[test]
    fn reference_customer() {
        let rec = CustomerRecord {
            customer_age: 45,
            months_on_book: 36,
            total_trans_ct: 60,
            total_revolving_bal: 1_000.0,
            credit_limit: 10_000.0,
            avg_utilization_ratio: 0.2,
            ..CustomerRecord::example()
        };
        let d = DerivedFeatures::compute(&rec);
        assert_eq!(d.age_group, AgeGroup::Senior);
        assert_eq!(d.tenure_segment, TenureSegment::Mid);
        assert!(approx(d.trans_per_month, 60.0 / 37.0));
        assert!((d.trans_per_month - 1.6216).abs() < 1e-4);
        assert!(approx(d.revolving_ratio, 1_000.0 / 10_001.0));
        assert!((d.revolving_ratio - 0.09999).abs() < 1e-5);
        assert_eq!(d.utilization_status, UtilizationStatus::Low);
        assert!(approx(d.util_gap, 0.8));
        assert!(approx(d.product_per_year, 3.0 / 4.0));
    }

    #[test]
    fn batch_preserves_order_and_input() {
        let records = vec![with_age(25), with_age(35), with_age(60)];
        let before = records.clone();
        let out = derive_batch(&records);
        assert_eq!(records, before);
        let groups: Vec<AgeGroup> = out.iter().map(|d| d.derived.age_group).collect();
        assert_eq!(groups, vec![AgeGroup::Young, AgeGroup::Adult, AgeGroup::Senior]);
        assert_eq!(out[1].record, records[1]);
    }
}
