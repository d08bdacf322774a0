//! Categorical vocabularies of the customer record, spelled as in the training data.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A closed set of labels with a canonical spelling.
pub trait Categorical: Copy + Sized + 'static {
    const ALL: &'static [Self];

    fn as_str(&self) -> &'static str;

    /// Other accepted spellings of this label.
    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }

    /// Exact match on the canonical spelling or one of its aliases.
    fn parse(raw: &str) -> Result<Self, String> {
        Self::ALL
            .iter()
            .find(|v| v.as_str() == raw || v.aliases().iter().any(|a| *a == raw))
            .copied()
            .ok_or_else(|| {
                let allowed: Vec<&str> = Self::ALL.iter().map(|v| v.as_str()).collect();
                format!("{:?} is not one of {:?}", raw, allowed)
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    M,
    F,
}

impl Categorical for Gender {
    const ALL: &'static [Self] = &[Gender::M, Gender::F];

    fn as_str(&self) -> &'static str {
        match self {
            Gender::M => "M",
            Gender::F => "F",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EducationLevel {
    Uneducated,
    #[serde(rename = "High School")]
    HighSchool,
    College,
    Graduate,
    #[serde(rename = "Post-Graduate")]
    PostGraduate,
    Doctorate,
}

impl Categorical for EducationLevel {
    const ALL: &'static [Self] = &[
        EducationLevel::Uneducated,
        EducationLevel::HighSchool,
        EducationLevel::College,
        EducationLevel::Graduate,
        EducationLevel::PostGraduate,
        EducationLevel::Doctorate,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            EducationLevel::Uneducated => "Uneducated",
            EducationLevel::HighSchool => "High School",
            EducationLevel::College => "College",
            EducationLevel::Graduate => "Graduate",
            EducationLevel::PostGraduate => "Post-Graduate",
            EducationLevel::Doctorate => "Doctorate",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaritalStatus {
    Divorced,
    Married,
    Single,
    Unknown,
}

impl Categorical for MaritalStatus {
    const ALL: &'static [Self] = &[
        MaritalStatus::Divorced,
        MaritalStatus::Married,
        MaritalStatus::Single,
        MaritalStatus::Unknown,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            MaritalStatus::Divorced => "Divorced",
            MaritalStatus::Married => "Married",
            MaritalStatus::Single => "Single",
            MaritalStatus::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IncomeCategory {
    #[serde(rename = "Less than $40K")]
    LessThan40K,
    #[serde(rename = "$40K - $60K", alias = "$40K-$60K")]
    From40KTo60K,
    #[serde(rename = "$60K - $80K", alias = "$60K-$80K")]
    From60KTo80K,
    #[serde(rename = "$80K - $120K", alias = "$80K-$120K")]
    From80KTo120K,
    #[serde(rename = "$120K +", alias = "$120K+")]
    Above120K,
}

impl Categorical for IncomeCategory {
    const ALL: &'static [Self] = &[
        IncomeCategory::LessThan40K,
        IncomeCategory::From40KTo60K,
        IncomeCategory::From60KTo80K,
        IncomeCategory::From80KTo120K,
        IncomeCategory::Above120K,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            IncomeCategory::LessThan40K => "Less than $40K",
            IncomeCategory::From40KTo60K => "$40K - $60K",
            IncomeCategory::From60KTo80K => "$60K - $80K",
            IncomeCategory::From80KTo120K => "$80K - $120K",
            IncomeCategory::Above120K => "$120K +",
        }
    }

    fn aliases(&self) -> &'static [&'static str] {
        match self {
            IncomeCategory::LessThan40K => &[],
            IncomeCategory::From40KTo60K => &["$40K-$60K"],
            IncomeCategory::From60KTo80K => &["$60K-$80K"],
            IncomeCategory::From80KTo120K => &["$80K-$120K"],
            IncomeCategory::Above120K => &["$120K+"],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardCategory {
    Blue,
    Silver,
    Gold,
    Platinum,
}

impl Categorical for CardCategory {
    const ALL: &'static [Self] = &[
        CardCategory::Blue,
        CardCategory::Silver,
        CardCategory::Gold,
        CardCategory::Platinum,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            CardCategory::Blue => "Blue",
            CardCategory::Silver => "Silver",
            CardCategory::Gold => "Gold",
            CardCategory::Platinum => "Platinum",
        }
    }
}

macro_rules! display_as_str {
    ($($t:ty),*) => {
        $(impl fmt::Display for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(Gender, EducationLevel, MaritalStatus, IncomeCategory, CardCategory);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn income_accepts_compact_spelling() {
        assert_eq!(
            IncomeCategory::parse("$40K-$60K").unwrap(),
            IncomeCategory::From40KTo60K
        );
        assert_eq!(
            IncomeCategory::parse("$120K+").unwrap(),
            IncomeCategory::Above120K
        );
        assert_eq!(IncomeCategory::Above120K.as_str(), "$120K +");
    }

    #[test]
    fn empty_label_is_rejected() {
        let err = EducationLevel::parse("").unwrap_err();
        assert!(err.contains("Post-Graduate"));
        assert!(EducationLevel::parse("   ").is_err());
    }

    #[test]
    fn spacing_variants_are_not_aliases() {
        assert!(EducationLevel::parse("HighSchool").is_err());
        assert!(EducationLevel::parse("G r a d u a t e").is_err());
        assert!(MaritalStatus::parse("Mar\tried").is_err());
        assert!(IncomeCategory::parse("$40K -$60K").is_err());
        assert!(IncomeCategory::parse("Lessthan$40K").is_err());
    }

    #[test]
    fn labels_are_case_sensitive() {
        assert!(Gender::parse("m").is_err());
        assert_eq!(Gender::parse("F").unwrap(), Gender::F);
        assert_eq!(
            EducationLevel::parse("High School").unwrap(),
            EducationLevel::HighSchool
        );
    }
}
