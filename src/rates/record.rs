//! Document shape of a rates file.
//!
//! These records mirror the YAML exactly and carry no invariants; they are
//! turned into validated models by [`RateItem::try_from_record`].
//!
//! [`RateItem::try_from_record`]: super::RateItem::try_from_record

use serde::{Deserialize, Serialize};

use super::model::RateType;

/// One entry of a rate's history, as written in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RateValueRecord {
    /// The value, interpreted according to the owning item's type.
    pub value: String,
    /// First month the value applies to (`YYYY-MM`).
    pub from: String,
    /// First month the value no longer applies to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub until: Option<String>,
}

/// A named rate, as written in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RateItemRecord {
    /// Unique name of the rate.
    pub name: String,
    /// Declared type of every value in the history.
    #[serde(rename = "type")]
    pub rate_type: RateType,
    /// Dated values of the rate.
    pub history: Vec<RateValueRecord>,
}
