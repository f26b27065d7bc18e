//! Validated rate models.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DataError, DataResult};
use crate::temporal::{Period, TemporalRange, ensure_no_overlap};

use super::record::{RateItemRecord, RateValueRecord};

/// Declared type of a rate's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RateType {
    /// Decimal number, e.g. `"0.013"`.
    #[serde(rename = "Decimal")]
    Decimal,
    /// Boolean flag, written `"True"` or `"False"`.
    #[serde(rename = "bool")]
    Bool,
    /// Free text.
    #[serde(rename = "str")]
    Text,
}

impl RateType {
    /// The tag used for this type in documents.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Decimal => "Decimal",
            Self::Bool => "bool",
            Self::Text => "str",
        }
    }

    /// Parses a raw value string under this type.
    ///
    /// Booleans accept only the literal tokens `True` and `False`.
    ///
    /// # Examples
    ///
    /// ```
    /// use nerc_rates::rates::{RateType, TypedValue};
    ///
    /// assert_eq!(RateType::Bool.parse_value("True"), Some(TypedValue::Bool(true)));
    /// assert_eq!(RateType::Bool.parse_value("true"), None);
    /// assert!(RateType::Decimal.parse_value("0.013").is_some());
    /// ```
    pub fn parse_value(self, raw: &str) -> Option<TypedValue> {
        match self {
            Self::Decimal => {
                let trimmed = raw.trim();
                Decimal::from_str(trimmed)
                    .or_else(|_| Decimal::from_scientific(trimmed))
                    .ok()
                    .map(TypedValue::Decimal)
            }
            Self::Bool => match raw {
                "True" => Some(TypedValue::Bool(true)),
                "False" => Some(TypedValue::Bool(false)),
                _ => None,
            },
            Self::Text => Some(TypedValue::Text(raw.to_string())),
        }
    }
}

impl fmt::Display for RateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rate value resolved to its declared type at load time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypedValue {
    /// A decimal rate.
    Decimal(Decimal),
    /// A boolean flag.
    Bool(bool),
    /// A text value.
    Text(String),
}

impl TypedValue {
    /// The type this value was parsed as.
    pub fn rate_type(&self) -> RateType {
        match self {
            Self::Decimal(_) => RateType::Decimal,
            Self::Bool(_) => RateType::Bool,
            Self::Text(_) => RateType::Text,
        }
    }

    /// Returns the decimal, if this is a decimal value.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Decimal(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the flag, if this is a boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the text, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decimal(value) => write!(f, "{value}"),
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

/// One validated entry of a rate's history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateValue {
    range: TemporalRange<Period>,
    value: TypedValue,
    raw: String,
}

impl RateValue {
    fn try_from_record(name: &str, rate_type: RateType, record: RateValueRecord) -> DataResult<Self> {
        let from: Period = record.from.parse()?;
        let until = record.until.as_deref().map(str::parse::<Period>).transpose()?;
        let range = TemporalRange::new(from, until)?;

        let value = rate_type
            .parse_value(&record.value)
            .ok_or_else(|| DataError::TypeConversion {
                name: name.to_string(),
                value: record.value.clone(),
                expected: rate_type.to_string(),
            })?;

        Ok(Self {
            range,
            value,
            raw: record.value,
        })
    }

    /// The months this value applies to.
    pub fn range(&self) -> &TemporalRange<Period> {
        &self.range
    }

    /// The typed value.
    pub fn value(&self) -> &TypedValue {
        &self.value
    }

    /// The value exactly as written in the document.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    fn to_record(&self) -> RateValueRecord {
        RateValueRecord {
            value: self.raw.clone(),
            from: self.range.from().to_string(),
            until: self.range.until().map(|until| until.to_string()),
        }
    }
}

/// A validated, named rate with a non-overlapping history.
///
/// The history is kept sorted by start month, so at most one entry can
/// contain any given period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateItem {
    name: String,
    rate_type: RateType,
    history: Vec<RateValue>,
}

impl RateItem {
    /// Validates a document record.
    ///
    /// # Errors
    ///
    /// - [`DataError::EmptyHistory`] if the history has no entries
    /// - [`DataError::InvalidPeriod`] if a `from`/`until` is not `YYYY-MM`
    /// - [`DataError::RangeOrder`] if an entry ends on or before it starts
    /// - [`DataError::TypeConversion`] if a value does not parse under `type`
    /// - [`DataError::OverlappingRange`] if two entries overlap
    pub fn try_from_record(record: RateItemRecord) -> DataResult<Self> {
        let RateItemRecord {
            name,
            rate_type,
            history,
        } = record;

        if history.is_empty() {
            return Err(DataError::EmptyHistory { name });
        }

        let mut history = history
            .into_iter()
            .map(|entry| RateValue::try_from_record(&name, rate_type, entry))
            .collect::<DataResult<Vec<_>>>()?;

        history.sort_by_key(|entry| entry.range.from());
        ensure_no_overlap(&name, history.iter().map(RateValue::range))?;

        debug!(rate = %name, rate_type = %rate_type, entries = history.len(), "validated rate item");

        Ok(Self {
            name,
            rate_type,
            history,
        })
    }

    /// The unique name of the rate.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared type of the rate.
    pub fn rate_type(&self) -> RateType {
        self.rate_type
    }

    /// History entries, sorted by start month.
    pub fn history(&self) -> &[RateValue] {
        &self.history
    }

    /// Finds the single history entry whose range contains `period`.
    pub fn entry_at(&self, period: Period) -> Option<&RateValue> {
        let after = self
            .history
            .partition_point(|entry| entry.range.from() <= period);
        after
            .checked_sub(1)
            .map(|index| &self.history[index])
            .filter(|entry| entry.range.contains(period))
    }

    /// Converts back into the document shape.
    pub fn to_record(&self) -> RateItemRecord {
        RateItemRecord {
            name: self.name.clone(),
            rate_type: self.rate_type,
            history: self.history.iter().map(RateValue::to_record).collect(),
        }
    }
}
