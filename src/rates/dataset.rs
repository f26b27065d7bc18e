//! The rates dataset and its point-in-time queries.

use std::collections::HashMap;

use rust_decimal::Decimal;
use tracing::info;

use crate::error::{DataError, DataResult};
use crate::temporal::Period;

use super::model::{RateItem, RateType, TypedValue};
use super::record::RateItemRecord;

/// An immutable, validated set of rates keyed by unique name.
///
/// Items keep the order of the source document. Reloading means building
/// a new dataset; an existing one is never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateDataset {
    items: Vec<RateItem>,
    index: HashMap<String, usize>,
}

impl RateDataset {
    /// Validates every record and builds the dataset.
    ///
    /// The first failure aborts the load.
    ///
    /// # Errors
    ///
    /// Any error from [`RateItem::try_from_record`], or
    /// [`DataError::DuplicateName`] if two items share a name.
    pub fn from_records(records: Vec<RateItemRecord>) -> DataResult<Self> {
        let mut items = Vec::with_capacity(records.len());
        let mut index = HashMap::with_capacity(records.len());

        for record in records {
            let item = RateItem::try_from_record(record)?;
            if index.contains_key(item.name()) {
                return Err(DataError::DuplicateName {
                    name: item.name().to_string(),
                });
            }
            index.insert(item.name().to_string(), items.len());
            items.push(item);
        }

        info!(rates = items.len(), "loaded rates dataset");
        Ok(Self { items, index })
    }

    /// Number of rate items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the dataset has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates over items in document order.
    pub fn iter(&self) -> impl Iterator<Item = &RateItem> {
        self.items.iter()
    }

    /// Gets a rate item by name.
    pub fn get(&self, name: &str) -> DataResult<&RateItem> {
        self.index
            .get(name)
            .map(|&position| &self.items[position])
            .ok_or_else(|| DataError::NotFound {
                name: name.to_string(),
            })
    }

    /// Gets the value of a rate in a `YYYY-MM` period.
    ///
    /// # Errors
    ///
    /// - [`DataError::NotFound`] if no rate has this name
    /// - [`DataError::InvalidPeriod`] if `period` is not `YYYY-MM`
    /// - [`DataError::NoValueAtPeriod`] if no history entry covers `period`
    ///
    /// # Example
    ///
    /// ```
    /// use nerc_rates::loader::load_from_str;
    /// use nerc_rates::rates::{RateDataset, TypedValue};
    ///
    /// let rates: RateDataset = load_from_str(r#"
    /// - name: Charge for Stopped Instances
    ///   type: bool
    ///   history:
    ///     - value: "False"
    ///       from: 2023-06
    ///       until: 2024-03
    ///     - value: "True"
    ///       from: 2024-03
    /// "#)?;
    ///
    /// let value = rates.get_value_at("Charge for Stopped Instances", "2024-03")?;
    /// assert_eq!(value, &TypedValue::Bool(true));
    /// # Ok::<(), nerc_rates::error::DataError>(())
    /// ```
    pub fn get_value_at(&self, name: &str, period: &str) -> DataResult<&TypedValue> {
        let item = self.get(name)?;
        let period: Period = period.parse()?;
        Self::lookup(item, period)
    }

    /// Gets the value of a rate in an already parsed period.
    pub fn value_at(&self, name: &str, period: Period) -> DataResult<&TypedValue> {
        Self::lookup(self.get(name)?, period)
    }

    /// Gets a decimal rate, failing with [`DataError::TypeMismatch`] if the
    /// rate is not declared as `Decimal`.
    pub fn get_decimal_at(&self, name: &str, period: &str) -> DataResult<Decimal> {
        match self.typed_value_at(name, period, RateType::Decimal)? {
            TypedValue::Decimal(value) => Ok(*value),
            other => Err(type_mismatch(name, other.rate_type(), RateType::Decimal)),
        }
    }

    /// Gets a boolean rate, failing with [`DataError::TypeMismatch`] if the
    /// rate is not declared as `bool`.
    pub fn get_bool_at(&self, name: &str, period: &str) -> DataResult<bool> {
        match self.typed_value_at(name, period, RateType::Bool)? {
            TypedValue::Bool(value) => Ok(*value),
            other => Err(type_mismatch(name, other.rate_type(), RateType::Bool)),
        }
    }

    /// Gets a text rate, failing with [`DataError::TypeMismatch`] if the
    /// rate is not declared as `str`.
    pub fn get_text_at(&self, name: &str, period: &str) -> DataResult<&str> {
        match self.typed_value_at(name, period, RateType::Text)? {
            TypedValue::Text(value) => Ok(value.as_str()),
            other => Err(type_mismatch(name, other.rate_type(), RateType::Text)),
        }
    }

    /// Converts back into the document shape, in document order.
    pub fn to_records(&self) -> Vec<RateItemRecord> {
        self.items.iter().map(RateItem::to_record).collect()
    }

    fn typed_value_at(
        &self,
        name: &str,
        period: &str,
        requested: RateType,
    ) -> DataResult<&TypedValue> {
        let item = self.get(name)?;
        if item.rate_type() != requested {
            return Err(type_mismatch(name, item.rate_type(), requested));
        }
        Self::lookup(item, period.parse()?)
    }

    fn lookup(item: &RateItem, period: Period) -> DataResult<&TypedValue> {
        item.entry_at(period)
            .map(|entry| entry.value())
            .ok_or_else(|| DataError::NoValueAtPeriod {
                name: item.name().to_string(),
                period: period.to_string(),
            })
    }
}

fn type_mismatch(name: &str, expected: RateType, requested: RateType) -> DataError {
    DataError::TypeMismatch {
        name: name.to_string(),
        expected: expected.to_string(),
        requested: requested.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::RateValueRecord;

    fn entry(value: &str, from: &str, until: Option<&str>) -> RateValueRecord {
        RateValueRecord {
            value: value.to_string(),
            from: from.to_string(),
            until: until.map(str::to_string),
        }
    }

    fn record(name: &str, rate_type: RateType, history: Vec<RateValueRecord>) -> RateItemRecord {
        RateItemRecord {
            name: name.to_string(),
            rate_type,
            history,
        }
    }

    fn sample_rates() -> RateDataset {
        RateDataset::from_records(vec![
            record(
                "Decimal Rate",
                RateType::Decimal,
                vec![entry("1.23", "2020-01", None)],
            ),
            record(
                "Boolean Rate",
                RateType::Bool,
                vec![entry("True", "2020-01", None)],
            ),
            record(
                "String Rate",
                RateType::Text,
                vec![entry("standard", "2020-01", None)],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_open_ended_value_applies_later() {
        let rates = RateDataset::from_records(vec![record(
            "CPU SU Rate",
            RateType::Decimal,
            vec![entry("0.013", "2023-06", None)],
        )])
        .unwrap();

        let value = rates.get_value_at("CPU SU Rate", "2024-06").unwrap();
        assert_eq!(value, &TypedValue::Decimal(Decimal::new(13, 3)));
    }

    #[test]
    fn test_get_value_at_history() {
        let rates = RateDataset::from_records(vec![record(
            "Test Rate",
            RateType::Text,
            vec![
                entry("1", "2020-01", Some("2021-01")),
                entry("2", "2021-01", None),
            ],
        )])
        .unwrap();

        assert_eq!(rates.get_text_at("Test Rate", "2020-01").unwrap(), "1");
        assert_eq!(rates.get_text_at("Test Rate", "2020-12").unwrap(), "1");
        assert_eq!(rates.get_text_at("Test Rate", "2021-01").unwrap(), "2");
        assert_eq!(
            rates.get_text_at("Test Rate", "2019-01"),
            Err(DataError::NoValueAtPeriod {
                name: "Test Rate".to_string(),
                period: "2019-01".to_string(),
            })
        );
    }

    #[test]
    fn test_fail_with_duplicate_names() {
        let history = || {
            vec![
                entry("1", "2020-01", Some("2020-12")),
                entry("2", "2021-01", None),
            ]
        };
        let result = RateDataset::from_records(vec![
            record("Test Rate", RateType::Decimal, history()),
            record("Test Rate", RateType::Decimal, history()),
        ]);
        assert_eq!(
            result,
            Err(DataError::DuplicateName {
                name: "Test Rate".to_string()
            })
        );
    }

    #[test]
    fn test_unknown_name_is_not_found() {
        let rates = sample_rates();
        assert_eq!(
            rates.get_value_at("Missing Rate", "2020-01"),
            Err(DataError::NotFound {
                name: "Missing Rate".to_string()
            })
        );
    }

    #[test]
    fn test_invalid_query_period() {
        let rates = sample_rates();
        assert!(matches!(
            rates.get_value_at("Decimal Rate", "January 2020"),
            Err(DataError::InvalidPeriod { .. })
        ));
    }

    #[test]
    fn test_typed_accessors() {
        let rates = sample_rates();
        assert_eq!(
            rates.get_decimal_at("Decimal Rate", "2020-01").unwrap(),
            Decimal::new(123, 2)
        );
        assert!(rates.get_bool_at("Boolean Rate", "2020-01").unwrap());
        assert_eq!(rates.get_text_at("String Rate", "2020-01").unwrap(), "standard");
    }

    #[test]
    fn test_typed_accessor_rejects_mismatched_type() {
        let rates = sample_rates();
        assert_eq!(
            rates.get_bool_at("Decimal Rate", "2020-01"),
            Err(DataError::TypeMismatch {
                name: "Decimal Rate".to_string(),
                expected: "Decimal".to_string(),
                requested: "bool".to_string(),
            })
        );
        assert!(matches!(
            rates.get_decimal_at("Boolean Rate", "2020-01"),
            Err(DataError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_iteration_keeps_document_order() {
        let rates = sample_rates();
        let names: Vec<&str> = rates.iter().map(RateItem::name).collect();
        assert_eq!(names, ["Decimal Rate", "Boolean Rate", "String Rate"]);
    }

    #[test]
    fn test_typed_accessors_return_stored_values() {
        let rates = RateDataset::from_records(vec![
            record("Zero Rate", RateType::Decimal, vec![entry("0.000", "2020-01", None)]),
            record("Off Flag", RateType::Bool, vec![entry("False", "2020-01", None)]),
            record("Empty Text", RateType::Text, vec![entry("", "2020-01", None)]),
        ])
        .unwrap();

        assert_eq!(
            rates.get_decimal_at("Zero Rate", "2021-01").unwrap().to_string(),
            "0.000"
        );
        assert!(!rates.get_bool_at("Off Flag", "2021-01").unwrap());
        assert_eq!(rates.get_text_at("Empty Text", "2021-01").unwrap(), "");

        for (name, period) in [("Zero Rate", "2021-01"), ("Off Flag", "2021-01")] {
            let stored = rates.get_value_at(name, period).unwrap();
            match stored {
                TypedValue::Decimal(value) => {
                    assert_eq!(rates.get_decimal_at(name, period).unwrap(), *value)
                }
                TypedValue::Bool(value) => {
                    assert_eq!(rates.get_bool_at(name, period).unwrap(), *value)
                }
                TypedValue::Text(_) => unreachable!(),
            }
        }
    }

    #[test]
    fn test_dataset_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RateDataset>();
    }
}
