//! Time-versioned billing rates.
//!
//! A rates document is a list of named items, each with a declared value
//! type and a history of values valid over calendar-month ranges. Loading
//! validates every item and returns an immutable [`RateDataset`] that
//! answers "what was the value of X in period P".
//!
//! # Example
//!
//! ```
//! use nerc_rates::loader::load_from_str;
//! use nerc_rates::rates::RateDataset;
//! use rust_decimal::Decimal;
//!
//! let rates: RateDataset = load_from_str(r#"
//! - name: CPU SU Rate
//!   type: Decimal
//!   history:
//!     - value: "0.013"
//!       from: 2023-06
//! "#).unwrap();
//!
//! let rate = rates.get_decimal_at("CPU SU Rate", "2024-06").unwrap();
//! assert_eq!(rate, Decimal::new(13, 3));
//! ```

mod dataset;
mod model;
mod record;

pub use dataset::RateDataset;
pub use model::{RateItem, RateType, RateValue, TypedValue};
pub use record::{RateItemRecord, RateValueRecord};
