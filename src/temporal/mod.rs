//! Temporal primitives shared by the rates and outages timelines.
//!
//! Rates are versioned at calendar-month resolution ([`Period`]), outages at
//! full timestamp resolution (UTC instants). Both use the same half-open
//! [`TemporalRange`] and the same overlap check.

mod period;
mod range;
mod timestamp;

pub use period::Period;
pub use range::{TemporalRange, ensure_no_overlap};
pub use timestamp::{parse_query_bound, parse_timestamp};
