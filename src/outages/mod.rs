//! Scheduled service outages.
//!
//! An outages document lists named events, each identified by a unique URL
//! and made of one or more UTC timeframes with the services they affect.
//! Loading validates every event and returns an immutable
//! [`OutageDataset`] that answers "which outages hit service S during
//! window [A, B)".

mod dataset;
mod model;
mod record;

pub use dataset::{OutageDataset, OutageWindow};
pub use model::{OutageItem, OutageTimeframe};
pub use record::{OutageItemRecord, OutageTimeframeRecord};
