//! Document shape of an outages file.

use serde::{Deserialize, Serialize};

/// One timeframe of an outage, as written in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutageTimeframeRecord {
    /// Start of the timeframe (RFC 3339 with offset).
    pub from: String,
    /// End of the timeframe (RFC 3339 with offset); absent while ongoing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub until: Option<String>,
    /// Services unavailable during the timeframe.
    pub affected_services: Vec<String>,
}

/// An outage event, as written in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutageItemRecord {
    /// Human-readable name of the event.
    pub name: String,
    /// Page with details about the event; unique across the document.
    pub url: String,
    /// Periods during which services are affected.
    pub timeframes: Vec<OutageTimeframeRecord>,
}
