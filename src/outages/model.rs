//! Validated outage models.

use std::collections::HashSet;

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::debug;
use url::Url;

use crate::error::{DataError, DataResult};
use crate::temporal::{TemporalRange, ensure_no_overlap, parse_timestamp};

use super::record::{OutageItemRecord, OutageTimeframeRecord};

/// One validated timeframe of an outage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutageTimeframe {
    range: TemporalRange<DateTime<Utc>>,
    affected_services: Vec<String>,
}

impl OutageTimeframe {
    fn try_from_record(name: &str, record: OutageTimeframeRecord) -> DataResult<Self> {
        let from = parse_timestamp(&record.from)?;
        let until = record.until.as_deref().map(parse_timestamp).transpose()?;
        let range = TemporalRange::new(from, until)?;

        let duplicate = {
            let mut seen = HashSet::with_capacity(record.affected_services.len());
            record
                .affected_services
                .iter()
                .find(|service| !seen.insert(service.as_str()))
                .cloned()
        };
        if let Some(service) = duplicate {
            return Err(DataError::DuplicateService {
                name: name.to_string(),
                service,
            });
        }

        Ok(Self {
            range,
            affected_services: record.affected_services,
        })
    }

    /// The UTC instants covered by this timeframe.
    pub fn range(&self) -> &TemporalRange<DateTime<Utc>> {
        &self.range
    }

    /// Services affected, in document order.
    pub fn affected_services(&self) -> &[String] {
        &self.affected_services
    }

    /// Returns true if `service` is affected during this timeframe.
    pub fn affects(&self, service: &str) -> bool {
        self.affected_services.iter().any(|s| s == service)
    }

    fn to_record(&self) -> OutageTimeframeRecord {
        let format = |instant: DateTime<Utc>| instant.to_rfc3339_opts(SecondsFormat::AutoSi, true);
        OutageTimeframeRecord {
            from: format(self.range.from()),
            until: self.range.until().map(format),
            affected_services: self.affected_services.clone(),
        }
    }
}

/// A validated outage event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutageItem {
    name: String,
    url: String,
    timeframes: Vec<OutageTimeframe>,
}

impl OutageItem {
    /// Validates a document record.
    ///
    /// # Errors
    ///
    /// - [`DataError::EmptyTimeframes`] if there are no timeframes
    /// - [`DataError::InvalidUrl`] if `url` is not an absolute http(s) URL
    /// - [`DataError::NaiveTimestamp`] / [`DataError::InvalidTimestamp`] for
    ///   bad bounds
    /// - [`DataError::RangeOrder`] if a timeframe ends on or before it starts
    /// - [`DataError::DuplicateService`] if a timeframe repeats a service
    /// - [`DataError::OverlappingRange`] if two timeframes overlap
    pub fn try_from_record(record: OutageItemRecord) -> DataResult<Self> {
        let OutageItemRecord {
            name,
            url,
            timeframes,
        } = record;

        if timeframes.is_empty() {
            return Err(DataError::EmptyTimeframes { name });
        }
        if !is_http_url(&url) {
            return Err(DataError::InvalidUrl { name, url });
        }

        let timeframes = timeframes
            .into_iter()
            .map(|timeframe| OutageTimeframe::try_from_record(&name, timeframe))
            .collect::<DataResult<Vec<_>>>()?;
        ensure_no_overlap(&name, timeframes.iter().map(OutageTimeframe::range))?;

        debug!(outage = %name, timeframes = timeframes.len(), "validated outage item");

        Ok(Self {
            name,
            url,
            timeframes,
        })
    }

    /// Human-readable name of the event.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unique URL of the event.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Timeframes in document order.
    pub fn timeframes(&self) -> &[OutageTimeframe] {
        &self.timeframes
    }

    /// Converts back into the document shape.
    pub fn to_record(&self) -> OutageItemRecord {
        OutageItemRecord {
            name: self.name.clone(),
            url: self.url.clone(),
            timeframes: self
                .timeframes
                .iter()
                .map(OutageTimeframe::to_record)
                .collect(),
        }
    }
}

/// Absolute `http`/`https` URL with a host.
fn is_http_url(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    matches!(parsed.scheme(), "http" | "https") && parsed.host().is_some()
}
