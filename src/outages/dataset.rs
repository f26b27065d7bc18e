//! The outages dataset and its window queries.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::{DataError, DataResult};
use crate::temporal::{TemporalRange, parse_query_bound};

use super::model::OutageItem;
use super::record::OutageItemRecord;

/// An immutable, validated list of outages with unique URLs.
///
/// Items keep the order of the source document, and query results follow
/// that order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutageDataset {
    items: Vec<OutageItem>,
}

/// One outage timeframe clipped to a query window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutageWindow<'a> {
    /// The outage the timeframe belongs to.
    pub item: &'a OutageItem,
    /// Later of the timeframe start and the window start.
    pub start: DateTime<Utc>,
    /// Earlier of the timeframe end and the window end.
    pub end: DateTime<Utc>,
}

impl OutageDataset {
    /// Validates every record and builds the dataset.
    ///
    /// # Errors
    ///
    /// Any error from [`OutageItem::try_from_record`], or
    /// [`DataError::DuplicateUrl`] if two outages share a URL.
    pub fn from_records(records: Vec<OutageItemRecord>) -> DataResult<Self> {
        let mut items = Vec::with_capacity(records.len());
        let mut urls = HashSet::with_capacity(records.len());

        for record in records {
            let item = OutageItem::try_from_record(record)?;
            if !urls.insert(item.url().to_string()) {
                return Err(DataError::DuplicateUrl {
                    url: item.url().to_string(),
                });
            }
            items.push(item);
        }

        info!(outages = items.len(), "loaded outages dataset");
        Ok(Self { items })
    }

    /// Number of outages.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the dataset has no outages.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates over outages in document order.
    pub fn iter(&self) -> impl Iterator<Item = &OutageItem> {
        self.items.iter()
    }

    /// Finds outages affecting `service` during `[start, end)`.
    ///
    /// Bounds are plain dates (`2024-05-01`, midnight UTC) or timestamps
    /// with an explicit offset.
    ///
    /// # Errors
    ///
    /// - [`DataError::NaiveTimestamp`] / [`DataError::InvalidTimestamp`] for
    ///   a bad bound
    /// - [`DataError::RangeOrder`] if `end` is not after `start`
    ///
    /// # Example
    ///
    /// ```
    /// use nerc_rates::loader::load_from_str;
    /// use nerc_rates::outages::OutageDataset;
    ///
    /// let outages: OutageDataset = load_from_str(r#"
    /// - name: MGHPCC Shutdown 2024
    ///   url: https://nerc.mghpcc.org/event/mghpcc-annual-power-shutdown-2024/
    ///   timeframes:
    ///     - from: "2024-05-22T08:00:00Z"
    ///       until: "2024-05-28T23:00:00Z"
    ///       affected_services: [NERC OpenStack, NERC OpenShift]
    /// "#)?;
    ///
    /// let hits = outages.get_outages_during("2024-05-01", "2024-06-01", "NERC OpenStack")?;
    /// assert_eq!(hits.len(), 1);
    /// # Ok::<(), nerc_rates::error::DataError>(())
    /// ```
    pub fn get_outages_during(
        &self,
        start: &str,
        end: &str,
        service: &str,
    ) -> DataResult<Vec<&OutageItem>> {
        self.outages_during(parse_query_bound(start)?, parse_query_bound(end)?, service)
    }

    /// Typed form of [`get_outages_during`](Self::get_outages_during).
    pub fn outages_during(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        service: &str,
    ) -> DataResult<Vec<&OutageItem>> {
        TemporalRange::new(start, Some(end))?;

        Ok(self
            .items
            .iter()
            .filter(|item| {
                item.timeframes().iter().any(|timeframe| {
                    timeframe.affects(service) && timeframe.range().intersects(start, end)
                })
            })
            .collect())
    }

    /// Lists every matching timeframe clipped to `[start, end)`.
    ///
    /// An outage with several matching timeframes appears once per
    /// timeframe, in document order.
    pub fn outage_windows_during(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        service: &str,
    ) -> DataResult<Vec<OutageWindow<'_>>> {
        TemporalRange::new(start, Some(end))?;

        let windows = self
            .items
            .iter()
            .flat_map(|item| {
                item.timeframes()
                    .iter()
                    .filter(move |timeframe| {
                        timeframe.affects(service) && timeframe.range().intersects(start, end)
                    })
                    .map(move |timeframe| OutageWindow {
                        item,
                        start: timeframe.range().from().max(start),
                        end: timeframe.range().until().map_or(end, |until| until.min(end)),
                    })
            })
            .collect();
        Ok(windows)
    }

    /// Converts back into the document shape, in document order.
    pub fn to_records(&self) -> Vec<OutageItemRecord> {
        self.items.iter().map(OutageItem::to_record).collect()
    }
}
