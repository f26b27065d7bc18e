//! Half-open ranges with an optional end, and the timeline overlap check.

use std::fmt;

use crate::error::{DataError, DataResult};

/// A half-open range `[from, until)`.
///
/// `until` is exclusive. When it is absent the range is ongoing and
/// extends to +infinity. A range is only ever constructed with
/// `until > from`.
///
/// # Examples
///
/// ```
/// use nerc_rates::temporal::{Period, TemporalRange};
///
/// let from: Period = "2023-06".parse().unwrap();
/// let until: Period = "2024-06".parse().unwrap();
/// let range = TemporalRange::new(from, Some(until)).unwrap();
///
/// assert!(range.contains(from));
/// assert!(!range.contains(until));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemporalRange<T> {
    from: T,
    until: Option<T>,
}

impl<T: Ord + Copy + fmt::Display> TemporalRange<T> {
    /// Creates a range, failing with [`DataError::RangeOrder`] if `until`
    /// is present and not strictly after `from`.
    pub fn new(from: T, until: Option<T>) -> DataResult<Self> {
        match until {
            Some(until) if until <= from => Err(DataError::RangeOrder {
                from: from.to_string(),
                until: until.to_string(),
            }),
            _ => Ok(Self { from, until }),
        }
    }

    /// Inclusive start.
    pub fn from(&self) -> T {
        self.from
    }

    /// Exclusive end, or `None` for an ongoing range.
    pub fn until(&self) -> Option<T> {
        self.until
    }

    /// Returns true if the range has no end.
    pub fn is_open(&self) -> bool {
        self.until.is_none()
    }

    /// Returns true if `point` lies in `[from, until)`.
    pub fn contains(&self, point: T) -> bool {
        self.from <= point && self.until.is_none_or(|until| point < until)
    }

    /// Returns true if this range shares at least one point with the
    /// window `[start, end)`.
    pub fn intersects(&self, start: T, end: T) -> bool {
        self.from < end && self.until.is_none_or(|until| until > start)
    }
}

impl<T: fmt::Display> fmt::Display for TemporalRange<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.until {
            Some(until) => write!(f, "{}..{}", self.from, until),
            None => write!(f, "{}..", self.from),
        }
    }
}

/// Checks that no two ranges of one timeline overlap.
///
/// Ranges are sorted by start and each adjacent pair is compared: the
/// earlier range must end at or before the later one starts. An ongoing
/// range followed by any other range is an overlap.
///
/// `name` identifies the owning rate or outage in the error.
pub fn ensure_no_overlap<'a, T, I>(name: &str, ranges: I) -> DataResult<()>
where
    T: Ord + Copy + fmt::Display + 'a,
    I: IntoIterator<Item = &'a TemporalRange<T>>,
{
    let mut sorted: Vec<&TemporalRange<T>> = ranges.into_iter().collect();
    sorted.sort_by_key(|range| range.from);

    for pair in sorted.windows(2) {
        let (current, next) = (pair[0], pair[1]);
        let overlaps = current.until.is_none_or(|until| until > next.from);
        if overlaps {
            return Err(DataError::OverlappingRange {
                name: name.to_string(),
                first: current.to_string(),
                second: next.to_string(),
            });
        }
    }

    Ok(())
}
