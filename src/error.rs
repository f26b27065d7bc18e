//! Error types for rates and outages data.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every way a data file can be rejected at load time, and every way
//! a query against a loaded dataset can fail.

use thiserror::Error;

/// The main error type for loading and querying rates and outages.
///
/// Validation errors abort the whole load; no partially validated dataset
/// is ever returned. Query errors are returned to the caller, who decides
/// whether a missing value is fatal.
///
/// # Example
///
/// ```
/// use nerc_rates::error::DataError;
///
/// let error = DataError::DuplicateName {
///     name: "CPU SU Rate".to_string(),
/// };
/// assert_eq!(error.to_string(), "found duplicate name \"CPU SU Rate\" in list");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    /// A range ends on or before the point where it starts.
    #[error("range end {until} must be after range start {from}")]
    RangeOrder {
        /// The start of the range.
        from: String,
        /// The rejected end of the range.
        until: String,
    },

    /// A timestamp carries no UTC offset.
    #[error(
        "naive timestamp '{value}' is not allowed; provide timezone information \
         (e.g. '2024-01-01T12:00:00Z' or '2024-01-01T12:00:00+00:00')"
    )]
    NaiveTimestamp {
        /// The rejected input.
        value: String,
    },

    /// A timestamp could not be parsed at all.
    #[error("invalid timestamp '{value}': {message}")]
    InvalidTimestamp {
        /// The rejected input.
        value: String,
        /// What the parser complained about.
        message: String,
    },

    /// A period is not a `YYYY-MM` month.
    #[error("invalid period '{value}': expected YYYY-MM")]
    InvalidPeriod {
        /// The rejected input.
        value: String,
    },

    /// A rate value does not parse under the item's declared type.
    #[error("rate '{name}': value '{value}' is not a valid {expected}")]
    TypeConversion {
        /// The rate item name.
        name: String,
        /// The offending value string.
        value: String,
        /// The declared type tag.
        expected: String,
    },

    /// Two ranges of the same history or timeframe list intersect.
    #[error("'{name}': date ranges overlap ({first} and {second})")]
    OverlappingRange {
        /// The rate or outage name.
        name: String,
        /// The earlier range.
        first: String,
        /// The later range.
        second: String,
    },

    /// A rate item name appears more than once.
    #[error("found duplicate name \"{name}\" in list")]
    DuplicateName {
        /// The repeated name.
        name: String,
    },

    /// An outage URL appears more than once.
    #[error("found duplicate url \"{url}\" in outages list")]
    DuplicateUrl {
        /// The repeated URL.
        url: String,
    },

    /// A service is listed twice within one outage timeframe.
    #[error("outage '{name}': affected service '{service}' is listed more than once")]
    DuplicateService {
        /// The outage name.
        name: String,
        /// The repeated service.
        service: String,
    },

    /// An outage URL is not an absolute http(s) URL.
    #[error("outage '{name}': invalid url '{url}'")]
    InvalidUrl {
        /// The outage name.
        name: String,
        /// The rejected URL.
        url: String,
    },

    /// A rate item has no history entries.
    #[error("rate '{name}' has an empty history")]
    EmptyHistory {
        /// The rate item name.
        name: String,
    },

    /// An outage item has no timeframes.
    #[error("outage '{name}' has no timeframes")]
    EmptyTimeframes {
        /// The outage name.
        name: String,
    },

    /// A query referenced an unknown rate.
    #[error("Rate '{name}' not found")]
    NotFound {
        /// The unknown name.
        name: String,
    },

    /// No history entry covers the queried period.
    #[error("No value for {name} for {period}")]
    NoValueAtPeriod {
        /// The rate item name.
        name: String,
        /// The queried period.
        period: String,
    },

    /// A typed accessor was used on a rate of a different type.
    #[error("Rate {name} expects datatype {expected}, but got {requested}")]
    TypeMismatch {
        /// The rate item name.
        name: String,
        /// The declared type of the rate.
        expected: String,
        /// The type the caller asked for.
        requested: String,
    },

    /// A data file was not found.
    #[error("Data file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// A data file exists but could not be read (permissions, bad encoding).
    #[error("Failed to read data file '{path}': {message}")]
    ConfigReadError {
        /// The path that could not be read.
        path: String,
        /// The underlying I/O error.
        message: String,
    },

    /// A data file is not well-formed YAML.
    #[error("Invalid YAML in '{path}': {message}")]
    YamlSyntax {
        /// The path (or `<string>`) that failed to parse.
        path: String,
        /// One-based line of the syntax error, when known.
        line: Option<usize>,
        /// The parser's description of the error.
        message: String,
    },

    /// A data file is YAML but does not have the expected shape.
    #[error("Failed to parse data file '{path}': {message}")]
    ConfigParseError {
        /// The path (or `<string>`) that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },
}

/// A type alias for Results that return DataError.
pub type DataResult<T> = Result<T, DataError>;
