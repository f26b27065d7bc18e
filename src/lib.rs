//! Loading, validation and point-in-time lookup for NERC rates and outages.
//!
//! This crate turns two hand-maintained YAML documents into immutable,
//! validated datasets: time-versioned billing rates ([`rates`]) and
//! scheduled service outages ([`outages`]). Validation guarantees that
//! every named item forms a well-ordered, non-overlapping timeline, so a
//! point-in-time query can match at most one entry.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod outages;
pub mod rates;
pub mod temporal;
