//! Error taxonomy for trace generation
//!
//! Every variant is fatal at startup. Generation validates all inputs before
//! a single event is written, so the scheduling loop itself never fails.

use thiserror::Error;

/// Errors raised while validating generator inputs
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GenError {
    /// Malformed, unsorted, or non-terminating CDF table
    #[error("invalid flow size distribution: {0}")]
    InvalidDistribution(String),

    /// Non-positive bandwidth, load, or mean inter-arrival time
    #[error("invalid rate: {0}")]
    InvalidRate(String),

    /// Empty, overlapping, or out-of-bounds datacenter host ranges
    #[error("invalid datacenter range: {0}")]
    InvalidDcRange(String),

    /// Missing or inconsistent configuration parameter
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl GenError {
    pub(crate) fn distribution(msg: impl Into<String>) -> Self {
        Self::InvalidDistribution(msg.into())
    }

    pub(crate) fn rate(msg: impl Into<String>) -> Self {
        Self::InvalidRate(msg.into())
    }

    pub(crate) fn dc_range(msg: impl Into<String>) -> Self {
        Self::InvalidDcRange(msg.into())
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}
