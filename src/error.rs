//! Crate-level error type for analytical queries.

use crate::store::StoreError;
use std::fmt;

/// Errors surfaced by query primitives and the report runner.
///
/// Undefined results (zero-denominator ratios, empty-input percentiles,
/// first-in-partition lag rows) are not errors; they are `None` values in
/// query output. `EngineError` covers caller-parameter misuse and store
/// failures only.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Percentile parameter outside [0, 1].
    InvalidPercentile(f64),
    /// A trailing window must cover at least one row.
    ZeroWindow,
    /// Relation load or lookup failure.
    Store(StoreError),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InvalidPercentile(p) => {
                write!(f, "percentile must be within [0, 1], got {}", p)
            }
            EngineError::ZeroWindow => write!(f, "trailing window size must be at least 1"),
            EngineError::Store(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        EngineError::Store(err)
    }
}
