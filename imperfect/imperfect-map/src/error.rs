//! Error types for imperfection mapping.

use thiserror::Error;

/// Result type alias for mapping operations.
pub type MapResult<T> = Result<T, MapError>;

/// Errors that can occur while mapping a measured imperfection field.
///
/// Every variant is fatal: the run aborts without partial results, and the
/// caller treats the absence of a successful result as "imperfection not
/// applied". Non-fatal conditions (dropped outliers, section-count
/// adjustment, defaulted specimen dimensions) are logged and reported in
/// [`MappingStats`](crate::MappingStats) instead.
#[derive(Debug, Error)]
pub enum MapError {
    /// Malformed measurement file.
    #[error("measurement format error at line {line}: {reason}")]
    Format {
        /// 1-based line number of the offending row.
        line: usize,
        /// Description of what was wrong with the row.
        reason: String,
    },

    /// I/O error while reading a measurement file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Contradictory or out-of-range configuration.
    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    /// The measured cloud cannot be reconciled with the nominal model.
    #[error("degenerate measured cloud: {0}")]
    DegenerateCloud(String),

    /// The measured cloud has no points (or none survived filtering).
    #[error("measured point cloud is empty")]
    EmptyCloud,

    /// Tolerance widening exhausted without finding measured points for a
    /// target section.
    #[error("no measured points found for section z in [{z_lo}, {z_hi}] after widening")]
    EmptySection {
        /// Lower bound of the final widened z-interval.
        z_lo: f64,
        /// Upper bound of the final widened z-interval.
        z_hi: f64,
    },

    /// A target-point id appeared more than once.
    #[error("duplicate target id {id} in result assembly")]
    DuplicateTarget {
        /// The offending identifier.
        id: u64,
    },

    /// Output entry count does not match the target-point count.
    #[error("assembled {actual} results for {expected} target points")]
    Assembly {
        /// Number of target points handed in.
        expected: usize,
        /// Number of result entries produced.
        actual: usize,
    },
}

impl MapError {
    /// Create a format error.
    #[must_use]
    pub fn format(line: usize, reason: impl Into<String>) -> Self {
        Self::Format {
            line,
            reason: reason.into(),
        }
    }

    /// Create an invalid-parameters error.
    #[must_use]
    pub fn invalid_params(reason: impl Into<String>) -> Self {
        Self::InvalidParams(reason.into())
    }

    /// Create a degenerate-cloud error.
    #[must_use]
    pub fn degenerate_cloud(reason: impl Into<String>) -> Self {
        Self::DegenerateCloud(reason.into())
    }
}
