//! Error types for predicate map construction and mutation.

use thiserror::Error;

/// Errors raised by predicate map operations.
///
/// Every failure is reported synchronously; no operation retries or
/// partially applies a batch before returning one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    /// A required predicate, value, or collection was absent.
    #[error("invalid {parameter} argument")]
    InvalidArgument {
        /// Name of the offending parameter.
        parameter: &'static str,
    },

    /// Parallel predicate and value collections had different lengths.
    #[error("inconsistent collection sizes: {keys} predicates for {values} values")]
    SizeMismatch {
        /// Number of predicates supplied.
        keys: usize,
        /// Number of values supplied.
        values: usize,
    },

    /// An index-addressed operation received an index past the last entry.
    #[error("index {index} out of range for map with {count} entries")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Entry count at the time of the call.
        count: usize,
    },
}

impl MapError {
    pub(crate) fn invalid(parameter: &'static str) -> Self {
        Self::InvalidArgument { parameter }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MapError>;
