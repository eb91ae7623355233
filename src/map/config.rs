//! Match evaluation configuration.
//!
//! [`MatchConfig`] controls whether exhaustive queries fan predicate
//! evaluation out across worker threads.

use crate::error::{MapError, Result};

/// Fan-out policy for exhaustive queries.
///
/// Only [`all_matches`](super::PredicateMap::all_matches),
/// [`count_matches`](super::PredicateMap::count_matches) and
/// [`match_indexes`](super::PredicateMap::match_indexes)
/// consult this. Short-circuiting queries (first match, any match) always
/// scan sequentially in index order.
///
/// Fan-out requires the `parallel` feature; without it the flag is ignored.
///
/// # Defaults
///
/// ```
/// use u_predicate_map::map::MatchConfig;
///
/// let config = MatchConfig::default();
/// assert!(config.parallel);
/// assert_eq!(config.parallel_threshold, 64);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_predicate_map::map::MatchConfig;
///
/// let config = MatchConfig::default()
///     .with_parallel(true)
///     .with_parallel_threshold(1_000);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchConfig {
    /// Whether exhaustive queries may evaluate predicates in parallel.
    pub parallel: bool,

    /// Minimum entry count before a query fans out.
    ///
    /// Small maps are cheaper to scan on the calling thread than to split
    /// across the rayon pool.
    pub parallel_threshold: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            parallel_threshold: 64,
        }
    }
}

impl MatchConfig {
    /// Preset that never fans out.
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the entry count at which queries start fanning out.
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Returns `true` if a query over `count` entries should fan out.
    pub fn should_fan_out(&self, count: usize) -> bool {
        cfg!(feature = "parallel") && self.parallel && count >= self.parallel_threshold
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.parallel && self.parallel_threshold == 0 {
            return Err(MapError::invalid("parallel_threshold"));
        }
        Ok(())
    }
}
