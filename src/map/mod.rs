//! Predicate-indexed dispatch containers.
//!
//! A predicate map associates boolean tests ("predicates") over a probe type
//! `K` with values, and resolves values by evaluating those tests against a
//! probe. Two variants share the same matching algorithms:
//!
//! - [`PredicateMap`]: stores each value directly.
//! - [`PredicateFnMap`]: stores a function of the probe, invoked on match.
//!
//! # Matching
//!
//! - **First match** scans entries in index order and stops at the first
//!   predicate that accepts the probe. When nothing matches, the map's
//!   default value is returned.
//! - **Exhaustive queries** (all matches, count, indexes) evaluate every
//!   predicate and never return the default. With the `parallel` feature
//!   they may fan out across rayon according to [`MatchConfig`], so
//!   predicates must be pure.
//!
//! # Design
//!
//! Closures have no structural equality, so entries form an insertion-ordered
//! list of pairs rather than a hash map. Duplicate predicates are separate
//! entries. Removing an entry renumbers every later index.
//!
//! Maps are not internally synchronized; mutation requires `&mut self`.

mod config;
mod eager;
mod entries;
mod lazy;
mod types;

pub use config::MatchConfig;
pub use eager::PredicateMap;
pub use lazy::PredicateFnMap;
pub use types::{predicate, value_fn, Predicate, ValueFn};
