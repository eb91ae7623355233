//! Predicate-indexed dispatch maps.
//!
//! Associates boolean tests over a key type with values and resolves a value
//! by evaluating those tests against a probe:
//!
//! - **First match**: the value of the lowest-index predicate accepting the
//!   probe, or a configurable default when none does.
//! - **All matches / count / indexes**: exhaustive evaluation, optionally
//!   fanned out across threads with the `parallel` feature.
//! - **Index-addressed mutation**: removal renumbers later entries; updates
//!   replace a value while keeping its predicate.
//!
//! See [`map`] for the containers and [`error`] for failure modes.
//!
//! # Features
//!
//! - `parallel`: evaluate exhaustive queries with rayon.
//! - `serde`: derive `Serialize`/`Deserialize` for [`map::MatchConfig`].

pub mod error;
pub mod map;

pub use error::{MapError, Result};
