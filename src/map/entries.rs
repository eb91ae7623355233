//! Ordered predicate/slot storage and the matching algorithms shared by
//! both map variants.
//!
//! A slot is whatever a map stores next to each predicate: the value itself
//! for [`PredicateMap`](super::PredicateMap), a value-producing closure for
//! [`PredicateFnMap`](super::PredicateFnMap). Index order is insertion order
//! and drives first-match priority.

use super::config::MatchConfig;
use super::types::Predicate;
use crate::error::{MapError, Result};
use tracing::{debug, trace};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// One predicate paired with its slot.
pub(crate) struct Entry<K, S> {
    predicate: Predicate<K>,
    slot: S,
}

impl<K, S> Entry<K, S> {
    fn matches(&self, probe: &K) -> bool {
        (self.predicate)(probe)
    }
}

/// Insertion-ordered entry sequence.
///
/// Predicates and slots live side by side in one `Vec`, so the two can
/// never drift out of step. Removal shifts later entries down by one.
pub(crate) struct Entries<K, S> {
    entries: Vec<Entry<K, S>>,
}

impl<K, S> Entries<K, S> {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends one entry at the next index.
    pub(crate) fn push(&mut self, predicate: Predicate<K>, slot: S) {
        self.entries.push(Entry { predicate, slot });
        trace!(index = self.entries.len() - 1, "appended entry");
    }

    /// Appends entries in iteration order.
    pub(crate) fn extend_pairs<I>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (Predicate<K>, S)>,
    {
        let before = self.entries.len();
        self.entries.extend(
            pairs
                .into_iter()
                .map(|(predicate, slot)| Entry { predicate, slot }),
        );
        debug!(
            added = self.entries.len() - before,
            total = self.entries.len(),
            "appended entry pairs"
        );
    }

    /// Appends parallel lists, pairing elements at equal positions.
    ///
    /// Nothing is appended unless both lists have the same length.
    pub(crate) fn extend_lists(
        &mut self,
        predicates: Vec<Predicate<K>>,
        slots: Vec<S>,
    ) -> Result<()> {
        if predicates.len() != slots.len() {
            return Err(MapError::SizeMismatch {
                keys: predicates.len(),
                values: slots.len(),
            });
        }
        self.extend_pairs(predicates.into_iter().zip(slots));
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.entries.len() {
            return Err(MapError::IndexOutOfRange {
                index,
                count: self.entries.len(),
            });
        }
        Ok(())
    }

    /// Removes the entry at `index`, returning its slot.
    pub(crate) fn remove_at(&mut self, index: usize) -> Result<S> {
        self.check_index(index)?;
        let removed = self.entries.remove(index);
        trace!(index, remaining = self.entries.len(), "removed entry");
        Ok(removed.slot)
    }

    /// Replaces the slot at `index`, returning the previous one.
    pub(crate) fn replace_at(&mut self, index: usize, slot: S) -> Result<S> {
        self.check_index(index)?;
        trace!(index, "replaced entry value");
        Ok(std::mem::replace(&mut self.entries[index].slot, slot))
    }

    /// Overwrites the slot of every entry whose predicate accepts `probe`.
    ///
    /// `make` is called once per matching entry. Returns the number of
    /// entries touched.
    pub(crate) fn replace_matching<F>(&mut self, probe: &K, mut make: F) -> usize
    where
        F: FnMut() -> S,
    {
        let mut updated = 0;
        for entry in self.entries.iter_mut().filter(|e| e.matches(probe)) {
            entry.slot = make();
            updated += 1;
        }
        debug!(updated, "updated values for matching predicates");
        updated
    }

    pub(crate) fn get(&self, index: usize) -> Option<&S> {
        self.entries.get(index).map(|e| &e.slot)
    }

    pub(crate) fn predicates(&self) -> impl Iterator<Item = &Predicate<K>> {
        self.entries.iter().map(|e| &e.predicate)
    }

    pub(crate) fn slots(&self) -> impl Iterator<Item = &S> {
        self.entries.iter().map(|e| &e.slot)
    }

    /// Slot of the lowest-index entry accepting `probe`.
    ///
    /// Stops at the first match; later predicates are never evaluated.
    pub(crate) fn first_match(&self, probe: &K) -> Option<&S> {
        self.entries
            .iter()
            .find(|e| e.matches(probe))
            .map(|e| &e.slot)
    }

    /// Returns `true` once any predicate accepts `probe`.
    pub(crate) fn any_match(&self, probe: &K) -> bool {
        self.entries.iter().any(|e| e.matches(probe))
    }
}

impl<K: Sync, S: Sync> Entries<K, S> {
    /// Projects every matching entry through `project`.
    ///
    /// Evaluates all predicates, fanning out across rayon when `config`
    /// allows it for the current size. Results come back in index order
    /// either way, but callers must only rely on the multiset.
    pub(crate) fn collect_matches<'a, T, F>(
        &'a self,
        probe: &K,
        config: &MatchConfig,
        project: F,
    ) -> Vec<T>
    where
        T: Send,
        F: Fn(usize, &'a S) -> T + Send + Sync,
    {
        #[cfg(feature = "parallel")]
        if config.should_fan_out(self.entries.len()) {
            debug!(entries = self.entries.len(), "fanning out match collection");
            return self
                .entries
                .par_iter()
                .enumerate()
                .filter(|(_, e)| e.matches(probe))
                .map(|(i, e)| project(i, &e.slot))
                .collect();
        }
        #[cfg(not(feature = "parallel"))]
        let _ = config;

        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.matches(probe))
            .map(|(i, e)| project(i, &e.slot))
            .collect()
    }

    /// Indexes of every entry accepting `probe`.
    pub(crate) fn match_indexes(&self, probe: &K, config: &MatchConfig) -> Vec<usize> {
        self.collect_matches(probe, config, |i, _| i)
    }

    /// Number of entries accepting `probe`.
    pub(crate) fn count_matches(&self, probe: &K, config: &MatchConfig) -> usize {
        #[cfg(feature = "parallel")]
        if config.should_fan_out(self.entries.len()) {
            debug!(entries = self.entries.len(), "fanning out match count");
            return self.entries.par_iter().filter(|e| e.matches(probe)).count();
        }
        #[cfg(not(feature = "parallel"))]
        let _ = config;

        self.entries.iter().filter(|e| e.matches(probe)).count()
    }
}

/// Unwraps optional parallel lists, naming whichever is absent.
///
/// The predicate list is checked first.
pub(crate) fn require_lists<A, B>(
    predicates: Option<Vec<A>>,
    values: Option<Vec<B>>,
) -> Result<(Vec<A>, Vec<B>)> {
    match (predicates, values) {
        (None, _) => Err(MapError::invalid("key collection")),
        (_, None) => Err(MapError::invalid("value collection")),
        (Some(p), Some(v)) => Ok((p, v)),
    }
}
