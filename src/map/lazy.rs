//! Predicate map whose values are computed from the matching probe.

use super::config::MatchConfig;
use super::entries::{require_lists, Entries};
use super::types::{Predicate, ValueFn};
use crate::error::{MapError, Result};
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Maps predicates over `K` to functions producing a `V` from the probe.
///
/// Matching behaves exactly like [`PredicateMap`](super::PredicateMap); the
/// difference is that a match invokes the stored function with the probe
/// instead of returning a stored value. The default value is returned as-is
/// (cloned) when first-match resolution finds nothing.
///
/// # Examples
///
/// ```
/// use u_predicate_map::map::PredicateFnMap;
///
/// let mut map = PredicateFnMap::new(Some(String::from("no greeting")));
/// map.add(
///     |s: &String| s.contains("hello"),
///     |s: &String| format!("{s} contains hello."),
/// );
///
/// let probe = String::from("well hello there");
/// assert_eq!(
///     map.first_match(&probe).as_deref(),
///     Some("well hello there contains hello.")
/// );
/// assert_eq!(
///     map.first_match(&String::from("bye")).as_deref(),
///     Some("no greeting")
/// );
/// ```
pub struct PredicateFnMap<K, V> {
    entries: Entries<K, ValueFn<K, V>>,
    default_value: Option<V>,
    config: MatchConfig,
}

impl<K, V> PredicateFnMap<K, V> {
    /// Creates an empty map with the given fallback value.
    pub fn new(default_value: Option<V>) -> Self {
        Self {
            entries: Entries::new(),
            default_value,
            config: MatchConfig::default(),
        }
    }

    /// Creates a map from `(predicate, function)` pairs in iteration order.
    pub fn from_pairs<I>(pairs: I, default_value: Option<V>) -> Self
    where
        I: IntoIterator<Item = (Predicate<K>, ValueFn<K, V>)>,
    {
        let mut map = Self::new(default_value);
        map.entries.extend_pairs(pairs);
        map
    }

    /// Like [`from_pairs`](Self::from_pairs), rejecting an absent mapping.
    pub fn try_from_pairs<I>(pairs: Option<I>, default_value: Option<V>) -> Result<Self>
    where
        I: IntoIterator<Item = (Predicate<K>, ValueFn<K, V>)>,
    {
        let pairs = pairs.ok_or(MapError::invalid("mapping"))?;
        Ok(Self::from_pairs(pairs, default_value))
    }

    /// Creates a map by pairing predicates and functions at equal positions.
    pub fn from_lists(
        predicates: Vec<Predicate<K>>,
        functions: Vec<ValueFn<K, V>>,
        default_value: Option<V>,
    ) -> Result<Self> {
        let mut map = Self::new(default_value);
        map.entries.extend_lists(predicates, functions)?;
        Ok(map)
    }

    /// Like [`from_lists`](Self::from_lists), rejecting absent lists.
    pub fn try_from_lists(
        predicates: Option<Vec<Predicate<K>>>,
        functions: Option<Vec<ValueFn<K, V>>>,
        default_value: Option<V>,
    ) -> Result<Self> {
        let (predicates, functions) = require_lists(predicates, functions)?;
        Self::from_lists(predicates, functions, default_value)
    }

    /// Sets the fan-out policy for exhaustive queries.
    ///
    /// Returns [`MapError::InvalidArgument`] if `config` fails
    /// [`MatchConfig::validate`].
    pub fn with_config(mut self, config: MatchConfig) -> Result<Self> {
        self.set_config(config)?;
        Ok(self)
    }

    /// Replaces the fan-out policy, keeping the current one if `config` is
    /// invalid.
    pub fn set_config(&mut self, config: MatchConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Returns the fan-out policy.
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends an entry at the next index.
    pub fn add<F, G>(&mut self, predicate: F, value: G)
    where
        F: Fn(&K) -> bool + Send + Sync + 'static,
        G: Fn(&K) -> V + Send + Sync + 'static,
    {
        self.entries.push(Box::new(predicate), Box::new(value));
    }

    /// Appends an entry, rejecting an absent predicate or function.
    pub fn try_add(
        &mut self,
        predicate: Option<Predicate<K>>,
        value: Option<ValueFn<K, V>>,
    ) -> Result<()> {
        let predicate = predicate.ok_or(MapError::invalid("predicate"))?;
        let value = value.ok_or(MapError::invalid("value"))?;
        self.entries.push(predicate, value);
        Ok(())
    }

    /// Appends parallel lists of predicates and functions.
    pub fn add_all(
        &mut self,
        predicates: Vec<Predicate<K>>,
        functions: Vec<ValueFn<K, V>>,
    ) -> Result<()> {
        self.entries.extend_lists(predicates, functions)
    }

    /// Like [`add_all`](Self::add_all), rejecting absent lists.
    pub fn try_add_all(
        &mut self,
        predicates: Option<Vec<Predicate<K>>>,
        functions: Option<Vec<ValueFn<K, V>>>,
    ) -> Result<()> {
        let (predicates, functions) = require_lists(predicates, functions)?;
        self.add_all(predicates, functions)
    }

    /// Appends `(predicate, function)` pairs in iteration order.
    pub fn add_pairs<I>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (Predicate<K>, ValueFn<K, V>)>,
    {
        self.entries.extend_pairs(pairs);
    }

    /// Like [`add_pairs`](Self::add_pairs), rejecting an absent mapping.
    pub fn try_add_pairs<I>(&mut self, pairs: Option<I>) -> Result<()>
    where
        I: IntoIterator<Item = (Predicate<K>, ValueFn<K, V>)>,
    {
        let pairs = pairs.ok_or(MapError::invalid("mapping"))?;
        self.add_pairs(pairs);
        Ok(())
    }

    /// Removes the entry at `index` and returns its function.
    pub fn remove_at(&mut self, index: usize) -> Result<ValueFn<K, V>> {
        self.entries.remove_at(index)
    }

    /// Replaces the function at `index`, keeping its predicate.
    pub fn update_at<G>(&mut self, index: usize, value: G) -> Result<ValueFn<K, V>>
    where
        G: Fn(&K) -> V + Send + Sync + 'static,
    {
        self.entries.replace_at(index, Box::new(value))
    }

    /// Replaces the function of every entry whose predicate accepts `probe`.
    ///
    /// All updated entries share one instance of `value`.
    pub fn update_matching<G>(&mut self, probe: &K, value: G) -> usize
    where
        G: Fn(&K) -> V + Send + Sync + 'static,
        K: 'static,
        V: 'static,
    {
        let shared = Arc::new(value);
        self.entries.replace_matching(probe, || {
            let f = Arc::clone(&shared);
            Box::new(move |k: &K| f(k)) as ValueFn<K, V>
        })
    }

    /// Overwrites the fallback value.
    ///
    /// Only [`first_match`](Self::first_match) ever returns it.
    pub fn set_default_value(&mut self, default_value: Option<V>) {
        trace!(present = default_value.is_some(), "set default value");
        self.default_value = default_value;
    }

    /// Returns the fallback value.
    pub fn default_value(&self) -> Option<&V> {
        self.default_value.as_ref()
    }

    /// Iterates stored predicates in index order.
    pub fn predicates(&self) -> impl Iterator<Item = &Predicate<K>> {
        self.entries.predicates()
    }

    /// Iterates stored value functions in index order.
    pub fn value_fns(&self) -> impl Iterator<Item = &ValueFn<K, V>> {
        self.entries.slots()
    }

    /// Evaluates the function at `index` against `probe`.
    pub fn get(&self, index: usize, probe: &K) -> Option<V> {
        self.entries.get(index).map(|f| f(probe))
    }

    /// Invokes the function of the lowest-index entry accepting `probe`,
    /// or returns a clone of the default value when none does.
    pub fn first_match(&self, probe: &K) -> Option<V>
    where
        V: Clone,
    {
        match self.entries.first_match(probe) {
            Some(f) => Some(f(probe)),
            None => self.default_value.clone(),
        }
    }

    /// Returns `true` if any predicate accepts `probe`.
    pub fn any_matches(&self, probe: &K) -> bool {
        self.entries.any_match(probe)
    }
}

impl<K: Sync, V: Send> PredicateFnMap<K, V> {
    /// Invokes the function of every entry accepting `probe`.
    ///
    /// Empty when nothing matches. Output order is not part of the contract.
    pub fn all_matches(&self, probe: &K) -> Vec<V> {
        self.entries.collect_matches(probe, &self.config, |_, f| f(probe))
    }

    /// Counts the entries accepting `probe`.
    pub fn count_matches(&self, probe: &K) -> usize {
        self.entries.count_matches(probe, &self.config)
    }

    /// Returns the index of every entry accepting `probe`.
    pub fn match_indexes(&self, probe: &K) -> Vec<usize> {
        self.entries.match_indexes(probe, &self.config)
    }
}

impl<K, V> Default for PredicateFnMap<K, V> {
    fn default() -> Self {
        Self::new(None)
    }
}

impl<K, V: fmt::Debug> fmt::Debug for PredicateFnMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredicateFnMap")
            .field("len", &self.entries.len())
            .field("default_value", &self.default_value)
            .field("config", &self.config)
            .finish()
    }
}
