//! Eagerly valued predicate map.

use super::config::MatchConfig;
use super::entries::{require_lists, Entries};
use super::types::Predicate;
use crate::error::{MapError, Result};
use std::fmt;
use tracing::trace;

/// Maps predicates over `K` to stored values of type `V`.
///
/// Entries keep insertion order. [`first_match`](Self::first_match) returns
/// the value of the lowest-index predicate that accepts a probe, falling
/// back to the default value; the exhaustive queries return every match.
///
/// # Examples
///
/// ```
/// use u_predicate_map::map::PredicateMap;
///
/// let mut map = PredicateMap::new(Some("none"));
/// map.add(|i: &i32| *i > 1, "A");
/// map.add(|i: &i32| *i == 1, "B");
/// map.add(|i: &i32| *i < 1, "C");
///
/// assert_eq!(map.first_match(&1), Some(&"B"));
/// assert_eq!(map.len(), 3);
/// ```
///
/// Collecting every match:
///
/// ```
/// use u_predicate_map::map::PredicateMap;
///
/// let mut map = PredicateMap::new(Some(""));
/// map.add(|i: &u32| i % 3 == 0, "fizz");
/// map.add(|i: &u32| i % 5 == 0, "buzz");
///
/// let mut labels = map.all_matches(&15);
/// labels.sort();
/// assert_eq!(labels, vec![&"buzz", &"fizz"]);
/// assert!(map.all_matches(&7).is_empty());
/// ```
pub struct PredicateMap<K, V> {
    entries: Entries<K, V>,
    default_value: Option<V>,
    config: MatchConfig,
}

impl<K, V> PredicateMap<K, V> {
    /// Creates an empty map with the given fallback value.
    pub fn new(default_value: Option<V>) -> Self {
        Self {
            entries: Entries::new(),
            default_value,
            config: MatchConfig::default(),
        }
    }

    /// Creates a map from `(predicate, value)` pairs, keeping their
    /// iteration order as entry order.
    ///
    /// When `pairs` comes from an unordered collection, first-match
    /// priority between overlapping predicates follows that collection's
    /// iteration order and is effectively unspecified.
    pub fn from_pairs<I>(pairs: I, default_value: Option<V>) -> Self
    where
        I: IntoIterator<Item = (Predicate<K>, V)>,
    {
        let mut map = Self::new(default_value);
        map.entries.extend_pairs(pairs);
        map
    }

    /// Like [`from_pairs`](Self::from_pairs), rejecting an absent mapping.
    pub fn try_from_pairs<I>(pairs: Option<I>, default_value: Option<V>) -> Result<Self>
    where
        I: IntoIterator<Item = (Predicate<K>, V)>,
    {
        let pairs = pairs.ok_or(MapError::invalid("mapping"))?;
        Ok(Self::from_pairs(pairs, default_value))
    }

    /// Creates a map by pairing predicates and values at equal positions.
    ///
    /// Returns [`MapError::SizeMismatch`] if the lists differ in length.
    pub fn from_lists(
        predicates: Vec<Predicate<K>>,
        values: Vec<V>,
        default_value: Option<V>,
    ) -> Result<Self> {
        let mut map = Self::new(default_value);
        map.entries.extend_lists(predicates, values)?;
        Ok(map)
    }

    /// Like [`from_lists`](Self::from_lists), rejecting absent lists.
    pub fn try_from_lists(
        predicates: Option<Vec<Predicate<K>>>,
        values: Option<Vec<V>>,
        default_value: Option<V>,
    ) -> Result<Self> {
        let (predicates, values) = require_lists(predicates, values)?;
        Self::from_lists(predicates, values, default_value)
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
    pub fn add<F>(&mut self, predicate: F, value: V)
    where
        F: Fn(&K) -> bool + Send + Sync + 'static,
    {
        self.entries.push(Box::new(predicate), value);
    }

    /// Appends an entry, rejecting an absent predicate or value.
    pub fn try_add(&mut self, predicate: Option<Predicate<K>>, value: Option<V>) -> Result<()> {
        let predicate = predicate.ok_or(MapError::invalid("predicate"))?;
        let value = value.ok_or(MapError::invalid("value"))?;
        self.entries.push(predicate, value);
        Ok(())
    }

    /// Appends parallel lists of predicates and values.
    ///
    /// Nothing is appended on a size mismatch.
    pub fn add_all(&mut self, predicates: Vec<Predicate<K>>, values: Vec<V>) -> Result<()> {
        self.entries.extend_lists(predicates, values)
    }

    /// Like [`add_all`](Self::add_all), rejecting absent lists.
    pub fn try_add_all(
        &mut self,
        predicates: Option<Vec<Predicate<K>>>,
        values: Option<Vec<V>>,
    ) -> Result<()> {
        let (predicates, values) = require_lists(predicates, values)?;
        self.add_all(predicates, values)
    }

    /// Appends `(predicate, value)` pairs in iteration order.
    pub fn add_pairs<I>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (Predicate<K>, V)>,
    {
        self.entries.extend_pairs(pairs);
    }

    /// Like [`add_pairs`](Self::add_pairs), rejecting an absent mapping.
    pub fn try_add_pairs<I>(&mut self, pairs: Option<I>) -> Result<()>
    where
        I: IntoIterator<Item = (Predicate<K>, V)>,
    {
        let pairs = pairs.ok_or(MapError::invalid("mapping"))?;
        self.add_pairs(pairs);
        Ok(())
    }

    /// Removes the entry at `index` and returns its value.
    ///
    /// Later entries shift down by one.
    pub fn remove_at(&mut self, index: usize) -> Result<V> {
        self.entries.remove_at(index)
    }

    /// Replaces the value at `index`, keeping its predicate. Returns the
    /// previous value.
    pub fn update_at(&mut self, index: usize, value: V) -> Result<V> {
        self.entries.replace_at(index, value)
    }

    /// Replaces the value of every entry whose predicate accepts `probe`.
    ///
    /// Returns how many entries were updated; zero matches is a no-op.
    pub fn update_matching(&mut self, probe: &K, value: V) -> usize
    where
        V: Clone,
    {
        self.entries.replace_matching(probe, || value.clone())
    }

    /// Overwrites the fallback value.
    ///
    /// The default only affects [`first_match`](Self::first_match); the
    /// exhaustive queries never return it.
    pub fn set_default_value(&mut self, default_value: Option<V>) {
        trace!(present = default_value.is_some(), "set default value");
        self.default_value = default_value;
    }

    /// Returns the fallback value.
    pub fn default_value(&self) -> Option<&V> {
        self.default_value.as_ref()
    }

    /// Returns the value stored at `index`.
    pub fn get(&self, index: usize) -> Option<&V> {
        self.entries.get(index)
    }

    /// Iterates stored predicates in index order.
    pub fn predicates(&self) -> impl Iterator<Item = &Predicate<K>> {
        self.entries.predicates()
    }

    /// Iterates stored values in index order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.slots()
    }

    /// Returns the value of the lowest-index entry accepting `probe`, or
    /// the default value when none does.
    ///
    /// Predicates after the first match are not evaluated.
    pub fn first_match(&self, probe: &K) -> Option<&V> {
        self.entries
            .first_match(probe)
            .or(self.default_value.as_ref())
    }

    /// Returns `true` if any predicate accepts `probe`.
    pub fn any_matches(&self, probe: &K) -> bool {
        self.entries.any_match(probe)
    }
}

impl<K: Sync, V: Sync> PredicateMap<K, V> {
    /// Returns the value of every entry accepting `probe`.
    ///
    /// Equal values on different entries all appear. The result is empty,
    /// never the default, when nothing matches. Output order is not part
    /// of the contract.
    pub fn all_matches(&self, probe: &K) -> Vec<&V> {
        self.entries.collect_matches(probe, &self.config, |_, value| value)
    }

    /// Counts the entries accepting `probe`.
    pub fn count_matches(&self, probe: &K) -> usize {
        self.entries.count_matches(probe, &self.config)
    }

    /// Returns the index of every entry accepting `probe`.
    ///
    /// Indexes are only valid until the next removal.
    pub fn match_indexes(&self, probe: &K) -> Vec<usize> {
        self.entries.match_indexes(probe, &self.config)
    }
}

impl<K, V> Default for PredicateMap<K, V> {
    fn default() -> Self {
        Self::new(None)
    }
}

impl<K, V: fmt::Debug> fmt::Debug for PredicateMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredicateMap")
            .field("len", &self.entries.len())
            .field("values", &self.entries.slots().collect::<Vec<_>>())
            .field("default_value", &self.default_value)
            .field("config", &self.config)
            .finish()
    }
}

impl<K, V> FromIterator<(Predicate<K>, V)> for PredicateMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (Predicate<K>, V)>>(iter: I) -> Self {
        Self::from_pairs(iter, None)
    }
}

impl<K, V> Extend<(Predicate<K>, V)> for PredicateMap<K, V> {
    fn extend<I: IntoIterator<Item = (Predicate<K>, V)>>(&mut self, iter: I) {
        self.add_pairs(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::types::predicate;

    fn threshold_map() -> PredicateMap<i32, &'static str> {
        let mut map = PredicateMap::new(Some("none"));
        map.add(|i: &i32| *i > 1, "A");
        map.add(|i: &i32| *i == 1, "B");
        map.add(|i: &i32| *i < 1, "C");
        map
    }

    fn fizz_buzz_map() -> PredicateMap<u32, &'static str> {
        let mut map = PredicateMap::new(Some(""));
        map.add(|i: &u32| i % 3 == 0, "fizz");
        map.add(|i: &u32| i % 5 == 0, "buzz");
        map
    }

    // ---- Construction ----

    #[test]
    fn test_new_is_empty() {
        let map: PredicateMap<i32, String> = PredicateMap::new(None);
        assert!(map.is_empty());
        assert_eq!(map.len(), 0);
        assert_eq!(map.default_value(), None);
    }

    #[test]
    fn test_from_lists_pairs_in_order() {
        let predicates = vec![
            predicate(|s: &String| s.len() == 2),
            predicate(|s: &String| s.contains("string")),
        ];
        let map = PredicateMap::from_lists(predicates, vec![1, 2], None).unwrap();

        assert_eq!(map.len(), 2);
        assert_eq!(map.values().copied().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(map.first_match(&"ab".to_string()), Some(&1));
        assert_eq!(map.first_match(&"a string".to_string()), Some(&2));
    }

    #[test]
    fn test_from_lists_size_mismatch_reports_both_counts() {
        let predicates: Vec<Predicate<i32>> =
            (0..3).map(|n| predicate(move |i: &i32| *i == n)).collect();
        let err = PredicateMap::from_lists(predicates, vec![0; 5], None).unwrap_err();

        assert_eq!(err, MapError::SizeMismatch { keys: 3, values: 5 });
        let msg = err.to_string();
        assert!(msg.contains('3') && msg.contains('5'));
    }

    #[test]
    fn test_try_from_lists_absent_keys() {
        let err = PredicateMap::<i32, u8>::try_from_lists(None, Some(vec![1]), None).unwrap_err();
        assert_eq!(err.to_string(), "invalid key collection argument");
    }

    #[test]
    fn test_try_from_lists_absent_values() {
        let err = PredicateMap::<i32, u8>::try_from_lists(Some(vec![]), None, None).unwrap_err();
        assert_eq!(err.to_string(), "invalid value collection argument");
    }

    #[test]
    fn test_try_from_pairs_absent_mapping() {
        let none: Option<Vec<(Predicate<i32>, u8)>> = None;
        let err = PredicateMap::<i32, u8>::try_from_pairs(none, None).unwrap_err();
        assert_eq!(err, MapError::InvalidArgument { parameter: "mapping" });
    }

    #[test]
    fn test_from_pairs_keeps_iteration_order() {
        let pairs = vec![
            (predicate(|i: &i32| *i >= 0), "non-negative"),
            (predicate(|i: &i32| *i == 0), "zero"),
        ];
        let map = PredicateMap::from_pairs(pairs, None);
        assert_eq!(map.first_match(&0), Some(&"non-negative"));
    }

    #[test]
    fn test_collect_from_iterator() {
        let map: PredicateMap<i32, char> = vec![
            (predicate(|i: &i32| *i < 0), '-'),
            (predicate(|i: &i32| *i > 0), '+'),
        ]
        .into_iter()
        .collect();
        assert_eq!(map.len(), 2);
        assert_eq!(map.first_match(&-4), Some(&'-'));
        assert_eq!(map.first_match(&0), None);
    }

    // ---- Mutation ----

    #[test]
    fn test_count_after_adds() {
        let mut map = PredicateMap::new(None);
        for n in 0..10 {
            map.add(move |i: &i32| *i == n, n);
        }
        assert_eq!(map.len(), 10);
    }

    #[test]
    fn test_duplicate_predicates_keep_own_entries() {
        let mut map = PredicateMap::new(None);
        map.add(|i: &i32| *i > 0, "first");
        map.add(|i: &i32| *i > 0, "second");
        assert_eq!(map.len(), 2);
        assert_eq!(map.match_indexes(&1), vec![0, 1]);
    }

    #[test]
    fn test_try_add_rejects_absent_predicate() {
        let mut map: PredicateMap<i32, &str> = PredicateMap::default();
        let err = map.try_add(None, Some("x")).unwrap_err();
        assert_eq!(err.to_string(), "invalid predicate argument");
        assert!(map.is_empty());
    }

    #[test]
    fn test_try_add_rejects_absent_value() {
        let mut map: PredicateMap<i32, &str> = PredicateMap::default();
        let err = map.try_add(Some(predicate(|_: &i32| true)), None).unwrap_err();
        assert_eq!(err.to_string(), "invalid value argument");
        assert!(map.is_empty());
    }

    #[test]
    fn test_add_allows_empty_values_via_option() {
        let mut map: PredicateMap<i32, Option<&str>> = PredicateMap::new(Some(Some("default")));
        map.add(|i: &i32| *i == 0, None);
        assert_eq!(map.first_match(&0), Some(&None));
        assert_eq!(map.first_match(&1), Some(&Some("default")));
    }

    #[test]
    fn test_add_all_appends_after_existing() {
        let mut map = threshold_map();
        map.add_all(vec![predicate(|i: &i32| *i == 42)], vec!["answer"])
            .unwrap();
        assert_eq!(map.len(), 4);
        assert_eq!(map.match_indexes(&42), vec![0, 3]);
    }

    #[test]
    fn test_add_all_mismatch_applies_nothing() {
        let mut map = threshold_map();
        let err = map.add_all(vec![predicate(|_: &i32| true)], vec![]).unwrap_err();
        assert_eq!(err, MapError::SizeMismatch { keys: 1, values: 0 });
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_try_add_all_absent_lists() {
        let mut map = threshold_map();
        assert_eq!(
            map.try_add_all(None, Some(vec!["x"])),
            Err(MapError::invalid("key collection"))
        );
        assert_eq!(
            map.try_add_all(Some(vec![]), None),
            Err(MapError::invalid("value collection"))
        );
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_try_add_pairs() {
        let mut map = threshold_map();
        assert_eq!(
            map.try_add_pairs(None::<Vec<(Predicate<i32>, &str)>>),
            Err(MapError::invalid("mapping"))
        );
        map.try_add_pairs(Some(vec![(predicate(|i: &i32| *i == 7), "seven")]))
            .unwrap();
        assert_eq!(map.len(), 4);
    }

    #[test]
    fn test_remove_at_renumbers() {
        let mut map = threshold_map();
        assert_eq!(map.remove_at(1), Ok("B"));
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(1), Some(&"C"));
        assert_eq!(map.match_indexes(&0), vec![1]);
        // the removed "== 1" rule no longer answers
        assert_eq!(map.first_match(&1), Some(&"none"));
    }

    #[test]
    fn test_remove_at_boundary() {
        let mut map = threshold_map();
        assert_eq!(
            map.remove_at(3),
            Err(MapError::IndexOutOfRange { index: 3, count: 3 })
        );
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_update_at() {
        let mut map = threshold_map();
        assert_eq!(map.update_at(2, "negative"), Ok("C"));
        assert_eq!(map.first_match(&-1), Some(&"negative"));
        assert_eq!(
            map.update_at(3, "x"),
            Err(MapError::IndexOutOfRange { index: 3, count: 3 })
        );
    }

    #[test]
    fn test_update_matching_leaves_others_untouched() {
        let mut map = PredicateMap::new(None);
        map.add(|i: &i32| i % 2 == 0, "even".to_string());
        map.add(|i: &i32| i % 3 == 0, "three".to_string());
        map.add(|i: &i32| *i > 100, "big".to_string());

        assert_eq!(map.update_matching(&6, "six".to_string()), 2);
        let values: Vec<&str> = map.values().map(String::as_str).collect();
        assert_eq!(values, vec!["six", "six", "big"]);
    }

    #[test]
    fn test_update_matching_no_match_is_noop() {
        let mut map = threshold_map();
        let mut empty: PredicateMap<i32, &str> = PredicateMap::default();
        assert_eq!(empty.update_matching(&1, "x"), 0);
        assert_eq!(map.update_matching(&1, "one"), 1);
        assert_eq!(map.values().copied().collect::<Vec<_>>(), vec!["A", "one", "C"]);
    }

    #[test]
    fn test_set_default_value() {
        let mut map = threshold_map();
        map.remove_at(1).unwrap();
        map.set_default_value(Some("fallback"));
        assert_eq!(map.first_match(&1), Some(&"fallback"));
        map.set_default_value(None);
        assert_eq!(map.first_match(&1), None);
    }

    // ---- Queries ----

    #[test]
    fn test_first_match_lowest_index_wins() {
        let map = threshold_map();
        assert_eq!(map.first_match(&1), Some(&"B"));
    }

    #[test]
    fn test_first_match_empty_returns_default() {
        let map: PredicateMap<i32, &str> = PredicateMap::new(Some(""));
        assert_eq!(map.first_match(&123), Some(&""));
    }

    #[test]
    fn test_all_matches_fizz_buzz() {
        let map = fizz_buzz_map();
        let mut labels: Vec<&str> = map.all_matches(&15).into_iter().copied().collect();
        labels.sort_unstable();
        assert_eq!(labels, vec!["buzz", "fizz"]);
        assert_eq!(map.all_matches(&9), vec![&"fizz"]);
    }

    #[test]
    fn test_all_matches_ignores_default() {
        let map = fizz_buzz_map();
        assert!(map.all_matches(&7).is_empty());
    }

    #[test]
    fn test_all_matches_keeps_duplicate_values() {
        let mut map = PredicateMap::new(None);
        map.add(|i: &i32| *i > 0, "pos");
        map.add(|i: &i32| *i > 1, "pos");
        assert_eq!(map.all_matches(&5), vec![&"pos", &"pos"]);
    }

    #[test]
    fn test_all_matches_keeps_duplicate_values_when_fanned_out() {
        let config = MatchConfig::default().with_parallel_threshold(8);
        let mut map = PredicateMap::new(None).with_config(config).unwrap();
        for n in 0..32 {
            let label = if n % 2 == 0 { "even" } else { "odd" };
            map.add(move |i: &i32| *i >= n, label);
        }
        assert!(map.len() >= map.config().parallel_threshold);

        let values = map.all_matches(&31);
        assert_eq!(values.len(), 32);
        assert_eq!(values.iter().filter(|v| ***v == "even").count(), 16);
        assert_eq!(values.iter().filter(|v| ***v == "odd").count(), 16);
        assert_eq!(map.count_matches(&31), 32);
    }

    #[test]
    fn test_empty_map_queries() {
        let map: PredicateMap<i32, &str> = PredicateMap::default();
        assert!(!map.any_matches(&0));
        assert_eq!(map.count_matches(&0), 0);
        assert!(map.match_indexes(&0).is_empty());
    }

    #[test]
    fn test_count_and_any() {
        let map = fizz_buzz_map();
        assert_eq!(map.count_matches(&30), 2);
        assert_eq!(map.count_matches(&3), 1);
        assert!(map.any_matches(&5));
        assert!(!map.any_matches(&7));
    }

    #[test]
    fn test_probe_absence_handled_by_predicates() {
        let mut map: PredicateMap<Option<i32>, &str> = PredicateMap::new(Some("missing"));
        map.add(|i: &Option<i32>| i.is_some_and(|v| v > 0), "positive");
        assert_eq!(map.first_match(&None), Some(&"missing"));
        assert_eq!(map.count_matches(&None), 0);
    }

    #[test]
    fn test_sequential_config_same_results() {
        let map = fizz_buzz_map()
            .with_config(MatchConfig::sequential())
            .unwrap();
        assert!(!map.config().parallel);
        assert_eq!(map.count_matches(&15), 2);
    }

    #[test]
    fn test_with_config_rejects_zero_threshold() {
        let bad = MatchConfig::default().with_parallel_threshold(0);
        let err = PredicateMap::<i32, &str>::new(None)
            .with_config(bad)
            .unwrap_err();
        assert_eq!(err, MapError::invalid("parallel_threshold"));
    }

    #[test]
    fn test_set_config_keeps_previous_on_error() {
        let mut map = fizz_buzz_map();
        map.set_config(MatchConfig::sequential()).unwrap();

        let bad = MatchConfig::default().with_parallel_threshold(0);
        assert_eq!(
            map.set_config(bad),
            Err(MapError::invalid("parallel_threshold"))
        );
        assert_eq!(*map.config(), MatchConfig::sequential());
    }

    #[test]
    fn test_debug_lists_values() {
        let map = fizz_buzz_map();
        let dbg = format!("{map:?}");
        assert!(dbg.contains("len: 2"));
        assert!(dbg.contains("\"fizz\""));
    }
}
