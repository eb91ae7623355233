//! Boxed closure types stored in predicate maps.

/// A pure boolean test over probes of type `K`.
///
/// Predicates must be free of side effects: the map may evaluate them in
/// any order, and with the `parallel` feature, from several threads at once.
/// Closures have no structural equality, so two behaviorally identical
/// predicates are still distinct entries.
pub type Predicate<K> = Box<dyn Fn(&K) -> bool + Send + Sync>;

/// A value producer evaluated against the probe that matched it.
///
/// Used by [`PredicateFnMap`](super::PredicateFnMap) when the returned value
/// depends on the probe (e.g. building a message from it).
pub type ValueFn<K, V> = Box<dyn Fn(&K) -> V + Send + Sync>;

/// Boxes a closure as a [`Predicate`].
///
/// ```
/// use u_predicate_map::map::predicate;
///
/// let is_even = predicate(|i: &i32| i % 2 == 0);
/// assert!(is_even(&4));
/// ```
pub fn predicate<K, F>(f: F) -> Predicate<K>
where
    F: Fn(&K) -> bool + Send + Sync + 'static,
{
    Box::new(f)
}

/// Boxes a closure as a [`ValueFn`].
pub fn value_fn<K, V, F>(f: F) -> ValueFn<K, V>
where
    F: Fn(&K) -> V + Send + Sync + 'static,
{
    Box::new(f)
}
