//! Align a secondary series onto a primary one by key.

use std::collections::HashMap;
use std::hash::Hash;

/// For every primary item, the secondary value with the same key (or `None`).
///
/// The output has exactly one entry per primary item, in primary order.
/// Secondary-only keys are ignored; when the secondary repeats a key, the
/// later entry wins. Secondary items whose key or value is absent are skipped.
pub fn merge_by_key<P, S, K, V>(
    primary: &[P],
    secondary: &[S],
    primary_key: impl Fn(&P) -> Option<K>,
    secondary_key: impl Fn(&S) -> Option<K>,
    secondary_value: impl Fn(&S) -> Option<V>,
) -> Vec<Option<V>>
where
    K: Eq + Hash,
    V: Clone,
{
    let mut lookup: HashMap<K, Option<V>> = HashMap::with_capacity(secondary.len());
    for s in secondary {
        if let Some(key) = secondary_key(s) {
            lookup.insert(key, secondary_value(s));
        }
    }

    primary
        .iter()
        .map(|p| primary_key(p).and_then(|k| lookup.get(&k).cloned().flatten()))
        .collect()
}
