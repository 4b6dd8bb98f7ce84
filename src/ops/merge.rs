//! Three-way structural merge.
//!
//! Not present in the teacher at all — built from scratch against the
//! reconciliation rules: unchanged-on-both-sides keeps either value,
//! changed-on-one-side takes the changed value, changed-on-both-sides
//! incompatibly calls the caller's conflict function.

use std::hash::Hash;

use crate::ChampMap;
use crate::error::ChampError;

/// Three-way merges `a` and `b` against their common `ancestor`.
///
/// For each key touched by `a` or `b`:
/// - unchanged in one branch → the other branch's value wins
/// - changed identically in both → that value wins
/// - changed incompatibly in both → `conflict_fn(key, ancestor, a, b)` is
///   consulted; `Ok(Some(v))` keeps `v`, `Ok(None)` removes the key,
///   `Err` aborts the whole merge
///
/// # Errors
///
/// Returns whatever error `conflict_fn` returns for the first conflict it
/// cannot resolve.
pub fn merge<K, V, F>(
    ancestor: &ChampMap<K, V>,
    a: &ChampMap<K, V>,
    b: &ChampMap<K, V>,
    mut conflict_fn: F,
) -> Result<ChampMap<K, V>, ChampError>
where
    K: Hash + Eq + Clone,
    V: Hash + Clone + PartialEq,
    F: FnMut(&K, Option<&V>, Option<&V>, Option<&V>) -> Result<Option<V>, ChampError>,
{
    // Fast paths: identical subtrees are detected via AdHash equality
    // rather than pointer identity, since the three maps are backed by
    // separate private arenas and share no structure to point into.
    if a.len() == b.len() && a.adhash() == b.adhash() {
        return Ok(clone_map(a));
    }
    if ancestor.len() == a.len() && ancestor.adhash() == a.adhash() {
        return Ok(clone_map(b));
    }
    if ancestor.len() == b.len() && ancestor.adhash() == b.adhash() {
        return Ok(clone_map(a));
    }

    let mut out = ChampMap::new();
    let mut seen = std::collections::HashSet::new();

    for (key, _) in a.iter().chain(b.iter()) {
        if !seen.insert(key) {
            continue;
        }

        let anc_v = ancestor.get(key);
        let a_v = a.get(key);
        let b_v = b.get(key);

        let resolved = match (a_v, b_v) {
            (Some(x), Some(y)) if x == y => Some(x.clone()),
            (Some(x), Some(y)) => {
                let a_changed = anc_v != Some(x);
                let b_changed = anc_v != Some(y);
                if a_changed && !b_changed {
                    Some(x.clone())
                } else if b_changed && !a_changed {
                    Some(y.clone())
                } else {
                    conflict_fn(key, anc_v, Some(x), Some(y))?
                }
            }
            (Some(x), None) => {
                let a_changed = anc_v != Some(x);
                let ancestor_had_it = anc_v.is_some();
                if !a_changed {
                    None
                } else if !ancestor_had_it {
                    Some(x.clone())
                } else {
                    conflict_fn(key, anc_v, Some(x), None)?
                }
            }
            (None, Some(y)) => {
                let b_changed = anc_v != Some(y);
                let ancestor_had_it = anc_v.is_some();
                if !b_changed {
                    None
                } else if !ancestor_had_it {
                    Some(y.clone())
                } else {
                    conflict_fn(key, anc_v, None, Some(y))?
                }
            }
            (None, None) => None,
        };

        if let Some(value) = resolved {
            out.insert(key.clone(), value);
        }
    }

    Ok(out)
}

fn clone_map<K: Hash + Eq + Clone, V: Hash + Clone>(src: &ChampMap<K, V>) -> ChampMap<K, V> {
    let mut out = ChampMap::new();
    for (k, v) in src.iter() {
        out.insert(k.clone(), v.clone());
    }
    out
}
