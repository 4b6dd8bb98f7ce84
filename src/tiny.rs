//! Tiny-map companion — a flat `Vec` with a double-hash Bloom-style
//! membership check, for maps small enough that a trie is overkill.

use std::hash::Hash;

use crate::ChampMap;
use crate::adhash;
use crate::error::ChampError;

/// Maximum number of entries before [`TinyMap::insert`] promotes to a
/// [`ChampMap`].
const CAPACITY: usize = 16;

/// A small, flat key-value store backed by a `Vec`, with a 64-bit
/// double-hash bitmap for cheap negative membership checks.
///
/// Promotes one-way to a [`ChampMap`] via [`TinyMap::promote`] once it
/// would exceed [`CAPACITY`] entries, or once its bitmap saturates.
/// There is no implicit promotion on lookup.
pub struct TinyMap<K, V> {
    entries: Vec<(K, V)>,
    bitmap: u64,
}

impl<K, V> TinyMap<K, V> {
    /// Creates an empty tiny-map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            bitmap: 0,
        }
    }

    /// Returns the number of key-value pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the map contains no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> Default for TinyMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

fn bits(hash: u64) -> (u32, u32) {
    ((hash & 0x3F) as u32, ((hash >> 6) & 0x3F) as u32)
}

fn bit_mask(bit: u32) -> u64 {
    1 << bit
}

impl<K: Hash + Eq, V> TinyMap<K, V> {
    /// Returns `true` if the bitmap cannot rule out membership of a key
    /// with the given hash. A `false` result is a definite miss; a `true`
    /// result requires the linear scan to confirm.
    fn might_contain(&self, hash: u64) -> bool {
        let (primary, secondary) = bits(hash);
        self.bitmap & bit_mask(primary) != 0 && self.bitmap & bit_mask(secondary) != 0
    }

    /// Returns a reference to the value associated with `key`.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        let hash = adhash::hash_one(key);
        if !self.might_contain(hash) {
            return None;
        }
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Returns `true` if the map contains the given key.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Returns `true` if inserting `key` would require promotion: either
    /// the map is already at capacity, or the key's bit pair is already
    /// fully saturated by other keys (the Bloom check can no longer
    /// usefully discriminate this key).
    fn would_need_promotion(&self, key: &K, hash: u64) -> bool {
        if self.entries.len() >= CAPACITY {
            return true;
        }
        if self.contains_key(key) {
            return false;
        }
        self.might_contain(hash)
    }
}

impl<K: Hash + Eq + Clone, V: Hash + Clone> TinyMap<K, V> {
    /// Inserts a key-value pair, or signals that the map should be
    /// [`promote`](Self::promote)d first.
    ///
    /// Returns `Ok(old_value)` on success, mirroring [`ChampMap::insert`].
    ///
    /// # Errors
    ///
    /// Returns [`ChampError::PromotionRequired`] if this insert would
    /// overflow capacity or saturate the bitmap beyond usefulness — the
    /// caller is expected to call `promote` and retry against the
    /// resulting `ChampMap`.
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>, ChampError> {
        let hash = adhash::hash_one(&key);

        if let Some(pos) = self.entries.iter().position(|(k, _)| *k == key) {
            let old = std::mem::replace(&mut self.entries[pos].1, value);
            return Ok(Some(old));
        }

        if self.would_need_promotion(&key, hash) {
            return Err(ChampError::PromotionRequired);
        }

        let (primary, secondary) = bits(hash);
        self.bitmap |= bit_mask(primary) | bit_mask(secondary);
        self.entries.push((key, value));
        Ok(None)
    }

    /// Removes a key, returning its value if present.
    ///
    /// Does not clear the removed key's bit pair: the bitmap here has no
    /// per-bit reference count, so a bit might still be load-bearing for
    /// another surviving key that happens to share it. See `DESIGN.md`
    /// for the tradeoff this leaves (a churned map can saturate and
    /// promote earlier than its live entry count alone would suggest).
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.swap_remove(pos).1)
    }

    /// Consumes this tiny-map and rebuilds its contents as a [`ChampMap`].
    ///
    /// One-way: there is no route back from `ChampMap` to `TinyMap`.
    #[must_use]
    pub fn promote(self) -> ChampMap<K, V> {
        let mut out = ChampMap::new();
        for (k, v) in self.entries {
            out.insert(k, v);
        }
        out
    }
}

impl<K, V> IntoIterator for TinyMap<K, V> {
    type Item = (K, V);
    type IntoIter = std::vec::IntoIter<(K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
