//! Transient (mutable, single-owner) editing façade.
//!
//! Not present in the teacher. `Transient` seeds an owned pool of
//! [`TNode`]s from a [`ChampMap`] via a one-time DFS copy, then edits that
//! pool in place — genuine mutation, not copy-on-write — until converted
//! back with [`Transient::persistent`].

use std::hash::Hash;
use std::thread::ThreadId;

use safe_bump::Idx;

use crate::ChampMap;
use crate::adhash;
use crate::arena::ChampArena;
use crate::error::ChampError;
use crate::node::{self, Entry, Node};
use crate::store::ChampStore;

/// A transient-only node representation: each node owns its entries and
/// child indices directly, rather than pointing into a shared arena, so
/// they can be mutated in place.
enum TNode<K, V> {
    Inner {
        data_map: u32,
        node_map: u32,
        data: Vec<Entry<K, V>>,
        children: Vec<usize>,
        count: u32,
        adhash: u64,
    },
    Collision {
        hash: u32,
        entries: Vec<Entry<K, V>>,
        adhash: u64,
    },
}

/// A single-owner, in-place-mutable editor over a CHAMP trie.
///
/// Created by [`ChampMap::as_transient`]. Every method checks that the
/// transient is still alive and is being accessed from its creating
/// thread before touching any state.
pub struct Transient<K, V> {
    pool: Vec<TNode<K, V>>,
    root: Option<usize>,
    size: usize,
    adhash: u64,
    owner: ThreadId,
    alive: bool,
}

impl<K, V> Transient<K, V> {
    pub(crate) fn new(pool: Vec<TNode<K, V>>, root: Option<usize>, size: usize, adhash: u64) -> Self {
        Self {
            pool,
            root,
            size,
            adhash,
            owner: std::thread::current().id(),
            alive: true,
        }
    }

    fn check(&self) -> Result<(), ChampError> {
        if !self.alive {
            return Err(ChampError::TransientDead);
        }
        if std::thread::current().id() != self.owner {
            return Err(ChampError::NonOwnerAccess);
        }
        Ok(())
    }

    /// Returns the number of key-value pairs.
    pub fn count(&self) -> Result<usize, ChampError> {
        self.check()?;
        Ok(self.size)
    }
}

impl<K: Hash + Eq, V> Transient<K, V> {
    /// Returns a reference to the value associated with `key`.
    pub fn lookup(&self, key: &K) -> Result<Option<&V>, ChampError> {
        self.check()?;
        let Some(root) = self.root else {
            return Ok(None);
        };
        let hash = adhash::hash_key(key);
        Ok(tlookup(&self.pool, root, hash, key, 0))
    }
}

impl<K: Hash + Eq + Clone, V: Hash + Clone> Transient<K, V> {
    /// Associates `key` with `value`, mutating the owned node pool in
    /// place. Returns the previously associated value, if any.
    pub fn assoc(&mut self, key: K, value: V) -> Result<Option<V>, ChampError> {
        self.check()?;
        let hash = adhash::hash_key(&key);
        let entry = Entry { hash, key, value };

        if let Some(root) = self.root {
            let (old_value, delta) = tassoc_recursive(&mut self.pool, root, entry, 0);
            self.adhash = self.adhash.wrapping_add(delta);
            if old_value.is_none() {
                self.size += 1;
            }
            Ok(old_value)
        } else {
            let contrib = adhash::entry_adhash(entry.hash, adhash::hash_one(&entry.value));
            let bit = node::mask(node::fragment(entry.hash, 0));
            self.pool.push(TNode::Inner {
                data_map: bit,
                node_map: 0,
                data: vec![entry],
                children: Vec::new(),
                count: 1,
                adhash: contrib,
            });
            self.root = Some(self.pool.len() - 1);
            self.size = 1;
            self.adhash = contrib;
            Ok(None)
        }
    }

    /// Removes `key`, mutating the owned node pool in place. Returns the
    /// removed value, if it was present.
    pub fn dissoc(&mut self, key: &K) -> Result<Option<V>, ChampError> {
        self.check()?;
        let Some(root) = self.root else {
            return Ok(None);
        };
        let hash = adhash::hash_key(key);
        match tdissoc_recursive(&mut self.pool, root, hash, key, 0) {
            TRemoveOutcome::NotFound => Ok(None),
            TRemoveOutcome::Removed {
                empty,
                removed_value,
                adhash_delta,
            } => {
                if empty {
                    self.root = None;
                }
                self.size -= 1;
                self.adhash = self.adhash.wrapping_sub(adhash_delta);
                Ok(Some(removed_value))
            }
        }
    }
}

impl<K: Clone, V: Clone> Transient<K, V> {
    /// Converts this transient back into an immutable [`ChampMap`],
    /// rebuilding the packed three-arena representation from the node
    /// pool. The transient becomes dead and every subsequent call returns
    /// [`ChampError::TransientDead`].
    pub fn persistent(&mut self) -> Result<ChampMap<K, V>, ChampError> {
        self.check()?;
        let mut store = ChampArena::new();
        let root = self.root.map(|idx| build_persistent_node(&self.pool, idx, &mut store));
        let map = ChampMap::from_parts(store, root, self.size, self.adhash);
        self.alive = false;
        Ok(map)
    }
}

// ---------------------------------------------------------------------------
// Seeding — DFS copy from a packed arena into an owned TNode pool.
// ---------------------------------------------------------------------------

/// Builds an owned `TNode` pool from an arena-backed trie, for
/// [`ChampMap::as_transient`]. Post-order: children are seeded before the
/// parent that references them by pool index.
pub(crate) fn seed_pool<K, V, S>(store: &S, root: Option<Idx<Node<K, V>>>) -> (Vec<TNode<K, V>>, Option<usize>)
where
    K: Clone,
    V: Clone,
    S: ChampStore<K, V>,
{
    let mut pool = Vec::new();
    let root = root.map(|idx| seed_node(store, idx, &mut pool));
    (pool, root)
}

fn seed_node<K, V, S>(store: &S, idx: Idx<Node<K, V>>, pool: &mut Vec<TNode<K, V>>) -> usize
where
    K: Clone,
    V: Clone,
    S: ChampStore<K, V>,
{
    match *store.get_node(idx) {
        Node::Inner {
            data_map,
            node_map,
            data_start,
            children_start,
            count,
            adhash,
        } => {
            let data_len = data_map.count_ones() as usize;
            let children_len = node_map.count_ones() as usize;

            let mut data = Vec::with_capacity(data_len);
            for i in 0..data_len {
                let e = store.get_entry(node::offset(data_start, i));
                data.push(Entry { hash: e.hash, key: e.key.clone(), value: e.value.clone() });
            }

            let mut children = Vec::with_capacity(children_len);
            for i in 0..children_len {
                let child_idx = *store.get_child(node::offset(children_start, i));
                children.push(seed_node(store, child_idx, pool));
            }

            pool.push(TNode::Inner { data_map, node_map, data, children, count, adhash });
            pool.len() - 1
        }
        Node::Collision { hash, entries_start, entries_len, adhash } => {
            let len = usize::from(entries_len);
            let mut entries = Vec::with_capacity(len);
            for i in 0..len {
                let e = store.get_entry(node::offset(entries_start, i));
                entries.push(Entry { hash: e.hash, key: e.key.clone(), value: e.value.clone() });
            }
            pool.push(TNode::Collision { hash, entries, adhash });
            pool.len() - 1
        }
    }
}

// ---------------------------------------------------------------------------
// persistent() — rebuild the packed arena from the pool.
// ---------------------------------------------------------------------------

fn build_persistent_node<K, V>(pool: &[TNode<K, V>], idx: usize, store: &mut ChampArena<K, V>) -> Idx<Node<K, V>>
where
    K: Clone,
    V: Clone,
{
    match &pool[idx] {
        TNode::Inner { data_map, node_map, data, children, count, adhash } => {
            let data_start = if data.is_empty() {
                Idx::from_raw(0)
            } else {
                store
                    .alloc_entries(data.iter().map(|e| Entry { hash: e.hash, key: e.key.clone(), value: e.value.clone() }))
                    .expect("non-empty")
            };
            let mut child_out = Vec::with_capacity(children.len());
            for &c in children {
                child_out.push(build_persistent_node(pool, c, store));
            }
            let children_start = if child_out.is_empty() {
                Idx::from_raw(0)
            } else {
                store.alloc_children(child_out).expect("non-empty")
            };
            store.alloc_node(Node::Inner {
                data_map: *data_map,
                node_map: *node_map,
                data_start,
                children_start,
                count: *count,
                adhash: *adhash,
            })
        }
        TNode::Collision { hash, entries, adhash } => {
            let entries_start = store
                .alloc_entries(entries.iter().map(|e| Entry { hash: e.hash, key: e.key.clone(), value: e.value.clone() }))
                .expect("non-empty");
            store.alloc_node(Node::Collision {
                hash: *hash,
                entries_start,
                entries_len: entries.len() as u8,
                adhash: *adhash,
            })
        }
    }
}

// ---------------------------------------------------------------------------
// lookup
// ---------------------------------------------------------------------------

fn tlookup<'a, K: Eq, V>(pool: &'a [TNode<K, V>], idx: usize, hash: u32, key: &K, shift: u32) -> Option<&'a V> {
    match &pool[idx] {
        TNode::Inner { data_map, node_map, data, children, .. } => {
            let bit = node::mask(node::fragment(hash, shift));
            if data_map & bit != 0 {
                let pos = node::index(*data_map, bit);
                let e = &data[pos];
                if e.hash == hash && e.key == *key { Some(&e.value) } else { None }
            } else if node_map & bit != 0 {
                let pos = node::index(*node_map, bit);
                tlookup(pool, children[pos], hash, key, shift + node::BITS_PER_LEVEL)
            } else {
                None
            }
        }
        TNode::Collision { hash: node_hash, entries, .. } => {
            if *node_hash != hash {
                return None;
            }
            entries.iter().find(|e| e.key == *key).map(|e| &e.value)
        }
    }
}

// ---------------------------------------------------------------------------
// assoc — in-place mutation
// ---------------------------------------------------------------------------

fn tassoc_recursive<K, V>(pool: &mut Vec<TNode<K, V>>, idx: usize, entry: Entry<K, V>, shift: u32) -> (Option<V>, u64)
where
    K: Hash + Eq + Clone,
    V: Hash + Clone,
{
    if matches!(pool[idx], TNode::Collision { .. }) {
        return tassoc_collision(pool, idx, entry);
    }

    let frag = node::fragment(entry.hash, shift);
    let bit = node::mask(frag);

    enum Slot {
        Data(usize),
        Child(usize),
        Empty,
    }
    let slot = {
        let TNode::Inner { data_map, node_map, .. } = &pool[idx] else { unreachable!() };
        if data_map & bit != 0 {
            Slot::Data(node::index(*data_map, bit))
        } else if node_map & bit != 0 {
            Slot::Child(node::index(*node_map, bit))
        } else {
            Slot::Empty
        }
    };

    match slot {
        Slot::Data(pos) => {
            let (key_eq, old_contrib) = {
                let TNode::Inner { data, .. } = &pool[idx] else { unreachable!() };
                let e = &data[pos];
                (e.hash == entry.hash && e.key == entry.key, adhash::entry_adhash(e.hash, adhash::hash_one(&e.value)))
            };
            if key_eq {
                let new_contrib = adhash::entry_adhash(entry.hash, adhash::hash_one(&entry.value));
                let delta = new_contrib.wrapping_sub(old_contrib);
                let TNode::Inner { data, adhash, .. } = &mut pool[idx] else { unreachable!() };
                let old_value = std::mem::replace(&mut data[pos].value, entry.value);
                *adhash = adhash.wrapping_add(delta);
                (Some(old_value), delta)
            } else {
                let existing = {
                    let TNode::Inner { data, .. } = &pool[idx] else { unreachable!() };
                    let e = &data[pos];
                    Entry { hash: e.hash, key: e.key.clone(), value: e.value.clone() }
                };
                let new_contrib = adhash::entry_adhash(entry.hash, adhash::hash_one(&entry.value));
                let child_idx = tbuild_subtree(pool, existing, entry, shift + node::BITS_PER_LEVEL);
                let TNode::Inner { data_map, node_map, data, children, count, adhash } = &mut pool[idx] else {
                    unreachable!()
                };
                data.remove(pos);
                *data_map &= !bit;
                *node_map |= bit;
                let child_pos = node::index(*node_map, bit);
                children.insert(child_pos, child_idx);
                *count += 1;
                *adhash = adhash.wrapping_add(new_contrib);
                (None, new_contrib)
            }
        }
        Slot::Child(child_pos) => {
            let child_idx = {
                let TNode::Inner { children, .. } = &pool[idx] else { unreachable!() };
                children[child_pos]
            };
            let (old_value, delta) = tassoc_recursive(pool, child_idx, entry, shift + node::BITS_PER_LEVEL);
            let TNode::Inner { count, adhash, .. } = &mut pool[idx] else { unreachable!() };
            if old_value.is_none() {
                *count += 1;
            }
            *adhash = adhash.wrapping_add(delta);
            (old_value, delta)
        }
        Slot::Empty => {
            let new_contrib = adhash::entry_adhash(entry.hash, adhash::hash_one(&entry.value));
            let TNode::Inner { data_map, data, count, adhash, .. } = &mut pool[idx] else { unreachable!() };
            *data_map |= bit;
            let pos = node::index(*data_map, bit);
            data.insert(pos, entry);
            *count += 1;
            *adhash = adhash.wrapping_add(new_contrib);
            (None, new_contrib)
        }
    }
}

fn tassoc_collision<K, V>(pool: &mut Vec<TNode<K, V>>, idx: usize, entry: Entry<K, V>) -> (Option<V>, u64)
where
    K: Eq + Clone,
    V: Hash + Clone,
{
    let found = {
        let TNode::Collision { entries, .. } = &pool[idx] else { unreachable!() };
        entries.iter().position(|e| e.key == entry.key)
    };

    if let Some(pos) = found {
        let old_contrib = {
            let TNode::Collision { entries, .. } = &pool[idx] else { unreachable!() };
            let e = &entries[pos];
            adhash::entry_adhash(e.hash, adhash::hash_one(&e.value))
        };
        let new_contrib = adhash::entry_adhash(entry.hash, adhash::hash_one(&entry.value));
        let delta = new_contrib.wrapping_sub(old_contrib);
        let TNode::Collision { entries, adhash, .. } = &mut pool[idx] else { unreachable!() };
        let old_value = std::mem::replace(&mut entries[pos].value, entry.value);
        *adhash = adhash.wrapping_add(delta);
        (Some(old_value), delta)
    } else {
        let new_contrib = adhash::entry_adhash(entry.hash, adhash::hash_one(&entry.value));
        let TNode::Collision { entries, adhash, .. } = &mut pool[idx] else { unreachable!() };
        entries.push(entry);
        *adhash = adhash.wrapping_add(new_contrib);
        (None, new_contrib)
    }
}

fn tbuild_subtree<K, V>(pool: &mut Vec<TNode<K, V>>, e1: Entry<K, V>, e2: Entry<K, V>, shift: u32) -> usize
where
    K: Clone,
    V: Hash + Clone,
{
    if shift > node::MAX_SHIFT {
        let hash = e1.hash;
        let c1 = adhash::entry_adhash(e1.hash, adhash::hash_one(&e1.value));
        let c2 = adhash::entry_adhash(e2.hash, adhash::hash_one(&e2.value));
        pool.push(TNode::Collision { hash, entries: vec![e1, e2], adhash: c1.wrapping_add(c2) });
        return pool.len() - 1;
    }

    let f1 = node::fragment(e1.hash, shift);
    let f2 = node::fragment(e2.hash, shift);

    if f1 == f2 {
        let child = tbuild_subtree(pool, e1, e2, shift + node::BITS_PER_LEVEL);
        let (count, adhash) = match &pool[child] {
            TNode::Inner { count, adhash, .. } => (*count, *adhash),
            TNode::Collision { entries, adhash, .. } => (entries.len() as u32, *adhash),
        };
        pool.push(TNode::Inner {
            data_map: 0,
            node_map: node::mask(f1),
            data: Vec::new(),
            children: vec![child],
            count,
            adhash,
        });
        pool.len() - 1
    } else {
        let c1 = adhash::entry_adhash(e1.hash, adhash::hash_one(&e1.value));
        let c2 = adhash::entry_adhash(e2.hash, adhash::hash_one(&e2.value));
        let (first, second) = if f1 < f2 { (e1, e2) } else { (e2, e1) };
        pool.push(TNode::Inner {
            data_map: node::mask(f1) | node::mask(f2),
            node_map: 0,
            data: vec![first, second],
            children: Vec::new(),
            count: 2,
            adhash: c1.wrapping_add(c2),
        });
        pool.len() - 1
    }
}

// ---------------------------------------------------------------------------
// dissoc — in-place mutation with canonical-form collapse
// ---------------------------------------------------------------------------

enum TRemoveOutcome<V> {
    NotFound,
    Removed { empty: bool, removed_value: V, adhash_delta: u64 },
}

fn tdissoc_recursive<K, V>(pool: &mut Vec<TNode<K, V>>, idx: usize, hash: u32, key: &K, shift: u32) -> TRemoveOutcome<V>
where
    K: Hash + Eq + Clone,
    V: Hash + Clone,
{
    if matches!(pool[idx], TNode::Collision { .. }) {
        return tdissoc_collision(pool, idx, hash, key);
    }

    let frag = node::fragment(hash, shift);
    let bit = node::mask(frag);

    enum Slot {
        Data(usize),
        Child(usize),
        Empty,
    }
    let slot = {
        let TNode::Inner { data_map, node_map, .. } = &pool[idx] else { unreachable!() };
        if data_map & bit != 0 {
            Slot::Data(node::index(*data_map, bit))
        } else if node_map & bit != 0 {
            Slot::Child(node::index(*node_map, bit))
        } else {
            Slot::Empty
        }
    };

    match slot {
        Slot::Empty => TRemoveOutcome::NotFound,
        Slot::Data(pos) => {
            let found_info = {
                let TNode::Inner { data, .. } = &pool[idx] else { unreachable!() };
                let e = &data[pos];
                if e.hash == hash && e.key == *key {
                    Some((adhash::entry_adhash(e.hash, adhash::hash_one(&e.value)), e.value.clone()))
                } else {
                    None
                }
            };
            let Some((removed_contrib, removed_value)) = found_info else {
                return TRemoveOutcome::NotFound;
            };
            let TNode::Inner { data_map, node_map, data, count, adhash, .. } = &mut pool[idx] else {
                unreachable!()
            };
            data.remove(pos);
            *data_map &= !bit;
            *count -= 1;
            *adhash = adhash.wrapping_sub(removed_contrib);
            let empty = *data_map == 0 && *node_map == 0;
            TRemoveOutcome::Removed { empty, removed_value, adhash_delta: removed_contrib }
        }
        Slot::Child(child_pos) => {
            let child_idx = {
                let TNode::Inner { children, .. } = &pool[idx] else { unreachable!() };
                children[child_pos]
            };
            let outcome = tdissoc_recursive(pool, child_idx, hash, key, shift + node::BITS_PER_LEVEL);
            match outcome {
                TRemoveOutcome::NotFound => TRemoveOutcome::NotFound,
                TRemoveOutcome::Removed { empty, removed_value, adhash_delta } => {
                    if empty {
                        let TNode::Inner { data_map, node_map, children, count, adhash, .. } = &mut pool[idx] else {
                            unreachable!()
                        };
                        children.remove(child_pos);
                        *node_map &= !bit;
                        *count -= 1;
                        *adhash = adhash.wrapping_sub(adhash_delta);
                        let now_empty = *data_map == 0 && *node_map == 0;
                        TRemoveOutcome::Removed { empty: now_empty, removed_value, adhash_delta }
                    } else {
                        let should_inline = match &pool[child_idx] {
                            TNode::Inner { data_map, node_map, .. } => data_map.is_power_of_two() && *node_map == 0,
                            TNode::Collision { .. } => false,
                        };
                        if should_inline {
                            let inlined = {
                                let TNode::Inner { data, .. } = &pool[child_idx] else { unreachable!() };
                                let e = &data[0];
                                Entry { hash: e.hash, key: e.key.clone(), value: e.value.clone() }
                            };
                            let TNode::Inner { data_map, node_map, data, children, count, adhash } = &mut pool[idx]
                            else {
                                unreachable!()
                            };
                            children.remove(child_pos);
                            *node_map &= !bit;
                            *data_map |= bit;
                            let data_pos = node::index(*data_map, bit);
                            data.insert(data_pos, inlined);
                            *count -= 1;
                            *adhash = adhash.wrapping_sub(adhash_delta);
                            TRemoveOutcome::Removed { empty: false, removed_value, adhash_delta }
                        } else {
                            let TNode::Inner { count, adhash, .. } = &mut pool[idx] else { unreachable!() };
                            *count -= 1;
                            *adhash = adhash.wrapping_sub(adhash_delta);
                            TRemoveOutcome::Removed { empty: false, removed_value, adhash_delta }
                        }
                    }
                }
            }
        }
    }
}

fn tdissoc_collision<K, V>(pool: &mut Vec<TNode<K, V>>, idx: usize, hash: u32, key: &K) -> TRemoveOutcome<V>
where
    K: Eq + Clone,
    V: Hash + Clone,
{
    let pos_info = {
        let TNode::Collision { hash: node_hash, entries, .. } = &pool[idx] else { unreachable!() };
        if *node_hash != hash {
            None
        } else {
            entries.iter().position(|e| e.key == *key).map(|p| {
                let e = &entries[p];
                (p, adhash::entry_adhash(e.hash, adhash::hash_one(&e.value)), e.value.clone())
            })
        }
    };
    let Some((pos, removed_contrib, removed_value)) = pos_info else {
        return TRemoveOutcome::NotFound;
    };

    let remaining_len = match &pool[idx] {
        TNode::Collision { entries, .. } => entries.len() - 1,
        TNode::Inner { .. } => unreachable!(),
    };

    if remaining_len == 1 {
        let remaining = {
            let TNode::Collision { entries, .. } = &pool[idx] else { unreachable!() };
            let other = if pos == 0 { 1 } else { 0 };
            let e = &entries[other];
            Entry { hash: e.hash, key: e.key.clone(), value: e.value.clone() }
        };
        let remaining_contrib = adhash::entry_adhash(remaining.hash, adhash::hash_one(&remaining.value));
        let bit = node::mask(node::fragment(remaining.hash, 0));
        pool[idx] = TNode::Inner {
            data_map: bit,
            node_map: 0,
            data: vec![remaining],
            children: Vec::new(),
            count: 1,
            adhash: remaining_contrib,
        };
        return TRemoveOutcome::Removed { empty: false, removed_value, adhash_delta: removed_contrib };
    }

    let TNode::Collision { entries, adhash, .. } = &mut pool[idx] else { unreachable!() };
    entries.remove(pos);
    *adhash = adhash.wrapping_sub(removed_contrib);
    TRemoveOutcome::Removed { empty: false, removed_value, adhash_delta: removed_contrib }
}
