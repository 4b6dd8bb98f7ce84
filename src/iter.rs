//! Iterator types for CHAMP maps.

use safe_bump::Idx;

use crate::node::{self, Entry, Node};
use crate::store::ChampStore;

/// One level of pending work in the iteration stack: the node being
/// visited and how far through its data/children we've advanced.
struct Frame<K, V> {
    node: Idx<Node<K, V>>,
    data_pos: usize,
    data_len: usize,
    child_pos: usize,
    child_len: usize,
}

/// Lazy, pull-based iterator over references to key-value pairs in a
/// [`ChampMap`](crate::ChampMap).
///
/// Holds a stack of frames rather than collecting eagerly: `next()` does
/// O(1) amortized work per call instead of front-loading a full traversal.
pub struct Iter<'a, K, V, S> {
    store: &'a S,
    stack: Vec<Frame<K, V>>,
    remaining: usize,
}

impl<'a, K, V, S: ChampStore<K, V>> Iter<'a, K, V, S> {
    /// Creates an iterator that walks the subtree rooted at `root`.
    pub fn new(store: &'a S, root: Option<Idx<Node<K, V>>>) -> Self {
        let mut stack = Vec::new();
        let remaining = root.map_or(0, |idx| store.get_node(idx).count() as usize);
        if let Some(idx) = root {
            stack.push(Self::frame_for(store, idx));
        }
        Self { store, stack, remaining }
    }

    fn frame_for(store: &S, node: Idx<Node<K, V>>) -> Frame<K, V> {
        let data_len = store.get_node(node).data_len();
        let child_len = store.get_node(node).children_len();
        Frame { node, data_pos: 0, data_len, child_pos: 0, child_len }
    }
}

impl<'a, K, V, S: ChampStore<K, V>> Iterator for Iter<'a, K, V, S> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let frame = self.stack.last_mut()?;

            if frame.data_pos < frame.data_len {
                let pos = frame.data_pos;
                frame.data_pos += 1;
                let entry: &'a Entry<K, V> = match *self.store.get_node(frame.node) {
                    Node::Inner { data_start, .. } => self.store.get_entry(node::offset(data_start, pos)),
                    Node::Collision { entries_start, .. } => self.store.get_entry(node::offset(entries_start, pos)),
                };
                self.remaining -= 1;
                return Some((&entry.key, &entry.value));
            }

            if frame.child_pos < frame.child_len {
                let pos = frame.child_pos;
                frame.child_pos += 1;
                let Node::Inner { children_start, .. } = *self.store.get_node(frame.node) else {
                    unreachable!("collision nodes have no children")
                };
                let child = *self.store.get_child(node::offset(children_start, pos));
                self.stack.push(Self::frame_for(self.store, child));
                continue;
            }

            self.stack.pop();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V, S: ChampStore<K, V>> ExactSizeIterator for Iter<'_, K, V, S> {
    fn len(&self) -> usize {
        self.remaining
    }
}
