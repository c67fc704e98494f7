//! Trie node: one level of the tree, keyed by a single byte.
//!
//! Every operation walks the key by position (`index`) rather than by slicing,
//! one byte per level. `size` counts the values stored strictly below a node,
//! so for every node:
//!
//! ```text
//! size == sum(child.size + child.value.is_some() as usize)
//! ```
//!
//! Deletion prunes a child as soon as it holds neither a value nor children,
//! so a reachable node without a value always has at least one child.
//!
//! Tree depth equals key length, so nothing here recurses per level: walks are
//! loops over the key, and `Drop`/`Clone` use an explicit work list.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use tracing::trace;

use crate::error::{Result, TrieError};
use crate::iter::{Items, Keys, Values};

pub(crate) struct Node<V> {
    /// Children in ascending byte order.
    pub(crate) children: BTreeMap<u8, Node<V>>,
    /// Values stored in the subtree, excluding this node's own slot.
    pub(crate) size: usize,
    pub(crate) value: Option<V>,
}

#[inline]
fn check_index(key: &[u8], index: usize) -> Result<()> {
    if index > key.len() {
        return Err(TrieError::InvalidIndex {
            index,
            len: key.len(),
        });
    }
    Ok(())
}

impl<V> Node<V> {
    /// A bare node for the empty suffix.
    pub(crate) fn new() -> Self {
        Self {
            children: BTreeMap::new(),
            size: 0,
            value: None,
        }
    }

    /// Build the chain of nodes spelling `key[index..]`, with `value` stored at
    /// the end of the chain. Returns the head of the chain.
    pub(crate) fn with_suffix(key: &[u8], index: usize, value: V) -> Result<Self> {
        check_index(key, index)?;
        Ok(Self::chain(&key[index..], value))
    }

    fn chain(suffix: &[u8], value: V) -> Self {
        let mut node = Self {
            children: BTreeMap::new(),
            size: 0,
            value: Some(value),
        };
        for &byte in suffix.iter().rev() {
            let mut parent = Self::new();
            parent.size = node.len();
            parent.children.insert(byte, node);
            node = parent;
        }
        node
    }

    /// Number of values in this node's slot and below.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.size + usize::from(self.value.is_some())
    }

    #[inline]
    fn is_vacant(&self) -> bool {
        self.size == 0 && self.value.is_none()
    }

    /// Store `value` under `key[index..]` relative to this node.
    ///
    /// Returns the value previously stored for the key; `None` means the key
    /// is new, in which case every node on the path has grown by one.
    pub(crate) fn put(&mut self, key: &[u8], value: V, index: usize) -> Result<Option<V>> {
        check_index(key, index)?;
        Ok(self.put_unchecked(key, value, index))
    }

    fn put_unchecked(&mut self, key: &[u8], value: V, index: usize) -> Option<V> {
        let is_new = self
            .get_node(key, index)
            .map_or(true, |node| node.value.is_none());

        let mut node = self;
        for (at, &byte) in key.iter().enumerate().skip(index) {
            if is_new {
                node.size += 1;
            }
            match node.children.entry(byte) {
                Entry::Occupied(child) => node = child.into_mut(),
                Entry::Vacant(slot) => {
                    slot.insert(Self::chain(&key[at + 1..], value));
                    return None;
                }
            }
        }
        node.value.replace(value)
    }

    /// The node at the end of `key[index..]`, if that path exists.
    pub(crate) fn get_node(&self, key: &[u8], index: usize) -> Option<&Self> {
        let mut node = self;
        for byte in key.get(index..)? {
            node = node.children.get(byte)?;
        }
        Some(node)
    }

    pub(crate) fn get_node_mut(&mut self, key: &[u8], index: usize) -> Option<&mut Self> {
        let mut node = self;
        for byte in key.get(index..)? {
            node = node.children.get_mut(byte)?;
        }
        Some(node)
    }

    /// Whether a path for `key` exists, whether or not a value ends there.
    pub(crate) fn contains(&self, key: &[u8]) -> bool {
        self.get_node(key, 0).is_some()
    }

    pub(crate) fn get(&self, key: &[u8]) -> Option<&V> {
        self.get_node(key, 0)?.value.as_ref()
    }

    pub(crate) fn get_mut(&mut self, key: &[u8]) -> Option<&mut V> {
        self.get_node_mut(key, 0)?.value.as_mut()
    }

    /// Remove the value stored under `key[index..]`.
    ///
    /// Returns the removed value and whether this node is now vacant (no value,
    /// nothing below it), in which case the caller drops the edge leading here.
    pub(crate) fn delete(&mut self, key: &[u8], index: usize) -> (Option<V>, bool) {
        let Some(path) = key.get(index..) else {
            return (None, false);
        };

        // Locate the terminus and the edge to cut: once the value is gone,
        // everything below the last node on the path that keeps a value or a
        // second child is an empty chain.
        let mut cut = None;
        let mut node = &*self;
        for (at, byte) in path.iter().enumerate() {
            if cut.is_none() || node.value.is_some() || node.children.len() > 1 {
                cut = Some(at);
            }
            match node.children.get(byte) {
                Some(child) => node = child,
                None => return (None, false),
            }
        }
        if node.value.is_none() {
            return (None, path.is_empty() && self.is_vacant());
        }
        if !node.children.is_empty() {
            cut = None;
        }

        let mut node = &mut *self;
        for byte in path {
            node.size -= 1;
            match node.children.get_mut(byte) {
                Some(child) => node = child,
                None => return (None, false),
            }
        }
        let removed = node.value.take();

        if let Some(at) = cut {
            let parent = match self.get_node_mut(&path[..at], 0) {
                Some(parent) => parent,
                None => return (removed, self.is_vacant()),
            };
            parent.children.remove(&path[at]);
            trace!(depth = index + at, byte = path[at], "pruned empty branch");
        }
        (removed, self.is_vacant())
    }

    /// Length of the longest stored key that is a prefix of `key`, looking
    /// only at positions `index..`. A deeper match always beats a shallower one.
    pub(crate) fn longest_prefix_of(&self, key: &[u8], index: usize) -> Option<usize> {
        let path = key.get(index..)?;
        let mut best = None;
        let mut node = self;
        let mut at = index;
        loop {
            if node.value.is_some() {
                best = Some(at);
            }
            match path.get(at - index).and_then(|byte| node.children.get(byte)) {
                Some(child) => {
                    node = child;
                    at += 1;
                }
                None => return best,
            }
        }
    }

    /// Entries at and below this node, with `prefix` as the path leading here.
    pub(crate) fn items(&self, prefix: &[u8]) -> Items<'_, V> {
        Items::new(self, prefix.to_vec())
    }

    pub(crate) fn keys(&self, prefix: &[u8]) -> Keys<'_, V> {
        Keys::new(self.items(prefix))
    }

    pub(crate) fn values(&self) -> Values<'_, V> {
        Values::new(self.items(&[]))
    }
}

impl<V> Default for Node<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Drop for Node<V> {
    fn drop(&mut self) {
        let mut pending: Vec<Node<V>> = std::mem::take(&mut self.children).into_values().collect();
        while let Some(mut node) = pending.pop() {
            pending.extend(std::mem::take(&mut node.children).into_values());
        }
    }
}

impl<V: Clone> Clone for Node<V> {
    fn clone(&self) -> Self {
        let mut copy = Self::new();
        for (key, value) in self.items(&[]) {
            copy.put_unchecked(&key, value.clone(), 0);
        }
        copy
    }
}
