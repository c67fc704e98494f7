//! Lazy, pull-based enumeration.
//!
//! Traversal is depth-first pre-order: a node's own entry comes before any of
//! its children, and children are visited in ascending byte order. That is
//! exactly lexicographic byte order of the keys. State is an explicit stack of
//! child cursors plus one shared path buffer; nothing is computed ahead of the
//! consumer, and dropping an iterator releases all of it.

use std::collections::btree_map;
use std::iter::FusedIterator;

use crate::node::Node;

struct Frame<'a, V> {
    /// Path length at which this node's child bytes are written.
    depth: usize,
    children: btree_map::Iter<'a, u8, Node<V>>,
}

/// Iterator over `(key, &value)` pairs in ascending key order.
pub struct Items<'a, V> {
    /// Starting node, until its own entry has been considered.
    start: Option<&'a Node<V>>,
    stack: Vec<Frame<'a, V>>,
    path: Vec<u8>,
    remaining: usize,
}

impl<'a, V> Items<'a, V> {
    pub(crate) fn new(node: &'a Node<V>, prefix: Vec<u8>) -> Self {
        Self {
            start: Some(node),
            stack: Vec::new(),
            path: prefix,
            remaining: node.len(),
        }
    }

    /// An already exhausted iterator.
    pub(crate) fn empty() -> Self {
        Self {
            start: None,
            stack: Vec::new(),
            path: Vec::new(),
            remaining: 0,
        }
    }

    fn emit(&mut self, value: &'a V) -> Option<(Vec<u8>, &'a V)> {
        self.remaining -= 1;
        Some((self.path.clone(), value))
    }
}

impl<'a, V> Iterator for Items<'a, V> {
    type Item = (Vec<u8>, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(node) = self.start.take() {
            self.stack.push(Frame {
                depth: self.path.len(),
                children: node.children.iter(),
            });
            if let Some(value) = node.value.as_ref() {
                return self.emit(value);
            }
        }

        while let Some(frame) = self.stack.last_mut() {
            let Some((&byte, child)) = frame.children.next() else {
                self.stack.pop();
                continue;
            };

            self.path.truncate(frame.depth);
            self.path.push(byte);
            self.stack.push(Frame {
                depth: self.path.len(),
                children: child.children.iter(),
            });
            if let Some(value) = child.value.as_ref() {
                return self.emit(value);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Items<'_, V> {}

impl<V> FusedIterator for Items<'_, V> {}

/// Iterator over keys in ascending order.
pub struct Keys<'a, V> {
    inner: Items<'a, V>,
}

impl<'a, V> Keys<'a, V> {
    pub(crate) fn new(inner: Items<'a, V>) -> Self {
        Self { inner }
    }
}

impl<V> Iterator for Keys<'_, V> {
    type Item = Vec<u8>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Keys<'_, V> {}

impl<V> FusedIterator for Keys<'_, V> {}

/// Iterator over values in ascending key order.
pub struct Values<'a, V> {
    inner: Items<'a, V>,
}

impl<'a, V> Values<'a, V> {
    pub(crate) fn new(inner: Items<'a, V>) -> Self {
        Self { inner }
    }
}

impl<'a, V> Iterator for Values<'a, V> {
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Values<'_, V> {}

impl<V> FusedIterator for Values<'_, V> {}
