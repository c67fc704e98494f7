//! # byte-trie
//!
//! A trie (prefix tree) mapping byte-string keys to arbitrary values.
//!
//! Keys are raw byte sequences: each level of the tree branches on one 8-bit
//! unit, so `&str`, `String`, `&[u8]` and `Vec<u8>` are all accepted and
//! compared by their encoded bytes. Besides point operations the trie answers
//! prefix queries (does any key start with this? which stored key is the
//! longest prefix of this string?) and enumerates keys lazily in ascending
//! byte order.
//!
//! ## Example
//!
//! ```rust
//! use byte_trie::Trie;
//!
//! let mut trie: Trie<u64> = Trie::new();
//! trie.put("www.test.com", 1).unwrap();
//! trie.put("www.example.com", 2).unwrap();
//! trie.put("www", 3).unwrap();
//!
//! assert_eq!(trie.get("www.test.com").unwrap(), Some(&1));
//! assert_eq!(trie.longest_prefix_of("www.other.org").unwrap(), b"www");
//!
//! let keys: Vec<Vec<u8>> = trie.keys_with_prefix("www.").collect();
//! assert_eq!(keys, vec![b"www.example.com".to_vec(), b"www.test.com".to_vec()]);
//! ```
//!
//! The trie has no internal synchronization. Wrap it in a lock to share it
//! between threads; mutating it while an iterator is alive is rejected by the
//! borrow checker.

mod error;
mod iter;
mod node;

pub use error::{Result, TrieError};
pub use iter::{Items, Keys, Values};

use tracing::{debug, trace};

use node::Node;

#[inline]
fn non_empty(key: &[u8]) -> Result<&[u8]> {
    if key.is_empty() {
        debug!("rejected empty key");
        return Err(TrieError::EmptyKey);
    }
    Ok(key)
}

/// Byte-oriented trie map.
///
/// Every operation that names a single key rejects the empty key with
/// [`TrieError::EmptyKey`] before touching the tree. Values of any type are
/// accepted, including `Option<T>` payloads.
#[derive(Clone)]
pub struct Trie<V> {
    root: Node<V>,
}

impl<V> Trie<V> {
    pub fn new() -> Self {
        Self { root: Node::new() }
    }

    /// Store `value` under `key`.
    ///
    /// Returns the value previously stored for `key`, or `None` if the key is
    /// new.
    pub fn put(&mut self, key: impl AsRef<[u8]>, value: V) -> Result<Option<V>> {
        let key = non_empty(key.as_ref())?;
        let previous = self.root.put(key, value, 0)?;
        if previous.is_none() {
            trace!(key_len = key.len(), len = self.len(), "inserted new key");
        }
        Ok(previous)
    }

    pub fn get(&self, key: impl AsRef<[u8]>) -> Result<Option<&V>> {
        let key = non_empty(key.as_ref())?;
        Ok(self.root.get(key))
    }

    pub fn get_mut(&mut self, key: impl AsRef<[u8]>) -> Result<Option<&mut V>> {
        let key = non_empty(key.as_ref())?;
        Ok(self.root.get_mut(key))
    }

    /// Remove `key`, returning its value. Branches left without values are
    /// released immediately.
    pub fn remove(&mut self, key: impl AsRef<[u8]>) -> Result<Option<V>> {
        let key = non_empty(key.as_ref())?;
        let (removed, _) = self.root.delete(key, 0);
        Ok(removed)
    }

    /// Remove `key`, reporting whether it was present.
    pub fn delete(&mut self, key: impl AsRef<[u8]>) -> Result<bool> {
        Ok(self.remove(key)?.is_some())
    }

    /// Whether any stored key starts with `key` (including `key` itself).
    ///
    /// Use [`Trie::contains_key`] for exact membership.
    pub fn contains(&self, key: impl AsRef<[u8]>) -> Result<bool> {
        let key = non_empty(key.as_ref())?;
        Ok(self.root.contains(key))
    }

    pub fn contains_key(&self, key: impl AsRef<[u8]>) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Number of stored keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.root.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.root = Node::new();
    }

    /// The longest stored key that is a prefix of `key`, as a sub-slice of
    /// `key`. Empty if no stored key is a prefix.
    pub fn longest_prefix_of<'k, K>(&self, key: &'k K) -> Result<&'k [u8]>
    where
        K: AsRef<[u8]> + ?Sized,
    {
        let key = non_empty(key.as_ref())?;
        let len = self.root.longest_prefix_of(key, 0).unwrap_or(0);
        Ok(&key[..len])
    }

    /// All keys in ascending byte order.
    pub fn keys(&self) -> Keys<'_, V> {
        self.root.keys(&[])
    }

    /// Keys starting with `prefix`, in ascending byte order. An empty prefix
    /// matches every key.
    pub fn keys_with_prefix(&self, prefix: impl AsRef<[u8]>) -> Keys<'_, V> {
        Keys::new(self.items_with_prefix(prefix))
    }

    /// All `(key, value)` pairs in ascending key order.
    pub fn items(&self) -> Items<'_, V> {
        self.root.items(&[])
    }

    pub fn items_with_prefix(&self, prefix: impl AsRef<[u8]>) -> Items<'_, V> {
        let prefix = prefix.as_ref();
        match self.root.get_node(prefix, 0) {
            Some(node) => node.items(prefix),
            None => Items::empty(),
        }
    }

    /// All values in ascending key order.
    pub fn values(&self) -> Values<'_, V> {
        self.root.values()
    }

    #[inline]
    pub fn iter(&self) -> Items<'_, V> {
        self.items()
    }
}

impl<V> Default for Trie<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: std::fmt::Debug> std::fmt::Debug for Trie<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(
                self.items()
                    .map(|(key, value)| (key.escape_ascii().to_string(), value)),
            )
            .finish()
    }
}

impl<'a, V> IntoIterator for &'a Trie<V> {
    type Item = (Vec<u8>, &'a V);
    type IntoIter = Items<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.items()
    }
}


#[cfg(test)]
mod proptests;
