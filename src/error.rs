//! Error types for the byte-trie crate

use thiserror::Error;

/// Result type alias using `TrieError`
pub type Result<T> = std::result::Result<T, TrieError>;

/// Errors returned by trie operations
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrieError {
    /// The key is empty where a non-empty key is required
    #[error("key must not be empty")]
    EmptyKey,

    /// A byte index outside `[0, len]` reached node-level recursion
    #[error("key index {index} out of bounds for key of length {len}")]
    InvalidIndex { index: usize, len: usize },
}
