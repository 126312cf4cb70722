use std::io;

use thiserror::Error;

/// Why a checked [Trie](crate::Trie) operation was not performed.
///
/// None of these leave the tree touched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TrieError {
    #[error("keys must not be empty")]
    InvalidKey,
    #[error("key {0:?} is not stored")]
    KeyNotFound(String),
    #[error("key {0:?} is already stored")]
    DuplicateKey(String),
}

/// A record batch that could not be imported. Any of these rejects the
/// whole batch.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read records: {0}")]
    Io(#[from] io::Error),
    #[error("line {line}: expected `key\\,rank`")]
    MalformedLine { line: usize },
    #[error("line {line}: empty key")]
    EmptyKey { line: usize },
    #[error("line {line}: rank {value:?} is not an integer")]
    InvalidRank { line: usize, value: String },
}
