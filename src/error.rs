//! Error types returned at the tree's public boundary.

use std::time::Duration;

use thiserror::Error;

/// Result alias used by every fallible tree operation.
pub type Result<T> = std::result::Result<T, TreeError>;

/// Why a candidate key was rejected at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyViolation {
    /// Zero-length input.
    #[error("key is empty")]
    Empty,

    /// A character outside `[A-Za-z]`.
    #[error("character {ch:?} at byte {index} is not in [A-Za-z]")]
    BadChar {
        /// The offending character.
        ch: char,
        /// Byte offset of `ch` in the input.
        index: usize,
    },

    /// Longer than `Config::max_key_len`.
    #[error("key is {len} bytes long, limit is {max}")]
    TooLong {
        /// Length of the input in bytes.
        len: usize,
        /// Configured limit.
        max: usize,
    },
}

/// Which side of the gate a timed acquisition was waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    /// Shared reader access.
    Read,
    /// Exclusive writer access.
    Write,
}

impl std::fmt::Display for AccessMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccessMode::Read => f.write_str("read"),
            AccessMode::Write => f.write_str("write"),
        }
    }
}

/// Errors from tree and corpus operations.
#[derive(Error, Debug)]
pub enum TreeError {
    /// Key contains characters outside the accepted alphabet (or breaks a configured limit).
    #[error("invalid key {key:?}: {reason}")]
    InvalidKey {
        /// The rejected input, as given.
        key: String,
        /// What was wrong with it.
        reason: KeyViolation,
    },

    /// A timed gate acquisition gave up.
    #[error("timed out after {waited:?} waiting for {mode} access")]
    Timeout {
        /// The access that was requested.
        mode: AccessMode,
        /// How long the caller was willing to wait.
        waited: Duration,
    },

    /// I/O error while loading a corpus.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
