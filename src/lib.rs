//! # shareable-tree
//!
//! A word index that many threads can share: a binary search tree over
//! case-sensitive ASCII words where each distinct word is one node carrying an
//! occurrence count.
//!
//! Reads (`search`, `count`, `height`, `dump`, ...) run concurrently with each
//! other; writes (`insert`, `delete`, `rebalance`) run alone. Access goes
//! through a first-reader/last-reader gate, so a steady stream of readers can
//! hold writers off indefinitely.
//!
//! ## Example
//!
//! ```rust
//! use shareable_tree::ShareableTree;
//!
//! let tree = ShareableTree::from_words(["Alice", "Alice", "Bob"]).unwrap();
//! assert_eq!(tree.count("Alice").unwrap(), Some(2));
//! assert_eq!(tree.dump(), ">Alice,Bob");
//!
//! tree.insert("Carol").unwrap();
//! assert!(tree.delete("Bob").unwrap());
//! assert_eq!(tree.search("Bob").unwrap(), None);
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod corpus;
pub mod error;
pub mod gate;
pub mod key;
mod node;
pub mod snapshot;

pub use corpus::SortedCounts;
pub use error::{AccessMode, KeyViolation, Result, TreeError};
pub use gate::Gate;
pub use key::Key;
pub use snapshot::{Edge, NodeInfo, Side, TreeSnapshot};

use std::time::Duration;

use tracing::{debug, trace, warn};

use node::{Link, Removal};

/// Configuration for a [`ShareableTree`].
#[derive(Debug, Clone)]
pub struct Config {
    /// Longest key accepted, in bytes. `None` means unbounded.
    pub max_key_len: Option<usize>,
    /// Printed before the first key by [`ShareableTree::dump`].
    pub dump_prefix: String,
    /// Printed between keys by [`ShareableTree::dump`].
    pub dump_separator: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_key_len: None,
            dump_prefix: ">".to_owned(),
            dump_separator: ",".to_owned(),
        }
    }
}

impl Config {
    /// Reject keys longer than `max` bytes.
    pub fn with_max_key_len(mut self, max: usize) -> Self {
        self.max_key_len = Some(max);
        self
    }

    /// Replace the leading marker of [`ShareableTree::dump`].
    pub fn with_dump_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.dump_prefix = prefix.into();
        self
    }

    /// Replace the text placed between keys by [`ShareableTree::dump`].
    pub fn with_dump_separator(mut self, separator: impl Into<String>) -> Self {
        self.dump_separator = separator.into();
        self
    }
}

/// A multiset of words in a binary search tree, safe to share between threads
/// (wrap it in an `Arc`).
///
/// Every method validates its key before touching the gate, so an
/// [`TreeError::InvalidKey`] never costs a lock. Nothing borrowed from the tree
/// escapes a method; results are owned copies.
pub struct ShareableTree {
    root: Gate<Link<Key>>,
    config: Config,
}

impl ShareableTree {
    /// Create an empty tree with default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create an empty tree that validates and dumps according to `config`.
    pub fn with_config(config: Config) -> Self {
        Self {
            root: Gate::new(None),
            config,
        }
    }

    /// Build a minimal-height tree from prepared counts.
    pub fn from_counts(counts: SortedCounts) -> Self {
        Self::from_counts_with_config(counts, Config::default())
    }

    /// [`ShareableTree::from_counts`] with a non-default configuration.
    pub fn from_counts_with_config(counts: SortedCounts, config: Config) -> Self {
        let n = counts.len();
        let root = node::from_sorted(counts.into_entries());
        debug!(nodes = n, height = node::height(&root), "built tree");
        Self {
            root: Gate::new(root),
            config,
        }
    }

    /// Validate, count and build from an unsorted list of words.
    pub fn from_words<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let config = Config::default();
        let counts = SortedCounts::from_words(words, &config)?;
        Ok(Self::from_counts_with_config(counts, config))
    }

    /// The configuration keys are validated against.
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn key(&self, raw: &str) -> Result<Key> {
        Key::new(raw, &self.config)
    }

    /// Returns the stored key when present.
    pub fn search(&self, key: &str) -> Result<Option<String>> {
        let key = self.key(key)?;
        let root = self.root.read();
        Ok(node::search(&root, key.as_str()).map(|n| n.key.to_string()))
    }

    /// Like [`ShareableTree::search`] but gives up waiting for the gate after `timeout`.
    pub fn try_search_for(&self, key: &str, timeout: Duration) -> Result<Option<String>> {
        let key = self.key(key)?;
        let Some(root) = self.root.try_read_for(timeout) else {
            warn!(?timeout, "read access timed out");
            return Err(TreeError::Timeout {
                mode: AccessMode::Read,
                waited: timeout,
            });
        };
        Ok(node::search(&root, key.as_str()).map(|n| n.key.to_string()))
    }

    /// Occurrences of `key`, `None` if absent.
    pub fn count(&self, key: &str) -> Result<Option<usize>> {
        let key = self.key(key)?;
        let root = self.root.read();
        Ok(node::search(&root, key.as_str()).map(|n| n.count))
    }

    /// Whether `key` has at least one occurrence.
    pub fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.count(key)?.is_some())
    }

    /// Add one occurrence of `key`.
    pub fn insert(&self, key: &str) -> Result<()> {
        let key = self.key(key)?;
        let mut root = self.root.write();
        self.insert_locked(&mut root, key);
        Ok(())
    }

    /// Like [`ShareableTree::insert`] but gives up waiting for the gate after `timeout`.
    pub fn try_insert_for(&self, key: &str, timeout: Duration) -> Result<()> {
        let key = self.key(key)?;
        let Some(mut root) = self.root.try_write_for(timeout) else {
            warn!(?timeout, "write access timed out");
            return Err(TreeError::Timeout {
                mode: AccessMode::Write,
                waited: timeout,
            });
        };
        self.insert_locked(&mut root, key);
        Ok(())
    }

    fn insert_locked(&self, root: &mut Link<Key>, key: Key) {
        if node::insert(root, key.clone()) {
            debug!(%key, "created node");
        } else {
            trace!(%key, "incremented count");
        }
    }

    /// Remove one occurrence of `key`. Returns whether the key was present.
    pub fn delete(&self, key: &str) -> Result<bool> {
        let key = self.key(key)?;
        let mut root = self.root.write();
        let removal = node::remove(&mut *root, key.as_str());
        drop(root);
        match removal {
            Removal::Removed => debug!(%key, "removed node"),
            Removal::Decremented => trace!(%key, "decremented count"),
            Removal::Absent => trace!(%key, "delete of absent key"),
        }
        Ok(removal.found())
    }

    /// Edges on the longest root-to-leaf path; `-1` when empty.
    pub fn height(&self) -> isize {
        node::height(&self.root.read())
    }

    /// Rebuild as a minimal-height tree with the same keys and counts.
    pub fn rebalance(&self) {
        let mut root = self.root.write();
        let before = node::height(&root);
        let nodes = node::into_in_order(root.take());
        let n = nodes.len();
        *root = node::build_balanced(nodes);
        let after = node::height(&root);
        debug_assert_eq!(after, node::min_height(n));
        debug!(nodes = n, before, after, "rebalanced");
    }

    /// Keys in ascending order on one line, e.g. `>HOLMES,SHERLOCK,Watson,afraid`.
    pub fn dump(&self) -> String {
        let keys = self.keys();
        let mut out = self.config.dump_prefix.clone();
        out.push_str(&keys.join(&self.config.dump_separator));
        out
    }

    /// Distinct keys in ascending order.
    pub fn keys(&self) -> Vec<String> {
        let root = self.root.read();
        node::in_order(&root)
            .into_iter()
            .map(|n| n.key.to_string())
            .collect()
    }

    /// `(key, count)` pairs in ascending key order.
    pub fn entries(&self) -> Vec<(String, usize)> {
        let root = self.root.read();
        node::in_order(&root)
            .into_iter()
            .map(|n| (n.key.to_string(), n.count))
            .collect()
    }

    /// Number of distinct keys (nodes).
    pub fn len(&self) -> usize {
        node::len(&self.root.read())
    }

    /// Whether the tree holds no keys.
    pub fn is_empty(&self) -> bool {
        self.root.read().is_none()
    }

    /// Copy of the current shape for visualization.
    pub fn snapshot(&self) -> TreeSnapshot {
        TreeSnapshot::capture(&self.root.read())
    }
}

impl Default for ShareableTree {
    fn default() -> Self {
        Self::new()
    }
}



#[cfg(test)]
mod proptests;
