//! Turning raw text into the sorted, duplicate-counted input a tree is built from.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, trace};

use crate::error::Result;
use crate::{Config, Key};

/// Strictly ascending `(key, occurrences)` pairs, every count at least one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortedCounts {
    entries: Vec<(Key, usize)>,
}

impl SortedCounts {
    /// Validate every word, sort, and collapse duplicates into counts.
    ///
    /// The first invalid word aborts the whole batch.
    pub fn from_words<I, S>(words: I, config: &Config) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut keys = words
            .into_iter()
            .map(|w| Key::new(w.as_ref(), config))
            .collect::<Result<Vec<_>>>()?;
        keys.sort_unstable();
        Ok(Self::from_sorted_keys(keys))
    }

    /// Tokenize text on whitespace. Punctuation hugging a word is stripped
    /// (`"Watson,"` counts as `Watson`); tokens that still are not pure
    /// letters are skipped.
    pub fn from_reader<R: BufRead>(reader: R, config: &Config) -> Result<Self> {
        let mut keys = Vec::new();
        let mut skipped = 0usize;
        for line in reader.lines() {
            let line = line?;
            for token in line.split_whitespace() {
                let word = token.trim_matches(|c: char| !c.is_ascii_alphabetic());
                match Key::new(word, config) {
                    Ok(key) => keys.push(key),
                    Err(err) => {
                        trace!(token, %err, "skipping token");
                        skipped += 1;
                    }
                }
            }
        }
        keys.sort_unstable();
        let counts = Self::from_sorted_keys(keys);
        debug!(distinct = counts.len(), skipped, "tokenized corpus");
        Ok(counts)
    }

    /// Read and prepare the file at `path`; see [`SortedCounts::from_reader`].
    pub fn from_path(path: impl AsRef<Path>, config: &Config) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(BufReader::new(file), config)
    }

    fn from_sorted_keys(keys: Vec<Key>) -> Self {
        let mut entries: Vec<(Key, usize)> = Vec::new();
        for key in keys {
            match entries.last_mut() {
                Some((last, count)) if *last == key => *count += 1,
                _ => entries.push((key, 1)),
            }
        }
        Self { entries }
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no keys at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total occurrences across all keys.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, c)| c).sum()
    }

    /// `(key, count)` pairs in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.entries.iter().map(|(k, c)| (k.as_str(), *c))
    }

    pub(crate) fn into_entries(self) -> Vec<(Key, usize)> {
        self.entries
    }
}
