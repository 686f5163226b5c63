//! Validated tree keys.
//!
//! A key is a non-empty run of ASCII letters. Comparison is byte-wise and
//! case-sensitive, so `"HOLMES" < "Watson" < "afraid"`.

use std::borrow::Borrow;
use std::fmt;

use crate::error::{KeyViolation, Result, TreeError};
use crate::Config;

/// A string that passed boundary validation and may enter the tree.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Key(String);

impl Key {
    /// Validate `raw` against `config` and wrap it.
    pub fn new(raw: &str, config: &Config) -> Result<Self> {
        check(raw, config.max_key_len).map_err(|reason| TreeError::InvalidKey {
            key: raw.to_owned(),
            reason,
        })?;
        Ok(Key(raw.to_owned()))
    }

    /// Borrow the validated text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Unwrap into the owned text.
    pub fn into_string(self) -> String {
        self.0
    }
}

fn check(raw: &str, max_len: Option<usize>) -> std::result::Result<(), KeyViolation> {
    if raw.is_empty() {
        return Err(KeyViolation::Empty);
    }
    if let Some((index, ch)) = raw.char_indices().find(|(_, c)| !c.is_ascii_alphabetic()) {
        return Err(KeyViolation::BadChar { ch, index });
    }
    match max_len {
        Some(max) if raw.len() > max => Err(KeyViolation::TooLong {
            len: raw.len(),
            max,
        }),
        _ => Ok(()),
    }
}

impl TryFrom<&str> for Key {
    type Error = TreeError;

    fn try_from(raw: &str) -> Result<Self> {
        Key::new(raw, &Config::default())
    }
}

impl AsRef<str> for Key {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
