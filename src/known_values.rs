//! Enumerated-token extensions.
//!
//! Kinds whose value is a set of tokens from a fixed vocabulary implement
//! [`KnownValues`]. Their values are stored as a [`TokenSet`], which keeps
//! insertion order for rendering but compares as a set.

use core::fmt;
use core::hash::{Hash, Hasher};

use serde_json::Value as JsonValue;

use crate::codec::split_tokens;
use crate::config;
use crate::errors::{Error, Result};
use crate::extension::{Extension, Kind};

/// Kind whose value is a set of tokens from [`KnownValues::KNOWN_VALUES`].
pub trait KnownValues: Kind<Value = TokenSet> {
    /// Every token the kind accepts.
    const KNOWN_VALUES: &'static [&'static str];

    /// Look up a token in the vocabulary.
    fn known(token: &str) -> Option<&'static str> {
        Self::KNOWN_VALUES.iter().copied().find(|known| *known == token)
    }

    /// Build a token set, reporting every unknown token at once.
    fn tokens<'a, I>(tokens: I) -> Result<TokenSet>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut set = TokenSet::new();
        let mut unknown = Vec::new();

        for token in tokens {
            match Self::known(token) {
                Some(known) => {
                    set.insert(known);
                }
                None => unknown.push(token),
            }
        }

        if unknown.is_empty() {
            Ok(set)
        } else {
            Err(Error::unknown_values(unknown))
        }
    }
}

/// Set of vocabulary tokens.
///
/// Iteration yields tokens in insertion order; equality and hashing ignore order.
#[derive(Clone, Debug, Default)]
pub struct TokenSet(Vec<&'static str>);

impl TokenSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Add a token. Returns `false` if it was already present.
    pub fn insert(&mut self, token: &'static str) -> bool {
        if self.contains(token) {
            false
        } else {
            self.0.push(token);
            true
        }
    }

    /// Remove a token. Returns `false` if it was not present.
    pub fn remove(&mut self, token: &str) -> bool {
        let len = self.0.len();
        self.0.retain(|t| *t != token);
        self.0.len() != len
    }

    /// Is `token` in the set?
    pub fn contains(&self, token: &str) -> bool {
        self.0.iter().any(|t| *t == token)
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Is the set empty?
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Remove every token.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().copied()
    }

    /// Tokens in ascending order.
    pub fn sorted(&self) -> Vec<&'static str> {
        let mut tokens = self.0.clone();
        tokens.sort_unstable();
        tokens
    }
}

impl PartialEq for TokenSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|t| other.contains(t))
    }
}

impl Eq for TokenSet {}

impl Hash for TokenSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sorted().hash(state);
    }
}

impl FromIterator<&'static str> for TokenSet {
    fn from_iter<I: IntoIterator<Item = &'static str>>(iter: I) -> Self {
        let mut set = Self::new();
        for token in iter {
            set.insert(token);
        }
        set
    }
}

impl<'a> IntoIterator for &'a TokenSet {
    type Item = &'static str;
    type IntoIter = core::iter::Copied<core::slice::Iter<'a, &'static str>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter().copied()
    }
}

/// Parse a comma-separated token list.
pub(crate) fn parse_str<K: KnownValues>(value: &str) -> Result<TokenSet> {
    K::tokens(split_tokens(value))
}

/// Parse a JSON token list, or a single comma-separated string.
pub(crate) fn parse_value<K: KnownValues>(value: &JsonValue) -> Result<TokenSet> {
    match value {
        JsonValue::String(s) => parse_str::<K>(s),
        other => K::tokens(config::string_list(other)?),
    }
}

pub(crate) fn serialize_value(value: &TokenSet) -> JsonValue {
    JsonValue::Array(value.iter().map(JsonValue::from).collect())
}

pub(crate) fn fmt_value(value: &TokenSet, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&value.0.join(","))
}

pub(crate) fn fmt_repr(value: &TokenSet, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_list().entries(value.sorted()).finish()
}

/// One `* token` line per token, in stored order.
pub(crate) fn as_text(value: &TokenSet) -> String {
    value
        .iter()
        .map(|token| format!("* {token}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Set operations on enumerated-token extensions.
///
/// Every mutation re-applies the kind's normalization, so implied tokens
/// stay present.
pub trait EnumeratedValueOps {
    /// Number of tokens.
    fn len(&self) -> usize;

    /// Is `token` set?
    fn contains(&self, token: &str) -> bool;

    /// Iterate over tokens in stored order.
    fn tokens(&self) -> &TokenSet;

    /// Add a token from the vocabulary.
    fn add(&mut self, token: &str) -> Result<()>;

    /// Add several tokens. Nothing is added if any token is unknown.
    fn update<'a, I>(&mut self, tokens: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a str>;

    /// Remove a token if present.
    fn discard(&mut self, token: &str);

    /// Remove every token.
    fn clear(&mut self);
}

impl<K: KnownValues> EnumeratedValueOps for Extension<K> {
    fn len(&self) -> usize {
        self.value().len()
    }

    fn contains(&self, token: &str) -> bool {
        self.value().contains(token)
    }

    fn tokens(&self) -> &TokenSet {
        self.value()
    }

    fn add(&mut self, token: &str) -> Result<()> {
        self.update([token])
    }

    fn update<'a, I>(&mut self, tokens: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let tokens = K::tokens(tokens)?;
        let value = self.value_mut();
        for token in &tokens {
            value.insert(token);
        }
        self.renormalize();
        Ok(())
    }

    fn discard(&mut self, token: &str) {
        self.value_mut().remove(token);
        self.renormalize();
    }

    fn clear(&mut self) {
        self.value_mut().clear();
    }
}
