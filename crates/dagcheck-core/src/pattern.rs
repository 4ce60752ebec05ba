//! Glob patterns over paths and node identifiers
//!
//! Shell-style globs backed by [`glob::Pattern`]: `*` and `?` never cross
//! a `/`, `**` as a whole path component matches any number of
//! directories (including none), and `[...]` is a character class.
//! A trailing `**` matches everything below its directory.

use glob::{MatchOptions, Pattern, PatternError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A compiled glob pattern
#[derive(Debug, Clone)]
pub struct GlobPattern {
    raw: String,
    compiled: Pattern,
}

impl GlobPattern {
    /// Compile a glob pattern
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        let compiled = if pattern == "**" || pattern.ends_with("/**") {
            Pattern::new(&format!("{pattern}/*"))?
        } else {
            Pattern::new(pattern)?
        };

        Ok(Self {
            raw: pattern.to_string(),
            compiled,
        })
    }

    /// The pattern as written by the user
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether the pattern contains any wildcard
    pub fn is_literal(&self) -> bool {
        !self.raw.contains(&['*', '?', '['][..])
    }

    /// Check whether `text` matches the whole pattern
    pub fn matches(&self, text: &str) -> bool {
        self.compiled.matches_with(text, MATCH_OPTIONS)
    }
}

impl PartialEq for GlobPattern {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for GlobPattern {}

impl Serialize for GlobPattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for GlobPattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::new(&raw).map_err(serde::de::Error::custom)
    }
}
