//! # Pattern Rules
//!
//! Fallback routing for pages that are not listed one by one, such as
//! numbered test pages under a hub. Rules are checked in the order they were
//! declared and the first hit wins, so narrow rules must come before broad ones:
//!
//! ```text
//! 0: contains "/academic-tests/test"  → "/initials/academic-tests.html"
//! 1: prefix   "/initials/"            → "/initials.html"
//! ```
//!
//! `/initials/academic-tests/test7/test7.html` satisfies both; rule 0 wins.

use serde::{Deserialize, Serialize};

/// A substring test on the normalized path.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    Contains(String),
    Prefix(String),
    Suffix(String),
}

impl Predicate {
    pub fn matches(&self, path: &str) -> bool {
        match self {
            Predicate::Contains(needle) => path.contains(needle.as_str()),
            Predicate::Prefix(needle) => path.starts_with(needle.as_str()),
            Predicate::Suffix(needle) => path.ends_with(needle.as_str()),
        }
    }

    pub(crate) fn needle(&self) -> &str {
        match self {
            Predicate::Contains(n) | Predicate::Prefix(n) | Predicate::Suffix(n) => n,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternRule {
    pub predicate: Predicate,
    pub target: String,
}

impl PatternRule {
    pub fn contains(needle: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            predicate: Predicate::Contains(needle.into()),
            target: target.into(),
        }
    }

    pub fn prefix(needle: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            predicate: Predicate::Prefix(needle.into()),
            target: target.into(),
        }
    }

    pub fn suffix(needle: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            predicate: Predicate::Suffix(needle.into()),
            target: target.into(),
        }
    }
}

/// Returns the index and rule of the first rule matching `path`.
pub fn first_match<'a>(rules: &'a [PatternRule], path: &str) -> Option<(usize, &'a PatternRule)> {
    rules
        .iter()
        .enumerate()
        .find(|(_, rule)| rule.predicate.matches(path))
}
