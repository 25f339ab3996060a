//! # Site Map
//!
//! The static page hierarchy the back button walks up through.
//!
//! ```text
//! "/index.html"                             Terminal
//! "/initials.html"                  ──────▶ "/index.html"
//! "/initials/academic-tests.html"   ──────▶ "/initials.html"
//! "/initials/academic-tests/test-engine.html" ▶ "/initials/academic-tests.html"
//! ```
//!
//! Built once at startup and never mutated. Every parent chain must end at a
//! terminal node; anything else is rejected here with a `ConfigurationError`
//! so the resolver itself never has to fail.

use log::debug;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// A single page in the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteNode {
    /// Back goes to this path.
    Parent(String),
    /// Application root: back means exit.
    Terminal,
}

/// Errors found while building a site map or resolver. These are config
/// defects and should stop startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A page names a parent that is not itself in the map.
    UnknownParent { path: String, parent: String },
    /// Following parents from `path` never reaches a terminal node.
    Cycle { path: String },
    /// The map contains no terminal node at all.
    NoTerminal,
    /// The default landing page is not in the map.
    UnknownRoot { root: String },
    /// A pattern rule sends users to a page that is not in the map.
    UnknownPatternTarget { index: usize, target: String },
    /// A pattern rule with an empty needle would match every path.
    EmptyPattern { index: usize },
    /// A page entry must set exactly one of `parent` / `terminal = true`.
    AmbiguousNode { path: String },
    /// A pattern entry must set exactly one of `contains` / `prefix` / `suffix`.
    AmbiguousPattern { index: usize },
    /// The same path is declared twice.
    DuplicatePath { path: String },
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::UnknownParent { path, parent } => {
                write!(f, "page {path} has unknown parent {parent}")
            }
            ConfigurationError::Cycle { path } => {
                write!(f, "parent chain starting at {path} never reaches a terminal page")
            }
            ConfigurationError::NoTerminal => write!(f, "site map has no terminal page"),
            ConfigurationError::UnknownRoot { root } => {
                write!(f, "root path {root} is not in the site map")
            }
            ConfigurationError::UnknownPatternTarget { index, target } => {
                write!(f, "pattern #{index} targets unknown page {target}")
            }
            ConfigurationError::EmptyPattern { index } => {
                write!(f, "pattern #{index} has an empty match string")
            }
            ConfigurationError::AmbiguousNode { path } => {
                write!(f, "page {path} must set exactly one of `parent` or `terminal = true`")
            }
            ConfigurationError::AmbiguousPattern { index } => {
                write!(f, "pattern #{index} must set exactly one of `contains`, `prefix` or `suffix`")
            }
            ConfigurationError::DuplicatePath { path } => {
                write!(f, "page {path} is declared more than once")
            }
        }
    }
}

impl std::error::Error for ConfigurationError {}

/// Path → node lookup table. Read-only after construction.
#[derive(Debug, Clone)]
pub struct NavigationMap {
    nodes: BTreeMap<String, SiteNode>,
}

impl NavigationMap {
    /// Builds and validates a map from `(path, node)` pairs.
    ///
    /// Fails on duplicate paths, dangling parent pointers, cycles, and maps
    /// without any terminal node.
    pub fn new<I, P>(entries: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = (P, SiteNode)>,
        P: Into<String>,
    {
        let mut nodes = BTreeMap::new();
        for (path, node) in entries {
            let path = path.into();
            if nodes.contains_key(&path) {
                return Err(ConfigurationError::DuplicatePath { path });
            }
            nodes.insert(path, node);
        }

        let map = Self { nodes };
        map.validate()?;
        debug!("Site map validated: {} pages", map.len());
        Ok(map)
    }

    fn validate(&self) -> Result<(), ConfigurationError> {
        if !self.nodes.values().any(|n| *n == SiteNode::Terminal) {
            return Err(ConfigurationError::NoTerminal);
        }

        for (path, node) in &self.nodes {
            if let SiteNode::Parent(parent) = node
                && !self.nodes.contains_key(parent)
            {
                return Err(ConfigurationError::UnknownParent {
                    path: path.clone(),
                    parent: parent.clone(),
                });
            }
        }

        // Any chain longer than the map itself must revisit a node.
        let max_hops = self.nodes.len();
        for start in self.nodes.keys() {
            let mut current = start;
            let mut hops = 0;
            while let Some(SiteNode::Parent(parent)) = self.nodes.get(current) {
                hops += 1;
                if hops > max_hops {
                    return Err(ConfigurationError::Cycle { path: start.clone() });
                }
                current = parent;
            }
        }
        Ok(())
    }

    pub fn get(&self, path: &str) -> Option<&SiteNode> {
        self.nodes.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.nodes.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Pages in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SiteNode)> {
        self.nodes.iter().map(|(p, n)| (p.as_str(), n))
    }

    /// Paths of all terminal pages.
    pub fn terminals(&self) -> HashSet<&str> {
        self.iter()
            .filter(|(_, n)| **n == SiteNode::Terminal)
            .map(|(p, _)| p)
            .collect()
    }

    /// Number of back presses from `path` to a terminal page, if `path` is known.
    pub fn depth(&self, path: &str) -> Option<usize> {
        let mut current = path;
        let mut hops = 0;
        loop {
            match self.nodes.get(current)? {
                SiteNode::Terminal => return Some(hops),
                SiteNode::Parent(parent) => {
                    hops += 1;
                    current = parent;
                }
            }
        }
    }
}

/// Reduces a raw location to its routing key.
///
/// Drops any `scheme://authority` prefix, the query string and the fragment,
/// then trims whitespace. `"https://app.local/a.html?x=1#top"` → `"/a.html"`.
pub fn normalize_path(raw: &str) -> String {
    let mut path = raw.trim();

    // Query and fragment go first so a URL inside them is never read as a scheme.
    if let Some(cut) = path.find(['?', '#']) {
        path = &path[..cut];
    }

    if let Some(scheme_end) = path.find("://") {
        let after = &path[scheme_end + 3..];
        path = match after.find('/') {
            Some(slash) => &after[slash..],
            None => "",
        };
    }

    path.trim().to_string()
}
