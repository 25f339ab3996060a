//! # Navigation Resolver
//!
//! Turns "back was pressed while viewing `path`" into an [`Action`].
//!
//! ```text
//! 1. exact     path in NavigationMap?       Terminal → exit policy
//!                                           Parent   → NavigateTo(parent)
//! 2. pattern   first matching PatternRule?  → NavigateTo(rule.target)
//! 3. default   empty or a root alias?       → exit policy
//!              otherwise                    → NavigateTo(root_path)
//! ```
//!
//! Never fails: an unknown page is a config gap, and the user still gets a
//! working back button that leads home.

use log::{debug, warn};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::action::{Action, MatchKind, Resolution};
use crate::core::pattern::{PatternRule, first_match};
use crate::core::sitemap::{ConfigurationError, NavigationMap, SiteNode};
use crate::core::state::{Clock, PressOutcome, PressState, SystemClock};

/// Default double-tap window, matching the usual Android toast duration.
pub const DEFAULT_CONFIRMATION_WINDOW: Duration = Duration::from_millis(2000);

/// What happens when back is pressed on a terminal page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExitPolicy {
    /// Exit straight away.
    #[default]
    Immediate,
    /// Require a second press inside `window`.
    Confirm { window: Duration },
}

/// Config-file spelling of [`ExitPolicy`], without the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExitPolicyKind {
    #[default]
    Immediate,
    Confirm,
}

impl ExitPolicyKind {
    pub fn with_window(self, window: Duration) -> ExitPolicy {
        match self {
            ExitPolicyKind::Immediate => ExitPolicy::Immediate,
            ExitPolicyKind::Confirm => ExitPolicy::Confirm { window },
        }
    }
}

/// Everything besides the map and the rules.
#[derive(Debug, Clone)]
pub struct ResolverSettings {
    /// Default landing page for unknown paths.
    pub root_path: String,
    /// Paths that mean "the root" even when absent from the map.
    pub root_aliases: Vec<String>,
    pub exit_policy: ExitPolicy,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            root_path: "/index.html".to_string(),
            root_aliases: vec!["/".to_string(), "/index.html".to_string()],
            exit_policy: ExitPolicy::Immediate,
        }
    }
}

pub struct NavigationResolver {
    map: NavigationMap,
    rules: Vec<PatternRule>,
    settings: ResolverSettings,
    press: Mutex<PressState>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for NavigationResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationResolver")
            .field("pages", &self.map.len())
            .field("rules", &self.rules.len())
            .field("settings", &self.settings)
            .finish()
    }
}

impl NavigationResolver {
    /// Builds a resolver on the system clock.
    pub fn new(
        map: NavigationMap,
        rules: Vec<PatternRule>,
        settings: ResolverSettings,
    ) -> Result<Self, ConfigurationError> {
        Self::with_clock(map, rules, settings, Arc::new(SystemClock))
    }

    /// Builds a resolver reading time from `clock`.
    ///
    /// The map is already validated; this checks the parts that refer into
    /// it: the root path and every rule target.
    pub fn with_clock(
        map: NavigationMap,
        rules: Vec<PatternRule>,
        settings: ResolverSettings,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigurationError> {
        if !map.contains(&settings.root_path) {
            return Err(ConfigurationError::UnknownRoot {
                root: settings.root_path.clone(),
            });
        }

        for (index, rule) in rules.iter().enumerate() {
            if rule.predicate.needle().is_empty() {
                return Err(ConfigurationError::EmptyPattern { index });
            }
            if !map.contains(&rule.target) {
                return Err(ConfigurationError::UnknownPatternTarget {
                    index,
                    target: rule.target.clone(),
                });
            }
        }

        debug!(
            "Resolver ready: {} pages, {} pattern rules, policy {:?}",
            map.len(),
            rules.len(),
            settings.exit_policy
        );

        Ok(Self {
            map,
            rules,
            settings,
            press: Mutex::new(PressState::new()),
            clock,
        })
    }

    /// Decides what a back press on `current_path` should do.
    ///
    /// `current_path` must already be normalized (see
    /// [`normalize_path`](crate::core::sitemap::normalize_path)).
    pub fn resolve(&self, current_path: &str, history_depth: usize) -> Action {
        self.explain(current_path, history_depth).action
    }

    /// Like [`resolve`](Self::resolve), but also reports which step matched.
    pub fn explain(&self, current_path: &str, history_depth: usize) -> Resolution {
        debug!("Back pressed on {current_path:?} (history depth {history_depth})");

        let resolution = if let Some(node) = self.map.get(current_path) {
            let action = match node {
                SiteNode::Terminal => self.on_terminal(),
                SiteNode::Parent(parent) => Action::NavigateTo(parent.clone()),
            };
            Resolution { action, matched: MatchKind::Exact }
        } else if let Some((index, rule)) = first_match(&self.rules, current_path) {
            Resolution {
                action: Action::NavigateTo(rule.target.clone()),
                matched: MatchKind::Pattern { index },
            }
        } else if self.is_root_alias(current_path) {
            Resolution {
                action: self.on_terminal(),
                matched: MatchKind::RootAlias,
            }
        } else {
            warn!(
                "No site map entry or pattern for {current_path:?}, falling back to {}",
                self.settings.root_path
            );
            Resolution {
                action: Action::NavigateTo(self.settings.root_path.clone()),
                matched: MatchKind::Default,
            }
        };

        debug!("Resolved {current_path:?} via {}: {}", resolution.matched, resolution.action);
        resolution
    }

    fn is_root_alias(&self, path: &str) -> bool {
        path.is_empty() || self.settings.root_aliases.iter().any(|alias| alias == path)
    }

    fn on_terminal(&self) -> Action {
        match self.settings.exit_policy {
            ExitPolicy::Immediate => Action::Exit,
            ExitPolicy::Confirm { window } => {
                let now = self.clock.now_ms();
                // Read-modify-write stays inside one lock.
                let mut press = self.press.lock().unwrap_or_else(PoisonError::into_inner);
                match press.register(now, window) {
                    PressOutcome::Confirmed => Action::Exit,
                    PressOutcome::Armed => Action::RequestExitConfirmation,
                }
            }
        }
    }

    /// Forgets any pending first press, e.g. after the user navigated away.
    pub fn reset_press_state(&self) {
        self.press
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .reset();
    }

    pub fn map(&self) -> &NavigationMap {
        &self.map
    }

    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }
}
