//! # Actions
//!
//! Every back press becomes exactly one `Action`.
//! Viewing a leaf page? That's `Action::NavigateTo("/hub.html")`.
//! Sitting on the landing page? That's `Action::Exit` (or a confirmation first).
//!
//! The resolver only decides. The host executes: it owns the real location
//! API and the process-exit API.
//!
//! ```text
//! path + PressState  →  resolve()  →  Action  →  Host
//! ```
//!
//! This makes everything testable: `assert_eq!(resolver.resolve(path, 0), expected)`.

use serde::Serialize;
use std::fmt;

/// What the host should do in response to a back press.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "target", rename_all = "snake_case")]
pub enum Action {
    /// Full navigation to the given path (not a partial render).
    NavigateTo(String),
    /// Show a transient "press back again to exit" message. No navigation.
    RequestExitConfirmation,
    /// Terminate the application.
    Exit,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::NavigateTo(path) => write!(f, "navigate to {path}"),
            Action::RequestExitConfirmation => write!(f, "request exit confirmation"),
            Action::Exit => write!(f, "exit"),
        }
    }
}

/// Which step of the resolution algorithm produced the action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchKind {
    /// The path is a key in the navigation map.
    Exact,
    /// The path matched the pattern rule at `index` (0 = highest priority).
    Pattern { index: usize },
    /// The path is empty or one of the configured root aliases.
    RootAlias,
    /// Nothing matched; sent to the default landing page.
    Default,
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchKind::Exact => write!(f, "exact"),
            MatchKind::Pattern { index } => write!(f, "pattern #{index}"),
            MatchKind::RootAlias => write!(f, "root alias"),
            MatchKind::Default => write!(f, "default fallback"),
        }
    }
}

/// An action together with the reason it was chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub action: Action,
    pub matched: MatchKind,
}
