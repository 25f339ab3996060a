//! # Core Navigation Logic
//!
//! This module contains Waypoint's decision logic.
//! It knows nothing about any specific host runtime or UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • NavigationMap        │
//!                    │  • PatternRule          │
//!                    │  • resolve() → Action   │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    CLI     │      │ Simulator  │      │   Bridge   │
//!     │  (clap)    │      │ (ratatui)  │      │  (host)    │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`sitemap`]: `NavigationMap`, the page tree, validated once
//! - [`pattern`]: `PatternRule`, ordered fallbacks for unlisted pages
//! - [`resolver`]: `NavigationResolver`, back press → `Action`
//! - [`action`]: `Action`, everything a back press can lead to
//! - [`state`]: `PressState`, the double-tap-to-exit memory
//! - [`config`]: layered TOML configuration
//! - [`reminder`], [`theme`]: small pure helpers for the rest of the app

pub mod action;
pub mod config;
pub mod pattern;
pub mod reminder;
pub mod resolver;
pub mod sitemap;
pub mod state;
pub mod theme;

// Re-export commonly used types for convenience
pub use action::{Action, MatchKind, Resolution};
pub use resolver::{ExitPolicy, NavigationResolver, ResolverSettings};
pub use sitemap::{ConfigurationError, NavigationMap, SiteNode, normalize_path};
