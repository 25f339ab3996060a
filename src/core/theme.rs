//! # Theme
//!
//! Light/dark selection. A saved choice always wins; without one the system
//! preference decides. Stored on the device as `"light"` or `"dark"` under
//! [`STORAGE_KEY`].

use serde::{Deserialize, Serialize};
use std::fmt;

pub const STORAGE_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Reads a stored value. Only `"light"` means light; any other non-empty
    /// value is a dark choice, and an empty one counts as nothing saved.
    pub fn parse_saved(value: Option<&str>) -> Option<Self> {
        match value?.trim() {
            "" => None,
            "light" => Some(Theme::Light),
            _ => Some(Theme::Dark),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn initial_theme(saved: Option<Theme>, system_prefers_dark: bool) -> Theme {
    match saved {
        Some(theme) => theme,
        None if system_prefers_dark => Theme::Dark,
        None => Theme::Light,
    }
}
