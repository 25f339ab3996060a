//! # Device Storage
//!
//! A snapshot of the app's key-value storage, exported from the device as a
//! single JSON object of string values:
//!
//! ```text
//! { "theme": "light", "waypoint_notification_schedule": "{\"hour\":\"8\",...}" }
//! ```
//!
//! Only the keys Waypoint understands are interpreted; the rest are carried
//! along untouched.

use log::{debug, warn};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::core::reminder::{self, ReminderError, WeeklySchedule};
use crate::core::theme::{self, Theme};

#[derive(Debug)]
pub enum StorageError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Schedule(ReminderError),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(e) => write!(f, "Failed to read storage export: {e}"),
            StorageError::Parse(e) => write!(f, "Storage export is not a JSON object of strings: {e}"),
            StorageError::Schedule(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for StorageError {}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageSnapshot {
    entries: HashMap<String, String>,
}

impl StorageSnapshot {
    pub fn from_json(json: &str) -> Result<Self, StorageError> {
        let entries: HashMap<String, String> =
            serde_json::from_str(json).map_err(StorageError::Parse)?;
        debug!("Storage snapshot with {} keys", entries.len());
        Ok(Self { entries })
    }

    pub fn load(path: &Path) -> Result<Self, StorageError> {
        let contents = fs::read_to_string(path).map_err(StorageError::Io)?;
        Self::from_json(&contents)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// The saved theme choice, if any.
    pub fn theme(&self) -> Option<Theme> {
        Theme::parse_saved(self.get(theme::STORAGE_KEY))
    }

    /// The saved reminder schedule. A missing key is `Ok(None)`; a present but
    /// unreadable one is an error.
    pub fn reminder_schedule(&self) -> Result<Option<WeeklySchedule>, StorageError> {
        let Some(raw) = self.get(reminder::STORAGE_KEY) else {
            return Ok(None);
        };
        WeeklySchedule::from_json(raw).map(Some).map_err(|e| {
            warn!("Ignoring stored schedule: {e}");
            StorageError::Schedule(e)
        })
    }
}
