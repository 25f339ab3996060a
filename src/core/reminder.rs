//! # Reminder Planning
//!
//! Weekly "time to take a test" reminders. This module only computes *when*
//! they fire and what ids they carry; handing them to the platform
//! notification service is the host's job.
//!
//! ```text
//! 8:30 PM, days [1, 3]  →  Mon 20:30 (id 101), Wed 20:30 (id 103), repeating weekly
//! ```
//!
//! Days are numbered from Sunday (0) to Saturday (6), the same numbering the
//! stored schedule uses.

use chrono::{DateTime, Datelike, NaiveDateTime, TimeDelta, Utc, Weekday};
use log::debug;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Key the schedule is stored under on the device.
pub const STORAGE_KEY: &str = "waypoint_notification_schedule";
pub const CHANNEL_ID: &str = "reminder_channel";
pub const ACTION_TYPE_ID: &str = "TAKE_TEST_ACTION";
/// Offset added to the weekday number to form a stable notification id.
pub const NOTIFICATION_ID_BASE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum Period {
    #[serde(rename = "AM")]
    Am,
    #[serde(rename = "PM")]
    Pm,
}

#[derive(Debug)]
pub enum ReminderError {
    InvalidTime { hour: u32, minute: u32 },
    InvalidDay(u32),
    NoDaysSelected,
    OutOfRange,
    Storage(serde_json::Error),
}

impl fmt::Display for ReminderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReminderError::InvalidTime { hour, minute } => {
                write!(f, "invalid reminder time {hour}:{minute:02}")
            }
            ReminderError::InvalidDay(day) => write!(f, "invalid day {day} (expected 0-6)"),
            ReminderError::NoDaysSelected => write!(f, "select at least one day for reminders"),
            ReminderError::OutOfRange => write!(f, "reminder date out of range"),
            ReminderError::Storage(e) => write!(f, "stored schedule is unreadable: {e}"),
        }
    }
}

impl std::error::Error for ReminderError {}

/// Converts a 12-hour clock reading to `(hour, minute)` on a 24-hour clock.
pub fn to_24_hour(hour: u32, minute: u32, period: Period) -> Result<(u32, u32), ReminderError> {
    if !(1..=12).contains(&hour) || minute > 59 {
        return Err(ReminderError::InvalidTime { hour, minute });
    }
    let hour24 = match (period, hour) {
        (Period::Am, 12) => 0,
        (Period::Am, h) => h,
        (Period::Pm, 12) => 12,
        (Period::Pm, h) => h + 12,
    };
    Ok((hour24, minute))
}

/// Maps 0 (Sunday) through 6 (Saturday) to a weekday.
pub fn weekday_from_number(day: u32) -> Result<Weekday, ReminderError> {
    match day {
        0 => Ok(Weekday::Sun),
        1 => Ok(Weekday::Mon),
        2 => Ok(Weekday::Tue),
        3 => Ok(Weekday::Wed),
        4 => Ok(Weekday::Thu),
        5 => Ok(Weekday::Fri),
        6 => Ok(Weekday::Sat),
        other => Err(ReminderError::InvalidDay(other)),
    }
}

pub fn notification_id(weekday: Weekday) -> u32 {
    weekday.num_days_from_sunday() + NOTIFICATION_ID_BASE
}

/// The first `weekday` at `hour:minute` strictly after `now`.
pub fn next_occurrence(
    weekday: Weekday,
    hour: u32,
    minute: u32,
    now: NaiveDateTime,
) -> Result<NaiveDateTime, ReminderError> {
    let today = now.date();
    let days_ahead = (i64::from(weekday.num_days_from_sunday())
        - i64::from(today.weekday().num_days_from_sunday()))
    .rem_euclid(7);

    let candidate = today
        .checked_add_signed(TimeDelta::days(days_ahead))
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .ok_or(ReminderError::OutOfRange)?;

    if candidate > now {
        Ok(candidate)
    } else {
        candidate
            .checked_add_signed(TimeDelta::days(7))
            .ok_or(ReminderError::OutOfRange)
    }
}

/// One planned weekly notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledReminder {
    pub id: u32,
    pub weekday: Weekday,
    pub at: NaiveDateTime,
    pub channel_id: &'static str,
    pub action_type_id: &'static str,
}

/// The user's chosen reminder time and days, as stored on the device.
///
/// The settings form stores its raw field values, so `hour`, `minute` and
/// `days` are read from either numbers or numeric strings. They are always
/// written back as numbers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySchedule {
    /// 1-12.
    #[serde(deserialize_with = "deserialize_form_number")]
    pub hour: u32,
    #[serde(deserialize_with = "deserialize_form_number")]
    pub minute: u32,
    pub period: Period,
    /// 0 = Sunday.
    #[serde(deserialize_with = "deserialize_form_numbers")]
    pub days: Vec<u32>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

impl WeeklySchedule {
    /// One reminder per selected day, soonest first.
    pub fn plan(&self, now: NaiveDateTime) -> Result<Vec<ScheduledReminder>, ReminderError> {
        if self.days.is_empty() {
            return Err(ReminderError::NoDaysSelected);
        }
        let (hour, minute) = to_24_hour(self.hour, self.minute, self.period)?;

        let mut days = self.days.clone();
        days.sort_unstable();
        days.dedup();

        let mut planned = days
            .into_iter()
            .map(|day| -> Result<ScheduledReminder, ReminderError> {
                let weekday = weekday_from_number(day)?;
                let at = next_occurrence(weekday, hour, minute, now)?;
                debug!("Reminder for {weekday} at {at}");
                Ok(ScheduledReminder {
                    id: notification_id(weekday),
                    weekday,
                    at,
                    channel_id: CHANNEL_ID,
                    action_type_id: ACTION_TYPE_ID,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        planned.sort_by_key(|r| r.at);
        Ok(planned)
    }

    pub fn to_json(&self) -> Result<String, ReminderError> {
        serde_json::to_string(self).map_err(ReminderError::Storage)
    }

    pub fn from_json(json: &str) -> Result<Self, ReminderError> {
        serde_json::from_str(json).map_err(ReminderError::Storage)
    }
}

fn form_number<E: serde::de::Error>(value: serde_json::Value) -> Result<u32, E> {
    match value {
        serde_json::Value::Number(number) => number
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| E::custom(format!("expected a non-negative integer, got {number}"))),
        serde_json::Value::String(text) => text
            .trim()
            .parse()
            .map_err(|_| E::custom(format!("expected a numeric string, got {text:?}"))),
        other => Err(E::custom(format!("expected a number or numeric string, got {other}"))),
    }
}

fn deserialize_form_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    form_number(serde_json::Value::deserialize(deserializer)?)
}

fn deserialize_form_numbers<'de, D>(deserializer: D) -> Result<Vec<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<serde_json::Value>::deserialize(deserializer)?
        .into_iter()
        .map(form_number)
        .collect()
}

/// Buttons on the reminder notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationAction {
    Start,
    Dismiss,
}

impl NotificationAction {
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "start" => Some(NotificationAction::Start),
            "dismiss" => Some(NotificationAction::Dismiss),
            _ => None,
        }
    }

    /// Where the app should navigate when this action is tapped.
    pub fn target<'a>(&self, start_path: &'a str) -> Option<&'a str> {
        match self {
            NotificationAction::Start => Some(start_path),
            NotificationAction::Dismiss => None,
        }
    }
}
