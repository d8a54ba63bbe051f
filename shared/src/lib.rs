//! Wire types shared between the reminder server and its clients.
//!
//! Field names follow the mobile client's JSON (`username`, `days`, `times`,
//! `totalDoses`, `_id`), so these structs carry explicit serde renames instead
//! of the Rust field names.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A medication reminder as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    /// Store-assigned identifier
    #[serde(rename = "_id")]
    pub id: String,
    /// Owner of the reminder
    pub username: String,
    pub name: String,
    pub description: String,
    /// Weekday codes ("Sun".."Sat") on which the reminder is active
    pub days: Vec<String>,
    /// Dose slots with their per-day completion flags
    pub times: Vec<ReminderTime>,
    #[serde(rename = "totalDoses")]
    pub total_doses: i64,
    /// Per-day rollup: true once every slot is taken for that day
    pub completed: BTreeMap<String, bool>,
    /// Creation timestamp (RFC 3339)
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

/// One daily dose slot of a reminder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderTime {
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dose: Option<i64>,
    pub completed: BTreeMap<String, bool>,
}

/// Dose slot as submitted when creating a reminder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderTimeInput {
    pub time: String,
    #[serde(default)]
    pub dose: Option<i64>,
}

/// Body of `POST /addReminder`.
///
/// Every field is optional on the wire so that the server can report exactly
/// which one is missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateReminderRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub days: Option<Vec<String>>,
    #[serde(default)]
    pub times: Option<Vec<ReminderTimeInput>>,
    #[serde(default, rename = "totalDoses")]
    pub total_doses: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateReminderResponse {
    pub message: String,
    #[serde(rename = "reminderId")]
    pub reminder_id: String,
    pub reminder: Reminder,
}

/// A weekday given either as a single code or as a list whose first entry is used
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DaySelector {
    One(String),
    Many(Vec<String>),
}

impl DaySelector {
    /// The weekday code this selector refers to, if any
    pub fn first(&self) -> Option<&str> {
        match self {
            DaySelector::One(day) => Some(day.as_str()),
            DaySelector::Many(days) => days.first().map(String::as_str),
        }
    }
}

/// Body of `PATCH /reminders/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkDoseTakenRequest {
    pub time: String,
    #[serde(alias = "day")]
    pub days: DaySelector,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkDoseTakenResponse {
    pub message: String,
    pub reminder: Reminder,
    #[serde(rename = "allTimesCompletedForDay")]
    pub all_times_completed_for_day: bool,
}

/// Query string of `DELETE /reminders/{id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeleteReminderQuery {
    #[serde(default)]
    pub username: Option<String>,
}

/// Plain `{ "message": ... }` body used for confirmations and errors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Body of `GET /api/remind/{username}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemindResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminders: Option<Vec<Reminder>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
