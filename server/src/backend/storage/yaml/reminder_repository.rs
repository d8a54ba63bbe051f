//! # YAML Reminder Repository
//!
//! File-based document store for reminders. Each reminder lives in its own
//! file, keyed by id:
//!
//! ```text
//! data/
//! └── reminders/
//!     ├── 0b6f1c8e-....yaml
//!     └── 9d2a4f10-....yaml
//! ```
//!
//! ## Document Format
//!
//! ```yaml
//! id: 0b6f1c8e-7d1e-4c5a-9a53-2f0d9c1e8b11
//! owner: ana
//! name: Metformin
//! description: after meals
//! weekdays: [Mon, Wed]
//! dose_times:
//!   - time_label: "08:00"
//!     dose: 1
//!     completed_by_day: { Mon: true, Wed: false }
//! total_doses: 30
//! day_completed: { Mon: false, Wed: false }
//! created_at: 2025-01-20T10:00:00Z
//! ```
//!
//! Writes go to a temp file that is then renamed over the document.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info, warn};

use super::connection::YamlConnection;
use crate::backend::domain::models::reminder::{DoseTime, ReminderSchedule};
use crate::backend::domain::models::weekday::Weekday;
use crate::backend::storage::ReminderStorage;

/// On-disk dose slot
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DoseTimeRecord {
    time_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dose: Option<i64>,
    completed_by_day: BTreeMap<String, bool>,
}

/// On-disk reminder document
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ReminderRecord {
    id: String,
    owner: String,
    name: String,
    description: String,
    weekdays: Vec<String>,
    dose_times: Vec<DoseTimeRecord>,
    total_doses: i64,
    #[serde(default)]
    day_completed: BTreeMap<String, bool>,
    created_at: DateTime<Utc>,
}

fn day_map_to_record(map: &BTreeMap<Weekday, bool>) -> BTreeMap<String, bool> {
    map.iter().map(|(day, done)| (day.code().to_string(), *done)).collect()
}

fn day_map_from_record(map: BTreeMap<String, bool>) -> Result<BTreeMap<Weekday, bool>> {
    map.into_iter()
        .map(|(code, done)| Ok((code.parse::<Weekday>()?, done)))
        .collect()
}

impl From<&ReminderSchedule> for ReminderRecord {
    fn from(reminder: &ReminderSchedule) -> Self {
        ReminderRecord {
            id: reminder.id.clone(),
            owner: reminder.owner.clone(),
            name: reminder.name.clone(),
            description: reminder.description.clone(),
            weekdays: reminder.weekdays.iter().map(|day| day.code().to_string()).collect(),
            dose_times: reminder
                .dose_times
                .iter()
                .map(|dose_time| DoseTimeRecord {
                    time_label: dose_time.time_label.clone(),
                    dose: dose_time.dose,
                    completed_by_day: day_map_to_record(&dose_time.completed_by_day),
                })
                .collect(),
            total_doses: reminder.total_doses,
            day_completed: day_map_to_record(&reminder.day_completed),
            created_at: reminder.created_at,
        }
    }
}

impl TryFrom<ReminderRecord> for ReminderSchedule {
    type Error = anyhow::Error;

    fn try_from(record: ReminderRecord) -> Result<Self> {
        let weekdays = record
            .weekdays
            .iter()
            .map(|code| code.parse::<Weekday>())
            .collect::<std::result::Result<BTreeSet<_>, _>>()?;

        let dose_times = record
            .dose_times
            .into_iter()
            .map(|dose_time| {
                Ok(DoseTime {
                    time_label: dose_time.time_label,
                    dose: dose_time.dose,
                    completed_by_day: day_map_from_record(dose_time.completed_by_day)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ReminderSchedule {
            id: record.id,
            owner: record.owner,
            name: record.name,
            description: record.description,
            weekdays,
            dose_times,
            total_doses: record.total_doses,
            day_completed: day_map_from_record(record.day_completed)?,
            created_at: record.created_at,
        })
    }
}

/// YAML-backed reminder repository, one document per reminder
#[derive(Clone)]
pub struct ReminderRepository {
    connection: YamlConnection,
}

impl ReminderRepository {
    pub fn new(connection: YamlConnection) -> Self {
        Self { connection }
    }

    fn read_document(&self, path: &Path) -> Result<ReminderSchedule> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let record: ReminderRecord = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        ReminderSchedule::try_from(record)
            .with_context(|| format!("Invalid reminder document {}", path.display()))
    }

    fn write_document(&self, reminder: &ReminderSchedule) -> Result<()> {
        let path = self
            .connection
            .reminder_file_path(&reminder.id)
            .ok_or_else(|| anyhow!("Invalid reminder id: {}", reminder.id))?;
        let temp_path = path.with_extension("yaml.tmp");

        let contents = serde_yaml::to_string(&ReminderRecord::from(reminder))?;
        fs::write(&temp_path, contents)
            .with_context(|| format!("Failed to write {}", temp_path.display()))?;
        fs::rename(&temp_path, &path)
            .with_context(|| format!("Failed to replace {}", path.display()))?;

        debug!("Wrote reminder document {:?}", path);
        Ok(())
    }

    /// Every readable document, oldest first. Broken files are skipped.
    fn read_all(&self) -> Result<Vec<ReminderSchedule>> {
        let directory = self.connection.reminders_directory();
        let mut reminders = Vec::new();

        for entry in fs::read_dir(&directory)
            .with_context(|| format!("Failed to list {}", directory.display()))?
        {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("yaml") {
                continue;
            }

            match self.read_document(&path) {
                Ok(reminder) => reminders.push(reminder),
                Err(e) => {
                    warn!("Skipping unreadable reminder document: {:#}", e);
                    continue;
                }
            }
        }

        reminders.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(reminders)
    }
}

#[async_trait]
impl ReminderStorage for ReminderRepository {
    async fn store_reminder(&self, reminder: &ReminderSchedule) -> Result<()> {
        info!("Storing reminder: {}", reminder.id);

        let path = self
            .connection
            .reminder_file_path(&reminder.id)
            .ok_or_else(|| anyhow!("Invalid reminder id: {}", reminder.id))?;
        if path.exists() {
            return Err(anyhow!("Reminder already exists: {}", reminder.id));
        }

        self.write_document(reminder)
    }

    async fn get_reminder(&self, reminder_id: &str) -> Result<Option<ReminderSchedule>> {
        let Some(path) = self.connection.reminder_file_path(reminder_id) else {
            debug!("Rejected non-uuid reminder id: {}", reminder_id);
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }

        self.read_document(&path).map(Some)
    }

    async fn list_reminders_for_owner(&self, owner: &str) -> Result<Vec<ReminderSchedule>> {
        let reminders = self
            .read_all()?
            .into_iter()
            .filter(|reminder| reminder.owner == owner)
            .collect();
        Ok(reminders)
    }

    async fn list_reminders(&self) -> Result<Vec<ReminderSchedule>> {
        self.read_all()
    }

    async fn update_reminder(&self, reminder: &ReminderSchedule) -> Result<()> {
        let path = self
            .connection
            .reminder_file_path(&reminder.id)
            .ok_or_else(|| anyhow!("Invalid reminder id: {}", reminder.id))?;
        if !path.exists() {
            return Err(anyhow!("Reminder not found: {}", reminder.id));
        }

        self.write_document(reminder)
    }

    async fn delete_reminder(&self, reminder_id: &str) -> Result<bool> {
        let Some(path) = self.connection.reminder_file_path(reminder_id) else {
            return Ok(false);
        };

        match fs::remove_file(&path) {
            Ok(()) => {
                info!("Deleted reminder document: {}", reminder_id);
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).with_context(|| format!("Failed to delete {}", path.display())),
        }
    }
}
