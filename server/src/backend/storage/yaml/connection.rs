use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

use super::reminder_repository::ReminderRepository;
use crate::backend::storage::traits::Connection;

const REMINDERS_DIRECTORY: &str = "reminders";

/// YamlConnection owns the data directory and maps reminder ids to files
#[derive(Clone, Debug)]
pub struct YamlConnection {
    base_directory: PathBuf,
}

impl YamlConnection {
    /// Create a new connection rooted at `base_directory`, creating it if needed
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();
        let reminders_dir = base_path.join(REMINDERS_DIRECTORY);

        if !reminders_dir.exists() {
            fs::create_dir_all(&reminders_dir).with_context(|| {
                format!("Failed to create data directory {}", reminders_dir.display())
            })?;
            debug!("Created reminders directory: {}", reminders_dir.display());
        }

        Ok(Self {
            base_directory: base_path,
        })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    pub fn reminders_directory(&self) -> PathBuf {
        self.base_directory.join(REMINDERS_DIRECTORY)
    }

    /// File backing a reminder. Only canonical (lowercase, hyphenated) UUID
    /// ids map to a path, so a caller supplied id can never point outside the
    /// reminders directory and each file has exactly one id spelling.
    pub fn reminder_file_path(&self, reminder_id: &str) -> Option<PathBuf> {
        let canonical = Uuid::parse_str(reminder_id).ok()?.hyphenated().to_string();
        if canonical != reminder_id {
            return None;
        }
        Some(self.reminders_directory().join(format!("{}.yaml", canonical)))
    }
}

impl Connection for YamlConnection {
    type ReminderRepository = ReminderRepository;

    fn create_reminder_repository(&self) -> Self::ReminderRepository {
        ReminderRepository::new(self.clone())
    }
}
