//! # Storage Traits
//!
//! This module defines the storage abstraction traits that allow different
//! storage backends to be used interchangeably in the domain layer.

use anyhow::Result;
use async_trait::async_trait;

use crate::backend::domain::models::reminder::ReminderSchedule;

/// Trait defining the interface for reminder document storage
///
/// Each reminder is one document keyed by its id. Implementations are not
/// expected to coordinate concurrent writers; the domain layer serializes
/// read-modify-write cycles per id.
#[async_trait]
pub trait ReminderStorage: Send + Sync {
    /// Hand out a fresh document key
    fn allocate_id(&self) -> String {
        ReminderSchedule::generate_id()
    }

    /// Store a new reminder
    async fn store_reminder(&self, reminder: &ReminderSchedule) -> Result<()>;

    /// Retrieve a specific reminder by ID
    async fn get_reminder(&self, reminder_id: &str) -> Result<Option<ReminderSchedule>>;

    /// List reminders belonging to one owner, oldest first
    async fn list_reminders_for_owner(&self, owner: &str) -> Result<Vec<ReminderSchedule>>;

    /// List every reminder, oldest first
    async fn list_reminders(&self) -> Result<Vec<ReminderSchedule>>;

    /// Replace an existing reminder
    async fn update_reminder(&self, reminder: &ReminderSchedule) -> Result<()>;

    /// Delete a reminder
    /// Returns true if the reminder was found and deleted, false otherwise
    async fn delete_reminder(&self, reminder_id: &str) -> Result<bool>;
}

/// Trait defining the interface for storage connections
///
/// This trait abstracts away the specific connection type and provides
/// factory methods for creating repositories.
pub trait Connection: Send + Sync + Clone {
    /// The type of ReminderStorage this connection creates
    type ReminderRepository: ReminderStorage + 'static;

    /// Create a new reminder repository for this connection
    fn create_reminder_repository(&self) -> Self::ReminderRepository;
}
