// server/src/backend/domain/commands.rs

//! Domain-level command and query types
//! These structs are used by services inside the domain layer and are **not**
//! exposed over the public API. The REST layer is responsible for mapping the
//! public DTOs defined in the `shared` crate to these internal types.

pub mod reminder {
    use crate::backend::domain::models::reminder::{DoseSlot, ReminderSchedule};

    /// Input for creating a reminder. Fields stay optional so validation can
    /// name the one that is missing.
    #[derive(Debug, Clone, Default)]
    pub struct CreateReminderCommand {
        pub owner: Option<String>,
        pub name: Option<String>,
        pub description: Option<String>,
        pub weekdays: Option<Vec<String>>,
        pub dose_slots: Option<Vec<DoseSlot>>,
        pub total_doses: Option<i64>,
    }

    /// Input for marking one dose slot as taken on one weekday.
    #[derive(Debug, Clone)]
    pub struct MarkDoseTakenCommand {
        pub reminder_id: String,
        pub time_label: String,
        pub weekday: Option<String>,
    }

    /// Input for deleting a reminder. `owner: None` skips the ownership check.
    #[derive(Debug, Clone)]
    pub struct DeleteReminderCommand {
        pub reminder_id: String,
        pub owner: Option<String>,
    }

    /// Result of creating a reminder.
    #[derive(Debug, Clone)]
    pub struct CreateReminderResult {
        pub reminder: ReminderSchedule,
        pub success_message: String,
    }

    /// Result of marking a dose taken.
    #[derive(Debug, Clone)]
    pub struct MarkDoseTakenResult {
        pub reminder: ReminderSchedule,
        pub day_fully_completed: bool,
        pub success_message: String,
    }

    /// A schedule whose rollup could not be persisted during a sweep.
    #[derive(Debug, Clone)]
    pub struct RefreshFailure {
        pub reminder_id: String,
        pub message: String,
    }

    /// Result of listing every reminder after the rollup sweep.
    #[derive(Debug, Clone)]
    pub struct ListAllRemindersResult {
        pub reminders: Vec<ReminderSchedule>,
        pub refresh_failures: Vec<RefreshFailure>,
    }
}
