//! Reminder service domain logic.
//!
//! Owns the reminder schedule lifecycle: creation with all slots pending,
//! marking individual doses as taken, owner-scoped listing and deletion, and
//! the rollup refresh sweep run on the administrative list-all read.
//!
//! ## Business Rules
//!
//! - A dose slot goes from pending to taken and never back
//! - A day's rollup is the AND of every slot's flag for that day and is always
//!   re-derived after a change, never written on its own
//! - Marking an already-taken slot is a no-op, not an error
//! - Weekday keys are fixed when the reminder is created
//! - Deletion checks ownership only when the caller names an owner
//! - There is no automatic daily reset of taken flags

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::backend::domain::clock::Clock;
use crate::backend::domain::commands::reminder::{
    CreateReminderCommand, CreateReminderResult, DeleteReminderCommand, ListAllRemindersResult,
    MarkDoseTakenCommand, MarkDoseTakenResult, RefreshFailure,
};
use crate::backend::domain::errors::{ReminderError, ReminderResult};
use crate::backend::domain::models::reminder::{NewReminder, ReminderSchedule};
use crate::backend::domain::models::weekday::Weekday;
use crate::backend::domain::schedule_locks::ScheduleLocks;
use crate::backend::storage::ReminderStorage;

/// Service for managing medication reminders and dose completion
#[derive(Clone)]
pub struct ReminderService {
    storage: Arc<dyn ReminderStorage>,
    clock: Arc<dyn Clock>,
    locks: ScheduleLocks,
}

fn required_text(value: Option<String>, field: &'static str) -> ReminderResult<String> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(ReminderError::missing(field)),
    }
}

fn parse_weekday(code: &str, field: &'static str) -> ReminderResult<Weekday> {
    code.parse::<Weekday>()
        .map_err(|e| ReminderError::invalid(field, e.to_string()))
}

impl ReminderService {
    pub fn new(storage: Arc<dyn ReminderStorage>, clock: Arc<dyn Clock>) -> Self {
        Self {
            storage,
            clock,
            locks: ScheduleLocks::new(),
        }
    }

    /// Create a new reminder with every dose pending
    pub async fn create_reminder(&self, command: CreateReminderCommand) -> ReminderResult<CreateReminderResult> {
        info!("Creating reminder: {:?}", command);

        let owner = required_text(command.owner, "username")?;
        let name = required_text(command.name, "name")?;
        let description = required_text(command.description, "description")?;

        let codes = command.weekdays.unwrap_or_default();
        if codes.is_empty() {
            return Err(ReminderError::missing("days"));
        }
        let weekdays: BTreeSet<Weekday> = codes
            .iter()
            .map(|code| parse_weekday(code, "days"))
            .collect::<ReminderResult<_>>()?;

        let slots = command.dose_slots.unwrap_or_default();
        if slots.is_empty() {
            return Err(ReminderError::missing("times"));
        }
        let mut seen = HashSet::new();
        for slot in &slots {
            if slot.time_label.trim().is_empty() {
                return Err(ReminderError::invalid("times", "time must not be empty"));
            }
            if !seen.insert(slot.time_label.as_str()) {
                return Err(ReminderError::invalid(
                    "times",
                    format!("duplicate time '{}'", slot.time_label),
                ));
            }
        }

        let total_doses = command.total_doses.ok_or_else(|| ReminderError::missing("totalDoses"))?;

        let reminder = ReminderSchedule::new(NewReminder {
            id: self.storage.allocate_id(),
            owner,
            name: name.trim().to_string(),
            description: description.trim().to_string(),
            weekdays,
            slots,
            total_doses,
            created_at: self.clock.now(),
        });

        self.storage.store_reminder(&reminder).await?;

        info!("Created reminder {} for {}", reminder.id, reminder.owner);

        Ok(CreateReminderResult {
            reminder,
            success_message: "Reminder added successfully".to_string(),
        })
    }

    /// List the reminders belonging to one owner
    pub async fn list_reminders_for_owner(&self, owner: &str) -> ReminderResult<Vec<ReminderSchedule>> {
        if owner.trim().is_empty() {
            return Err(ReminderError::missing("username"));
        }

        let reminders = self.storage.list_reminders_for_owner(owner).await?;
        debug!("Found {} reminders for {}", reminders.len(), owner);
        Ok(reminders)
    }

    /// List every reminder after re-deriving today's rollups
    pub async fn list_all_reminders(&self) -> ReminderResult<ListAllRemindersResult> {
        let today = self.clock.today();
        info!("Listing all reminders (sweep day: {})", today);
        self.refresh_rollups(today).await
    }

    /// Re-derive `day_completed[today]` on every reminder tracking `today`,
    /// persisting the ones that drifted. A failure on one reminder is logged
    /// and recorded; the others are still refreshed and returned.
    pub async fn refresh_rollups(&self, today: Weekday) -> ReminderResult<ListAllRemindersResult> {
        let snapshot = self.storage.list_reminders().await?;
        let mut reminders = Vec::with_capacity(snapshot.len());
        let mut refresh_failures = Vec::new();

        for listed in snapshot {
            if !listed.tracks(today) {
                reminders.push(listed);
                continue;
            }

            let _guard = self.locks.acquire(&listed.id).await;

            let mut current = match self.storage.get_reminder(&listed.id).await {
                Ok(Some(current)) => current,
                Ok(None) => {
                    debug!("Reminder {} deleted during sweep", listed.id);
                    continue;
                }
                Err(e) => {
                    warn!("Failed to reload reminder {} during sweep: {:#}", listed.id, e);
                    refresh_failures.push(RefreshFailure {
                        reminder_id: listed.id.clone(),
                        message: format!("{:#}", e),
                    });
                    reminders.push(listed);
                    continue;
                }
            };

            if current.refresh_rollup(today) {
                match self.storage.update_reminder(&current).await {
                    Ok(()) => info!("Repaired {} rollup for reminder {}", today, current.id),
                    Err(e) => {
                        warn!("Failed to persist rollup for reminder {}: {:#}", current.id, e);
                        refresh_failures.push(RefreshFailure {
                            reminder_id: current.id.clone(),
                            message: format!("{:#}", e),
                        });
                    }
                }
            }

            reminders.push(current);
        }

        Ok(ListAllRemindersResult {
            reminders,
            refresh_failures,
        })
    }

    /// Mark one dose slot as taken for one weekday
    pub async fn mark_dose_taken(&self, command: MarkDoseTakenCommand) -> ReminderResult<MarkDoseTakenResult> {
        info!("Marking dose taken: {:?}", command);

        let code = command.weekday.ok_or_else(|| ReminderError::missing("days"))?;
        let day = parse_weekday(&code, "days")?;

        let _guard = self.locks.acquire(&command.reminder_id).await;

        let mut reminder = self
            .storage
            .get_reminder(&command.reminder_id)
            .await?
            .ok_or_else(|| ReminderError::NotFound("Reminder not found".to_string()))?;

        let outcome = reminder.mark_taken(&command.time_label, day)?;

        if outcome.changed {
            self.storage.update_reminder(&reminder).await?;
        } else {
            debug!(
                "Dose {} on {} already taken for reminder {}",
                command.time_label, day, reminder.id
            );
        }

        Ok(MarkDoseTakenResult {
            reminder,
            day_fully_completed: outcome.day_completed,
            success_message: format!("Reminder marked as completed for the day ({}).", day),
        })
    }

    /// Delete a reminder, checking ownership when an owner is given
    pub async fn delete_reminder(&self, command: DeleteReminderCommand) -> ReminderResult<()> {
        info!("Deleting reminder: {:?}", command);

        let _guard = self.locks.acquire(&command.reminder_id).await;

        let reminder = self
            .storage
            .get_reminder(&command.reminder_id)
            .await?
            .ok_or_else(|| ReminderError::NotFound("Reminder not found".to_string()))?;

        if let Some(owner) = command.owner.filter(|owner| !owner.is_empty()) {
            if owner != reminder.owner {
                warn!("{} attempted to delete reminder {} owned by {}", owner, reminder.id, reminder.owner);
                return Err(ReminderError::Authorization(
                    "You do not have permission to delete this reminder".to_string(),
                ));
            }
        }

        if !self.storage.delete_reminder(&reminder.id).await? {
            return Err(ReminderError::NotFound("Reminder not found".to_string()));
        }

        info!("Deleted reminder {}", reminder.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::clock::FixedClock;
    use crate::backend::domain::models::reminder::DoseSlot;
    use crate::backend::storage::yaml::test_utils::TestEnvironment;
    use crate::backend::storage::ReminderRepository;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;

    fn create_command(owner: &str, days: &[&str], times: &[&str]) -> CreateReminderCommand {
        CreateReminderCommand {
            owner: Some(owner.to_string()),
            name: Some("Amoxicillin".to_string()),
            description: Some("500mg capsule".to_string()),
            weekdays: Some(days.iter().map(|d| d.to_string()).collect()),
            dose_slots: Some(
                times
                    .iter()
                    .map(|t| DoseSlot { time_label: t.to_string(), dose: Some(1) })
                    .collect(),
            ),
            total_doses: Some(28),
        }
    }

    fn mark(id: &str, time: &str, day: &str) -> MarkDoseTakenCommand {
        MarkDoseTakenCommand {
            reminder_id: id.to_string(),
            time_label: time.to_string(),
            weekday: Some(day.to_string()),
        }
    }

    fn taken(reminder: &ReminderSchedule, time: &str, day: Weekday) -> bool {
        reminder
            .dose_times
            .iter()
            .find(|dose_time| dose_time.time_label == time)
            .map(|dose_time| dose_time.is_taken_on(day))
            .unwrap()
    }

    async fn create_test_service(today: Weekday) -> (TestEnvironment, ReminderService) {
        let env = TestEnvironment::new().await.expect("Failed to create test environment");
        let service = ReminderService::new(
            Arc::new(env.reminder_repository()),
            Arc::new(FixedClock::on(today)),
        );
        (env, service)
    }

    /// Repository that refuses to write one specific reminder, and optionally
    /// any new one
    struct FailingWrites {
        inner: ReminderRepository,
        poisoned_id: String,
        reject_new: bool,
    }

    #[async_trait]
    impl ReminderStorage for FailingWrites {
        async fn store_reminder(&self, reminder: &ReminderSchedule) -> Result<()> {
            if self.reject_new {
                return Err(anyhow!("disk full"));
            }
            self.inner.store_reminder(reminder).await
        }
        async fn get_reminder(&self, reminder_id: &str) -> Result<Option<ReminderSchedule>> {
            self.inner.get_reminder(reminder_id).await
        }
        async fn list_reminders_for_owner(&self, owner: &str) -> Result<Vec<ReminderSchedule>> {
            self.inner.list_reminders_for_owner(owner).await
        }
        async fn list_reminders(&self) -> Result<Vec<ReminderSchedule>> {
            self.inner.list_reminders().await
        }
        async fn update_reminder(&self, reminder: &ReminderSchedule) -> Result<()> {
            if reminder.id == self.poisoned_id {
                return Err(anyhow!("write rejected"));
            }
            self.inner.update_reminder(reminder).await
        }
        async fn delete_reminder(&self, reminder_id: &str) -> Result<bool> {
            self.inner.delete_reminder(reminder_id).await
        }
    }

    #[tokio::test]
    async fn test_create_reminder_starts_pending() {
        let (_env, service) = create_test_service(Weekday::Mon).await;

        let result = service
            .create_reminder(create_command("ana", &["Mon", "Wed"], &["08:00", "20:00"]))
            .await
            .expect("Failed to create reminder");
        let reminder = result.reminder;

        assert_eq!(result.success_message, "Reminder added successfully");
        assert_eq!(reminder.weekdays.len(), 2);
        for time in ["08:00", "20:00"] {
            assert!(!taken(&reminder, time, Weekday::Mon));
            assert!(!taken(&reminder, time, Weekday::Wed));
        }
        assert!(!reminder.day_completed[&Weekday::Mon]);
        assert!(!reminder.day_completed[&Weekday::Wed]);
        assert!(reminder.rollup_is_consistent());

        let stored = service.list_reminders_for_owner("ana").await.unwrap();
        assert_eq!(stored, vec![reminder]);
    }

    #[tokio::test]
    async fn test_create_reminder_validation() {
        let (_env, service) = create_test_service(Weekday::Mon).await;

        let cases: Vec<(CreateReminderCommand, &str)> = vec![
            (CreateReminderCommand { owner: None, ..create_command("ana", &["Mon"], &["08:00"]) }, "username"),
            (CreateReminderCommand { name: Some("  ".to_string()), ..create_command("ana", &["Mon"], &["08:00"]) }, "name"),
            (CreateReminderCommand { description: None, ..create_command("ana", &["Mon"], &["08:00"]) }, "description"),
            (create_command("ana", &[], &["08:00"]), "days"),
            (create_command("ana", &["Mon", "Funday"], &["08:00"]), "days"),
            (create_command("ana", &["Mon"], &[]), "times"),
            (create_command("ana", &["Mon"], &["08:00", "08:00"]), "times"),
            (create_command("ana", &["Mon"], &[""]), "times"),
            (CreateReminderCommand { total_doses: None, ..create_command("ana", &["Mon"], &["08:00"]) }, "totalDoses"),
        ];

        for (command, expected_field) in cases {
            match service.create_reminder(command).await {
                Err(ReminderError::Validation { field, .. }) => assert_eq!(field, expected_field),
                other => panic!("expected validation error on {}, got {:?}", expected_field, other),
            }
        }

        assert!(service.list_all_reminders().await.unwrap().reminders.is_empty());
    }

    #[tokio::test]
    async fn test_create_accepts_any_total_and_duplicate_days() {
        let (_env, service) = create_test_service(Weekday::Mon).await;

        let mut command = create_command("ana", &["Fri", "Fri", "Tue"], &["09:00"]);
        command.total_doses = Some(-5);
        let reminder = service.create_reminder(command).await.unwrap().reminder;

        assert_eq!(reminder.total_doses, -5);
        assert_eq!(
            reminder.weekdays.iter().copied().collect::<Vec<_>>(),
            vec![Weekday::Tue, Weekday::Fri]
        );
    }

    #[tokio::test]
    async fn test_mark_dose_taken_scenario() {
        let (_env, service) = create_test_service(Weekday::Mon).await;
        let id = service
            .create_reminder(create_command("ana", &["Mon", "Wed"], &["08:00", "20:00"]))
            .await
            .unwrap()
            .reminder
            .id;

        let first = service.mark_dose_taken(mark(&id, "08:00", "Mon")).await.unwrap();
        assert!(!first.day_fully_completed);
        assert!(taken(&first.reminder, "08:00", Weekday::Mon));
        assert!(!first.reminder.day_completed[&Weekday::Mon]);
        assert!(!first.reminder.day_completed[&Weekday::Wed]);
        assert_eq!(first.success_message, "Reminder marked as completed for the day (Mon).");

        let second = service.mark_dose_taken(mark(&id, "20:00", "Mon")).await.unwrap();
        assert!(second.day_fully_completed);
        assert!(second.reminder.day_completed[&Weekday::Mon]);
        assert!(!second.reminder.day_completed[&Weekday::Wed]);

        let stored = service.list_reminders_for_owner("ana").await.unwrap();
        assert_eq!(stored[0], second.reminder);
    }

    #[tokio::test]
    async fn test_mark_dose_taken_is_idempotent() {
        let (_env, service) = create_test_service(Weekday::Mon).await;
        let id = service
            .create_reminder(create_command("ana", &["Mon"], &["08:00", "20:00"]))
            .await
            .unwrap()
            .reminder
            .id;

        let once = service.mark_dose_taken(mark(&id, "08:00", "Mon")).await.unwrap();
        let twice = service.mark_dose_taken(mark(&id, "08:00", "Mon")).await.unwrap();

        assert_eq!(once.reminder, twice.reminder);
        assert_eq!(once.day_fully_completed, twice.day_fully_completed);
    }

    #[tokio::test]
    async fn test_mark_dose_taken_errors_leave_state_unchanged() {
        let (_env, service) = create_test_service(Weekday::Mon).await;
        let created = service
            .create_reminder(create_command("ana", &["Mon"], &["08:00"]))
            .await
            .unwrap()
            .reminder;

        let unknown_time = service.mark_dose_taken(mark(&created.id, "12:00", "Mon")).await;
        assert!(matches!(unknown_time, Err(ReminderError::NotFound(_))));

        let untracked_day = service.mark_dose_taken(mark(&created.id, "08:00", "Tue")).await;
        assert!(matches!(untracked_day, Err(ReminderError::NotFound(_))));

        let bad_day = service.mark_dose_taken(mark(&created.id, "08:00", "Moonday")).await;
        assert!(matches!(bad_day, Err(ReminderError::Validation { field: "days", .. })));

        let missing_day = service
            .mark_dose_taken(MarkDoseTakenCommand { weekday: None, ..mark(&created.id, "08:00", "Mon") })
            .await;
        assert!(matches!(missing_day, Err(ReminderError::Validation { field: "days", .. })));

        let unknown_id = service
            .mark_dose_taken(mark(&uuid::Uuid::new_v4().to_string(), "08:00", "Mon"))
            .await;
        assert!(matches!(unknown_id, Err(ReminderError::NotFound(_))));

        let stored = service.list_reminders_for_owner("ana").await.unwrap();
        assert_eq!(stored, vec![created]);
    }

    #[tokio::test]
    async fn test_marks_are_monotonic_and_keep_invariant() {
        let (_env, service) = create_test_service(Weekday::Mon).await;
        let days = ["Sun", "Tue", "Sat"];
        let times = ["06:00", "12:00", "18:00"];
        let id = service
            .create_reminder(create_command("ana", &days, &times))
            .await
            .unwrap()
            .reminder
            .id;

        let mut expected_taken: Vec<(String, Weekday)> = Vec::new();
        for day in days {
            for time in times.iter().rev() {
                let result = service.mark_dose_taken(mark(&id, time, day)).await.unwrap();
                expected_taken.push((time.to_string(), day.parse().unwrap()));

                assert!(result.reminder.rollup_is_consistent());
                for (t, d) in &expected_taken {
                    assert!(taken(&result.reminder, t, *d), "{} on {} flipped back", t, d);
                }
            }
        }

        let all = service.list_all_reminders().await.unwrap();
        assert!(all.reminders[0].day_completed.values().all(|done| *done));
    }

    #[tokio::test]
    async fn test_concurrent_marks_are_not_lost() {
        let (_env, service) = create_test_service(Weekday::Mon).await;
        let days = ["Mon", "Tue", "Wed", "Thu", "Fri"];
        let times = ["07:00", "13:00", "19:00", "23:00"];
        let id = service
            .create_reminder(create_command("ana", &days, &times))
            .await
            .unwrap()
            .reminder
            .id;

        let mut handles = Vec::new();
        for day in days {
            for time in times {
                let service = service.clone();
                let id = id.clone();
                handles.push(tokio::spawn(async move {
                    service.mark_dose_taken(mark(&id, time, day)).await
                }));
            }
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let reminder = service.list_reminders_for_owner("ana").await.unwrap().remove(0);
        for day in days {
            let day: Weekday = day.parse().unwrap();
            for time in times {
                assert!(taken(&reminder, time, day));
            }
            assert!(reminder.day_completed[&day]);
        }
    }

    #[tokio::test]
    async fn test_list_reminders_for_owner_scopes_results() {
        let (_env, service) = create_test_service(Weekday::Mon).await;
        service.create_reminder(create_command("ana", &["Mon"], &["08:00"])).await.unwrap();
        service.create_reminder(create_command("ben", &["Mon"], &["08:00"])).await.unwrap();

        let ana = service.list_reminders_for_owner("ana").await.unwrap();
        assert_eq!(ana.len(), 1);
        assert_eq!(ana[0].owner, "ana");

        assert!(matches!(
            service.list_reminders_for_owner(" ").await,
            Err(ReminderError::Validation { field: "username", .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_reminder_checks_owner_when_given() {
        let (_env, service) = create_test_service(Weekday::Mon).await;
        let id = service
            .create_reminder(create_command("ana", &["Mon"], &["08:00"]))
            .await
            .unwrap()
            .reminder
            .id;

        let denied = service
            .delete_reminder(DeleteReminderCommand { reminder_id: id.clone(), owner: Some("ben".to_string()) })
            .await;
        assert!(matches!(denied, Err(ReminderError::Authorization(_))));
        assert_eq!(service.list_reminders_for_owner("ana").await.unwrap().len(), 1);

        service
            .delete_reminder(DeleteReminderCommand { reminder_id: id.clone(), owner: Some("ana".to_string()) })
            .await
            .unwrap();
        assert!(service.list_reminders_for_owner("ana").await.unwrap().is_empty());

        let missing = service
            .delete_reminder(DeleteReminderCommand { reminder_id: id, owner: None })
            .await;
        assert!(matches!(missing, Err(ReminderError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_without_owner_skips_check() {
        let (_env, service) = create_test_service(Weekday::Mon).await;
        let id = service
            .create_reminder(create_command("ana", &["Mon"], &["08:00"]))
            .await
            .unwrap()
            .reminder
            .id;

        service
            .delete_reminder(DeleteReminderCommand { reminder_id: id, owner: Some(String::new()) })
            .await
            .unwrap();
        assert!(service.list_reminders_for_owner("ana").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_all_repairs_drifted_rollup() {
        let env = TestEnvironment::new().await.unwrap();
        let repo = env.reminder_repository();
        let service = ReminderService::new(Arc::new(repo.clone()), Arc::new(FixedClock::on(Weekday::Wed)));

        let id = service
            .create_reminder(create_command("ana", &["Mon", "Wed"], &["08:00", "20:00"]))
            .await
            .unwrap()
            .reminder
            .id;
        service.mark_dose_taken(mark(&id, "08:00", "Wed")).await.unwrap();
        service.mark_dose_taken(mark(&id, "20:00", "Wed")).await.unwrap();

        // Simulate stored data whose rollups drifted from the slots
        let mut drifted = repo.get_reminder(&id).await.unwrap().unwrap();
        drifted.day_completed.insert(Weekday::Wed, false);
        drifted.day_completed.insert(Weekday::Mon, true);
        repo.update_reminder(&drifted).await.unwrap();

        let result = service.list_all_reminders().await.unwrap();
        assert!(result.refresh_failures.is_empty());
        assert!(result.reminders[0].day_completed[&Weekday::Wed]);
        // Only today's rollup is swept
        assert!(result.reminders[0].day_completed[&Weekday::Mon]);
        assert!(taken(&result.reminders[0], "08:00", Weekday::Wed));

        let stored = repo.get_reminder(&id).await.unwrap().unwrap();
        assert!(stored.day_completed[&Weekday::Wed]);
    }

    #[tokio::test]
    async fn test_sweep_continues_past_storage_failure() {
        let env = TestEnvironment::new().await.unwrap();
        let repo = env.reminder_repository();
        let setup = ReminderService::new(Arc::new(repo.clone()), Arc::new(FixedClock::on(Weekday::Fri)));

        let mut ids = Vec::new();
        for owner in ["ana", "ben"] {
            let id = setup
                .create_reminder(create_command(owner, &["Fri"], &["08:00"]))
                .await
                .unwrap()
                .reminder
                .id;
            setup.mark_dose_taken(mark(&id, "08:00", "Fri")).await.unwrap();

            let mut drifted = repo.get_reminder(&id).await.unwrap().unwrap();
            drifted.day_completed.insert(Weekday::Fri, false);
            repo.update_reminder(&drifted).await.unwrap();
            ids.push(id);
        }

        let service = ReminderService::new(
            Arc::new(FailingWrites {
                inner: repo.clone(),
                poisoned_id: ids[0].clone(),
                reject_new: false,
            }),
            Arc::new(FixedClock::on(Weekday::Fri)),
        );
        let result = service.list_all_reminders().await.unwrap();

        assert_eq!(result.reminders.len(), 2);
        assert!(result.reminders.iter().all(|r| r.day_completed[&Weekday::Fri]));
        assert_eq!(result.refresh_failures.len(), 1);
        assert_eq!(result.refresh_failures[0].reminder_id, ids[0]);

        assert!(!repo.get_reminder(&ids[0]).await.unwrap().unwrap().day_completed[&Weekday::Fri]);
        assert!(repo.get_reminder(&ids[1]).await.unwrap().unwrap().day_completed[&Weekday::Fri]);
    }

    #[tokio::test]
    async fn test_sweep_ignores_reminders_not_active_today() {
        let (_env, service) = create_test_service(Weekday::Sun).await;
        let created = service
            .create_reminder(create_command("ana", &["Mon"], &["08:00"]))
            .await
            .unwrap()
            .reminder;

        let result = service.list_all_reminders().await.unwrap();
        assert_eq!(result.reminders, vec![created]);
        assert!(!result.reminders[0].day_completed.contains_key(&Weekday::Sun));
    }

    #[tokio::test]
    async fn test_create_reminder_surfaces_storage_errors() {
        let env = TestEnvironment::new().await.unwrap();
        let repo = env.reminder_repository();
        let service = ReminderService::new(
            Arc::new(FailingWrites {
                inner: repo.clone(),
                poisoned_id: String::new(),
                reject_new: true,
            }),
            Arc::new(FixedClock::on(Weekday::Mon)),
        );

        let result = service
            .create_reminder(create_command("ana", &["Mon"], &["08:00"]))
            .await;

        assert!(matches!(result, Err(ReminderError::Storage(_))));
        assert!(repo.list_reminders().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mark_dose_taken_surfaces_storage_errors() {
        let env = TestEnvironment::new().await.unwrap();
        let repo = env.reminder_repository();
        let setup = ReminderService::new(Arc::new(repo.clone()), Arc::new(FixedClock::on(Weekday::Mon)));
        let created = setup
            .create_reminder(create_command("ana", &["Mon"], &["08:00"]))
            .await
            .unwrap()
            .reminder;

        let service = ReminderService::new(
            Arc::new(FailingWrites {
                inner: repo.clone(),
                poisoned_id: created.id.clone(),
                reject_new: false,
            }),
            Arc::new(FixedClock::on(Weekday::Mon)),
        );
        let result = service.mark_dose_taken(mark(&created.id, "08:00", "Mon")).await;

        match result {
            Err(ReminderError::Storage(e)) => assert!(e.to_string().contains("write rejected")),
            other => panic!("expected storage error, got {:?}", other),
        }
        assert_eq!(repo.get_reminder(&created.id).await.unwrap(), Some(created));
        assert_eq!(service.locks.tracked(), 0);
    }

    #[tokio::test]
    async fn test_finished_calls_release_their_locks() {
        let (_env, service) = create_test_service(Weekday::Mon).await;

        for i in 0..50 {
            let bogus = service.mark_dose_taken(mark(&format!("bogus-{}", i), "08:00", "Mon")).await;
            assert!(matches!(bogus, Err(ReminderError::NotFound(_))));

            let gone = service
                .delete_reminder(DeleteReminderCommand {
                    reminder_id: uuid::Uuid::new_v4().to_string(),
                    owner: None,
                })
                .await;
            assert!(matches!(gone, Err(ReminderError::NotFound(_))));
        }
        assert_eq!(service.locks.tracked(), 0);

        let id = service
            .create_reminder(create_command("ana", &["Mon"], &["08:00"]))
            .await
            .unwrap()
            .reminder
            .id;
        service.mark_dose_taken(mark(&id, "08:00", "Mon")).await.unwrap();
        service.list_all_reminders().await.unwrap();
        service
            .delete_reminder(DeleteReminderCommand { reminder_id: id, owner: None })
            .await
            .unwrap();
        assert_eq!(service.locks.tracked(), 0);
    }
}
