use shared::{CreateReminderRequest, MarkDoseTakenRequest, Reminder, ReminderTime};
use std::collections::BTreeMap;

use crate::backend::domain::commands::reminder::{CreateReminderCommand, MarkDoseTakenCommand};
use crate::backend::domain::models::reminder::{DoseSlot, ReminderSchedule};
use crate::backend::domain::models::weekday::Weekday;

pub struct ReminderMapper;

impl ReminderMapper {
    fn day_map_to_dto(map: &BTreeMap<Weekday, bool>) -> BTreeMap<String, bool> {
        map.iter().map(|(day, done)| (day.code().to_string(), *done)).collect()
    }

    /// Convert domain ReminderSchedule to shared Reminder DTO
    pub fn to_dto(reminder: ReminderSchedule) -> Reminder {
        Reminder {
            days: reminder.weekdays.iter().map(|day| day.code().to_string()).collect(),
            times: reminder
                .dose_times
                .iter()
                .map(|dose_time| ReminderTime {
                    time: dose_time.time_label.clone(),
                    dose: dose_time.dose,
                    completed: Self::day_map_to_dto(&dose_time.completed_by_day),
                })
                .collect(),
            completed: Self::day_map_to_dto(&reminder.day_completed),
            created_at: reminder.created_at.to_rfc3339(),
            id: reminder.id,
            username: reminder.owner,
            name: reminder.name,
            description: reminder.description,
            total_doses: reminder.total_doses,
        }
    }

    pub fn to_dto_list(reminders: Vec<ReminderSchedule>) -> Vec<Reminder> {
        reminders.into_iter().map(Self::to_dto).collect()
    }

    /// Convert `POST /addReminder` body to a domain command
    pub fn to_create_command(request: CreateReminderRequest) -> CreateReminderCommand {
        CreateReminderCommand {
            owner: request.username,
            name: request.name,
            description: request.description,
            weekdays: request.days,
            dose_slots: request.times.map(|times| {
                times
                    .into_iter()
                    .map(|time| DoseSlot {
                        time_label: time.time,
                        dose: time.dose,
                    })
                    .collect()
            }),
            total_doses: request.total_doses,
        }
    }

    /// Convert `PATCH /reminders/{id}` body to a domain command
    pub fn to_mark_command(reminder_id: String, request: MarkDoseTakenRequest) -> MarkDoseTakenCommand {
        MarkDoseTakenCommand {
            reminder_id,
            weekday: request.days.first().map(str::to_string),
            time_label: request.time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::models::reminder::NewReminder;
    use chrono::Utc;
    use shared::{DaySelector, ReminderTimeInput};

    #[test]
    fn test_to_dto_uses_day_codes() {
        let mut reminder = ReminderSchedule::new(NewReminder {
            id: "id-1".to_string(),
            owner: "ana".to_string(),
            name: "Ibuprofen".to_string(),
            description: "as needed".to_string(),
            weekdays: [Weekday::Wed, Weekday::Sun].into_iter().collect(),
            slots: vec![DoseSlot { time_label: "08:00".to_string(), dose: Some(2) }],
            total_doses: 10,
            created_at: Utc::now(),
        });
        reminder.mark_taken("08:00", Weekday::Sun).unwrap();

        let dto = ReminderMapper::to_dto(reminder);

        assert_eq!(dto.id, "id-1");
        assert_eq!(dto.username, "ana");
        assert_eq!(dto.days, vec!["Sun".to_string(), "Wed".to_string()]);
        assert_eq!(dto.times[0].dose, Some(2));
        assert_eq!(dto.times[0].completed["Sun"], true);
        assert_eq!(dto.times[0].completed["Wed"], false);
        assert_eq!(dto.completed["Sun"], true);
        assert_eq!(dto.total_doses, 10);
    }

    #[test]
    fn test_create_command_keeps_missing_fields_missing() {
        let command = ReminderMapper::to_create_command(CreateReminderRequest {
            username: Some("ana".to_string()),
            times: Some(vec![ReminderTimeInput { time: "09:00".to_string(), dose: None }]),
            ..Default::default()
        });

        assert_eq!(command.owner.as_deref(), Some("ana"));
        assert!(command.name.is_none());
        assert!(command.weekdays.is_none());
        assert!(command.total_doses.is_none());
        assert_eq!(command.dose_slots.unwrap()[0].time_label, "09:00");
    }

    #[test]
    fn test_mark_command_takes_first_day() {
        let command = ReminderMapper::to_mark_command(
            "id-1".to_string(),
            MarkDoseTakenRequest {
                time: "08:00".to_string(),
                days: DaySelector::Many(vec!["Tue".to_string(), "Thu".to_string()]),
            },
        );
        assert_eq!(command.weekday.as_deref(), Some("Tue"));
        assert_eq!(command.time_label, "08:00");
    }
}
