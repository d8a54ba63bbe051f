//! Domain model for a recurring medication reminder.
//!
//! A reminder is active on a set of weekdays and has one or more daily dose
//! slots. Each slot tracks whether it was taken on each active weekday, and the
//! reminder keeps a per-day rollup that is true exactly when every slot is
//! taken for that day. The rollup is always re-derived from the slots, never
//! written on its own.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

use super::weekday::Weekday;

/// One daily dose slot and its completion per weekday
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoseTime {
    pub time_label: String,
    /// Quantity per intake as entered by the user; carried through untouched
    pub dose: Option<i64>,
    pub completed_by_day: BTreeMap<Weekday, bool>,
}

impl DoseTime {
    pub fn is_taken_on(&self, day: Weekday) -> bool {
        self.completed_by_day.get(&day).copied().unwrap_or(false)
    }
}

/// Slot definition supplied when a reminder is created
#[derive(Debug, Clone, PartialEq)]
pub struct DoseSlot {
    pub time_label: String,
    pub dose: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderSchedule {
    pub id: String,
    pub owner: String,
    pub name: String,
    pub description: String,
    pub weekdays: BTreeSet<Weekday>,
    pub dose_times: Vec<DoseTime>,
    pub total_doses: i64,
    pub day_completed: BTreeMap<Weekday, bool>,
    pub created_at: DateTime<Utc>,
}

/// What a mark-taken call did to the schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkOutcome {
    /// False when the slot was already taken and the rollup already matched
    pub changed: bool,
    /// Every slot is taken for the requested day
    pub day_completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarkError {
    #[error("Time '{0}' not found on this reminder")]
    UnknownTimeLabel(String),
    #[error("Day '{0}' is not scheduled on this reminder")]
    UntrackedDay(Weekday),
}

/// Identity and slots of a schedule about to be created
#[derive(Debug, Clone)]
pub struct NewReminder {
    pub id: String,
    pub owner: String,
    pub name: String,
    pub description: String,
    pub weekdays: BTreeSet<Weekday>,
    pub slots: Vec<DoseSlot>,
    pub total_doses: i64,
    pub created_at: DateTime<Utc>,
}

impl ReminderSchedule {
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// Build a fresh schedule with every slot pending on every weekday.
    pub fn new(params: NewReminder) -> Self {
        let NewReminder {
            id,
            owner,
            name,
            description,
            weekdays,
            slots,
            total_doses,
            created_at,
        } = params;
        let pending: BTreeMap<Weekday, bool> = weekdays.iter().map(|day| (*day, false)).collect();

        let dose_times = slots
            .into_iter()
            .map(|slot| DoseTime {
                time_label: slot.time_label,
                dose: slot.dose,
                completed_by_day: pending.clone(),
            })
            .collect();

        Self {
            id,
            owner,
            name,
            description,
            weekdays,
            dose_times,
            total_doses,
            day_completed: pending,
            created_at,
        }
    }

    pub fn tracks(&self, day: Weekday) -> bool {
        self.weekdays.contains(&day)
    }

    /// AND over every slot's flag for `day`.
    pub fn all_taken_on(&self, day: Weekday) -> bool {
        self.tracks(day)
            && !self.dose_times.is_empty()
            && self.dose_times.iter().all(|dose_time| dose_time.is_taken_on(day))
    }

    /// Re-derive `day_completed[day]` from the slots. Returns whether the
    /// stored flag changed. Days outside the schedule are left alone.
    pub fn refresh_rollup(&mut self, day: Weekday) -> bool {
        if !self.tracks(day) {
            return false;
        }
        let derived = self.all_taken_on(day);
        let previous = self.day_completed.insert(day, derived);
        previous != Some(derived)
    }

    /// True when every active day's rollup matches its slots
    pub fn rollup_is_consistent(&self) -> bool {
        self.weekdays
            .iter()
            .all(|day| self.day_completed.get(day).copied().unwrap_or(false) == self.all_taken_on(*day))
    }

    /// Flip one slot to taken for `day` and re-derive that day's rollup.
    /// Taking an already-taken slot is a no-op.
    pub fn mark_taken(&mut self, time_label: &str, day: Weekday) -> Result<MarkOutcome, MarkError> {
        let index = self
            .dose_times
            .iter()
            .position(|dose_time| dose_time.time_label == time_label)
            .ok_or_else(|| MarkError::UnknownTimeLabel(time_label.to_string()))?;

        if !self.tracks(day) {
            return Err(MarkError::UntrackedDay(day));
        }

        let flag = self.dose_times[index]
            .completed_by_day
            .get_mut(&day)
            .ok_or(MarkError::UntrackedDay(day))?;
        let slot_changed = !*flag;
        *flag = true;

        let rollup_changed = self.refresh_rollup(day);

        Ok(MarkOutcome {
            changed: slot_changed || rollup_changed,
            day_completed: self.all_taken_on(day),
        })
    }
}
