//! Source of "now" for the reminder service.

use chrono::{DateTime, Datelike, Local, Utc};

use super::models::weekday::Weekday;

pub trait Clock: Send + Sync {
    /// Current instant, used for creation timestamps
    fn now(&self) -> DateTime<Utc>;

    /// Weekday the sweep treats as today
    fn today(&self) -> Weekday;
}

/// Reads the machine clock. "Today" follows the local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> Weekday {
        Local::now().weekday().into()
    }
}

/// Clock pinned to a single instant and weekday
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    pub now: DateTime<Utc>,
    pub today: Weekday,
}

impl FixedClock {
    pub fn on(today: Weekday) -> Self {
        Self { now: Utc::now(), today }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn today(&self) -> Weekday {
        self.today
    }
}
