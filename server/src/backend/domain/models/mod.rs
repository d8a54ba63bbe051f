pub mod reminder;
pub mod weekday;
