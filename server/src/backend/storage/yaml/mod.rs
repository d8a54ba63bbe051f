//! YAML document storage: one file per reminder under `{data}/reminders/`.

pub mod connection;
pub mod reminder_repository;

#[cfg(test)]
pub mod test_utils;

pub use connection::YamlConnection;
pub use reminder_repository::ReminderRepository;
