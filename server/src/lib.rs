//! MediCare reminder service: recurring medication reminders with per-day
//! dose completion tracking, served over a small REST API.

pub mod backend;
