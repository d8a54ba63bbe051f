//! # Domain Module
//!
//! Contains all business logic for the medication reminder service.
//!
//! This module encapsulates the reminder schedule model, the dose completion
//! state machine and the service operating on them. It is independent of the
//! HTTP layer and of any specific storage engine.
//!
//! ## Module Organization
//!
//! - **models**: Weekday codes and the reminder schedule with its rollup rule
//! - **reminder_service**: Create, list, mark-taken, delete and the rollup sweep
//! - **schedule_locks**: Per-reminder serialization of read-modify-write cycles
//! - **clock**: Injected source of the current instant and weekday
//! - **commands**: Internal command and result types
//! - **errors**: Validation / not found / authorization / storage taxonomy
//!
//! ## Core Concepts
//!
//! - **Dose time**: One daily slot, tracked per weekday (pending or taken)
//! - **Rollup**: Per-day flag, true when every dose time is taken for that day
//! - **Sweep**: Re-derivation of today's rollup across all reminders

pub mod clock;
pub mod commands;
pub mod errors;
pub mod models;
pub mod reminder_service;
pub mod schedule_locks;

pub use clock::{Clock, FixedClock, SystemClock};
pub use errors::{ReminderError, ReminderResult};
pub use reminder_service::*;
