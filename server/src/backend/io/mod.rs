//! # IO Module
//!
//! Provides the interface layer between API clients and the domain logic.
//!
//! This module translates HTTP requests into domain commands and domain
//! results back into the JSON the mobile client expects.
//!
//! ## Current Implementation
//!
//! - **Web Framework**: Axum for async HTTP handling
//! - **Serialization**: Serde for JSON serialization/deserialization
//! - **State Management**: Axum extractors for dependency injection
//! - **Error Handling**: Domain error variants mapped to HTTP status codes
//!
//! ## Supported Operations
//!
//! - **POST /addReminder**: Create a reminder
//! - **GET /reminders/{username}**: List a user's reminders
//! - **GET /reminders**: List all reminders after the rollup sweep
//! - **PATCH /reminders/{id}**: Mark a dose as taken
//! - **DELETE /reminders/{id}**: Delete a reminder
//! - **GET /api/remind/{username}**: A user's reminders in a success envelope
//! - **POST /api/logs**: Forward a client log line

pub mod rest;
