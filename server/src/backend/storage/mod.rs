//! # Storage Module
//!
//! Handles all data persistence operations for the reminder service.
//!
//! The domain layer only sees the [`ReminderStorage`] trait; the concrete
//! backend is a keyed document store. The shipped implementation keeps one
//! YAML document per reminder on the local filesystem.
//!
//! ## Key Responsibilities
//!
//! - **Data Persistence**: Saving reminder documents to disk
//! - **Data Retrieval**: Loading stored documents back into domain models
//! - **Storage Abstraction**: A single trait regardless of backend
//!
//! ## Design Principles
//!
//! - **Repository Pattern**: Clean separation between domain and data access
//! - **Dependency Inversion**: Domain depends on storage abstractions, not implementations
//! - **Testability**: Temp-directory backed environments for tests

pub mod traits;
pub mod yaml;

pub use traits::{Connection, ReminderStorage};
pub use yaml::{ReminderRepository, YamlConnection};
