//! # REST API Interface Layer
//!
//! Provides HTTP REST endpoints for the reminder service.
//! This layer handles:
//! - HTTP request/response serialization and deserialization
//! - Error translation from domain to HTTP status codes
//! - Request logging
//!
//! ## Design Principles
//!
//! - **Client Compatibility**: Paths and JSON field names follow the mobile client
//! - **Error Transparency**: Clear messages for caller mistakes, generic ones for server faults
//! - **Domain Separation**: Pure translation layer without business logic

pub mod mappers;
pub mod reminder_apis;
