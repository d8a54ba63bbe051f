//! # Backend Module
//!
//! Contains all non-UI logic for the medication reminder service.
//!
//! This module serves as the orchestration layer that brings together:
//! - **Domain**: Reminder schedules, dose completion and rollup rules
//! - **Storage**: Document persistence for reminders
//! - **IO**: REST interface exposing the domain to clients
//!
//! ## Architecture
//!
//! ```text
//! Mobile client
//!     ↓
//! IO Layer (REST API, handlers, mappers)
//!     ↓
//! Domain Layer (ReminderService, models)
//!     ↓
//! Storage Layer (YAML document store)
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::Result;
use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};

use crate::backend::config::AppConfig;
use crate::backend::domain::{Clock, ReminderService, SystemClock};
use crate::backend::io::rest::reminder_apis;
use crate::backend::storage::{Connection, YamlConnection};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub reminder_service: ReminderService,
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    initialize_backend_with_clock(config, Arc::new(SystemClock)).await
}

/// Initialize the backend with an explicit clock
pub async fn initialize_backend_with_clock(config: &AppConfig, clock: Arc<dyn Clock>) -> Result<AppState> {
    info!("Setting up data directory: {}", config.data_directory.display());
    let connection = YamlConnection::new(&config.data_directory)?;

    info!("Setting up domain model");
    let reminder_repository = connection.create_reminder_repository();
    let reminder_service = ReminderService::new(Arc::new(reminder_repository), clock);

    Ok(AppState { reminder_service })
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, cors_origin: Option<&str>) -> Router {
    let allow_origin = match cors_origin.map(|origin| origin.parse::<HeaderValue>()) {
        Some(Ok(origin)) => AllowOrigin::exact(origin),
        Some(Err(e)) => {
            warn!("Ignoring invalid CORS origin ({}), allowing any origin", e);
            AllowOrigin::any()
        }
        None => AllowOrigin::any(),
    };

    let cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers(Any);

    Router::new()
        .route("/", get(reminder_apis::api_status))
        .merge(reminder_apis::router())
        .layer(cors)
        .with_state(app_state)
}
