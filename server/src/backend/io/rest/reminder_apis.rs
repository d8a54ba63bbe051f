//! # REST API for Reminder Management
//!
//! Endpoints for creating, listing, completing and deleting medication
//! reminders. Paths and field names match the mobile client.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use tracing::{error, info, warn};

use crate::backend::domain::commands::reminder::DeleteReminderCommand;
use crate::backend::domain::ReminderError;
use crate::backend::io::rest::mappers::reminder_mapper::ReminderMapper;
use crate::backend::AppState;
use shared::{
    CreateReminderRequest, CreateReminderResponse, DeleteReminderQuery, MarkDoseTakenRequest,
    MarkDoseTakenResponse, MessageResponse, RemindResponse,
};

/// Create a router for reminder related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/addReminder", post(add_reminder))
        .route("/reminders", get(list_all_reminders))
        .route(
            "/reminders/:key",
            get(list_user_reminders)
                .patch(mark_dose_taken)
                .delete(delete_reminder),
        )
        .route("/api/remind/:username", get(get_remind))
}

fn message(status: StatusCode, text: impl Into<String>) -> Response {
    (status, Json(MessageResponse { message: text.into() })).into_response()
}

/// Translate a domain error into a status code and `{message}` body
fn error_response(context: &str, err: ReminderError) -> Response {
    match err {
        ReminderError::Validation { .. } => {
            warn!("{}: {}", context, err);
            message(StatusCode::BAD_REQUEST, err.to_string())
        }
        ReminderError::NotFound(text) => {
            warn!("{}: {}", context, text);
            message(StatusCode::NOT_FOUND, text)
        }
        ReminderError::Authorization(text) => {
            warn!("{}: {}", context, text);
            message(StatusCode::FORBIDDEN, text)
        }
        ReminderError::Storage(e) => {
            error!("{}: {:#}", context, e);
            message(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

fn rejection_response(context: &str, rejection: JsonRejection) -> Response {
    warn!("{}: {}", context, rejection.body_text());
    message(StatusCode::BAD_REQUEST, rejection.body_text())
}

/// Liveness probe
pub async fn api_status() -> &'static str {
    "API is running..."
}

/// Create a new reminder
pub async fn add_reminder(
    State(state): State<AppState>,
    payload: Result<Json<CreateReminderRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response("Error adding reminder", rejection),
    };
    info!("POST /addReminder - request: {:?}", request);

    let command = ReminderMapper::to_create_command(request);

    match state.reminder_service.create_reminder(command).await {
        Ok(result) => {
            let response = CreateReminderResponse {
                message: result.success_message,
                reminder_id: result.reminder.id.clone(),
                reminder: ReminderMapper::to_dto(result.reminder),
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => error_response("Error adding reminder", e),
    }
}

/// List reminders for one user
pub async fn list_user_reminders(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Response {
    info!("GET /reminders/{}", username);

    match state.reminder_service.list_reminders_for_owner(&username).await {
        Ok(reminders) => (StatusCode::OK, Json(ReminderMapper::to_dto_list(reminders))).into_response(),
        Err(e) => error_response("Error fetching reminders", e),
    }
}

/// List every reminder (admin), re-deriving today's rollups first
pub async fn list_all_reminders(State(state): State<AppState>) -> Response {
    info!("GET /reminders");

    match state.reminder_service.list_all_reminders().await {
        Ok(result) => {
            for failure in &result.refresh_failures {
                warn!(
                    "Rollup refresh failed for reminder {}: {}",
                    failure.reminder_id, failure.message
                );
            }
            (StatusCode::OK, Json(ReminderMapper::to_dto_list(result.reminders))).into_response()
        }
        Err(e) => error_response("Error fetching reminders", e),
    }
}

/// Mark one dose time as taken for a day
pub async fn mark_dose_taken(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<MarkDoseTakenRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response("Error updating reminder", rejection),
    };
    info!("PATCH /reminders/{} - request: {:?}", id, request);

    let command = ReminderMapper::to_mark_command(id, request);

    match state.reminder_service.mark_dose_taken(command).await {
        Ok(result) => {
            let response = MarkDoseTakenResponse {
                message: result.success_message,
                reminder: ReminderMapper::to_dto(result.reminder),
                all_times_completed_for_day: result.day_fully_completed,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response("Error updating reminder", e),
    }
}

/// Delete a reminder, checking ownership when `?username=` is given
pub async fn delete_reminder(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<DeleteReminderQuery>,
) -> Response {
    info!("DELETE /reminders/{} - query: {:?}", id, query);

    let command = DeleteReminderCommand {
        reminder_id: id,
        owner: query.username,
    };

    match state.reminder_service.delete_reminder(command).await {
        Ok(()) => message(StatusCode::OK, "Reminder deleted successfully"),
        Err(e) => error_response("Error deleting reminder", e),
    }
}

/// Reminders for one user wrapped in a success envelope
pub async fn get_remind(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/remind/{}", username);

    match state.reminder_service.list_reminders_for_owner(&username).await {
        Ok(reminders) => (
            StatusCode::OK,
            Json(RemindResponse {
                success: true,
                reminders: Some(ReminderMapper::to_dto_list(reminders)),
                error: None,
            }),
        ),
        Err(e) => {
            let status = match &e {
                ReminderError::Validation { .. } => {
                    warn!("Error fetching reminders: {}", e);
                    StatusCode::BAD_REQUEST
                }
                _ => {
                    error!("Error fetching reminders: {:#}", e);
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            };
            (
                status,
                Json(RemindResponse {
                    success: false,
                    reminders: None,
                    error: Some("Failed to fetch reminders".to_string()),
                }),
            )
        }
    }
}
