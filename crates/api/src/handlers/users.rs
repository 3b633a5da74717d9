//! Handlers for the `/users` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use trove_core::error::CoreError;
use trove_core::penalty::PenaltyView;
use trove_core::roles;
use trove_core::types::DbId;
use trove_db::models::user::{CreateUser, User};
use trove_db::repositories::UserRepo;

use crate::engine::penalty;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Request body for creating a user.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub display_name: String,
    pub role: Option<String>,
}

/// POST /api/v1/users
pub async fn create_user(
    State(state): State<AppState>,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<User>)> {
    if input.display_name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "display_name must not be empty".to_string(),
        )));
    }
    if let Some(ref role) = input.role {
        let known = role == roles::ROLE_USER || roles::is_staff(role);
        if !known {
            return Err(AppError::Core(CoreError::Validation(format!(
                "unknown role: {role}"
            ))));
        }
    }

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            display_name: input.display_name,
            role: input.role,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/v1/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<User>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;
    Ok(Json(user))
}

/// GET /api/v1/users/{id}/penalty-status
///
/// Effective penalty status at the current time: expired suspensions
/// read as lifted, staff always read as unrestricted.
pub async fn get_penalty_status(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<PenaltyView>> {
    let view = penalty::check_status(&state.pool, id, Utc::now())
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;
    Ok(Json(view))
}
