use axum::extract::{Path, State};
use axum::Json;

use crate::db::models::{DeleteAck, Role, UpdateAck, User};
use crate::error::AppError;
use crate::state::AppState;

/// `GET /users`
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(state.user_repo.list().await?))
}

/// `PATCH /users/{email}/author`
pub async fn promote_author(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<UpdateAck>, AppError> {
    let outcome = state.user_repo.set_role(&email, Role::Author).await?;
    Ok(Json(outcome.into()))
}

/// `PATCH /users/{email}/admin`
pub async fn promote_admin(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<UpdateAck>, AppError> {
    let outcome = state.user_repo.set_role(&email, Role::Admin).await?;
    Ok(Json(outcome.into()))
}

/// `PUT /users` — replace-or-create the profile keyed by email.
pub async fn upsert_profile(
    State(state): State<AppState>,
    Json(user): Json<User>,
) -> Result<Json<UpdateAck>, AppError> {
    if user.email.trim().is_empty() {
        return Err(AppError::Validation("Email cannot be empty".into()));
    }

    let outcome = state.user_repo.upsert_profile(user).await?;
    Ok(Json(outcome.into()))
}

/// `DELETE /users/{email}` — idempotent; a second delete acknowledges zero.
pub async fn remove(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<DeleteAck>, AppError> {
    let deleted = state.user_repo.delete(&email).await?;

    Ok(Json(DeleteAck {
        acknowledged: true,
        deleted_count: deleted,
    }))
}
