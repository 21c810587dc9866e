use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::auth::extractor::AuthUser;
use crate::auth::password;
use crate::db;
use crate::error::AppError;
use crate::models::user::PublicUser;
use crate::state::SharedState;

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

pub async fn get_profile(
    State(state): State<SharedState>,
    auth: AuthUser,
) -> Result<Json<PublicUser>, AppError> {
    let user = db::users::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(user.into()))
}

#[derive(Deserialize)]
pub struct ProfileUpdateRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

pub async fn update_profile(
    State(state): State<SharedState>,
    auth: AuthUser,
    Json(req): Json<ProfileUpdateRequest>,
) -> Result<Json<PublicUser>, AppError> {
    if let Some(email) = req.email.as_deref().filter(|e| !e.is_empty()) {
        if db::users::email_taken_by_other(&state.pool, email, auth.user_id).await? {
            return Err(AppError::Conflict("Email already in use".to_string()));
        }
    }

    // A blank password is treated as absent rather than set.
    let password = req.password.as_deref().filter(|p| !p.is_empty());
    let pw_hash = match password {
        Some(p) => Some(password::hash(p).map_err(AppError::Internal)?),
        None => None,
    };

    if req.full_name.is_none() && req.email.is_none() && pw_hash.is_none() {
        return Err(AppError::BadRequest("No fields to update".to_string()));
    }

    let user = db::users::update_profile(
        &state.pool,
        auth.user_id,
        req.full_name.as_deref(),
        req.email.as_deref(),
        pw_hash.as_deref(),
    )
    .await?
    .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(user.into()))
}

pub async fn delete_account(
    State(state): State<SharedState>,
    auth: AuthUser,
) -> Result<Json<MessageResponse>, AppError> {
    db::users::delete_account_cascade(&state.pool, auth.user_id).await?;

    Ok(Json(MessageResponse {
        message: "User account deleted successfully".to_string(),
    }))
}
