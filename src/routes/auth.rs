use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::{Claims, Role, encode_token};
use crate::auth::password;
use crate::db;
use crate::error::AppError;
use crate::models::user::PublicUser;
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: PublicUser,
}

pub async fn signup(
    State(state): State<SharedState>,
    Json(req): Json<SignupRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    if req.email.is_empty() || req.password.is_empty() || req.full_name.is_empty() {
        return Err(AppError::BadRequest("All fields are required".to_string()));
    }

    if db::users::find_by_email(&state.pool, &req.email)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let pw_hash = password::hash(&req.password).map_err(AppError::Internal)?;

    // Every signup gets the same role; any caller-supplied value is ignored.
    let role = Role::ProjectManager;
    let user = db::users::create(&state.pool, &req.email, &pw_hash, &req.full_name, role.as_str())
        .await?;

    let token = encode_token(&Claims::new(user.id, role), &state.config.jwt_secret)
        .map_err(AppError::Internal)?;

    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

pub async fn login(
    State(state): State<SharedState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    // Unknown email and wrong password are indistinguishable to the caller.
    let user = db::users::find_by_email(&state.pool, &req.email)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

    let valid = password::verify(&req.password, &user.password_hash).map_err(AppError::Internal)?;
    if !valid {
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    let token = encode_token(
        &Claims::new(user.id, Role::ProjectManager),
        &state.config.jwt_secret,
    )
    .map_err(AppError::Internal)?;

    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}
