use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::models::Organization;
use crate::routes::users::MessageResponse;
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct OrganizationPayload {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

pub async fn create(
    State(state): State<SharedState>,
    auth: AuthUser,
    Json(req): Json<OrganizationPayload>,
) -> Result<Json<Organization>, AppError> {
    if req.name.is_empty() {
        return Err(AppError::BadRequest(
            "Organization name is required".to_string(),
        ));
    }

    let org = db::organizations::create(
        &state.pool,
        auth.user_id,
        &req.name,
        req.description.as_deref().unwrap_or_default(),
    )
    .await?;

    Ok(Json(org))
}

pub async fn list(
    State(state): State<SharedState>,
    auth: AuthUser,
) -> Result<Json<Vec<Organization>>, AppError> {
    let orgs = db::organizations::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(orgs))
}

pub async fn get(
    State(state): State<SharedState>,
    auth: AuthUser,
    Path(org_id): Path<Uuid>,
) -> Result<Json<Organization>, AppError> {
    let org = db::organizations::find_for_member(&state.pool, org_id, auth.user_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound("Organization not found or you do not have access".to_string())
        })?;

    Ok(Json(org))
}

pub async fn update(
    State(state): State<SharedState>,
    auth: AuthUser,
    Path(org_id): Path<Uuid>,
    Json(req): Json<OrganizationPayload>,
) -> Result<Json<Organization>, AppError> {
    if !db::organizations::is_admin(&state.pool, org_id, auth.user_id).await? {
        return Err(AppError::Forbidden(
            "You do not have permission to update this organization".to_string(),
        ));
    }

    if req.name.is_empty() {
        return Err(AppError::BadRequest(
            "Organization name is required".to_string(),
        ));
    }

    let org = db::organizations::update(
        &state.pool,
        org_id,
        &req.name,
        req.description.as_deref().unwrap_or_default(),
    )
    .await?
    .ok_or_else(|| AppError::NotFound("Organization not found".to_string()))?;

    Ok(Json(org))
}

pub async fn delete(
    State(state): State<SharedState>,
    auth: AuthUser,
    Path(org_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    if !db::organizations::is_admin(&state.pool, org_id, auth.user_id).await? {
        return Err(AppError::Forbidden(
            "You do not have permission to delete this organization".to_string(),
        ));
    }

    db::organizations::delete_cascade(&state.pool, org_id).await?;

    Ok(Json(MessageResponse {
        message: "Organization deleted successfully".to_string(),
    }))
}
