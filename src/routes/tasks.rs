use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::models::Task;
use crate::models::task::{NewTask, TaskPatch};
use crate::routes::projects::require_member_project;
use crate::routes::users::MessageResponse;
use crate::state::SharedState;

pub async fn create(
    State(state): State<SharedState>,
    auth: AuthUser,
    Path(project_id): Path<Uuid>,
    Json(req): Json<NewTask>,
) -> Result<(StatusCode, Json<Task>), AppError> {
    let project = require_member_project(&state, project_id, auth.user_id).await?;

    if req.title.as_deref().unwrap_or_default().is_empty() {
        return Err(AppError::BadRequest("Task title is required".to_string()));
    }

    let task = db::tasks::insert(&state.pool, project.id, &req).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn list(
    State(state): State<SharedState>,
    auth: AuthUser,
    Path(project_id): Path<Uuid>,
) -> Result<Json<Vec<Task>>, AppError> {
    let project = require_member_project(&state, project_id, auth.user_id).await?;

    let tasks = db::tasks::list_by_project(&state.pool, project.id).await?;
    Ok(Json(tasks))
}

pub async fn update(
    State(state): State<SharedState>,
    auth: AuthUser,
    Path(task_id): Path<Uuid>,
    Json(patch): Json<TaskPatch>,
) -> Result<Json<Task>, AppError> {
    // Title is mandatory on every update, including partial edits.
    let title = patch
        .title
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::BadRequest("Task title is required".to_string()))?;

    let existing = db::tasks::find_by_id(&state.pool, task_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".to_string()))?;
    require_member_project(&state, existing.project_id, auth.user_id).await?;

    let task = db::tasks::update(&state.pool, task_id, title, &patch)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}

pub async fn delete(
    State(state): State<SharedState>,
    auth: AuthUser,
    Path(task_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    let existing = db::tasks::find_by_id(&state.pool, task_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".to_string()))?;
    require_member_project(&state, existing.project_id, auth.user_id).await?;

    db::tasks::delete(&state.pool, task_id).await?;

    Ok(Json(MessageResponse {
        message: "Task deleted".to_string(),
    }))
}
