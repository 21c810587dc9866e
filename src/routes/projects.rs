use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::models::project::ProjectDetail;
use crate::models::{Project, Task};
use crate::report::{analytics, checklist::Checklist, pdf};
use crate::routes::users::MessageResponse;
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct CreateProjectRequest {
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub roadmap_text: Option<String>,
    #[serde(default)]
    pub tasks_checklist: Option<String>,
}

pub async fn create(
    State(state): State<SharedState>,
    auth: AuthUser,
    Path(org_id): Path<Uuid>,
    Json(req): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<Project>), AppError> {
    if !db::organizations::is_member(&state.pool, org_id, auth.user_id).await? {
        return Err(AppError::Forbidden(
            "You are not a member of this organization".to_string(),
        ));
    }

    let title = req
        .title
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::BadRequest("Project title is required".to_string()))?;

    let project = db::projects::create(
        &state.pool,
        org_id,
        auth.user_id,
        title,
        req.description.as_deref().unwrap_or_default(),
        req.deadline,
        req.roadmap_text.as_deref().unwrap_or_default(),
        req.tasks_checklist.as_deref().unwrap_or_default(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(project)))
}

#[derive(Deserialize)]
pub struct ListProjectsQuery {
    #[serde(default)]
    pub include_tasks: bool,
}

#[derive(Serialize)]
pub struct ProjectListing {
    #[serde(flatten)]
    pub project: Project,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<Task>>,
}

pub async fn list(
    State(state): State<SharedState>,
    auth: AuthUser,
    Path(org_id): Path<Uuid>,
    Query(query): Query<ListProjectsQuery>,
) -> Result<Json<Vec<ProjectListing>>, AppError> {
    if !db::organizations::is_member(&state.pool, org_id, auth.user_id).await? {
        return Err(AppError::Forbidden(
            "You are not a member of this organization".to_string(),
        ));
    }

    let projects = db::projects::list_by_org(&state.pool, org_id).await?;

    let mut listings = Vec::with_capacity(projects.len());
    for project in projects {
        let tasks = if query.include_tasks {
            let mut tasks = db::tasks::list_by_project(&state.pool, project.id).await?;
            for task in &mut tasks {
                task.normalize();
            }
            Some(tasks)
        } else {
            None
        };
        listings.push(ProjectListing { project, tasks });
    }

    Ok(Json(listings))
}

pub async fn get(
    State(state): State<SharedState>,
    auth: AuthUser,
    Path(project_id): Path<Uuid>,
) -> Result<Json<ProjectDetail>, AppError> {
    let detail = db::projects::find_detail(&state.pool, project_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;

    if !db::organizations::is_member(&state.pool, detail.project.organization_id, auth.user_id)
        .await?
    {
        return Err(AppError::NotFound(
            "Project not found or access denied".to_string(),
        ));
    }

    Ok(Json(detail))
}

pub async fn delete(
    State(state): State<SharedState>,
    auth: AuthUser,
    Path(project_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    if !db::projects::is_manager(&state.pool, project_id, auth.user_id).await? {
        return Err(AppError::Forbidden(
            "You do not have permission to delete this project".to_string(),
        ));
    }

    db::projects::delete_cascade(&state.pool, project_id).await?;

    Ok(Json(MessageResponse {
        message: "Project deleted successfully".to_string(),
    }))
}

#[derive(Deserialize)]
pub struct SaveTasksRequest {
    pub tasks: Option<Value>,
}

#[derive(Serialize)]
pub struct SaveTasksResponse {
    pub message: String,
    pub tasks: Value,
}

/// Persist a client-held task list into the project's checklist column,
/// serialized as JSON.
pub async fn save_tasks_progress(
    State(state): State<SharedState>,
    auth: AuthUser,
    Path(project_id): Path<Uuid>,
    Json(req): Json<SaveTasksRequest>,
) -> Result<Json<SaveTasksResponse>, AppError> {
    let tasks = req
        .tasks
        .ok_or_else(|| AppError::BadRequest("No tasks provided".to_string()))?;

    let project = require_member_project(&state, project_id, auth.user_id).await?;

    let tasks_json = serde_json::to_string(&tasks)
        .map_err(|e| AppError::Internal(format!("Failed to serialize tasks: {e}")))?;
    db::projects::update_checklist(&state.pool, project.id, &tasks_json).await?;

    Ok(Json(SaveTasksResponse {
        message: "Tasks progress saved successfully".to_string(),
        tasks,
    }))
}

pub async fn generate_report(
    State(state): State<SharedState>,
    auth: AuthUser,
    Path(project_id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let detail = db::projects::find_detail(&state.pool, project_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;

    if !db::organizations::is_member(&state.pool, detail.project.organization_id, auth.user_id)
        .await?
    {
        return Err(AppError::NotFound(
            "Project not found or access denied".to_string(),
        ));
    }

    let tasks: Vec<Task> = db::projects::tasks_with_assignees(&state.pool, project_id)
        .await?
        .into_iter()
        .map(|t| t.task)
        .collect();

    let now = Utc::now();
    let parsed = Checklist::parse(&detail.project.tasks_checklist);
    let metrics = analytics::compute(
        &tasks,
        &parsed,
        detail.project.created_at,
        detail.project.deadline,
        now,
    );

    let bytes = pdf::render_report(&detail, &metrics, now)
        .map_err(|e| AppError::Internal(format!("Failed to generate report: {e}")))?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        pdf::report_filename(&detail.project.title, now)
    );

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}

/// Resolve a project the user may act on through org membership. Absence and
/// lack of access share one answer.
pub async fn require_member_project(
    state: &SharedState,
    project_id: Uuid,
    user_id: Uuid,
) -> Result<Project, AppError> {
    let project = db::projects::find_by_id(&state.pool, project_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found or access denied".to_string()))?;

    if !db::organizations::is_member(&state.pool, project.organization_id, user_id).await? {
        return Err(AppError::NotFound(
            "Project not found or access denied".to_string(),
        ));
    }

    Ok(project)
}
