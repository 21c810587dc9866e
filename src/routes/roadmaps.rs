use axum::Json;
use axum::extract::{Path, State};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::roadmap::client::RoadmapContent;
use crate::roadmap::prompt;
use crate::state::SharedState;

#[derive(Deserialize, Default)]
pub struct TempRoadmapRequest {
    #[serde(default)]
    pub project_title: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub project_description: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub problem_statement: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub project_complexity: Option<String>,
    #[serde(default)]
    pub development_methodology: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
}

fn first_non_empty<'a>(a: Option<&'a str>, b: Option<&'a str>) -> &'a str {
    a.filter(|s| !s.is_empty())
        .or(b.filter(|s| !s.is_empty()))
        .unwrap_or_default()
}

/// Draft a roadmap without persisting anything. Unauthenticated: the endpoint
/// exists for pre-signup project scoping and touches no stored data.
pub async fn temp_roadmap(
    State(state): State<SharedState>,
    Json(req): Json<TempRoadmapRequest>,
) -> Result<Json<RoadmapContent>, AppError> {
    let title = first_non_empty(req.project_title.as_deref(), req.title.as_deref());
    let custom_prompt = req.prompt.as_deref().unwrap_or_default();

    if title.is_empty() && custom_prompt.is_empty() {
        return Err(AppError::BadRequest(
            "Either project title or custom prompt is required".to_string(),
        ));
    }

    if !custom_prompt.is_empty() {
        let roadmap = state.roadmap.draft_custom(custom_prompt).await;
        return Ok(Json(roadmap));
    }

    let context = format!(
        "Project Title: {title}\n\
         Description: {}\n\
         Priority: {}\n\
         Deadline: {}\n\
         Requirements/Goals: {}\n\
         Project Complexity: {}\n\
         Development Methodology: {}",
        first_non_empty(req.project_description.as_deref(), req.description.as_deref()),
        req.priority.as_deref().unwrap_or("Medium"),
        req.deadline.as_deref().unwrap_or_default(),
        req.problem_statement.as_deref().unwrap_or_default(),
        req.project_complexity.as_deref().unwrap_or("medium"),
        req.development_methodology.as_deref().unwrap_or("Agile"),
    );

    let full_prompt = prompt::build_prompt(&context, Utc::now().date_naive());
    let roadmap = state.roadmap.draft(&full_prompt).await;
    Ok(Json(roadmap))
}

#[derive(Deserialize, Default)]
pub struct GenerateRoadmapRequest {
    #[serde(default)]
    pub requirements: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
}

/// Draft a roadmap for a persisted project, folding current task progress
/// into the context.
pub async fn generate_for_project(
    State(state): State<SharedState>,
    auth: AuthUser,
    Path(project_id): Path<Uuid>,
    Json(req): Json<GenerateRoadmapRequest>,
) -> Result<Json<RoadmapContent>, AppError> {
    let project =
        crate::routes::projects::require_member_project(&state, project_id, auth.user_id).await?;

    let (total, completed) = db::tasks::progress_counts(&state.pool, project.id).await?;
    let completion = if total > 0 {
        completed as f64 / total as f64 * 100.0
    } else {
        0.0
    };

    let context = format!(
        "Project Title: {}\n\
         Description: {}\n\
         Deadline: {}\n\
         Priority: {}\n\
         Current Progress: {completion:.1}% complete ({completed}/{total} tasks)\n\
         \n\
         Requirements/Goals: {}",
        project.title,
        project.description,
        project
            .deadline
            .map(|d| d.to_string())
            .unwrap_or_default(),
        req.priority.as_deref().unwrap_or("medium"),
        req.requirements.as_deref().unwrap_or_default(),
    );

    let full_prompt = prompt::build_prompt(&context, Utc::now().date_naive());
    let roadmap = state.roadmap.draft(&full_prompt).await;
    Ok(Json(roadmap))
}
