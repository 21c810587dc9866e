use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `roadmap_text` and `tasks_checklist` are opaque free text persisted
/// verbatim; the report path parses the checklist (see report::checklist).
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub title: String,
    pub description: String,
    pub deadline: Option<NaiveDate>,
    pub created_by: Uuid,
    pub roadmap_text: String,
    pub tasks_checklist: String,
    pub created_at: DateTime<Utc>,
}

/// A project joined with its organization's name, as returned by
/// `GET /api/projects/{id}`.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct ProjectDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub project: Project,
    pub organization_name: String,
}

/// Join row granting a user a role over a project.
/// `manager` gates project deletion.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct ProjectMember {
    pub project_id: Uuid,
    pub user_id: Uuid,
    pub role: String,
}

pub const PROJECT_ROLE_MANAGER: &str = "manager";
pub const PROJECT_ROLE_MEMBER: &str = "member";
