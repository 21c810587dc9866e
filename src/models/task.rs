use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const STATUS_TODO: &str = "todo";
pub const STATUS_IN_PROGRESS: &str = "in_progress";
pub const STATUS_COMPLETED: &str = "completed";

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub description: String,
    pub status: String,
    pub completed: bool,
    pub priority: String,
    pub assigned_to: Option<Uuid>,
    pub phase_name: String,
    pub phase_order: i32,
    pub task_order: i32,
    pub estimated_duration: String,
    pub deadline: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Reconcile the redundant `status`/`completed` pair so that
    /// status == "completed" if and only if completed == true.
    /// The status string wins when they disagree, except that a bare
    /// completed flag promotes the status.
    pub fn normalize(&mut self) {
        if self.status == STATUS_COMPLETED {
            self.completed = true;
        } else if self.completed {
            self.status = STATUS_COMPLETED.to_string();
        }
    }
}

/// A task joined with its assignee's display name, used by the report path.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct TaskWithAssignee {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub task: Task,
    pub assigned_to_name: Option<String>,
}

/// Fields accepted when creating a task. Only supplied optional fields are
/// written to the insert; the rest take column defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub phase_name: Option<String>,
    pub phase_order: Option<i32>,
    pub task_order: Option<i32>,
    pub estimated_duration: Option<String>,
    pub deadline: Option<NaiveDate>,
}

/// Presence-aware update payload: a missing field is left untouched, a field
/// set to null clears it (nullable columns only). `title` is required on
/// every update call, including partial edits.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskPatch {
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<Option<Uuid>>,
    #[serde(default)]
    pub deadline: Option<Option<NaiveDate>>,
    #[serde(default)]
    pub phase_name: Option<String>,
    #[serde(default)]
    pub phase_order: Option<i32>,
    #[serde(default)]
    pub task_order: Option<i32>,
}
