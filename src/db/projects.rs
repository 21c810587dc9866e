use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Project;
use crate::models::project::{PROJECT_ROLE_MANAGER, ProjectDetail};
use crate::models::task::TaskWithAssignee;

/// Create a project and enroll the creator as its manager.
/// `roadmap_text` and `tasks_checklist` are stored verbatim.
#[allow(clippy::too_many_arguments)]
pub async fn create(
    pool: &PgPool,
    org_id: Uuid,
    user_id: Uuid,
    title: &str,
    description: &str,
    deadline: Option<NaiveDate>,
    roadmap_text: &str,
    tasks_checklist: &str,
) -> Result<Project, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let project = sqlx::query_as::<_, Project>(
        "INSERT INTO projects
         (id, organization_id, title, description, deadline, created_by, roadmap_text, tasks_checklist)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(org_id)
    .bind(title)
    .bind(description)
    .bind(deadline)
    .bind(user_id)
    .bind(roadmap_text)
    .bind(tasks_checklist)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("INSERT INTO project_members (project_id, user_id, role) VALUES ($1, $2, $3)")
        .bind(project.id)
        .bind(user_id)
        .bind(PROJECT_ROLE_MANAGER)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(project)
}

pub async fn list_by_org(pool: &PgPool, org_id: Uuid) -> Result<Vec<Project>, sqlx::Error> {
    sqlx::query_as::<_, Project>(
        "SELECT * FROM projects WHERE organization_id = $1 ORDER BY created_at DESC",
    )
    .bind(org_id)
    .fetch_all(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Project>, sqlx::Error> {
    sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_detail(pool: &PgPool, id: Uuid) -> Result<Option<ProjectDetail>, sqlx::Error> {
    sqlx::query_as::<_, ProjectDetail>(
        "SELECT p.*, o.name AS organization_name
         FROM projects p
         JOIN organizations o ON p.organization_id = o.id
         WHERE p.id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn is_manager(
    pool: &PgPool,
    project_id: Uuid,
    user_id: Uuid,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM project_members
         WHERE project_id = $1 AND user_id = $2 AND role = $3)",
    )
    .bind(project_id)
    .bind(user_id)
    .bind(PROJECT_ROLE_MANAGER)
    .fetch_one(pool)
    .await
}

/// Delete a project and its tasks and memberships in one transaction.
pub async fn delete_cascade(pool: &PgPool, project_id: Uuid) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM tasks WHERE project_id = $1")
        .bind(project_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM project_members WHERE project_id = $1")
        .bind(project_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM projects WHERE id = $1")
        .bind(project_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}

pub async fn update_checklist(
    pool: &PgPool,
    project_id: Uuid,
    checklist: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE projects SET tasks_checklist = $2 WHERE id = $1")
        .bind(project_id)
        .bind(checklist)
        .execute(pool)
        .await?;
    Ok(())
}

/// Tasks for the report, with assignee display names resolved.
pub async fn tasks_with_assignees(
    pool: &PgPool,
    project_id: Uuid,
) -> Result<Vec<TaskWithAssignee>, sqlx::Error> {
    sqlx::query_as::<_, TaskWithAssignee>(
        "SELECT t.*, u.full_name AS assigned_to_name
         FROM tasks t
         LEFT JOIN users u ON t.assigned_to = u.id
         WHERE t.project_id = $1
         ORDER BY t.phase_order, t.task_order",
    )
    .bind(project_id)
    .fetch_all(pool)
    .await
}
