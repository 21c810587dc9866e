use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Task;
use crate::models::task::{NewTask, STATUS_COMPLETED, TaskPatch};

/// Insert a task. The typed `NewTask` maps to a parameterized column list:
/// core columns are always written (with defaults applied here), optional
/// columns only when the request supplied them.
pub async fn insert(pool: &PgPool, project_id: Uuid, new: &NewTask) -> Result<Task, sqlx::Error> {
    let title = new.title.as_deref().unwrap_or_default();
    let description = new.description.as_deref().unwrap_or_default();
    let status = new.status.as_deref().unwrap_or("todo");
    let priority = new.priority.as_deref().unwrap_or("medium");
    let completed = status == STATUS_COMPLETED;

    let mut qb = sqlx::QueryBuilder::<sqlx::Postgres>::new(
        "INSERT INTO tasks (id, project_id, title, description, status, completed, priority",
    );

    if new.phase_name.is_some() {
        qb.push(", phase_name");
    }
    if new.phase_order.is_some() {
        qb.push(", phase_order");
    }
    if new.task_order.is_some() {
        qb.push(", task_order");
    }
    if new.estimated_duration.is_some() {
        qb.push(", estimated_duration");
    }
    if new.deadline.is_some() {
        qb.push(", deadline");
    }

    qb.push(") VALUES (");
    {
        let mut vals = qb.separated(", ");
        vals.push_bind(Uuid::now_v7());
        vals.push_bind(project_id);
        vals.push_bind(title);
        vals.push_bind(description);
        vals.push_bind(status);
        vals.push_bind(completed);
        vals.push_bind(priority);
        if let Some(phase_name) = &new.phase_name {
            vals.push_bind(phase_name);
        }
        if let Some(phase_order) = new.phase_order {
            vals.push_bind(phase_order);
        }
        if let Some(task_order) = new.task_order {
            vals.push_bind(task_order);
        }
        if let Some(estimated_duration) = &new.estimated_duration {
            vals.push_bind(estimated_duration);
        }
        if let Some(deadline) = new.deadline {
            vals.push_bind(deadline);
        }
    }
    qb.push(") RETURNING *");

    qb.build_query_as::<Task>().fetch_one(pool).await
}

pub async fn list_by_project(pool: &PgPool, project_id: Uuid) -> Result<Vec<Task>, sqlx::Error> {
    sqlx::query_as::<_, Task>(
        "SELECT * FROM tasks WHERE project_id = $1
         ORDER BY phase_order ASC, task_order ASC, created_at ASC",
    )
    .bind(project_id)
    .fetch_all(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Task>, sqlx::Error> {
    sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Apply a presence-aware patch. `title` and `updated_at` are always set;
/// every other SET clause is emitted only when the field was present in the
/// request payload. Setting `status` keeps the `completed` flag in sync.
pub async fn update(
    pool: &PgPool,
    task_id: Uuid,
    title: &str,
    patch: &TaskPatch,
) -> Result<Option<Task>, sqlx::Error> {
    let mut qb =
        sqlx::QueryBuilder::<sqlx::Postgres>::new("UPDATE tasks SET updated_at = now(), title = ");
    qb.push_bind(title);

    if let Some(description) = &patch.description {
        qb.push(", description = ").push_bind(description);
    }
    if let Some(status) = &patch.status {
        qb.push(", status = ").push_bind(status);
        qb.push(", completed = ").push_bind(status == STATUS_COMPLETED);
    }
    if let Some(priority) = &patch.priority {
        qb.push(", priority = ").push_bind(priority);
    }
    if let Some(assigned_to) = &patch.assigned_to {
        qb.push(", assigned_to = ").push_bind(*assigned_to);
    }
    if let Some(deadline) = &patch.deadline {
        qb.push(", deadline = ").push_bind(*deadline);
    }
    if let Some(phase_name) = &patch.phase_name {
        qb.push(", phase_name = ").push_bind(phase_name);
    }
    if let Some(phase_order) = patch.phase_order {
        qb.push(", phase_order = ").push_bind(phase_order);
    }
    if let Some(task_order) = patch.task_order {
        qb.push(", task_order = ").push_bind(task_order);
    }

    qb.push(" WHERE id = ").push_bind(task_id);
    qb.push(" RETURNING *");

    qb.build_query_as::<Task>().fetch_optional(pool).await
}

pub async fn delete(pool: &PgPool, task_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM tasks WHERE id = $1")
        .bind(task_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Count persisted tasks and how many are completed, for roadmap context.
pub async fn progress_counts(
    pool: &PgPool,
    project_id: Uuid,
) -> Result<(i64, i64), sqlx::Error> {
    sqlx::query_as::<_, (i64, i64)>(
        "SELECT COUNT(*), COUNT(*) FILTER (WHERE status = 'completed' OR completed)
         FROM tasks WHERE project_id = $1",
    )
    .bind(project_id)
    .fetch_one(pool)
    .await
}
