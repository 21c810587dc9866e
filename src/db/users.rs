use sqlx::PgPool;
use uuid::Uuid;

use crate::models::User;

pub async fn create(
    pool: &PgPool,
    email: &str,
    password_hash: &str,
    full_name: &str,
    role: &str,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "INSERT INTO users (id, email, password_hash, full_name, role)
         VALUES ($1, $2, $3, $4, $5) RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(email)
    .bind(password_hash)
    .bind(full_name)
    .bind(role)
    .fetch_one(pool)
    .await
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn email_taken_by_other(
    pool: &PgPool,
    email: &str,
    user_id: Uuid,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM users WHERE email = $1 AND id != $2)",
    )
    .bind(email)
    .bind(user_id)
    .fetch_one(pool)
    .await
}

/// Apply a profile patch. Fields are fixed-mapped to parameterized SET
/// clauses; callers pass `None` for fields the request left out.
pub async fn update_profile(
    pool: &PgPool,
    user_id: Uuid,
    full_name: Option<&str>,
    email: Option<&str>,
    password_hash: Option<&str>,
) -> Result<Option<User>, sqlx::Error> {
    let mut qb = sqlx::QueryBuilder::<sqlx::Postgres>::new("UPDATE users SET ");
    {
        let mut sep = qb.separated(", ");
        if let Some(name) = full_name {
            sep.push("full_name = ").push_bind_unseparated(name);
        }
        if let Some(email) = email {
            sep.push("email = ").push_bind_unseparated(email);
        }
        if let Some(hash) = password_hash {
            sep.push("password_hash = ").push_bind_unseparated(hash);
        }
    }
    qb.push(" WHERE id = ").push_bind(user_id);
    qb.push(" RETURNING *");

    qb.build_query_as::<User>().fetch_optional(pool).await
}

/// Delete an account with the full ownership cascade, atomically:
/// null out task assignments, remove projects where this user is the sole
/// manager, remove organizations where this user is the sole admin (and
/// everything under them), drop remaining memberships, then the user row.
pub async fn delete_account_cascade(pool: &PgPool, user_id: Uuid) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("UPDATE tasks SET assigned_to = NULL WHERE assigned_to = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    // Projects where this user is the only manager.
    let solo_projects: Vec<Uuid> = sqlx::query_scalar(
        "SELECT pm.project_id FROM project_members pm
         WHERE pm.role = 'manager'
         GROUP BY pm.project_id
         HAVING COUNT(*) = 1 AND bool_or(pm.user_id = $1)",
    )
    .bind(user_id)
    .fetch_all(&mut *tx)
    .await?;

    if !solo_projects.is_empty() {
        delete_projects(&mut tx, &solo_projects).await?;
    }

    // Organizations where this user is the only admin.
    let solo_orgs: Vec<Uuid> = sqlx::query_scalar(
        "SELECT om.organization_id FROM organization_members om
         WHERE om.role = 'admin'
         GROUP BY om.organization_id
         HAVING COUNT(*) = 1 AND bool_or(om.user_id = $1)",
    )
    .bind(user_id)
    .fetch_all(&mut *tx)
    .await?;

    for org_id in &solo_orgs {
        let org_projects: Vec<Uuid> =
            sqlx::query_scalar("SELECT id FROM projects WHERE organization_id = $1")
                .bind(org_id)
                .fetch_all(&mut *tx)
                .await?;

        if !org_projects.is_empty() {
            delete_projects(&mut tx, &org_projects).await?;
        }

        sqlx::query("DELETE FROM organization_members WHERE organization_id = $1")
            .bind(org_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM organizations WHERE id = $1")
            .bind(org_id)
            .execute(&mut *tx)
            .await?;
    }

    sqlx::query("DELETE FROM project_members WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM organization_members WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}

async fn delete_projects(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    project_ids: &[Uuid],
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM tasks WHERE project_id = ANY($1)")
        .bind(project_ids)
        .execute(&mut **tx)
        .await?;
    sqlx::query("DELETE FROM project_members WHERE project_id = ANY($1)")
        .bind(project_ids)
        .execute(&mut **tx)
        .await?;
    sqlx::query("DELETE FROM projects WHERE id = ANY($1)")
        .bind(project_ids)
        .execute(&mut **tx)
        .await?;
    Ok(())
}
