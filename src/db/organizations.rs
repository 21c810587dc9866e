use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Organization;
use crate::models::organization::{ORG_ROLE_ADMIN, ORG_ROLE_MEMBER};

/// Create an organization and enroll the creator as its admin.
pub async fn create(
    pool: &PgPool,
    user_id: Uuid,
    name: &str,
    description: &str,
) -> Result<Organization, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let org = sqlx::query_as::<_, Organization>(
        "INSERT INTO organizations (id, name, description, created_by)
         VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(name)
    .bind(description)
    .bind(user_id)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        "INSERT INTO organization_members (organization_id, user_id, role) VALUES ($1, $2, $3)",
    )
    .bind(org.id)
    .bind(user_id)
    .bind(ORG_ROLE_ADMIN)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(org)
}

pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Organization>, sqlx::Error> {
    sqlx::query_as::<_, Organization>(
        "SELECT o.* FROM organizations o
         JOIN organization_members om ON o.id = om.organization_id
         WHERE om.user_id = $1
         ORDER BY o.created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Fetch an organization only when the user is a member. Absence and lack of
/// membership are indistinguishable to the caller.
pub async fn find_for_member(
    pool: &PgPool,
    org_id: Uuid,
    user_id: Uuid,
) -> Result<Option<Organization>, sqlx::Error> {
    sqlx::query_as::<_, Organization>(
        "SELECT o.* FROM organizations o
         JOIN organization_members om ON o.id = om.organization_id
         WHERE o.id = $1 AND om.user_id = $2",
    )
    .bind(org_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

pub async fn is_member(pool: &PgPool, org_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM organization_members
         WHERE organization_id = $1 AND user_id = $2)",
    )
    .bind(org_id)
    .bind(user_id)
    .fetch_one(pool)
    .await
}

pub async fn is_admin(pool: &PgPool, org_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM organization_members
         WHERE organization_id = $1 AND user_id = $2 AND role = $3)",
    )
    .bind(org_id)
    .bind(user_id)
    .bind(ORG_ROLE_ADMIN)
    .fetch_one(pool)
    .await
}

pub async fn add_member(
    pool: &PgPool,
    org_id: Uuid,
    user_id: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO organization_members (organization_id, user_id, role)
         VALUES ($1, $2, $3) ON CONFLICT DO NOTHING",
    )
    .bind(org_id)
    .bind(user_id)
    .bind(ORG_ROLE_MEMBER)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn update(
    pool: &PgPool,
    org_id: Uuid,
    name: &str,
    description: &str,
) -> Result<Option<Organization>, sqlx::Error> {
    sqlx::query_as::<_, Organization>(
        "UPDATE organizations SET name = $2, description = $3 WHERE id = $1 RETURNING *",
    )
    .bind(org_id)
    .bind(name)
    .bind(description)
    .fetch_optional(pool)
    .await
}

/// Delete an organization and every row referencing it: all child projects
/// with their tasks and memberships, then the org's own memberships, then
/// the org. One transaction, so a failure leaves nothing dangling.
pub async fn delete_cascade(pool: &PgPool, org_id: Uuid) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    let project_ids: Vec<Uuid> =
        sqlx::query_scalar("SELECT id FROM projects WHERE organization_id = $1")
            .bind(org_id)
            .fetch_all(&mut *tx)
            .await?;

    if !project_ids.is_empty() {
        sqlx::query("DELETE FROM tasks WHERE project_id = ANY($1)")
            .bind(&project_ids)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM project_members WHERE project_id = ANY($1)")
            .bind(&project_ids)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM projects WHERE id = ANY($1)")
            .bind(&project_ids)
            .execute(&mut *tx)
            .await?;
    }

    sqlx::query("DELETE FROM organization_members WHERE organization_id = $1")
        .bind(org_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM organizations WHERE id = $1")
        .bind(org_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}
