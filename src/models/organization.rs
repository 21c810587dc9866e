use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Organization {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Join row granting a user a role over an organization.
/// `admin` gates update/delete on the organization itself.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct OrganizationMember {
    pub organization_id: Uuid,
    pub user_id: Uuid,
    pub role: String,
}

pub const ORG_ROLE_ADMIN: &str = "admin";
pub const ORG_ROLE_MEMBER: &str = "member";
