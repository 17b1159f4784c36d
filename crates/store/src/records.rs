//! Persisted records and the populated read models derived from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use nimbuscrm_core::{
    Group, PermissionGrant, ResellerId, ResellerStatus, Role, RoleId, TenantId, UserId, UserType,
};

/// A tenant user as persisted.
///
/// `password_hash` never leaves the store through the auth-read path; the
/// principal resolver consumes [`AuthUserRecord`], which omits it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredUser {
    pub id: UserId,
    /// `None` for platform-level users, which are unbound by tenant.
    pub tenant_id: Option<TenantId>,
    pub email: String,
    pub display_name: String,
    pub user_type: UserType,
    pub role_ids: Vec<RoleId>,
    /// Per-user overrides; an entry here fully supersedes role/group grants
    /// for its feature.
    pub custom_permissions: Vec<PermissionGrant>,
    pub is_active: bool,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A group with its role refs expanded to full roles (second level of the
/// read-time join).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupWithRoles {
    pub group: Group,
    pub roles: Vec<Role>,
}

/// The fully-populated user read used to build a principal: direct roles
/// expanded, groups expanded with *their* roles expanded, secret fields
/// excluded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUserRecord {
    pub id: UserId,
    pub tenant_id: Option<TenantId>,
    pub email: String,
    pub display_name: String,
    pub user_type: UserType,
    pub roles: Vec<Role>,
    pub groups: Vec<GroupWithRoles>,
    pub custom_permissions: Vec<PermissionGrant>,
    pub is_active: bool,
}

/// A reseller partner as persisted (credentials included).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredReseller {
    pub id: ResellerId,
    pub email: String,
    pub name: String,
    pub status: ResellerStatus,
    pub is_active: bool,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Reseller read model with secret fields excluded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResellerRecord {
    pub id: ResellerId,
    pub email: String,
    pub name: String,
    pub status: ResellerStatus,
    pub is_active: bool,
}

impl From<&StoredReseller> for ResellerRecord {
    fn from(r: &StoredReseller) -> Self {
        Self {
            id: r.id,
            email: r.email.clone(),
            name: r.name.clone(),
            status: r.status,
            is_active: r.is_active,
        }
    }
}
