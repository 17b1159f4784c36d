//! Group entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{GroupId, RoleId, TenantId, UserId};
use crate::permission::PermissionGrant;

/// A tenant-scoped collection of users that inherits roles and may carry
/// grants of its own.
///
/// Role references are expanded to full roles at principal-resolution time
/// (the two-level join); this entity stores only the refs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub tenant_id: TenantId,
    pub roles: Vec<RoleId>,
    pub group_permissions: Vec<PermissionGrant>,
    pub members: Vec<UserId>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Group {
    pub fn has_member(&self, user_id: &UserId) -> bool {
        self.members.contains(user_id)
    }
}
