//! Role entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{RoleId, TenantId};
use crate::permission::{Action, Feature, PermissionGrant};

/// Ownership class of a role.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleType {
    /// Owned by no tenant, available platform-wide. Mutable only by the
    /// platform owner; never hard-deleted (deactivated via update).
    System,
    /// Owned by exactly one tenant.
    Custom,
}

/// A named bundle of permission grants.
///
/// # Invariants
/// - `slug` is unique within its tenant scope, where the "no tenant" scope
///   (system roles) is itself one scope.
/// - `tenant_id == None` iff `role_type == System`.
/// - `level` is a display ordering hint only; it carries no authority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub tenant_id: Option<TenantId>,
    pub role_type: RoleType,
    pub permissions: Vec<PermissionGrant>,
    pub level: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Role {
    pub fn is_system(&self) -> bool {
        self.role_type == RoleType::System
    }

    /// True when an *active* role grants `action` on `feature`.
    pub fn grants(&self, feature: &Feature, action: &Action) -> bool {
        self.is_active
            && self
                .permissions
                .iter()
                .any(|g| &g.feature == feature && g.allows(action))
    }
}

/// Derive a URL-safe slug from a role name (lowercase, `-` separated).
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_sep = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('-');
            }
            pending_sep = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }

    slug
}
