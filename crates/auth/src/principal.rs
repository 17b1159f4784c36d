//! The authenticated identity resolved for one request.

use serde::Serialize;

use nimbuscrm_core::{
    Action, Feature, PermissionGrant, ResellerId, ResellerStatus, Role, TenantId, UserId, UserType,
};
use nimbuscrm_store::{AuthUserRecord, GroupWithRoles, ResellerRecord};

/// One of two identity spaces behind the single token endpoint.
///
/// Guards pattern-match on the discriminant; nothing in the engine
/// duck-types on field presence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Principal {
    Tenant(TenantPrincipal),
    Reseller(ResellerPrincipal),
}

/// A tenant user with every authority source resolved: direct roles,
/// groups (with their roles expanded), and per-user overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TenantPrincipal {
    pub id: UserId,
    pub email: String,
    pub user_type: UserType,
    /// `None` for platform-level users.
    pub tenant_id: Option<TenantId>,
    pub roles: Vec<Role>,
    pub groups: Vec<GroupWithRoles>,
    pub custom_permissions: Vec<PermissionGrant>,
    pub is_active: bool,
}

/// An approved reseller partner. Carries no roles or grants; reseller
/// endpoints are gated by type, not by feature permission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResellerPrincipal {
    pub id: ResellerId,
    pub email: String,
    pub name: String,
    pub status: ResellerStatus,
    pub is_active: bool,
}

impl From<AuthUserRecord> for TenantPrincipal {
    fn from(record: AuthUserRecord) -> Self {
        Self {
            id: record.id,
            email: record.email,
            user_type: record.user_type,
            tenant_id: record.tenant_id,
            roles: record.roles,
            groups: record.groups,
            custom_permissions: record.custom_permissions,
            is_active: record.is_active,
        }
    }
}

impl From<ResellerRecord> for ResellerPrincipal {
    fn from(record: ResellerRecord) -> Self {
        Self {
            id: record.id,
            email: record.email,
            name: record.name,
            status: record.status,
            is_active: record.is_active,
        }
    }
}

impl TenantPrincipal {
    pub fn is_platform_level(&self) -> bool {
        self.user_type.is_platform_level()
    }
}

impl Principal {
    pub fn as_tenant(&self) -> Option<&TenantPrincipal> {
        match self {
            Principal::Tenant(p) => Some(p),
            Principal::Reseller(_) => None,
        }
    }

    pub fn as_reseller(&self) -> Option<&ResellerPrincipal> {
        match self {
            Principal::Reseller(p) => Some(p),
            Principal::Tenant(_) => None,
        }
    }

    pub fn email(&self) -> &str {
        match self {
            Principal::Tenant(p) => &p.email,
            Principal::Reseller(p) => &p.email,
        }
    }

    /// Feature permission check. Resellers have no feature permissions.
    pub fn has_permission(&self, feature: &Feature, action: &Action) -> bool {
        match self {
            Principal::Tenant(p) => crate::permissions::has_permission(p, feature, action),
            Principal::Reseller(_) => false,
        }
    }
}
