//! Store trait seams.
//!
//! All traits are `Send + Sync` and synchronous: only principal resolution
//! sits on the hot request path, and the backing stores are lock-based.
//! Implementations must fail closed — a faulting lookup is reported as an
//! error, never as an empty success.

use std::sync::Arc;

use serde::Serialize;

use nimbuscrm_core::{
    AuthResult, Group, GroupId, ResellerId, Role, RoleId, RoleType, TenantId, UserId,
};

use crate::records::{AuthUserRecord, ResellerRecord, StoredReseller, StoredUser};

/// Which roles an actor may see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleScope {
    /// Platform-level actors see every role.
    All,
    /// Everyone else sees the union of their own tenant's roles and all
    /// system roles.
    TenantAndSystem(TenantId),
}

impl RoleScope {
    pub fn permits(&self, role: &Role) -> bool {
        match self {
            RoleScope::All => true,
            RoleScope::TenantAndSystem(tenant_id) => {
                role.tenant_id.is_none() || role.tenant_id == Some(*tenant_id)
            }
        }
    }
}

/// Listing filter for roles.
#[derive(Debug, Clone)]
pub struct RoleListFilter {
    pub scope: RoleScope,
    /// Case-insensitive free-text match over name and description.
    pub search: Option<String>,
    pub role_type: Option<RoleType>,
    /// 1-based page number.
    pub page: usize,
    pub per_page: usize,
}

impl RoleListFilter {
    pub const MAX_PER_PAGE: usize = 100;

    pub fn new(scope: RoleScope) -> Self {
        Self {
            scope,
            search: None,
            role_type: None,
            page: 1,
            per_page: 25,
        }
    }
}

/// One page of results plus the total match count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
}

/// User lookups and writes.
pub trait UserStore: Send + Sync {
    /// Find-by-id with the two-level populate (roles, groups→roles) and
    /// secret fields excluded. Runs on every authenticated request.
    fn find_auth_user(&self, id: UserId) -> AuthResult<Option<AuthUserRecord>>;

    fn find(&self, id: UserId) -> AuthResult<Option<StoredUser>>;

    fn find_by_email(&self, email: &str) -> AuthResult<Option<StoredUser>>;

    fn upsert(&self, user: StoredUser) -> AuthResult<()>;

    fn delete(&self, id: UserId) -> AuthResult<()>;

    fn list_for_tenant(&self, tenant_id: TenantId) -> AuthResult<Vec<StoredUser>>;
}

/// Role lookups and writes.
pub trait RoleStore: Send + Sync {
    fn find(&self, id: RoleId) -> AuthResult<Option<Role>>;

    /// Slug uniqueness probe within one tenant scope; `None` is the system
    /// (no-tenant) scope.
    fn find_by_slug(&self, scope: Option<TenantId>, slug: &str) -> AuthResult<Option<Role>>;

    fn upsert(&self, role: Role) -> AuthResult<()>;

    fn delete(&self, id: RoleId) -> AuthResult<()>;

    /// Filtered listing, sorted by `level` descending then recency.
    fn list(&self, filter: &RoleListFilter) -> AuthResult<Page<Role>>;
}

/// Group lookups and writes.
pub trait GroupStore: Send + Sync {
    fn find(&self, id: GroupId) -> AuthResult<Option<Group>>;

    fn upsert(&self, group: Group) -> AuthResult<()>;

    fn delete(&self, id: GroupId) -> AuthResult<()>;

    fn list_for_tenant(&self, tenant_id: TenantId) -> AuthResult<Vec<Group>>;

    /// Groups containing `user_id` as a member (first level of the
    /// principal join).
    fn groups_for_member(&self, user_id: UserId) -> AuthResult<Vec<Group>>;
}

/// Reseller partner lookups and writes.
pub trait ResellerStore: Send + Sync {
    /// Secret fields excluded.
    fn find(&self, id: ResellerId) -> AuthResult<Option<ResellerRecord>>;

    /// Full record including credentials; used only by the login path.
    fn find_credentials_by_email(&self, email: &str) -> AuthResult<Option<StoredReseller>>;

    fn upsert(&self, reseller: StoredReseller) -> AuthResult<()>;
}

impl<S: UserStore + ?Sized> UserStore for Arc<S> {
    fn find_auth_user(&self, id: UserId) -> AuthResult<Option<AuthUserRecord>> {
        (**self).find_auth_user(id)
    }

    fn find(&self, id: UserId) -> AuthResult<Option<StoredUser>> {
        (**self).find(id)
    }

    fn find_by_email(&self, email: &str) -> AuthResult<Option<StoredUser>> {
        (**self).find_by_email(email)
    }

    fn upsert(&self, user: StoredUser) -> AuthResult<()> {
        (**self).upsert(user)
    }

    fn delete(&self, id: UserId) -> AuthResult<()> {
        (**self).delete(id)
    }

    fn list_for_tenant(&self, tenant_id: TenantId) -> AuthResult<Vec<StoredUser>> {
        (**self).list_for_tenant(tenant_id)
    }
}

impl<S: RoleStore + ?Sized> RoleStore for Arc<S> {
    fn find(&self, id: RoleId) -> AuthResult<Option<Role>> {
        (**self).find(id)
    }

    fn find_by_slug(&self, scope: Option<TenantId>, slug: &str) -> AuthResult<Option<Role>> {
        (**self).find_by_slug(scope, slug)
    }

    fn upsert(&self, role: Role) -> AuthResult<()> {
        (**self).upsert(role)
    }

    fn delete(&self, id: RoleId) -> AuthResult<()> {
        (**self).delete(id)
    }

    fn list(&self, filter: &RoleListFilter) -> AuthResult<Page<Role>> {
        (**self).list(filter)
    }
}

impl<S: GroupStore + ?Sized> GroupStore for Arc<S> {
    fn find(&self, id: GroupId) -> AuthResult<Option<Group>> {
        (**self).find(id)
    }

    fn upsert(&self, group: Group) -> AuthResult<()> {
        (**self).upsert(group)
    }

    fn delete(&self, id: GroupId) -> AuthResult<()> {
        (**self).delete(id)
    }

    fn list_for_tenant(&self, tenant_id: TenantId) -> AuthResult<Vec<Group>> {
        (**self).list_for_tenant(tenant_id)
    }

    fn groups_for_member(&self, user_id: UserId) -> AuthResult<Vec<Group>> {
        (**self).groups_for_member(user_id)
    }
}

impl<S: ResellerStore + ?Sized> ResellerStore for Arc<S> {
    fn find(&self, id: ResellerId) -> AuthResult<Option<ResellerRecord>> {
        (**self).find(id)
    }

    fn find_credentials_by_email(&self, email: &str) -> AuthResult<Option<StoredReseller>> {
        (**self).find_credentials_by_email(email)
    }

    fn upsert(&self, reseller: StoredReseller) -> AuthResult<()> {
        (**self).upsert(reseller)
    }
}
