//! In-memory stores for tests and dev.
//!
//! `RwLock<HashMap>` documents; concurrent edits to the same document are
//! last-write-wins. A poisoned lock is reported as an internal error so a
//! faulting store can never grant by accident.

use std::collections::HashMap;
use std::sync::RwLock;

use nimbuscrm_core::{
    AuthError, AuthResult, Group, GroupId, ResellerId, Role, RoleId, TenantId, UserId,
};

use crate::records::{AuthUserRecord, GroupWithRoles, ResellerRecord, StoredReseller, StoredUser};
use crate::traits::{
    GroupStore, Page, ResellerStore, RoleListFilter, RoleStore, UserStore,
};

fn lock_poisoned() -> AuthError {
    AuthError::internal("store lock poisoned")
}

// ─────────────────────────────────────────────────────────────────────────────
// Users
// ─────────────────────────────────────────────────────────────────────────────

/// In-memory user store that performs the two-level populate against
/// sibling role/group stores at read time.
pub struct InMemoryUserStore<R, G> {
    users: RwLock<HashMap<UserId, StoredUser>>,
    roles: R,
    groups: G,
}

impl<R, G> InMemoryUserStore<R, G>
where
    R: RoleStore,
    G: GroupStore,
{
    pub fn new(roles: R, groups: G) -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            roles,
            groups,
        }
    }

    fn expand_roles(&self, ids: &[RoleId]) -> AuthResult<Vec<Role>> {
        let mut out = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(role) = self.roles.find(*id)? {
                out.push(role);
            }
        }
        Ok(out)
    }
}

impl<R, G> UserStore for InMemoryUserStore<R, G>
where
    R: RoleStore,
    G: GroupStore,
{
    fn find_auth_user(&self, id: UserId) -> AuthResult<Option<AuthUserRecord>> {
        let user = match self.find(id)? {
            Some(u) => u,
            None => return Ok(None),
        };

        let roles = self.expand_roles(&user.role_ids)?;

        let mut groups = Vec::new();
        for group in self.groups.groups_for_member(id)? {
            if !group.is_active {
                continue;
            }
            let group_roles = self.expand_roles(&group.roles)?;
            groups.push(GroupWithRoles {
                group,
                roles: group_roles,
            });
        }

        Ok(Some(AuthUserRecord {
            id: user.id,
            tenant_id: user.tenant_id,
            email: user.email,
            display_name: user.display_name,
            user_type: user.user_type,
            roles,
            groups,
            custom_permissions: user.custom_permissions,
            is_active: user.is_active,
        }))
    }

    fn find(&self, id: UserId) -> AuthResult<Option<StoredUser>> {
        let map = self.users.read().map_err(|_| lock_poisoned())?;
        Ok(map.get(&id).cloned())
    }

    fn find_by_email(&self, email: &str) -> AuthResult<Option<StoredUser>> {
        let needle = email.trim();
        let map = self.users.read().map_err(|_| lock_poisoned())?;
        Ok(map
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(needle))
            .cloned())
    }

    fn upsert(&self, user: StoredUser) -> AuthResult<()> {
        let mut map = self.users.write().map_err(|_| lock_poisoned())?;
        map.insert(user.id, user);
        Ok(())
    }

    fn delete(&self, id: UserId) -> AuthResult<()> {
        let mut map = self.users.write().map_err(|_| lock_poisoned())?;
        map.remove(&id);
        Ok(())
    }

    fn list_for_tenant(&self, tenant_id: TenantId) -> AuthResult<Vec<StoredUser>> {
        let map = self.users.read().map_err(|_| lock_poisoned())?;
        Ok(map
            .values()
            .filter(|u| u.tenant_id == Some(tenant_id))
            .cloned()
            .collect())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Roles
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryRoleStore {
    roles: RwLock<HashMap<RoleId, Role>>,
}

impl InMemoryRoleStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RoleStore for InMemoryRoleStore {
    fn find(&self, id: RoleId) -> AuthResult<Option<Role>> {
        let map = self.roles.read().map_err(|_| lock_poisoned())?;
        Ok(map.get(&id).cloned())
    }

    fn find_by_slug(&self, scope: Option<TenantId>, slug: &str) -> AuthResult<Option<Role>> {
        let map = self.roles.read().map_err(|_| lock_poisoned())?;
        Ok(map
            .values()
            .find(|r| r.tenant_id == scope && r.slug == slug)
            .cloned())
    }

    fn upsert(&self, role: Role) -> AuthResult<()> {
        let mut map = self.roles.write().map_err(|_| lock_poisoned())?;
        map.insert(role.id, role);
        Ok(())
    }

    fn delete(&self, id: RoleId) -> AuthResult<()> {
        let mut map = self.roles.write().map_err(|_| lock_poisoned())?;
        map.remove(&id);
        Ok(())
    }

    fn list(&self, filter: &RoleListFilter) -> AuthResult<Page<Role>> {
        let map = self.roles.read().map_err(|_| lock_poisoned())?;

        let needle = filter.search.as_ref().map(|s| s.to_lowercase());

        let mut matches: Vec<Role> = map
            .values()
            .filter(|r| filter.scope.permits(r))
            .filter(|r| filter.role_type.is_none_or(|t| r.role_type == t))
            .filter(|r| {
                needle.as_ref().is_none_or(|n| {
                    r.name.to_lowercase().contains(n)
                        || r.description.to_lowercase().contains(n)
                })
            })
            .cloned()
            .collect();

        // Level descending, then recency.
        matches.sort_by(|a, b| {
            b.level
                .cmp(&a.level)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });

        let total = matches.len();
        let per_page = filter.per_page.clamp(1, RoleListFilter::MAX_PER_PAGE);
        let page = filter.page.max(1);
        // Saturate: the page number is caller-controlled and may be absurd.
        let items = matches
            .into_iter()
            .skip(page.saturating_sub(1).saturating_mul(per_page))
            .take(per_page)
            .collect();

        Ok(Page {
            items,
            total,
            page,
            per_page,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Groups
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryGroupStore {
    groups: RwLock<HashMap<GroupId, Group>>,
}

impl InMemoryGroupStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GroupStore for InMemoryGroupStore {
    fn find(&self, id: GroupId) -> AuthResult<Option<Group>> {
        let map = self.groups.read().map_err(|_| lock_poisoned())?;
        Ok(map.get(&id).cloned())
    }

    fn upsert(&self, group: Group) -> AuthResult<()> {
        let mut map = self.groups.write().map_err(|_| lock_poisoned())?;
        map.insert(group.id, group);
        Ok(())
    }

    fn delete(&self, id: GroupId) -> AuthResult<()> {
        let mut map = self.groups.write().map_err(|_| lock_poisoned())?;
        map.remove(&id);
        Ok(())
    }

    fn list_for_tenant(&self, tenant_id: TenantId) -> AuthResult<Vec<Group>> {
        let map = self.groups.read().map_err(|_| lock_poisoned())?;
        Ok(map
            .values()
            .filter(|g| g.tenant_id == tenant_id)
            .cloned()
            .collect())
    }

    fn groups_for_member(&self, user_id: UserId) -> AuthResult<Vec<Group>> {
        let map = self.groups.read().map_err(|_| lock_poisoned())?;
        Ok(map
            .values()
            .filter(|g| g.has_member(&user_id))
            .cloned()
            .collect())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Resellers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryResellerStore {
    resellers: RwLock<HashMap<ResellerId, StoredReseller>>,
}

impl InMemoryResellerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResellerStore for InMemoryResellerStore {
    fn find(&self, id: ResellerId) -> AuthResult<Option<ResellerRecord>> {
        let map = self.resellers.read().map_err(|_| lock_poisoned())?;
        Ok(map.get(&id).map(ResellerRecord::from))
    }

    fn find_credentials_by_email(&self, email: &str) -> AuthResult<Option<StoredReseller>> {
        let needle = email.trim();
        let map = self.resellers.read().map_err(|_| lock_poisoned())?;
        Ok(map
            .values()
            .find(|r| r.email.eq_ignore_ascii_case(needle))
            .cloned())
    }

    fn upsert(&self, reseller: StoredReseller) -> AuthResult<()> {
        let mut map = self.resellers.write().map_err(|_| lock_poisoned())?;
        map.insert(reseller.id, reseller);
        Ok(())
    }
}
