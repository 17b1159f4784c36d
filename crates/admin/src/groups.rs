//! Group administration.

use chrono::Utc;
use serde::Deserialize;

use nimbuscrm_auth::TenantPrincipal;
use nimbuscrm_core::{
    AuthError, AuthResult, Group, GroupId, PermissionGrant, RoleId, TenantId, UserId,
};
use nimbuscrm_store::{GroupStore, RoleStore};

/// Input for group creation.
#[derive(Debug, Clone, Deserialize)]
pub struct NewGroup {
    pub name: String,
    /// Groups are always tenant-owned; platform actors must supply this,
    /// everyone else defaults to their own tenant.
    pub tenant_id: Option<TenantId>,
    #[serde(default)]
    pub roles: Vec<RoleId>,
    #[serde(default)]
    pub group_permissions: Vec<PermissionGrant>,
    #[serde(default)]
    pub members: Vec<UserId>,
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroupUpdate {
    pub name: Option<String>,
    pub roles: Option<Vec<RoleId>>,
    pub group_permissions: Option<Vec<PermissionGrant>>,
    pub members: Option<Vec<UserId>>,
    pub is_active: Option<bool>,
}

/// Group administration service.
pub struct GroupAdmin<G, R> {
    groups: G,
    roles: R,
}

impl<G: GroupStore, R: RoleStore> GroupAdmin<G, R> {
    pub fn new(groups: G, roles: R) -> Self {
        Self { groups, roles }
    }

    pub fn create_group(&self, actor: &TenantPrincipal, input: NewGroup) -> AuthResult<Group> {
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(AuthError::validation("group name cannot be empty"));
        }

        let tenant_id = self.resolve_tenant(actor, input.tenant_id)?;
        self.ensure_roles_visible(tenant_id, &input.roles)?;

        let now = Utc::now();
        let group = Group {
            id: GroupId::new(),
            name,
            tenant_id,
            roles: input.roles,
            group_permissions: input.group_permissions,
            members: input.members,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        self.groups.upsert(group.clone())?;
        tracing::info!(group = %group.name, tenant = %tenant_id, "group created");
        Ok(group)
    }

    pub fn update_group(
        &self,
        actor: &TenantPrincipal,
        id: GroupId,
        update: GroupUpdate,
    ) -> AuthResult<Group> {
        let mut group = self.find_in_scope(actor, id)?;

        if let Some(name) = update.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(AuthError::validation("group name cannot be empty"));
            }
            group.name = name;
        }
        if let Some(roles) = update.roles {
            self.ensure_roles_visible(group.tenant_id, &roles)?;
            group.roles = roles;
        }
        if let Some(group_permissions) = update.group_permissions {
            group.group_permissions = group_permissions;
        }
        if let Some(members) = update.members {
            group.members = members;
        }
        if let Some(is_active) = update.is_active {
            group.is_active = is_active;
        }
        group.updated_at = Utc::now();

        self.groups.upsert(group.clone())?;
        Ok(group)
    }

    pub fn delete_group(&self, actor: &TenantPrincipal, id: GroupId) -> AuthResult<()> {
        let group = self.find_in_scope(actor, id)?;
        self.groups.delete(group.id)?;
        tracing::info!(group = %group.name, "group deleted");
        Ok(())
    }

    pub fn get_group(&self, actor: &TenantPrincipal, id: GroupId) -> AuthResult<Group> {
        self.find_in_scope(actor, id)
    }

    /// List a tenant's groups. Non-platform actors may only list their own
    /// tenant; platform actors list any.
    pub fn list_groups(
        &self,
        actor: &TenantPrincipal,
        tenant_id: Option<TenantId>,
    ) -> AuthResult<Vec<Group>> {
        let tenant_id = self.resolve_tenant(actor, tenant_id)?;
        self.groups.list_for_tenant(tenant_id)
    }

    fn resolve_tenant(
        &self,
        actor: &TenantPrincipal,
        requested: Option<TenantId>,
    ) -> AuthResult<TenantId> {
        if actor.is_platform_level() {
            return requested
                .ok_or_else(|| AuthError::validation("tenant_id is required"));
        }

        let own = actor
            .tenant_id
            .ok_or_else(|| AuthError::forbidden("tenant context required"))?;
        match requested {
            None => Ok(own),
            Some(t) if t == own => Ok(own),
            Some(_) => Err(AuthError::forbidden("cannot manage another tenant's groups")),
        }
    }

    /// Role refs attached to a group must be visible in the group's tenant
    /// scope (own tenant or system).
    fn ensure_roles_visible(&self, tenant_id: TenantId, role_ids: &[RoleId]) -> AuthResult<()> {
        for id in role_ids {
            let role = self.roles.find(*id)?.ok_or(AuthError::NotFound)?;
            let visible = role.tenant_id.is_none() || role.tenant_id == Some(tenant_id);
            if !visible {
                return Err(AuthError::NotFound);
            }
        }
        Ok(())
    }

    fn find_in_scope(&self, actor: &TenantPrincipal, id: GroupId) -> AuthResult<Group> {
        let group = self.groups.find(id)?.ok_or(AuthError::NotFound)?;

        if actor.is_platform_level() {
            return Ok(group);
        }

        let own = actor
            .tenant_id
            .ok_or_else(|| AuthError::forbidden("tenant context required"))?;
        if group.tenant_id != own {
            // Hide foreign groups entirely.
            return Err(AuthError::NotFound);
        }
        Ok(group)
    }
}
