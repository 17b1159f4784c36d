//! Role administration.

use chrono::Utc;
use serde::Deserialize;

use nimbuscrm_auth::TenantPrincipal;
use nimbuscrm_core::{
    slugify, AuthError, AuthResult, PermissionGrant, Role, RoleId, RoleType, TenantId, UserType,
};
use nimbuscrm_store::{Page, RoleListFilter, RoleScope, RoleStore};

/// Input for role creation.
#[derive(Debug, Clone, Deserialize)]
pub struct NewRole {
    pub name: String,
    /// Derived from `name` when absent.
    pub slug: Option<String>,
    #[serde(default)]
    pub description: String,
    /// Non-platform actors may only target their own tenant (absent means
    /// "my tenant"); platform actors may omit it to create a system role.
    pub tenant_id: Option<TenantId>,
    #[serde(default)]
    pub permissions: Vec<PermissionGrant>,
    #[serde(default)]
    pub level: i32,
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoleUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub permissions: Option<Vec<PermissionGrant>>,
    pub level: Option<i32>,
    pub is_active: Option<bool>,
}

/// Listing parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoleQuery {
    pub search: Option<String>,
    pub role_type: Option<RoleType>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

/// Role administration service.
pub struct RoleAdmin<S> {
    roles: S,
}

impl<S: RoleStore> RoleAdmin<S> {
    pub fn new(roles: S) -> Self {
        Self { roles }
    }

    /// What the actor may see: everything for platform level, otherwise own
    /// tenant plus system roles.
    fn visibility(actor: &TenantPrincipal) -> AuthResult<RoleScope> {
        if actor.is_platform_level() {
            return Ok(RoleScope::All);
        }
        let tenant_id = actor
            .tenant_id
            .ok_or_else(|| AuthError::forbidden("tenant context required"))?;
        Ok(RoleScope::TenantAndSystem(tenant_id))
    }

    /// Create a role. Non-platform actors create custom roles in their own
    /// tenant only; platform actors may omit the tenant (system role) or
    /// supply one.
    pub fn create_role(&self, actor: &TenantPrincipal, input: NewRole) -> AuthResult<Role> {
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(AuthError::validation("role name cannot be empty"));
        }

        let scope = if actor.is_platform_level() {
            input.tenant_id
        } else {
            let own = actor
                .tenant_id
                .ok_or_else(|| AuthError::forbidden("tenant context required"))?;
            match input.tenant_id {
                None => Some(own),
                Some(requested) if requested == own => Some(own),
                Some(_) => {
                    return Err(AuthError::forbidden(
                        "cannot create a role for another tenant",
                    ));
                }
            }
        };

        let slug = match input.slug {
            Some(s) => slugify(&s),
            None => slugify(&name),
        };
        if slug.is_empty() {
            return Err(AuthError::validation("role slug cannot be empty"));
        }

        if self.roles.find_by_slug(scope, &slug)?.is_some() {
            return Err(AuthError::conflict(format!(
                "role slug '{slug}' already exists in this scope"
            )));
        }

        let now = Utc::now();
        let role = Role {
            id: RoleId::new(),
            name,
            slug,
            description: input.description,
            tenant_id: scope,
            role_type: if scope.is_none() {
                RoleType::System
            } else {
                RoleType::Custom
            },
            permissions: input.permissions,
            level: input.level,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        self.roles.upsert(role.clone())?;
        tracing::info!(role = %role.slug, tenant = ?role.tenant_id, "role created");
        Ok(role)
    }

    /// Update a role. System roles may only be touched by the platform
    /// owner — deactivation via `is_active` is the sole way to retire them.
    pub fn update_role(
        &self,
        actor: &TenantPrincipal,
        id: RoleId,
        update: RoleUpdate,
    ) -> AuthResult<Role> {
        let mut role = self.roles.find(id)?.ok_or(AuthError::NotFound)?;
        Self::ensure_can_mutate(actor, &role)?;

        if let Some(name) = update.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(AuthError::validation("role name cannot be empty"));
            }
            let slug = slugify(&name);
            match self.roles.find_by_slug(role.tenant_id, &slug)? {
                Some(existing) if existing.id != role.id => {
                    return Err(AuthError::conflict(format!(
                        "role slug '{slug}' already exists in this scope"
                    )));
                }
                _ => {}
            }
            role.name = name;
            role.slug = slug;
        }
        if let Some(description) = update.description {
            role.description = description;
        }
        if let Some(permissions) = update.permissions {
            role.permissions = permissions;
        }
        if let Some(level) = update.level {
            role.level = level;
        }
        if let Some(is_active) = update.is_active {
            role.is_active = is_active;
        }
        role.updated_at = Utc::now();

        self.roles.upsert(role.clone())?;
        Ok(role)
    }

    /// Delete a role. System roles are never deletable, by anyone.
    pub fn delete_role(&self, actor: &TenantPrincipal, id: RoleId) -> AuthResult<()> {
        let role = self.roles.find(id)?.ok_or(AuthError::NotFound)?;

        if role.is_system() {
            return Err(AuthError::forbidden(
                "system roles cannot be deleted; deactivate via update",
            ));
        }
        Self::ensure_can_mutate(actor, &role)?;

        self.roles.delete(id)?;
        tracing::info!(role = %role.slug, "role deleted");
        Ok(())
    }

    /// Fetch a role within the actor's visibility scope. Out-of-scope roles
    /// are indistinguishable from absent ones.
    pub fn get_role(&self, actor: &TenantPrincipal, id: RoleId) -> AuthResult<Role> {
        let scope = Self::visibility(actor)?;
        let role = self.roles.find(id)?.ok_or(AuthError::NotFound)?;
        if !scope.permits(&role) {
            return Err(AuthError::NotFound);
        }
        Ok(role)
    }

    /// List roles visible to the actor.
    pub fn list_roles(&self, actor: &TenantPrincipal, query: RoleQuery) -> AuthResult<Page<Role>> {
        let mut filter = RoleListFilter::new(Self::visibility(actor)?);
        filter.search = query.search.filter(|s| !s.trim().is_empty());
        filter.role_type = query.role_type;
        if let Some(page) = query.page {
            filter.page = page;
        }
        if let Some(per_page) = query.per_page {
            filter.per_page = per_page;
        }
        self.roles.list(&filter)
    }

    fn ensure_can_mutate(actor: &TenantPrincipal, role: &Role) -> AuthResult<()> {
        if role.is_system() {
            // A lesser platform-admin may not touch system roles.
            if actor.user_type != UserType::PlatformOwner {
                return Err(AuthError::forbidden(
                    "only the platform owner may modify system roles",
                ));
            }
            return Ok(());
        }

        if actor.is_platform_level() {
            return Ok(());
        }

        let own = actor
            .tenant_id
            .ok_or_else(|| AuthError::forbidden("tenant context required"))?;
        if role.tenant_id != Some(own) {
            return Err(AuthError::forbidden("role belongs to another tenant"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use nimbuscrm_core::{Action, Feature, UserId};
    use nimbuscrm_store::InMemoryRoleStore;

    use super::*;

    fn actor(user_type: UserType, tenant_id: Option<TenantId>) -> TenantPrincipal {
        TenantPrincipal {
            id: UserId::new(),
            email: "admin@tenant.example".to_string(),
            user_type,
            tenant_id,
            roles: vec![],
            groups: vec![],
            custom_permissions: vec![],
            is_active: true,
        }
    }

    fn new_role(name: &str, tenant_id: Option<TenantId>) -> NewRole {
        NewRole {
            name: name.to_string(),
            slug: None,
            description: format!("{name} role"),
            tenant_id,
            permissions: vec![PermissionGrant::new(
                Feature::new("lead_management"),
                [Action::new("read")],
            )],
            level: 10,
        }
    }

    fn admin() -> RoleAdmin<InMemoryRoleStore> {
        RoleAdmin::new(InMemoryRoleStore::new())
    }

    #[test]
    fn tenant_actor_creates_custom_role_in_own_tenant() {
        let svc = admin();
        let tenant = TenantId::new();
        let a = actor(UserType::TenantAdmin, Some(tenant));

        let role = svc.create_role(&a, new_role("Sales Manager", None)).unwrap();
        assert_eq!(role.tenant_id, Some(tenant));
        assert_eq!(role.role_type, RoleType::Custom);
        assert_eq!(role.slug, "sales-manager");
    }

    #[test]
    fn tenant_actor_cannot_target_another_tenant() {
        let svc = admin();
        let a = actor(UserType::TenantAdmin, Some(TenantId::new()));

        let err = svc
            .create_role(&a, new_role("Rogue", Some(TenantId::new())))
            .unwrap_err();
        assert!(matches!(err, AuthError::Forbidden(_)));
    }

    #[test]
    fn platform_actor_omitting_tenant_creates_system_role() {
        let svc = admin();
        let a = actor(UserType::PlatformOwner, None);

        let role = svc.create_role(&a, new_role("Global Support", None)).unwrap();
        assert_eq!(role.tenant_id, None);
        assert_eq!(role.role_type, RoleType::System);
    }

    #[test]
    fn duplicate_slug_in_scope_conflicts() {
        let svc = admin();
        let tenant = TenantId::new();
        let a = actor(UserType::TenantAdmin, Some(tenant));

        svc.create_role(&a, new_role("Closer", None)).unwrap();
        let err = svc.create_role(&a, new_role("closer", None)).unwrap_err();
        assert!(matches!(err, AuthError::Conflict(_)));

        // Same slug in a different scope is fine.
        let platform = actor(UserType::PlatformOwner, None);
        assert!(svc.create_role(&platform, new_role("Closer", None)).is_ok());
    }

    #[test]
    fn platform_admin_cannot_touch_system_roles() {
        // Scenario 4: a lesser platform-admin is refused both update and
        // delete; delete is refused for everyone.
        let svc = admin();
        let owner = actor(UserType::PlatformOwner, None);
        let lesser = actor(UserType::PlatformAdmin, None);

        let system = svc.create_role(&owner, new_role("Global Support", None)).unwrap();

        let err = svc
            .update_role(&lesser, system.id, RoleUpdate::default())
            .unwrap_err();
        assert!(matches!(err, AuthError::Forbidden(_)));

        let err = svc.delete_role(&lesser, system.id).unwrap_err();
        assert!(matches!(err, AuthError::Forbidden(_)));
    }

    #[test]
    fn system_roles_are_never_deletable_only_deactivatable() {
        let svc = admin();
        let owner = actor(UserType::PlatformOwner, None);
        let system = svc.create_role(&owner, new_role("Global Support", None)).unwrap();

        let err = svc.delete_role(&owner, system.id).unwrap_err();
        assert!(matches!(err, AuthError::Forbidden(_)));

        let retired = svc
            .update_role(
                &owner,
                system.id,
                RoleUpdate {
                    is_active: Some(false),
                    ..RoleUpdate::default()
                },
            )
            .unwrap();
        assert!(!retired.is_active);
    }

    #[test]
    fn tenant_actor_cannot_mutate_foreign_tenant_role() {
        let svc = admin();
        let tenant_a = actor(UserType::TenantAdmin, Some(TenantId::new()));
        let tenant_b = actor(UserType::TenantAdmin, Some(TenantId::new()));

        let role = svc.create_role(&tenant_a, new_role("Closer", None)).unwrap();

        let err = svc
            .update_role(&tenant_b, role.id, RoleUpdate::default())
            .unwrap_err();
        assert!(matches!(err, AuthError::Forbidden(_)));

        let err = svc.delete_role(&tenant_b, role.id).unwrap_err();
        assert!(matches!(err, AuthError::Forbidden(_)));

        // The owning tenant can delete its own custom role.
        svc.delete_role(&tenant_a, role.id).unwrap();
    }

    #[test]
    fn rename_rechecks_slug_uniqueness() {
        let svc = admin();
        let a = actor(UserType::TenantAdmin, Some(TenantId::new()));

        svc.create_role(&a, new_role("Closer", None)).unwrap();
        let other = svc.create_role(&a, new_role("Opener", None)).unwrap();

        let err = svc
            .update_role(
                &a,
                other.id,
                RoleUpdate {
                    name: Some("Closer".to_string()),
                    ..RoleUpdate::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, AuthError::Conflict(_)));

        // Renaming to itself is not a conflict.
        let same = svc
            .update_role(
                &a,
                other.id,
                RoleUpdate {
                    name: Some("opener".to_string()),
                    ..RoleUpdate::default()
                },
            )
            .unwrap();
        assert_eq!(same.slug, "opener");
    }

    #[test]
    fn get_role_hides_foreign_tenant_roles() {
        let svc = admin();
        let tenant_a = actor(UserType::TenantAdmin, Some(TenantId::new()));
        let tenant_b = actor(UserType::TenantAdmin, Some(TenantId::new()));
        let owner = actor(UserType::PlatformOwner, None);

        let role = svc.create_role(&tenant_a, new_role("Closer", None)).unwrap();
        let system = svc.create_role(&owner, new_role("Global", None)).unwrap();

        assert_eq!(svc.get_role(&tenant_b, role.id).unwrap_err(), AuthError::NotFound);
        // System roles are visible to every tenant.
        assert!(svc.get_role(&tenant_b, system.id).is_ok());
        assert!(svc.get_role(&owner, role.id).is_ok());
    }

    #[test]
    fn listing_unions_own_tenant_and_system() {
        let svc = admin();
        let tenant_a = actor(UserType::TenantAdmin, Some(TenantId::new()));
        let tenant_b = actor(UserType::TenantAdmin, Some(TenantId::new()));
        let owner = actor(UserType::PlatformOwner, None);

        svc.create_role(&tenant_a, new_role("Closer", None)).unwrap();
        svc.create_role(&tenant_b, new_role("Foreign", None)).unwrap();
        svc.create_role(&owner, new_role("Global", None)).unwrap();

        let page = svc.list_roles(&tenant_a, RoleQuery::default()).unwrap();
        let names: Vec<_> = page.items.iter().map(|r| r.name.as_str()).collect();
        assert!(names.contains(&"Closer"));
        assert!(names.contains(&"Global"));
        assert!(!names.contains(&"Foreign"));

        let all = svc.list_roles(&owner, RoleQuery::default()).unwrap();
        assert_eq!(all.total, 3);
    }
}
