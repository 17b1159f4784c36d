//! Feature-permission resolution.
//!
//! One ordered rule table, first match wins. The bypass branches live here
//! and nowhere else so they stay auditable in one place.

use nimbuscrm_core::{Action, Feature, UserType};

use crate::principal::TenantPrincipal;

/// Decide whether `principal` may perform `action` on `feature`.
///
/// Evaluation order:
/// 1. platform-level user types: always allowed;
/// 2. tenant-admin: always allowed — tenant scoping is the guards' job
///    (`verify_tenant_context`), not this function's;
/// 3. a `custom_permissions` entry for the feature fully determines the
///    result; a non-matching entry denies **without** falling through to
///    roles or groups (override, not merge);
/// 4. directly-assigned roles;
/// 5. group-inherited roles;
/// 6. the groups' own grants;
/// 7. deny.
pub fn has_permission(principal: &TenantPrincipal, feature: &Feature, action: &Action) -> bool {
    match principal.user_type {
        UserType::PlatformOwner | UserType::PlatformAdmin | UserType::TenantAdmin => return true,
        _ => {}
    }

    // Per-user override: most specific wins, no fallthrough.
    if let Some(entry) = principal
        .custom_permissions
        .iter()
        .find(|g| &g.feature == feature)
    {
        return entry.allows(action);
    }

    if principal.roles.iter().any(|r| r.grants(feature, action)) {
        return true;
    }

    if principal
        .groups
        .iter()
        .flat_map(|g| g.roles.iter())
        .any(|r| r.grants(feature, action))
    {
        return true;
    }

    if principal
        .groups
        .iter()
        .flat_map(|g| g.group.group_permissions.iter())
        .any(|grant| &grant.feature == feature && grant.allows(action))
    {
        return true;
    }

    false
}

/// True when at least one `(feature, action)` pair is allowed.
pub fn has_any_permission<'a>(
    principal: &TenantPrincipal,
    pairs: impl IntoIterator<Item = (&'a Feature, &'a Action)>,
) -> bool {
    pairs
        .into_iter()
        .any(|(f, a)| has_permission(principal, f, a))
}

/// True when every `(feature, action)` pair is allowed.
pub fn has_all_permissions<'a>(
    principal: &TenantPrincipal,
    pairs: impl IntoIterator<Item = (&'a Feature, &'a Action)>,
) -> bool {
    pairs
        .into_iter()
        .all(|(f, a)| has_permission(principal, f, a))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use proptest::prelude::*;

    use nimbuscrm_core::{
        Group, GroupId, PermissionGrant, Role, RoleId, RoleType, TenantId, UserId,
    };
    use nimbuscrm_store::GroupWithRoles;

    use super::*;

    fn feature(name: &'static str) -> Feature {
        Feature::new(name)
    }

    fn action(name: &'static str) -> Action {
        Action::new(name)
    }

    fn role_granting(f: &Feature, actions: &[Action]) -> Role {
        let now = Utc::now();
        Role {
            id: RoleId::new(),
            name: "Test Role".to_string(),
            slug: "test-role".to_string(),
            description: String::new(),
            tenant_id: Some(TenantId::new()),
            role_type: RoleType::Custom,
            permissions: vec![PermissionGrant::new(f.clone(), actions.iter().cloned())],
            level: 10,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn group_with(roles: Vec<Role>, grants: Vec<PermissionGrant>) -> GroupWithRoles {
        let now = Utc::now();
        GroupWithRoles {
            group: Group {
                id: GroupId::new(),
                name: "Test Group".to_string(),
                tenant_id: TenantId::new(),
                roles: roles.iter().map(|r| r.id).collect(),
                group_permissions: grants,
                members: vec![],
                is_active: true,
                created_at: now,
                updated_at: now,
            },
            roles,
        }
    }

    fn principal(user_type: UserType) -> TenantPrincipal {
        TenantPrincipal {
            id: UserId::new(),
            email: "user@tenant.example".to_string(),
            user_type,
            tenant_id: Some(TenantId::new()),
            roles: vec![],
            groups: vec![],
            custom_permissions: vec![],
            is_active: true,
        }
    }

    #[test]
    fn platform_levels_bypass_everything() {
        for ut in [UserType::PlatformOwner, UserType::PlatformAdmin] {
            let p = principal(ut);
            assert!(has_permission(&p, &feature("anything"), &action("obliterate")));
        }
    }

    #[test]
    fn tenant_admin_bypasses_independent_of_roles() {
        let p = principal(UserType::TenantAdmin);
        assert!(has_permission(&p, &feature("lead_management"), &action("delete")));
    }

    #[test]
    fn custom_read_grant_scenario() {
        // Scenario 1: no roles/groups, custom read on lead_management.
        let mut p = principal(UserType::Agent);
        p.custom_permissions = vec![PermissionGrant::new(
            feature("lead_management"),
            [action("read")],
        )];

        assert!(has_permission(&p, &feature("lead_management"), &action("read")));
        assert!(!has_permission(&p, &feature("lead_management"), &action("delete")));
    }

    #[test]
    fn override_blocks_role_grant_for_same_feature() {
        // Scenario 2: a role grants delete, but the custom entry for the
        // feature exists and lacks it — the override wins.
        let mut p = principal(UserType::Agent);
        p.custom_permissions = vec![PermissionGrant::new(
            feature("lead_management"),
            [action("read")],
        )];
        p.roles = vec![role_granting(&feature("lead_management"), &[action("delete")])];

        assert!(!has_permission(&p, &feature("lead_management"), &action("delete")));
        // A feature with no custom entry still reaches the roles.
        p.roles
            .push(role_granting(&feature("contact_management"), &[action("read")]));
        assert!(has_permission(&p, &feature("contact_management"), &action("read")));
    }

    #[test]
    fn group_manage_grant_scenario() {
        // Scenario 3: group-level manage implies every action.
        let mut p = principal(UserType::Agent);
        p.groups = vec![group_with(
            vec![],
            vec![PermissionGrant::new(
                feature("contact_management"),
                [Action::MANAGE],
            )],
        )];

        assert!(has_permission(&p, &feature("contact_management"), &action("create")));
        assert!(has_permission(&p, &feature("contact_management"), &action("export")));
    }

    #[test]
    fn group_inherited_role_grants() {
        let mut p = principal(UserType::Agent);
        let r = role_granting(&feature("deal_management"), &[action("update")]);
        p.groups = vec![group_with(vec![r], vec![])];

        assert!(has_permission(&p, &feature("deal_management"), &action("update")));
        assert!(!has_permission(&p, &feature("deal_management"), &action("delete")));
    }

    #[test]
    fn inactive_role_contributes_nothing() {
        let mut p = principal(UserType::Agent);
        let mut r = role_granting(&feature("lead_management"), &[Action::MANAGE]);
        r.is_active = false;
        p.roles = vec![r];

        assert!(!has_permission(&p, &feature("lead_management"), &action("read")));
    }

    #[test]
    fn manage_from_any_source_implies_all() {
        let f = feature("lead_management");

        let mut via_custom = principal(UserType::Agent);
        via_custom.custom_permissions = vec![PermissionGrant::new(f.clone(), [Action::MANAGE])];

        let mut via_role = principal(UserType::Agent);
        via_role.roles = vec![role_granting(&f, &[Action::MANAGE])];

        let mut via_group_role = principal(UserType::Agent);
        via_group_role.groups = vec![group_with(vec![role_granting(&f, &[Action::MANAGE])], vec![])];

        for p in [&via_custom, &via_role, &via_group_role] {
            for a in ["create", "read", "update", "delete", "import", "export"] {
                assert!(has_permission(p, &f, &action(a)));
            }
        }
    }

    #[test]
    fn any_and_all_folds() {
        let mut p = principal(UserType::Agent);
        p.custom_permissions = vec![PermissionGrant::new(
            feature("lead_management"),
            [action("read")],
        )];

        let f = feature("lead_management");
        let read = action("read");
        let delete = action("delete");

        assert!(has_any_permission(&p, [(&f, &read), (&f, &delete)]));
        assert!(!has_all_permissions(&p, [(&f, &read), (&f, &delete)]));
        assert!(has_all_permissions(&p, [(&f, &read)]));
        // Vacuous truth over the empty list.
        assert!(has_all_permissions(&p, []));
        assert!(!has_any_permission(&p, []));
    }

    proptest! {
        /// Platform principals are allowed for *every* (feature, action).
        #[test]
        fn platform_bypass_is_universal(f in "[a-z_]{1,24}", a in "[a-z_]{1,24}") {
            let p = principal(UserType::PlatformOwner);
            prop_assert!(has_permission(
                &p,
                &Feature::new(f),
                &Action::new(a),
            ));
        }

        /// Adding a matching role grant flips deny→allow; removing it
        /// reverts (no other sources).
        #[test]
        fn monotonicity_of_role_grants(f in "[a-z_]{1,24}", a in "[a-z_]{1,24}") {
            let feature = Feature::new(f);
            let act = Action::new(a);

            let mut p = principal(UserType::Agent);
            prop_assert!(!has_permission(&p, &feature, &act));

            p.roles = vec![role_granting(&feature, std::slice::from_ref(&act))];
            prop_assert!(has_permission(&p, &feature, &act));

            p.roles.clear();
            prop_assert!(!has_permission(&p, &feature, &act));
        }

        /// A custom entry lacking both `manage` and the action denies even
        /// when a role would grant it.
        #[test]
        fn override_property(f in "[a-z_]{1,24}") {
            let feature = Feature::new(f);
            let wanted = Action::new("delete");

            let mut p = principal(UserType::Agent);
            p.custom_permissions = vec![PermissionGrant::new(
                feature.clone(),
                [Action::new("read")],
            )];
            p.roles = vec![role_granting(&feature, std::slice::from_ref(&wanted))];

            prop_assert!(!has_permission(&p, &feature, &wanted));
        }
    }
}
