//! Route-boundary access guards.
//!
//! Pure predicates over the resolved [`Principal`]; handlers call them
//! before doing anything else. Each returns the engine error, so the same
//! denial renders identically wherever it fires.

use nimbuscrm_auth::{Principal, ResellerPrincipal, TenantPrincipal};
use nimbuscrm_core::{Action, AuthError, AuthResult, Feature, ResellerStatus, TenantId, UserType};

/// The route is for tenant users (platform staff included); resellers are
/// turned away by type.
pub fn require_tenant_principal(principal: &Principal) -> AuthResult<&TenantPrincipal> {
    principal
        .as_tenant()
        .ok_or_else(|| AuthError::forbidden("tenant user account required"))
}

/// The route is for approved reseller partners only.
pub fn require_reseller_level(principal: &Principal) -> AuthResult<&ResellerPrincipal> {
    let reseller = principal
        .as_reseller()
        .ok_or_else(|| AuthError::forbidden("reseller account required"))?;
    // The resolver already rejects non-approved resellers; this re-check
    // keeps the guard safe if it is ever handed an unresolved principal.
    if reseller.status != ResellerStatus::Approved {
        return Err(AuthError::forbidden("reseller account required"));
    }
    Ok(reseller)
}

/// The route is for an explicit set of user types.
pub fn require_user_types(
    principal: &TenantPrincipal,
    allowed: &[UserType],
) -> AuthResult<()> {
    if allowed.contains(&principal.user_type) {
        Ok(())
    } else {
        Err(AuthError::forbidden(format!(
            "user type '{}' may not access this resource",
            principal.user_type
        )))
    }
}

/// The route needs a tenant context; platform users without one are refused.
pub fn require_tenant_context(principal: &TenantPrincipal) -> AuthResult<TenantId> {
    principal
        .tenant_id
        .ok_or_else(|| AuthError::forbidden("tenant context required"))
}

/// Platform-staff-only route.
pub fn require_saas_level(principal: &Principal) -> AuthResult<&TenantPrincipal> {
    let tenant = require_tenant_principal(principal)?;
    if tenant.is_platform_level() {
        Ok(tenant)
    } else {
        Err(AuthError::forbidden("platform-level access required"))
    }
}

/// Cross-tenant isolation check for routes addressing a specific tenant.
///
/// Platform-level users pass for any tenant (even an absent one); everyone
/// else needs the requested tenant present and equal to their own.
/// Resellers never pass.
pub fn verify_tenant_context(
    principal: &Principal,
    requested: Option<TenantId>,
) -> AuthResult<()> {
    let tenant = require_tenant_principal(principal)?;

    if tenant.is_platform_level() {
        return Ok(());
    }
    match requested {
        Some(t) if tenant.tenant_id == Some(t) => Ok(()),
        _ => Err(AuthError::forbidden(
            "access to another tenant's resources is not permitted",
        )),
    }
}

/// Feature-permission gate; the denial names the feature and action so the
/// caller knows which grant they lack.
pub fn require_feature_permission(
    principal: &Principal,
    feature: &Feature,
    action: &Action,
) -> AuthResult<()> {
    if principal.has_permission(feature, action) {
        Ok(())
    } else {
        Err(AuthError::forbidden(format!(
            "permission denied: {feature}.{action}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use nimbuscrm_core::{PermissionGrant, ResellerId, ResellerStatus, UserId};

    use super::*;

    fn tenant_user(user_type: UserType, tenant_id: Option<TenantId>) -> Principal {
        Principal::Tenant(TenantPrincipal {
            id: UserId::new(),
            email: "user@tenant.example".to_string(),
            user_type,
            tenant_id,
            roles: vec![],
            groups: vec![],
            custom_permissions: vec![],
            is_active: true,
        })
    }

    fn reseller() -> Principal {
        Principal::Reseller(ResellerPrincipal {
            id: ResellerId::new(),
            email: "partner@example.com".to_string(),
            name: "Partner Co".to_string(),
            status: ResellerStatus::Approved,
            is_active: true,
        })
    }

    #[test]
    fn reseller_is_rejected_from_tenant_routes() {
        let p = reseller();
        assert!(matches!(
            require_tenant_principal(&p).unwrap_err(),
            AuthError::Forbidden(_)
        ));
        assert!(require_reseller_level(&p).is_ok());
    }

    #[test]
    fn tenant_user_is_rejected_from_reseller_routes() {
        let p = tenant_user(UserType::Agent, Some(TenantId::new()));
        assert!(matches!(
            require_reseller_level(&p).unwrap_err(),
            AuthError::Forbidden(_)
        ));
    }

    #[test]
    fn user_type_gate_names_the_type() {
        let p = tenant_user(UserType::Viewer, Some(TenantId::new()));
        let tenant = p.as_tenant().unwrap();

        assert!(require_user_types(tenant, &[UserType::Viewer, UserType::Agent]).is_ok());

        let err = require_user_types(tenant, &[UserType::TenantAdmin]).unwrap_err();
        match err {
            AuthError::Forbidden(msg) => assert!(msg.contains("viewer"), "message: {msg}"),
            other => panic!("expected Forbidden, got {other:?}"),
        }
    }

    #[test]
    fn saas_level_admits_platform_staff_only() {
        assert!(require_saas_level(&tenant_user(UserType::PlatformOwner, None)).is_ok());
        assert!(require_saas_level(&tenant_user(UserType::PlatformAdmin, None)).is_ok());

        for p in [
            tenant_user(UserType::TenantAdmin, Some(TenantId::new())),
            tenant_user(UserType::Agent, Some(TenantId::new())),
            reseller(),
        ] {
            assert!(matches!(
                require_saas_level(&p).unwrap_err(),
                AuthError::Forbidden(_)
            ));
        }
    }

    #[test]
    fn tenant_context_matrix() {
        let tenant = TenantId::new();
        let other = TenantId::new();

        // Platform users pass for any tenant, present or absent.
        let platform = tenant_user(UserType::PlatformAdmin, None);
        assert!(verify_tenant_context(&platform, Some(tenant)).is_ok());
        assert!(verify_tenant_context(&platform, None).is_ok());

        // A tenant user passes only for their own, explicitly named.
        let member = tenant_user(UserType::Manager, Some(tenant));
        assert!(verify_tenant_context(&member, Some(tenant)).is_ok());
        assert!(matches!(
            verify_tenant_context(&member, Some(other)).unwrap_err(),
            AuthError::Forbidden(_)
        ));
        assert!(matches!(
            verify_tenant_context(&member, None).unwrap_err(),
            AuthError::Forbidden(_)
        ));

        // Resellers never pass.
        assert!(matches!(
            verify_tenant_context(&reseller(), Some(tenant)).unwrap_err(),
            AuthError::Forbidden(_)
        ));
    }

    #[test]
    fn feature_gate_denial_names_feature_and_action() {
        let p = tenant_user(UserType::Agent, Some(TenantId::new()));

        let err = require_feature_permission(
            &p,
            &Feature::new("role_management"),
            &Action::new("create"),
        )
        .unwrap_err();
        match err {
            AuthError::Forbidden(msg) => {
                assert_eq!(msg, "permission denied: role_management.create")
            }
            other => panic!("expected Forbidden, got {other:?}"),
        }
    }

    #[test]
    fn feature_gate_passes_with_a_custom_grant() {
        let mut tenant = match tenant_user(UserType::Agent, Some(TenantId::new())) {
            Principal::Tenant(t) => t,
            Principal::Reseller(_) => unreachable!(),
        };
        tenant.custom_permissions = vec![PermissionGrant::new(
            Feature::new("role_management"),
            [Action::new("create")],
        )];
        let p = Principal::Tenant(tenant);

        assert!(require_feature_permission(
            &p,
            &Feature::new("role_management"),
            &Action::new("create"),
        )
        .is_ok());
    }
}
