//! Hierarchy-based user-management authorization.

use nimbuscrm_core::UserType;

use crate::principal::TenantPrincipal;

/// May `actor` manage (mutate) `target`?
///
/// - platform-level actors manage everyone;
/// - a tenant-admin manages every user in their own tenant, other admins
///   included;
/// - everyone else needs a strictly higher hierarchy rank *and* the same
///   tenant.
///
/// Callers must independently reject self-targeted deletion; this predicate
/// does not.
pub fn can_manage_user(actor: &TenantPrincipal, target: &TenantPrincipal) -> bool {
    if actor.is_platform_level() {
        return true;
    }

    let same_tenant = match (actor.tenant_id, target.tenant_id) {
        (Some(a), Some(t)) => a == t,
        _ => false,
    };

    if actor.user_type == UserType::TenantAdmin {
        return same_tenant;
    }

    same_tenant && actor.user_type.hierarchy_level() > target.user_type.hierarchy_level()
}
