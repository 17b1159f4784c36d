//! Bearer-token → [`Principal`] resolution.
//!
//! Runs on every request; there is deliberately no cross-request cache, so
//! role/permission edits take effect on the very next request at the cost
//! of one user lookup with the two-level populate.

use nimbuscrm_core::{AuthError, AuthResult, ResellerId, ResellerStatus, UserId, UserType};
use nimbuscrm_store::{ResellerStore, UserStore};

use crate::principal::{Principal, ResellerPrincipal, TenantPrincipal};
use crate::token::TokenService;

/// Turns an `Authorization` header into an authenticated [`Principal`].
pub struct PrincipalResolver<U, R> {
    tokens: TokenService,
    users: U,
    resellers: R,
}

impl<U, R> PrincipalResolver<U, R>
where
    U: UserStore,
    R: ResellerStore,
{
    pub fn new(tokens: TokenService, users: U, resellers: R) -> Self {
        Self {
            tokens,
            users,
            resellers,
        }
    }

    pub fn token_service(&self) -> &TokenService {
        &self.tokens
    }

    /// Resolve the `Authorization` header value (if any) to a principal.
    ///
    /// Fail closed: a missing/malformed header, a bad token, an absent or
    /// deactivated identity, and a faulting store all deny — a datastore
    /// error never grants by default.
    pub fn resolve(&self, authorization: Option<&str>) -> AuthResult<Principal> {
        let token = extract_bearer(authorization)?;
        let claims = self.tokens.verify(token)?;

        match claims.user_type {
            UserType::Reseller => {
                let id = ResellerId::from_uuid(claims.sub);
                let record = self
                    .resellers
                    .find(id)
                    .map_err(|e| {
                        tracing::debug!(error = %e, "reseller lookup failed during resolution");
                        AuthError::unauthenticated()
                    })?
                    .ok_or_else(AuthError::unauthenticated)?;

                if !record.is_active {
                    return Err(AuthError::unauthenticated());
                }
                // The approval state machine is enforced here, at the
                // boundary, not downstream.
                if record.status != ResellerStatus::Approved {
                    return Err(AuthError::unauthenticated_because(format!(
                        "reseller account is {}",
                        record.status
                    )));
                }

                Ok(Principal::Reseller(ResellerPrincipal::from(record)))
            }
            _ => {
                let id = UserId::from_uuid(claims.sub);
                let record = self
                    .users
                    .find_auth_user(id)
                    .map_err(|e| {
                        tracing::debug!(error = %e, "user lookup failed during resolution");
                        AuthError::unauthenticated()
                    })?
                    .ok_or_else(AuthError::unauthenticated)?;

                if !record.is_active {
                    return Err(AuthError::unauthenticated());
                }

                Ok(Principal::Tenant(TenantPrincipal::from(record)))
            }
        }
    }
}

/// Extract the token from a `Bearer <token>` header value.
fn extract_bearer(authorization: Option<&str>) -> AuthResult<&str> {
    let header = authorization.ok_or_else(AuthError::unauthenticated)?;
    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(AuthError::unauthenticated)?
        .trim();

    if token.is_empty() {
        return Err(AuthError::unauthenticated());
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use nimbuscrm_core::TenantId;
    use nimbuscrm_store::{
        InMemoryGroupStore, InMemoryResellerStore, InMemoryRoleStore, InMemoryUserStore,
        StoredReseller, StoredUser,
    };

    use super::*;
    use crate::token::TokenSeed;

    type Resolver =
        PrincipalResolver<InMemoryUserStore<Arc<InMemoryRoleStore>, Arc<InMemoryGroupStore>>, Arc<InMemoryResellerStore>>;

    fn fixture() -> (Resolver, Arc<InMemoryResellerStore>) {
        let roles = Arc::new(InMemoryRoleStore::new());
        let groups = Arc::new(InMemoryGroupStore::new());
        let users = InMemoryUserStore::new(roles, groups);
        let resellers = Arc::new(InMemoryResellerStore::new());
        let tokens = TokenService::new(b"resolver-test-secret", Duration::hours(1));

        (
            PrincipalResolver::new(tokens, users, Arc::clone(&resellers)),
            resellers,
        )
    }

    fn stored_user(user_type: UserType, is_active: bool) -> StoredUser {
        let now = Utc::now();
        StoredUser {
            id: UserId::new(),
            tenant_id: Some(TenantId::new()),
            email: "nadia@tenant.example".to_string(),
            display_name: "Nadia".to_string(),
            user_type,
            role_ids: vec![],
            custom_permissions: vec![],
            is_active,
            password_hash: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn stored_reseller(status: ResellerStatus, is_active: bool) -> StoredReseller {
        let now = Utc::now();
        StoredReseller {
            id: ResellerId::new(),
            email: "partner@example.com".to_string(),
            name: "Partner Co".to_string(),
            status,
            is_active,
            password_hash: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn bearer_for(resolver: &Resolver, seed: &TokenSeed) -> String {
        format!("Bearer {}", resolver.token_service().issue(seed).unwrap())
    }

    #[test]
    fn resolves_an_active_tenant_user() {
        let (resolver, _) = fixture();
        let user = stored_user(UserType::Manager, true);
        resolver.users.upsert(user.clone()).unwrap();

        let seed = TokenSeed::new(user.id, user.email.clone(), user.user_type, user.tenant_id);
        let principal = resolver.resolve(Some(&bearer_for(&resolver, &seed))).unwrap();

        let tenant = principal.as_tenant().expect("tenant principal");
        assert_eq!(tenant.id, user.id);
        assert_eq!(tenant.user_type, UserType::Manager);
        assert_eq!(tenant.tenant_id, user.tenant_id);
    }

    #[test]
    fn missing_or_malformed_header_denies() {
        let (resolver, _) = fixture();

        for header in [None, Some(""), Some("Token abc"), Some("Bearer "), Some("Bearer")] {
            let err = resolver.resolve(header).unwrap_err();
            assert_eq!(err, AuthError::unauthenticated(), "header: {header:?}");
        }
    }

    #[test]
    fn unknown_subject_denies() {
        let (resolver, _) = fixture();
        let seed = TokenSeed::new(
            Uuid::now_v7(),
            "ghost@tenant.example",
            UserType::Agent,
            None,
        );

        let err = resolver.resolve(Some(&bearer_for(&resolver, &seed))).unwrap_err();
        assert_eq!(err, AuthError::unauthenticated());
    }

    #[test]
    fn deactivated_user_denies_even_with_valid_token() {
        let (resolver, _) = fixture();
        let user = stored_user(UserType::Agent, false);
        resolver.users.upsert(user.clone()).unwrap();

        let seed = TokenSeed::new(user.id, user.email.clone(), user.user_type, user.tenant_id);
        let err = resolver.resolve(Some(&bearer_for(&resolver, &seed))).unwrap_err();
        assert_eq!(err, AuthError::unauthenticated());
    }

    #[test]
    fn approved_reseller_resolves() {
        let (resolver, resellers) = fixture();
        let partner = stored_reseller(ResellerStatus::Approved, true);
        resellers.upsert(partner.clone()).unwrap();

        let seed = TokenSeed::new(
            partner.id,
            partner.email.clone(),
            UserType::Reseller,
            None,
        );
        let principal = resolver.resolve(Some(&bearer_for(&resolver, &seed))).unwrap();

        let reseller = principal.as_reseller().expect("reseller principal");
        assert_eq!(reseller.id, partner.id);
        assert_eq!(reseller.status, ResellerStatus::Approved);
    }

    #[test]
    fn non_approved_reseller_denied_citing_status() {
        let (resolver, resellers) = fixture();

        for status in [
            ResellerStatus::Pending,
            ResellerStatus::Rejected,
            ResellerStatus::Suspended,
        ] {
            let partner = stored_reseller(status, true);
            resellers.upsert(partner.clone()).unwrap();

            let seed = TokenSeed::new(
                partner.id,
                partner.email.clone(),
                UserType::Reseller,
                None,
            );
            let err = resolver.resolve(Some(&bearer_for(&resolver, &seed))).unwrap_err();

            match err {
                AuthError::Unauthenticated(msg) => {
                    assert!(msg.contains(status.as_str()), "message: {msg}")
                }
                other => panic!("expected Unauthenticated, got {other:?}"),
            }
        }
    }

    #[test]
    fn deactivated_reseller_denies_generically() {
        let (resolver, resellers) = fixture();
        let partner = stored_reseller(ResellerStatus::Approved, false);
        resellers.upsert(partner.clone()).unwrap();

        let seed = TokenSeed::new(
            partner.id,
            partner.email.clone(),
            UserType::Reseller,
            None,
        );
        let err = resolver.resolve(Some(&bearer_for(&resolver, &seed))).unwrap_err();
        assert_eq!(err, AuthError::unauthenticated());
    }
}
