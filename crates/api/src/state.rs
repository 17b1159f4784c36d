//! Application state and service wiring.

use std::sync::Arc;

use chrono::Duration;

use nimbuscrm_admin::{GroupAdmin, RoleAdmin};
use nimbuscrm_auth::{PrincipalResolver, TokenService};
use nimbuscrm_store::{
    InMemoryGroupStore, InMemoryResellerStore, InMemoryRoleStore, InMemoryUserStore,
};

pub type RoleStoreHandle = Arc<InMemoryRoleStore>;
pub type GroupStoreHandle = Arc<InMemoryGroupStore>;
pub type UserStoreHandle = Arc<InMemoryUserStore<RoleStoreHandle, GroupStoreHandle>>;
pub type ResellerStoreHandle = Arc<InMemoryResellerStore>;
pub type Resolver = PrincipalResolver<UserStoreHandle, ResellerStoreHandle>;

/// Shared per-process state. Stores are shared mutable documents; every
/// request re-resolves its principal against them, so edits take effect on
/// the next request.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<Resolver>,
    pub users: UserStoreHandle,
    pub resellers: ResellerStoreHandle,
    pub role_admin: Arc<RoleAdmin<RoleStoreHandle>>,
    pub group_admin: Arc<GroupAdmin<GroupStoreHandle, RoleStoreHandle>>,
}

impl AppState {
    /// Wire the in-memory stack.
    pub fn new(jwt_secret: &[u8], token_ttl: Duration) -> Self {
        let roles: RoleStoreHandle = Arc::new(InMemoryRoleStore::new());
        let groups: GroupStoreHandle = Arc::new(InMemoryGroupStore::new());
        let users: UserStoreHandle = Arc::new(InMemoryUserStore::new(
            Arc::clone(&roles),
            Arc::clone(&groups),
        ));
        let resellers: ResellerStoreHandle = Arc::new(InMemoryResellerStore::new());

        let tokens = TokenService::new(jwt_secret, token_ttl);
        let resolver = Arc::new(PrincipalResolver::new(
            tokens,
            Arc::clone(&users),
            Arc::clone(&resellers),
        ));

        Self {
            resolver,
            users,
            resellers,
            role_admin: Arc::new(RoleAdmin::new(Arc::clone(&roles))),
            group_admin: Arc::new(GroupAdmin::new(groups, roles)),
        }
    }
}
