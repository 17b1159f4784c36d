//! `nimbuscrm-store` — datastore seams consumed by the authorization core.
//!
//! Traits describe exactly the reads and writes the engine needs; the
//! in-memory implementations back tests and dev. Every tenant-scoped read
//! carries a tenant-equality predicate — isolation is enforced by
//! filtering, not locking. Shared documents are last-write-wins under the
//! store lock.

pub mod memory;
pub mod records;
pub mod traits;

pub use memory::{InMemoryGroupStore, InMemoryResellerStore, InMemoryRoleStore, InMemoryUserStore};
pub use records::{AuthUserRecord, GroupWithRoles, ResellerRecord, StoredReseller, StoredUser};
pub use traits::{
    GroupStore, Page, ResellerStore, RoleListFilter, RoleScope, RoleStore, UserStore,
};
