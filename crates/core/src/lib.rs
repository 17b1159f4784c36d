//! `nimbuscrm-core` — shared vocabulary of the authorization core.
//!
//! This crate contains **pure domain** primitives (no infrastructure
//! concerns): identifiers, the ranked user-type hierarchy, permission value
//! objects, the `Role`/`Group` entities, and the error taxonomy.

pub mod error;
pub mod group;
pub mod id;
pub mod permission;
pub mod reseller;
pub mod role;
pub mod user_type;

pub use error::{AuthError, AuthResult};
pub use group::Group;
pub use id::{GroupId, ResellerId, RoleId, TenantId, UserId};
pub use permission::{Action, Feature, PermissionGrant};
pub use reseller::ResellerStatus;
pub use role::{slugify, Role, RoleType};
pub use user_type::UserType;
