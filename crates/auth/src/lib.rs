//! `nimbuscrm-auth` — authentication and authorization boundary.
//!
//! Everything here is request-scoped: a [`Principal`] is resolved fresh for
//! each request (no cross-request cache) and discarded afterwards, so role
//! and permission edits take effect on the next request.

pub mod password;
pub mod permissions;
pub mod principal;
pub mod resolver;
pub mod token;
pub mod user_admin;

pub use password::{hash_password, verify_password};
pub use permissions::{has_all_permissions, has_any_permission, has_permission};
pub use principal::{Principal, ResellerPrincipal, TenantPrincipal};
pub use resolver::PrincipalResolver;
pub use token::{Claims, TokenSeed, TokenService};
pub use user_admin::can_manage_user;
