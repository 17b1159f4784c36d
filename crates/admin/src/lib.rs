//! `nimbuscrm-admin` — role and group administration.
//!
//! Every operation takes the acting tenant principal and enforces scope
//! before touching the store: slug uniqueness per tenant scope, system-role
//! protection, and tenant isolation by filtering. Resellers never reach
//! these services; the API guards reject them first.

pub mod groups;
pub mod roles;

pub use groups::{GroupAdmin, GroupUpdate, NewGroup};
pub use roles::{NewRole, RoleAdmin, RoleQuery, RoleUpdate};
