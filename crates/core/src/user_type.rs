//! Ranked user types and the management hierarchy.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// The kind of actor behind a token.
///
/// Ranks returned by [`UserType::hierarchy_level`] are used **only** for
/// user-management comparisons (who may mutate whom), never for feature
/// permission checks. The bypass rules that short-circuit the permission
/// resolver live in one place: `nimbuscrm-auth::permissions`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    /// Top platform role; the only actor allowed to mutate system roles.
    PlatformOwner,
    /// Platform staff; full feature access but no system-role mutation.
    PlatformAdmin,
    /// Administers a single tenant.
    TenantAdmin,
    Manager,
    TeamLead,
    Agent,
    Viewer,
    /// Partner identity resolved against the reseller store, not the user
    /// store. Appears in token claims only; a tenant principal never
    /// carries it.
    Reseller,
}

impl UserType {
    /// Numeric rank for user-management comparisons. Gaps are deliberate so
    /// new ranks can slot in without renumbering.
    pub fn hierarchy_level(&self) -> i32 {
        match self {
            UserType::PlatformOwner => 100,
            UserType::PlatformAdmin => 90,
            UserType::TenantAdmin => 80,
            UserType::Manager => 60,
            UserType::TeamLead => 40,
            UserType::Agent => 20,
            UserType::Viewer => 10,
            UserType::Reseller => 0,
        }
    }

    /// Platform-level actors are unbound by tenant isolation.
    pub fn is_platform_level(&self) -> bool {
        matches!(self, UserType::PlatformOwner | UserType::PlatformAdmin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::PlatformOwner => "platform_owner",
            UserType::PlatformAdmin => "platform_admin",
            UserType::TenantAdmin => "tenant_admin",
            UserType::Manager => "manager",
            UserType::TeamLead => "team_lead",
            UserType::Agent => "agent",
            UserType::Viewer => "viewer",
            UserType::Reseller => "reseller",
        }
    }
}

impl core::fmt::Display for UserType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserType {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "platform_owner" => Ok(UserType::PlatformOwner),
            "platform_admin" => Ok(UserType::PlatformAdmin),
            "tenant_admin" => Ok(UserType::TenantAdmin),
            "manager" => Ok(UserType::Manager),
            "team_lead" => Ok(UserType::TeamLead),
            "agent" => Ok(UserType::Agent),
            "viewer" => Ok(UserType::Viewer),
            "reseller" => Ok(UserType::Reseller),
            other => Err(AuthError::invalid_id(format!("unknown user type: {other}"))),
        }
    }
}
