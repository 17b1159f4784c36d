//! Reseller partner approval states.

use serde::{Deserialize, Serialize};

/// Approval state machine for a reseller partner.
///
/// Only `Approved` resellers may resolve to a principal; the other states
/// are enforced at the principal-resolution boundary, not downstream.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResellerStatus {
    Pending,
    Approved,
    Rejected,
    Suspended,
}

impl ResellerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResellerStatus::Pending => "pending",
            ResellerStatus::Approved => "approved",
            ResellerStatus::Rejected => "rejected",
            ResellerStatus::Suspended => "suspended",
        }
    }
}

impl core::fmt::Display for ResellerStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
