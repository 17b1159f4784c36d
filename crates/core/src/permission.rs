//! Permission value objects.
//!
//! Features and actions are opaque strings (e.g. feature `"lead_management"`,
//! action `"export"`). The engine interprets exactly one action specially:
//! [`Action::MANAGE`], which implies every other action on its feature.

use std::borrow::Cow;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A protected capability area (open namespace).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Feature(Cow<'static, str>);

impl Feature {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Feature {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// An operation on a feature (open namespace).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Action(Cow<'static, str>);

impl Action {
    /// Privileged action implying every other action on its feature.
    pub const MANAGE: Action = Action(Cow::Borrowed("manage"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_manage(&self) -> bool {
        self.as_str() == "manage"
    }
}

impl core::fmt::Display for Action {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A set of actions granted on one feature.
///
/// Grants appear on roles (`permissions`), on groups (`group_permissions`)
/// and as per-user overrides (`custom_permissions`); the combination rules
/// live in the permission resolver, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionGrant {
    pub feature: Feature,
    pub actions: BTreeSet<Action>,
}

impl PermissionGrant {
    pub fn new(feature: Feature, actions: impl IntoIterator<Item = Action>) -> Self {
        Self {
            feature,
            actions: actions.into_iter().collect(),
        }
    }

    /// True when this grant covers `action`: either the exact action or the
    /// `manage` umbrella is present.
    pub fn allows(&self, action: &Action) -> bool {
        self.actions.contains(&Action::MANAGE) || self.actions.contains(action)
    }
}
