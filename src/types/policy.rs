//! The external-facing `(path, name)` policy record.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::path::PathComponents;

/// A policy name attached to a hierarchical path.
///
/// On lookup, `name` is empty when no rule applies to `path`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct Policy {
    /// `/`-delimited path, e.g. `/serviceDomain:.*/project:.*`
    pub path: String,
    /// Opaque policy name
    pub name: String,
}

/// An ordered batch of policies, as read from a policy document.
pub type Policies = Vec<Policy>;

impl Policy {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Policy {
            path: path.into(),
            name: name.into(),
        }
    }

    pub fn path_components(&self) -> PathComponents {
        PathComponents::parse(&self.path)
    }

    /// The policy name with surrounding whitespace removed.
    pub fn policy_name(&self) -> &str {
        self.name.trim()
    }

    /// The path re-rendered from its components, e.g. `/a/b`.
    pub fn normalized_path(&self) -> String {
        self.path_components().to_string()
    }

    /// True when a lookup found no applicable rule.
    pub fn is_unassigned(&self) -> bool {
        self.policy_name().is_empty()
    }
}

impl Display for Policy {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{} => {}", self.path, self.name)
    }
}
