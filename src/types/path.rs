//! Decomposition of `/`-delimited policy paths into components.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::ops::Deref;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Separator between path components.
pub const PATH_SEPARATOR: char = '/';

/// Marker that turns a path component into a regular expression.
pub const WILDCARD_MARKER: char = '*';

/// The trimmed, non-empty segments of a policy path, in order.
///
/// Segments are opaque to the manager; a `type:value` convention such as
/// `serviceDomain:abc` is carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct PathComponents(Vec<String>);

impl PathComponents {
    /// Split `path` on `/`, trim every token and drop the empty ones.
    pub fn parse(path: &str) -> Self {
        PathComponents(
            path.split(PATH_SEPARATOR)
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }
}

impl Deref for PathComponents {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Renders the canonical `/a/b/c` form.
impl Display for PathComponents {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "/{}", self.0.iter().join("/"))
    }
}

/// Whether a component should be compiled as a regular expression.
pub fn is_wildcard(component: &str) -> bool {
    component.contains(WILDCARD_MARKER)
}
