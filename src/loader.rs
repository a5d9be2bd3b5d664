use tracing::{error, warn};

use crate::error::PolicyError;
use crate::node::Node;
use crate::types::{Policies, Policy};

/// Parse a policy document: a JSON array of `{"path": .., "name": ..}`.
///
/// Any JSON error is mapped into `PolicyError::ParseError`.
///
/// Example:
/// ```rust
/// use policy_tree::parse_policies;
/// let text = r#"[
///     {"path": "/serviceDomain:.*", "name": "infra"},
///     {"path": "/serviceDomain:.*/project:.*", "name": "project"}
/// ]"#;
/// let policies = parse_policies(text).unwrap();
/// assert_eq!(policies.len(), 2);
/// ```
pub fn parse_policies(text: &str) -> Result<Policies, PolicyError> {
    Ok(serde_json::from_str(text)?)
}

/// A tree built away from the live manager, ready to be swapped in.
#[derive(Debug)]
pub(crate) struct BuiltTree {
    pub(crate) root: Node,
    pub(crate) loaded: usize,
    pub(crate) skipped: usize,
}

/// Build a fresh tree from `policies`.
///
/// Entries with an empty name or an empty path are skipped. The first
/// wildcard segment that fails to compile aborts the whole build.
pub(crate) fn build_tree(policies: &[Policy]) -> Result<BuiltTree, PolicyError> {
    let mut root = Node::root();
    let mut loaded = 0;
    let mut skipped = 0;

    for policy in policies {
        let policy_name = policy.policy_name();
        let components = policy.path_components();
        if policy_name.is_empty() || components.is_empty() {
            warn!(
                event = "Load",
                phase = "Skip",
                path = policy.path.as_str(),
                name = policy.name.as_str()
            );
            skipped += 1;
            continue;
        }

        if let Err(err) = root.set_policy(&components, policy_name) {
            error!(
                event = "Load",
                phase = "Failed",
                path = policy.path.as_str(),
                name = policy_name,
                error = err.to_string()
            );
            return Err(err);
        }
        loaded += 1;
    }

    Ok(BuiltTree {
        root,
        loaded,
        skipped,
    })
}
