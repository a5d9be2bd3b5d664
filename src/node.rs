//! The n-ary tree behind [`PolicyManager`](crate::PolicyManager).
//!
//! Every node stands for one path component. Policies stored at nodes farther
//! from the root override the ones matched higher up, so resolution behaves
//! like a longest-prefix match.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::error::PolicyError;
use crate::types::{Policies, Policy, is_wildcard};

/// Id of the root node. The root never matches a component itself.
pub const ROOT_ID: &str = "Root";

/// A component made of the marker alone matches any single component.
const ANY_COMPONENT: &str = "*";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    id: String,
    #[serde(skip)]
    pattern: Option<Regex>,
    #[serde(skip_serializing_if = "String::is_empty")]
    policy_name: String,
    // Ordered so that sibling iteration, and therefore tie-breaking between
    // several matching wildcard children, is deterministic.
    #[serde(rename = "childNodes", skip_serializing_if = "BTreeMap::is_empty")]
    children: BTreeMap<String, Node>,
}

impl Node {
    pub fn root() -> Self {
        Node {
            id: ROOT_ID.to_string(),
            pattern: None,
            policy_name: String::new(),
            children: BTreeMap::new(),
        }
    }

    /// Build a node for `component`, compiling it when it carries the
    /// wildcard marker. Patterns are anchored to the full component.
    fn for_component(component: &str) -> Result<Self, PolicyError> {
        let pattern = if is_wildcard(component) {
            let source = if component == ANY_COMPONENT {
                ".*"
            } else {
                component
            };
            let anchored = format!("^(?:{source})$");
            let re = Regex::new(&anchored).map_err(|e| PolicyError::InvalidPattern {
                segment: component.to_string(),
                reason: e.to_string(),
            })?;
            Some(re)
        } else {
            None
        };

        Ok(Node {
            id: component.to_string(),
            pattern,
            policy_name: String::new(),
            children: BTreeMap::new(),
        })
    }

    #[cfg(test)]
    pub fn policy_name(&self) -> &str {
        &self.policy_name
    }

    pub fn is_pattern(&self) -> bool {
        self.pattern.is_some()
    }

    pub fn children(&self) -> &BTreeMap<String, Node> {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Literal equality first, then the compiled pattern if there is one.
    pub fn matches(&self, component: &str) -> bool {
        self.id == component
            || self
                .pattern
                .as_ref()
                .is_some_and(|re| re.is_match(component))
    }

    /// Attach `policy_name` to the node reached by `components`, creating
    /// intermediate nodes as needed. An empty `components` targets `self`.
    pub fn set_policy<S: AsRef<str>>(
        &mut self,
        components: &[S],
        policy_name: &str,
    ) -> Result<(), PolicyError> {
        if policy_name.is_empty() {
            return Err(PolicyError::InvalidArgument("policyName".to_string()));
        }
        let Some((head, tail)) = components.split_first() else {
            self.policy_name = policy_name.to_string();
            return Ok(());
        };
        let head: &str = head.as_ref();

        match self.children.entry(head.to_string()) {
            Entry::Occupied(entry) => entry.into_mut().set_policy(tail, policy_name),
            Entry::Vacant(entry) => {
                // The missing branch is built detached so a segment that
                // fails to compile leaves the tree as it was.
                let branch = Node::branch(head, tail, policy_name)?;
                debug!(
                    event = "Insert",
                    phase = "NewBranch",
                    parent = self.id.as_str(),
                    id = head,
                    pattern = branch.is_pattern(),
                    depth = tail.len() + 1
                );
                entry.insert(branch);
                Ok(())
            }
        }
    }

    /// A chain of fresh nodes for `head` followed by `tail`, with
    /// `policy_name` on the last one.
    fn branch<S: AsRef<str>>(
        head: &str,
        tail: &[S],
        policy_name: &str,
    ) -> Result<Self, PolicyError> {
        let mut node = Node::for_component(head)?;
        match tail.split_first() {
            Some((next, rest)) => {
                let next: &str = next.as_ref();
                let child = Node::branch(next, rest, policy_name)?;
                node.children.insert(next.to_string(), child);
            }
            None => node.policy_name = policy_name.to_string(),
        }
        Ok(node)
    }

    /// The effective policy for `components`, where `components[0]` is
    /// matched against this node. Returns an empty string when nothing along
    /// the path carries a policy.
    pub fn resolve<S: AsRef<str>>(&self, components: &[S]) -> String {
        let Some((head, rest)) = components.split_first() else {
            return self.policy_name.clone();
        };
        if !self.matches(head.as_ref()) {
            return String::new();
        }

        let candidate = &self.policy_name;
        if rest.is_empty() || !self.has_children() {
            return candidate.clone();
        }

        let deeper = resolve_children(&self.children, rest);
        if deeper.is_empty() {
            candidate.clone()
        } else {
            deeper
        }
    }

    /// Every `(path, name)` pair assigned at or below this node, depth first
    /// in child order. `prefix` holds the components leading to `self`.
    pub fn collect_policies(&self, prefix: &mut Vec<String>, out: &mut Policies) {
        if !self.policy_name.is_empty() {
            out.push(Policy::new(
                format!("/{}", prefix.join("/")),
                self.policy_name.clone(),
            ));
        }
        for (id, child) in &self.children {
            prefix.push(id.clone());
            child.collect_policies(prefix, out);
            prefix.pop();
        }
    }
}

/// Route `components` into one of `children`.
///
/// A child whose id equals `components[0]` is preferred and is the only one
/// tried. Otherwise children are tried in id order and the first non-empty
/// result wins.
pub fn resolve_children<S: AsRef<str>>(
    children: &BTreeMap<String, Node>,
    components: &[S],
) -> String {
    let Some(head) = components.first() else {
        return String::new();
    };
    let head: &str = head.as_ref();

    if let Some(child) = children.get(head) {
        return child.resolve(components);
    }

    children
        .values()
        .map(|child| child.resolve(components))
        .find(|name| !name.is_empty())
        .unwrap_or_default()
}
