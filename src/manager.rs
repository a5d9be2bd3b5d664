use std::sync::{Arc, RwLock};
use std::time::{Instant, SystemTime};

use itertools::Itertools;
use tracing::{Level, debug, enabled, info};

use crate::error::PolicyError;
use crate::loader;
use crate::metrics::{self, LookupStats, MetricsSink, ReloadStats};
use crate::node::{self, Node};
use crate::types::{PathComponents, Policies, Policy};

#[cfg(test)]
mod tests;

/// The policy manager handle. Cloneable and thread-safe; clones share the
/// same tree.
///
/// Policies live at the nodes of a tree keyed by path component. A lookup
/// returns the policy of the deepest node along the matching path that has
/// one, so a rule on `/a/b` overrides a rule on `/a/*` for `/a/b`, while
/// `/a/c` still falls back to `/a/*`.
///
/// ```rust
/// use policy_tree::{Policy, PolicyManager};
///
/// let manager = PolicyManager::new();
/// manager
///     .load_policies(&[
///         Policy::new("/a/*", "outer"),
///         Policy::new("/a/b", "inner"),
///     ])
///     .unwrap();
///
/// assert_eq!(manager.get_policy("/a/b").unwrap().name, "inner");
/// assert_eq!(manager.get_policy("/a/c").unwrap().name, "outer");
/// assert_eq!(manager.get_policy("/z").unwrap().name, "");
/// ```
#[derive(Clone)]
pub struct PolicyManager {
    root: Arc<RwLock<Node>>,
    metrics: Arc<dyn MetricsSink>,
}

impl Default for PolicyManager {
    fn default() -> Self {
        PolicyManager::new()
    }
}

impl PolicyManager {
    /// An empty manager: a bare root, so every lookup yields no policy.
    pub fn new() -> Self {
        PolicyManager {
            root: Arc::new(RwLock::new(Node::root())),
            metrics: metrics::noop_sink(),
        }
    }

    /// Route lookup and reload statistics to `sink`.
    pub fn with_metrics_sink(mut self, sink: Arc<dyn MetricsSink>) -> Self {
        self.metrics = sink;
        self
    }

    /// Replace every policy with `policies`.
    ///
    /// The new tree is built before the lock is taken and swapped in whole.
    /// Entries with an empty name or path are skipped; a wildcard segment
    /// that fails to compile fails the call and the current tree keeps
    /// serving.
    pub fn load_policies(&self, policies: &[Policy]) -> Result<(), PolicyError> {
        let built = loader::build_tree(policies)?;

        *self.root.write()? = built.root;

        info!(
            event = "Load",
            phase = "Swapped",
            loaded = built.loaded,
            skipped = built.skipped
        );
        self.metrics.on_reload(&ReloadStats {
            reload_time: SystemTime::now(),
            loaded: built.loaded,
            skipped: built.skipped,
        });
        Ok(())
    }

    /// Parse a JSON policy document and load it with
    /// [`load_policies`](Self::load_policies).
    pub fn load_from_str(&self, text: &str) -> Result<(), PolicyError> {
        let policies = loader::parse_policies(text)?;
        self.load_policies(&policies)
    }

    /// Insert or overwrite a single policy in the live tree.
    pub fn set_policy(&self, policy: Policy) -> Result<(), PolicyError> {
        let policy_name = policy.policy_name();
        if policy_name.is_empty() {
            return Err(PolicyError::InvalidArgument("policyName".to_string()));
        }
        let components = policy.path_components();
        if components.is_empty() {
            return Err(PolicyError::InvalidArgument("pathComponents".to_string()));
        }

        let mut guard = self.root.write()?;
        guard.set_policy(&components, policy_name)?;

        debug!(
            event = "Set",
            phase = "Stored",
            path = components.to_string(),
            name = policy_name
        );
        Ok(())
    }

    /// Resolve the policy in effect for `path`.
    ///
    /// The returned policy carries `path` unchanged and an empty `name` when
    /// no rule applies. Fails only when `path` has no components.
    pub fn get_policy(&self, path: &str) -> Result<Policy, PolicyError> {
        let components = PathComponents::parse(path);
        let name = self.get_policy_name(&components)?;
        Ok(Policy::new(path, name))
    }

    /// Resolve the policy name for pre-split path components.
    pub fn get_policy_name<S: AsRef<str>>(
        &self,
        components: &[S],
    ) -> Result<String, PolicyError> {
        if components.is_empty() {
            return Err(PolicyError::InvalidArgument("pathComponents".to_string()));
        }
        let start = Instant::now();

        let name = {
            let guard = self.root.read()?;
            node::resolve_children(guard.children(), components)
        };

        // The normalized path is only rendered when someone consumes it.
        let report = self.metrics.enabled();
        if report || enabled!(Level::DEBUG) {
            let path = format!("/{}", components.iter().map(AsRef::<str>::as_ref).join("/"));
            debug!(
                event = "Lookup",
                phase = "Resolved",
                path = path.as_str(),
                name = name.as_str()
            );
            if report {
                self.metrics.on_lookup(&LookupStats {
                    duration: start.elapsed(),
                    path,
                    matched: !name.is_empty(),
                });
            }
        }
        Ok(name)
    }

    /// Every policy currently assigned, depth first with children in id
    /// order, with normalized paths.
    pub fn policies(&self) -> Result<Policies, PolicyError> {
        let guard = self.root.read()?;
        let mut out = Policies::new();
        guard.collect_policies(&mut Vec::new(), &mut out);
        Ok(out)
    }

    /// Render the tree as indented JSON and log it for diagnostics.
    pub fn dump_policies(&self) -> Result<String, PolicyError> {
        let dump = {
            let guard = self.root.read()?;
            serde_json::to_string_pretty(&*guard)?
        };
        info!(event = "Dump", phase = "Tree", tree = dump.as_str());
        Ok(dump)
    }
}
