//! Path-based policy resolution.
//!
//! A [`PolicyManager`] stores policy names at the nodes of a tree keyed by
//! `/`-delimited path components. Components containing `*` are matched as
//! anchored regular expressions. A lookup returns the policy of the most
//! specific matching node: deeper assignments override shallower ones, and a
//! deeper node without a policy never erases one found higher up.
pub use error::{ErrorKind, PolicyError};
pub use loader::parse_policies;
pub use manager::PolicyManager;
pub use types::{PathComponents, Policies, Policy};

mod error;
mod loader;
mod manager;
pub mod metrics;
mod node;
pub mod types;
