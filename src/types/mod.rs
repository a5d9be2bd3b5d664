//! Data model types for policy paths and policy records.
//!
//! A policy path is a `/`-delimited string. Each segment is trimmed and empty
//! segments are dropped, so `/a//b/` and `a/b` name the same node. A segment
//! containing `*` is a wildcard and is matched as an anchored regular
//! expression.

mod path;
mod policy;

pub use path::{PATH_SEPARATOR, PathComponents, WILDCARD_MARKER, is_wildcard};
pub use policy::{Policies, Policy};
