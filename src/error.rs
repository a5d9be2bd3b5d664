use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use thiserror::Error;

use crate::node::Node;

/// Coarse classification of a [`PolicyError`], for callers that map errors
/// onto transport status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
pub enum ErrorKind {
    InvalidArgument,
    Internal,
}

#[derive(Debug, Error, Serialize, Deserialize)]
pub enum PolicyError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid pattern in path segment {segment}: {reason}")]
    InvalidPattern { segment: String, reason: String },

    #[error("failed to parse policies: {0}")]
    ParseError(String),

    #[error("Poisoned lock error: {0}")]
    PoisonedLockError(String),
}

impl PolicyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PolicyError::InvalidArgument(_)
            | PolicyError::InvalidPattern { .. }
            | PolicyError::ParseError(_) => ErrorKind::InvalidArgument,
            PolicyError::PoisonedLockError(_) => ErrorKind::Internal,
        }
    }
}

impl From<serde_json::Error> for PolicyError {
    fn from(err: serde_json::Error) -> Self {
        PolicyError::ParseError(err.to_string())
    }
}

impl From<std::sync::PoisonError<std::sync::RwLockReadGuard<'_, Node>>> for PolicyError {
    fn from(err: std::sync::PoisonError<std::sync::RwLockReadGuard<'_, Node>>) -> Self {
        PolicyError::PoisonedLockError(err.to_string())
    }
}

impl From<std::sync::PoisonError<std::sync::RwLockWriteGuard<'_, Node>>> for PolicyError {
    fn from(err: std::sync::PoisonError<std::sync::RwLockWriteGuard<'_, Node>>) -> Self {
        PolicyError::PoisonedLockError(err.to_string())
    }
}
