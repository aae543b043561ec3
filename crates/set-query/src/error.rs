use std::time::Duration;

use tracing_util::{ErrorVisibility, TraceableError};

use crate::registry::SetName;

/// Errors raised while building a [`crate::SetRegistry`].
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("'{name}' cannot be used as a set name: {reason}")]
    InvalidSetName { name: String, reason: String },

    #[error("a set named {name} is already registered")]
    DuplicateSet { name: SetName },
}

impl TraceableError for RegistryError {
    fn visibility(&self) -> ErrorVisibility {
        ErrorVisibility::Internal
    }
}

/// The error a set resolver reports when it cannot produce the set's members.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct ResolverError {
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl ResolverError {
    pub fn new(message: impl Into<String>) -> Self {
        ResolverError {
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl TraceableError for ResolverError {
    fn visibility(&self) -> ErrorVisibility {
        ErrorVisibility::Internal
    }
}

/// Why a set query item fell back to the exclude-all sentinel. These never reach the caller;
/// they are only logged and recorded on the `resolve_set` span.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ResolutionFailure {
    #[error("resolver failed: {0}")]
    Resolver(#[from] ResolverError),

    #[error("resolver panicked")]
    Panicked,

    #[error("resolver did not finish within {0:?}")]
    TimedOut(Duration),

    #[error("resolver returned no members")]
    Empty,

    #[error("resolver returned {found}, expected a list of identifiers")]
    NotAList { found: &'static str },
}

impl TraceableError for ResolutionFailure {
    fn visibility(&self) -> ErrorVisibility {
        ErrorVisibility::Internal
    }
}
