//! Error types owned by the binding core.
//!
//! The core rejects absent inputs and nothing else. Failures produced by the wrapped
//! operation or by the strategy travel inside the operation's own result type and never
//! become a `FluentError`.
use thiserror::Error;

/// Name reported when a strategy is missing at bind time.
pub const STRATEGY: &str = "strategy";
/// Name reported when a context is missing at invoke time.
pub const CONTEXT: &str = "context";
/// Name reported when an operation is missing at invoke time.
pub const OPERATION: &str = "operation";

/// Unified error type for the bind/invoke surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FluentError {
    /// A required input was absent.
    #[error("invalid argument: `{name}` must be provided")]
    InvalidArgument { name: &'static str },
}

impl FluentError {
    pub(crate) fn missing(name: &'static str) -> Self {
        tracing::debug!(argument = name, "rejected absent input");
        FluentError::InvalidArgument { name }
    }

    /// Check if this error is an absent-input rejection.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }

    /// Name of the absent input (`"strategy"`, `"context"` or `"operation"`).
    pub fn argument_name(&self) -> &'static str {
        match self {
            Self::InvalidArgument { name } => *name,
        }
    }
}
