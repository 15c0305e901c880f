//! Application layer errors.
//!
//! These errors represent failures in resolution and orchestration, not
//! domain rule violations. Domain errors are `DomainError` from
//! `crate::domain`.

use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur while resolving or wiring components.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// The resolver could not produce an object for an import path.
    /// A misconfigured path is a programming/deployment error — fatal,
    /// never swallowed.
    #[error("resolution failed for '{path}': {reason}")]
    Resolution { path: String, reason: String },

    /// An include (or branch access) produced something other than an
    /// appspace.
    #[error("'{target}' is not an appspace")]
    NotAnAppspace { target: String },

    /// Registry or resolver store access failed (lock poisoned).
    #[error("registry store error")]
    StoreLock,

    /// A function component's own invocation failed. Distinct from the
    /// call-or-value fallback, which only applies to non-callable values.
    #[error("calling '{label}' failed: {reason}")]
    CallFailed { label: String, reason: String },

    /// Event manager failure.
    #[error("event '{label}' failed: {reason}")]
    Event { label: String, reason: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Resolution { path, reason } => vec![
                format!("Could not resolve '{}': {}", path, reason),
                "Register the path with the resolver before building".into(),
                "Check the dotted path for typos".into(),
            ],
            Self::NotAnAppspace { target } => vec![
                format!("'{}' resolved to a plain component", target),
                "Branch includes must export a built appspace".into(),
            ],
            Self::StoreLock => vec![
                "The registry store is locked".into(),
                "A writer panicked while holding the lock".into(),
            ],
            Self::CallFailed { label, .. } => vec![
                format!("The app at '{}' is callable but its call failed", label),
                "Check the arguments passed to the app".into(),
            ],
            Self::Event { label, .. } => {
                vec![format!("Event '{}' could not be dispatched", label)]
            }
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Resolution { .. } | Self::NotAnAppspace { .. } => ErrorCategory::Resolution,
            Self::StoreLock => ErrorCategory::Internal,
            Self::CallFailed { .. } => ErrorCategory::Internal,
            Self::Event { .. } => ErrorCategory::Internal,
        }
    }
}
