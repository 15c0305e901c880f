//! Unified error handling for the appspace core.
//!
//! This module provides a unified error type that wraps domain and
//! application errors, with categories and user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for appspace operations.
///
/// This enum wraps all possible errors that can occur when using
/// appspace-core, providing a unified interface for error handling.
#[derive(Debug, Error, Clone)]
pub enum AppspaceError {
    /// Errors from the domain layer (lookup failures, validation).
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Errors from the application layer (resolution, orchestration).
    #[error("Application error: {0}")]
    Application(#[from] ApplicationError),

    /// A builder received a pattern specification it cannot interpret.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl AppspaceError {
    /// Shorthand for a configuration failure.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into() }
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {}", message),
                "Check the pattern definitions and try again".into(),
            ],
            Self::Internal { .. } => vec![
                "This appears to be a bug in appspace".into(),
                "Please report this issue".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::NotFound => ErrorCategory::NotFound,
                crate::domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Whether this error is the recoverable lookup-failure kind.
    ///
    /// Callers that probe for optional apps can branch on this instead of
    /// matching the whole taxonomy.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Domain(DomainError::AppLookup { .. }) | Self::Domain(DomainError::NoApp { .. })
        )
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Resolution,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type AppspaceResult<T> = Result<T, AppspaceError>;
