use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (cheap to translate and re-wrap)
/// - Categorizable (for caller display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Lookup Errors (404-level equivalent)
    // ========================================================================
    /// Raised by the registry when a label is absent in a namespace.
    /// Recoverable — the appspace facade catches and translates it.
    #[error("no app '{label}' in namespace '{namespace}'")]
    AppLookup { label: String, namespace: String },

    /// The public-facing "no such application" signal, produced by
    /// translating [`DomainError::AppLookup`] at the facade boundary.
    #[error("no application found: '{label}'")]
    NoApp { label: String },

    // ========================================================================
    // Validation Errors (400-level equivalent)
    // ========================================================================
    #[error("invalid label '{label}': {reason}")]
    InvalidLabel { label: String, reason: String },

    #[error("invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("invalid settings tier: {0}")]
    InvalidSettings(String),
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::AppLookup { label, namespace } => vec![
                format!("'{}' was never registered in namespace '{}'", label, namespace),
                "Check the label spelling, or register the app first".into(),
            ],
            Self::NoApp { label } => vec![
                format!("No application answers to '{}'", label),
                "List the appspace contents or check the build patterns".into(),
            ],
            Self::InvalidLabel { reason, .. } | Self::InvalidPath { reason, .. } => {
                vec![format!("Details: {}", reason)]
            }
            Self::InvalidSettings(msg) => vec![
                format!("Settings tier rejected: {}", msg),
                "Settings tiers must be JSON objects, not scalars or arrays".into(),
            ],
        }
    }

    /// Error category for caller display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::AppLookup { .. } | Self::NoApp { .. } => ErrorCategory::NotFound,
            Self::InvalidLabel { .. } | Self::InvalidPath { .. } | Self::InvalidSettings(_) => {
                ErrorCategory::Validation
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Internal,
}
