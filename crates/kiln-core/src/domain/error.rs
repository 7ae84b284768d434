// ============================================================================
// domain/error.rs - GENERATION DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (cheap to carry through reports)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors (400-level equivalent)
    // ========================================================================
    #[error("Invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Invalid option: {0}")]
    InvalidOption(String),

    #[error("Unknown schematic '{0}'")]
    InvalidSchematic(String),

    #[error("Unknown feature '{0}'")]
    UnknownFeature(String),

    #[error("Duplicate artifact path: {path}")]
    DuplicatePath { path: String },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    #[error("Path escapes the project root: {path}")]
    PathEscapesRoot { path: String },

    // ========================================================================
    // Compatibility Errors (409-level equivalent)
    // ========================================================================
    #[error("data access '{data_access}' cannot be used with '{backend}': {reason}")]
    IncompatibleDataAccess {
        data_access: String,
        backend: String,
        reason: String, // populated from capabilities::validate_data_access
    },

    #[error("'{requested}' requires the {required} dialect")]
    DialectMismatch { requested: String, required: String },

    // ========================================================================
    // Constraint Violations
    // ========================================================================
    #[error("Feature '{feature}' is not configured: {reason}")]
    FeatureNotConfigured { feature: String, reason: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidName { .. } => vec![
                "Names must start with a letter".into(),
                "Use letters, digits, '-', '_' or spaces".into(),
                "Examples: user, blog-post, OrderItem".into(),
            ],
            Self::InvalidSchematic(kind) => vec![
                format!("'{}' is not a schematic", kind),
                "Available: controller, service, middleware, route, model, interface, test, resource"
                    .into(),
            ],
            Self::UnknownFeature(feature) => vec![
                format!("'{}' is not a feature module", feature),
                "Try: kiln list to see available features".into(),
            ],
            Self::IncompatibleDataAccess { backend, .. } => vec![
                format!("Pick a data-access technology that supports {}", backend),
                "Or pass --orm auto to use the recommended one".into(),
            ],
            Self::DialectMismatch { required, .. } => vec![
                format!("This artifact is only generated for {} projects", required),
                "A project is typed when tsconfig.json exists at its root".into(),
            ],
            Self::FeatureNotConfigured { reason, .. } => vec![
                reason.clone(),
                "Pass the flags that configure this feature".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidName { .. } | Self::InvalidOption(_) | Self::InvalidSchematic(_) => {
                ErrorCategory::Validation
            }
            Self::FeatureNotConfigured { .. } => ErrorCategory::Validation,
            Self::IncompatibleDataAccess { .. } | Self::DialectMismatch { .. } => {
                ErrorCategory::Compatibility
            }
            Self::UnknownFeature(_) => ErrorCategory::NotFound,
            _ => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Compatibility,
    NotFound,
    Internal,
}
