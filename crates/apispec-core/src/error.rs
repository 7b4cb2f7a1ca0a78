//! Unified error types for the apispec core library.
//!
//! This module provides a unified error type [`SpecError`] that covers every
//! failure mode of specification generation and of the persistence layer
//! around it. Configuration loading has its own [`ConfigError`] which
//! converts into [`SpecError`].
//!
//! # Design Principles
//!
//! - **Batch reporting**: orphan errors carry every offending handler, never
//!   only the first one found
//! - **Fail-fast**: every variant aborts the generation that raised it; no
//!   partial specification is ever returned alongside an error
//! - **HTTP-ready**: error types expose HTTP status codes and error codes
//!
//! # Example
//!
//! ```rust
//! use apispec_core::error::{Result, SpecError};
//!
//! fn require_handlers(orphans: Vec<String>) -> Result<()> {
//!     if !orphans.is_empty() {
//!         return Err(SpecError::OrphanedModuleEndpoints(orphans));
//!     }
//!     Ok(())
//! }
//! ```
//!
//! [`ConfigError`]: crate::config::ConfigError

use std::path::PathBuf;
use thiserror::Error;

/// The unified error type for all apispec operations.
#[derive(Debug, Error)]
pub enum SpecError {
    // =========================================================================
    // ORPHAN POLICY ERRORS
    // =========================================================================
    /// Endpoints without a module while the module policy is `fail`.
    #[error(
        "The following endpoints are not assigned to a module: {}. Declare a module for their namespace or change the orphan policy.",
        .0.join(", ")
    )]
    OrphanedModuleEndpoints(Vec<String>),

    /// Endpoints without a resource while the resource policy is `fail`.
    #[error(
        "The following endpoints are not assigned to a resource: {}. Declare a resource for them or change the orphan policy.",
        .0.join(", ")
    )]
    OrphanedResourceEndpoints(Vec<String>),

    // =========================================================================
    // REGISTRATION CONTRACT ERRORS
    // =========================================================================
    /// A route parameter has no member of the same name on the input type.
    #[error("Route parameter '{parameter}' of {handler} has no matching member on input type '{input_type}'")]
    UnknownRouteParameter {
        /// Handler identity of the malformed registration.
        handler: String,
        /// Parameter name declared in the route pattern.
        parameter: String,
        /// Input type that was searched.
        input_type: String,
    },

    /// A field or substitution references a type missing from the registry.
    #[error("Type '{0}' is not registered")]
    UnknownType(String),

    // =========================================================================
    // CONFIGURATION ERRORS
    // =========================================================================
    /// The configuration could not be loaded or parsed.
    #[error("Failed to load configuration: {0}")]
    ConfigParseError(String),

    /// The configuration was loaded but contains invalid values.
    #[error("Configuration validation failed: {0}")]
    ConfigValidationError(String),

    // =========================================================================
    // PERSISTENCE & I/O ERRORS
    // =========================================================================
    /// A document on disk could not be parsed.
    #[error("Failed to parse {}: {message}", .path.display())]
    DocumentParseError {
        /// Path of the offending document.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// An error occurred while persisting or reading data.
    #[error("Persistence error: {0}")]
    PersistenceError(String),

    /// A low-level I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// A specialized [`Result`] type for apispec operations.
pub type Result<T> = std::result::Result<T, SpecError>;

impl SpecError {
    /// Returns `true` if this error was raised by a `fail` orphan policy.
    #[inline]
    #[must_use]
    pub const fn is_orphan_error(&self) -> bool {
        matches!(
            self,
            Self::OrphanedModuleEndpoints(_) | Self::OrphanedResourceEndpoints(_)
        )
    }

    /// Returns `true` if this error comes from a malformed endpoint or type
    /// registration.
    #[inline]
    #[must_use]
    pub const fn is_contract_violation(&self) -> bool {
        matches!(self, Self::UnknownRouteParameter { .. } | Self::UnknownType(_))
    }

    /// Returns `true` if this error is related to configuration.
    #[inline]
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigParseError(_) | Self::ConfigValidationError(_)
        )
    }

    /// Returns `true` if this error is related to I/O or persistence.
    #[inline]
    #[must_use]
    pub const fn is_io_error(&self) -> bool {
        matches!(
            self,
            Self::DocumentParseError { .. } | Self::PersistenceError(_) | Self::IoError(_)
        )
    }

    /// Handler identities carried by an orphan error, empty otherwise.
    #[must_use]
    pub fn offending_handlers(&self) -> &[String] {
        match self {
            Self::OrphanedModuleEndpoints(handlers) | Self::OrphanedResourceEndpoints(handlers) => {
                handlers
            }
            _ => &[],
        }
    }

    /// Returns an HTTP-appropriate status code for this error.
    #[inline]
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            // 422 Unprocessable Entity - the inventory or its configuration is inconsistent
            Self::OrphanedModuleEndpoints(_)
            | Self::OrphanedResourceEndpoints(_)
            | Self::UnknownRouteParameter { .. }
            | Self::UnknownType(_)
            | Self::ConfigParseError(_)
            | Self::ConfigValidationError(_)
            | Self::DocumentParseError { .. } => 422,

            // 500 Internal Server Error - server-side issues
            Self::PersistenceError(_) | Self::IoError(_) => 500,
        }
    }

    /// Returns a machine-readable error code for API responses.
    #[inline]
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::OrphanedModuleEndpoints(_) => "ORPHANED_MODULE_ENDPOINTS",
            Self::OrphanedResourceEndpoints(_) => "ORPHANED_RESOURCE_ENDPOINTS",
            Self::UnknownRouteParameter { .. } => "UNKNOWN_ROUTE_PARAMETER",
            Self::UnknownType(_) => "UNKNOWN_TYPE",
            Self::ConfigParseError(_) => "CONFIG_PARSE_ERROR",
            Self::ConfigValidationError(_) => "CONFIG_VALIDATION_ERROR",
            Self::DocumentParseError { .. } => "DOCUMENT_PARSE_ERROR",
            Self::PersistenceError(_) => "PERSISTENCE_ERROR",
            Self::IoError(_) => "IO_ERROR",
        }
    }
}

// =============================================================================
// CONVERSIONS FROM MODULE-SPECIFIC ERRORS
// =============================================================================

impl From<crate::config::ConfigError> for SpecError {
    fn from(err: crate::config::ConfigError) -> Self {
        use crate::config::ConfigError;
        match err {
            ConfigError::NotFound(path) => {
                Self::ConfigParseError(format!("Configuration file not found: {path}"))
            }
            ConfigError::LoadError(e) => Self::ConfigParseError(e.to_string()),
            ConfigError::WriteError { path, source } => {
                Self::PersistenceError(format!("Failed to write {path}: {source}"))
            }
            ConfigError::SerializeError(e) => Self::ConfigParseError(e.to_string()),
            ConfigError::ValidationError { field, message } => {
                Self::ConfigValidationError(format!("{field}: {message}"))
            }
            ConfigError::MultipleValidationErrors(errors) => {
                let messages: Vec<String> = errors.into_iter().map(|e| e.to_string()).collect();
                Self::ConfigValidationError(messages.join("; "))
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
