//! Error handling module for the Sales Analytics Service
//!
//! The analytics core itself never fails for data-shape reasons: it
//! coerces malformed input and returns defined zero/empty results. The
//! error types here cover everything around the core: configuration,
//! the record store, serialization, and the HTTP surface.

use thiserror::Error;

/// Result type alias for service operations
pub type Result<T> = std::result::Result<T, AnalyticsError>;

/// Error types for the sales analytics service
#[derive(Error, Debug)]
pub enum AnalyticsError {
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Record store errors
    #[error("Store error: {message}")]
    Store { message: String },

    /// Serialization/Deserialization errors
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Network and I/O errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Request validation errors
    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    /// External insight generator errors (the service falls back to
    /// deterministic template text when this occurs)
    #[error("External service error: {service} - {message}")]
    ExternalService { service: String, message: String },

    /// Internal system errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl AnalyticsError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a store error
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an external service error
    pub fn external_service(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ExternalService {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => "configuration",
            Self::Store { .. } => "store",
            Self::Serialization { .. } => "serialization",
            Self::Io { .. } => "io",
            Self::Validation { .. } => "validation",
            Self::ExternalService { .. } => "external",
            Self::Internal { .. } => "internal",
        }
    }
}

impl From<serde_json::Error> for AnalyticsError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}

impl From<config::ConfigError> for AnalyticsError {
    fn from(err: config::ConfigError) -> Self {
        Self::configuration(err.to_string())
    }
}
