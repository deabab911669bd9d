//! Error types and result aliases for ORAS operations.
//!
//! Provides a unified error type that covers every failure the resolver
//! stack can report, with actionable messages. The three degradation kinds
//! (`InvalidOption`, `CredentialStoreUnavailable`, `ResolverConstructionFailed`)
//! are never fatal; they travel back to the caller as warnings.

use thiserror::Error;

/// Unified error type for all ORAS operations
#[derive(Error, Debug)]
pub enum OrasError {
    // Option errors
    #[error("invalid value '{value}' for {option}: expected one of {expected}")]
    InvalidOption {
        option: String,
        value: String,
        expected: String,
    },

    // Credential store errors
    #[error("failed to load credential store {path}: {reason}")]
    CredentialStoreUnavailable { path: String, reason: String },

    #[error("credential store could not build a resolver: {reason}")]
    ResolverConstructionFailed { reason: String },

    // Config errors
    #[error("Failed to parse {path}: {message}")]
    ConfigParse { path: String, message: String },

    #[error("Configuration field '{field}' is invalid: {reason}")]
    ConfigValidation { field: String, reason: String },

    // Reference errors
    #[error("invalid reference '{reference}': {reason}")]
    InvalidReference { reference: String, reason: String },

    // Network errors
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Payload-free classification of an [`OrasError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidOption,
    CredentialStoreUnavailable,
    ResolverConstructionFailed,
    ConfigParse,
    ConfigValidation,
    InvalidReference,
    Network,
    Io,
}

/// Result type alias for ORAS operations
pub type OrasResult<T> = Result<T, OrasError>;

impl OrasError {
    /// Create a network error from any error type
    pub fn network<E>(message: String, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Network {
            message,
            source: Some(Box::new(source)),
        }
    }

    /// Create an IO error from std::io::Error
    pub fn io(message: String, source: std::io::Error) -> Self {
        Self::Io { message, source }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            OrasError::InvalidOption { .. } => ErrorKind::InvalidOption,
            OrasError::CredentialStoreUnavailable { .. } => ErrorKind::CredentialStoreUnavailable,
            OrasError::ResolverConstructionFailed { .. } => ErrorKind::ResolverConstructionFailed,
            OrasError::ConfigParse { .. } => ErrorKind::ConfigParse,
            OrasError::ConfigValidation { .. } => ErrorKind::ConfigValidation,
            OrasError::InvalidReference { .. } => ErrorKind::InvalidReference,
            OrasError::Network { .. } => ErrorKind::Network,
            OrasError::Io { .. } => ErrorKind::Io,
        }
    }

    /// Check if resolver construction can continue past this error
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::InvalidOption
                | ErrorKind::CredentialStoreUnavailable
                | ErrorKind::ResolverConstructionFailed
                | ErrorKind::Network
        )
    }

    /// Get a user-friendly suggestion for fixing this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            OrasError::InvalidOption { .. } => {
                Some("Valid options include RenegotiateNever (default), RenegotiateOnceAsClient or RenegotiateFreelyAsClient")
            },
            OrasError::CredentialStoreUnavailable { .. } => {
                Some("Check the --registry-config path or log in again to recreate the file")
            },
            OrasError::ResolverConstructionFailed { .. } => {
                Some("Pass --username/--password explicitly to bypass the credential store")
            },
            OrasError::InvalidReference { .. } => {
                Some("References look like registry.example.com/repository:tag")
            },
            OrasError::Network { .. } => Some("Check your network connection and the registry address"),
            _ => None,
        }
    }
}
