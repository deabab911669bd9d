//! Resolver options and configuration for ORAS
//!
//! This crate holds the option struct handed to the resolver factory and the
//! configuration layers it is assembled from: an optional `config.toml`,
//! `ORAS_*` environment variables and command-line flags.

pub mod file;
pub mod merge;
pub mod options;

// Re-export main types
pub use file::{OrasToml, RegistrySection};
pub use merge::{ConfigLayering, ConfigLoader, ConfigOverrides, ConfigSource};
pub use options::ResolverConfig;

use oras_core::error::OrasError;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, OrasError>;
