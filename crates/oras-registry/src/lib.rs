//! Registry resolver construction for ORAS
//!
//! This crate turns caller options into a ready-to-use [`Resolver`]: it
//! validates the TLS renegotiation option, builds an HTTP client, and picks
//! exactly one authentication strategy (explicit credentials, a credential
//! store, or anonymous access). Construction never fails; every degradation
//! is returned as a warning next to the resolver.

pub mod auth;
pub mod client;
pub mod factory;
pub mod resolver;
pub mod tls;

// Re-export main types
pub use auth::{CredentialStore, CredentialStoreOpener, DockerConfigOpener, DockerConfigStore};
pub use client::{build_client, default_client, HttpClient};
pub use factory::{new_resolver, ResolverBuild, ResolverFactory};
pub use resolver::{AuthStrategy, Resolver, StrategyKind};
pub use tls::{RenegotiationPolicy, TlsSettings};

use oras_core::error::OrasError;

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, OrasError>;
