//! # oras-core
//!
//! Core types and errors shared across all ORAS crates.
//!
//! This crate provides:
//! - OrasError enum and ErrorKind for unified error handling
//! - Credential type used by every authentication strategy
//! - Reference parsing for `registry/repository[:tag][@digest]` strings
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `types`: Core data types (Credential, Reference)
//! - `error`: Error types and result aliases

pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{ErrorKind, OrasError, OrasResult};
pub use types::{Credential, Reference, DOCKER_HUB_REGISTRY};
