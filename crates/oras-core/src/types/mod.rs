//! Core data types for registry access.
//!
//! This module provides the fundamental types used throughout the ORAS crates:
//! - Credential pairs handed out by authentication strategies
//! - Image references and registry host extraction

pub mod credential;
pub mod reference;

// Re-export all public types
pub use credential::Credential;
pub use reference::{Reference, DOCKER_HUB_REGISTRY};
