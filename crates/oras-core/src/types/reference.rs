//! Image reference parsing.
//!
//! A reference has the shape `[registry/]repository[:tag][@digest]`. When the
//! first path segment does not look like a host, the registry defaults to
//! Docker Hub.

use std::fmt;
use std::str::FromStr;

use crate::error::{OrasError, OrasResult};

/// Registry host used when a reference names none
pub const DOCKER_HUB_REGISTRY: &str = "docker.io";

const DEFAULT_TAG: &str = "latest";

/// Parsed image reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    registry: String,
    repository: String,
    tag: Option<String>,
    digest: Option<String>,
}

impl Reference {
    /// Parse a reference string
    pub fn parse(input: &str) -> OrasResult<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(invalid(input, "reference is empty"));
        }

        let (name, digest) = match input.split_once('@') {
            Some((name, digest)) => {
                if !digest.contains(':') {
                    return Err(invalid(input, "digest must look like <algorithm>:<hex>"));
                }
                (name, Some(digest.to_string()))
            },
            None => (input, None),
        };

        // A tag can only follow the last path separator; a colon before it
        // belongs to a registry port.
        let last_segment_start = name.rfind('/').map(|i| i + 1).unwrap_or(0);
        let (name, tag) = match name[last_segment_start..].rfind(':') {
            Some(offset) => {
                let split = last_segment_start + offset;
                let tag = &name[split + 1..];
                if tag.is_empty() {
                    return Err(invalid(input, "tag is empty"));
                }
                (&name[..split], Some(tag.to_string()))
            },
            None => (name, None),
        };

        let (registry, repository) = match name.split_once('/') {
            Some((first, rest)) if Self::looks_like_host(first) => {
                (first.to_string(), rest.to_string())
            },
            _ => (DOCKER_HUB_REGISTRY.to_string(), name.to_string()),
        };

        if repository.is_empty() || repository.split('/').any(str::is_empty) {
            return Err(invalid(input, "repository has an empty path segment"));
        }
        if repository.chars().any(|c| c.is_ascii_uppercase()) {
            return Err(invalid(input, "repository must be lowercase"));
        }

        let repository = if registry == DOCKER_HUB_REGISTRY && !repository.contains('/') {
            format!("library/{}", repository)
        } else {
            repository
        };

        let tag = match (&tag, &digest) {
            (None, None) => Some(DEFAULT_TAG.to_string()),
            _ => tag,
        };

        Ok(Self {
            registry,
            repository,
            tag,
            digest,
        })
    }

    /// Registry host, including port when present
    pub fn registry(&self) -> &str {
        &self.registry
    }

    /// Repository path within the registry
    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn digest(&self) -> Option<&str> {
        self.digest.as_deref()
    }

    /// Check whether a path segment names a registry host
    fn looks_like_host(segment: &str) -> bool {
        segment.contains('.') || segment.contains(':') || segment == "localhost"
    }
}

impl FromStr for Reference {
    type Err = OrasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.registry, self.repository)?;
        if let Some(tag) = &self.tag {
            write!(f, ":{}", tag)?;
        }
        if let Some(digest) = &self.digest {
            write!(f, "@{}", digest)?;
        }
        Ok(())
    }
}

fn invalid(reference: &str, reason: &str) -> OrasError {
    OrasError::InvalidReference {
        reference: reference.to_string(),
        reason: reason.to_string(),
    }
}
