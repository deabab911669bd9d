//! `config.toml` parsing
//!
//! ```toml
//! [registry]
//! username = "robot"
//! renegotiate = "RenegotiateOnceAsClient"
//! insecure = false
//! plain_http = false
//! registry_config = ["/etc/oras/auth.json"]
//! ```

use std::path::{Path, PathBuf};

use oras_core::error::OrasError;
use serde::{Deserialize, Serialize};

use crate::ConfigResult;

/// Complete config.toml contents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrasToml {
    /// Registry access defaults
    #[serde(default)]
    pub registry: RegistrySection,
}

/// `[registry]` table; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistrySection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// TLS renegotiation policy name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renegotiate: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub insecure: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub plain_http: Option<bool>,

    /// Credential store files, searched in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub registry_config: Vec<PathBuf>,
}

/// Parse TOML string to OrasToml configuration
pub fn parse_oras_toml(content: &str, origin: &Path) -> ConfigResult<OrasToml> {
    let config: OrasToml = toml::from_str(content).map_err(|e| OrasError::ConfigParse {
        path: origin.display().to_string(),
        message: e.to_string(),
    })?;

    validate_config(&config)?;

    Ok(config)
}

/// Validate configuration values that serde cannot check
pub fn validate_config(config: &OrasToml) -> ConfigResult<()> {
    if config
        .registry
        .registry_config
        .iter()
        .any(|path| path.as_os_str().is_empty())
    {
        return Err(OrasError::ConfigValidation {
            field: "registry.registry_config".to_string(),
            reason: "credential store paths must not be empty".to_string(),
        });
    }

    Ok(())
}

/// Load config.toml from a file
pub async fn load_from_file(path: &Path) -> ConfigResult<OrasToml> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| OrasError::io(format!("Failed to read {}", path.display()), e))?;

    parse_oras_toml(&content, path)
}
