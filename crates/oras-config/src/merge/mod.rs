//! Configuration layering, fallback logic, and environment overrides
//!
//! Precedence, lowest first: config file, `ORAS_*` environment variables,
//! command-line flags. A layer only overrides a value it actually sets.

use std::collections::HashMap;
use std::path::PathBuf;

use oras_core::error::OrasError;

use crate::file::{OrasToml, RegistrySection};
use crate::{ConfigResult, ResolverConfig};

/// Environment variables consulted by [`ConfigLayering::collect_env_overrides`]
pub const ENV_USERNAME: &str = "ORAS_USERNAME";
pub const ENV_PASSWORD: &str = "ORAS_PASSWORD";
pub const ENV_RENEGOTIATE: &str = "ORAS_RENEGOTIATE";
pub const ENV_INSECURE: &str = "ORAS_INSECURE";
pub const ENV_PLAIN_HTTP: &str = "ORAS_PLAIN_HTTP";
pub const ENV_REGISTRY_CONFIG: &str = "ORAS_REGISTRY_CONFIG";

/// Locates and loads the config file
pub struct ConfigLoader {
    /// Path given with `--config`, if any
    explicit_path: Option<PathBuf>,
}

/// Where the loaded config file came from
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// Path passed on the command line
    Explicit(PathBuf),
    /// `~/.oras/config.toml`
    Home(PathBuf),
}

/// Values given as command-line flags
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub username: Option<String>,
    pub password: Option<String>,
    pub renegotiate: Option<String>,
    pub insecure: Option<bool>,
    pub plain_http: Option<bool>,
    pub registry_config: Vec<PathBuf>,
}

/// Configuration layering and merging
pub struct ConfigLayering;

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new(explicit_path: Option<PathBuf>) -> Self {
        Self { explicit_path }
    }

    /// Default config file location
    pub fn default_config_path() -> ConfigResult<PathBuf> {
        let home_dir = dirs::home_dir().ok_or_else(|| OrasError::ConfigValidation {
            field: "home_dir".to_string(),
            reason: "Could not determine home directory".to_string(),
        })?;

        Ok(home_dir.join(".oras").join("config.toml"))
    }

    /// Load the config file.
    ///
    /// An explicit path must exist. The default path is optional, and a
    /// missing home directory just means there is no default file.
    pub async fn load(&self) -> ConfigResult<Option<(OrasToml, ConfigSource)>> {
        if let Some(path) = &self.explicit_path {
            let config = crate::file::load_from_file(path).await?;
            return Ok(Some((config, ConfigSource::Explicit(path.clone()))));
        }

        let path = match Self::default_config_path() {
            Ok(path) => path,
            Err(_) => return Ok(None),
        };

        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(None);
        }

        let config = crate::file::load_from_file(&path).await?;
        Ok(Some((config, ConfigSource::Home(path))))
    }
}

impl ConfigLayering {
    /// Merge all layers into resolver options
    pub fn merge_configs(
        file_config: Option<OrasToml>,
        env_overrides: &HashMap<String, String>,
        cli_overrides: &ConfigOverrides,
    ) -> ConfigResult<ResolverConfig> {
        let mut merged = ResolverConfig::default();

        if let Some(file) = file_config {
            Self::apply_file(&mut merged, file.registry);
        }

        Self::apply_env_overrides(&mut merged, env_overrides)?;

        // CLI flags have the highest priority
        Self::apply_cli_overrides(&mut merged, cli_overrides);

        Ok(merged)
    }

    fn apply_file(config: &mut ResolverConfig, section: RegistrySection) {
        if let Some(username) = section.username {
            config.username = username;
        }
        if let Some(password) = section.password {
            config.password = password;
        }
        if let Some(renegotiate) = section.renegotiate {
            config.renegotiate = renegotiate;
        }
        if let Some(insecure) = section.insecure {
            config.insecure = insecure;
        }
        if let Some(plain_http) = section.plain_http {
            config.plain_http = plain_http;
        }
        if !section.registry_config.is_empty() {
            config.registry_config = section.registry_config;
        }
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(
        config: &mut ResolverConfig,
        overrides: &HashMap<String, String>,
    ) -> ConfigResult<()> {
        for (key, value) in overrides {
            match key.as_str() {
                ENV_USERNAME => config.username = value.clone(),
                ENV_PASSWORD => config.password = value.clone(),
                ENV_RENEGOTIATE => config.renegotiate = value.clone(),
                ENV_INSECURE => config.insecure = parse_bool(key, value)?,
                ENV_PLAIN_HTTP => config.plain_http = parse_bool(key, value)?,
                ENV_REGISTRY_CONFIG => {
                    config.registry_config = std::env::split_paths(value)
                        .filter(|path| !path.as_os_str().is_empty())
                        .collect();
                },
                _ => {
                    // Unknown environment variable, ignore
                },
            }
        }

        Ok(())
    }

    /// Apply CLI flag overrides
    fn apply_cli_overrides(config: &mut ResolverConfig, overrides: &ConfigOverrides) {
        if let Some(username) = &overrides.username {
            config.username = username.clone();
        }
        if let Some(password) = &overrides.password {
            config.password = password.clone();
        }
        if let Some(renegotiate) = &overrides.renegotiate {
            config.renegotiate = renegotiate.clone();
        }
        if let Some(insecure) = overrides.insecure {
            config.insecure = insecure;
        }
        if let Some(plain_http) = overrides.plain_http {
            config.plain_http = plain_http;
        }
        if !overrides.registry_config.is_empty() {
            config.registry_config = overrides.registry_config.clone();
        }
    }

    /// Collect environment variable overrides
    pub fn collect_env_overrides() -> HashMap<String, String> {
        std::env::vars()
            .filter(|(key, _)| key.starts_with("ORAS_"))
            .collect()
    }
}

fn parse_bool(key: &str, value: &str) -> ConfigResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        other => Err(OrasError::ConfigValidation {
            field: key.to_string(),
            reason: format!("expected a boolean, got '{}'", other),
        }),
    }
}
