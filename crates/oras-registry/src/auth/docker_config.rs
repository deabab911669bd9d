//! Docker `config.json` credential store
//!
//! Reads the file format Docker and other container tools use to save
//! registry logins. With no explicit paths the default file is used:
//! `$DOCKER_CONFIG/config.json`, else `~/.docker/config.json`.

use std::collections::{BTreeMap, HashMap};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use base64::Engine;
use serde::Deserialize;
use tracing::debug;

use oras_core::error::OrasError;
use oras_core::{Credential, DOCKER_HUB_REGISTRY};

use super::{CredentialStore, CredentialStoreOpener};
use crate::client::HttpClient;
use crate::resolver::{AuthStrategy, Resolver};
use crate::RegistryResult;

const DOCKER_HUB_ALIASES: [&str; 3] = ["docker.io", "index.docker.io", "registry-1.docker.io"];

/// On-disk layout; unknown keys (psFormat, proxies, ...) are ignored
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    auths: BTreeMap<String, AuthEntry>,
    #[serde(default, rename = "credsStore")]
    creds_store: Option<String>,
    #[serde(default, rename = "credHelpers")]
    cred_helpers: BTreeMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
struct AuthEntry {
    /// Base64-encoded "username:password"
    auth: Option<String>,
    username: Option<String>,
    password: Option<String>,
}

/// One loaded file: its inline credentials keyed by canonical host
#[derive(Debug, Clone)]
struct LoadedFile {
    path: PathBuf,
    credentials: HashMap<String, Credential>,
    helper: Option<String>,
}

/// Credential store over one or more Docker config files
#[derive(Debug, Clone, Default)]
pub struct DockerConfigStore {
    files: Vec<LoadedFile>,
}

impl DockerConfigStore {
    /// Load every file in `paths`, or the default file when `paths` is empty.
    ///
    /// Explicit files must exist and parse. A missing default file yields an
    /// empty store.
    pub fn load(paths: &[PathBuf]) -> RegistryResult<Self> {
        if paths.is_empty() {
            return Self::load_default(Self::default_config_path());
        }

        let files = paths
            .iter()
            .map(|path| Self::load_file(path))
            .collect::<RegistryResult<Vec<_>>>()?;

        Ok(Self { files })
    }

    /// Default config file location
    pub fn default_config_path() -> Option<PathBuf> {
        Self::default_config_path_from(std::env::var_os("DOCKER_CONFIG"), dirs::home_dir())
    }

    fn default_config_path_from(docker_config: Option<OsString>, home: Option<PathBuf>) -> Option<PathBuf> {
        if let Some(dir) = docker_config.filter(|dir| !dir.is_empty()) {
            return Some(PathBuf::from(dir).join("config.json"));
        }

        home.map(|home| home.join(".docker").join("config.json"))
    }

    fn load_default(path: Option<PathBuf>) -> RegistryResult<Self> {
        match path {
            Some(path) if path.exists() => Ok(Self {
                files: vec![Self::load_file(&path)?],
            }),
            _ => {
                debug!("No default Docker config found, credential store is empty");
                Ok(Self::default())
            },
        }
    }

    /// Files this store was loaded from, in lookup order
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(|file| file.path.as_path())
    }

    fn load_file(path: &Path) -> RegistryResult<LoadedFile> {
        let contents = fs::read_to_string(path).map_err(|e| unavailable(path, e.to_string()))?;

        let config: ConfigFile = serde_json::from_str(&contents)
            .map_err(|e| unavailable(path, format!("malformed config: {}", e)))?;

        let mut credentials = HashMap::new();
        for (key, entry) in &config.auths {
            let host = canonical_host(key);
            match Self::extract_credentials(entry) {
                // Keys that normalize to the same host: the lexically first wins
                Some(credential) => {
                    credentials.entry(host).or_insert(credential);
                },
                None => debug!(path = %path.display(), key = %key, "Skipping auth entry without inline credentials"),
            }
        }

        let helper = config
            .creds_store
            .clone()
            .or_else(|| config.cred_helpers.values().next().cloned());

        debug!(
            path = %path.display(),
            entries = credentials.len(),
            "Loaded Docker config"
        );

        Ok(LoadedFile {
            path: path.to_path_buf(),
            credentials,
            helper,
        })
    }

    /// Extract credentials from an auth entry.
    ///
    /// An empty pair counts as no credential, so the host stays anonymous.
    fn extract_credentials(entry: &AuthEntry) -> Option<Credential> {
        let plain = match (&entry.username, &entry.password) {
            (Some(username), Some(password)) => Some(Credential::new(username.clone(), password.clone())),
            _ => None,
        };

        plain
            .filter(|credential| !credential.is_empty())
            .or_else(|| entry.auth.as_deref().and_then(Self::decode_auth))
            .filter(|credential| !credential.is_empty())
    }

    /// Decode base64-encoded "username:password" auth string
    fn decode_auth(auth: &str) -> Option<Credential> {
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(auth.trim())
            .ok()?;
        let decoded = String::from_utf8(decoded).ok()?;
        let (username, password) = decoded.split_once(':')?;

        Some(Credential::new(username, password))
    }
}

impl CredentialStore for DockerConfigStore {
    fn get(&self, host: &str) -> RegistryResult<Option<Credential>> {
        let host = canonical_host(host);
        Ok(self
            .files
            .iter()
            .find_map(|file| file.credentials.get(&host))
            .cloned())
    }

    fn resolver(&self, client: HttpClient, plain_http: bool) -> RegistryResult<Resolver> {
        let has_inline = self.files.iter().any(|file| !file.credentials.is_empty());
        if !has_inline {
            if let Some((path, helper)) = self
                .files
                .iter()
                .find_map(|file| file.helper.as_ref().map(|helper| (&file.path, helper)))
            {
                return Err(OrasError::ResolverConstructionFailed {
                    reason: format!(
                        "credential helper '{}' configured in {} is not supported",
                        helper,
                        path.display()
                    ),
                });
            }
        }

        Ok(Resolver::new(
            client,
            plain_http,
            AuthStrategy::StoreBacked(Arc::new(self.clone())),
        ))
    }
}

/// Opens [`DockerConfigStore`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct DockerConfigOpener;

impl CredentialStoreOpener for DockerConfigOpener {
    fn open(&self, paths: &[PathBuf]) -> RegistryResult<Box<dyn CredentialStore>> {
        Ok(Box::new(DockerConfigStore::load(paths)?))
    }
}

/// Reduce a config key or registry address to a bare host.
///
/// `https://ghcr.io/v1/` becomes `ghcr.io`; Docker Hub aliases collapse to
/// `docker.io`.
fn canonical_host(key: &str) -> String {
    let trimmed = key
        .trim()
        .trim_start_matches("https://")
        .trim_start_matches("http://");
    let host = trimmed.split('/').next().unwrap_or(trimmed).to_ascii_lowercase();

    if DOCKER_HUB_ALIASES.contains(&host.as_str()) {
        DOCKER_HUB_REGISTRY.to_string()
    } else {
        host
    }
}

fn unavailable(path: &Path, reason: String) -> OrasError {
    OrasError::CredentialStoreUnavailable {
        path: path.display().to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oras_core::ErrorKind;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_parse_docker_config() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "config.json",
            r#"{
                "auths": {
                    "ghcr.io": { "auth": "dXNlcm5hbWU6cGFzc3dvcmQ=" },
                    "registry.example.com": { "username": "myuser", "password": "mypass" }
                },
                "psFormat": "table {{.ID}}"
            }"#,
        );

        let store = DockerConfigStore::load(&[path]).unwrap();

        // Base64 auth field
        assert_eq!(
            store.get("ghcr.io").unwrap(),
            Some(Credential::new("username", "password"))
        );

        // Plain username/password
        assert_eq!(
            store.get("registry.example.com").unwrap(),
            Some(Credential::new("myuser", "mypass"))
        );

        assert_eq!(store.get("quay.io").unwrap(), None);
    }

    #[test]
    fn test_empty_entries_are_skipped() {
        let dir = TempDir::new().unwrap();
        // "Og==" is ":"
        let path = write_config(
            &dir,
            "config.json",
            r#"{
                "auths": {
                    "ghcr.io": { "username": "", "password": "" },
                    "quay.io": { "auth": "Og==" },
                    "registry.example.com": { "username": "", "password": "token" },
                    "gcr.io": { "username": "", "password": "", "auth": "dXNlcm5hbWU6cGFzc3dvcmQ=" }
                }
            }"#,
        );

        let store = DockerConfigStore::load(&[path.clone()]).unwrap();
        assert_eq!(store.get("ghcr.io").unwrap(), None);
        assert_eq!(store.get("quay.io").unwrap(), None);
        assert_eq!(
            store.get("registry.example.com").unwrap(),
            Some(Credential::new("", "token"))
        );
        assert_eq!(
            store.get("gcr.io").unwrap(),
            Some(Credential::new("username", "password"))
        );

        // A later file still supplies the host the first one left empty
        let fallback = write_config(
            &dir,
            "fallback.json",
            r#"{ "auths": { "ghcr.io": { "username": "real", "password": "pw" } } }"#,
        );
        let store = DockerConfigStore::load(&[path, fallback]).unwrap();
        assert_eq!(store.get("ghcr.io").unwrap(), Some(Credential::new("real", "pw")));
    }

    #[test]
    fn test_registry_normalization() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "config.json",
            r#"{
                "auths": {
                    "https://ghcr.io/v1/": { "auth": "dXNlcm5hbWU6cGFzc3dvcmQ=" },
                    "https://index.docker.io/v1/": { "auth": "ZG9ja2VyOnBhc3M=" }
                }
            }"#,
        );

        let store = DockerConfigStore::load(&[path]).unwrap();

        assert!(store.get("ghcr.io").unwrap().is_some());
        assert!(store.get("GHCR.io").unwrap().is_some());

        for alias in DOCKER_HUB_ALIASES {
            assert_eq!(
                store.get(alias).unwrap(),
                Some(Credential::new("docker", "pass")),
                "alias {}",
                alias
            );
        }
    }

    #[test]
    fn test_first_file_wins() {
        let dir = TempDir::new().unwrap();
        let first = write_config(
            &dir,
            "first.json",
            r#"{ "auths": { "ghcr.io": { "username": "first", "password": "1" } } }"#,
        );
        let second = write_config(
            &dir,
            "second.json",
            r#"{ "auths": {
                "ghcr.io": { "username": "second", "password": "2" },
                "quay.io": { "username": "quay", "password": "3" }
            } }"#,
        );

        let store = DockerConfigStore::load(&[first.clone(), second.clone()]).unwrap();
        assert_eq!(store.get("ghcr.io").unwrap(), Some(Credential::new("first", "1")));
        assert_eq!(store.get("quay.io").unwrap(), Some(Credential::new("quay", "3")));
        assert_eq!(
            store.paths().collect::<Vec<_>>(),
            vec![first.as_path(), second.as_path()]
        );
    }

    #[test]
    fn test_missing_explicit_file() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.json");

        let err = DockerConfigStore::load(&[missing.clone()]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CredentialStoreUnavailable);
        assert!(err.to_string().contains(&missing.display().to_string()));
    }

    #[test]
    fn test_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "config.json", "{ not json");

        let err = DockerConfigStore::load(&[path]).unwrap_err();
        match err {
            OrasError::CredentialStoreUnavailable { reason, .. } => {
                assert!(reason.contains("malformed"));
            },
            other => panic!("Expected CredentialStoreUnavailable, got {:?}", other),
        }
    }

    #[test]
    fn test_default_path_prefers_docker_config_dir() {
        let dir = TempDir::new().unwrap();
        write_config(
            &dir,
            "config.json",
            r#"{ "auths": { "ghcr.io": { "username": "env", "password": "pw" } } }"#,
        );

        let default_path = DockerConfigStore::default_config_path_from(
            Some(dir.path().as_os_str().to_owned()),
            Some(PathBuf::from("/home/someone")),
        );
        assert_eq!(default_path, Some(dir.path().join("config.json")));

        let store = DockerConfigStore::load_default(default_path).unwrap();
        assert_eq!(store.get("ghcr.io").unwrap(), Some(Credential::new("env", "pw")));
    }

    #[test]
    fn test_default_path_falls_back_to_home() {
        let home = PathBuf::from("/home/someone");
        let expected = Some(home.join(".docker").join("config.json"));

        assert_eq!(
            DockerConfigStore::default_config_path_from(None, Some(home.clone())),
            expected
        );
        // An empty DOCKER_CONFIG is treated as unset
        assert_eq!(
            DockerConfigStore::default_config_path_from(Some(OsString::new()), Some(home)),
            expected
        );
        assert_eq!(DockerConfigStore::default_config_path_from(None, None), None);
    }

    #[test]
    fn test_missing_default_file_is_empty_store() {
        let dir = TempDir::new().unwrap();
        let store = DockerConfigStore::load_default(Some(dir.path().join("config.json"))).unwrap();
        assert_eq!(store.paths().count(), 0);
        assert_eq!(store.get("ghcr.io").unwrap(), None);

        assert_eq!(DockerConfigStore::load_default(None).unwrap().paths().count(), 0);
    }

    #[test]
    fn test_decode_auth() {
        assert_eq!(
            DockerConfigStore::decode_auth("dXNlcm5hbWU6cGFzc3dvcmQ="),
            Some(Credential::new("username", "password"))
        );
        // "nocolon"
        assert_eq!(DockerConfigStore::decode_auth("bm9jb2xvbg=="), None);
        assert_eq!(DockerConfigStore::decode_auth("%%%"), None);
    }

    #[test]
    fn test_helper_only_store_cannot_build_resolver() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "config.json",
            r#"{ "auths": { "ghcr.io": {} }, "credsStore": "desktop" }"#,
        );

        let store = DockerConfigStore::load(&[path]).unwrap();
        let err = store
            .resolver(crate::client::default_client(), false)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResolverConstructionFailed);
        assert!(err.to_string().contains("desktop"));
    }

    #[test]
    fn test_helper_with_inline_credentials_builds_resolver() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "config.json",
            r#"{
                "auths": { "ghcr.io": { "username": "u", "password": "p" } },
                "credHelpers": { "123456789.dkr.ecr.us-east-1.amazonaws.com": "ecr-login" }
            }"#,
        );

        let store = DockerConfigStore::load(&[path]).unwrap();
        let resolver = store.resolver(crate::client::default_client(), true).unwrap();
        assert_eq!(resolver.credential("ghcr.io"), Some(Credential::new("u", "p")));
        assert!(resolver.plain_http());
    }
}
