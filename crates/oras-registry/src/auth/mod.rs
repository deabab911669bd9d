//! Credential store seam
//!
//! The factory never reads credential files itself. It asks a
//! [`CredentialStoreOpener`] for a store, and the store builds the resolver
//! that consults it. [`DockerConfigStore`] is the stock implementation over
//! Docker-style `config.json` files.

pub mod docker_config;

pub use docker_config::{DockerConfigOpener, DockerConfigStore};

use std::fmt;
use std::path::PathBuf;

use oras_core::Credential;

use crate::client::HttpClient;
use crate::resolver::Resolver;
use crate::RegistryResult;

/// Previously saved registry logins, keyed by host
pub trait CredentialStore: Send + Sync + fmt::Debug {
    /// Look up the credential saved for `host`
    fn get(&self, host: &str) -> RegistryResult<Option<Credential>>;

    /// Build a resolver whose credentials come from this store
    fn resolver(&self, client: HttpClient, plain_http: bool) -> RegistryResult<Resolver>;
}

/// Opens a credential store over an ordered list of files
pub trait CredentialStoreOpener {
    /// An empty `paths` means the store's default location
    fn open(&self, paths: &[PathBuf]) -> RegistryResult<Box<dyn CredentialStore>>;
}
