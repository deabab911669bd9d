//! Resolver construction options

use std::path::PathBuf;

use oras_core::Credential;

/// Options the resolver factory builds from.
///
/// Every field may be empty. An empty `renegotiate` means "not specified",
/// and an empty `registry_config` means "use the default credential file".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Registry username
    pub username: String,
    /// Registry password or token
    pub password: String,
    /// Symbolic TLS renegotiation policy name
    pub renegotiate: String,
    /// Skip TLS certificate verification
    pub insecure: bool,
    /// Talk to the registry over plain HTTP
    pub plain_http: bool,
    /// Credential store files, searched in order
    pub registry_config: Vec<PathBuf>,
}

impl ResolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    pub fn with_renegotiate(mut self, name: impl Into<String>) -> Self {
        self.renegotiate = name.into();
        self
    }

    pub fn with_insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    pub fn with_plain_http(mut self, plain_http: bool) -> Self {
        self.plain_http = plain_http;
        self
    }

    pub fn with_registry_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.registry_config.push(path.into());
        self
    }

    /// Credentials given explicitly, if either half is non-empty
    pub fn explicit_credential(&self) -> Option<Credential> {
        let credential = Credential::new(self.username.clone(), self.password.clone());
        (!credential.is_empty()).then_some(credential)
    }
}
