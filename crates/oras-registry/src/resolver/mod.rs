//! Resolver handle carrying the client, transport mode and auth strategy

use std::fmt;
use std::sync::Arc;

use reqwest::{Method, RequestBuilder, StatusCode};
use tracing::{debug, warn};
use url::Url;

use oras_core::error::OrasError;
use oras_core::{Credential, DOCKER_HUB_REGISTRY};

use crate::auth::CredentialStore;
use crate::client::HttpClient;
use crate::RegistryResult;

/// Host that actually serves the Docker Hub registry API
const DOCKER_HUB_ENDPOINT: &str = "registry-1.docker.io";

/// Where a resolver gets credentials from
#[derive(Debug, Clone)]
pub enum AuthStrategy {
    /// The same pair for every host
    Explicit(Credential),
    /// Per-host lookup in a credential store
    StoreBacked(Arc<dyn CredentialStore>),
    /// No credentials
    Anonymous,
}

/// Which [`AuthStrategy`] branch a resolver uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    Explicit,
    StoreBacked,
    Anonymous,
}

impl AuthStrategy {
    pub fn kind(&self) -> StrategyKind {
        match self {
            AuthStrategy::Explicit(_) => StrategyKind::Explicit,
            AuthStrategy::StoreBacked(_) => StrategyKind::StoreBacked,
            AuthStrategy::Anonymous => StrategyKind::Anonymous,
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StrategyKind::Explicit => "explicit credentials",
            StrategyKind::StoreBacked => "credential store",
            StrategyKind::Anonymous => "anonymous",
        };
        f.write_str(label)
    }
}

/// Locates and fetches registry content with exactly one auth strategy
#[derive(Debug, Clone)]
pub struct Resolver {
    client: HttpClient,
    plain_http: bool,
    auth: AuthStrategy,
}

impl Resolver {
    pub fn new(client: HttpClient, plain_http: bool, auth: AuthStrategy) -> Self {
        Self {
            client,
            plain_http,
            auth,
        }
    }

    /// Resolver that never sends credentials
    pub fn anonymous(client: HttpClient, plain_http: bool) -> Self {
        Self::new(client, plain_http, AuthStrategy::Anonymous)
    }

    pub fn strategy(&self) -> StrategyKind {
        self.auth.kind()
    }

    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    pub fn plain_http(&self) -> bool {
        self.plain_http
    }

    pub fn scheme(&self) -> &'static str {
        if self.plain_http {
            "http"
        } else {
            "https"
        }
    }

    /// Credential to present to `host`.
    ///
    /// A failing store lookup is logged and treated as "no credential".
    pub fn credential(&self, host: &str) -> Option<Credential> {
        match &self.auth {
            AuthStrategy::Explicit(credential) => Some(credential.clone()),
            AuthStrategy::StoreBacked(store) => match store.get(host) {
                Ok(credential) => credential,
                Err(e) => {
                    warn!(host = %host, "Credential lookup failed, continuing without credentials: {}", e);
                    None
                },
            },
            AuthStrategy::Anonymous => None,
        }
    }

    /// Base URL of the registry API on `host`
    pub fn endpoint(&self, host: &str) -> RegistryResult<Url> {
        let host = if host == DOCKER_HUB_REGISTRY {
            DOCKER_HUB_ENDPOINT
        } else {
            host
        };

        Url::parse(&format!("{}://{}/", self.scheme(), host)).map_err(|e| {
            OrasError::InvalidReference {
                reference: host.to_string(),
                reason: format!("not a valid registry host: {}", e),
            }
        })
    }

    /// Start a request to `path` on `host`, authenticated when a credential exists
    pub fn request(&self, method: Method, host: &str, path: &str) -> RegistryResult<RequestBuilder> {
        let url = self
            .endpoint(host)?
            .join(path.trim_start_matches('/'))
            .map_err(|e| OrasError::InvalidReference {
                reference: format!("{}/{}", host, path),
                reason: e.to_string(),
            })?;

        let builder = self.client.inner().request(method, url);
        Ok(match self.credential(host) {
            Some(credential) => builder.basic_auth(credential.username, Some(credential.password)),
            None => builder,
        })
    }

    /// Check that `host` speaks the registry API (`GET /v2/`)
    pub async fn ping(&self, host: &str) -> RegistryResult<StatusCode> {
        let response = self
            .request(Method::GET, host, "/v2/")?
            .send()
            .await
            .map_err(|e| OrasError::network(format!("Failed to reach registry {}", host), e))?;

        debug!(host = %host, status = %response.status(), "Registry ping");
        Ok(response.status())
    }
}

#[cfg(test)]
mod tests;
