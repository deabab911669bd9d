//! HTTP client construction honoring TLS options
//!
//! The default client is an immutable template built once per process and
//! handed out by clone. Insecure clients are always built fresh, so two
//! resolvers never share or mutate each other's transport.

use std::time::Duration;

use once_cell::sync::Lazy;
use reqwest::{Client, ClientBuilder};
use tracing::warn;

use oras_core::error::OrasError;

use crate::tls::{RenegotiationPolicy, TlsSettings};
use crate::RegistryResult;

const USER_AGENT: &str = concat!("oras/", env!("CARGO_PKG_VERSION"));

static DEFAULT_CLIENT: Lazy<HttpClient> = Lazy::new(|| {
    let inner = base_builder().build().unwrap_or_else(|e| {
        warn!("Failed to build configured HTTP client, using reqwest defaults: {}", e);
        Client::new()
    });

    HttpClient {
        inner,
        tls: TlsSettings::default(),
        shared_default: true,
    }
});

/// HTTP client plus the TLS settings it was built with
#[derive(Debug, Clone)]
pub struct HttpClient {
    /// Underlying HTTP client with connection pooling
    inner: Client,
    tls: TlsSettings,
    shared_default: bool,
}

impl HttpClient {
    pub fn inner(&self) -> &Client {
        &self.inner
    }

    pub fn tls(&self) -> TlsSettings {
        self.tls
    }

    /// True for clones of the process-wide default client
    pub fn is_shared_default(&self) -> bool {
        self.shared_default
    }
}

/// Process-wide default client: standard certificate verification and the
/// TLS backend's own renegotiation behavior
pub fn default_client() -> HttpClient {
    DEFAULT_CLIENT.clone()
}

/// Build the client a resolver will use.
///
/// Without `insecure` this is the unmodified default client and `policy` is
/// ignored. With `insecure` the returned client **does not verify server
/// certificates at all**: any host can impersonate the registry. It also
/// records `policy` in its TLS settings. Only reach this through an explicit
/// opt-in from the operator.
///
/// Clients use rustls, which refuses every renegotiation request. `Never`
/// is therefore exactly what the transport does; the looser policies are
/// recorded as requested but cannot be honored, and a warning says so.
pub fn build_client(policy: RenegotiationPolicy, insecure: bool) -> RegistryResult<HttpClient> {
    if !insecure {
        return Ok(default_client());
    }

    warn!(
        renegotiation = %policy,
        "TLS certificate verification is disabled for registry connections"
    );

    if policy.allows_renegotiation() {
        warn!(
            requested = %policy,
            effective = %RenegotiationPolicy::Never,
            "TLS backend does not support renegotiation, connections will refuse it"
        );
    }

    let inner = base_builder()
        .danger_accept_invalid_certs(true)
        .build()
        .map_err(|e| OrasError::network("Failed to create insecure HTTP client".to_string(), e))?;

    Ok(HttpClient {
        inner,
        tls: TlsSettings {
            insecure_skip_verify: true,
            renegotiation: Some(policy),
        },
        shared_default: false,
    })
}

fn base_builder() -> ClientBuilder {
    ClientBuilder::new()
        .use_rustls_tls()
        // Connection pooling configuration
        .pool_max_idle_per_host(16)
        .pool_idle_timeout(Duration::from_secs(90))
        // Request timeout
        .timeout(Duration::from_secs(30))
        .gzip(true)
        .user_agent(USER_AGENT)
}
