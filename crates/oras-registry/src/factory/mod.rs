//! Resolver factory: option validation, client construction and the
//! authentication fallback chain
//!
//! Strategy priority, first match wins:
//! 1. explicit credentials (`username` or `password` non-empty)
//! 2. a resolver built by the credential store
//! 3. anonymous access
//!
//! Every failure on the way is recoverable. It is logged, collected into
//! [`ResolverBuild::warnings`] and replaced by the next option down, so
//! [`ResolverFactory::build`] always yields a usable resolver.

use tracing::{debug, warn};

use oras_config::ResolverConfig;
use oras_core::error::OrasError;

use crate::auth::{CredentialStoreOpener, DockerConfigOpener};
use crate::client::{build_client, default_client, HttpClient};
use crate::resolver::{AuthStrategy, Resolver};
use crate::tls::RenegotiationPolicy;

/// A resolver plus everything that degraded while building it
#[derive(Debug)]
pub struct ResolverBuild {
    pub resolver: Resolver,
    /// Non-fatal problems, in the order they occurred
    pub warnings: Vec<OrasError>,
}

impl ResolverBuild {
    /// True when any requested behavior was replaced by a fallback
    pub fn is_degraded(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn into_resolver(self) -> Resolver {
        self.resolver
    }
}

/// Builds resolvers, opening credential stores through `O`
#[derive(Debug, Clone, Default)]
pub struct ResolverFactory<O = DockerConfigOpener> {
    opener: O,
}

impl ResolverFactory {
    /// Factory backed by Docker config files
    pub fn new() -> Self {
        Self::with_opener(DockerConfigOpener)
    }
}

impl<O: CredentialStoreOpener> ResolverFactory<O> {
    pub fn with_opener(opener: O) -> Self {
        Self { opener }
    }

    /// Build a resolver from `config`. Never fails.
    pub fn build(&self, config: &ResolverConfig) -> ResolverBuild {
        let mut warnings = Vec::new();

        let policy = Self::renegotiation(config, &mut warnings);

        let client = match build_client(policy, config.insecure) {
            Ok(client) => client,
            Err(e) => {
                report(&mut warnings, e);
                default_client()
            },
        };

        let resolver = self.select_resolver(config, client, &mut warnings);

        debug!(
            strategy = %resolver.strategy(),
            plain_http = resolver.plain_http(),
            warnings = warnings.len(),
            "Built registry resolver"
        );

        ResolverBuild { resolver, warnings }
    }

    /// Pick the authentication strategy for an already-built client
    pub fn select_resolver(
        &self,
        config: &ResolverConfig,
        client: HttpClient,
        warnings: &mut Vec<OrasError>,
    ) -> Resolver {
        let plain_http = config.plain_http;

        if let Some(credential) = config.explicit_credential() {
            debug!(username = %credential.username, "Using explicit registry credentials");
            return Resolver::new(client, plain_http, AuthStrategy::Explicit(credential));
        }

        let store = match self.opener.open(&config.registry_config) {
            Ok(store) => store,
            Err(e) => {
                report(warnings, e);
                return Resolver::anonymous(client, plain_http);
            },
        };

        match store.resolver(client.clone(), plain_http) {
            Ok(resolver) => resolver,
            Err(e) => {
                report(warnings, e);
                Resolver::anonymous(client, plain_http)
            },
        }
    }

    /// An empty name means "not given" and selects the default silently
    fn renegotiation(config: &ResolverConfig, warnings: &mut Vec<OrasError>) -> RenegotiationPolicy {
        if config.renegotiate.is_empty() {
            return RenegotiationPolicy::default();
        }

        let (policy, err) = RenegotiationPolicy::resolve(&config.renegotiate);
        if let Some(e) = err {
            report(warnings, e);
        }
        policy
    }
}

/// Build a resolver backed by Docker config files
pub fn new_resolver(config: &ResolverConfig) -> ResolverBuild {
    ResolverFactory::new().build(config)
}

fn report(warnings: &mut Vec<OrasError>, err: OrasError) {
    warn!(kind = ?err.kind(), "{}", err);
    warnings.push(err);
}
