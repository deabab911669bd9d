//! Command implementations and dispatch logic.
//!
//! Every command resolves the layered configuration once, through
//! [`CommandContext`], and builds its resolver from it.

use std::collections::HashMap;
use std::path::PathBuf;

use oras_config::{ConfigLayering, ConfigLoader, ConfigSource, OrasToml, ResolverConfig};
use oras_core::error::OrasResult;
use oras_registry::{new_resolver, Resolver};
use tracing::{debug, info};

pub mod inspect;
pub mod ping;


use crate::output::OutputHandler;
use crate::{Commands, RemoteOptions};

/// Shared context for all commands
pub struct CommandContext {
    pub output: OutputHandler,
    /// Options after merging file, environment and flags
    pub config: ResolverConfig,
    /// Config file that contributed to `config`, if any
    pub config_source: Option<ConfigSource>,
}

impl CommandContext {
    /// Load the config file and merge it with the environment and `remote`
    pub async fn new(config_path: Option<PathBuf>, remote: &RemoteOptions) -> OrasResult<Self> {
        let loaded = ConfigLoader::new(config_path).load().await?;
        let (file, source) = match loaded {
            Some((file, source)) => (Some(file), Some(source)),
            None => (None, None),
        };

        let env = ConfigLayering::collect_env_overrides();
        let mut ctx = Self::from_layers(file, &env, remote)?;
        ctx.config_source = source;

        if let Some(source) = &ctx.config_source {
            debug!(source = ?source, "Loaded config file");
        }
        Ok(ctx)
    }

    /// Merge already-collected layers without touching the filesystem
    pub fn from_layers(
        file: Option<OrasToml>,
        env: &HashMap<String, String>,
        remote: &RemoteOptions,
    ) -> OrasResult<Self> {
        let config = ConfigLayering::merge_configs(file, env, &remote.overrides())?;

        Ok(Self {
            output: OutputHandler::new(),
            config,
            config_source: None,
        })
    }

    /// Build the resolver for this invocation, reporting every fallback taken
    pub fn build_resolver(&self) -> Resolver {
        let build = new_resolver(&self.config);

        for warning in &build.warnings {
            self.output.warning(warning);
        }

        let resolver = build.into_resolver();
        if resolver.client().tls().insecure_skip_verify {
            self.output
                .warn("TLS certificate verification is disabled for this command");
        }
        resolver
    }
}

/// Dispatch a command to its handler
pub async fn dispatch_command(command: Commands, ctx: &CommandContext) -> OrasResult<()> {
    match command {
        Commands::Inspect { reference } => {
            info!("Inspecting resolver for {}", reference);
            inspect::execute(&reference, ctx).await
        },
        Commands::Ping { reference } => {
            info!("Pinging registry of {}", reference);
            ping::execute(&reference, ctx).await
        },
    }
}
