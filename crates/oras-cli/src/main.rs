//! # oras-cli
//!
//! Command-line front end for the ORAS resolver factory.
//!
//! Parses remote options, layers them over the config file and `ORAS_*`
//! environment, builds a resolver and reports what it chose.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use oras_config::ConfigOverrides;
use oras_core::error::{OrasError, OrasResult};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::CommandContext;
use output::errors::ErrorFormatter;

/// Build registry resolvers and check what they would do
#[derive(Parser, Debug)]
#[command(name = "oras", version, about = "OCI registry resolver toolkit")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub remote: RemoteOptions,

    /// Config file (defaults to ~/.oras/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Registry connection and authentication flags
#[derive(Args, Debug, Clone, Default)]
pub struct RemoteOptions {
    /// Registry username
    #[arg(short = 'u', long, global = true)]
    pub username: Option<String>,

    /// Registry password or identity token
    #[arg(short = 'p', long, global = true)]
    pub password: Option<String>,

    /// TLS renegotiation policy: RenegotiateNever, RenegotiateOnceAsClient or RenegotiateFreelyAsClient
    #[arg(long, global = true, value_name = "POLICY")]
    pub renegotiate: Option<String>,

    /// Allow connections to registries with invalid TLS certificates
    #[arg(short = 'k', long, global = true)]
    pub insecure: bool,

    /// Use plain HTTP instead of HTTPS
    #[arg(long, global = true)]
    pub plain_http: bool,

    /// Credential store file; repeat to search several in order
    #[arg(short = 'c', long = "registry-config", global = true, value_name = "PATH")]
    pub registry_config: Vec<PathBuf>,
}

impl RemoteOptions {
    /// Only flags actually given override lower configuration layers
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            username: self.username.clone(),
            password: self.password.clone(),
            renegotiate: self.renegotiate.clone(),
            insecure: self.insecure.then_some(true),
            plain_http: self.plain_http.then_some(true),
            registry_config: self.registry_config.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the resolver that would be used for a reference
    Inspect {
        /// Artifact reference, e.g. ghcr.io/owner/repo:tag
        reference: String,
    },
    /// Check that the registry of a reference answers the API version check
    Ping {
        /// Artifact reference, e.g. localhost:5000/repo
        reference: String,
    },
}

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose);
    setup_panic_handler();

    info!("Starting oras v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run_cli(cli) {
        eprintln!("{}", ErrorFormatter::new().format_error(&e));
        std::process::exit(1);
    }
}

fn run_cli(cli: Cli) -> OrasResult<()> {
    // Create Tokio runtime for async operations
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| OrasError::io("Failed to create async runtime".to_string(), e))?;

    rt.block_on(async {
        let ctx = CommandContext::new(cli.config.clone(), &cli.remote).await?;
        commands::dispatch_command(cli.command, &ctx).await
    })
}

fn setup_logging(verbose: bool) {
    // Resolver warnings are printed by the commands; the library log line
    // would only duplicate them unless debugging.
    let default_filter = if verbose {
        "oras=debug,oras_config=debug,oras_registry=debug"
    } else {
        "oras=warn,oras_config=warn,oras_registry=error"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        error!("oras encountered an unexpected error: {}", panic_info);
        eprintln!("oras crashed! This is a bug.");
        eprintln!("Please report this at: https://github.com/oras-project/oras-rs/issues");
        eprintln!("Error: {}", panic_info);
    }));
}
