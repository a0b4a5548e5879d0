// # dsfctl - Traffic Director command line
//
// Thin front end over `dsf-core`: reads configuration from the environment,
// initialises logging, runs one orchestrator call and prints the result as
// JSON. All lifecycle logic lives in `dsf-core`.
//
// ## Configuration
//
// ### Credentials (required)
// - `DYN_CUSTOMER_NAME`: DynECT customer name
// - `DYN_USERNAME`: API user
// - `DYN_PASSWORD`: API password
//
// ### Transport
// - `DYN_API_URL`: API root (default https://api.dynect.net/REST)
// - `DYN_DEBUG`: `1`/`true` logs every request at debug level
//
// ### Runtime
// - `DSF_LOG_LEVEL`: trace, debug, info, warn, error (default warn)
// - `DSF_POOL_MAX_IDLE`: idle sessions kept for reuse (default 8)
//
// ## Example
//
// ```bash
// export DYN_CUSTOMER_NAME=acme
// export DYN_USERNAME=ops
// export DYN_PASSWORD=...
//
// dsfctl services
// dsfctl record-set <service-id> <record-set-id>
// dsfctl publish <service-id>
// ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dsf_core::{Credentials, DsfConfig, Orchestrator, PoolConfig, TransportConfig};
use serde::Serialize;
use std::env;
use std::process::ExitCode;
use tracing::{Level, debug, error};
use tracing_subscriber::FmtSubscriber;

/// Exit codes
///
/// - 0: Command succeeded
/// - 1: Configuration or startup error
/// - 2: The command failed
#[derive(Debug, Clone, Copy)]
enum DsfExitCode {
    Success = 0,
    ConfigError = 1,
    CommandFailed = 2,
}

impl From<DsfExitCode> for ExitCode {
    fn from(code: DsfExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, rename_all = "kebab-case")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
#[command(rename_all = "kebab-case")]
enum Command {
    /// List every Traffic Director service
    Services,
    /// Show one service
    Service { service_id: String },
    /// Show the nodes served by a service
    Nodes { service_id: String },
    /// Show one ruleset
    Ruleset { service_id: String, ruleset_id: String },
    /// Show one response pool
    ResponsePool { service_id: String, pool_id: String },
    /// Show one record set failover chain
    Chain { service_id: String, chain_id: String },
    /// Show one record set
    RecordSet { service_id: String, record_set_id: String },
    /// Show one record
    Record { service_id: String, record_id: String },
    /// Show one monitor
    Monitor { monitor_id: String },
    /// Publish pending changes of a service
    Publish { service_id: String },
}

/// Environment configuration
struct Config {
    dsf: DsfConfig,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        let credentials = Credentials::new(
            env::var("DYN_CUSTOMER_NAME").context("DYN_CUSTOMER_NAME is required")?,
            env::var("DYN_USERNAME").context("DYN_USERNAME is required")?,
            env::var("DYN_PASSWORD").context("DYN_PASSWORD is required")?,
        );

        let mut transport = TransportConfig::default();
        if let Ok(url) = env::var("DYN_API_URL") {
            transport.base_url = url.trim_end_matches('/').to_string();
        }
        transport.verbose = env::var("DYN_DEBUG")
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let mut pool = PoolConfig::default();
        if let Ok(max_idle) = env::var("DSF_POOL_MAX_IDLE") {
            pool.max_idle = max_idle.parse().with_context(|| {
                format!("DSF_POOL_MAX_IDLE must be a non-negative integer. Got: {}", max_idle)
            })?;
        }

        Ok(Self {
            dsf: DsfConfig {
                credentials,
                transport,
                pool,
            },
            log_level: env::var("DSF_LOG_LEVEL").unwrap_or_else(|_| "warn".to_string()),
        })
    }

    fn validate(&self) -> Result<()> {
        self.dsf.validate()?;
        self.level()?;
        Ok(())
    }

    fn level(&self) -> Result<Level> {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Ok(Level::TRACE),
            "debug" => Ok(Level::DEBUG),
            "info" => Ok(Level::INFO),
            "warn" => Ok(Level::WARN),
            "error" => Ok(Level::ERROR),
            _ => anyhow::bail!(
                "DSF_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return DsfExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {:#}", e);
        return DsfExitCode::ConfigError.into();
    }

    let level = config.level().unwrap_or(Level::WARN);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DsfExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DsfExitCode::ConfigError.into();
        }
    };

    rt.block_on(async {
        let orchestrator = match dsf_dynect::orchestrator(&config.dsf) {
            Ok(orchestrator) => orchestrator,
            Err(e) => {
                error!("Failed to set up DynECT client: {}", e);
                return DsfExitCode::ConfigError;
            }
        };

        let result = run(&orchestrator, cli.command).await;
        let closed = orchestrator.pool().drain().await;
        debug!("Closed {} session(s)", closed);

        match result {
            Ok(()) => DsfExitCode::Success,
            Err(e) => {
                eprintln!("Error: {:#}", e);
                DsfExitCode::CommandFailed
            }
        }
    })
    .into()
}

/// Run one command and print its result
async fn run(orchestrator: &Orchestrator, command: Command) -> Result<()> {
    match command {
        Command::Services => print(&orchestrator.list_services().await?),
        Command::Service { service_id } => print(&orchestrator.read_service(&service_id).await?),
        Command::Nodes { service_id } => print(&orchestrator.read_nodes(&service_id).await?),
        Command::Ruleset {
            service_id,
            ruleset_id,
        } => print(&orchestrator.read_ruleset(&service_id, &ruleset_id).await?),
        Command::ResponsePool {
            service_id,
            pool_id,
        } => print(&orchestrator.read_response_pool(&service_id, &pool_id).await?),
        Command::Chain {
            service_id,
            chain_id,
        } => print(&orchestrator.read_rsfc(&service_id, &chain_id).await?),
        Command::RecordSet {
            service_id,
            record_set_id,
        } => print(
            &orchestrator
                .read_record_set(&service_id, &record_set_id)
                .await?,
        ),
        Command::Record {
            service_id,
            record_id,
        } => print(&orchestrator.read_record(&service_id, &record_id).await?),
        Command::Monitor { monitor_id } => print(&orchestrator.read_monitor(&monitor_id).await?),
        Command::Publish { service_id } => print(&orchestrator.publish(&service_id).await?),
    }
}

fn print<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to render result")?;
    println!("{}", rendered);
    Ok(())
}
