//! eDoc daemon — entry point for running the revocation proxy.

use anyhow::{bail, Context};
use clap::Parser;
use edoc_proxy::{AllowList, CacheTier, ProxyConfig, ProxyServer, ShutdownController};
use edoc_utils::LogFormat;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "edoc-daemon", about = "eDoc viewer backend services")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "EDOC_CONFIG")]
    config: Option<PathBuf>,

    /// Subcommand.
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Revocation proxy.
    #[command(name = "proxy")]
    Proxy {
        #[command(subcommand)]
        action: ProxyAction,
    },
}

#[derive(clap::Subcommand)]
enum ProxyAction {
    /// Serve the proxy until SIGINT/SIGTERM.
    Run(RunArgs),
    /// Evaluate an origin and destination against the allow-lists without
    /// fetching anything.
    Check {
        /// Value of the `Origin` header.
        #[arg(long)]
        origin: String,

        /// Destination URL (the `url` query parameter, decoded).
        #[arg(long)]
        url: String,
    },
}

#[derive(clap::Args)]
struct RunArgs {
    /// Listen address, e.g. "0.0.0.0:8787".
    #[arg(long, env = "EDOC_PROXY_BIND")]
    bind: Option<String>,

    /// Maximum number of cached GET responses.
    #[arg(long, env = "EDOC_PROXY_CACHE_CAPACITY")]
    cache_capacity: Option<usize>,

    /// Destination fetch timeout in seconds (none by default).
    #[arg(long, env = "EDOC_PROXY_UPSTREAM_TIMEOUT")]
    upstream_timeout: Option<u64>,

    /// Collector URL receiving one JSON event per request.
    #[arg(long, env = "EDOC_PROXY_TELEMETRY_ENDPOINT")]
    telemetry_endpoint: Option<String>,

    /// Enable the Prometheus `/metrics` endpoint.
    #[arg(long, env = "EDOC_ENABLE_METRICS")]
    metrics: bool,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "EDOC_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "EDOC_LOG_FORMAT")]
    log_format: Option<String>,
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<ProxyConfig> {
    match path {
        Some(path) => {
            let path = path.to_string_lossy();
            ProxyConfig::from_toml_file(&path)
                .with_context(|| format!("failed to load config file {path}"))
        }
        None => Ok(ProxyConfig::default()),
    }
}

fn apply_overrides(file_cfg: ProxyConfig, args: RunArgs) -> ProxyConfig {
    ProxyConfig {
        bind: args.bind.unwrap_or(file_cfg.bind),
        cache_capacity: args.cache_capacity.unwrap_or(file_cfg.cache_capacity),
        upstream_timeout_secs: args.upstream_timeout.or(file_cfg.upstream_timeout_secs),
        telemetry_endpoint: args.telemetry_endpoint.or(file_cfg.telemetry_endpoint),
        enable_metrics: args.metrics || file_cfg.enable_metrics,
        log_level: args.log_level.unwrap_or(file_cfg.log_level),
        log_format: args.log_format.unwrap_or(file_cfg.log_format),
        ..file_cfg
    }
}

async fn run(config: ProxyConfig) -> anyhow::Result<()> {
    let format: LogFormat = config.log_format.parse().map_err(anyhow::Error::msg)?;
    edoc_utils::init_logging(format, &config.log_level);

    tracing::info!(
        "Starting revocation proxy on {} (cache: {} entries, metrics: {}, telemetry: {})",
        config.bind,
        config.cache_capacity,
        if config.enable_metrics { "on" } else { "off" },
        config.telemetry_endpoint.as_deref().unwrap_or("tracing"),
    );

    let server = ProxyServer::from_config(&config)?;
    let shutdown = Arc::new(ShutdownController::new());
    let shutdown_rx = shutdown.subscribe();
    let signals = shutdown.clone();
    tokio::spawn(async move { signals.wait_for_signal().await });

    server.serve(shutdown_rx).await?;

    tracing::info!("eDoc daemon exited cleanly");
    Ok(())
}

fn check(config: &ProxyConfig, origin: &str, url: &str) -> anyhow::Result<()> {
    let allow = AllowList::from_config(config)?;
    if !allow.is_allowed_origin(origin) {
        bail!("blocked: origin {origin} is not allowed (403)");
    }
    let destination = match allow.check_destination(url) {
        Ok(destination) => destination,
        Err(rejection) => bail!("blocked: {rejection} (400)"),
    };
    let tier = CacheTier::classify(&destination);
    println!(
        "allowed: {destination} (tier: {}, max-age: {}s)",
        tier.as_str(),
        tier.ttl_secs(&config.ttl)
    );
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let file_config = load_config(cli.config.as_ref())?;

    match cli.command {
        Command::Proxy { action } => match action {
            ProxyAction::Run(args) => run(apply_overrides(file_config, args)).await,
            ProxyAction::Check { origin, url } => {
                edoc_utils::init_tracing();
                check(&file_config, &origin, &url)
            }
        },
    }
}
