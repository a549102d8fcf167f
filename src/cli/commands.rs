use crate::config::{AppConfig, ConfigOverrides};
use crate::middleware::CorsMiddleware;
use crate::registry;
use crate::runtime_config::RuntimeConfig;
use crate::server::{HttpServer, ServerHandle};
use crate::store::{ItemStore, SchemaMode, SqliteItemStore};
use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Command-line interface for the Interview API service
#[derive(Debug, Parser)]
#[command(name = "interview-api")]
#[command(about = "CRUD JSON API over a single items table", long_about = None, version)]
pub struct Cli {
    /// The subcommand to execute; `serve` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub serve: ServeArgs,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the HTTP server
    Serve(ServeArgs),
    /// Print the routing table
    Routes,
}

/// Options of the `serve` command
#[derive(Debug, Clone, Default, Args)]
pub struct ServeArgs {
    /// YAML configuration file
    #[arg(short, long, env = "INTERVIEW_API_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to listen on [default: 0.0.0.0:4567]
    #[arg(long, env = "INTERVIEW_API_ADDR")]
    pub addr: Option<String>,

    /// SQLite database file, or `:memory:` [default: interview.db]
    #[arg(long, env = "INTERVIEW_API_DATABASE")]
    pub database: Option<PathBuf>,

    /// Require an existing schema instead of creating it
    #[arg(long, env = "INTERVIEW_API_SKIP_MIGRATIONS", default_value_t = false)]
    pub skip_migrations: bool,

    /// Value of the Access-Control-Allow-Origin header [default: *]
    #[arg(long, env = "INTERVIEW_API_CORS_ORIGIN")]
    pub cors_origin: Option<String>,
}

impl ServeArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            addr: self.addr.clone(),
            database: self.database.clone(),
            skip_migrations: self.skip_migrations,
            cors_origin: self.cors_origin.clone(),
        }
    }

    /// Resolve the full configuration for this invocation.
    pub fn resolve(&self) -> anyhow::Result<AppConfig> {
        Ok(AppConfig::load(self.config.as_deref(), self.overrides())?)
    }
}

/// Execute the parsed command line.
pub fn run_cli(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::Routes) => {
            for route in registry::routes() {
                println!(
                    "{:<7} {:<14} {}",
                    route.method.as_str(),
                    route.path_pattern,
                    route.handler_name
                );
            }
            Ok(())
        }
        Some(Commands::Serve(args)) => serve(&args),
        None => serve(&cli.serve),
    }
}

/// Open the store, start the server and block until shutdown.
fn serve(args: &ServeArgs) -> anyhow::Result<()> {
    let config = args.resolve().context("failed to load configuration")?;
    let handle = start(&config)?;
    wait_for_shutdown(handle)
}

/// Open the store and start serving `config.addr`.
pub fn start(config: &AppConfig) -> anyhow::Result<ServerHandle> {
    let mode = if config.skip_migrations {
        SchemaMode::Verify
    } else {
        SchemaMode::Migrate
    };
    let store = SqliteItemStore::open(&config.database, mode).with_context(|| {
        format!("failed to open item store at {}", config.database.display())
    })?;
    info!(
        database = %config.database.display(),
        items = store.count().unwrap_or_default(),
        "Item store ready"
    );

    let cors = CorsMiddleware::with_origin(&config.cors_origin)?;
    let runtime = RuntimeConfig::from_env();
    runtime.apply();

    let service = registry::build_service(Arc::new(store), cors, runtime)
        .context("failed to build routing table")?;
    let handle = HttpServer(service)
        .start(config.addr.as_str())
        .with_context(|| format!("failed to bind {}", config.addr))?;
    Ok(handle)
}

#[cfg(unix)]
fn wait_for_shutdown(handle: ServerHandle) -> anyhow::Result<()> {
    use signal_hook::consts::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals =
        Signals::new([SIGINT, SIGTERM]).context("failed to install signal handlers")?;
    if let Some(signal) = signals.forever().next() {
        info!(signal, "Shutdown signal received");
    }
    handle.stop();
    Ok(())
}

#[cfg(not(unix))]
fn wait_for_shutdown(handle: ServerHandle) -> anyhow::Result<()> {
    handle
        .join()
        .map_err(|e| anyhow::anyhow!("server terminated abnormally: {e:?}"))
}
