use clap::Parser;
use interview_api::cli::{run_cli, Cli};
use interview_api::logging::{init_logging, LogConfig};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging(&LogConfig::from_env())?;

    if let Err(err) = run_cli(cli) {
        tracing::error!(error = %format!("{err:#}"), "Startup failed");
        return Err(err);
    }
    Ok(())
}
