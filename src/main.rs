use clap::Parser;
use std::path::PathBuf;
use taskmock::FixtureServerBuilder;
use tracing_subscriber::EnvFilter;

/// Holds command line parameters provided by the user.
#[derive(Parser, Debug)]
#[command(
    name = "taskmock",
    version,
    about = "Mock task management API that serves canned JSON fixtures"
)]
pub struct CommandLineParameters {
    /// TCP port to listen on.
    #[arg(short, long, env = "TASKMOCK_PORT", default_value_t = 3000)]
    pub port: u16,
    /// Bind on all interfaces instead of loopback only.
    #[arg(short, long, env = "TASKMOCK_EXPOSE")]
    pub expose: bool,
    /// Directory containing the JSON fixture files.
    #[arg(short, long, env = "TASKMOCK_FIXTURE_DIR", default_value = "fixtures")]
    pub fixture_dir: PathBuf,
    /// Log every request at info level.
    #[arg(long)]
    pub print_access_log: bool,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("taskmock=info")),
        )
        .init();

    let params = CommandLineParameters::parse();

    tracing::info!(
        "Starting {} server V{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let server = match FixtureServerBuilder::new()
        .port(params.port)
        .expose(params.expose)
        .print_access_log(params.print_access_log)
        .fixture_dir(params.fixture_dir)
        .build()
    {
        Ok(server) => server,
        Err(err) => {
            tracing::error!("cannot start fixture server: {}", err);
            std::process::exit(1);
        }
    };

    if let Err(err) = server.start_with_signals(None, shutdown_signal()).await {
        tracing::error!("server terminated: {}", err);
        std::process::exit(1);
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("cannot listen for shutdown signal: {}", err);
    }
}
