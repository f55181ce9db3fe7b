use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::exit;
use tracing::error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracker_backend::store::SqliteStore;
use tracker_backend::{router, Config, Service};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[arg(long)]
    config_path: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API (default)
    Run,
    /// Create the database tables and exit
    InitDb,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "{}=debug,tracker_backend=debug,tower_http=debug",
                    env!("CARGO_CRATE_NAME")
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = start(cli).await {
        error!("Error: {:#}", e);
        exit(1);
    }
}

async fn start(cli: Cli) -> anyhow::Result<()> {
    let config =
        Config::parse(cli.config_path.as_deref()).context("failed to load configuration")?;

    let store = SqliteStore::connect(&config.database)
        .await
        .context("could not connect to the database")?;
    store
        .create_schema()
        .await
        .context("failed to create tables")?;

    let result = match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(&config, store.clone()).await,
        Commands::InitDb => {
            tracing::info!("tables created");
            Ok(())
        }
    };

    store.close().await;
    result
}

async fn run_server(config: &Config, store: SqliteStore) -> anyhow::Result<()> {
    let addr = config.socket_addr()?;
    let app = router(Service::new(store), &config.cors_hosts);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("server failed to bind {addr}"))?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server stopped unexpectedly")
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
