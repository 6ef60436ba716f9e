/// Setlist Server - playlist, track and playback API
use clap::{Parser, Subcommand};
use setlist_server::{api, config::ServerConfig, state::AppState};
use setlist_storage::LocalStorageContext;
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "setlist-server")]
#[command(about = "Playlist, track and playback HTTP API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Configuration file path
        #[arg(short, long, env = "SETLIST_CONFIG")]
        config: Option<PathBuf>,
    },
    /// Apply database migrations and exit
    Migrate {
        /// Configuration file path
        #[arg(short, long, env = "SETLIST_CONFIG")]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "setlist_server=info,setlist_storage=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => {
            serve(load_config(config.as_deref())?).await?;
        }
        Commands::Migrate { config } => {
            migrate(load_config(config.as_deref())?).await?;
        }
    }

    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> anyhow::Result<ServerConfig> {
    let config = ServerConfig::load(path)?;
    config.validate()?;
    Ok(config)
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    tracing::info!("Starting Setlist Server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    // Initialize database
    let pool =
        setlist_storage::create_pool(&config.storage.database_url, config.storage.max_connections)
            .await?;
    setlist_storage::run_migrations(&pool).await?;

    let storage = LocalStorageContext::new(pool)
        .with_max_write_retries(config.storage.max_write_retries);
    tracing::info!("Database connected");

    let owner_policy = config.policy.owner_policy();
    if owner_policy.require_owner {
        tracing::info!("Owner required for new playlists and playback records");
    }

    // Build application state
    let app_state = AppState::new(Arc::new(storage), owner_policy);

    // Build router
    let app = api::router(app_state);

    // Create server address
    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn migrate(config: ServerConfig) -> anyhow::Result<()> {
    let pool = setlist_storage::create_pool(&config.storage.database_url, 1).await?;
    setlist_storage::run_migrations(&pool).await?;
    pool.close().await;

    println!("Migrations applied to {}", config.storage.database_url);
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => {
            // Without a signal handler, keep serving until the process is killed
            tracing::error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
