use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catalog_core::CatalogStore;
use catalog_core::database::postgres::PostgresDatabase;
use catalog_server::{AppState, Config, create_router};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "catalog-server")]
#[command(about = "Catalog microservice with an asynchronous publish workflow")]
struct Cli {
    /// Server port (overrides config)
    #[arg(short, long, env = "SERVER_PORT")]
    port: Option<u16>,

    /// Server host (overrides config)
    #[arg(long, env = "SERVER_HOST")]
    host: Option<String>,

    /// Run against an in-memory store instead of PostgreSQL
    #[arg(long, env = "CATALOG_MEMORY_STORE", default_value_t = false)]
    memory: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = Config::from_env();
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    let store = if cli.memory {
        info!("Using in-memory catalog store");
        CatalogStore::memory()
    } else {
        let database_url = config.database.url();
        let database = PostgresDatabase::connect(&database_url)
            .await
            .context("failed to connect to PostgreSQL")?;
        database
            .initialize_schema()
            .await
            .context("failed to apply database migrations")?;
        info!("Database schema is up to date");
        CatalogStore::postgres(database.pool().clone())
    };

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(store, config);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Catalog server listening on {addr}");
    axum::serve(listener, app)
        .await
        .context("server terminated unexpectedly")?;

    Ok(())
}
