use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use songbook::config::{Cli, Config, default_config_dir, default_config_path};
use songbook::db::Database;
use songbook::enrichment::SongDetailClient;
use songbook::handler::{AppState, router};
use tokio::signal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let args = Cli::parse();

    // The directory holding the config file also holds the database file.
    let (config_path, data_dir) = match args.config_path {
        Some(path) => {
            let path = PathBuf::from(path);
            let dir = path
                .parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from("."));
            (path, dir)
        }
        None => (default_config_path(), default_config_dir()),
    };

    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        eprintln!("failed to create data directory {:?}: {}", data_dir, e);
        std::process::exit(1);
    }

    let dotenv = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    tracing::info!("songbook.svc starting");
    if let Ok(path) = dotenv {
        tracing::info!(path = ?path, "loaded environment file");
    }

    let cfg = Config::new(&config_path).unwrap_or_else(|e| {
        tracing::error!(error = %format!("{e:#}"), path = ?config_path, "failed to load config file");
        std::process::exit(1);
    });
    let db = Arc::new(Database::new(&cfg, &data_dir).await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to setup database");
        std::process::exit(1);
    }));
    tracing::info!("database connected successfully");

    let details = Arc::new(SongDetailClient::new(cfg.enrichment.url.clone()));
    tracing::info!(url = details.url(), "song detail client ready");

    let app = router(AppState { db, details });

    let address = format!("0.0.0.0:{}", cfg.app.get_port());
    let listener = tokio::net::TcpListener::bind(&address).await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to setup tcp listener");
        std::process::exit(1);
    });

    tracing::info!("songbook.svc running on {}", &address);
    let shutdown = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl+c");
            std::future::pending::<()>().await;
        }
        tracing::info!("ctrl+c signal received, preparing to shutdown");
    };

    if let Err(err) = axum::serve(listener, app).with_graceful_shutdown(shutdown).await {
        tracing::error!(error = %err, "server failed");
        std::process::exit(1);
    }

    tracing::info!("songbook.svc going off, graceful shutdown complete");
}
