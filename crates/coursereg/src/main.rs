use std::sync::Arc;

use anyhow::Context;
use coursereg::catalog::{load_course_documents, CourseCatalog};
use coursereg::config::ServerConfig;
use coursereg::server::create_router;
use coursereg::types::AppState;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from_env()?;
    info!("Using course database at {}", config.db_path.display());

    let catalog = CourseCatalog::new(&config.db_path)
        .with_context(|| format!("failed to open {}", config.db_path.display()))?;

    if let Some(ref seed_file) = config.seed_file {
        if catalog.term_has_data(&config.term)? {
            info!("Term {} already has data, skipping seed file", config.term);
        } else {
            let courses = load_course_documents(seed_file)?;
            let count = catalog.import_courses(&config.term, &courses)?;
            info!("Imported {} courses into {}", count, config.term);
        }
    } else if !catalog.term_has_data(&config.term)? {
        warn!("Term {} has no courses; listings will be empty", config.term);
    }

    let state = Arc::new(AppState::new(catalog, config.term.clone()));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind((config.address.as_str(), config.port)).await?;
    info!("Listening on http://{}:{}", config.address, config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
}
