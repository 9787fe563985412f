mod error;
mod extractors;
mod handlers;
mod routes;
mod state;

pub use state::AppState;

use crate::catalog::CatalogClient;
use crate::storage::{BlobStore, LocalBlobStore};
use crate::{Config, Database};
use anyhow::Result;
use axum::Router;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub async fn serve(config: Config, db: Database, addr: &str) -> Result<()> {
    let blobs: Arc<dyn BlobStore> = Arc::new(LocalBlobStore::new(
        PathBuf::from(&config.media.upload_dir),
        config.media.public_url_prefix.clone(),
    ));

    let catalog = CatalogClient::new(&config.catalog);
    if !catalog.has_credentials() {
        tracing::warn!(
            "Catalog credentials not set; album, track and radio endpoints will return empty results"
        );
    }

    let max_upload_bytes = config.max_upload_bytes();
    let media_prefix = config.media.public_url_prefix.clone();

    let state = Arc::new(AppState::new(config, db, blobs, catalog));

    let mut app = Router::new().merge(routes::api_routes(max_upload_bytes));

    // The local blob root is only routable when the prefix is a path;
    // an absolute prefix means some other host serves the files.
    if media_prefix.starts_with('/') {
        app = app.nest_service(&media_prefix, ServeDir::new(&state.media_root));
    }

    let app = app
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
