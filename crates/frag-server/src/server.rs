use std::sync::Arc;

use frag_index::PgDocumentIndex;
use frag_pipeline::ChunkVault;
use frag_store::ObjectChunkStore;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;
use crate::state::AppState;

/// The frag HTTP service.
pub struct FragServer {
    config: ServerConfig,
}

impl FragServer {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Connect both backends, apply the schema migration, and assemble the
    /// handler state.
    pub async fn connect(&self) -> ServerResult<AppState> {
        self.config.validate()?;

        let chunks = ObjectChunkStore::s3(&self.config.blob)?;
        let index = PgDocumentIndex::connect(&self.config.index).await?;
        index.migrate().await?;
        info!(
            bucket = %self.config.blob.bucket,
            endpoint = %self.config.blob.endpoint,
            dsn = %frag_index::config::redact_dsn(&self.config.index.dsn),
            "backends connected"
        );

        let vault = ChunkVault::new(Arc::new(chunks), Arc::new(index))
            .with_config(self.config.pipeline.clone());
        Ok(AppState::new(vault, self.config.limits.clone()))
    }

    /// Apply the schema migration and exit.
    pub async fn migrate(&self) -> ServerResult<()> {
        self.config
            .index
            .validate()
            .map_err(|e| ServerError::Config(e.to_string()))?;
        let index = PgDocumentIndex::connect(&self.config.index).await?;
        index.migrate().await?;
        index.close().await;
        info!("schema migration applied");
        Ok(())
    }

    /// Connect and serve until ctrl-c.
    pub async fn serve(self) -> ServerResult<()> {
        let state = self.connect().await?;
        self.serve_with(state).await
    }

    /// Serve prepared state until ctrl-c.
    pub async fn serve_with(self, state: AppState) -> ServerResult<()> {
        let app = build_router(state);
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        info!(addr = %self.config.bind_addr, "frag server listening");
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))?;
        info!("frag server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_construction() {
        let server = FragServer::new(ServerConfig::default());
        assert_eq!(server.config().bind_addr.port(), 8080);
    }

    #[tokio::test]
    async fn connect_rejects_incomplete_config() {
        let server = FragServer::new(ServerConfig::default());
        let err = server.connect().await.unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }

    #[tokio::test]
    async fn migrate_requires_dsn() {
        let server = FragServer::new(ServerConfig::default());
        assert!(matches!(server.migrate().await, Err(ServerError::Config(_))));
    }
}
