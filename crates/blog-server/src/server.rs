// crates/blog-server/src/server.rs
// ============================================================================
// Module: Blog Server
// Description: Server lifecycle: store selection, binding, and shutdown.
// Purpose: Turn a validated configuration into a running HTTP service.
// Dependencies: axum, blog-config, blog-core, blog-store-sqlite, tokio
// ============================================================================

//! ## Overview
//! [`BlogServer`] validates configuration, opens the configured store, and
//! serves the router until the shutdown future resolves. The tag cleanup task
//! runs alongside the listener when enabled.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use blog_config::BlogConfig;
use blog_config::StoreType;
use blog_core::InMemoryBlogStore;
use blog_core::PostService;
use blog_core::PostStore;
use blog_core::SharedBlogStore;
use blog_store_sqlite::SqliteBlogStore;
use tokio::net::TcpListener;
use tracing::info;
use tracing::warn;

use crate::audit::RequestAuditSink;
use crate::audit::sink_from_config;
use crate::cleanup::spawn_tag_cleanup;
use crate::routes::AppState;
use crate::routes::build_router;

// ============================================================================
// SECTION: Blog Server
// ============================================================================

/// Blog HTTP server instance.
pub struct BlogServer {
    /// Validated configuration.
    config: BlogConfig,
    /// Backing store shared by all handlers.
    store: SharedBlogStore,
    /// Request audit sink.
    audit: Arc<dyn RequestAuditSink>,
}

impl BlogServer {
    /// Builds a server from configuration, opening the configured store.
    ///
    /// # Errors
    ///
    /// Returns [`BlogServerError`] when validation or initialization fails.
    pub fn from_config(config: BlogConfig) -> Result<Self, BlogServerError> {
        config.validate().map_err(|err| BlogServerError::Config(err.to_string()))?;
        let store = build_store(&config)?;
        Self::with_store(config, store)
    }

    /// Builds a server over an existing store.
    ///
    /// # Errors
    ///
    /// Returns [`BlogServerError`] when validation fails, the store is not
    /// ready, or the audit sink cannot be opened.
    pub fn with_store(config: BlogConfig, store: SharedBlogStore) -> Result<Self, BlogServerError> {
        config.validate().map_err(|err| BlogServerError::Config(err.to_string()))?;
        store.readiness().map_err(|err| BlogServerError::Init(err.to_string()))?;
        let audit = sink_from_config(&config.server.audit)
            .map_err(|err| BlogServerError::Init(format!("audit sink: {err}")))?;
        Ok(Self { config, store, audit })
    }

    /// Replaces the request audit sink.
    #[must_use]
    pub fn with_audit_sink(mut self, audit: Arc<dyn RequestAuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Returns the server configuration.
    #[must_use]
    pub const fn config(&self) -> &BlogConfig {
        &self.config
    }

    /// Builds the application router.
    ///
    /// # Errors
    ///
    /// Returns [`BlogServerError::Config`] when the CORS settings are unusable.
    pub fn router(&self) -> Result<Router, BlogServerError> {
        build_router(AppState::new(self.store.clone()), &self.config.server, Arc::clone(&self.audit))
            .map_err(|err| BlogServerError::Config(err.message().to_string()))
    }

    /// Binds the configured address and serves until Ctrl-C.
    ///
    /// # Errors
    ///
    /// Returns [`BlogServerError`] when binding or serving fails.
    pub async fn serve(self) -> Result<(), BlogServerError> {
        let addr = self
            .config
            .server
            .bind_addr()
            .map_err(|err| BlogServerError::Config(err.to_string()))?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|err| BlogServerError::Transport(format!("http bind failed: {err}")))?;
        self.serve_listener(listener, shutdown_signal()).await
    }

    /// Serves on an already bound listener until `shutdown` resolves.
    ///
    /// # Errors
    ///
    /// Returns [`BlogServerError`] when the router cannot be built or the
    /// server fails.
    pub async fn serve_listener<F>(
        self,
        listener: TcpListener,
        shutdown: F,
    ) -> Result<(), BlogServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.router()?;
        if let Ok(addr) = listener.local_addr() {
            info!(%addr, "blog server listening");
        }
        let cleanup = self.config.cleanup.enabled.then(|| {
            spawn_tag_cleanup(PostService::new(self.store.clone()), self.config.cleanup.interval())
        });
        let result = axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|err| BlogServerError::Transport(format!("http server failed: {err}")));
        if let Some(handle) = cleanup {
            handle.abort();
        }
        info!("blog server stopped");
        result
    }
}

/// Opens the store selected by configuration.
fn build_store(config: &BlogConfig) -> Result<SharedBlogStore, BlogServerError> {
    let store = match config.store.store_type {
        StoreType::Memory => {
            warn!("using in-memory store; data is lost on restart");
            SharedBlogStore::from_store(InMemoryBlogStore::new())
        }
        StoreType::Sqlite => {
            let sqlite_config = config
                .store
                .sqlite_config()
                .map_err(|err| BlogServerError::Config(err.to_string()))?;
            let store = SqliteBlogStore::new(sqlite_config)
                .map_err(|err| BlogServerError::Init(err.to_string()))?;
            let opened = store.config();
            info!(
                path = %opened.path.display(),
                journal_mode = opened.journal_mode.pragma_value(),
                sync_mode = opened.sync_mode.pragma_value(),
                busy_timeout_ms = opened.busy_timeout_ms,
                "opened sqlite store"
            );
            SharedBlogStore::from_store(store)
        }
    };
    Ok(store)
}

/// Resolves on Ctrl-C; never resolves when the signal cannot be installed.
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to install ctrl-c handler");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Blog server errors.
#[derive(Debug, thiserror::Error)]
pub enum BlogServerError {
    /// Configuration errors.
    #[error("config error: {0}")]
    Config(String),
    /// Initialization errors.
    #[error("init error: {0}")]
    Init(String),
    /// Transport errors.
    #[error("transport error: {0}")]
    Transport(String),
}

// ============================================================================
// SECTION: Tests
// ============================================================================
