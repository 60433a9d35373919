// crates/blog-server/tests/common/mod.rs
// =============================================================================
// Module: Server Test Harness
// Description: Spawn a blog server on an ephemeral loopback port.
// Purpose: Share server startup and audit capture across HTTP suites.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test harness setup fails loudly."
)]

use std::sync::Arc;
use std::sync::Mutex;

use blog_config::BlogConfig;
use blog_core::InMemoryBlogStore;
use blog_core::SharedBlogStore;
use blog_server::BlogServer;
use blog_server::RequestAuditEvent;
use blog_server::RequestAuditSink;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Audit sink that keeps events in memory.
#[derive(Default)]
pub struct CaptureSink {
    /// Recorded events.
    pub events: Mutex<Vec<RequestAuditEvent>>,
}

impl RequestAuditSink for CaptureSink {
    fn record(&self, event: &RequestAuditEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

/// Running server handle.
pub struct TestServer {
    /// Base URL such as `http://127.0.0.1:PORT`.
    pub base_url: String,
    /// Captured audit events.
    pub audit: Arc<CaptureSink>,
    /// HTTP client for requests.
    pub client: reqwest::Client,
    /// Shutdown trigger.
    shutdown: Option<oneshot::Sender<()>>,
    /// Server task.
    join: Option<JoinHandle<()>>,
}

impl TestServer {
    /// Returns an absolute URL for `path`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Stops the server and waits for it to exit.
    pub async fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(join) = self.join.take() {
            let _ = join.await;
        }
    }
}

/// Returns a config suited to tests: audit to memory, cleanup disabled.
pub fn test_config() -> BlogConfig {
    let mut config = BlogConfig::default();
    config.server.audit.enabled = false;
    config.cleanup.enabled = false;
    config
}

/// Spawns a server over a fresh in-memory store.
pub async fn spawn_server() -> TestServer {
    spawn_server_with(test_config(), SharedBlogStore::from_store(InMemoryBlogStore::new())).await
}

/// Spawns a server with the given config and store.
pub async fn spawn_server_with(config: BlogConfig, store: SharedBlogStore) -> TestServer {
    let audit = Arc::new(CaptureSink::default());
    let sink: Arc<dyn RequestAuditSink> = audit.clone();
    let server = BlogServer::with_store(config, store).expect("server").with_audit_sink(sink);
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let join = tokio::spawn(async move {
        let _ = server
            .serve_listener(listener, async move {
                let _ = shutdown_rx.await;
            })
            .await;
    });
    TestServer {
        base_url: format!("http://{addr}"),
        audit,
        client: reqwest::Client::new(),
        shutdown: Some(shutdown_tx),
        join: Some(join),
    }
}
