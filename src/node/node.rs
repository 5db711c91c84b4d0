//! Node orchestration: build the election manager and serve the API.

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};
use crate::election::ElectionManager;
use crate::node::config::NodeConfig;
use crate::node::service_handle::ServiceHandle;
use crate::rpc::{AppState, AuthConfig, RpcServer};

pub struct Node {
    cfg: NodeConfig,
    manager: Arc<ElectionManager>,
}

impl Node {
    pub fn new(cfg: NodeConfig) -> Self {
        let manager = Arc::new(ElectionManager::new(cfg.default_difficulty, cfg.max_difficulty));
        Self { cfg, manager }
    }

    pub fn manager(&self) -> Arc<ElectionManager> {
        self.manager.clone()
    }

    /// Spawn the API server and return a handle for graceful shutdown.
    pub async fn start(self) -> Result<ServiceHandle> {
        let (mut svc_handle, shutdown_rx) = ServiceHandle::new();

        let addr: SocketAddr = self
            .cfg
            .bind_addr
            .parse()
            .with_context(|| format!("invalid bind address {}", self.cfg.bind_addr))?;
        let auth = AuthConfig::from_secret(self.cfg.admin_token.as_deref());
        if !auth.enabled {
            info!("admin token not configured; admin routes are open");
        }
        let server = RpcServer::new(addr, AppState::new(self.manager.clone()), auth);

        let h: JoinHandle<anyhow::Result<()>> = tokio::spawn(async move {
            if let Err(e) = server.start(shutdown_rx).await {
                error!("API server failed: {:?}", e);
                return Err(e);
            }
            Ok(())
        });
        svc_handle.attach(h);

        info!(
            bind = %self.cfg.bind_addr,
            default_difficulty = self.cfg.default_difficulty,
            max_difficulty = self.cfg.max_difficulty,
            "node started"
        );
        Ok(svc_handle)
    }
}
