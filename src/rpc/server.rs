use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;
use crate::rpc::auth::{require_hmac, AuthConfig};
use crate::rpc::handlers::{self, AppState};

/// Build the full HTTP surface. Admin routes sit behind the token middleware.
pub fn router(state: Arc<AppState>, auth: AuthConfig) -> Router {
    let admin = Router::new()
        .route("/create-election", post(handlers::create_election))
        .route("/switch-election", post(handlers::switch_election))
        .route("/register-voter", post(handlers::register_voter))
        .route("/register-candidate", post(handlers::register_candidate))
        .route("/start-election", post(handlers::start_election))
        .route("/end-election", post(handlers::end_election))
        .route("/mine-votes", post(handlers::mine_votes))
        .route("/create-sample-data", post(handlers::create_sample_data))
        .route_layer(middleware::from_fn_with_state(Arc::new(auth), require_hmac));

    let public = Router::new()
        .route("/list-elections", get(handlers::list_elections))
        .route("/cast-vote", post(handlers::cast_vote))
        .route("/check-status", post(handlers::check_status))
        .route("/verify-blockchain", get(handlers::verify_blockchain))
        .route("/blockchain-data", get(handlers::blockchain_data))
        .route("/stats", get(handlers::stats))
        .route("/results", get(handlers::results))
        .route("/candidates", get(handlers::candidates))
        .route("/verify-receipt", post(handlers::verify_receipt));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .nest("/api", admin.merge(public))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// RpcServer ties the router to a listening socket.
pub struct RpcServer {
    addr: SocketAddr,
    state: Arc<AppState>,
    auth: AuthConfig,
}

impl RpcServer {
    pub fn new(addr: SocketAddr, state: Arc<AppState>, auth: AuthConfig) -> Self {
        Self { addr, state, auth }
    }

    /// Serve until `shutdown` flips to true.
    pub async fn start(self, mut shutdown: watch::Receiver<bool>) -> anyhow::Result<()> {
        let app = router(self.state, self.auth);
        let listener = TcpListener::bind(self.addr).await?;
        info!("API server listening on {}", listener.local_addr()?);
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                while !*shutdown.borrow() {
                    if shutdown.changed().await.is_err() {
                        break;
                    }
                }
            })
            .await?;
        info!("API server stopped");
        Ok(())
    }
}
