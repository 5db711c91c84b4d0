//! RPC module
//!
//! - JSON API under /api (election admin, voter and ledger routes)
//! - Diagnostic endpoints: /health, /metrics
//! - HMAC admin-token middleware (enabled when a secret is configured)

pub mod auth;
pub mod handlers;
pub mod server;
pub mod types;

pub use auth::AuthConfig;
pub use handlers::AppState;
pub use server::{router, RpcServer};
