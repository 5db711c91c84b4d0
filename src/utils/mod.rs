//! Utility module: errors, logging, metrics, and serde helpers.

pub mod errors;
pub mod metrics;
pub mod logging;
pub mod serde_helpers;

pub use errors::{ElectionError, Result};
pub use metrics::{MetricsRegistry, METRICS};
pub use logging::{init_logging, LogFormat};
