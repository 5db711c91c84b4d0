pub mod cli;
pub mod config;
pub mod node;
pub mod service_handle;

pub use cli::{run_cli, run_demo};
pub use config::NodeConfig;
pub use node::Node;
pub use service_handle::ServiceHandle;
