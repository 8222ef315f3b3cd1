pub mod config;
pub mod tracing;
pub mod wiring;

pub use config::resolve_config;
pub use wiring::{wire_dependencies, AppDeps};
