//! Setup use cases.
//!
//! This module exposes the wizard orchestrator and its shared context.

mod context;
pub mod orchestrator;

pub use context::{FlowState, SetupContext};
pub use orchestrator::SetupOrchestrator;
