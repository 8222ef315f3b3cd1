//! # ps-core
//!
//! Core domain models and business rules for the POS setup wizard.
//!
//! This crate contains pure business logic without any infrastructure dependencies:
//! the persisted setup record, printer device descriptions, input validation,
//! the wizard transition function and the ports implemented by outer layers.

pub mod app_dirs;
pub mod config;
pub mod locale;
pub mod ports;
pub mod printer;
pub mod secret;
pub mod setup;
pub mod validation;

// Re-export commonly used types at the crate root
pub use config::AppConfig;
pub use printer::{PrinterDevice, TransportKind};
pub use secret::SecretString;
pub use setup::{SetupConfiguration, SetupError, WizardStep};
