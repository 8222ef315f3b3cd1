//! # ps-app
//!
//! Application use cases for the POS setup wizard. Orchestrates the pure
//! wizard rules from `ps-core` against the ports implemented by the
//! infrastructure and platform crates.

pub mod usecases;

pub use usecases::printer::{
    DeviceDiscoveryService, PrinterCatalog, TestPrintOutcome, TestPrintUseCase,
};
pub use usecases::setup::{SetupContext, SetupOrchestrator};
pub use usecases::{GetSetupConfiguration, RequestPeripheralAccess};
