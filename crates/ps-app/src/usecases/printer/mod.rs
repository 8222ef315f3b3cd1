//! Printer use cases: discovery across transports and the diagnostic test page.

mod discovery;
mod test_print;

pub use discovery::{DeviceDiscoveryService, PrinterCatalog};
pub use test_print::{TestPrintOutcome, TestPrintUseCase};
