//! Port interfaces for the application layer
//!
//! Ports define the contract between the use cases and the infrastructure /
//! platform implementations, keeping the wizard rules independent of files,
//! radios and buses.

pub mod app_dirs;
pub mod config_store;
pub mod errors;
mod password_hasher;
pub mod peripheral_access;
pub mod printer_transport;
pub mod setup_event;

pub use app_dirs::AppDirsPort;
pub use config_store::{ConfigStoreError, ConfigStorePort};
pub use errors::AppDirsError;
pub use password_hasher::PasswordHasherPort;
pub use peripheral_access::{AccessState, PeripheralAccessPort};
pub use printer_transport::{
    BluetoothConnection, BulkLink, ConnectionHandle, Enumeration, PrinterTransportPort,
    StreamLink, TransportError, UsbConnection,
};
pub use setup_event::SetupEventPort;
