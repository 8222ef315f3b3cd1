//! Printer transport port
//!
//! One implementation per transport kind. A connection is a closed variant
//! carrying the transport-specific link; only two kinds exist.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::printer::{PrinterDevice, TransportKind};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("peripheral access permission missing")]
    PermissionMissing,

    #[error("device {address} not found")]
    DeviceNotFound { address: String },

    #[error("device unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("operation timed out after {millis} ms")]
    Timeout { millis: u64 },

    #[error("transport failure: {0}")]
    Transport(String),
}

impl TransportError {
    pub fn code(&self) -> &'static str {
        match self {
            TransportError::PermissionMissing => "peripheral_permission_missing",
            TransportError::DeviceNotFound { .. } => "printer_not_found",
            TransportError::Unavailable { .. } => "printer_unavailable",
            TransportError::Timeout { .. } => "printer_timeout",
            TransportError::Transport(_) => "transport_failure",
        }
    }
}

/// Result of one enumeration pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enumeration {
    pub devices: Vec<PrinterDevice>,
    /// Set when the transport could not look because access was not granted.
    pub permission_missing: bool,
}

impl Enumeration {
    pub fn found(devices: Vec<PrinterDevice>) -> Self {
        Self {
            devices,
            permission_missing: false,
        }
    }

    pub fn permission_missing() -> Self {
        Self {
            devices: Vec::new(),
            permission_missing: true,
        }
    }
}

/// Byte stream to a wireless printer.
#[async_trait]
pub trait StreamLink: Send {
    async fn write_all(&mut self, bytes: &[u8]) -> Result<(), TransportError>;
    async fn flush(&mut self) -> Result<(), TransportError>;
    async fn close(self: Box<Self>) -> Result<(), TransportError>;
}

/// Claimed interface of a wired printer.
#[async_trait]
pub trait BulkLink: Send {
    /// Bulk OUT transfer of `bytes`, bounded by `timeout`. Returns bytes written.
    async fn bulk_out(
        &mut self,
        endpoint: u8,
        bytes: Vec<u8>,
        timeout: Duration,
    ) -> Result<usize, TransportError>;

    /// Release the claimed interface and close the device handle.
    async fn release(self: Box<Self>) -> Result<(), TransportError>;
}

pub struct BluetoothConnection {
    pub address: String,
    pub service_uuid: Uuid,
    pub stream: Box<dyn StreamLink>,
}

pub struct UsbConnection {
    pub address: String,
    pub interface_number: u8,
    pub endpoint_address: u8,
    pub link: Box<dyn BulkLink>,
}

/// Open connection to one printer.
pub enum ConnectionHandle {
    Bluetooth(BluetoothConnection),
    Usb(UsbConnection),
}

impl ConnectionHandle {
    pub fn kind(&self) -> TransportKind {
        match self {
            ConnectionHandle::Bluetooth(_) => TransportKind::Wireless,
            ConnectionHandle::Usb(_) => TransportKind::Wired,
        }
    }

    pub fn address(&self) -> &str {
        match self {
            ConnectionHandle::Bluetooth(conn) => &conn.address,
            ConnectionHandle::Usb(conn) => &conn.address,
        }
    }
}

impl fmt::Debug for ConnectionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionHandle::Bluetooth(conn) => f
                .debug_struct("Bluetooth")
                .field("address", &conn.address)
                .field("service_uuid", &conn.service_uuid)
                .finish_non_exhaustive(),
            ConnectionHandle::Usb(conn) => f
                .debug_struct("Usb")
                .field("address", &conn.address)
                .field("interface_number", &conn.interface_number)
                .field("endpoint_address", &conn.endpoint_address)
                .finish_non_exhaustive(),
        }
    }
}

/// Capability set `{enumerate, connect, send, close}` of one transport.
///
/// Callers that `connect` successfully must `close` the handle on every exit
/// path, including after a failed `send`.
#[async_trait]
pub trait PrinterTransportPort: Send + Sync {
    fn kind(&self) -> TransportKind;

    async fn enumerate(&self) -> Result<Enumeration, TransportError>;

    async fn connect(&self, address: &str) -> Result<ConnectionHandle, TransportError>;

    async fn send(&self, handle: &mut ConnectionHandle, bytes: &[u8])
        -> Result<(), TransportError>;

    async fn close(&self, handle: ConnectionHandle) -> Result<(), TransportError>;
}
