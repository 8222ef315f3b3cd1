use async_trait::async_trait;
use ps_core::ports::{StreamLink, TransportError};
use uuid::Uuid;

/// Major device class "Imaging" (printers, scanners, cameras).
pub const MAJOR_CLASS_IMAGING: u8 = 0x06;

/// A device already bonded with the host adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BondedDevice {
    pub address: String,
    pub name: Option<String>,
    /// Raw 24-bit class of device, when the host knows it.
    pub class_of_device: Option<u32>,
    /// Service identifiers advertised by the device, in advertised order.
    pub service_uuids: Vec<Uuid>,
}

impl BondedDevice {
    pub fn major_class(&self) -> Option<u8> {
        self.class_of_device.map(|class| ((class >> 8) & 0x1f) as u8)
    }
}

#[async_trait]
pub trait BluetoothHostPort: Send + Sync {
    /// Whether an adapter is present and usable.
    async fn is_enabled(&self) -> bool;

    async fn bonded_devices(&self) -> Result<Vec<BondedDevice>, TransportError>;

    /// Open a stream-oriented connection to `device` for `service`.
    async fn open_stream(
        &self,
        device: &BondedDevice,
        service: Uuid,
    ) -> Result<Box<dyn StreamLink>, TransportError>;
}
