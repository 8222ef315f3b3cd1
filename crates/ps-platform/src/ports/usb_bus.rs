use async_trait::async_trait;
use ps_core::ports::{BulkLink, TransportError};

/// USB base class code for printers.
pub const USB_CLASS_PRINTER: u8 = 0x07;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsbInterfaceDescriptor {
    pub interface_number: u8,
    pub class: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsbDeviceDescriptor {
    pub bus_number: u8,
    pub device_address: u8,
    pub vendor_id: u16,
    pub product_id: u16,
    /// Declared device class.
    pub class: u8,
    pub product_name: Option<String>,
    pub interfaces: Vec<UsbInterfaceDescriptor>,
}

impl UsbDeviceDescriptor {
    pub fn is_printer(&self) -> bool {
        self.class == USB_CLASS_PRINTER
            || self
                .interfaces
                .iter()
                .any(|iface| iface.class == USB_CLASS_PRINTER)
    }

    pub fn first_printer_interface(&self) -> Option<&UsbInterfaceDescriptor> {
        self.interfaces
            .iter()
            .find(|iface| iface.class == USB_CLASS_PRINTER)
    }
}

/// An interface claimed on an opened device.
pub struct ClaimedInterface {
    pub link: Box<dyn BulkLink>,
    /// First bulk OUT endpoint of the interface, if it has one.
    pub bulk_out_endpoint: Option<u8>,
}

#[async_trait]
pub trait UsbBusPort: Send + Sync {
    async fn attached_devices(&self) -> Result<Vec<UsbDeviceDescriptor>, TransportError>;

    /// Whether access to the device was already granted by the host. Never prompts.
    async fn has_permission(&self, device: &UsbDeviceDescriptor) -> bool;

    /// Open the device and claim `interface_number`.
    async fn claim_interface(
        &self,
        device: &UsbDeviceDescriptor,
        interface_number: u8,
    ) -> Result<ClaimedInterface, TransportError>;
}
