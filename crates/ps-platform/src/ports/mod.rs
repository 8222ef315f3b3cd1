//! Platform-internal ports. The transports depend on these host capabilities
//! instead of calling the OS directly.

mod bluetooth_host;
mod usb_bus;

pub use bluetooth_host::{BluetoothHostPort, BondedDevice, MAJOR_CLASS_IMAGING};
pub use usb_bus::{
    ClaimedInterface, UsbBusPort, UsbDeviceDescriptor, UsbInterfaceDescriptor, USB_CLASS_PRINTER,
};
