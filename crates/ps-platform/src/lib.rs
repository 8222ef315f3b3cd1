//! Platform adapters: printer transports over the host Bluetooth stack and USB bus,
//! the peripheral access gate and application directories.

pub mod adapters;
pub mod app_dirs;
pub mod peripheral_access;
pub mod ports;

pub use adapters::bluetooth::{BluetoothTransport, BluezHost};
pub use adapters::usb::{NusbBus, UsbTransport};
pub use peripheral_access::HostPeripheralAccess;
