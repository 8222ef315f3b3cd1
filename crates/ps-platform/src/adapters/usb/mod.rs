mod nusb_bus;
mod transport;

pub use nusb_bus::NusbBus;
pub use transport::UsbTransport;
