pub mod bluetooth;
pub mod usb;
