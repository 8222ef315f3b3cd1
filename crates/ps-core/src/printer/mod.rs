//! Printer domain types.

mod device;
mod payload;

pub use device::{
    usb_address, PrinterDevice, TransportKind, UNKNOWN_BLUETOOTH_PRINTER, UNKNOWN_USB_PRINTER,
};
pub use payload::{test_page, TEST_PAGE_TEXT};
