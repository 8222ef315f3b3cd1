use std::fmt;

use serde::{Deserialize, Serialize};

/// Fallback label for a bonded wireless printer without a name.
pub const UNKNOWN_BLUETOOTH_PRINTER: &str = "Unknown BT Printer";

/// Fallback label for a wired printer without a product string.
pub const UNKNOWN_USB_PRINTER: &str = "Unknown USB Printer";

/// Transport a printer is reachable through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportKind {
    /// Short-range wireless (Bluetooth RFCOMM).
    Wireless,
    /// Wired bus (USB printer class).
    Wired,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportKind::Wireless => f.write_str("BLUETOOTH"),
            TransportKind::Wired => f.write_str("USB"),
        }
    }
}

/// A printer found during one discovery session.
///
/// `address` is only unique within a transport kind, so selection matching
/// must go through [`PrinterDevice::same_device`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrinterDevice {
    pub name: String,
    pub address: String,
    pub transport_kind: TransportKind,
}

impl PrinterDevice {
    pub fn wireless(name: Option<&str>, address: impl Into<String>) -> Self {
        Self {
            name: name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or(UNKNOWN_BLUETOOTH_PRINTER)
                .to_string(),
            address: address.into(),
            transport_kind: TransportKind::Wireless,
        }
    }

    pub fn wired(name: Option<&str>, vendor_id: u16, product_id: u16) -> Self {
        Self {
            name: name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or(UNKNOWN_USB_PRINTER)
                .to_string(),
            address: usb_address(vendor_id, product_id),
            transport_kind: TransportKind::Wired,
        }
    }

    /// Equality key for selection: address plus transport kind.
    pub fn same_device(&self, other: &PrinterDevice) -> bool {
        self.transport_kind == other.transport_kind && self.address == other.address
    }
}

/// Composite wired address, `vendorId:productId` in lowercase hex.
pub fn usb_address(vendor_id: u16, product_id: u16) -> String {
    format!("{vendor_id:04x}:{product_id:04x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_names_fall_back_to_placeholders() {
        let bt = PrinterDevice::wireless(None, "00:11:22:33:44:55");
        assert_eq!(bt.name, UNKNOWN_BLUETOOTH_PRINTER);

        let usb = PrinterDevice::wired(Some("  "), 0x04b8, 0x0202);
        assert_eq!(usb.name, UNKNOWN_USB_PRINTER);
        assert_eq!(usb.address, "04b8:0202");
    }

    #[test]
    fn same_address_on_different_transports_is_not_the_same_device() {
        let a = PrinterDevice {
            name: "A".into(),
            address: "04b8:0202".into(),
            transport_kind: TransportKind::Wireless,
        };
        let b = PrinterDevice {
            name: "A".into(),
            address: "04b8:0202".into(),
            transport_kind: TransportKind::Wired,
        };
        assert!(!a.same_device(&b));
        assert!(a.same_device(&a.clone()));
    }
}
