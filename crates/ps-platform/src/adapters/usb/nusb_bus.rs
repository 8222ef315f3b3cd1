//! USB bus access through `nusb`.
//!
//! Enumeration and device opening are blocking system calls and run on the
//! blocking pool. Bulk transfers are awaited with a timeout; dropping the
//! transfer future on timeout cancels the transfer.

use std::time::Duration;

use async_trait::async_trait;
use nusb::transfer::{Direction, EndpointType};
use nusb::DeviceInfo;
use ps_core::ports::{BulkLink, TransportError};
use tracing::debug;

use crate::ports::{ClaimedInterface, UsbBusPort, UsbDeviceDescriptor, UsbInterfaceDescriptor};

#[derive(Debug, Default, Clone, Copy)]
pub struct NusbBus;

impl NusbBus {
    /// Bus handle; devices are listed fresh on every enumeration.
    pub fn new() -> Self {
        Self
    }
}

fn transport_error(context: &str, err: impl std::fmt::Display) -> TransportError {
    TransportError::Transport(format!("{context}: {err}"))
}

fn describe(info: &DeviceInfo) -> UsbDeviceDescriptor {
    UsbDeviceDescriptor {
        bus_number: info.bus_number(),
        device_address: info.device_address(),
        vendor_id: info.vendor_id(),
        product_id: info.product_id(),
        class: info.class(),
        product_name: info.product_string().map(str::to_string),
        interfaces: info
            .interfaces()
            .map(|iface| UsbInterfaceDescriptor {
                interface_number: iface.interface_number(),
                class: iface.class(),
            })
            .collect(),
    }
}

fn find_device(device: &UsbDeviceDescriptor) -> Result<DeviceInfo, TransportError> {
    nusb::list_devices()
        .map_err(|e| transport_error("usb enumeration failed", e))?
        .find(|info| {
            info.bus_number() == device.bus_number && info.device_address() == device.device_address
        })
        .ok_or_else(|| TransportError::DeviceNotFound {
            address: ps_core::printer::usb_address(device.vendor_id, device.product_id),
        })
}

fn claim_blocking(
    device: &UsbDeviceDescriptor,
    interface_number: u8,
) -> Result<ClaimedInterface, TransportError> {
    let info = find_device(device)?;
    let handle = info.open().map_err(|e| match e.kind() {
        std::io::ErrorKind::PermissionDenied => TransportError::Unavailable {
            reason: "usb device access not granted".to_string(),
        },
        _ => transport_error("opening usb device failed", e),
    })?;

    let bulk_out_endpoint = {
        let configuration = handle
            .active_configuration()
            .map_err(|e| transport_error("reading active configuration failed", e))?;
        configuration
            .interface_alt_settings()
            .filter(|alt| alt.interface_number() == interface_number)
            .flat_map(|alt| {
                alt.endpoints()
                    .filter(|ep| {
                        ep.direction() == Direction::Out
                            && ep.transfer_type() == EndpointType::Bulk
                    })
                    .map(|ep| ep.address())
                    .collect::<Vec<_>>()
            })
            .next()
    };

    let interface = handle
        .claim_interface(interface_number)
        .map_err(|e| TransportError::Unavailable {
            reason: format!("claiming interface {interface_number} failed: {e}"),
        })?;

    debug!(interface_number, ?bulk_out_endpoint, "usb interface claimed");
    Ok(ClaimedInterface {
        link: Box::new(NusbBulkLink {
            interface,
            _device: handle,
        }),
        bulk_out_endpoint,
    })
}

#[async_trait]
impl UsbBusPort for NusbBus {
    async fn attached_devices(&self) -> Result<Vec<UsbDeviceDescriptor>, TransportError> {
        tokio::task::spawn_blocking(|| {
            let devices = nusb::list_devices()
                .map_err(|e| transport_error("usb enumeration failed", e))?;
            Ok(devices.map(|info| describe(&info)).collect())
        })
        .await
        .map_err(|e| transport_error("usb enumeration task failed", e))?
    }

    async fn has_permission(&self, device: &UsbDeviceDescriptor) -> bool {
        #[cfg(target_os = "linux")]
        {
            let node = format!(
                "/dev/bus/usb/{:03}/{:03}",
                device.bus_number, device.device_address
            );
            tokio::fs::OpenOptions::new()
                .read(true)
                .write(true)
                .open(&node)
                .await
                .is_ok()
        }
        #[cfg(not(target_os = "linux"))]
        {
            let _ = device;
            true
        }
    }

    async fn claim_interface(
        &self,
        device: &UsbDeviceDescriptor,
        interface_number: u8,
    ) -> Result<ClaimedInterface, TransportError> {
        let device = device.clone();
        tokio::task::spawn_blocking(move || claim_blocking(&device, interface_number))
            .await
            .map_err(|e| transport_error("usb claim task failed", e))?
    }
}

struct NusbBulkLink {
    interface: nusb::Interface,
    _device: nusb::Device,
}

#[async_trait]
impl BulkLink for NusbBulkLink {
    async fn bulk_out(
        &mut self,
        endpoint: u8,
        bytes: Vec<u8>,
        timeout: Duration,
    ) -> Result<usize, TransportError> {
        let completion = tokio::time::timeout(timeout, self.interface.bulk_out(endpoint, bytes))
            .await
            .map_err(|_| TransportError::Timeout {
                millis: timeout.as_millis() as u64,
            })?;
        let response = completion
            .into_result()
            .map_err(|e| transport_error("bulk transfer failed", e))?;
        Ok(response.actual_length())
    }

    async fn release(self: Box<Self>) -> Result<(), TransportError> {
        // Dropping the interface releases it; dropping the device closes the handle.
        drop(self);
        Ok(())
    }
}
