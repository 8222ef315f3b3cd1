//! Wired printer transport over the USB bus.
//!
//! A device is a printer when its declared class or any of its interfaces is
//! the printer class. Addresses are `vendorId:productId`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ps_core::ports::{
    ConnectionHandle, Enumeration, PrinterTransportPort, TransportError, UsbConnection,
};
use ps_core::printer::usb_address;
use ps_core::{PrinterDevice, TransportKind};
use tracing::{debug, info, info_span, warn, Instrument};

use crate::ports::UsbBusPort;

pub struct UsbTransport {
    bus: Arc<dyn UsbBusPort>,
    transfer_timeout: Duration,
}

impl UsbTransport {
    /// Wired transport over `bus`; `transfer_timeout` bounds each bulk write.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use std::time::Duration;
    /// use ps_platform::{NusbBus, UsbTransport};
    ///
    /// let transport = UsbTransport::new(Arc::new(NusbBus::new()), Duration::from_secs(5));
    /// # drop(transport);
    /// ```
    pub fn new(bus: Arc<dyn UsbBusPort>, transfer_timeout: Duration) -> Self {
        Self {
            bus,
            transfer_timeout,
        }
    }

    fn unavailable(reason: impl Into<String>) -> TransportError {
        TransportError::Unavailable {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl PrinterTransportPort for UsbTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Wired
    }

    async fn enumerate(&self) -> Result<Enumeration, TransportError> {
        let devices = self
            .bus
            .attached_devices()
            .await?
            .into_iter()
            .filter(|device| device.is_printer())
            .map(|device| {
                PrinterDevice::wired(
                    device.product_name.as_deref(),
                    device.vendor_id,
                    device.product_id,
                )
            })
            .collect::<Vec<_>>();

        debug!(count = devices.len(), "attached usb printers");
        Ok(Enumeration::found(devices))
    }

    async fn connect(&self, address: &str) -> Result<ConnectionHandle, TransportError> {
        let span = info_span!("platform.usb.connect", address = %address);
        async {
            let device = self
                .bus
                .attached_devices()
                .await?
                .into_iter()
                .find(|device| {
                    usb_address(device.vendor_id, device.product_id).eq_ignore_ascii_case(address)
                })
                .ok_or_else(|| TransportError::DeviceNotFound {
                    address: address.to_string(),
                })?;

            if !self.bus.has_permission(&device).await {
                return Err(Self::unavailable("usb device access not granted"));
            }

            let interface_number = device
                .first_printer_interface()
                .map(|iface| iface.interface_number)
                .ok_or_else(|| Self::unavailable("device exposes no printer-class interface"))?;

            let claimed = self.bus.claim_interface(&device, interface_number).await?;
            let Some(endpoint_address) = claimed.bulk_out_endpoint else {
                if let Err(e) = claimed.link.release().await {
                    warn!(error = %e, "releasing interface without bulk out endpoint failed");
                }
                return Err(Self::unavailable("printer interface has no bulk out endpoint"));
            };

            info!(interface_number, endpoint_address, "usb printer interface claimed");
            Ok(ConnectionHandle::Usb(UsbConnection {
                address: usb_address(device.vendor_id, device.product_id),
                interface_number,
                endpoint_address,
                link: claimed.link,
            }))
        }
        .instrument(span)
        .await
    }

    async fn send(
        &self,
        handle: &mut ConnectionHandle,
        bytes: &[u8],
    ) -> Result<(), TransportError> {
        let ConnectionHandle::Usb(conn) = handle else {
            return Err(TransportError::Transport(
                "handle does not belong to the usb transport".to_string(),
            ));
        };

        let written = conn
            .link
            .bulk_out(conn.endpoint_address, bytes.to_vec(), self.transfer_timeout)
            .await?;
        if written < bytes.len() {
            return Err(TransportError::Transport(format!(
                "short bulk transfer: {written} of {} bytes",
                bytes.len()
            )));
        }

        debug!(address = %conn.address, bytes = written, "usb payload written");
        Ok(())
    }

    async fn close(&self, handle: ConnectionHandle) -> Result<(), TransportError> {
        match handle {
            ConnectionHandle::Usb(conn) => conn.link.release().await,
            ConnectionHandle::Bluetooth(_) => Err(TransportError::Transport(
                "handle does not belong to the usb transport".to_string(),
            )),
        }
    }
}
