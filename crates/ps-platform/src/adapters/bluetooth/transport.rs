//! Wireless printer transport over bonded Bluetooth devices.
//!
//! Discovery only looks at devices already bonded with the host. A device is
//! treated as a printer when its major device class is Imaging or its name
//! contains "printer" (case-insensitive).

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ps_core::ports::{
    BluetoothConnection, ConnectionHandle, Enumeration, PeripheralAccessPort,
    PrinterTransportPort, TransportError,
};
use ps_core::{PrinterDevice, TransportKind};
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::ports::{BluetoothHostPort, BondedDevice, MAJOR_CLASS_IMAGING};

pub struct BluetoothTransport {
    host: Arc<dyn BluetoothHostPort>,
    access: Arc<dyn PeripheralAccessPort>,
    connect_timeout: Duration,
}

impl BluetoothTransport {
    /// Wireless transport over `host`, gated by `access`.
    ///
    /// `connect_timeout` bounds opening a connection and each write.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::BTreeMap;
    /// use std::sync::Arc;
    /// use std::time::Duration;
    /// use ps_platform::{BluetoothTransport, BluezHost, HostPeripheralAccess};
    ///
    /// let storage = "/var/lib/bluetooth";
    /// let transport = BluetoothTransport::new(
    ///     Arc::new(BluezHost::new(storage, BTreeMap::new())),
    ///     Arc::new(HostPeripheralAccess::new(storage, None)),
    ///     Duration::from_secs(5),
    /// );
    /// # drop(transport);
    /// ```
    pub fn new(
        host: Arc<dyn BluetoothHostPort>,
        access: Arc<dyn PeripheralAccessPort>,
        connect_timeout: Duration,
    ) -> Self {
        Self {
            host,
            access,
            connect_timeout,
        }
    }

    fn looks_like_printer(device: &BondedDevice) -> bool {
        device.major_class() == Some(MAJOR_CLASS_IMAGING)
            || device
                .name
                .as_deref()
                .is_some_and(|name| name.to_lowercase().contains("printer"))
    }

    fn timeout_error(&self) -> TransportError {
        TransportError::Timeout {
            millis: self.connect_timeout.as_millis() as u64,
        }
    }
}

#[async_trait]
impl PrinterTransportPort for BluetoothTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Wireless
    }

    async fn enumerate(&self) -> Result<Enumeration, TransportError> {
        if !self.access.access_state().await.is_granted() {
            info!("bluetooth access not granted, skipping wireless enumeration");
            return Ok(Enumeration::permission_missing());
        }

        if !self.host.is_enabled().await {
            debug!("no usable bluetooth adapter");
            return Ok(Enumeration::found(Vec::new()));
        }

        let devices = self
            .host
            .bonded_devices()
            .await?
            .into_iter()
            .filter(Self::looks_like_printer)
            .map(|device| PrinterDevice::wireless(device.name.as_deref(), device.address))
            .collect::<Vec<_>>();

        debug!(count = devices.len(), "bonded bluetooth printers");
        Ok(Enumeration::found(devices))
    }

    async fn connect(&self, address: &str) -> Result<ConnectionHandle, TransportError> {
        let span = info_span!("platform.bluetooth.connect", address = %address);
        async {
            if !self.access.access_state().await.is_granted() {
                return Err(TransportError::PermissionMissing);
            }

            let device = self
                .host
                .bonded_devices()
                .await?
                .into_iter()
                .find(|device| device.address.eq_ignore_ascii_case(address))
                .ok_or_else(|| TransportError::DeviceNotFound {
                    address: address.to_string(),
                })?;

            let service_uuid = match device.service_uuids.first() {
                Some(uuid) => *uuid,
                None => {
                    // Hosts with a single bound channel ignore the identifier.
                    let generated = Uuid::new_v4();
                    warn!(%generated, "device advertises no services, using a fresh identifier");
                    generated
                }
            };

            let stream = tokio::time::timeout(
                self.connect_timeout,
                self.host.open_stream(&device, service_uuid),
            )
            .await
            .map_err(|_| self.timeout_error())??;

            info!(%service_uuid, "bluetooth stream connected");
            Ok(ConnectionHandle::Bluetooth(BluetoothConnection {
                address: device.address,
                service_uuid,
                stream,
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
        let ConnectionHandle::Bluetooth(conn) = handle else {
            return Err(TransportError::Transport(
                "handle does not belong to the bluetooth transport".to_string(),
            ));
        };

        let write = async {
            conn.stream.write_all(bytes).await?;
            conn.stream.flush().await
        };
        tokio::time::timeout(self.connect_timeout, write)
            .await
            .map_err(|_| self.timeout_error())??;

        debug!(address = %conn.address, bytes = bytes.len(), "bluetooth payload written");
        Ok(())
    }

    async fn close(&self, handle: ConnectionHandle) -> Result<(), TransportError> {
        match handle {
            ConnectionHandle::Bluetooth(conn) => conn.stream.close().await,
            ConnectionHandle::Usb(_) => Err(TransportError::Transport(
                "handle does not belong to the bluetooth transport".to_string(),
            )),
        }
    }
}
