use std::sync::Arc;

use ps_core::ports::{Enumeration, PrinterTransportPort, TransportError};
use ps_core::{PrinterDevice, TransportKind};
use tracing::{info, info_span, warn, Instrument};

/// One discovery pass over both transports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrinterCatalog {
    /// Wireless printers first, then wired ones.
    pub devices: Vec<PrinterDevice>,
    /// A transport skipped enumeration because peripheral access is not granted.
    pub permission_missing: bool,
}

/// Aggregates the wireless and wired transports into one device list.
pub struct DeviceDiscoveryService {
    wireless: Arc<dyn PrinterTransportPort>,
    wired: Arc<dyn PrinterTransportPort>,
}

impl DeviceDiscoveryService {
    pub fn new(
        wireless: Arc<dyn PrinterTransportPort>,
        wired: Arc<dyn PrinterTransportPort>,
    ) -> Self {
        Self { wireless, wired }
    }

    pub async fn list_all_printers(&self) -> Vec<PrinterDevice> {
        self.discover().await.devices
    }

    /// Never fails: a transport that errors contributes nothing.
    pub async fn discover(&self) -> PrinterCatalog {
        let span = info_span!("usecase.device_discovery.discover");
        async {
            let (wireless, wired) = tokio::join!(self.wireless.enumerate(), self.wired.enumerate());
            let wireless = Self::degrade(TransportKind::Wireless, wireless);
            let wired = Self::degrade(TransportKind::Wired, wired);

            let catalog = PrinterCatalog {
                permission_missing: wireless.permission_missing || wired.permission_missing,
                devices: wireless.devices.into_iter().chain(wired.devices).collect(),
            };
            info!(
                count = catalog.devices.len(),
                permission_missing = catalog.permission_missing,
                "printer discovery finished"
            );
            catalog
        }
        .instrument(span)
        .await
    }

    fn degrade(kind: TransportKind, result: Result<Enumeration, TransportError>) -> Enumeration {
        match result {
            Ok(enumeration) => enumeration,
            Err(err) => {
                warn!(%kind, error = %err, "printer enumeration failed");
                Enumeration::default()
            }
        }
    }
}
