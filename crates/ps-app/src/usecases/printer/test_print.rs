use std::sync::Arc;

use ps_core::ports::{PrinterTransportPort, TransportError};
use ps_core::printer::test_page;
use ps_core::{PrinterDevice, TransportKind};
use tracing::{info, info_span, warn, Instrument};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestPrintOutcome {
    Printed,
    Failed(TransportError),
}

impl TestPrintOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TestPrintOutcome::Printed)
    }
}

/// Sends the fixed diagnostic page to a selected printer.
pub struct TestPrintUseCase {
    wireless: Arc<dyn PrinterTransportPort>,
    wired: Arc<dyn PrinterTransportPort>,
}

impl TestPrintUseCase {
    pub fn new(
        wireless: Arc<dyn PrinterTransportPort>,
        wired: Arc<dyn PrinterTransportPort>,
    ) -> Self {
        Self { wireless, wired }
    }

    fn transport_for(&self, kind: TransportKind) -> &dyn PrinterTransportPort {
        match kind {
            TransportKind::Wireless => self.wireless.as_ref(),
            TransportKind::Wired => self.wired.as_ref(),
        }
    }

    /// Failures are reported in the outcome. The handle is closed on every path.
    pub async fn send_test_page(&self, device: &PrinterDevice) -> TestPrintOutcome {
        let span = info_span!(
            "usecase.test_print.send_test_page",
            address = %device.address,
            kind = %device.transport_kind
        );
        async {
            let transport = self.transport_for(device.transport_kind);

            let mut handle = match transport.connect(&device.address).await {
                Ok(handle) => handle,
                Err(err) => {
                    warn!(error = %err, code = err.code(), "test print connect failed");
                    return TestPrintOutcome::Failed(err);
                }
            };

            let sent = transport.send(&mut handle, &test_page()).await;
            if let Err(err) = transport.close(handle).await {
                warn!(error = %err, "closing printer connection failed");
            }

            match sent {
                Ok(()) => {
                    info!("test page sent");
                    TestPrintOutcome::Printed
                }
                Err(err) => {
                    warn!(error = %err, code = err.code(), "test page send failed");
                    TestPrintOutcome::Failed(err)
                }
            }
        }
        .instrument(span)
        .await
    }
}
