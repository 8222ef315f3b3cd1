#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use ps_app::{DeviceDiscoveryService, SetupOrchestrator};
use ps_core::ports::{
    AccessState, BluetoothConnection, BulkLink, ConfigStoreError, ConfigStorePort,
    ConnectionHandle, Enumeration, PasswordHasherPort, PeripheralAccessPort, PrinterTransportPort,
    SetupEventPort, StreamLink, TransportError, UsbConnection,
};
use ps_core::{PrinterDevice, SecretString, SetupConfiguration, TransportKind, WizardStep};
use uuid::Uuid;

pub const STRONG_PASSWORD: &str = "Abcdef1!";

/// Route use-case logs to the test harness output. Safe to call from every test.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

#[derive(Default)]
pub struct MemoryConfigStore {
    pub record: Mutex<Option<SetupConfiguration>>,
    pub saves: AtomicUsize,
    pub fail_saves: AtomicBool,
}

impl MemoryConfigStore {
    pub fn snapshot(&self) -> Option<SetupConfiguration> {
        self.record.lock().unwrap().clone()
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConfigStorePort for MemoryConfigStore {
    async fn load(&self) -> Result<Option<SetupConfiguration>, ConfigStoreError> {
        Ok(self.snapshot())
    }

    async fn save(&self, record: &SetupConfiguration) -> Result<(), ConfigStoreError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(ConfigStoreError::Persistence {
                path: "/readonly/setup_config.json".into(),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            });
        }
        self.saves.fetch_add(1, Ordering::SeqCst);
        *self.record.lock().unwrap() = Some(record.clone());
        Ok(())
    }
}

/// Deterministic stand-in for the real digest.
pub struct ReversingHasher;

impl PasswordHasherPort for ReversingHasher {
    fn hash_password(&self, password: &SecretString) -> anyhow::Result<String> {
        Ok(password.expose().chars().rev().collect())
    }
}

pub struct FixedAccess(pub Mutex<AccessState>);

impl FixedAccess {
    pub fn new(state: AccessState) -> Self {
        Self(Mutex::new(state))
    }

    pub fn set(&self, state: AccessState) {
        *self.0.lock().unwrap() = state;
    }
}

#[async_trait]
impl PeripheralAccessPort for FixedAccess {
    async fn access_state(&self) -> AccessState {
        *self.0.lock().unwrap()
    }

    async fn request_access(&self) {}
}

#[derive(Default)]
pub struct RecordingEvents {
    pub steps: Mutex<Vec<WizardStep>>,
    pub completed: Mutex<Vec<SetupConfiguration>>,
}

#[async_trait]
impl SetupEventPort for RecordingEvents {
    async fn emit_step_changed(&self, step: WizardStep) {
        self.steps.lock().unwrap().push(step);
    }

    async fn emit_setup_completed(&self, record: &SetupConfiguration) {
        self.completed.lock().unwrap().push(record.clone());
    }
}

/// Calls observed by a [`FakeTransport`], in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Enumerate,
    Connect(String),
    Send(Vec<u8>),
    Close,
}

pub struct FakeTransport {
    kind: TransportKind,
    devices: Vec<PrinterDevice>,
    pub enumerate_delay: Duration,
    pub enumerate_error: Option<TransportError>,
    pub permission_missing: bool,
    pub connect_error: Option<TransportError>,
    pub send_error: Option<TransportError>,
    pub calls: Arc<Mutex<Vec<Call>>>,
}

impl FakeTransport {
    pub fn new(kind: TransportKind, devices: Vec<PrinterDevice>) -> Self {
        Self {
            kind,
            devices,
            enumerate_delay: Duration::ZERO,
            enumerate_error: None,
            permission_missing: false,
            connect_error: None,
            send_error: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

struct NullStream;

#[async_trait]
impl StreamLink for NullStream {
    async fn write_all(&mut self, _bytes: &[u8]) -> Result<(), TransportError> {
        Ok(())
    }
    async fn flush(&mut self) -> Result<(), TransportError> {
        Ok(())
    }
    async fn close(self: Box<Self>) -> Result<(), TransportError> {
        Ok(())
    }
}

struct NullLink;

#[async_trait]
impl BulkLink for NullLink {
    async fn bulk_out(
        &mut self,
        _endpoint: u8,
        bytes: Vec<u8>,
        _timeout: Duration,
    ) -> Result<usize, TransportError> {
        Ok(bytes.len())
    }
    async fn release(self: Box<Self>) -> Result<(), TransportError> {
        Ok(())
    }
}

#[async_trait]
impl PrinterTransportPort for FakeTransport {
    fn kind(&self) -> TransportKind {
        self.kind
    }

    async fn enumerate(&self) -> Result<Enumeration, TransportError> {
        self.calls.lock().unwrap().push(Call::Enumerate);
        if !self.enumerate_delay.is_zero() {
            tokio::time::sleep(self.enumerate_delay).await;
        }
        if let Some(err) = &self.enumerate_error {
            return Err(err.clone());
        }
        if self.permission_missing {
            return Ok(Enumeration::permission_missing());
        }
        Ok(Enumeration::found(self.devices.clone()))
    }

    async fn connect(&self, address: &str) -> Result<ConnectionHandle, TransportError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Connect(address.to_string()));
        if let Some(err) = &self.connect_error {
            return Err(err.clone());
        }
        Ok(match self.kind {
            TransportKind::Wireless => ConnectionHandle::Bluetooth(BluetoothConnection {
                address: address.to_string(),
                service_uuid: Uuid::nil(),
                stream: Box::new(NullStream),
            }),
            TransportKind::Wired => ConnectionHandle::Usb(UsbConnection {
                address: address.to_string(),
                interface_number: 0,
                endpoint_address: 0x01,
                link: Box::new(NullLink),
            }),
        })
    }

    async fn send(
        &self,
        _handle: &mut ConnectionHandle,
        bytes: &[u8],
    ) -> Result<(), TransportError> {
        self.calls.lock().unwrap().push(Call::Send(bytes.to_vec()));
        match &self.send_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    async fn close(&self, _handle: ConnectionHandle) -> Result<(), TransportError> {
        self.calls.lock().unwrap().push(Call::Close);
        Ok(())
    }
}

pub fn bt_printer(name: &str, address: &str) -> PrinterDevice {
    PrinterDevice::wireless(Some(name), address)
}

pub fn usb_printer(name: &str, vendor_id: u16, product_id: u16) -> PrinterDevice {
    PrinterDevice::wired(Some(name), vendor_id, product_id)
}

pub struct Harness {
    pub orchestrator: SetupOrchestrator,
    pub store: Arc<MemoryConfigStore>,
    pub access: Arc<FixedAccess>,
    pub events: Arc<RecordingEvents>,
}

pub fn harness_with(
    store: Arc<dyn ConfigStorePort>,
    hasher: Arc<dyn PasswordHasherPort>,
    wireless: Vec<PrinterDevice>,
    wired: Vec<PrinterDevice>,
) -> (SetupOrchestrator, Arc<FixedAccess>, Arc<RecordingEvents>) {
    let access = Arc::new(FixedAccess::new(AccessState::Granted));
    let events = Arc::new(RecordingEvents::default());
    let discovery = Arc::new(DeviceDiscoveryService::new(
        Arc::new(FakeTransport::new(TransportKind::Wireless, wireless)),
        Arc::new(FakeTransport::new(TransportKind::Wired, wired)),
    ));
    let orchestrator =
        SetupOrchestrator::new(store, hasher, access.clone(), discovery, events.clone());
    (orchestrator, access, events)
}

pub fn harness() -> Harness {
    let store = Arc::new(MemoryConfigStore::default());
    let (orchestrator, access, events) = harness_with(
        store.clone(),
        Arc::new(ReversingHasher),
        vec![bt_printer("TM-m30", "AA:BB:CC:DD:EE:01")],
        vec![usb_printer("TM-T20", 0x04b8, 0x0e15)],
    );
    Harness {
        orchestrator,
        store,
        access,
        events,
    }
}

/// Drive the flow up to (not including) `target`.
pub async fn advance_to(orchestrator: &SetupOrchestrator, target: WizardStep) {
    for step in WizardStep::ORDER {
        if step == target {
            return;
        }
        match step {
            WizardStep::LanguageSelect => {
                orchestrator.select_language("fr".into()).await.unwrap();
            }
            WizardStep::AdminSetup => {
                orchestrator
                    .submit_admin("Amina".into(), STRONG_PASSWORD.into(), STRONG_PASSWORD.into())
                    .await
                    .unwrap();
            }
            WizardStep::StoreInfo => {
                orchestrator
                    .submit_store_info("Acme".into(), "Boulangerie".into())
                    .await
                    .unwrap();
            }
            WizardStep::LogoUpload => {
                orchestrator
                    .submit_logo(Some("file:///srv/logo.png".into()))
                    .await
                    .unwrap();
            }
            WizardStep::PrinterSelect | WizardStep::Complete => return,
        }
    }
}
