//! # Dependency Injection
//!
//! The only place that depends on ps-infra, ps-platform and ps-app at once.
//! Assembly only: no business decisions, no configuration validation.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use ps_app::{
    DeviceDiscoveryService, GetSetupConfiguration, RequestPeripheralAccess, SetupOrchestrator,
    TestPrintUseCase,
};
use ps_core::app_dirs::AppDirs;
use ps_core::config::AppConfig;
use ps_core::ports::{
    ConfigStorePort, PasswordHasherPort, PeripheralAccessPort, PrinterTransportPort,
    SetupEventPort,
};
use ps_infra::{FileSetupConfigRepository, Sha256PasswordHasher, DEFAULT_SETUP_CONFIG_FILE};
use ps_platform::{BluetoothTransport, BluezHost, HostPeripheralAccess, NusbBus, UsbTransport};

use crate::adapters::ConsoleSetupEventPort;

/// Everything the commands need, wired against the host.
pub struct AppDeps {
    pub record_path: PathBuf,
    pub orchestrator: Arc<SetupOrchestrator>,
    pub discovery: Arc<DeviceDiscoveryService>,
    pub test_print: Arc<TestPrintUseCase>,
    pub get_configuration: GetSetupConfiguration,
    pub request_access: RequestPeripheralAccess,
}

struct Transports {
    wireless: Arc<dyn PrinterTransportPort>,
    wired: Arc<dyn PrinterTransportPort>,
}

pub fn record_path(config: &AppConfig, dirs: &AppDirs) -> PathBuf {
    config
        .config_file
        .clone()
        .unwrap_or_else(|| dirs.app_data_root.join(DEFAULT_SETUP_CONFIG_FILE))
}

fn create_platform_layer(
    config: &AppConfig,
    access: Arc<dyn PeripheralAccessPort>,
) -> Transports {
    let printer = &config.printer;

    let bluez = Arc::new(BluezHost::new(
        printer.bluetooth_storage_dir.clone(),
        printer.rfcomm_bindings.clone(),
    ));
    let wireless = Arc::new(BluetoothTransport::new(
        bluez,
        access,
        Duration::from_millis(printer.bluetooth_connect_timeout_ms),
    ));
    let wired = Arc::new(UsbTransport::new(
        Arc::new(NusbBus::new()),
        Duration::from_millis(printer.usb_timeout_ms),
    ));

    Transports { wireless, wired }
}

pub fn wire_dependencies(config: &AppConfig, dirs: &AppDirs) -> AppDeps {
    // Step 1: infrastructure
    let record_path = record_path(config, dirs);
    let config_store: Arc<dyn ConfigStorePort> =
        Arc::new(FileSetupConfigRepository::new(record_path.clone()));
    let password_hasher: Arc<dyn PasswordHasherPort> = Arc::new(Sha256PasswordHasher);

    // Step 2: platform
    let access: Arc<dyn PeripheralAccessPort> = Arc::new(HostPeripheralAccess::new(
        config.printer.bluetooth_storage_dir.clone(),
        config.peripheral_access,
    ));
    let transports = create_platform_layer(config, access.clone());
    let setup_events: Arc<dyn SetupEventPort> = Arc::new(ConsoleSetupEventPort);

    // Step 3: use cases
    let discovery = Arc::new(DeviceDiscoveryService::new(
        transports.wireless.clone(),
        transports.wired.clone(),
    ));
    let test_print = Arc::new(TestPrintUseCase::new(
        transports.wireless,
        transports.wired,
    ));
    let orchestrator = Arc::new(SetupOrchestrator::new(
        config_store.clone(),
        password_hasher,
        access.clone(),
        discovery.clone(),
        setup_events,
    ));

    AppDeps {
        record_path,
        orchestrator,
        discovery,
        test_print,
        get_configuration: GetSetupConfiguration::new(config_store),
        request_access: RequestPeripheralAccess::new(access),
    }
}
