//! Application configuration DTO and its TOML mapping.
//!
//! Pure data: missing keys fall back to the documented defaults, nothing is validated.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::ports::AccessState;

pub const DEFAULT_USB_TIMEOUT_MS: u64 = 1000;
pub const DEFAULT_BLUETOOTH_CONNECT_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_BLUETOOTH_STORAGE_DIR: &str = "/var/lib/bluetooth";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Override of the setup record location. `None` means `<data_dir>/setup_config.json`.
    pub config_file: Option<PathBuf>,
    pub printer: PrinterConfig,
    /// Override of the host permission gate. `None` means probe the host.
    pub peripheral_access: Option<AccessState>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrinterConfig {
    pub usb_timeout_ms: u64,
    pub bluetooth_connect_timeout_ms: u64,
    pub bluetooth_storage_dir: PathBuf,
    /// Hardware address of a bonded device -> RFCOMM character device bound to it.
    pub rfcomm_bindings: BTreeMap<String, PathBuf>,
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            usb_timeout_ms: DEFAULT_USB_TIMEOUT_MS,
            bluetooth_connect_timeout_ms: DEFAULT_BLUETOOTH_CONNECT_TIMEOUT_MS,
            bluetooth_storage_dir: PathBuf::from(DEFAULT_BLUETOOTH_STORAGE_DIR),
            rfcomm_bindings: BTreeMap::new(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_file: None,
            printer: PrinterConfig::default(),
            peripheral_access: None,
        }
    }
}

impl AppConfig {
    /// Create AppConfig from a TOML value.
    pub fn from_toml(toml_value: &toml::Value) -> anyhow::Result<Self> {
        let storage = toml_value.get("storage");
        let printer = toml_value.get("printer");
        let defaults = PrinterConfig::default();

        let rfcomm_bindings = printer
            .and_then(|p| p.get("rfcomm_bindings"))
            .and_then(|v| v.as_table())
            .map(|table| {
                table
                    .iter()
                    .filter_map(|(address, node)| {
                        node.as_str()
                            .map(|node| (address.to_uppercase(), PathBuf::from(node)))
                    })
                    .collect()
            })
            .unwrap_or_default();

        let peripheral_access = toml_value
            .get("peripheral")
            .and_then(|p| p.get("access"))
            .and_then(|v| v.as_str())
            .map(|value| match value {
                "granted" => Ok(AccessState::Granted),
                "denied" => Ok(AccessState::Denied),
                "ask" => Ok(AccessState::Unknown),
                other => Err(anyhow::anyhow!("unknown peripheral access value: {other}")),
            })
            .transpose()?;

        Ok(Self {
            config_file: storage
                .and_then(|s| s.get("config_file"))
                .and_then(|v| v.as_str())
                .map(PathBuf::from),
            printer: PrinterConfig {
                usb_timeout_ms: printer
                    .and_then(|p| p.get("usb_timeout_ms"))
                    .and_then(|v| v.as_integer())
                    .map(|v| v.max(0) as u64)
                    .unwrap_or(defaults.usb_timeout_ms),
                bluetooth_connect_timeout_ms: printer
                    .and_then(|p| p.get("bluetooth_connect_timeout_ms"))
                    .and_then(|v| v.as_integer())
                    .map(|v| v.max(0) as u64)
                    .unwrap_or(defaults.bluetooth_connect_timeout_ms),
                bluetooth_storage_dir: printer
                    .and_then(|p| p.get("bluetooth_storage_dir"))
                    .and_then(|v| v.as_str())
                    .map(PathBuf::from)
                    .unwrap_or(defaults.bluetooth_storage_dir),
                rfcomm_bindings,
            },
            peripheral_access,
        })
    }
}
