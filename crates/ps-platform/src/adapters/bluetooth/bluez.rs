//! BlueZ host adapter (Linux).
//!
//! Bonded devices are read from the BlueZ storage tree
//! `<storage>/<adapter>/<device>/info`. A device counts as bonded when its
//! `info` file carries a link key. Streams go through RFCOMM character devices
//! bound out of band (`rfcomm bind`), configured per device address.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use ps_core::ports::{StreamLink, TransportError};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::ports::{BluetoothHostPort, BondedDevice};

pub struct BluezHost {
    storage_dir: PathBuf,
    rfcomm_bindings: BTreeMap<String, PathBuf>,
}

impl BluezHost {
    /// Host adapter reading paired devices from the BlueZ storage directory.
    ///
    /// # Arguments
    ///
    /// * `storage_dir` - BlueZ storage root, usually `/var/lib/bluetooth`
    /// * `rfcomm_bindings` - Serial device bound to each printer; keys are
    ///   device addresses in upper case
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::BTreeMap;
    /// use std::path::PathBuf;
    /// use ps_platform::BluezHost;
    ///
    /// let bindings = BTreeMap::from([(
    ///     "AA:BB:CC:DD:EE:01".to_string(),
    ///     PathBuf::from("/dev/rfcomm0"),
    /// )]);
    /// let host = BluezHost::new("/var/lib/bluetooth", bindings);
    /// # drop(host);
    /// ```
    pub fn new(
        storage_dir: impl Into<PathBuf>,
        rfcomm_bindings: BTreeMap<String, PathBuf>,
    ) -> Self {
        Self {
            storage_dir: storage_dir.into(),
            rfcomm_bindings,
        }
    }

    fn io_error(path: &Path, err: std::io::Error) -> TransportError {
        match err.kind() {
            ErrorKind::PermissionDenied => TransportError::PermissionMissing,
            _ => TransportError::Transport(format!("{}: {err}", path.display())),
        }
    }

    fn scan(storage_dir: &Path) -> Result<Vec<BondedDevice>, TransportError> {
        let mut devices = Vec::new();
        for adapter in read_address_dirs(storage_dir)? {
            for device_dir in read_address_dirs(&adapter)? {
                let info_path = device_dir.join("info");
                let content = match std::fs::read_to_string(&info_path) {
                    Ok(content) => content,
                    Err(e) if e.kind() == ErrorKind::NotFound => continue,
                    Err(e) => return Err(Self::io_error(&info_path, e)),
                };
                let Some(address) = dir_name(&device_dir) else {
                    continue;
                };
                if let Some(device) = parse_info(&address, &content) {
                    devices.push(device);
                }
            }
        }
        devices.sort_by(|a, b| a.address.cmp(&b.address));
        devices.dedup_by(|a, b| a.address == b.address);
        Ok(devices)
    }
}

fn dir_name(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
}

fn is_hardware_address(name: &str) -> bool {
    let parts: Vec<&str> = name.split(':').collect();
    parts.len() == 6
        && parts
            .iter()
            .all(|p| p.len() == 2 && p.chars().all(|c| c.is_ascii_hexdigit()))
}

fn read_address_dirs(dir: &Path) -> Result<Vec<PathBuf>, TransportError> {
    let entries = std::fs::read_dir(dir).map_err(|e| BluezHost::io_error(dir, e))?;
    let mut dirs = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .filter(|path| dir_name(path).is_some_and(|name| is_hardware_address(&name)))
        .collect::<Vec<_>>();
    dirs.sort();
    Ok(dirs)
}

/// Parse a BlueZ `info` file. Returns `None` for devices that are not bonded.
fn parse_info(address: &str, content: &str) -> Option<BondedDevice> {
    let mut section = "";
    let mut bonded = false;
    let mut name = None;
    let mut class_of_device = None;
    let mut service_uuids = Vec::new();

    for line in content.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(header) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            section = header;
            if matches!(section, "LinkKey" | "LongTermKey") {
                bonded = true;
            }
            continue;
        }
        if section != "General" {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        match key.trim() {
            "Name" => name = Some(value.trim().to_string()).filter(|n| !n.is_empty()),
            "Alias" if name.is_none() => {
                name = Some(value.trim().to_string()).filter(|n| !n.is_empty())
            }
            "Class" => {
                let raw = value.trim();
                let digits = raw.strip_prefix("0x").unwrap_or(raw);
                class_of_device = u32::from_str_radix(digits, 16).ok();
            }
            "Services" => {
                service_uuids = value
                    .split(';')
                    .filter_map(|uuid| Uuid::parse_str(uuid.trim()).ok())
                    .collect();
            }
            _ => {}
        }
    }

    bonded.then(|| BondedDevice {
        address: address.to_uppercase(),
        name,
        class_of_device,
        service_uuids,
    })
}

#[async_trait]
impl BluetoothHostPort for BluezHost {
    async fn is_enabled(&self) -> bool {
        let storage_dir = self.storage_dir.clone();
        tokio::task::spawn_blocking(move || {
            read_address_dirs(&storage_dir).is_ok_and(|adapters| !adapters.is_empty())
        })
        .await
        .unwrap_or(false)
    }

    async fn bonded_devices(&self) -> Result<Vec<BondedDevice>, TransportError> {
        let storage_dir = self.storage_dir.clone();
        tokio::task::spawn_blocking(move || Self::scan(&storage_dir))
            .await
            .map_err(|e| TransportError::Transport(e.to_string()))?
    }

    async fn open_stream(
        &self,
        device: &BondedDevice,
        service: Uuid,
    ) -> Result<Box<dyn StreamLink>, TransportError> {
        let node = self
            .rfcomm_bindings
            .get(&device.address.to_uppercase())
            .ok_or_else(|| TransportError::Unavailable {
                reason: format!("no RFCOMM binding configured for {}", device.address),
            })?;

        debug!(node = %node.display(), %service, "opening rfcomm channel");
        let file = tokio::fs::OpenOptions::new()
            .write(true)
            .open(node)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => TransportError::Unavailable {
                    reason: format!("{} does not exist", node.display()),
                },
                _ => Self::io_error(node, e),
            })?;

        Ok(Box::new(RfcommStream { file }))
    }
}

struct RfcommStream {
    file: File,
}

#[async_trait]
impl StreamLink for RfcommStream {
    async fn write_all(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        self.file
            .write_all(bytes)
            .await
            .map_err(|e| TransportError::Transport(e.to_string()))
    }

    async fn flush(&mut self) -> Result<(), TransportError> {
        self.file
            .flush()
            .await
            .map_err(|e| TransportError::Transport(e.to_string()))
    }

    async fn close(self: Box<Self>) -> Result<(), TransportError> {
        let mut file = self.file;
        if let Err(e) = file.flush().await {
            warn!(error = %e, "flush before closing rfcomm channel failed");
        }
        Ok(())
    }
}
