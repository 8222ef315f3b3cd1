//! Peripheral access gate backed by the host.
//!
//! Wireless access is considered granted when the process can read the host
//! Bluetooth storage. A configured override replaces the probe entirely.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use ps_core::ports::{AccessState, PeripheralAccessPort};
use tracing::{debug, info};

pub struct HostPeripheralAccess {
    storage_dir: PathBuf,
    configured: Option<AccessState>,
    requested: AtomicBool,
}

impl HostPeripheralAccess {
    /// Gate over the host Bluetooth stack.
    ///
    /// # Arguments
    ///
    /// * `storage_dir` - Directory of the stack's pairing database, whose
    ///   readability stands in for the access grant
    /// * `configured` - Operator override; `Some` short-circuits the check
    ///
    /// # Examples
    ///
    /// ```
    /// use ps_core::ports::AccessState;
    /// use ps_platform::HostPeripheralAccess;
    ///
    /// let access = HostPeripheralAccess::new("/var/lib/bluetooth", Some(AccessState::Granted));
    /// # drop(access);
    /// ```
    pub fn new(storage_dir: impl Into<PathBuf>, configured: Option<AccessState>) -> Self {
        Self {
            storage_dir: storage_dir.into(),
            configured,
            requested: AtomicBool::new(false),
        }
    }

    /// Whether a request was issued during this process lifetime.
    #[cfg(test)]
    pub fn was_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    async fn probe(&self) -> AccessState {
        match tokio::fs::read_dir(&self.storage_dir).await {
            Ok(_) => AccessState::Granted,
            Err(e) if e.kind() == ErrorKind::PermissionDenied => AccessState::Denied,
            Err(e) => {
                debug!(
                    path = %self.storage_dir.display(),
                    error = %e,
                    "bluetooth storage not readable"
                );
                AccessState::Unknown
            }
        }
    }
}

#[async_trait]
impl PeripheralAccessPort for HostPeripheralAccess {
    async fn access_state(&self) -> AccessState {
        match self.configured {
            Some(state) => state,
            None => self.probe().await,
        }
    }

    async fn request_access(&self) {
        self.requested.store(true, Ordering::SeqCst);
        info!(
            path = %self.storage_dir.display(),
            "peripheral access requested; grant read access to the bluetooth storage \
             (e.g. add the user to the `bluetooth` group) and retry discovery"
        );
    }
}
