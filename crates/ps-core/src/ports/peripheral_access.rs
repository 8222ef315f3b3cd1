//! Host permission gate for peripheral (wireless) access.
//!
//! The core only reads the gate. Asking the user is a host concern; callers
//! trigger it through [`PeripheralAccessPort::request_access`] and observe the
//! outcome on a later [`PeripheralAccessPort::access_state`] call.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessState {
    Granted,
    Denied,
    /// Not decided yet, the host must ask.
    Unknown,
}

impl AccessState {
    pub fn is_granted(self) -> bool {
        self == AccessState::Granted
    }
}

#[async_trait]
pub trait PeripheralAccessPort: Send + Sync {
    async fn access_state(&self) -> AccessState;

    /// Fire-and-forget request; the result shows up through `access_state`.
    async fn request_access(&self);
}
