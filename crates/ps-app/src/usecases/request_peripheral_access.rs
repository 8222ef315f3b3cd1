use std::sync::Arc;

use ps_core::ports::{AccessState, PeripheralAccessPort};
use tracing::info;

/// Ask the host for peripheral access unless it is already granted.
///
/// Returns the gate state observed before the request; the outcome of the
/// request itself shows up on a later read of the gate.
pub struct RequestPeripheralAccess {
    access: Arc<dyn PeripheralAccessPort>,
}

impl RequestPeripheralAccess {
    pub fn new(access: Arc<dyn PeripheralAccessPort>) -> Self {
        Self { access }
    }

    pub async fn execute(&self) -> AccessState {
        let state = self.access.access_state().await;
        if !state.is_granted() {
            info!(?state, "requesting peripheral access from host");
            self.access.request_access().await;
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingAccess {
        state: AccessState,
        requests: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl PeripheralAccessPort for CountingAccess {
        async fn access_state(&self) -> AccessState {
            self.state
        }

        async fn request_access(&self) {
            self.requests.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn granted_gate_is_not_asked_again() {
        let access = Arc::new(CountingAccess {
            state: AccessState::Granted,
            requests: AtomicUsize::new(0),
        });

        let state = RequestPeripheralAccess::new(access.clone()).execute().await;

        assert_eq!(state, AccessState::Granted);
        assert_eq!(access.requests.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn undecided_gate_triggers_one_request() {
        let access = Arc::new(CountingAccess {
            state: AccessState::Unknown,
            requests: AtomicUsize::new(0),
        });

        let state = RequestPeripheralAccess::new(access.clone()).execute().await;

        assert_eq!(state, AccessState::Unknown);
        assert_eq!(access.requests.load(Ordering::SeqCst), 1);
    }
}
