use std::sync::Arc;

use ps_core::ports::{ConfigStoreError, ConfigStorePort};
use ps_core::SetupConfiguration;

/// Read access to the persisted record for screens that join late.
pub struct GetSetupConfiguration {
    config_store: Arc<dyn ConfigStorePort>,
}

impl GetSetupConfiguration {
    pub fn new(config_store: Arc<dyn ConfigStorePort>) -> Self {
        Self { config_store }
    }

    pub async fn execute(&self) -> Result<Option<SetupConfiguration>, ConfigStoreError> {
        self.config_store.load().await
    }
}
