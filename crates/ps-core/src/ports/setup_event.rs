use async_trait::async_trait;

use crate::setup::{SetupConfiguration, WizardStep};

/// Outbound notifications from the wizard to the hosting screen layer.
#[async_trait]
pub trait SetupEventPort: Send + Sync {
    async fn emit_step_changed(&self, step: WizardStep);

    /// Flow reached `Complete` with `record` persisted.
    async fn emit_setup_completed(&self, record: &SetupConfiguration);
}
