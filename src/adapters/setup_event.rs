use async_trait::async_trait;
use ps_core::ports::SetupEventPort;
use ps_core::{SetupConfiguration, WizardStep};
use tracing::info;

/// Reports wizard progress to the log; the terminal front end polls the step itself.
pub struct ConsoleSetupEventPort;

#[async_trait]
impl SetupEventPort for ConsoleSetupEventPort {
    async fn emit_step_changed(&self, step: WizardStep) {
        info!(?step, "wizard step changed");
    }

    async fn emit_setup_completed(&self, record: &SetupConfiguration) {
        info!(
            store = %record.store_name,
            printer = record.default_printer_name.as_deref().unwrap_or_default(),
            "setup completed"
        );
    }
}
