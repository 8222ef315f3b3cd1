//! Setup orchestrator.
//!
//! Drives the wizard state machine and executes the side effects it returns
//! (hashing, persistence, completion signal). A transition either runs all of
//! its actions and advances, or fails and leaves the step where it was.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ps_core::locale::{sectors_for, DEFAULT_LANGUAGE};
use ps_core::ports::{
    AccessState, ConfigStorePort, PasswordHasherPort, PeripheralAccessPort, SetupEventPort,
};
use ps_core::setup::{StepFacts, WizardAction, WizardInput, WizardStateMachine};
use ps_core::{PrinterDevice, SecretString, SetupConfiguration, SetupError, WizardStep};
use tracing::{debug, error, info, info_span, warn, Instrument};

use crate::usecases::printer::{DeviceDiscoveryService, PrinterCatalog};
use crate::usecases::setup::context::SetupContext;

/// Orchestrator that drives wizard state and side effects.
pub struct SetupOrchestrator {
    context: Arc<SetupContext>,
    seeded: AtomicBool,

    config_store: Arc<dyn ConfigStorePort>,
    password_hasher: Arc<dyn PasswordHasherPort>,
    peripheral_access: Arc<dyn PeripheralAccessPort>,
    discovery: Arc<DeviceDiscoveryService>,
    setup_event_port: Arc<dyn SetupEventPort>,
}

impl SetupOrchestrator {
    pub fn new(
        config_store: Arc<dyn ConfigStorePort>,
        password_hasher: Arc<dyn PasswordHasherPort>,
        peripheral_access: Arc<dyn PeripheralAccessPort>,
        discovery: Arc<DeviceDiscoveryService>,
        setup_event_port: Arc<dyn SetupEventPort>,
    ) -> Self {
        Self {
            context: SetupContext::default().arc(),
            seeded: AtomicBool::new(false),
            config_store,
            password_hasher,
            peripheral_access,
            discovery,
            setup_event_port,
        }
    }

    pub async fn select_language(&self, language: String) -> Result<WizardStep, SetupError> {
        self.dispatch(WizardInput::SelectLanguage { language }).await
    }

    pub async fn submit_admin(
        &self,
        admin_name: String,
        password: String,
        confirmation: String,
    ) -> Result<WizardStep, SetupError> {
        let input = WizardInput::SubmitAdmin {
            admin_name,
            password: SecretString::new(password),
            confirmation: SecretString::new(confirmation),
        };
        self.dispatch(input).await
    }

    pub async fn submit_store_info(
        &self,
        store_name: String,
        store_sector: String,
    ) -> Result<WizardStep, SetupError> {
        let input = WizardInput::SubmitStoreInfo {
            store_name,
            store_sector,
        };
        self.dispatch(input).await
    }

    pub async fn submit_logo(
        &self,
        image_reference: Option<String>,
    ) -> Result<WizardStep, SetupError> {
        self.dispatch(WizardInput::SubmitLogo { image_reference }).await
    }

    pub async fn select_printer(
        &self,
        device: Option<PrinterDevice>,
    ) -> Result<WizardStep, SetupError> {
        self.dispatch(WizardInput::SubmitPrinter { device }).await
    }

    /// Run discovery and remember the result as the set of selectable printers.
    pub async fn discover_printers(&self) -> PrinterCatalog {
        let catalog = self.discovery.discover().await;
        self.context.set_printer_catalog(catalog.devices.clone()).await;
        catalog
    }

    /// Sector labels for the language chosen so far.
    pub async fn sector_choices(&self) -> &'static [&'static str] {
        let language = self.context.language().await;
        sectors_for(language.as_deref().unwrap_or(DEFAULT_LANGUAGE))
    }

    pub async fn current_step(&self) -> WizardStep {
        if let Err(err) = self.seed_from_store().await {
            error!(
                error = %err,
                code = err.code(),
                "failed to seed wizard from stored configuration"
            );
        }
        self.context.step().await
    }

    /// Resume at `Complete` when a finished record is already stored. Runs once.
    pub async fn seed_from_store(&self) -> Result<WizardStep, SetupError> {
        let _dispatch_guard = self.context.acquire_dispatch_lock().await;
        if self.seeded.swap(true, Ordering::SeqCst) {
            return Ok(self.context.step().await);
        }

        let stored = match self.config_store.load().await {
            Ok(stored) => stored,
            Err(err) => {
                self.seeded.store(false, Ordering::SeqCst);
                return Err(err.into());
            }
        };

        if let Some(record) = stored.filter(|r| r.is_complete() && r.has_default_printer()) {
            info!("stored configuration is complete, resuming at Complete");
            self.context.set_language(record.language).await;
            self.set_step_and_emit(WizardStep::Complete).await;
        }
        Ok(self.context.step().await)
    }

    /// Apply `input` to the flow positioned at the current context step.
    pub async fn dispatch(&self, input: WizardInput) -> Result<WizardStep, SetupError> {
        self.seed_from_store().await?;
        // Serialize concurrent dispatch calls so two inputs never act on the same step.
        let _dispatch_guard = self.context.acquire_dispatch_lock().await;
        let current = self.context.step().await;
        self.run_transition(current, input).await
    }

    /// Apply `input` on behalf of a screen that believes the flow is at `current`.
    ///
    /// `current` must match the step held by the context; a stale or skipped-ahead
    /// step is rejected with [`SetupError::UnexpectedInput`] carrying the real step,
    /// and a finished flow rejects everything with [`SetupError::AlreadyComplete`].
    ///
    /// # Returns
    ///
    /// The step the flow moved to. On failure nothing was persisted by this call
    /// and the context step is unchanged.
    pub async fn attempt_transition(
        &self,
        current: WizardStep,
        input: WizardInput,
    ) -> Result<WizardStep, SetupError> {
        self.seed_from_store().await?;
        let _dispatch_guard = self.context.acquire_dispatch_lock().await;
        let step = self.context.step().await;
        if step == WizardStep::Complete {
            warn!(claimed = ?current, "input after setup completed");
            return Err(SetupError::AlreadyComplete);
        }
        if current != step {
            warn!(claimed = ?current, actual = ?step, "input for a step the flow is not at");
            return Err(SetupError::UnexpectedInput { step });
        }
        self.run_transition(step, input).await
    }

    async fn run_transition(
        &self,
        current: WizardStep,
        input: WizardInput,
    ) -> Result<WizardStep, SetupError> {
        let span = info_span!(
            "usecase.setup_orchestrator.attempt_transition",
            from = ?current,
            input_step = ?input.step()
        );
        async {
            let catalog = self.context.printer_catalog().await;
            let peripheral_access = if input.step() == WizardStep::PrinterSelect {
                self.peripheral_access.access_state().await
            } else {
                AccessState::Unknown
            };
            let facts = StepFacts {
                peripheral_access,
                printer_catalog: &catalog,
            };

            let transition =
                WizardStateMachine::transition(current, input, &facts).inspect_err(|err| {
                    warn!(code = err.code(), error = %err, "wizard transition rejected");
                })?;

            self.execute_actions(current, transition.actions).await?;
            self.set_step_and_emit(transition.next).await;
            info!(from = ?current, to = ?transition.next, "wizard step advanced");
            Ok(transition.next)
        }
        .instrument(span)
        .await
    }

    async fn execute_actions(
        &self,
        step: WizardStep,
        actions: Vec<WizardAction>,
    ) -> Result<(), SetupError> {
        let mut last_saved: Option<SetupConfiguration> = None;

        for action in actions {
            debug!(?action, "wizard executing action");
            match action {
                WizardAction::RememberLanguage { language } => {
                    self.context.set_language(language).await;
                }
                WizardAction::CreateConfiguration {
                    admin_name,
                    password,
                } => {
                    let language = self
                        .context
                        .language()
                        .await
                        .ok_or(SetupError::LanguageNotSelected)?;
                    let hash = self.password_hasher.hash_password(&password).map_err(|err| {
                        SetupError::Internal(format!("password hashing failed: {err}"))
                    })?;

                    let record = SetupConfiguration::new_admin(language, admin_name, hash);
                    self.config_store.save(&record).await?;
                    debug!("setup configuration created");
                    last_saved = Some(record);
                }
                WizardAction::MergeConfiguration { patch } => {
                    let record = self.load_required(step).await?;
                    let merged = record.merged(&patch);
                    self.config_store.save(&merged).await?;
                    debug!(?patch, "setup configuration merged");
                    last_saved = Some(merged);
                }
                WizardAction::SignalCompletion => {
                    let record = match last_saved.take() {
                        Some(record) => record,
                        None => self.load_required(step).await?,
                    };
                    self.setup_event_port.emit_setup_completed(&record).await;
                    info!("setup flow completed");
                }
            }
        }

        Ok(())
    }

    async fn load_required(&self, step: WizardStep) -> Result<SetupConfiguration, SetupError> {
        self.config_store.load().await?.ok_or_else(|| {
            error!(?step, "setup configuration missing, earlier step did not run");
            SetupError::ConfigurationMissing { step }
        })
    }

    async fn set_step_and_emit(&self, step: WizardStep) {
        self.context.set_step(step).await;
        self.setup_event_port.emit_step_changed(step).await;
    }
}
