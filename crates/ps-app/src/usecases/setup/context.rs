use std::sync::Arc;

use ps_core::{PrinterDevice, WizardStep};
use tokio::sync::Mutex;

/// Flow data carried between steps that is not (yet) persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowState {
    pub step: WizardStep,
    /// Locale chosen on the first step, written with the admin record.
    pub language: Option<String>,
    /// Devices offered by the most recent discovery pass.
    pub printer_catalog: Vec<PrinterDevice>,
}

impl FlowState {
    pub fn at(step: WizardStep) -> Self {
        Self {
            step,
            language: None,
            printer_catalog: Vec::new(),
        }
    }
}

/// Shared wizard context containing flow state and the dispatch lock.
///
/// ## Lock Ordering
/// When acquiring both locks, acquire `dispatch_lock` first, then `state`.
#[derive(Clone)]
pub struct SetupContext {
    state: Arc<Mutex<FlowState>>,
    /// Serializes transitions so that validate, execute and state update run as one unit.
    dispatch_lock: Arc<Mutex<()>>,
}

impl SetupContext {
    pub fn new(initial: FlowState) -> Self {
        Self {
            state: Arc::new(Mutex::new(initial)),
            dispatch_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Does NOT acquire `dispatch_lock`.
    pub async fn get_state(&self) -> FlowState {
        self.state.lock().await.clone()
    }

    pub async fn step(&self) -> WizardStep {
        self.state.lock().await.step
    }

    pub async fn language(&self) -> Option<String> {
        self.state.lock().await.language.clone()
    }

    pub async fn printer_catalog(&self) -> Vec<PrinterDevice> {
        self.state.lock().await.printer_catalog.clone()
    }

    pub async fn acquire_dispatch_lock(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.dispatch_lock.lock().await
    }

    /// Call only while holding `dispatch_lock`.
    pub async fn set_step(&self, step: WizardStep) {
        self.state.lock().await.step = step;
    }

    pub async fn set_language(&self, language: String) {
        self.state.lock().await.language = Some(language);
    }

    pub async fn set_printer_catalog(&self, devices: Vec<PrinterDevice>) {
        self.state.lock().await.printer_catalog = devices;
    }
}

impl Default for SetupContext {
    fn default() -> Self {
        Self::new(FlowState::at(WizardStep::LanguageSelect))
    }
}
