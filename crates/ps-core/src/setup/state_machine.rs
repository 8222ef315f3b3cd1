//! Wizard state machine.
//!
//! Defines a pure transition function for the onboarding flow. Side effects
//! (hashing, persistence, completion signal) are returned as [`WizardAction`]s
//! and executed by the application layer.

use serde::{Deserialize, Serialize};

use crate::ports::{AccessState, TransportError};
use crate::printer::{PrinterDevice, TransportKind};
use crate::secret::SecretString;
use crate::setup::{ConfigPatch, SetupError, ValidationError};
use crate::validation::{is_blank, is_password_strong, is_step_complete};

/// Wizard steps in strict forward order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WizardStep {
    LanguageSelect,
    AdminSetup,
    StoreInfo,
    LogoUpload,
    PrinterSelect,
    Complete,
}

impl WizardStep {
    pub const ORDER: [WizardStep; 6] = [
        WizardStep::LanguageSelect,
        WizardStep::AdminSetup,
        WizardStep::StoreInfo,
        WizardStep::LogoUpload,
        WizardStep::PrinterSelect,
        WizardStep::Complete,
    ];

    /// The step that follows this one, `None` for `Complete`.
    pub fn next(self) -> Option<WizardStep> {
        let index = Self::ORDER.iter().position(|step| *step == self)?;
        Self::ORDER.get(index + 1).copied()
    }
}

/// User input submitted on a step.
#[derive(Debug, PartialEq)]
pub enum WizardInput {
    SelectLanguage {
        language: String,
    },
    SubmitAdmin {
        admin_name: String,
        password: SecretString,
        confirmation: SecretString,
    },
    SubmitStoreInfo {
        store_name: String,
        store_sector: String,
    },
    SubmitLogo {
        image_reference: Option<String>,
    },
    SubmitPrinter {
        device: Option<PrinterDevice>,
    },
}

impl WizardInput {
    /// The step this input is meant for.
    pub fn step(&self) -> WizardStep {
        match self {
            WizardInput::SelectLanguage { .. } => WizardStep::LanguageSelect,
            WizardInput::SubmitAdmin { .. } => WizardStep::AdminSetup,
            WizardInput::SubmitStoreInfo { .. } => WizardStep::StoreInfo,
            WizardInput::SubmitLogo { .. } => WizardStep::LogoUpload,
            WizardInput::SubmitPrinter { .. } => WizardStep::PrinterSelect,
        }
    }
}

/// Side effects produced by a successful transition.
#[derive(Debug, PartialEq)]
pub enum WizardAction {
    /// Keep the chosen locale in the flow context. Nothing is persisted.
    RememberLanguage { language: String },
    /// Hash the password and save a brand new record.
    CreateConfiguration {
        admin_name: String,
        password: SecretString,
    },
    /// Load the record, merge the patch and save it back.
    MergeConfiguration { patch: ConfigPatch },
    /// Tell the external caller the flow is finished.
    SignalCompletion,
}

/// Facts gathered by the orchestrator that the printer step depends on.
#[derive(Debug, Clone, Copy)]
pub struct StepFacts<'a> {
    pub peripheral_access: AccessState,
    pub printer_catalog: &'a [PrinterDevice],
}

impl StepFacts<'_> {
    pub fn none() -> StepFacts<'static> {
        StepFacts {
            peripheral_access: AccessState::Unknown,
            printer_catalog: &[],
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct Transition {
    pub next: WizardStep,
    pub actions: Vec<WizardAction>,
}

/// Pure wizard state machine: validation and step ordering, no side effects.
pub struct WizardStateMachine;

impl WizardStateMachine {
    pub fn transition(
        current: WizardStep,
        input: WizardInput,
        facts: &StepFacts<'_>,
    ) -> Result<Transition, SetupError> {
        if current == WizardStep::Complete {
            return Err(SetupError::AlreadyComplete);
        }
        if input.step() != current {
            return Err(SetupError::UnexpectedInput { step: current });
        }

        let (next, actions) = match input {
            WizardInput::SelectLanguage { language } => {
                if is_blank(&language) {
                    return Err(ValidationError::LanguageBlank.into());
                }
                (
                    WizardStep::AdminSetup,
                    vec![WizardAction::RememberLanguage {
                        language: language.trim().to_string(),
                    }],
                )
            }
            WizardInput::SubmitAdmin {
                admin_name,
                password,
                confirmation,
            } => {
                if !is_step_complete(&[admin_name.as_str()]) {
                    return Err(ValidationError::AdminNameBlank.into());
                }
                if !is_password_strong(&password) {
                    return Err(ValidationError::PasswordWeak.into());
                }
                if password != confirmation {
                    return Err(ValidationError::PasswordMismatch.into());
                }
                (
                    WizardStep::StoreInfo,
                    vec![WizardAction::CreateConfiguration {
                        admin_name,
                        password,
                    }],
                )
            }
            WizardInput::SubmitStoreInfo {
                store_name,
                store_sector,
            } => {
                if is_blank(&store_name) {
                    return Err(ValidationError::StoreNameBlank.into());
                }
                if is_blank(&store_sector) {
                    return Err(ValidationError::SectorBlank.into());
                }
                (
                    WizardStep::LogoUpload,
                    vec![WizardAction::MergeConfiguration {
                        patch: ConfigPatch::StoreInfo {
                            store_name,
                            store_sector,
                        },
                    }],
                )
            }
            WizardInput::SubmitLogo { image_reference } => {
                let image_reference = image_reference
                    .filter(|reference| !is_blank(reference))
                    .ok_or(ValidationError::LogoNotSelected)?;
                (
                    WizardStep::PrinterSelect,
                    vec![WizardAction::MergeConfiguration {
                        patch: ConfigPatch::Logo { image_reference },
                    }],
                )
            }
            WizardInput::SubmitPrinter { device } => {
                let device = device.ok_or(ValidationError::PrinterNotSelected)?;
                if !facts
                    .printer_catalog
                    .iter()
                    .any(|offered| offered.same_device(&device))
                {
                    return Err(ValidationError::PrinterNotOffered {
                        address: device.address,
                    }
                    .into());
                }
                if device.transport_kind == TransportKind::Wireless
                    && facts.peripheral_access != AccessState::Granted
                {
                    return Err(TransportError::PermissionMissing.into());
                }
                (
                    WizardStep::Complete,
                    vec![
                        WizardAction::MergeConfiguration {
                            patch: ConfigPatch::default_printer(&device),
                        },
                        WizardAction::SignalCompletion,
                    ],
                )
            }
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(from = ?current, to = ?next, "wizard transition accepted");

        Ok(Transition { next, actions })
    }
}
