use thiserror::Error;

use crate::ports::{ConfigStoreError, TransportError};
use crate::setup::WizardStep;

/// Bad user input for the current step. Re-triable, the step does not advance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no language selected")]
    LanguageBlank,
    #[error("administrator name is blank")]
    AdminNameBlank,
    #[error("password does not meet the strength policy")]
    PasswordWeak,
    #[error("password and confirmation differ")]
    PasswordMismatch,
    #[error("store name is blank")]
    StoreNameBlank,
    #[error("no business sector selected")]
    SectorBlank,
    #[error("no logo image selected")]
    LogoNotSelected,
    #[error("no printer selected")]
    PrinterNotSelected,
    #[error("printer {address} was not offered by discovery")]
    PrinterNotOffered { address: String },
}

impl ValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::LanguageBlank => "language_blank",
            ValidationError::AdminNameBlank => "admin_name_blank",
            ValidationError::PasswordWeak => "password_weak",
            ValidationError::PasswordMismatch => "password_mismatch",
            ValidationError::StoreNameBlank => "store_name_blank",
            ValidationError::SectorBlank => "sector_blank",
            ValidationError::LogoNotSelected => "logo_not_selected",
            ValidationError::PrinterNotSelected => "printer_not_selected",
            ValidationError::PrinterNotOffered { .. } => "printer_not_offered",
        }
    }
}

/// Broad error category, used by callers to decide how to present a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorFamily {
    Validation,
    MissingPrerequisite,
    Persistence,
    PeripheralUnavailable,
    Internal,
}

/// Errors surfaced by a wizard transition.
///
/// Display strings are diagnostic only; screens localize on [`SetupError::code`].
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("setup configuration missing at step {step:?}")]
    ConfigurationMissing { step: WizardStep },

    #[error("no language was selected before the administrator step")]
    LanguageNotSelected,

    #[error("input does not belong to step {step:?}")]
    UnexpectedInput { step: WizardStep },

    #[error("setup flow already complete")]
    AlreadyComplete,

    #[error("persistence failed: {0}")]
    Persistence(#[from] ConfigStoreError),

    #[error("peripheral unavailable: {0}")]
    PeripheralUnavailable(#[from] TransportError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl SetupError {
    pub fn family(&self) -> ErrorFamily {
        match self {
            SetupError::Validation(_) => ErrorFamily::Validation,
            SetupError::ConfigurationMissing { .. }
            | SetupError::LanguageNotSelected
            | SetupError::UnexpectedInput { .. }
            | SetupError::AlreadyComplete => ErrorFamily::MissingPrerequisite,
            SetupError::Persistence(ConfigStoreError::Serialization(_)) => ErrorFamily::Internal,
            SetupError::Persistence(_) => ErrorFamily::Persistence,
            SetupError::PeripheralUnavailable(_) => ErrorFamily::PeripheralUnavailable,
            SetupError::Internal(_) => ErrorFamily::Internal,
        }
    }

    /// Stable, non-localized identifier for the failure.
    pub fn code(&self) -> &'static str {
        match self {
            SetupError::Validation(err) => err.code(),
            SetupError::ConfigurationMissing { .. } => "config_missing",
            SetupError::LanguageNotSelected => "language_not_selected",
            SetupError::UnexpectedInput { .. } => "unexpected_input",
            SetupError::AlreadyComplete => "already_complete",
            SetupError::Persistence(err) => err.code(),
            SetupError::PeripheralUnavailable(err) => err.code(),
            SetupError::Internal(_) => "internal",
        }
    }
}
