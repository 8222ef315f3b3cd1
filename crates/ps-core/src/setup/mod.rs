//! Setup domain module.
//!
//! This module defines the persisted setup record and the wizard state machine types.

mod config;
mod error;
pub mod state_machine;

pub use config::{ConfigPatch, SetupConfiguration};
pub use error::{ErrorFamily, SetupError, ValidationError};
pub use state_machine::{
    StepFacts, Transition, WizardAction, WizardInput, WizardStateMachine, WizardStep,
};
