//! The form wizard: step state machine and the orchestrator around it.

pub mod manager;
pub mod state;

pub use manager::Wizard;
pub use state::{Focus, Transition, WizardState, WizardStep};
