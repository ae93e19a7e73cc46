//! The waitlist form: data model, validation, input transforms and the
//! persisted draft.

pub mod draft;
pub mod field;
pub mod locations;
pub mod migrations;
pub mod model;
pub mod transform;
pub mod validation;

pub use draft::DraftStore;
pub use field::{Field, FieldUpdate};
pub use locations::suggest_locations;
pub use model::{
    CvMeta, FormDraft, InterestsData, ProofOfWorkEntry, RightToWork, RoleLane, Step1Data, Step2Data,
};
pub use validation::{FieldError, ValidationErrors};
