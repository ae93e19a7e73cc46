//! Referral and campaign attribution.
//!
//! Two distinct tokens live here: the inbound `ref` a visitor arrived with
//! (stored once as "referred-by") and the personal token this device hands
//! out in its own invite links.

pub mod capture;
pub mod invite;

pub use capture::{Attribution, CaptureOutcome, capture_attribution, preserve_query};
pub use invite::{InviteLink, ensure_ref_token};
