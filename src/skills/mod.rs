//! Skill vocabulary, role-aware ranking and free-typed tag handling.

pub mod catalog;
pub mod rank;
pub mod tags;

pub use rank::rank_skills;
pub use tags::{SkillPicker, TagRejection, normalize_tag};
