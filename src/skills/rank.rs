//! Role-aware ordering of skill suggestions.

use crate::form::model::RoleLane;

use super::catalog::{GLOBAL_SKILLS, role_skills};

/// Rank the skill vocabulary for the selected roles.
///
/// The union of each selected role's skills comes first, in first-seen
/// order across roles, followed by the global vocabulary minus anything
/// already listed, in its original order. No roles yields the global list.
pub fn rank_skills(selected: &[RoleLane]) -> Vec<&'static str> {
    let mut ranked: Vec<&'static str> = Vec::new();
    for skill in selected.iter().flat_map(|lane| role_skills(*lane)) {
        if !ranked.contains(skill) {
            ranked.push(*skill);
        }
    }
    let rest: Vec<&'static str> = GLOBAL_SKILLS
        .iter()
        .copied()
        .filter(|s| !ranked.contains(s))
        .collect();
    ranked.extend(rest);
    ranked
}
