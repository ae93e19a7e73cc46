//! Free-typed skill tags: normalization and the capped skill picker.

/// Known abbreviations, matched against the whole tag case-insensitively.
const ABBREVIATIONS: &[(&str, &str)] = &[
    ("k8s", "Kubernetes"),
    ("gke", "Kubernetes"),
    ("tf", "Terraform"),
    ("js", "JavaScript"),
    ("ts", "TypeScript"),
    ("s3", "AWS"),
    ("gql", "GraphQL"),
    ("pgsql", "PostgreSQL"),
    ("py", "Python"),
];

const MIN_TAG_CHARS: usize = 2;
const MAX_TAG_CHARS: usize = 20;

/// Why a tag was not added.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TagRejection {
    #[error("Skills must be at least 2 characters")]
    TooShort,

    #[error("Skills must be at most 20 characters")]
    TooLong,

    #[error("Up to {max} skills maximum")]
    Limit { max: usize },
}

/// Trim, collapse whitespace and expand known abbreviations.
///
/// Tags outside 2..=20 characters after normalization are rejected.
pub fn normalize_tag(raw: &str) -> Result<String, TagRejection> {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let normalized = ABBREVIATIONS
        .iter()
        .find(|(abbr, _)| abbr.eq_ignore_ascii_case(&collapsed))
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(collapsed);

    let len = normalized.chars().count();
    if len < MIN_TAG_CHARS {
        return Err(TagRejection::TooShort);
    }
    if len > MAX_TAG_CHARS {
        return Err(TagRejection::TooLong);
    }
    Ok(normalized)
}

/// Adds and removes skills on a selection with a cap, remembering the last
/// removal so it can be undone.
#[derive(Debug, Clone)]
pub struct SkillPicker {
    max: usize,
    last_removed: Option<String>,
}

impl SkillPicker {
    pub fn new(max: usize) -> Self {
        Self {
            max,
            last_removed: None,
        }
    }

    pub fn max(&self) -> usize {
        self.max
    }

    /// Normalize and append `raw`. `Ok(false)` when it was already selected.
    pub fn add(&mut self, selection: &mut Vec<String>, raw: &str) -> Result<bool, TagRejection> {
        let tag = normalize_tag(raw)?;
        if selection.contains(&tag) {
            return Ok(false);
        }
        if selection.len() >= self.max {
            return Err(TagRejection::Limit { max: self.max });
        }
        selection.push(tag);
        Ok(true)
    }

    /// Remove a selected skill. Returns whether anything was removed.
    pub fn remove(&mut self, selection: &mut Vec<String>, skill: &str) -> bool {
        let before = selection.len();
        selection.retain(|s| s != skill);
        let removed = selection.len() != before;
        if removed {
            self.last_removed = Some(skill.to_string());
        }
        removed
    }

    /// Restore the last removed skill if it fits and is not already back.
    pub fn undo(&mut self, selection: &mut Vec<String>) -> Option<String> {
        let skill = self.last_removed.take()?;
        if selection.contains(&skill) || selection.len() >= self.max {
            return None;
        }
        selection.push(skill.clone());
        Some(skill)
    }

    /// Forget any pending undo.
    pub fn reset(&mut self) {
        self.last_removed = None;
    }
}
