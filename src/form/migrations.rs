//! Version-tracked migrations for persisted drafts.
//!
//! Drafts are plain JSON written by every past version of the form. Each
//! migration has a version number and a rewrite over the raw object;
//! `migrate_draft()` reads the draft's `version` key (absent means 0) and
//! applies only the newer ones, in order. Migrations are pure and total:
//! they never fail and never drop a value they do not understand.

use serde_json::{Map, Value};
use tracing::debug;

/// Version stamped on drafts written by this build.
pub const CURRENT_DRAFT_VERSION: u64 = 2;

/// A single migration step.
struct DraftMigration {
    version: u64,
    name: &'static str,
    apply: fn(&mut Map<String, Value>),
}

/// All migrations in order. Add new versions to the end.
static MIGRATIONS: &[DraftMigration] = &[
    DraftMigration {
        version: 1,
        name: "lane_tech_to_skills",
        apply: lane_tech_to_skills,
    },
    DraftMigration {
        version: 2,
        name: "role_interests_to_array",
        apply: role_interests_to_array,
    },
];

/// Upgrade a raw draft to [`CURRENT_DRAFT_VERSION`].
///
/// Non-object values are returned unchanged; the caller treats them as corrupt.
pub fn migrate_draft(value: Value) -> Value {
    let Value::Object(mut map) = value else {
        return value;
    };

    let from = map.get("version").and_then(Value::as_u64).unwrap_or(0);
    for migration in MIGRATIONS.iter().filter(|m| m.version > from) {
        (migration.apply)(&mut map);
        debug!(
            version = migration.version,
            name = migration.name,
            "Applied draft migration"
        );
    }

    map.insert(
        "version".to_string(),
        Value::from(from.max(CURRENT_DRAFT_VERSION)),
    );
    Value::Object(map)
}

/// The skills picker used to store its selection under `laneTech`.
fn lane_tech_to_skills(map: &mut Map<String, Value>) {
    let has_skills = map.get("skills").is_some_and(|v| !v.is_null());
    if has_skills || !map.get("laneTech").is_some_and(Value::is_array) {
        return;
    }
    if let Some(lane_tech) = map.remove("laneTech") {
        map.insert("skills".to_string(), lane_tech);
    }
}

/// The two-step form stored a single role as a scalar.
fn role_interests_to_array(map: &mut Map<String, Value>) {
    let Some(current) = map.get("roleInterests") else {
        return;
    };
    if current.is_array() {
        return;
    }
    let wrapped = if is_truthy(current) {
        vec![current.clone()]
    } else {
        Vec::new()
    };
    map.insert("roleInterests".to_string(), Value::Array(wrapped));
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn lane_tech_becomes_skills() {
        let migrated = migrate_draft(json!({"laneTech": ["Go", "Rust"], "firstName": "Jane"}));
        assert_eq!(migrated["skills"], json!(["Go", "Rust"]));
        assert!(migrated.get("laneTech").is_none());
        assert_eq!(migrated["firstName"], "Jane");
        assert_eq!(migrated["version"], CURRENT_DRAFT_VERSION);
    }

    #[test]
    fn lane_tech_never_overwrites_existing_skills() {
        let migrated = migrate_draft(json!({"laneTech": ["Go"], "skills": ["Rust"]}));
        assert_eq!(migrated["skills"], json!(["Rust"]));
        // The legacy value is kept, not lost
        assert_eq!(migrated["laneTech"], json!(["Go"]));
    }

    #[test]
    fn scalar_role_becomes_one_element_array() {
        let migrated = migrate_draft(json!({"roleInterests": "Data Eng"}));
        assert_eq!(migrated["roleInterests"], json!(["Data Eng"]));

        let empty = migrate_draft(json!({"roleInterests": ""}));
        assert_eq!(empty["roleInterests"], json!([]));

        let already = migrate_draft(json!({"roleInterests": ["ML Platform"]}));
        assert_eq!(already["roleInterests"], json!(["ML Platform"]));
    }

    #[test]
    fn current_drafts_are_untouched() {
        let draft = json!({"version": 2, "laneTech": ["Go"], "roleInterests": "x"});
        let migrated = migrate_draft(draft.clone());
        assert_eq!(migrated, draft);
    }

    #[test]
    fn migration_is_idempotent() {
        let once = migrate_draft(json!({"laneTech": ["Go"], "roleInterests": "Data Eng"}));
        let twice = migrate_draft(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn future_versions_are_not_downgraded() {
        let migrated = migrate_draft(json!({"version": 7}));
        assert_eq!(migrated["version"], 7);
    }

    #[test]
    fn non_objects_pass_through() {
        assert_eq!(migrate_draft(json!([1, 2])), json!([1, 2]));
        assert_eq!(migrate_draft(Value::Null), Value::Null);
    }
}
