//! Form data models — working draft, committed step data, and enums.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// Maximum accepted CV size in bytes (5 MiB).
pub const MAX_CV_BYTES: u64 = 5 * 1024 * 1024;
/// The only accepted CV MIME type.
pub const PDF_MIME: &str = "application/pdf";
/// Maximum number of proof-of-work entries.
pub const MAX_PROOF_OF_WORK: usize = 2;

/// Candidate's right to work in their location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RightToWork {
    /// Already has the right to work.
    Rtw,
    /// Will require sponsorship.
    Sponsor,
    /// Temporary right, e.g. a graduate visa.
    Temporary,
}

impl RightToWork {
    pub const ALL: [RightToWork; 3] = [Self::Rtw, Self::Sponsor, Self::Temporary];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Rtw => "I have the right to work in this location",
            Self::Sponsor => "I will require sponsorship",
            Self::Temporary => "I have temporary right (e.g. Graduate Visa)",
        }
    }
}

impl std::fmt::Display for RightToWork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rtw => write!(f, "rtw"),
            Self::Sponsor => write!(f, "sponsor"),
            Self::Temporary => write!(f, "temporary"),
        }
    }
}

impl std::str::FromStr for RightToWork {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rtw" => Ok(Self::Rtw),
            "sponsor" => Ok(Self::Sponsor),
            "temporary" => Ok(Self::Temporary),
            _ => Err(format!("Unknown right to work status: {}", s)),
        }
    }
}

/// Professional track used to scope skill suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoleLane {
    #[serde(rename = "Backend SWE")]
    BackendSwe,
    #[serde(rename = "ML Platform")]
    MlPlatform,
    #[serde(rename = "Data Eng")]
    DataEng,
    #[serde(rename = "Platform-SRE")]
    PlatformSre,
    #[serde(rename = "Solutions Eng")]
    SolutionsEng,
}

impl RoleLane {
    pub const ALL: [RoleLane; 5] = [
        Self::BackendSwe,
        Self::MlPlatform,
        Self::DataEng,
        Self::PlatformSre,
        Self::SolutionsEng,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BackendSwe => "Backend SWE",
            Self::MlPlatform => "ML Platform",
            Self::DataEng => "Data Eng",
            Self::PlatformSre => "Platform-SRE",
            Self::SolutionsEng => "Solutions Eng",
        }
    }
}

impl std::fmt::Display for RoleLane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RoleLane {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|lane| lane.as_str() == s)
            .ok_or_else(|| format!("Unknown role: {}", s))
    }
}

/// A link to something the candidate built, with an optional short note.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProofOfWorkEntry {
    pub url: String,
    pub note: String,
}

impl ProofOfWorkEntry {
    pub fn is_blank(&self) -> bool {
        self.url.trim().is_empty() && self.note.trim().is_empty()
    }
}

/// Identity of an accepted CV file. The bytes themselves are never kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CvMeta {
    pub name: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub mime: String,
    /// Hex-encoded SHA-256 of the file contents.
    pub hash: String,
}

/// The in-progress form record, persisted after every change.
///
/// Every field is optional and deserializes leniently: a value of the wrong
/// type reads back as absent rather than invalidating the record. Keys this
/// version does not know about are carried through untouched in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDraft {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,

    // Step 1
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub gdpr_consent: Option<bool>,

    // Step 2
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub university: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub grad_year: Option<i32>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub cv_meta: Option<CvMeta>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub right_to_work: Option<RightToWork>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub visa_type: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub visa_expiry: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub proof_of_work: Option<Vec<ProofOfWorkEntry>>,

    // Step 3
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub domain_interests: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub role_interests: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub dream_startups: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl FormDraft {
    /// Selected role lanes, ignoring unknown values left by older drafts.
    pub fn selected_roles(&self) -> Vec<RoleLane> {
        self.role_interests
            .iter()
            .flatten()
            .filter_map(|r| r.parse().ok())
            .collect()
    }

    /// Proof-of-work entries as displayed: never fewer than one (blank) entry.
    pub fn proof_of_work_entries(&self) -> Vec<ProofOfWorkEntry> {
        match &self.proof_of_work {
            Some(entries) if !entries.is_empty() => entries.clone(),
            _ => vec![ProofOfWorkEntry::default()],
        }
    }

    /// True when no form field has been entered.
    pub fn is_empty(&self) -> bool {
        let bare = FormDraft {
            version: self.version,
            extra: self.extra.clone(),
            ..Default::default()
        };
        *self == bare
    }
}

/// Deserialize into `Some(T)` when the value has the right shape, `None` otherwise.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Validated step 1: basic details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step1Data {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    pub gdpr_consent: bool,
}

/// Validated step 2: education, location and work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step2Data {
    pub university: String,
    pub grad_year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cv_meta: Option<CvMeta>,
    pub location: String,
    pub right_to_work: RightToWork,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visa_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visa_expiry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    pub proof_of_work: Vec<ProofOfWorkEntry>,
}

/// Validated step 3: interests and skills.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterestsData {
    pub domain_interests: Vec<String>,
    pub role_interests: Vec<RoleLane>,
    pub skills: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dream_startups: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enums_use_wire_strings() {
        assert_eq!(serde_json::to_string(&RightToWork::Temporary).unwrap(), "\"temporary\"");
        assert_eq!(serde_json::to_string(&RoleLane::PlatformSre).unwrap(), "\"Platform-SRE\"");
        for lane in RoleLane::ALL {
            let json = serde_json::to_string(&lane).unwrap();
            assert_eq!(json, format!("\"{lane}\""));
            assert_eq!(lane.as_str().parse::<RoleLane>().unwrap(), lane);
        }
        assert!("Frontend".parse::<RoleLane>().is_err());
    }

    #[test]
    fn draft_serializes_only_entered_fields() {
        let draft = FormDraft {
            first_name: Some("Jane".into()),
            gdpr_consent: Some(true),
            ..Default::default()
        };
        let value = serde_json::to_value(&draft).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 2);
        assert_eq!(value["firstName"], "Jane");
        assert_eq!(value["gdprConsent"], true);
    }

    #[test]
    fn lenient_fields_drop_bad_types_and_keep_the_rest() {
        let draft: FormDraft = serde_json::from_value(serde_json::json!({
            "firstName": "Jane",
            "gradYear": "twenty",
            "rightToWork": "citizen",
            "skills": ["Rust", "Go"],
            "futureField": {"nested": true}
        }))
        .unwrap();
        assert_eq!(draft.first_name.as_deref(), Some("Jane"));
        assert_eq!(draft.grad_year, None);
        assert_eq!(draft.right_to_work, None);
        assert_eq!(draft.skills, Some(vec!["Rust".to_string(), "Go".to_string()]));
        assert_eq!(draft.extra["futureField"]["nested"], true);

        // Unknown keys survive a round trip
        let back = serde_json::to_value(&draft).unwrap();
        assert_eq!(back["futureField"]["nested"], true);
    }

    #[test]
    fn selected_roles_skips_unknown_values() {
        let draft = FormDraft {
            role_interests: Some(vec!["Data Eng".into(), "Wizard".into()]),
            ..Default::default()
        };
        assert_eq!(draft.selected_roles(), vec![RoleLane::DataEng]);
    }

    #[test]
    fn proof_of_work_always_shows_one_entry() {
        let draft = FormDraft::default();
        assert_eq!(draft.proof_of_work_entries(), vec![ProofOfWorkEntry::default()]);
    }

    #[test]
    fn is_empty_ignores_version_and_extra() {
        let mut draft = FormDraft {
            version: Some(2),
            ..Default::default()
        };
        draft.extra.insert("laneTech".into(), serde_json::json!(["Go"]));
        assert!(draft.is_empty());
        draft.email = Some("a@b.co".into());
        assert!(!draft.is_empty());
    }
}
