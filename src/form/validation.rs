//! Per-step validation schemas.
//!
//! Each step validates only its own fields from the working draft and, on
//! success, returns the typed, normalized step data. Failures collect every
//! failing field in display order.

use std::sync::LazyLock;

use regex::Regex;

use crate::skills::catalog::DOMAIN_OPTIONS;

use super::field::Field;
use super::model::{
    FormDraft, InterestsData, MAX_CV_BYTES, MAX_PROOF_OF_WORK, PDF_MIME, ProofOfWorkEntry,
    RightToWork, RoleLane, Step1Data, Step2Data,
};
use super::transform::collapse_whitespace;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
        .expect("email regex")
});

static MM_YYYY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(0[1-9]|1[0-2])/\d{4}$").expect("MM/YYYY regex"));

/// A single failing field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

/// All failing fields of one step, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure. Only the first message per field is kept.
    pub fn push(&mut self, field: Field, message: impl Into<String>) {
        if self.for_field(field).is_none() {
            self.errors.push(FieldError {
                field,
                message: message.into(),
            });
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Inline message for a field, if it failed.
    pub fn for_field(&self, field: Field) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// Drop a field's message (the candidate edited it).
    pub fn clear_field(&mut self, field: Field) {
        self.errors.retain(|e| e.field != field);
    }

    /// The first failing field, which receives focus after the summary.
    pub fn first_field(&self) -> Option<Field> {
        self.errors.first().map(|e| e.field)
    }

    /// Lines of the aggregated summary rendered at the top of the step.
    pub fn summary(&self) -> Vec<String> {
        self.errors
            .iter()
            .map(|e| format!("{}: {}", e.field.label(), e.message))
            .collect()
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, ValidationErrors> {
        if self.is_empty() { Ok(value()) } else { Err(self) }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Please fix the following: {}", self.summary().join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Validate basic details.
pub fn validate_step1(draft: &FormDraft) -> Result<Step1Data, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let first_name = text(&draft.first_name);
    if first_name.is_empty() {
        errors.push(Field::FirstName, "First name is required");
    } else if char_len(&first_name) > 50 {
        errors.push(Field::FirstName, "First name must be at most 50 characters");
    }

    let last_name = text(&draft.last_name);
    if last_name.is_empty() {
        errors.push(Field::LastName, "Last name is required");
    } else if char_len(&last_name) > 50 {
        errors.push(Field::LastName, "Last name must be at most 50 characters");
    }

    let email = text(&draft.email);
    if !is_email(&email) {
        errors.push(Field::Email, "Please enter a valid email address");
    }

    let linkedin_url = optional_text(&draft.linkedin_url);
    if let Some(url) = &linkedin_url {
        if !is_url(url) {
            errors.push(Field::LinkedinUrl, "Please enter a valid LinkedIn URL");
        }
    }

    let gdpr_consent = draft.gdpr_consent == Some(true);
    if !gdpr_consent {
        errors.push(
            Field::GdprConsent,
            "You must consent to data processing to continue",
        );
    }

    errors.into_result(|| Step1Data {
        first_name,
        last_name,
        email,
        linkedin_url,
        gdpr_consent,
    })
}

/// Validate education, location and work details. `current_year` bounds
/// the graduation year to `[current_year, current_year + 3]`.
pub fn validate_step2(draft: &FormDraft, current_year: i32) -> Result<Step2Data, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let university = text(&draft.university);
    if char_len(&university) < 2 {
        errors.push(Field::University, "University is required");
    } else if char_len(&university) > 200 {
        errors.push(Field::University, "University must be at most 200 characters");
    }

    let max_year = current_year + 3;
    let grad_year = draft.grad_year.unwrap_or_default();
    match draft.grad_year {
        None => errors.push(Field::GradYear, "Select your graduation year"),
        Some(year) if year < current_year || year > max_year => errors.push(
            Field::GradYear,
            format!("Graduation year must be between {current_year} and {max_year}"),
        ),
        Some(_) => {}
    }

    if let Some(cv) = &draft.cv_meta {
        if cv.name.trim().is_empty() {
            errors.push(Field::Cv, "CV file name is missing");
        } else if cv.size > MAX_CV_BYTES {
            errors.push(Field::Cv, "File too large");
        } else if cv.mime != PDF_MIME {
            errors.push(Field::Cv, "Please select a PDF file only");
        } else if cv.hash.len() < 10 {
            errors.push(Field::Cv, "CV fingerprint is missing; please re-attach the file");
        }
    }

    let location = collapse_whitespace(draft.location.as_deref().unwrap_or_default());
    if char_len(&location) < 3 {
        errors.push(Field::Location, "Please enter your city and country");
    } else if char_len(&location) > 80 {
        errors.push(Field::Location, "Keep it short (City, Country)");
    }

    if draft.right_to_work.is_none() {
        errors.push(Field::RightToWork, "Select your current right to work status");
    }

    let visa_type = optional_text(&draft.visa_type);
    if visa_type.as_deref().is_some_and(|v| char_len(v) > 40) {
        errors.push(Field::VisaType, "Keep it under 40 characters");
    }

    let visa_expiry = optional_text(&draft.visa_expiry);
    if visa_expiry.as_deref().is_some_and(|v| !MM_YYYY.is_match(v)) {
        errors.push(Field::VisaExpiry, "Use MM/YYYY");
    }

    let github_url = optional_text(&draft.github_url);
    if github_url.as_deref().is_some_and(|u| !is_url(u)) {
        errors.push(Field::GithubUrl, "Please enter a valid GitHub URL");
    }

    let entries = draft.proof_of_work.clone().unwrap_or_default();
    if entries.len() > MAX_PROOF_OF_WORK {
        errors.push(Field::ProofOfWork, "You can add up to two items");
    }
    for (index, entry) in entries.iter().enumerate() {
        let url = entry.url.trim();
        if !url.is_empty() && !is_url(url) {
            errors.push(Field::ProofOfWorkUrl(index), "Enter a valid URL");
        }
        if char_len(&entry.note) > 280 {
            errors.push(Field::ProofOfWorkNote(index), "Max 280 characters");
        }
    }

    let right_to_work = draft.right_to_work.unwrap_or(RightToWork::Rtw);
    let temporary = right_to_work == RightToWork::Temporary;

    errors.into_result(|| Step2Data {
        university,
        grad_year,
        cv_meta: draft.cv_meta.clone(),
        location,
        right_to_work,
        visa_type: visa_type.filter(|_| temporary),
        visa_expiry: visa_expiry.filter(|_| temporary),
        github_url,
        proof_of_work: entries
            .into_iter()
            .filter(|e| !e.is_blank())
            .map(|e| ProofOfWorkEntry {
                url: e.url.trim().to_string(),
                note: e.note.trim().to_string(),
            })
            .collect(),
    })
}

/// Validate interests and skills.
pub fn validate_interests(draft: &FormDraft) -> Result<InterestsData, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let domains = dedup(draft.domain_interests.clone().unwrap_or_default());
    if domains.is_empty() {
        errors.push(Field::DomainInterests, "Pick at least one domain");
    } else if domains.len() > 3 {
        errors.push(Field::DomainInterests, "Pick up to 3");
    } else if let Some(unknown) = domains.iter().find(|d| !DOMAIN_OPTIONS.contains(&d.as_str())) {
        errors.push(Field::DomainInterests, format!("Unknown domain: {unknown}"));
    }

    let raw_roles = dedup(draft.role_interests.clone().unwrap_or_default());
    let roles: Vec<RoleLane> = raw_roles.iter().filter_map(|r| r.parse().ok()).collect();
    if raw_roles.is_empty() {
        errors.push(Field::RoleInterests, "Select at least one role");
    } else if roles.len() != raw_roles.len() {
        errors.push(Field::RoleInterests, "Select roles from the list");
    } else if roles.len() > 3 {
        errors.push(Field::RoleInterests, "Select up to 3");
    }

    let skills = dedup(draft.skills.clone().unwrap_or_default());
    if skills.len() > 10 {
        errors.push(Field::Skills, "Select up to 10");
    } else if skills.iter().any(|s| !(2..=20).contains(&char_len(s))) {
        errors.push(Field::Skills, "Each skill must be between 2 and 20 characters");
    }

    let dream_startups = optional_text(&draft.dream_startups);
    if dream_startups.as_deref().is_some_and(|d| char_len(d) > 200) {
        errors.push(Field::DreamStartups, "Keep it under 200 characters");
    }

    errors.into_result(|| InterestsData {
        domain_interests: domains,
        role_interests: roles,
        skills,
        dream_startups,
    })
}

/// Email shape check used by the basic-details step.
pub fn is_email(s: &str) -> bool {
    !s.starts_with('.') && !s.contains("..") && EMAIL.is_match(s)
}

/// Absolute URL check (`example.com` without a scheme is not a URL).
pub fn is_url(s: &str) -> bool {
    url::Url::parse(s).is_ok_and(|u| u.has_host())
}

fn text(value: &Option<String>) -> String {
    value.as_deref().unwrap_or_default().trim().to_string()
}

fn optional_text(value: &Option<String>) -> Option<String> {
    Some(text(value)).filter(|s| !s.is_empty())
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn dedup(values: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for v in values {
        if !out.contains(&v) {
            out.push(v);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::Datelike;

    use super::*;
    use crate::form::model::CvMeta;

    fn year() -> i32 {
        chrono::Utc::now().year()
    }

    fn step1_draft() -> FormDraft {
        FormDraft {
            first_name: Some("Jane".into()),
            last_name: Some("Smith".into()),
            email: Some("jane@x.com".into()),
            gdpr_consent: Some(true),
            ..Default::default()
        }
    }

    fn step2_draft() -> FormDraft {
        FormDraft {
            university: Some("University of Cambridge".into()),
            grad_year: Some(year() + 1),
            location: Some("  London,   UK ".into()),
            right_to_work: Some(RightToWork::Rtw),
            ..Default::default()
        }
    }

    fn interests_draft() -> FormDraft {
        FormDraft {
            domain_interests: Some(vec!["Fintech".into()]),
            role_interests: Some(vec!["Data Eng".into()]),
            skills: Some(vec!["Python".into(), "dbt".into()]),
            ..Default::default()
        }
    }

    #[test]
    fn valid_step1_passes() {
        let data = validate_step1(&step1_draft()).unwrap();
        assert_eq!(data.first_name, "Jane");
        assert_eq!(data.linkedin_url, None);
        assert!(data.gdpr_consent);
    }

    #[test]
    fn missing_consent_is_rejected_with_consent_message() {
        let mut draft = step1_draft();
        draft.gdpr_consent = None;
        let errors = validate_step1(&draft).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.for_field(Field::GdprConsent),
            Some("You must consent to data processing to continue")
        );

        draft.gdpr_consent = Some(false);
        assert!(validate_step1(&draft).is_err());
    }

    #[test]
    fn step1_collects_every_failure_in_order() {
        let errors = validate_step1(&FormDraft::default()).unwrap_err();
        let fields: Vec<Field> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![Field::FirstName, Field::LastName, Field::Email, Field::GdprConsent]
        );
        assert_eq!(errors.first_field(), Some(Field::FirstName));
        assert_eq!(errors.summary()[0], "First name: First name is required");
    }

    #[test]
    fn linkedin_must_be_a_url_when_present() {
        let mut draft = step1_draft();
        draft.linkedin_url = Some("linkedin.com/in/jane".into());
        let errors = validate_step1(&draft).unwrap_err();
        assert!(errors.for_field(Field::LinkedinUrl).is_some());

        draft.linkedin_url = Some("https://linkedin.com/in/jane".into());
        assert!(validate_step1(&draft).is_ok());

        draft.linkedin_url = Some("   ".into());
        assert_eq!(validate_step1(&draft).unwrap().linkedin_url, None);
    }

    #[test]
    fn email_shapes() {
        assert!(is_email("jane@x.com"));
        assert!(is_email("jane.smith+wl@uni.ac.uk"));
        assert!(!is_email("jane@"));
        assert!(!is_email("jane@x"));
        assert!(!is_email(".jane@x.com"));
        assert!(!is_email("ja..ne@x.com"));
    }

    #[test]
    fn valid_step2_normalizes_location() {
        let data = validate_step2(&step2_draft(), year()).unwrap();
        assert_eq!(data.location, "London, UK");
        assert!(data.proof_of_work.is_empty());
    }

    #[test]
    fn empty_step2_reports_required_fields() {
        let errors = validate_step2(&FormDraft::default(), year()).unwrap_err();
        assert_eq!(errors.for_field(Field::University), Some("University is required"));
        assert_eq!(errors.for_field(Field::GradYear), Some("Select your graduation year"));
        assert!(errors.for_field(Field::Location).is_some());
        assert!(errors.for_field(Field::RightToWork).is_some());
    }

    #[test]
    fn grad_year_bounds() {
        let mut draft = step2_draft();
        for ok in [year(), year() + 3] {
            draft.grad_year = Some(ok);
            assert!(validate_step2(&draft, year()).is_ok(), "{ok}");
        }
        for bad in [year() - 1, year() + 4] {
            draft.grad_year = Some(bad);
            let errors = validate_step2(&draft, year()).unwrap_err();
            let message = errors.for_field(Field::GradYear).unwrap();
            assert!(message.contains(&year().to_string()), "{message}");
        }
    }

    #[test]
    fn visa_fields_only_kept_for_temporary() {
        let mut draft = step2_draft();
        draft.visa_type = Some("Graduate Route".into());
        draft.visa_expiry = Some("09/2027".into());
        assert_eq!(validate_step2(&draft, year()).unwrap().visa_type, None);

        draft.right_to_work = Some(RightToWork::Temporary);
        let data = validate_step2(&draft, year()).unwrap();
        assert_eq!(data.visa_type.as_deref(), Some("Graduate Route"));
        assert_eq!(data.visa_expiry.as_deref(), Some("09/2027"));

        // Optional even when temporary
        draft.visa_type = None;
        draft.visa_expiry = None;
        assert!(validate_step2(&draft, year()).is_ok());

        draft.visa_expiry = Some("2027-09".into());
        let errors = validate_step2(&draft, year()).unwrap_err();
        assert_eq!(errors.for_field(Field::VisaExpiry), Some("Use MM/YYYY"));
    }

    #[test]
    fn proof_of_work_rules() {
        let mut draft = step2_draft();
        draft.proof_of_work = Some(vec![
            ProofOfWorkEntry {
                url: "not a url".into(),
                note: "x".repeat(281),
            },
            ProofOfWorkEntry::default(),
        ]);
        let errors = validate_step2(&draft, year()).unwrap_err();
        assert_eq!(errors.for_field(Field::ProofOfWorkUrl(0)), Some("Enter a valid URL"));
        assert_eq!(errors.for_field(Field::ProofOfWorkNote(0)), Some("Max 280 characters"));

        draft.proof_of_work = Some(vec![ProofOfWorkEntry::default(); 3]);
        let errors = validate_step2(&draft, year()).unwrap_err();
        assert!(errors.for_field(Field::ProofOfWork).is_some());

        draft.proof_of_work = Some(vec![
            ProofOfWorkEntry {
                url: "https://github.com/jane/kv".into(),
                note: "A tiny KV store".into(),
            },
            ProofOfWorkEntry::default(),
        ]);
        let data = validate_step2(&draft, year()).unwrap();
        assert_eq!(data.proof_of_work.len(), 1, "blank entries are dropped");
    }

    #[test]
    fn cv_meta_is_checked() {
        let mut draft = step2_draft();
        draft.cv_meta = Some(CvMeta {
            name: "cv.pdf".into(),
            size: MAX_CV_BYTES + 1,
            mime: PDF_MIME.into(),
            hash: "a".repeat(64),
        });
        let errors = validate_step2(&draft, year()).unwrap_err();
        assert_eq!(errors.for_field(Field::Cv), Some("File too large"));
    }

    #[test]
    fn valid_interests_pass() {
        let data = validate_interests(&interests_draft()).unwrap();
        assert_eq!(data.role_interests, vec![RoleLane::DataEng]);
        assert_eq!(data.skills.len(), 2);
    }

    #[test]
    fn interests_bounds() {
        let errors = validate_interests(&FormDraft::default()).unwrap_err();
        assert_eq!(errors.for_field(Field::DomainInterests), Some("Pick at least one domain"));
        assert_eq!(errors.for_field(Field::RoleInterests), Some("Select at least one role"));
        // Skills are optional
        assert!(errors.for_field(Field::Skills).is_none());

        let mut draft = interests_draft();
        draft.role_interests = Some(
            RoleLane::ALL[..4].iter().map(|r| r.to_string()).collect(),
        );
        draft.skills = Some(vec!["a".into()]);
        draft.dream_startups = Some("x".repeat(201));
        let errors = validate_interests(&draft).unwrap_err();
        assert_eq!(errors.for_field(Field::RoleInterests), Some("Select up to 3"));
        assert!(errors.for_field(Field::Skills).is_some());
        assert!(errors.for_field(Field::DreamStartups).is_some());
    }

    #[test]
    fn unknown_domain_or_role_is_rejected() {
        let mut draft = interests_draft();
        draft.domain_interests = Some(vec!["Basket weaving".into()]);
        draft.role_interests = Some(vec!["Frontend".into()]);
        let errors = validate_interests(&draft).unwrap_err();
        assert!(errors.for_field(Field::DomainInterests).unwrap().contains("Basket weaving"));
        assert!(errors.for_field(Field::RoleInterests).is_some());
    }

    #[test]
    fn clear_field_drops_its_message() {
        let mut errors = validate_step1(&FormDraft::default()).unwrap_err();
        errors.clear_field(Field::Email);
        assert!(errors.for_field(Field::Email).is_none());
        assert_eq!(errors.len(), 3);
    }
}
