//! Field identifiers and the mutations a front end can apply to a draft.

use crate::error::WizardError;
use crate::wizard::state::WizardStep;

use super::model::{CvMeta, FormDraft, MAX_PROOF_OF_WORK, ProofOfWorkEntry, RightToWork, RoleLane};

/// A form field, addressed the way the persisted draft names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    FirstName,
    LastName,
    Email,
    LinkedinUrl,
    GdprConsent,
    University,
    GradYear,
    Cv,
    Location,
    RightToWork,
    VisaType,
    VisaExpiry,
    GithubUrl,
    /// The proof-of-work list as a whole.
    ProofOfWork,
    ProofOfWorkUrl(usize),
    ProofOfWorkNote(usize),
    DomainInterests,
    RoleInterests,
    Skills,
    DreamStartups,
}

impl Field {
    /// The step whose form owns this field.
    pub fn step(&self) -> WizardStep {
        match self {
            Self::FirstName | Self::LastName | Self::Email | Self::LinkedinUrl | Self::GdprConsent => {
                WizardStep::Step1
            }
            Self::University
            | Self::GradYear
            | Self::Cv
            | Self::Location
            | Self::RightToWork
            | Self::VisaType
            | Self::VisaExpiry
            | Self::GithubUrl
            | Self::ProofOfWork
            | Self::ProofOfWorkUrl(_)
            | Self::ProofOfWorkNote(_) => WizardStep::Step2,
            Self::DomainInterests | Self::RoleInterests | Self::Skills | Self::DreamStartups => {
                WizardStep::Step3
            }
        }
    }

    /// URL-typed fields get an `https://` prefix on blur.
    pub fn is_url(&self) -> bool {
        matches!(self, Self::LinkedinUrl | Self::GithubUrl | Self::ProofOfWorkUrl(_))
    }

    /// Human-readable label used in error summaries.
    pub fn label(&self) -> String {
        match self {
            Self::FirstName => "First name".into(),
            Self::LastName => "Last name".into(),
            Self::Email => "Email".into(),
            Self::LinkedinUrl => "LinkedIn URL".into(),
            Self::GdprConsent => "Consent".into(),
            Self::University => "University".into(),
            Self::GradYear => "Graduation year".into(),
            Self::Cv => "CV".into(),
            Self::Location => "Location".into(),
            Self::RightToWork => "Right to work".into(),
            Self::VisaType => "Visa type".into(),
            Self::VisaExpiry => "Visa expiry".into(),
            Self::GithubUrl => "GitHub/Portfolio URL".into(),
            Self::ProofOfWork => "Proof of work".into(),
            Self::ProofOfWorkUrl(i) => format!("Proof of work #{} URL", i + 1),
            Self::ProofOfWorkNote(i) => format!("Proof of work #{} note", i + 1),
            Self::DomainInterests => "Domains".into(),
            Self::RoleInterests => "Roles".into(),
            Self::Skills => "Skills".into(),
            Self::DreamStartups => "Dream startups".into(),
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FirstName => write!(f, "firstName"),
            Self::LastName => write!(f, "lastName"),
            Self::Email => write!(f, "email"),
            Self::LinkedinUrl => write!(f, "linkedinUrl"),
            Self::GdprConsent => write!(f, "gdprConsent"),
            Self::University => write!(f, "university"),
            Self::GradYear => write!(f, "gradYear"),
            Self::Cv => write!(f, "cvMeta"),
            Self::Location => write!(f, "location"),
            Self::RightToWork => write!(f, "rightToWork"),
            Self::VisaType => write!(f, "visaType"),
            Self::VisaExpiry => write!(f, "visaExpiry"),
            Self::GithubUrl => write!(f, "githubUrl"),
            Self::ProofOfWork => write!(f, "proofOfWork"),
            Self::ProofOfWorkUrl(i) => write!(f, "proofOfWork.{i}.url"),
            Self::ProofOfWorkNote(i) => write!(f, "proofOfWork.{i}.note"),
            Self::DomainInterests => write!(f, "domainInterests"),
            Self::RoleInterests => write!(f, "roleInterests"),
            Self::Skills => write!(f, "skills"),
            Self::DreamStartups => write!(f, "dreamStartups"),
        }
    }
}

impl std::str::FromStr for Field {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(rest) = s.strip_prefix("proofOfWork.") {
            let (index, leaf) = rest
                .split_once('.')
                .ok_or_else(|| format!("Unknown field: {}", s))?;
            let index: usize = index.parse().map_err(|_| format!("Unknown field: {}", s))?;
            return match leaf {
                "url" => Ok(Self::ProofOfWorkUrl(index)),
                "note" => Ok(Self::ProofOfWorkNote(index)),
                _ => Err(format!("Unknown field: {}", s)),
            };
        }
        match s {
            "firstName" => Ok(Self::FirstName),
            "lastName" => Ok(Self::LastName),
            "email" => Ok(Self::Email),
            "linkedinUrl" => Ok(Self::LinkedinUrl),
            "gdprConsent" => Ok(Self::GdprConsent),
            "university" => Ok(Self::University),
            "gradYear" => Ok(Self::GradYear),
            "cvMeta" => Ok(Self::Cv),
            "location" => Ok(Self::Location),
            "rightToWork" => Ok(Self::RightToWork),
            "visaType" => Ok(Self::VisaType),
            "visaExpiry" => Ok(Self::VisaExpiry),
            "githubUrl" => Ok(Self::GithubUrl),
            "proofOfWork" => Ok(Self::ProofOfWork),
            "domainInterests" => Ok(Self::DomainInterests),
            "roleInterests" => Ok(Self::RoleInterests),
            "skills" => Ok(Self::Skills),
            "dreamStartups" => Ok(Self::DreamStartups),
            _ => Err(format!("Unknown field: {}", s)),
        }
    }
}

/// A single field mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    FirstName(String),
    LastName(String),
    Email(String),
    LinkedinUrl(String),
    GdprConsent(bool),
    University(String),
    GradYear(Option<i32>),
    Cv(Option<CvMeta>),
    Location(String),
    RightToWork(Option<RightToWork>),
    VisaType(String),
    VisaExpiry(String),
    GithubUrl(String),
    ProofOfWorkUrl { index: usize, url: String },
    ProofOfWorkNote { index: usize, note: String },
    DomainInterests(Vec<String>),
    RoleInterests(Vec<RoleLane>),
    Skills(Vec<String>),
    DreamStartups(String),
}

impl FieldUpdate {
    /// The field this update writes.
    pub fn field(&self) -> Field {
        match self {
            Self::FirstName(_) => Field::FirstName,
            Self::LastName(_) => Field::LastName,
            Self::Email(_) => Field::Email,
            Self::LinkedinUrl(_) => Field::LinkedinUrl,
            Self::GdprConsent(_) => Field::GdprConsent,
            Self::University(_) => Field::University,
            Self::GradYear(_) => Field::GradYear,
            Self::Cv(_) => Field::Cv,
            Self::Location(_) => Field::Location,
            Self::RightToWork(_) => Field::RightToWork,
            Self::VisaType(_) => Field::VisaType,
            Self::VisaExpiry(_) => Field::VisaExpiry,
            Self::GithubUrl(_) => Field::GithubUrl,
            Self::ProofOfWorkUrl { index, .. } => Field::ProofOfWorkUrl(*index),
            Self::ProofOfWorkNote { index, .. } => Field::ProofOfWorkNote(*index),
            Self::DomainInterests(_) => Field::DomainInterests,
            Self::RoleInterests(_) => Field::RoleInterests,
            Self::Skills(_) => Field::Skills,
            Self::DreamStartups(_) => Field::DreamStartups,
        }
    }

    /// Parse a textual value for `field`, as typed into a terminal or query string.
    pub fn parse(field: Field, raw: &str) -> Result<Self, String> {
        let list = || -> Vec<String> {
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        };
        let update = match field {
            Field::FirstName => Self::FirstName(raw.to_string()),
            Field::LastName => Self::LastName(raw.to_string()),
            Field::Email => Self::Email(raw.to_string()),
            Field::LinkedinUrl => Self::LinkedinUrl(raw.to_string()),
            Field::GdprConsent => Self::GdprConsent(matches!(
                raw.trim().to_ascii_lowercase().as_str(),
                "true" | "yes" | "y" | "1"
            )),
            Field::University => Self::University(raw.to_string()),
            Field::GradYear => {
                let raw = raw.trim();
                if raw.is_empty() {
                    Self::GradYear(None)
                } else {
                    Self::GradYear(Some(
                        raw.parse().map_err(|_| format!("Not a year: {}", raw))?,
                    ))
                }
            }
            Field::Location => Self::Location(raw.to_string()),
            Field::RightToWork => {
                let raw = raw.trim();
                if raw.is_empty() {
                    Self::RightToWork(None)
                } else {
                    Self::RightToWork(Some(raw.parse()?))
                }
            }
            Field::VisaType => Self::VisaType(raw.to_string()),
            Field::VisaExpiry => Self::VisaExpiry(raw.to_string()),
            Field::GithubUrl => Self::GithubUrl(raw.to_string()),
            Field::ProofOfWorkUrl(index) => Self::ProofOfWorkUrl {
                index,
                url: raw.to_string(),
            },
            Field::ProofOfWorkNote(index) => Self::ProofOfWorkNote {
                index,
                note: raw.to_string(),
            },
            Field::DomainInterests => Self::DomainInterests(list()),
            Field::RoleInterests => Self::RoleInterests(
                list()
                    .iter()
                    .map(|s| s.parse())
                    .collect::<Result<Vec<RoleLane>, String>>()?,
            ),
            Field::Skills => Self::Skills(list()),
            Field::DreamStartups => Self::DreamStartups(raw.to_string()),
            Field::Cv | Field::ProofOfWork => {
                return Err(format!("{} cannot be set from text", field));
            }
        };
        Ok(update)
    }
}

impl FormDraft {
    /// Write a field update into the draft.
    pub fn apply(&mut self, update: FieldUpdate) -> Result<(), WizardError> {
        match update {
            FieldUpdate::FirstName(v) => self.first_name = Some(v),
            FieldUpdate::LastName(v) => self.last_name = Some(v),
            FieldUpdate::Email(v) => self.email = Some(v),
            FieldUpdate::LinkedinUrl(v) => self.linkedin_url = Some(v),
            FieldUpdate::GdprConsent(v) => self.gdpr_consent = Some(v),
            FieldUpdate::University(v) => self.university = Some(v),
            FieldUpdate::GradYear(v) => self.grad_year = v,
            FieldUpdate::Cv(v) => self.cv_meta = v,
            FieldUpdate::Location(v) => self.location = Some(v),
            FieldUpdate::RightToWork(v) => self.right_to_work = v,
            FieldUpdate::VisaType(v) => self.visa_type = Some(v),
            FieldUpdate::VisaExpiry(v) => self.visa_expiry = Some(v),
            FieldUpdate::GithubUrl(v) => self.github_url = Some(v),
            FieldUpdate::ProofOfWorkUrl { index, url } => self.proof_of_work_entry(index)?.url = url,
            FieldUpdate::ProofOfWorkNote { index, note } => {
                self.proof_of_work_entry(index)?.note = note
            }
            FieldUpdate::DomainInterests(v) => self.domain_interests = Some(v),
            FieldUpdate::RoleInterests(v) => {
                self.role_interests = Some(v.iter().map(|r| r.as_str().to_string()).collect())
            }
            FieldUpdate::Skills(v) => self.skills = Some(v),
            FieldUpdate::DreamStartups(v) => self.dream_startups = Some(v),
        }
        Ok(())
    }

    /// Mutable access to a proof-of-work entry. Index 0 always exists
    /// (an empty list materializes its first blank entry).
    fn proof_of_work_entry(&mut self, index: usize) -> Result<&mut ProofOfWorkEntry, WizardError> {
        let entries = self.proof_of_work.get_or_insert_with(Vec::new);
        if entries.is_empty() && index == 0 {
            entries.push(ProofOfWorkEntry::default());
        }
        entries
            .get_mut(index)
            .ok_or(WizardError::NoSuchEntry { index })
    }

    /// Append a blank proof-of-work entry. Returns its index.
    pub fn add_proof_of_work(&mut self) -> Result<usize, WizardError> {
        let entries = self.proof_of_work.get_or_insert_with(Vec::new);
        if entries.is_empty() {
            entries.push(ProofOfWorkEntry::default());
        }
        if entries.len() >= MAX_PROOF_OF_WORK {
            return Err(WizardError::EntryLimit(
                "You can add up to two items".to_string(),
            ));
        }
        entries.push(ProofOfWorkEntry::default());
        Ok(entries.len() - 1)
    }

    /// Remove a proof-of-work entry. The first entry is never removable.
    pub fn remove_proof_of_work(&mut self, index: usize) -> Result<ProofOfWorkEntry, WizardError> {
        let entries = self.proof_of_work.get_or_insert_with(Vec::new);
        if index == 0 || index >= entries.len() || entries.len() <= 1 {
            return Err(WizardError::NoSuchEntry { index });
        }
        Ok(entries.remove(index))
    }
}
