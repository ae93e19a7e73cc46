//! `Wizard` — coordinates field edits, step submission, the final submit
//! and start-over, persisting the draft after every change.

use std::path::Path;
use std::sync::Arc;

use chrono::{Datelike, Utc};
use tracing::{debug, info, warn};

use crate::config::WizardConfig;
use crate::error::{self, WizardError};
use crate::form::draft::DraftStore;
use crate::form::field::{Field, FieldUpdate};
use crate::form::locations::suggest_locations;
use crate::form::model::{CvMeta, FormDraft, ProofOfWorkEntry, RoleLane};
use crate::form::transform::{capitalize_first, ensure_url_scheme};
use crate::form::validation::{
    ValidationErrors, validate_interests, validate_step1, validate_step2,
};
use crate::ics::ReminderEvent;
use crate::referral::{Attribution, InviteLink};
use crate::skills::catalog::DOMAIN_OPTIONS;
use crate::skills::{SkillPicker, rank_skills};
use crate::store::KeyValueStore;
use crate::submit::{Submission, Submitter};

use super::state::{Focus, Transition, WizardState, WizardStep};

const MAX_ROLES: usize = 3;
const MAX_DOMAINS: usize = 3;

/// One wizard instance: a single candidate filling in the form.
pub struct Wizard {
    config: WizardConfig,
    store: Arc<dyn KeyValueStore>,
    drafts: DraftStore,
    submitter: Arc<dyn Submitter>,
    state: WizardState,
    skills: SkillPicker,
    invite: Option<InviteLink>,
    /// Set once the draft is deleted after a successful submit; nothing
    /// is written again until start-over.
    sealed: bool,
}

impl Wizard {
    /// Build a wizard, resuming any saved draft at Step 1.
    pub fn new(
        config: WizardConfig,
        store: Arc<dyn KeyValueStore>,
        submitter: Arc<dyn Submitter>,
    ) -> Self {
        let drafts = DraftStore::new(store.clone());
        let working = drafts.load().unwrap_or_default();
        if !working.is_empty() {
            info!("Resuming saved application draft");
        }
        let skills = SkillPicker::new(config.max_skills);
        Self {
            config,
            store,
            drafts,
            submitter,
            state: WizardState::resume(working),
            skills,
            invite: None,
            sealed: false,
        }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn step(&self) -> WizardStep {
        self.state.step
    }

    /// The merged working draft.
    pub fn draft(&self) -> &FormDraft {
        &self.state.working
    }

    pub fn focus(&self) -> Focus {
        self.state.focus
    }

    pub fn errors(&self) -> Option<&ValidationErrors> {
        self.state.errors.as_ref()
    }

    /// Inline message for a field on the active step.
    pub fn field_error(&self, field: Field) -> Option<&str> {
        self.state.errors.as_ref()?.for_field(field)
    }

    /// Lines of the aggregated error list; empty when nothing failed.
    pub fn error_summary(&self) -> Vec<String> {
        self.state
            .errors
            .as_ref()
            .map(ValidationErrors::summary)
            .unwrap_or_default()
    }

    pub fn submit_error(&self) -> Option<&str> {
        self.state.submit_error.as_deref()
    }

    /// True while the final submit is in flight; front ends disable the
    /// submit control.
    pub fn is_submitting(&self) -> bool {
        self.state.submitting
    }

    pub fn is_transitioning(&self) -> bool {
        self.state.transitioning
    }

    pub fn submission_id(&self) -> Option<&str> {
        self.state.submission_id.as_deref()
    }

    pub fn config(&self) -> &WizardConfig {
        &self.config
    }

    // ── Field edits ─────────────────────────────────────────────────

    /// Apply a field change on the active step and persist the draft.
    /// Names are capitalized as typed.
    pub fn update(&mut self, update: FieldUpdate) -> Result<(), WizardError> {
        let field = update.field();
        self.ensure_editable(field)?;
        let update = match update {
            FieldUpdate::FirstName(v) => FieldUpdate::FirstName(capitalize_first(&v)),
            FieldUpdate::LastName(v) => FieldUpdate::LastName(capitalize_first(&v)),
            other => other,
        };
        self.state.working.apply(update)?;
        self.touched(field);
        Ok(())
    }

    /// The candidate left a field. URL fields gain an `https://` prefix.
    pub fn blur(&mut self, field: Field) -> Result<(), WizardError> {
        self.ensure_editable(field)?;
        let working = &self.state.working;
        let current = match field {
            Field::LinkedinUrl => working.linkedin_url.clone(),
            Field::GithubUrl => working.github_url.clone(),
            Field::ProofOfWorkUrl(index) => working
                .proof_of_work
                .as_ref()
                .and_then(|entries| entries.get(index))
                .map(|entry| entry.url.clone()),
            _ => None,
        };
        let Some(current) = current else {
            return Ok(());
        };

        let prefixed = ensure_url_scheme(&current);
        if prefixed == current {
            return Ok(());
        }
        let update = match field {
            Field::LinkedinUrl => FieldUpdate::LinkedinUrl(prefixed),
            Field::GithubUrl => FieldUpdate::GithubUrl(prefixed),
            Field::ProofOfWorkUrl(index) => FieldUpdate::ProofOfWorkUrl {
                index,
                url: prefixed,
            },
            _ => return Ok(()),
        };
        self.state.working.apply(update)?;
        self.touched(field);
        Ok(())
    }

    /// Select or deselect a role. Selecting a fourth role is a no-op.
    /// Returns whether the selection changed.
    pub fn toggle_role(&mut self, lane: RoleLane) -> Result<bool, WizardError> {
        self.ensure_editable(Field::RoleInterests)?;
        let roles = self.state.working.role_interests.get_or_insert_with(Vec::new);
        if !toggle(roles, lane.as_str(), MAX_ROLES) {
            return Ok(false);
        }
        self.touched(Field::RoleInterests);
        Ok(true)
    }

    /// Select or deselect a domain from the fixed vocabulary (matched
    /// case-insensitively). Selecting a fourth domain is a no-op.
    pub fn toggle_domain(&mut self, domain: &str) -> Result<bool, WizardError> {
        self.ensure_editable(Field::DomainInterests)?;
        let option = DOMAIN_OPTIONS
            .iter()
            .find(|d| d.eq_ignore_ascii_case(domain.trim()))
            .ok_or_else(|| WizardError::UnknownOption {
                field: Field::DomainInterests,
                value: domain.to_string(),
            })?;
        let domains = self
            .state
            .working
            .domain_interests
            .get_or_insert_with(Vec::new);
        if !toggle(domains, option, MAX_DOMAINS) {
            return Ok(false);
        }
        self.touched(Field::DomainInterests);
        Ok(true)
    }

    /// Add a free-typed skill. `Ok(false)` when it was already selected.
    pub fn add_skill(&mut self, raw: &str) -> Result<bool, WizardError> {
        self.ensure_editable(Field::Skills)?;
        let selection = self.state.working.skills.get_or_insert_with(Vec::new);
        let added = self.skills.add(selection, raw)?;
        if added {
            self.touched(Field::Skills);
        }
        Ok(added)
    }

    pub fn remove_skill(&mut self, skill: &str) -> Result<bool, WizardError> {
        self.ensure_editable(Field::Skills)?;
        let selection = self.state.working.skills.get_or_insert_with(Vec::new);
        let removed = self.skills.remove(selection, skill);
        if removed {
            self.touched(Field::Skills);
        }
        Ok(removed)
    }

    /// Restore the most recently removed skill.
    pub fn undo_skill_removal(&mut self) -> Result<Option<String>, WizardError> {
        self.ensure_editable(Field::Skills)?;
        let selection = self.state.working.skills.get_or_insert_with(Vec::new);
        let restored = self.skills.undo(selection);
        if restored.is_some() {
            self.touched(Field::Skills);
        }
        Ok(restored)
    }

    /// Skill vocabulary ranked for the currently selected roles.
    pub fn skill_suggestions(&self) -> Vec<&'static str> {
        rank_skills(&self.state.working.selected_roles())
    }

    /// Locations matching what has been typed into the location field so far.
    pub fn location_suggestions(&self) -> Vec<&'static str> {
        suggest_locations(self.state.working.location.as_deref().unwrap_or_default())
    }

    pub fn add_proof_of_work(&mut self) -> Result<usize, WizardError> {
        self.ensure_editable(Field::ProofOfWork)?;
        let index = self.state.working.add_proof_of_work()?;
        self.touched(Field::ProofOfWork);
        Ok(index)
    }

    pub fn remove_proof_of_work(&mut self, index: usize) -> Result<ProofOfWorkEntry, WizardError> {
        self.ensure_editable(Field::ProofOfWork)?;
        let removed = self.state.working.remove_proof_of_work(index)?;
        if let Some(errors) = self.state.errors.as_mut() {
            errors.clear_field(Field::ProofOfWorkUrl(index));
            errors.clear_field(Field::ProofOfWorkNote(index));
        }
        self.touched(Field::ProofOfWork);
        Ok(removed)
    }

    /// Accept a picked CV file into the form. Rejected files leave the
    /// form untouched.
    pub fn attach_cv(&mut self, name: &str, mime: &str, bytes: &[u8]) -> error::Result<CvMeta> {
        self.ensure_editable(Field::Cv)?;
        let meta = CvMeta::inspect(name, mime, bytes)?;
        self.update(FieldUpdate::Cv(Some(meta.clone())))?;
        Ok(meta)
    }

    /// Same as [`attach_cv`](Self::attach_cv) for a file on disk.
    pub async fn attach_cv_file(&mut self, path: impl AsRef<Path>) -> error::Result<CvMeta> {
        self.ensure_editable(Field::Cv)?;
        let meta = CvMeta::from_path(path).await?;
        self.update(FieldUpdate::Cv(Some(meta.clone())))?;
        Ok(meta)
    }

    // ── Navigation ──────────────────────────────────────────────────

    /// Validate the active step and move on. On Step 3 this is the final
    /// submit.
    pub async fn submit_step(&mut self) -> Result<WizardStep, WizardError> {
        match self.state.step {
            WizardStep::Step1 => {
                let result = validate_step1(&self.state.working);
                let data = self.validated(result)?;
                self.advance(Transition::CommitStep1(data)).await
            }
            WizardStep::Step2 => {
                let result = validate_step2(&self.state.working, Utc::now().year());
                let data = self.validated(result)?;
                self.advance(Transition::CommitStep2(data)).await
            }
            WizardStep::Step3 => self.submit_application().await,
            WizardStep::Success => Err(WizardError::Finished),
        }
    }

    /// Return to the previous step. Entered data on both steps is kept.
    pub async fn back(&mut self) -> Result<WizardStep, WizardError> {
        if self.state.step.is_terminal() {
            return Err(WizardError::Finished);
        }
        if self.state.step.prev().is_none() {
            return Err(WizardError::AtFirstStep);
        }
        self.persist();
        self.state.apply(Transition::BeginTransition)?;
        self.pause().await;
        self.state.apply(Transition::Back)
    }

    pub fn dismiss_submit_error(&mut self) -> Result<(), WizardError> {
        self.state.apply(Transition::DismissSubmitError).map(|_| ())
    }

    /// Discard everything and begin again at Step 1. The device's
    /// referral token survives.
    pub fn start_over(&mut self) {
        self.drafts.clear();
        self.state = WizardState::default();
        self.skills.reset();
        self.invite = None;
        self.sealed = false;
        info!("Wizard reset");
    }

    // ── Referral affordances ────────────────────────────────────────

    /// This device's invite link, minting the referral token on first use.
    pub fn invite_link(&mut self) -> &InviteLink {
        let store = self.store.as_ref();
        let origin = self.config.origin.as_str();
        self.invite
            .get_or_insert_with(|| InviteLink::for_device(store, origin))
    }

    /// A follow-up reminder starting the configured number of hours from now.
    pub fn reminder(&self) -> ReminderEvent {
        ReminderEvent::referral_follow_up(Utc::now(), self.config.reminder_hours)
    }

    // ── Internals ───────────────────────────────────────────────────

    fn ensure_editable(&self, field: Field) -> Result<(), WizardError> {
        if self.state.step.is_terminal() {
            return Err(WizardError::Finished);
        }
        if field.step() != self.state.step {
            return Err(WizardError::InactiveField {
                field,
                step: self.state.step,
            });
        }
        Ok(())
    }

    /// A field changed: drop its inline error and persist.
    fn touched(&mut self, field: Field) {
        if let Some(errors) = self.state.errors.as_mut() {
            errors.clear_field(field);
            if errors.is_empty() {
                self.state.errors = None;
            }
        }
        self.persist();
    }

    fn persist(&self) {
        if self.sealed {
            debug!("Draft sealed after submission; not saving");
            return;
        }
        self.drafts.save(&self.state.working);
    }

    fn validated<T>(&mut self, result: Result<T, ValidationErrors>) -> Result<T, WizardError> {
        match result {
            Ok(data) => Ok(data),
            Err(errors) => {
                info!(step = %self.state.step, failures = errors.len(), "Step validation failed");
                self.state.apply(Transition::Reject(errors.clone()))?;
                Err(WizardError::Validation(errors))
            }
        }
    }

    async fn advance(&mut self, commit: Transition) -> Result<WizardStep, WizardError> {
        self.persist();
        self.state.apply(Transition::BeginTransition)?;
        self.pause().await;
        let step = self.state.apply(commit)?;
        info!(step = %step, "Advanced to next step");
        Ok(step)
    }

    async fn submit_application(&mut self) -> Result<WizardStep, WizardError> {
        if self.state.submitting {
            return Err(WizardError::SubmitInProgress);
        }
        let result = validate_interests(&self.state.working);
        let interests = self.validated(result)?;
        let (Some(step1), Some(step2)) = (
            self.state.committed_step1.clone(),
            self.state.committed_step2.clone(),
        ) else {
            return Err(WizardError::InvalidTransition {
                from: self.state.step,
                to: WizardStep::Success,
            });
        };

        self.persist();
        self.state.apply(Transition::SubmitStarted)?;
        let submission = Submission::new(
            step1,
            step2,
            interests,
            Attribution::load(self.store.as_ref()),
            Utc::now(),
        );

        let submitter = Arc::clone(&self.submitter);
        let result = {
            let _in_flight = InFlight(&mut self.state);
            submitter.submit(&submission).await
        };
        match result {
            Ok(receipt) => {
                self.drafts.clear();
                self.sealed = true;
                info!(id = %receipt.id, "Application submitted");
                self.state.apply(Transition::Complete { id: receipt.id })
            }
            Err(e) => {
                warn!(error = %e, "Application submission failed");
                self.state.apply(Transition::SubmitFailed(e.to_string()))?;
                Err(WizardError::Submit(e))
            }
        }
    }

    async fn pause(&mut self) {
        let delay = self.config.transition_delay;
        let _in_flight = InFlight(&mut self.state);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Clears the in-flight flags when dropped, so a cancelled transition or
/// submit does not leave the wizard stuck.
struct InFlight<'a>(&'a mut WizardState);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.submitting = false;
        self.0.transitioning = false;
    }
}

/// Toggle `value` in a capped multi-select. Returns whether it changed.
fn toggle(selection: &mut Vec<String>, value: &str, max: usize) -> bool {
    if let Some(pos) = selection.iter().position(|s| s == value) {
        selection.remove(pos);
        true
    } else if selection.len() >= max {
        false
    } else {
        selection.push(value.to_string());
        true
    }
}
