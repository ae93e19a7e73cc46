//! Wizard state machine: which step is active and what has been committed.

use serde::{Deserialize, Serialize};

use crate::error::WizardError;
use crate::form::field::Field;
use crate::form::model::{FormDraft, Step1Data, Step2Data};
use crate::form::validation::ValidationErrors;

/// The steps of the waitlist form.
///
/// Progresses linearly: Step1 → Step2 → Step3 → Success. Steps 2 and 3
/// may go back one step; Success is terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    #[default]
    Step1,
    Step2,
    Step3,
    Success,
}

impl WizardStep {
    /// Check if a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: WizardStep) -> bool {
        use WizardStep::*;
        matches!(
            (self, target),
            (Step1, Step2) | (Step2, Step3) | (Step3, Success) | (Step2, Step1) | (Step3, Step2)
        )
    }

    /// Whether the wizard is done for this session.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// The next step in the linear progression, if any.
    pub fn next(&self) -> Option<WizardStep> {
        use WizardStep::*;
        match self {
            Step1 => Some(Step2),
            Step2 => Some(Step3),
            Step3 => Some(Success),
            Success => None,
        }
    }

    /// The step "back" returns to, if any.
    pub fn prev(&self) -> Option<WizardStep> {
        use WizardStep::*;
        match self {
            Step2 => Some(Step1),
            Step3 => Some(Step2),
            Step1 | Success => None,
        }
    }

    /// 1-based position among the form steps; `None` for Success.
    pub fn number(&self) -> Option<u8> {
        match self {
            Self::Step1 => Some(1),
            Self::Step2 => Some(2),
            Self::Step3 => Some(3),
            Self::Success => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Step1 => "Basic details",
            Self::Step2 => "Education, location & work",
            Self::Step3 => "Interests & skills",
            Self::Success => "You're on the list",
        }
    }

    /// Where focus lands when the step becomes active.
    pub fn entry_focus(&self) -> Focus {
        match self {
            Self::Step1 => Focus::Field(Field::FirstName),
            Self::Step2 => Focus::Field(Field::University),
            Self::Step3 => Focus::Field(Field::DomainInterests),
            Self::Success => Focus::Confirmation,
        }
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Step1 => "step1",
            Self::Step2 => "step2",
            Self::Step3 => "step3",
            Self::Success => "success",
        };
        write!(f, "{s}")
    }
}

/// What should hold input focus after the last state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Field(Field),
    /// The aggregated error list at the top of the step.
    ErrorSummary,
    /// The dismissible submission error banner.
    SubmitError,
    /// The success confirmation heading.
    Confirmation,
}

/// An event that moves the wizard.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Step 1 validated; its data moves into the session.
    CommitStep1(Step1Data),
    /// Step 2 validated.
    CommitStep2(Step2Data),
    /// Validation passed; the fade before the step change has begun.
    BeginTransition,
    /// Validation failed on the active step.
    Reject(ValidationErrors),
    /// Final submission is in flight.
    SubmitStarted,
    SubmitFailed(String),
    /// The backing store accepted the application.
    Complete { id: String },
    Back,
    DismissSubmitError,
}

/// Everything one wizard instance holds.
#[derive(Debug, Clone, PartialEq)]
pub struct WizardState {
    pub step: WizardStep,
    pub committed_step1: Option<Step1Data>,
    pub committed_step2: Option<Step2Data>,
    /// The merged draft the candidate is editing. Holds every step's
    /// fields, so going back never loses data.
    pub working: FormDraft,
    pub transitioning: bool,
    pub submitting: bool,
    pub errors: Option<ValidationErrors>,
    pub submit_error: Option<String>,
    pub submission_id: Option<String>,
    pub focus: Focus,
}

impl Default for WizardState {
    fn default() -> Self {
        Self::resume(FormDraft::default())
    }
}

impl WizardState {
    /// Start at Step 1 with previously saved values loaded.
    pub fn resume(working: FormDraft) -> Self {
        Self {
            step: WizardStep::Step1,
            committed_step1: None,
            committed_step2: None,
            working,
            transitioning: false,
            submitting: false,
            errors: None,
            submit_error: None,
            submission_id: None,
            focus: WizardStep::Step1.entry_focus(),
        }
    }

    /// Apply a transition. Returns the step active afterwards.
    ///
    /// Nothing applies once Success is reached; starting over builds a
    /// fresh state instead.
    pub fn apply(&mut self, transition: Transition) -> Result<WizardStep, WizardError> {
        if self.step.is_terminal() {
            return Err(WizardError::Finished);
        }

        match transition {
            Transition::CommitStep1(data) => {
                self.expect_step(WizardStep::Step1)?;
                self.committed_step1 = Some(data);
                self.move_to(WizardStep::Step2)?;
            }
            Transition::CommitStep2(data) => {
                self.expect_step(WizardStep::Step2)?;
                self.committed_step2 = Some(data);
                self.move_to(WizardStep::Step3)?;
            }
            Transition::BeginTransition => {
                self.errors = None;
                self.transitioning = true;
            }
            Transition::Reject(errors) => {
                self.transitioning = false;
                self.errors = Some(errors);
                self.focus = Focus::ErrorSummary;
            }
            Transition::SubmitStarted => {
                self.expect_step(WizardStep::Step3)?;
                if self.submitting {
                    return Err(WizardError::SubmitInProgress);
                }
                self.errors = None;
                self.submit_error = None;
                self.submitting = true;
            }
            Transition::SubmitFailed(message) => {
                self.submitting = false;
                self.transitioning = false;
                self.submit_error = Some(message);
                self.focus = Focus::SubmitError;
            }
            Transition::Complete { id } => {
                self.expect_step(WizardStep::Step3)?;
                self.move_to(WizardStep::Success)?;
                self.submitting = false;
                self.submission_id = Some(id);
                self.working = FormDraft::default();
            }
            Transition::Back => {
                let prev = self.step.prev().ok_or(WizardError::AtFirstStep)?;
                self.move_to(prev)?;
            }
            Transition::DismissSubmitError => {
                self.submit_error = None;
                if self.focus == Focus::SubmitError {
                    self.focus = self.step.entry_focus();
                }
            }
        }
        Ok(self.step)
    }

    fn expect_step(&self, expected: WizardStep) -> Result<(), WizardError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(WizardError::InvalidTransition {
                from: self.step,
                to: expected.next().unwrap_or(expected),
            })
        }
    }

    fn move_to(&mut self, target: WizardStep) -> Result<(), WizardError> {
        if !self.step.can_transition_to(target) {
            return Err(WizardError::InvalidTransition {
                from: self.step,
                to: target,
            });
        }
        self.step = target;
        self.transitioning = false;
        self.errors = None;
        self.focus = target.entry_focus();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::model::RightToWork;

    fn step1() -> Step1Data {
        Step1Data {
            first_name: "Jane".into(),
            last_name: "Smith".into(),
            email: "jane@x.com".into(),
            linkedin_url: None,
            gdpr_consent: true,
        }
    }

    fn step2() -> Step2Data {
        Step2Data {
            university: "UCL".into(),
            grad_year: 2027,
            cv_meta: None,
            location: "London, UK".into(),
            right_to_work: RightToWork::Sponsor,
            visa_type: None,
            visa_expiry: None,
            github_url: None,
            proof_of_work: Vec::new(),
        }
    }

    #[test]
    fn valid_transitions() {
        use WizardStep::*;
        let transitions = [
            (Step1, Step2),
            (Step2, Step3),
            (Step3, Success),
            (Step2, Step1),
            (Step3, Step2),
        ];
        for (from, to) in transitions {
            assert!(from.can_transition_to(to), "{from} should transition to {to}");
        }
    }

    #[test]
    fn invalid_transitions() {
        use WizardStep::*;
        // Skip steps
        assert!(!Step1.can_transition_to(Step3));
        assert!(!Step1.can_transition_to(Success));
        assert!(!Step3.can_transition_to(Step1));
        // Leave terminal
        assert!(!Success.can_transition_to(Step1));
        assert!(!Success.can_transition_to(Step3));
        // Self-transition
        assert!(!Step2.can_transition_to(Step2));
    }

    #[test]
    fn next_and_prev() {
        assert_eq!(WizardStep::Step1.next(), Some(WizardStep::Step2));
        assert_eq!(WizardStep::Success.next(), None);
        assert_eq!(WizardStep::Step3.prev(), Some(WizardStep::Step2));
        assert_eq!(WizardStep::Step1.prev(), None);
        assert_eq!(WizardStep::Success.prev(), None);
        assert!(WizardStep::Success.is_terminal());
        assert!(!WizardStep::Step3.is_terminal());
    }

    #[test]
    fn display_matches_serde() {
        for step in [
            WizardStep::Step1,
            WizardStep::Step2,
            WizardStep::Step3,
            WizardStep::Success,
        ] {
            let json = serde_json::to_string(&step).unwrap();
            assert_eq!(json, format!("\"{step}\""));
        }
    }

    #[test]
    fn commits_advance_and_move_focus() {
        let mut state = WizardState::default();
        assert_eq!(state.focus, Focus::Field(Field::FirstName));

        assert_eq!(state.apply(Transition::CommitStep1(step1())).unwrap(), WizardStep::Step2);
        assert_eq!(state.focus, Focus::Field(Field::University));
        assert_eq!(state.committed_step1, Some(step1()));

        assert_eq!(state.apply(Transition::CommitStep2(step2())).unwrap(), WizardStep::Step3);
        assert_eq!(state.focus, Focus::Field(Field::DomainInterests));
    }

    #[test]
    fn transitioning_spans_begin_to_commit() {
        let mut state = WizardState::default();
        state.apply(Transition::BeginTransition).unwrap();
        assert!(state.transitioning);
        assert_eq!(state.step, WizardStep::Step1);

        state.apply(Transition::CommitStep1(step1())).unwrap();
        assert!(!state.transitioning);
        assert_eq!(state.step, WizardStep::Step2);
    }

    #[test]
    fn commit_for_wrong_step_is_rejected() {
        let mut state = WizardState::default();
        let err = state.apply(Transition::CommitStep2(step2())).unwrap_err();
        assert!(matches!(err, WizardError::InvalidTransition { .. }));
        assert_eq!(state.step, WizardStep::Step1);
    }

    #[test]
    fn reject_keeps_step_and_focuses_summary() {
        let mut state = WizardState::default();
        let mut errors = ValidationErrors::new();
        errors.push(Field::Email, "Please enter a valid email address");
        state.apply(Transition::BeginTransition).unwrap();
        state.apply(Transition::Reject(errors)).unwrap();
        assert_eq!(state.step, WizardStep::Step1);
        assert_eq!(state.focus, Focus::ErrorSummary);
        assert!(!state.transitioning);
        assert!(state.errors.is_some());
    }

    #[test]
    fn back_keeps_committed_and_working_data() {
        let mut state = WizardState::default();
        state.working.first_name = Some("Jane".into());
        state.apply(Transition::CommitStep1(step1())).unwrap();
        state.working.university = Some("UCL".into());

        assert_eq!(state.apply(Transition::Back).unwrap(), WizardStep::Step1);
        assert_eq!(state.committed_step1, Some(step1()));
        assert_eq!(state.working.university.as_deref(), Some("UCL"));

        assert!(matches!(state.apply(Transition::Back), Err(WizardError::AtFirstStep)));
    }

    #[test]
    fn failed_submit_keeps_data() {
        let mut state = WizardState::default();
        state.apply(Transition::CommitStep1(step1())).unwrap();
        state.apply(Transition::CommitStep2(step2())).unwrap();
        state.working.skills = Some(vec!["Rust".into()]);

        state.apply(Transition::SubmitStarted).unwrap();
        assert!(matches!(
            state.apply(Transition::SubmitStarted),
            Err(WizardError::SubmitInProgress)
        ));
        state.apply(Transition::SubmitFailed("Network down".into())).unwrap();

        assert_eq!(state.step, WizardStep::Step3);
        assert!(!state.submitting);
        assert_eq!(state.submit_error.as_deref(), Some("Network down"));
        assert_eq!(state.focus, Focus::SubmitError);
        assert_eq!(state.working.skills, Some(vec!["Rust".to_string()]));

        state.apply(Transition::DismissSubmitError).unwrap();
        assert_eq!(state.submit_error, None);
        assert_eq!(state.focus, Focus::Field(Field::DomainInterests));
    }

    #[test]
    fn success_is_terminal() {
        let mut state = WizardState::default();
        state.apply(Transition::CommitStep1(step1())).unwrap();
        state.apply(Transition::CommitStep2(step2())).unwrap();
        state.apply(Transition::SubmitStarted).unwrap();
        state.apply(Transition::Complete { id: "42".into() }).unwrap();

        assert_eq!(state.step, WizardStep::Success);
        assert_eq!(state.focus, Focus::Confirmation);
        assert!(state.working.is_empty());
        assert_eq!(state.submission_id.as_deref(), Some("42"));
        assert!(matches!(state.apply(Transition::Back), Err(WizardError::Finished)));
        assert!(matches!(
            state.apply(Transition::DismissSubmitError),
            Err(WizardError::Finished)
        ));
    }
}
