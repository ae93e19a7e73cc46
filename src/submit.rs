//! Final submission: the outbound record and the seam to the backing store.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::SubmitError;
use crate::form::model::{InterestsData, Step1Data, Step2Data};
use crate::referral::Attribution;

// ── Outbound record ─────────────────────────────────────────────────

/// The full merged application sent on final submit.
///
/// Serializes flat, with the same camelCase keys as the persisted draft
/// plus submission metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    #[serde(flatten)]
    pub step1: Step1Data,
    #[serde(flatten)]
    pub step2: Step2Data,
    #[serde(flatten)]
    pub interests: InterestsData,
    pub submitted_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referral_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utm_source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utm_medium: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utm_campaign: Option<String>,
}

impl Submission {
    pub fn new(
        step1: Step1Data,
        step2: Step2Data,
        interests: InterestsData,
        attribution: Attribution,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            step1,
            step2,
            interests,
            submitted_at,
            referral_token: attribution.referral_token,
            utm_source: attribution.utm_source,
            utm_medium: attribution.utm_medium,
            utm_campaign: attribution.utm_campaign,
        }
    }
}

/// Acknowledgement of an accepted submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub id: String,
}

/// Wire shape of a submission result: `{success: true, id}` or
/// `{success: false, error}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SubmitOutcome {
    /// Interpret a wire response. A success without an id is malformed.
    pub fn into_result(self) -> Result<SubmissionReceipt, SubmitError> {
        match (self.success, self.id) {
            (true, Some(id)) => Ok(SubmissionReceipt { id }),
            (true, None) => Err(SubmitError::Transport(
                "Response reported success without an id".to_string(),
            )),
            (false, _) => Err(SubmitError::Rejected(
                self.error
                    .unwrap_or_else(|| "Submission failed. Please try again.".to_string()),
            )),
        }
    }
}

impl From<&Result<SubmissionReceipt, SubmitError>> for SubmitOutcome {
    fn from(result: &Result<SubmissionReceipt, SubmitError>) -> Self {
        match result {
            Ok(receipt) => Self {
                success: true,
                id: Some(receipt.id.clone()),
                error: None,
            },
            Err(e) => Self {
                success: false,
                id: None,
                error: Some(e.to_string()),
            },
        }
    }
}

// ── Submitter seam ──────────────────────────────────────────────────

/// Backing store that receives finished applications.
#[async_trait]
pub trait Submitter: Send + Sync {
    async fn submit(&self, submission: &Submission) -> Result<SubmissionReceipt, SubmitError>;
}

/// In-process submitter: waits a fixed latency, then accepts (or fails
/// with a configured error). Keeps every submission it accepted.
pub struct MockSubmitter {
    delay: Duration,
    failure: Mutex<Option<SubmitError>>,
    accepted: Mutex<Vec<Submission>>,
}

impl MockSubmitter {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            failure: Mutex::new(None),
            accepted: Mutex::new(Vec::new()),
        }
    }

    /// A submitter with no latency.
    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Fail every call with `error` until cleared.
    pub fn set_failure(&self, error: Option<SubmitError>) {
        if let Ok(mut failure) = self.failure.lock() {
            *failure = error;
        }
    }

    /// Submissions accepted so far.
    pub fn accepted(&self) -> Vec<Submission> {
        self.accepted
            .lock()
            .map(|a| a.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Submitter for MockSubmitter {
    async fn submit(&self, submission: &Submission) -> Result<SubmissionReceipt, SubmitError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let failure = self
            .failure
            .lock()
            .map_err(|_| SubmitError::Transport("submitter state poisoned".to_string()))?
            .clone();
        if let Some(error) = failure {
            return Err(error);
        }

        let id = Uuid::new_v4().to_string();
        self.accepted
            .lock()
            .map_err(|_| SubmitError::Transport("submitter state poisoned".to_string()))?
            .push(submission.clone());
        info!(id = %id, email = %submission.step1.email, "Application accepted");
        Ok(SubmissionReceipt { id })
    }
}
