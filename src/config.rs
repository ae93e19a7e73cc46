//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

/// Wizard configuration.
#[derive(Debug, Clone)]
pub struct WizardConfig {
    /// Directory holding the persistent key-value file.
    pub data_dir: PathBuf,
    /// Site origin used to build invite links.
    pub origin: String,
    /// Pause between a successful step submit and the step change (fade animation).
    pub transition_delay: Duration,
    /// Simulated latency of the mock submitter.
    pub submit_delay: Duration,
    /// Hours from now at which the referral reminder event starts.
    pub reminder_hours: i64,
    /// Maximum number of skills a candidate may pick.
    pub max_skills: usize,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            origin: "https://talentwharf.com".to_string(),
            transition_delay: Duration::from_millis(300),
            submit_delay: Duration::from_millis(1500),
            reminder_hours: 24,
            max_skills: 10,
        }
    }
}

impl WizardConfig {
    /// Defaults overlaid with `WAITLIST_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reading from an arbitrary lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(dir) = lookup("WAITLIST_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(origin) = lookup("WAITLIST_ORIGIN") {
            config.origin = origin.trim_end_matches('/').to_string();
        }
        if let Some(ms) = lookup("WAITLIST_TRANSITION_MS") {
            config.transition_delay = Duration::from_millis(parse_number("WAITLIST_TRANSITION_MS", &ms)?);
        }
        if let Some(ms) = lookup("WAITLIST_SUBMIT_DELAY_MS") {
            config.submit_delay = Duration::from_millis(parse_number("WAITLIST_SUBMIT_DELAY_MS", &ms)?);
        }
        if let Some(hours) = lookup("WAITLIST_REMINDER_HOURS") {
            config.reminder_hours = parse_number("WAITLIST_REMINDER_HOURS", &hours)?;
        }

        Ok(config)
    }
}

fn parse_number<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("{raw:?}: {e}"),
    })
}
