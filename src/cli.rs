//! Terminal front end: the command grammar, command execution and the
//! status block printed after every command.

use std::fmt::Write as _;
use std::path::PathBuf;

use tracing::info;

use crate::error::{Error, WizardError};
use crate::form::field::{Field, FieldUpdate};
use crate::form::locations::suggest_locations;
use crate::form::model::RoleLane;
use crate::ics::REMINDER_FILE_NAME;
use crate::wizard::{Focus, Wizard, WizardStep};

pub const HELP: &str = "\
Commands:
  set <field> <value>       e.g. set firstName Jane, set proofOfWork.0.url x.dev
  blur <field>              leave a field (URL fields gain https://)
  toggle role <role>        Backend SWE | ML Platform | Data Eng | Platform-SRE | Solutions Eng
  toggle domain <domain>
  skill add <tag> | skill remove <tag> | skill undo
  pow add | pow remove <index>
  cv <path>                 attach a PDF (max 5 MB)
  locations [query]         search the location list (defaults to the typed location)
  next | back | show | skills | invite | reminder [path]
  dismiss | start-over | help | quit";

/// A parsed terminal command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Set { field: Field, value: String },
    Blur(Field),
    ToggleRole(RoleLane),
    ToggleDomain(String),
    SkillAdd(String),
    SkillRemove(String),
    SkillUndo,
    PowAdd,
    PowRemove(usize),
    Cv(PathBuf),
    Next,
    Back,
    Show,
    Skills,
    Locations(Option<String>),
    Invite,
    Reminder(Option<PathBuf>),
    Dismiss,
    StartOver,
    Help,
    Quit,
}

impl std::str::FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();
        let field = |name: &str| name.parse::<Field>();

        let command = match verb {
            "set" => {
                let (name, value) = rest.split_once(' ').unwrap_or((rest, ""));
                Self::Set {
                    field: field(name)?,
                    value: value.trim().to_string(),
                }
            }
            "blur" => Self::Blur(field(rest)?),
            "toggle" => match rest.split_once(' ') {
                Some(("role", role)) => Self::ToggleRole(role.trim().parse()?),
                Some(("domain", domain)) => Self::ToggleDomain(domain.trim().to_string()),
                _ => return Err("Usage: toggle role|domain <value>".to_string()),
            },
            "skill" => match rest.split_once(' ').unwrap_or((rest, "")) {
                ("add", tag) if !tag.trim().is_empty() => Self::SkillAdd(tag.trim().to_string()),
                ("remove", tag) if !tag.trim().is_empty() => {
                    Self::SkillRemove(tag.trim().to_string())
                }
                ("undo", _) => Self::SkillUndo,
                _ => return Err("Usage: skill add|remove <tag>, skill undo".to_string()),
            },
            "pow" => match rest.split_once(' ').unwrap_or((rest, "")) {
                ("add", _) => Self::PowAdd,
                ("remove", index) => Self::PowRemove(
                    index
                        .trim()
                        .parse()
                        .map_err(|_| format!("Not an index: {}", index.trim()))?,
                ),
                _ => return Err("Usage: pow add, pow remove <index>".to_string()),
            },
            "cv" if !rest.is_empty() => Self::Cv(PathBuf::from(rest)),
            "next" => Self::Next,
            "back" => Self::Back,
            "show" => Self::Show,
            "skills" => Self::Skills,
            "locations" => Self::Locations(Some(rest).filter(|r| !r.is_empty()).map(String::from)),
            "invite" => Self::Invite,
            "reminder" => Self::Reminder(Some(rest).filter(|r| !r.is_empty()).map(PathBuf::from)),
            "dismiss" => Self::Dismiss,
            "start-over" => Self::StartOver,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "/quit" => Self::Quit,
            _ => return Err(format!("Unknown command: {}", verb)),
        };
        Ok(command)
    }
}

/// What the loop does after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue(Option<String>),
    Quit,
}

/// Run one command against the wizard. The returned message, if any, is
/// printed before the status block.
pub async fn execute(wizard: &mut Wizard, command: Command) -> Result<Flow, Error> {
    let message = match command {
        Command::Set { field, value } => {
            let update = FieldUpdate::parse(field, &value)
                .map_err(|message| WizardError::InvalidInput { field, message })?;
            wizard.update(update)?;
            None
        }
        Command::Blur(field) => {
            wizard.blur(field)?;
            None
        }
        Command::ToggleRole(lane) => {
            (!wizard.toggle_role(lane)?).then(|| "You can pick up to 3 roles".to_string())
        }
        Command::ToggleDomain(domain) => {
            (!wizard.toggle_domain(&domain)?).then(|| "You can pick up to 3 domains".to_string())
        }
        Command::SkillAdd(tag) => (!wizard.add_skill(&tag)?).then(|| "Already added".to_string()),
        Command::SkillRemove(tag) => wizard
            .remove_skill(&tag)?
            .then(|| format!("Removed {tag}. Type `skill undo` to restore it.")),
        Command::SkillUndo => wizard
            .undo_skill_removal()?
            .map(|skill| format!("Restored {skill}")),
        Command::PowAdd => {
            let index = wizard.add_proof_of_work()?;
            Some(format!("Added proofOfWork.{index}"))
        }
        Command::PowRemove(index) => {
            wizard.remove_proof_of_work(index)?;
            None
        }
        Command::Cv(path) => {
            let meta = wizard.attach_cv_file(&path).await?;
            Some(format!("Attached {} ({} bytes)", meta.name, meta.size))
        }
        Command::Next => match wizard.submit_step().await? {
            WizardStep::Success => Some(success_message(wizard)),
            _ => None,
        },
        Command::Back => {
            wizard.back().await?;
            None
        }
        Command::Show => Some(
            serde_json::to_string_pretty(wizard.draft())
                .unwrap_or_else(|e| format!("<unprintable draft: {e}>")),
        ),
        Command::Skills => Some(wizard.skill_suggestions().join(", ")),
        Command::Locations(query) => {
            let matches = match query {
                Some(query) => suggest_locations(&query),
                None => wizard.location_suggestions(),
            };
            Some(if matches.is_empty() {
                "No locations found".to_string()
            } else {
                matches.join(" | ")
            })
        }
        Command::Invite => {
            let link = wizard.invite_link();
            Some(format!(
                "{}\n{}\n  WhatsApp: {}\n  Email:    {}",
                link.share_title(),
                link.url,
                link.whatsapp_url(),
                link.mailto_url()
            ))
        }
        Command::Reminder(path) => {
            let path = path.unwrap_or_else(|| PathBuf::from(REMINDER_FILE_NAME));
            tokio::fs::write(&path, wizard.reminder().to_ics()).await?;
            info!(path = %path.display(), "Reminder written");
            Some(format!("Saved reminder to {}", path.display()))
        }
        Command::Dismiss => {
            wizard.dismiss_submit_error()?;
            None
        }
        Command::StartOver => {
            wizard.start_over();
            None
        }
        Command::Help => Some(HELP.to_string()),
        Command::Quit => return Ok(Flow::Quit),
    };
    Ok(Flow::Continue(message))
}

fn success_message(wizard: &mut Wizard) -> String {
    let id = wizard.submission_id().unwrap_or_default().to_string();
    let link = wizard.invite_link().url.clone();
    format!("Application received (ref {id}).\nInvite friends with your link: {link}")
}

/// The status block: active step, focus target and any errors.
pub fn render_status(wizard: &Wizard) -> String {
    let step = wizard.step();
    let mut out = String::new();
    match step.number() {
        Some(n) => {
            let _ = writeln!(out, "[Step {n} of 3] {}", step.title());
        }
        None => {
            let _ = writeln!(out, "[Done] {}", step.title());
        }
    }

    let focus = match wizard.focus() {
        Focus::Field(field) => field.to_string(),
        Focus::ErrorSummary => "error summary".to_string(),
        Focus::SubmitError => "submission error".to_string(),
        Focus::Confirmation => "confirmation".to_string(),
    };
    let _ = writeln!(out, "focus: {focus}");

    let summary = wizard.error_summary();
    if !summary.is_empty() {
        let _ = writeln!(out, "Please fix the following:");
        for line in summary {
            let _ = writeln!(out, "  - {line}");
        }
    }
    if let Some(error) = wizard.submit_error() {
        let _ = writeln!(out, "Submission failed: {error} (type `next` to retry, `dismiss` to hide)");
    }
    if wizard.is_submitting() {
        let _ = writeln!(out, "Submitting...");
    }
    out
}
