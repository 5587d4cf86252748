use crate::cli::DmPolicy;
use crate::domain::constants::{
    DEFAULT_EVENT_NAME, DEFAULT_LOG_FILTER, DEFAULT_ROLE_COLOUR, DEFAULT_ROLE_NAME,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

fn default_true() -> bool {
    true
}

fn default_role_name() -> String {
    DEFAULT_ROLE_NAME.to_string()
}

fn default_role_colour() -> String {
    DEFAULT_ROLE_COLOUR.to_string()
}

fn default_event_name() -> String {
    DEFAULT_EVENT_NAME.to_string()
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

#[derive(Serialize)]
pub struct JsonErr {
    pub ok: bool,
    pub error: ErrorBody,
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub general: GeneralConfig,
}

#[derive(Debug, Deserialize)]
pub struct GeneralConfig {
    /// Role that marks a member as enrolled.
    #[serde(default = "default_role_name")]
    pub role_name: String,
    #[serde(default = "default_role_colour")]
    pub role_colour: String,
    #[serde(default = "default_event_name")]
    pub event_name: String,
    /// `tracing_subscriber::EnvFilter` directive, overridden by `RUST_LOG`.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            role_name: default_role_name(),
            role_colour: default_role_colour(),
            event_name: default_event_name(),
            log_filter: default_log_filter(),
        }
    }
}

/// Name of the group (guild) a command runs against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupId(pub String);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One enrolled member. The engine pairs participants, it never edits them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub display_name: String,
    pub handle: String,
}

impl Participant {
    pub fn mention(&self) -> String {
        format!("@{}", self.handle)
    }
}

/// Participants captured once at the start of a run.
///
/// The inner list is private so a snapshot cannot be edited after capture.
#[derive(Debug, Clone, Default)]
pub struct EnrollmentSnapshot {
    participants: Vec<Participant>,
}

impl EnrollmentSnapshot {
    pub fn new(participants: Vec<Participant>) -> Self {
        Self { participants }
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pairing {
    pub giver: Participant,
    pub recipient: Participant,
}

/// Giver to recipient mapping of one run, in shuffled cycle order.
#[derive(Debug, Clone)]
pub struct Assignment {
    pairs: Vec<Pairing>,
}

impl Assignment {
    pub(crate) fn from_pairs(pairs: Vec<Pairing>) -> Self {
        Self { pairs }
    }

    pub fn pairs(&self) -> &[Pairing] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }
}

/// Opaque handle of an opened private channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelHandle(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ack;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered(ChannelHandle),
    Undeliverable { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunResult {
    Completed,
    Aborted(Vec<Participant>),
}

/// Everything one `generate` run produced. Never carries assignment content.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub result: RunResult,
    pub participants: usize,
    /// Givers whose disclosure send failed after the commit decision.
    pub disclosure_failures: Vec<Participant>,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RunOutcome {
    Completed,
    Aborted,
}

#[derive(Serialize)]
pub struct RunSummary {
    pub outcome: RunOutcome,
    pub participants: usize,
    pub undeliverable: Vec<String>,
    pub disclosure_failures: Vec<String>,
}

impl From<&RunReport> for RunSummary {
    fn from(report: &RunReport) -> Self {
        let (outcome, undeliverable) = match &report.result {
            RunResult::Completed => (RunOutcome::Completed, Vec::new()),
            RunResult::Aborted(missing) => (
                RunOutcome::Aborted,
                missing.iter().map(|p| p.handle.clone()).collect(),
            ),
        };
        RunSummary {
            outcome,
            participants: report.participants,
            undeliverable,
            disclosure_failures: report
                .disclosure_failures
                .iter()
                .map(|p| p.handle.clone())
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RoleToggleReport {
    pub member: String,
    pub role: String,
    pub action: String,
    /// False when the platform refused the role change.
    pub applied: bool,
    pub reply: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ScheduledEvent {
    pub name: String,
    pub start: DateTime<Utc>,
    pub location: String,
}

// Sandbox platform state. Lives on the platform side of the collaborator
// traits; the engine never sees these types.

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GuildState {
    pub name: String,
    pub owner_id: String,
    #[serde(default = "default_true")]
    pub bot_can_manage_roles: bool,
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub events: Vec<ScheduledEvent>,
    #[serde(default)]
    pub feed: Vec<PostedMessage>,
    #[serde(default)]
    pub private_channels: Vec<PrivateChannel>,
}

impl GuildState {
    pub fn new(name: &str, owner: Member) -> Self {
        Self {
            name: name.to_string(),
            owner_id: owner.id.clone(),
            bot_can_manage_roles: true,
            members: vec![owner],
            roles: Vec::new(),
            events: Vec::new(),
            feed: Vec::new(),
            private_channels: Vec::new(),
        }
    }

    pub fn member(&self, id: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.id == id)
    }

    pub fn member_mut(&mut self, id: &str) -> Option<&mut Member> {
        self.members.iter_mut().find(|m| m.id == id)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Member {
    pub id: String,
    pub display_name: String,
    pub handle: String,
    #[serde(default)]
    pub dms: DmPolicy,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl Member {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn as_participant(&self) -> Participant {
        Participant {
            id: self.id.clone(),
            display_name: self.display_name.clone(),
            handle: self.handle.clone(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Role {
    pub name: String,
    pub colour: String,
    pub mentionable: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PostedMessage {
    pub ts: DateTime<Utc>,
    pub author: String,
    pub text: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PrivateChannel {
    pub id: ChannelHandle,
    pub member_id: String,
    #[serde(default)]
    pub messages: Vec<PostedMessage>,
}
