//! Chat-platform collaborator contracts.
//!
//! The engine and the command handlers only talk to the platform through the
//! traits below. `local.rs` is the file-backed sandbox implementation used by
//! the CLI and the integration tests.
//!
//! ## Contracts
//! - `EnrollmentRegistry` — who is enrolled right now.
//! - `Notifier` — private channels and the group channel.
//! - `Directory` — ownership, membership and role toggling.
//! - `Calendar` — scheduled group events.

pub mod local;

use crate::domain::models::{Ack, ChannelHandle, GroupId, Participant, ScheduledEvent};
use async_trait::async_trait;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("rejected: {0}")]
    Rejected(String),
    #[error("unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait EnrollmentRegistry: Send + Sync {
    /// Members currently carrying the enrollment role, in a stable order.
    async fn snapshot(&self, group: &GroupId) -> Result<Vec<Participant>, PlatformError>;
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn open_private_channel(
        &self,
        participant: &Participant,
    ) -> Result<ChannelHandle, PlatformError>;

    async fn send(&self, channel: &ChannelHandle, text: &str) -> Result<Ack, PlatformError>;

    async fn post_to_group(&self, group: &GroupId, text: &str) -> Result<Ack, PlatformError>;
}

/// Outcome of making sure a role exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleStatus {
    Existing,
    Created,
}

#[async_trait]
pub trait Directory: Send + Sync {
    async fn owner_id(&self, group: &GroupId) -> Result<String, PlatformError>;

    async fn member(&self, group: &GroupId, member_id: &str)
        -> Result<Option<Participant>, PlatformError>;

    async fn ensure_role(
        &self,
        group: &GroupId,
        role: &str,
        colour: &str,
    ) -> Result<RoleStatus, PlatformError>;

    async fn add_role(&self, group: &GroupId, member_id: &str, role: &str)
        -> Result<Ack, PlatformError>;

    async fn remove_role(
        &self,
        group: &GroupId,
        member_id: &str,
        role: &str,
    ) -> Result<Ack, PlatformError>;
}

#[async_trait]
pub trait Calendar: Send + Sync {
    async fn create_scheduled_event(
        &self,
        group: &GroupId,
        event: ScheduledEvent,
    ) -> Result<Ack, PlatformError>;
}
