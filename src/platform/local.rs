use super::{Calendar, Directory, EnrollmentRegistry, Notifier, PlatformError, RoleStatus};
use crate::cli::DmPolicy;
use crate::domain::constants::BOT_AUTHOR;
use crate::domain::models::{
    Ack, ChannelHandle, GroupId, GuildState, Participant, PostedMessage, PrivateChannel, Role,
    ScheduledEvent,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use sha2::{Digest, Sha256};

/// File-backed stand-in for a chat platform guild.
///
/// Holds the whole guild in memory; callers load it from and save it to
/// `services::storage`. The lock is never held across an await point.
pub struct LocalGuild {
    group: GroupId,
    role_name: String,
    state: Mutex<Option<GuildState>>,
}

pub fn channel_id(guild: &str, member_id: &str) -> ChannelHandle {
    let mut hasher = Sha256::new();
    hasher.update(guild.as_bytes());
    hasher.update(b":");
    hasher.update(member_id.as_bytes());
    let digest = hex::encode(hasher.finalize());
    ChannelHandle(format!("dm-{}", &digest[..16]))
}

fn bot_message(text: &str) -> PostedMessage {
    PostedMessage {
        ts: chrono::Utc::now(),
        author: BOT_AUTHOR.to_string(),
        text: text.to_string(),
    }
}

impl LocalGuild {
    pub fn new(group: GroupId, role_name: &str, state: Option<GuildState>) -> Self {
        Self {
            group,
            role_name: role_name.to_string(),
            state: Mutex::new(state),
        }
    }

    pub fn group(&self) -> &GroupId {
        &self.group
    }

    /// Copy of the current guild state, if the guild exists.
    pub fn state(&self) -> Option<GuildState> {
        self.state.lock().clone()
    }

    pub fn replace(&self, state: GuildState) {
        *self.state.lock() = Some(state);
    }

    /// Runs `f` against the guild, failing when it was never initialised.
    pub fn with_state<R>(
        &self,
        f: impl FnOnce(&mut GuildState) -> R,
    ) -> Result<R, PlatformError> {
        let mut guard = self.state.lock();
        match guard.as_mut() {
            Some(state) => Ok(f(state)),
            None => Err(PlatformError::Unavailable(format!(
                "guild `{}` is not initialised",
                self.group
            ))),
        }
    }

    fn check_group(&self, group: &GroupId) -> Result<(), PlatformError> {
        if *group != self.group {
            return Err(PlatformError::Unavailable(format!("unknown guild `{}`", group)));
        }
        Ok(())
    }
}

#[async_trait]
impl EnrollmentRegistry for LocalGuild {
    async fn snapshot(&self, group: &GroupId) -> Result<Vec<Participant>, PlatformError> {
        self.check_group(group)?;
        let role = self.role_name.clone();
        self.with_state(|s| {
            s.members
                .iter()
                .filter(|m| m.has_role(&role))
                .map(|m| m.as_participant())
                .collect()
        })
    }
}

#[async_trait]
impl Notifier for LocalGuild {
    async fn open_private_channel(
        &self,
        participant: &Participant,
    ) -> Result<ChannelHandle, PlatformError> {
        let guild = self.group.0.clone();
        self.with_state(|s| {
            let member = s.member(&participant.id).ok_or_else(|| {
                PlatformError::Forbidden(format!("{} is not a guild member", participant.mention()))
            })?;
            if member.dms == DmPolicy::Blocked {
                return Err(PlatformError::Forbidden(format!(
                    "{} does not accept private messages",
                    participant.mention()
                )));
            }
            let id = channel_id(&guild, &member.id);
            if !s.private_channels.iter().any(|c| c.id == id) {
                s.private_channels.push(PrivateChannel {
                    id: id.clone(),
                    member_id: participant.id.clone(),
                    messages: Vec::new(),
                });
            }
            tracing::debug!(guild = %guild, channel = %id.0, "private channel opened");
            Ok(id)
        })?
    }

    async fn send(&self, channel: &ChannelHandle, text: &str) -> Result<Ack, PlatformError> {
        self.with_state(|s| {
            let member_id = s
                .private_channels
                .iter()
                .find(|c| c.id == *channel)
                .map(|c| c.member_id.clone())
                .ok_or_else(|| PlatformError::Rejected(format!("unknown channel {}", channel.0)))?;
            let accepts = s
                .member(&member_id)
                .map(|m| m.dms == DmPolicy::Open)
                .unwrap_or(false);
            if !accepts {
                return Err(PlatformError::Rejected(
                    "cannot send messages to this user".to_string(),
                ));
            }
            if let Some(c) = s.private_channels.iter_mut().find(|c| c.id == *channel) {
                c.messages.push(bot_message(text));
            }
            Ok(Ack)
        })?
    }

    async fn post_to_group(&self, group: &GroupId, text: &str) -> Result<Ack, PlatformError> {
        self.check_group(group)?;
        self.with_state(|s| s.feed.push(bot_message(text)))?;
        Ok(Ack)
    }
}

#[async_trait]
impl Directory for LocalGuild {
    async fn owner_id(&self, group: &GroupId) -> Result<String, PlatformError> {
        self.check_group(group)?;
        self.with_state(|s| s.owner_id.clone())
    }

    async fn member(
        &self,
        group: &GroupId,
        member_id: &str,
    ) -> Result<Option<Participant>, PlatformError> {
        self.check_group(group)?;
        self.with_state(|s| s.member(member_id).map(|m| m.as_participant()))
    }

    async fn ensure_role(
        &self,
        group: &GroupId,
        role: &str,
        colour: &str,
    ) -> Result<RoleStatus, PlatformError> {
        self.check_group(group)?;
        self.with_state(|s| {
            if s.roles.iter().any(|r| r.name == role) {
                return Ok(RoleStatus::Existing);
            }
            if !s.bot_can_manage_roles {
                return Err(PlatformError::Forbidden("missing manage roles permission".to_string()));
            }
            s.roles.push(Role {
                name: role.to_string(),
                colour: colour.to_string(),
                mentionable: true,
            });
            Ok(RoleStatus::Created)
        })?
    }

    async fn add_role(
        &self,
        group: &GroupId,
        member_id: &str,
        role: &str,
    ) -> Result<Ack, PlatformError> {
        self.check_group(group)?;
        self.with_state(|s| {
            if !s.bot_can_manage_roles {
                return Err(PlatformError::Forbidden("missing manage roles permission".to_string()));
            }
            let member = s
                .member_mut(member_id)
                .ok_or_else(|| {
                    PlatformError::Unavailable(format!("unknown member {}", member_id))
                })?;
            if !member.has_role(role) {
                member.roles.push(role.to_string());
            }
            Ok(Ack)
        })?
    }

    async fn remove_role(
        &self,
        group: &GroupId,
        member_id: &str,
        role: &str,
    ) -> Result<Ack, PlatformError> {
        self.check_group(group)?;
        self.with_state(|s| {
            if !s.bot_can_manage_roles {
                return Err(PlatformError::Forbidden("missing manage roles permission".to_string()));
            }
            let member = s
                .member_mut(member_id)
                .ok_or_else(|| {
                    PlatformError::Unavailable(format!("unknown member {}", member_id))
                })?;
            member.roles.retain(|r| r != role);
            Ok(Ack)
        })?
    }
}

#[async_trait]
impl Calendar for LocalGuild {
    async fn create_scheduled_event(
        &self,
        group: &GroupId,
        event: ScheduledEvent,
    ) -> Result<Ack, PlatformError> {
        self.check_group(group)?;
        self.with_state(|s| {
            tracing::info!(
                guild = %s.name,
                event = %event.name,
                start = %event.start,
                "scheduled event created"
            );
            s.events.push(event);
        })?;
        Ok(Ack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Member;

    fn member(id: &str, dms: DmPolicy) -> Member {
        Member {
            id: id.to_string(),
            display_name: id.to_uppercase(),
            handle: format!("{}_h", id),
            dms,
            roles: Vec::new(),
        }
    }

    fn guild() -> LocalGuild {
        let mut state = GuildState::new("test", member("owner", DmPolicy::Open));
        state.members.push(member("blocked", DmPolicy::Blocked));
        state.members.push(member("rejecting", DmPolicy::Rejecting));
        LocalGuild::new(GroupId("test".to_string()), "Gifter", Some(state))
    }

    #[tokio::test]
    async fn uninitialised_guild_is_unavailable() {
        let g = LocalGuild::new(GroupId("nope".to_string()), "Gifter", None);
        let err = g.snapshot(&GroupId("nope".to_string())).await.unwrap_err();
        assert!(matches!(err, PlatformError::Unavailable(_)));
    }

    #[tokio::test]
    async fn snapshot_follows_role_membership_in_join_order() {
        let g = guild();
        let group = GroupId("test".to_string());
        g.add_role(&group, "rejecting", "Gifter").await.unwrap();
        g.add_role(&group, "owner", "Gifter").await.unwrap();
        let ids: Vec<String> = g
            .snapshot(&group)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec!["owner".to_string(), "rejecting".to_string()]);
    }

    #[tokio::test]
    async fn blocked_members_cannot_be_opened_and_rejecting_members_refuse_sends() {
        let g = guild();
        let state = g.state().unwrap();
        let blocked = state.member("blocked").unwrap().as_participant();
        let rejecting = state.member("rejecting").unwrap().as_participant();

        let err = g.open_private_channel(&blocked).await.unwrap_err();
        assert!(matches!(err, PlatformError::Forbidden(_)));

        let ch = g.open_private_channel(&rejecting).await.unwrap();
        let err = g.send(&ch, "hi").await.unwrap_err();
        assert!(matches!(err, PlatformError::Rejected(_)));
    }

    #[tokio::test]
    async fn channel_ids_are_stable_per_member() {
        let g = guild();
        let owner = g.state().unwrap().member("owner").unwrap().as_participant();
        let a = g.open_private_channel(&owner).await.unwrap();
        let b = g.open_private_channel(&owner).await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a, channel_id("test", "owner"));
        g.send(&a, "one").await.unwrap();
        g.send(&b, "two").await.unwrap();
        let state = g.state().unwrap();
        assert_eq!(state.private_channels.len(), 1);
        assert_eq!(state.private_channels[0].messages.len(), 2);
    }

    #[tokio::test]
    async fn role_creation_needs_permission() {
        let g = guild();
        let group = GroupId("test".to_string());
        g.with_state(|s| s.bot_can_manage_roles = false).unwrap();
        let err = g.ensure_role(&group, "Gifter", "magenta").await.unwrap_err();
        assert!(matches!(err, PlatformError::Forbidden(_)));

        g.with_state(|s| s.bot_can_manage_roles = true).unwrap();
        assert_eq!(
            g.ensure_role(&group, "Gifter", "magenta").await.unwrap(),
            RoleStatus::Created
        );
        assert_eq!(
            g.ensure_role(&group, "Gifter", "magenta").await.unwrap(),
            RoleStatus::Existing
        );
    }

    #[tokio::test]
    async fn other_guilds_are_unavailable() {
        let g = guild();
        let err = g
            .post_to_group(&GroupId("elsewhere".to_string()), "hi")
            .await
            .unwrap_err();
        assert!(matches!(err, PlatformError::Unavailable(_)));
    }
}
