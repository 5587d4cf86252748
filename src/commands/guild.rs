use crate::cli::{Cli, DmPolicy, GuildCommands, PermissionMode};
use crate::domain::models::{GuildState, Member, PostedMessage};
use crate::error::SantaError;
use crate::platform::local::LocalGuild;
use crate::services::output::{print_one, print_out};
use crate::services::storage::audit;

fn new_member(id: &str, name: &str, handle: &str, dms: DmPolicy) -> Member {
    Member {
        id: id.to_string(),
        display_name: name.to_string(),
        handle: handle.trim_start_matches('@').to_string(),
        dms,
        roles: Vec::new(),
    }
}

/// Applies `f` to the guild, mapping a missing guild to `GroupUnavailable`.
fn edit<R>(
    guild: &LocalGuild,
    f: impl FnOnce(&mut GuildState) -> Result<R, SantaError>,
) -> Result<R, SantaError> {
    guild
        .with_state(f)
        .map_err(|err| SantaError::GroupUnavailable(err.to_string()))?
}

fn message_row(m: &PostedMessage) -> String {
    format!("{}\t{}\t{}", m.ts.format("%Y-%m-%d %H:%M:%S"), m.author, m.text)
}

pub fn handle_guild_commands(
    cli: &Cli,
    command: &GuildCommands,
    guild: &LocalGuild,
) -> anyhow::Result<()> {
    let group = guild.group().clone();
    match command {
        GuildCommands::Init {
            owner,
            name,
            handle,
        } => {
            if guild.state().is_some() {
                anyhow::bail!("guild `{}` is already initialised", group);
            }
            let state = GuildState::new(&group.0, new_member(owner, name, handle, DmPolicy::Open));
            guild.replace(state);
            audit("guild_init", serde_json::json!({"guild": group.0, "owner": owner}));
            print_one(cli.json, &group.0, |g| format!("initialised guild {}", g))?;
        }
        GuildCommands::AddMember {
            id,
            name,
            handle,
            dms,
        } => {
            let member = new_member(id, name, handle, *dms);
            edit(guild, |s| {
                if s.member(id).is_some() {
                    return Err(SantaError::DuplicateMember(id.clone()));
                }
                s.members.push(member.clone());
                Ok(())
            })?;
            audit("guild_add_member", serde_json::json!({"guild": group.0, "member": id}));
            print_one(cli.json, member, |m| {
                format!("added {} (@{}) to {}", m.display_name, m.handle, group)
            })?;
        }
        GuildCommands::SetDms { id, policy } => {
            edit(guild, |s| {
                let member = s
                    .member_mut(id)
                    .ok_or_else(|| SantaError::UnknownMember(id.clone()))?;
                member.dms = *policy;
                Ok(())
            })?;
            audit(
                "guild_set_dms",
                serde_json::json!({"guild": group.0, "member": id, "policy": policy}),
            );
            print_one(cli.json, policy, |p| format!("{} private messages: {:?}", id, p))?;
        }
        GuildCommands::RolePermission { mode } => {
            let allowed = *mode == PermissionMode::Allow;
            edit(guild, |s| {
                s.bot_can_manage_roles = allowed;
                Ok(())
            })?;
            audit(
                "guild_role_permission",
                serde_json::json!({"guild": group.0, "allowed": allowed}),
            );
            print_one(cli.json, allowed, |a| format!("bot can manage roles: {}", a))?;
        }
        GuildCommands::Inbox { id } => {
            let messages = edit(guild, |s| {
                if s.member(id).is_none() {
                    return Err(SantaError::UnknownMember(id.clone()));
                }
                Ok(s.private_channels
                    .iter()
                    .filter(|c| c.member_id == *id)
                    .flat_map(|c| c.messages.iter().cloned())
                    .collect::<Vec<_>>())
            })?;
            print_out(cli.json, &messages, message_row)?;
        }
        GuildCommands::Feed => {
            let feed = edit(guild, |s| Ok(s.feed.clone()))?;
            print_out(cli.json, &feed, message_row)?;
        }
        GuildCommands::Show => {
            let state = edit(guild, |s| Ok(s.clone()))?;
            print_one(cli.json, state, |s| {
                let mut lines = vec![
                    format!("guild: {}", s.name),
                    format!("owner: {}", s.owner_id),
                    format!("bot can manage roles: {}", s.bot_can_manage_roles),
                ];
                for m in &s.members {
                    lines.push(format!(
                        "member: {}\t{}\t@{}\tdms={:?}\troles={}",
                        m.id,
                        m.display_name,
                        m.handle,
                        m.dms,
                        m.roles.join(",")
                    ));
                }
                for e in &s.events {
                    lines.push(format!(
                        "event: {}\t{}\t{}",
                        e.name,
                        e.start.to_rfc3339(),
                        e.location
                    ));
                }
                lines.join("\n")
            })?;
        }
    }
    Ok(())
}
