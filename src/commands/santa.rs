use crate::cli::{Cli, SantaCommands};
use crate::domain::constants::{GROUP_UNAVAILABLE_REPLY, HELLO_REPLY, NO_SANTAS_REPLY};
use crate::domain::models::{GeneralConfig, GroupId, RunOutcome, RunSummary};
use crate::error::SantaError;
use crate::platform::local::LocalGuild;
use crate::platform::{Directory, Notifier};
use crate::services::authorization::{require_member, require_owner};
use crate::services::engine::Engine;
use crate::services::enrollment::{current_snapshot, toggle_enrollment, Toggle};
use crate::services::output::{print_one, print_out};
use crate::services::schedule::{parse_event_start, schedule_event, schedule_reply};
use crate::services::storage::audit;

/// Member the command runs as: `--as`, or the guild owner.
async fn resolve_invoker(
    cli: &Cli,
    guild: &LocalGuild,
    group: &GroupId,
) -> Result<String, SantaError> {
    match &cli.as_member {
        Some(id) => Ok(id.clone()),
        None => guild
            .owner_id(group)
            .await
            .map_err(|err| SantaError::GroupUnavailable(err.to_string())),
    }
}

/// Group answer for a run that never reached the probe phase.
fn refusal_reply(err: &SantaError) -> Option<String> {
    match err {
        SantaError::NotEnoughParticipants { enrolled: 0 } => Some(NO_SANTAS_REPLY.to_string()),
        SantaError::NotEnoughParticipants { enrolled } => Some(format!(
            "Only {} secret santa enrolled. At least 2 are needed to draw.",
            enrolled
        )),
        SantaError::GroupUnavailable(_) => Some(GROUP_UNAVAILABLE_REPLY.to_string()),
        _ => None,
    }
}

async fn reply(guild: &LocalGuild, group: &GroupId, text: &str) {
    if let Err(err) = guild.post_to_group(group, text).await {
        tracing::warn!(group = %group, error = %err, "group reply failed");
    }
}

pub async fn handle_santa_commands(
    cli: &Cli,
    command: &SantaCommands,
    config: &GeneralConfig,
    guild: &LocalGuild,
) -> anyhow::Result<()> {
    let group = guild.group().clone();
    let invoker = resolve_invoker(cli, guild, &group).await?;

    match command {
        SantaCommands::Hello => {
            require_member(guild, &group, &invoker).await?;
            reply(guild, &group, HELLO_REPLY).await;
            print_one(cli.json, HELLO_REPLY, |s| s.to_string())?;
        }
        SantaCommands::Join | SantaCommands::Leave => {
            let toggle = if matches!(command, SantaCommands::Join) {
                Toggle::Join
            } else {
                Toggle::Leave
            };
            let report = toggle_enrollment(guild, &group, &invoker, config, toggle).await?;
            reply(guild, &group, &report.reply).await;
            audit(
                &report.action,
                serde_json::json!({
                    "guild": group.0,
                    "member": report.member,
                    "applied": report.applied,
                }),
            );
            print_one(cli.json, report, |r| r.reply.clone())?;
        }
        SantaCommands::Generate => {
            require_owner(guild, &group, &invoker, "generate").await?;
            let report = match Engine::new(guild, guild).run(&group).await {
                Ok(report) => report,
                Err(err) => {
                    if let Some(text) = refusal_reply(&err) {
                        reply(guild, &group, &text).await;
                    }
                    return Err(err.into());
                }
            };
            let summary = RunSummary::from(&report);
            audit(
                "generate",
                serde_json::json!({
                    "guild": group.0,
                    "outcome": summary.outcome,
                    "participants": summary.participants,
                    "undeliverable": summary.undeliverable,
                }),
            );
            print_one(cli.json, summary, |s| match s.outcome {
                RunOutcome::Completed if s.disclosure_failures.is_empty() => {
                    format!("completed: {} participants notified", s.participants)
                }
                RunOutcome::Completed => format!(
                    "completed with delivery failures: {}",
                    s.disclosure_failures.join(", ")
                ),
                RunOutcome::Aborted => format!(
                    "aborted: undeliverable {}",
                    s.undeliverable.join(", ")
                ),
            })?;
        }
        SantaCommands::Setdate { date, location } => {
            require_owner(guild, &group, &invoker, "setdate").await?;
            let start = parse_event_start(date, chrono::Utc::now())?;
            let event = schedule_event(guild, &group, &config.event_name, start, location).await?;
            reply(guild, &group, &schedule_reply(&event)).await;
            audit(
                "setdate",
                serde_json::json!({
                    "guild": group.0,
                    "start": event.start.to_rfc3339(),
                    "location": event.location,
                }),
            );
            print_one(cli.json, event, schedule_reply)?;
        }
        SantaCommands::List => {
            require_member(guild, &group, &invoker).await?;
            let snapshot = current_snapshot(guild, &group).await?;
            let text = if snapshot.is_empty() {
                NO_SANTAS_REPLY.to_string()
            } else {
                format!(
                    "Secret santas ({}): {}",
                    snapshot.len(),
                    snapshot
                        .participants()
                        .iter()
                        .map(|p| p.mention())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            };
            reply(guild, &group, &text).await;
            print_out(cli.json, snapshot.participants(), |p| {
                format!("{}\t{}\t{}", p.id, p.display_name, p.mention())
            })?;
        }
    }
    Ok(())
}
