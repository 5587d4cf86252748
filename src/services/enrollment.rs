use crate::domain::constants::NO_ROLE_PERMISSION_REPLY;
use crate::domain::models::{EnrollmentSnapshot, GeneralConfig, GroupId, RoleToggleReport};
use crate::error::SantaError;
use crate::platform::{Directory, EnrollmentRegistry, PlatformError, RoleStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Join,
    Leave,
}

/// Current enrollment, read-only.
pub async fn current_snapshot<R: EnrollmentRegistry + ?Sized>(
    registry: &R,
    group: &GroupId,
) -> Result<EnrollmentSnapshot, SantaError> {
    registry
        .snapshot(group)
        .await
        .map(EnrollmentSnapshot::new)
        .map_err(|err| SantaError::GroupUnavailable(err.to_string()))
}

/// Adds or removes the enrollment role on `member_id`.
///
/// A missing manage-roles permission is answered in the reply rather than
/// returned as an error; the member just sees the bot's complaint.
pub async fn toggle_enrollment<D: Directory + ?Sized>(
    directory: &D,
    group: &GroupId,
    member_id: &str,
    config: &GeneralConfig,
    toggle: Toggle,
) -> Result<RoleToggleReport, SantaError> {
    let member = directory
        .member(group, member_id)
        .await
        .map_err(|err| SantaError::GroupUnavailable(err.to_string()))?
        .ok_or_else(|| SantaError::UnknownMember(member_id.to_string()))?;
    let role = config.role_name.as_str();

    let result = match toggle {
        Toggle::Join => match directory.ensure_role(group, role, &config.role_colour).await {
            Ok(status) => {
                if status == RoleStatus::Created {
                    tracing::info!(group = %group, role = role, "enrollment role created");
                }
                directory.add_role(group, &member.id, role).await
            }
            Err(err) => Err(err),
        },
        Toggle::Leave => directory.remove_role(group, &member.id, role).await,
    };

    let (applied, reply) = match result {
        Ok(_) => {
            let reply = match toggle {
                Toggle::Join => format!("\"{}\" role given to {}.", role, member.display_name),
                Toggle::Leave => format!("\"{}\" role removed from {}.", role, member.display_name),
            };
            (true, reply)
        }
        Err(PlatformError::Forbidden(reason)) => {
            tracing::warn!(group = %group, reason = %reason, "role change refused");
            (false, NO_ROLE_PERMISSION_REPLY.to_string())
        }
        Err(err) => return Err(err.into()),
    };

    Ok(RoleToggleReport {
        member: member.handle,
        role: role.to_string(),
        action: match toggle {
            Toggle::Join => "join",
            Toggle::Leave => "leave",
        }
        .to_string(),
        applied,
        reply,
    })
}
