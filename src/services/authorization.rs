use crate::domain::models::{GroupId, Participant};
use crate::error::SantaError;
use crate::platform::Directory;

pub async fn require_member<D: Directory + ?Sized>(
    directory: &D,
    group: &GroupId,
    member_id: &str,
) -> Result<Participant, SantaError> {
    directory
        .member(group, member_id)
        .await
        .map_err(|err| SantaError::GroupUnavailable(err.to_string()))?
        .ok_or_else(|| SantaError::UnknownMember(member_id.to_string()))
}

/// Owner-only gate used by `generate` and `setdate`.
pub async fn require_owner<D: Directory + ?Sized>(
    directory: &D,
    group: &GroupId,
    member_id: &str,
    command: &str,
) -> Result<Participant, SantaError> {
    let member = require_member(directory, group, member_id).await?;
    let owner = directory
        .owner_id(group)
        .await
        .map_err(|err| SantaError::GroupUnavailable(err.to_string()))?;
    if member.id != owner {
        tracing::warn!(
            group = %group,
            member = %member.handle,
            command = command,
            "owner-only command refused"
        );
        return Err(SantaError::NotOwner {
            command: command.to_string(),
        });
    }
    Ok(member)
}
