use crate::platform::PlatformError;

#[derive(thiserror::Error, Debug)]
pub enum SantaError {
    #[error("group unavailable: {0}")]
    GroupUnavailable(String),
    #[error("not enough participants: {enrolled} enrolled, at least 2 required")]
    NotEnoughParticipants { enrolled: usize },
    #[error("only the guild owner can run `{command}`")]
    NotOwner { command: String },
    #[error("unknown member: {0}")]
    UnknownMember(String),
    #[error("member already exists: {0}")]
    DuplicateMember(String),
    #[error("invalid date: {0}")]
    InvalidDate(String),
    #[error(transparent)]
    Platform(#[from] PlatformError),
}

impl SantaError {
    /// Stable code used in `--json` error output.
    pub fn code(&self) -> &'static str {
        match self {
            SantaError::GroupUnavailable(_) => "GROUP_UNAVAILABLE",
            SantaError::NotEnoughParticipants { .. } => "NOT_ENOUGH_PARTICIPANTS",
            SantaError::NotOwner { .. } => "NOT_OWNER",
            SantaError::UnknownMember(_) => "UNKNOWN_MEMBER",
            SantaError::DuplicateMember(_) => "DUPLICATE_MEMBER",
            SantaError::InvalidDate(_) => "INVALID_DATE",
            SantaError::Platform(_) => "PLATFORM_ERROR",
        }
    }
}

/// Code for an arbitrary error chain, `INTERNAL` when no `SantaError` is in it.
pub fn error_code(err: &anyhow::Error) -> &'static str {
    err.chain()
        .find_map(|e| e.downcast_ref::<SantaError>())
        .map(SantaError::code)
        .unwrap_or("INTERNAL")
}

#[cfg(test)]
mod tests {
    use super::{error_code, SantaError};
    use crate::platform::PlatformError;

    #[test]
    fn codes_survive_anyhow_context() {
        let err = anyhow::Error::new(SantaError::NotOwner {
            command: "generate".to_string(),
        })
        .context("running command");
        assert_eq!(error_code(&err), "NOT_OWNER");
    }

    #[test]
    fn foreign_errors_are_internal() {
        let err = anyhow::anyhow!("disk full");
        assert_eq!(error_code(&err), "INTERNAL");
    }

    #[test]
    fn platform_errors_convert() {
        let err: SantaError = PlatformError::Forbidden("missing permission".to_string()).into();
        assert_eq!(err.code(), "PLATFORM_ERROR");
        assert_eq!(err.to_string(), "forbidden: missing permission");
    }
}
