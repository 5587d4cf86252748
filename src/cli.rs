use crate::domain::constants::DEFAULT_GUILD;
use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

#[derive(Parser, Debug)]
#[command(name = "gifter", version, about = "Secret Santa organiser for group chats")]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(
        long,
        global = true,
        default_value = DEFAULT_GUILD,
        help = "Guild (group) the command runs against"
    )]
    pub guild: String,
    #[arg(
        long = "as",
        global = true,
        value_name = "MEMBER_ID",
        help = "Member invoking the command (defaults to the guild owner)"
    )]
    pub as_member: Option<String>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(flatten)]
    Santa(SantaCommands),
    /// Sandbox guild administration
    Guild {
        #[command(subcommand)]
        command: GuildCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum SantaCommands {
    /// Say hello in the group channel
    Hello,
    /// Join secret santa
    Join,
    /// Leave secret santa
    Leave,
    /// Draw assignments and message every participant (owner only)
    Generate,
    /// Schedule the gift exchange event (owner only)
    Setdate {
        /// YYYY-MM-DD or an RFC 3339 timestamp
        date: String,
        location: String,
    },
    /// List enrolled participants
    List,
}

#[derive(Subcommand, Debug)]
pub enum GuildCommands {
    Init {
        #[arg(long)]
        owner: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        handle: String,
    },
    AddMember {
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        handle: String,
        #[arg(long, value_enum, default_value_t = DmPolicy::Open)]
        dms: DmPolicy,
    },
    SetDms {
        id: String,
        #[arg(value_enum)]
        policy: DmPolicy,
    },
    RolePermission {
        #[arg(value_enum)]
        mode: PermissionMode,
    },
    Inbox {
        id: String,
    },
    Feed,
    Show,
}

/// How a member's private messages behave in the sandbox.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DmPolicy {
    /// Channel opens and messages are accepted.
    #[default]
    Open,
    /// Opening a private channel is forbidden.
    Blocked,
    /// Channel opens but every send is rejected.
    Rejecting,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PermissionMode {
    Allow,
    Deny,
}
