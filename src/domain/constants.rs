pub const DEFAULT_GUILD: &str = "default";
pub const DEFAULT_ROLE_NAME: &str = "Gifter";
pub const DEFAULT_ROLE_COLOUR: &str = "magenta";
pub const DEFAULT_EVENT_NAME: &str = "Secret Santa";
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Author recorded on every message the bot posts.
pub const BOT_AUTHOR: &str = "gifter";

/// Hour of day (UTC) used when `setdate` receives a bare calendar date.
pub const DEFAULT_EVENT_HOUR_UTC: u32 = 18;

pub const HELLO_REPLY: &str = "Hello!";
pub const NO_ROLE_PERMISSION_REPLY: &str = "I do not have permissions to manage roles!";
pub const NO_SANTAS_REPLY: &str = "There are no secret santas!";
pub const GROUP_UNAVAILABLE_REPLY: &str =
    "Secret Santa generation failed: the member list could not be read.";
pub const GENERATION_SUCCESS_REPLY: &str =
    "Secret Santa assignments have been sent! Check your private messages.";
