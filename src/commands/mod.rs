//! Command handler layer.
//!
//! This module owns CLI-oriented orchestration and output wiring.
//!
//! ## Files
//! - `santa.rs` — hello/join/leave/generate/setdate/list, run as a guild member.
//! - `guild.rs` — sandbox guild administration.
//!
//! ## Principles
//! - Parse/match CLI inputs here.
//! - Delegate business logic to `services/*`.
//! - Keep behavior and output schema stable.

pub mod guild;
pub mod santa;

pub use guild::handle_guild_commands;
pub use santa::handle_santa_commands;
