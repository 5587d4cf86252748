//! Service layer containing business logic and side-effect helpers.
//!
//! ## Service map
//! - `engine.rs` — snapshot, draw, probe fan-out, commit/abort of one run.
//! - `assignment.rs` — shuffled single-cycle giver/recipient draw.
//! - `enrollment.rs` — enrollment snapshot and join/leave role toggling.
//! - `authorization.rs` — member/owner gates.
//! - `schedule.rs` — event date parsing and scheduling.
//! - `config.rs` — optional `config.toml` loading.
//! - `storage.rs` — sandbox guild persistence + audit log.
//! - `output.rs` — JSON/text output helpers.
//!
//! ## Conventions
//! - Services talk to the chat platform only through `crate::platform` traits.
//! - Side effects should be explicit and localized.
//! - Keep command handlers thin; delegate to services.

pub mod assignment;
pub mod authorization;
pub mod config;
pub mod engine;
pub mod enrollment;
pub mod output;
pub mod schedule;
pub mod storage;
