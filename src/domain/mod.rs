//! Shared data model layer (structs/constants only).
//!
//! ## Purpose
//! - Keep participant/assignment/report structs in one place.
//! - Avoid cyclic imports between the engine, the platform and the commands.
//! - Make JSON output schema changes explicit and reviewable.
//!
//! ## Files
//! - `models.rs` — participants, assignment, delivery outcomes, sandbox guild state.
//! - `constants.rs` — stable defaults and user-facing message texts.
//!
//! ## Rule of thumb
//! Domain types should be data-only: no filesystem/network side effects.
//!
//! ## Compatibility note
//! Changes in the report structs affect `--json` outputs.
//! Keep schema-impacting changes synchronized with `docs/contracts/*`.

pub mod constants;
pub mod models;
