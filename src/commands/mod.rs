//! Command handlers: match the parsed CLI, call services, print.
//!
//! `runtime.rs` holds the per-pipeline-run commands (resolve, apply,
//! templates). `admin.rs` holds one-off project setup and the release
//! subcommands. The admin handlers return `Ok(false)` when the command is not
//! theirs; `handle_runtime_commands` runs last and takes the rest.

pub mod admin;
pub mod runtime;

pub use admin::{handle_project_commands, handle_release_commands};
pub use runtime::handle_runtime_commands;
