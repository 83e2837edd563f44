//! Business logic for identity propagation and its release collaborators.
//!
//! Pipeline order for `apply`: `branch` classifies, `identity` derives,
//! `propagate` walks the fixed target list through `rewrite`, then
//! `templates` copies Firebase configs and `storage` persists the record.
//!
//! Supporting modules: `setup` (first-time stamping), `release` (history,
//! QA checklist, webhook), `settings` (`envstamp.toml`), `logging`, `output`.
//!
//! Per-file failures are values (`PropagationOutcome`), not `Err`s; only
//! settings and record I/O propagate errors to the command layer.

pub mod branch;
pub mod identity;
pub mod logging;
pub mod output;
pub mod propagate;
pub mod release;
pub mod rewrite;
pub mod settings;
pub mod setup;
pub mod storage;
pub mod templates;
