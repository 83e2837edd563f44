//! Data-only types and well-known paths.
//!
//! `models.rs` carries environments, identities, target descriptors and the
//! serialized reports; `constants.rs` the default branch, prefixes and file
//! locations of a Flutter project.
//!
//! `IdentityRecord` is consumed by release tooling. Changes to its fields
//! must be mirrored in `docs/contracts/identity-record.schema.json`.

pub mod constants;
pub mod models;
