//! Release data model
//!
//! The three pieces of state a publish run moves between systems:
//!
//! 1. **ReleaseEvent** - the immutable trigger (tag string + receipt time)
//! 2. **ArtifactSet** - the ephemeral build outputs, discarded after the run
//! 3. **Manifest** - the one durable mutation, the version field, persisted
//!    via the proposal branch
//!
//! # Core Invariant
//!
//! The version committed to the proposal branch always equals the release
//! tag that triggered the run. `Manifest::set_version` writes the tag
//! verbatim, and the proposal commit stages only the manifest, so nothing
//! between the rewrite and the commit can break the equality.

pub mod artifacts;
pub mod event;
pub mod manifest;

pub use artifacts::{Artifact, ArtifactSet};
pub use event::ReleaseEvent;
pub use manifest::Manifest;
