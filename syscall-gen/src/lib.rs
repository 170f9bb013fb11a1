//! Generates the assembly syscall stubs of a C library for every supported
//! architecture from one `SYSCALLS.TXT` table, then brings the source tree in
//! line with the freshly generated files.
//!
//! The work is split in two phases. [`artifact::generate`] is pure and
//! builds an in-memory [`ArtifactSet`]; [`sync`] stages that set, diffs it
//! against the live tree and applies the resulting [`SyncPlan`].

#![allow(clippy::uninlined_format_args)]

pub mod alias;
pub mod arch;
pub mod artifact;
pub mod compat;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod layout;
pub mod regen;
pub mod staging;
pub mod stub;
pub mod sync;
pub mod table;
pub mod vcs;

pub use arch::Arch;
pub use artifact::{ArtifactKind, ArtifactSet, GeneratedArtifact};
pub use config::GenConfig;
pub use descriptor::SyscallDescriptor;
pub use error::{GenError, Result};
pub use layout::ParameterLayout;
pub use regen::Regenerator;
pub use sync::SyncPlan;
