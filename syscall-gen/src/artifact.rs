//! The generate phase: descriptors in, an in-memory artifact set out.
//! Nothing here touches the filesystem.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;

use crate::arch::Arch;
use crate::descriptor::SyscallDescriptor;
use crate::error::{GenError, Result};
use crate::stub::{generate_stub, GENERATED_BANNER};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArtifactKind {
    /// A `.S` stub. Only stubs are ever deleted from the live tree.
    Stub,
    /// Build lists and headers.
    Support,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedArtifact {
    /// Relative to the libc root, `/` separated.
    pub path: String,
    pub content: String,
    pub kind: ArtifactKind,
}

/// Generated files keyed by relative path.
#[derive(Clone, Debug, Default)]
pub struct ArtifactSet {
    artifacts: BTreeMap<String, GeneratedArtifact>,
}

impl ArtifactSet {
    pub fn insert(&mut self, path: String, content: String, kind: ArtifactKind) {
        self.artifacts.insert(
            path.clone(),
            GeneratedArtifact {
                path,
                content,
                kind,
            },
        );
    }

    pub fn get(&self, path: &str) -> Option<&GeneratedArtifact> {
        self.artifacts.get(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GeneratedArtifact> {
        self.artifacts.values()
    }

    pub fn stubs(&self) -> impl Iterator<Item = &GeneratedArtifact> {
        self.iter().filter(|a| a.kind == ArtifactKind::Stub)
    }

    pub fn contains_stub(&self, path: &str) -> bool {
        self.get(path).is_some_and(|a| a.kind == ArtifactKind::Stub)
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

/// `syscalls.mk` for one architecture, listing its stubs in table order.
pub fn build_list(arch: Arch, syscalls: &[SyscallDescriptor]) -> String {
    let mut out = format!("# {GENERATED_BANNER}\nsyscall_src :=\n");
    for syscall in syscalls.iter().filter(|s| s.applies_to(arch)) {
        let _ = writeln!(out, "syscall_src += {}", arch.stub_path(&syscall.func));
    }
    out
}

/// Produces every stub, every build list and, when given, the compatibility
/// header as `(path, text)`. All descriptors are validated before any text
/// is produced.
pub fn generate(
    syscalls: &[SyscallDescriptor],
    compat_header: Option<(&str, String)>,
) -> Result<ArtifactSet> {
    validate_all(syscalls)?;

    let mut set = ArtifactSet::default();

    for syscall in syscalls {
        for arch in Arch::all().filter(|a| syscall.applies_to(*a)) {
            let path = arch.stub_path(&syscall.func);
            log::trace!(">>> generating {}", path);
            let stub = generate_stub(syscall, arch)?;
            set.insert(path, stub, ArtifactKind::Stub);
        }
    }

    for arch in Arch::all() {
        let path = arch.build_list_path();
        log::debug!("generating {}", path);
        set.insert(path, build_list(arch, syscalls), ArtifactKind::Support);
    }

    if let Some((path, header)) = compat_header {
        log::debug!("generating {}", path);
        set.insert(path.to_string(), header, ArtifactKind::Support);
    }

    Ok(set)
}

/// Each descriptor on its own, then no two stubs for the same file.
fn validate_all(syscalls: &[SyscallDescriptor]) -> Result<()> {
    let mut seen = BTreeSet::new();
    for syscall in syscalls {
        syscall.validate()?;
        for arch in Arch::all().filter(|a| syscall.applies_to(*a)) {
            if !seen.insert((arch, syscall.func.as_str())) {
                return Err(GenError::DuplicateStub {
                    func: syscall.func.clone(),
                    arch,
                });
            }
        }
    }
    Ok(())
}
