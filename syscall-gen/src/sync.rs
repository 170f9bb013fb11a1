//! The reconcile phase: diff the staged artifacts against the live tree and
//! apply the difference. This is the only code that writes to the live tree.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::arch::Arch;
use crate::artifact::ArtifactSet;
use crate::error::{GenError, Result};
use crate::staging::Staging;
use crate::vcs::VersionControl;

/// Paths (relative to the libc root) that differ between staging and the
/// live tree. The three sets are disjoint.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncPlan {
    pub additions: BTreeSet<String>,
    pub edits: BTreeSet<String>,
    pub deletions: BTreeSet<String>,
}

impl SyncPlan {
    /// `old_stubs` are the stubs found in the live tree before this run.
    pub fn compute(
        staging: &Staging,
        live_root: &Path,
        artifacts: &ArtifactSet,
        old_stubs: &BTreeSet<String>,
    ) -> Result<Self> {
        let mut plan = SyncPlan::default();

        for artifact in artifacts.iter() {
            let live = live_root.join(&artifact.path);
            if !live.exists() {
                log::info!("new file:     {}", artifact.path);
                plan.additions.insert(artifact.path.clone());
            } else if !same_contents(&staging.path(&artifact.path), &live)? {
                log::info!("changed file: {}", artifact.path);
                plan.edits.insert(artifact.path.clone());
            }
        }

        for stub in old_stubs {
            if !artifacts.contains_stub(stub) {
                log::info!("deleted file: {}", stub);
                plan.deletions.insert(stub.clone());
            }
        }

        Ok(plan)
    }

    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.edits.is_empty() && self.deletions.is_empty()
    }
}

fn same_contents(a: &Path, b: &Path) -> Result<bool> {
    let a = fs::read(a).map_err(|e| GenError::io(a, e))?;
    let b = fs::read(b).map_err(|e| GenError::io(b, e))?;
    Ok(a == b)
}

/// Every `arch-*/syscalls/*.S` currently in the live tree, as relative paths.
pub fn scan_existing_stubs(live_root: &Path) -> Result<BTreeSet<String>> {
    let root = glob::Pattern::escape(&live_root.to_string_lossy());
    let mut stubs = BTreeSet::new();

    for arch in Arch::all() {
        let pattern = format!("{}/{}/*.S", root, arch.stub_dir());
        log::debug!("scanning {}", pattern);
        for path in glob::glob(&pattern)?.flatten() {
            if let Some(rel) = relative_path(live_root, &path) {
                stubs.insert(rel);
            }
        }
    }

    log::info!("found {} stub files", stubs.len());
    Ok(stubs)
}

fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}

/// Applies a [`SyncPlan`] to the live tree.
pub struct SyncEngine<'a> {
    live_root: &'a Path,
    staging: &'a Staging,
    dry_run: bool,
}

impl<'a> SyncEngine<'a> {
    pub fn new(live_root: &'a Path, staging: &'a Staging, dry_run: bool) -> Self {
        Self {
            live_root,
            staging,
            dry_run,
        }
    }

    /// Copies additions and edits in, deletes deletions, then registers
    /// everything (plus `also_add`, e.g. the descriptor table) with version
    /// control. A dry run does nothing.
    pub fn apply(
        &self,
        plan: &SyncPlan,
        also_add: &[PathBuf],
        vcs: &mut dyn VersionControl,
    ) -> Result<()> {
        if self.dry_run {
            log::info!("dry run, leaving {} untouched", self.live_root.display());
            return Ok(());
        }

        for rel in plan.additions.iter().chain(&plan.edits) {
            let from = self.staging.path(rel);
            let to = self.live_root.join(rel);
            if let Some(parent) = to.parent() {
                fs::create_dir_all(parent).map_err(|e| GenError::io(parent, e))?;
            }
            fs::copy(&from, &to).map_err(|e| GenError::io(&to, e))?;
        }

        for rel in &plan.deletions {
            let path = self.live_root.join(rel);
            if path.exists() {
                fs::remove_file(&path).map_err(|e| GenError::io(&path, e))?;
            }
        }

        let mut added: Vec<PathBuf> = plan
            .additions
            .iter()
            .chain(&plan.edits)
            .map(|rel| self.live_root.join(rel))
            .collect();
        added.extend(also_add.iter().cloned());
        vcs.add(&added)?;

        let deleted: Vec<PathBuf> = plan
            .deletions
            .iter()
            .map(|rel| self.live_root.join(rel))
            .collect();
        vcs.remove(&deleted)?;

        Ok(())
    }
}
