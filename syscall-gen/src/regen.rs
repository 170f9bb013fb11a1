use std::path::{Path, PathBuf};

use crate::artifact::generate;
use crate::compat::generate_compat_header;
use crate::config::GenConfig;
use crate::error::Result;
use crate::staging::Staging;
use crate::sync::{scan_existing_stubs, SyncEngine, SyncPlan};
use crate::table::load_table;
use crate::vcs::VersionControl;

/// One full run: load, generate, stage, diff and (unless `dry_run`) apply.
pub struct Regenerator {
    libc_root: PathBuf,
    config: GenConfig,
    dry_run: bool,
}

impl Regenerator {
    pub fn new(libc_root: impl AsRef<Path>, config: GenConfig, dry_run: bool) -> Self {
        Self {
            libc_root: libc_root.as_ref().to_path_buf(),
            config,
            dry_run,
        }
    }

    pub fn run(&self, vcs: &mut dyn VersionControl) -> Result<SyncPlan> {
        let staging_root = &self.config.staging_dir;
        Staging::ensure_outside(staging_root, &self.libc_root)?;

        let table_path = self.config.syscalls_path(&self.libc_root);
        let syscalls = load_table(&table_path)?;

        log::info!("scanning for existing architecture-specific stub files...");
        let old_stubs = scan_existing_stubs(&self.libc_root)?;

        log::info!("re-generating stubs and support files...");
        let compat = if self.config.compat_header {
            let headers = self.config.kernel_header_paths(&self.libc_root);
            let text = generate_compat_header(&headers)?;
            Some((self.config.compat_header_path.as_str(), text))
        } else {
            None
        };
        let artifacts = generate(&syscalls, compat)?;

        let staging = Staging::prepare(staging_root, &self.libc_root)?;
        staging.write(&artifacts)?;

        log::info!("comparing files...");
        let plan = SyncPlan::compute(&staging, &self.libc_root, &artifacts, &old_stubs)?;

        if plan.is_empty() {
            log::info!("no changes detected!");
            return Ok(plan);
        }

        SyncEngine::new(&self.libc_root, &staging, self.dry_run).apply(&plan, &[table_path], vcs)?;
        log::info!(
            "{} added, {} changed, {} deleted",
            plan.additions.len(),
            plan.edits.len(),
            plan.deletions.len()
        );
        Ok(plan)
    }
}
