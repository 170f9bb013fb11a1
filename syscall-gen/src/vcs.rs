use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{GenError, Result};

/// The two operations the sync engine needs from version control.
pub trait VersionControl {
    fn add(&mut self, paths: &[PathBuf]) -> Result<()>;

    /// Records the removal of files already deleted from the working tree.
    fn remove(&mut self, paths: &[PathBuf]) -> Result<()>;
}

/// Runs `git` inside the live tree.
#[derive(Debug)]
pub struct Git {
    work_dir: PathBuf,
}

impl Git {
    pub fn new(work_dir: impl AsRef<Path>) -> Self {
        Self {
            work_dir: work_dir.as_ref().to_path_buf(),
        }
    }

    fn run(&self, args: &[&str], paths: &[PathBuf]) -> Result<()> {
        if paths.is_empty() {
            return Ok(());
        }

        let cmd = format!("git {}", args.join(" "));
        log::debug!("{} ({} paths)", cmd, paths.len());

        let output = Command::new("git")
            .current_dir(&self.work_dir)
            .args(args)
            .arg("--")
            .args(paths)
            .output()
            .map_err(|e| GenError::io(&self.work_dir, e))?;

        if !output.status.success() {
            return Err(GenError::Vcs {
                cmd,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

impl VersionControl for Git {
    fn add(&mut self, paths: &[PathBuf]) -> Result<()> {
        self.run(&["add"], paths)
    }

    fn remove(&mut self, paths: &[PathBuf]) -> Result<()> {
        self.run(&["rm", "--quiet", "--cached", "--ignore-unmatch"], paths)
    }
}

/// For trees that are not under version control.
#[derive(Debug, Default)]
pub struct NoVcs;

impl VersionControl for NoVcs {
    fn add(&mut self, paths: &[PathBuf]) -> Result<()> {
        log::debug!("not registering {} added/edited files", paths.len());
        Ok(())
    }

    fn remove(&mut self, paths: &[PathBuf]) -> Result<()> {
        log::debug!("not registering {} deleted files", paths.len());
        Ok(())
    }
}
