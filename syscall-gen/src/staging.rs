use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::artifact::ArtifactSet;
use crate::error::{GenError, Result};

/// Written into every staging dir this tool creates. A non-empty directory
/// without it is never wiped.
pub const STAGING_MARKER: &str = ".gensyscalls-staging";

/// Private directory the artifact set is written to before it is compared
/// with the live tree.
#[derive(Debug)]
pub struct Staging {
    root: PathBuf,
}

impl Staging {
    /// Fails unless `root` and `live_root` resolve to disjoint trees. `..`,
    /// relative paths and symlinks are resolved first; `root` does not
    /// need to exist yet.
    pub fn ensure_outside(root: impl AsRef<Path>, live_root: impl AsRef<Path>) -> Result<PathBuf> {
        let root = resolve(root.as_ref())?;
        let live = resolve(live_root.as_ref())?;
        if root.starts_with(&live) || live.starts_with(&root) {
            return Err(GenError::StagingInsideTree {
                staging: root,
                live,
            });
        }
        Ok(root)
    }

    /// Creates `root`, wiping whatever an earlier run left behind. Only an
    /// empty directory or one carrying [`STAGING_MARKER`] is reused.
    pub fn prepare(root: impl AsRef<Path>, live_root: impl AsRef<Path>) -> Result<Self> {
        let root = Self::ensure_outside(root, live_root)?;

        if root.exists() {
            if !is_owned(&root)? {
                return Err(GenError::StagingNotOwned { path: root });
            }
            log::debug!("clearing {}", root.display());
            fs::remove_dir_all(&root).map_err(|e| GenError::io(&root, e))?;
        }
        log::debug!("creating {}...", root.display());
        fs::create_dir_all(&root).map_err(|e| GenError::io(&root, e))?;

        let marker = root.join(STAGING_MARKER);
        fs::write(&marker, "").map_err(|e| GenError::io(&marker, e))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    pub fn write(&self, artifacts: &ArtifactSet) -> Result<()> {
        for artifact in artifacts.iter() {
            let path = self.path(&artifact.path);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|e| GenError::io(parent, e))?;
            }
            fs::write(&path, &artifact.content).map_err(|e| GenError::io(&path, e))?;
        }
        log::debug!("staged {} files in {}", artifacts.len(), self.root.display());
        Ok(())
    }
}

fn is_owned(dir: &Path) -> Result<bool> {
    if dir.join(STAGING_MARKER).is_file() {
        return Ok(true);
    }
    let mut entries = fs::read_dir(dir).map_err(|e| GenError::io(dir, e))?;
    Ok(entries.next().is_none())
}

/// Canonicalizes the longest existing prefix of `path` and appends the
/// rest lexically. The missing tail cannot contain symlinks.
fn resolve(path: &Path) -> Result<PathBuf> {
    let path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        let cwd = std::env::current_dir().map_err(|e| GenError::io(path, e))?;
        cwd.join(path)
    };

    let mut head: Vec<Component> = path.components().collect();
    let mut tail = Vec::new();
    while !head.is_empty() {
        let prefix: PathBuf = head.iter().collect();
        if let Ok(mut resolved) = prefix.canonicalize() {
            for component in tail.iter().rev() {
                match component {
                    Component::ParentDir => {
                        resolved.pop();
                    }
                    Component::CurDir => {}
                    other => resolved.push(other.as_os_str()),
                }
            }
            return Ok(resolved);
        }
        tail.extend(head.pop());
    }
    Ok(path)
}
