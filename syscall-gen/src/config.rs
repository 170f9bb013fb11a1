use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::arch::Arch;
use crate::compat::{default_kernel_header, COMPAT_HEADER_PATH};
use crate::error::{GenError, Result};

/// Optional `gensyscalls.toml`. The table and kernel header paths are
/// resolved against the libc root; `staging_dir` is used as given.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenConfig {
    /// The descriptor table.
    pub syscalls_file: PathBuf,
    pub staging_dir: PathBuf,
    /// Set to false to leave the compatibility header alone.
    pub compat_header: bool,
    /// Where the compatibility header goes, relative to the libc root and
    /// `/` separated.
    pub compat_header_path: String,
    /// Per-architecture `asm/unistd.h` overrides, keyed by arch name.
    pub kernel_headers: BTreeMap<String, PathBuf>,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            syscalls_file: PathBuf::from("SYSCALLS.TXT"),
            staging_dir: std::env::temp_dir().join("gensyscalls"),
            compat_header: true,
            compat_header_path: COMPAT_HEADER_PATH.to_string(),
            kernel_headers: BTreeMap::new(),
        }
    }
}

impl GenConfig {
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| GenError::io(path, e))?;
        Self::from_toml(&text, path)
    }

    pub fn from_toml(text: &str, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: GenConfig = toml::from_str(text).map_err(|source| GenError::Config {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(name) = config
            .kernel_headers
            .keys()
            .find(|name| Arch::from_str(name).is_err())
        {
            return Err(GenError::UnknownArch {
                path: path.to_path_buf(),
                name: name.clone(),
            });
        }
        Ok(config)
    }

    pub fn syscalls_path(&self, libc_root: &Path) -> PathBuf {
        libc_root.join(&self.syscalls_file)
    }

    /// One header per architecture, in [`Arch::all`] order.
    pub fn kernel_header_paths(&self, libc_root: &Path) -> Vec<(Arch, PathBuf)> {
        Arch::all()
            .map(|arch| {
                let rel = self
                    .kernel_headers
                    .get(&arch.to_string())
                    .cloned()
                    .unwrap_or_else(|| PathBuf::from(default_kernel_header(arch)));
                (arch, libc_root.join(rel))
            })
            .collect()
    }
}
