use std::path::PathBuf;

use crate::arch::Arch;

#[derive(thiserror::Error, Debug)]
pub enum GenError {
    #[error("{}:{line}: {msg}", path.display())]
    Table {
        path: PathBuf,
        line: usize,
        msg: String,
    },

    #[error("'{func}': dispatch syscalls are only supported on x86, not {arch}")]
    DispatchUnsupported { func: String, arch: Arch },

    #[error("'{func}': dispatch id {id} given but x86 is not among its architectures")]
    DispatchWithoutX86 { func: String, id: u32 },

    #[error("'{func}': {words} argument words do not fit the 6 x86 syscall registers")]
    TooManyX86Args { func: String, words: usize },

    #[error("kernel header for {arch} not found: {}", path.display())]
    MissingKernelHeader { arch: Arch, path: PathBuf },

    #[error("invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("staging dir {} must live outside the tree {}", staging.display(), live.display())]
    StagingInsideTree { staging: PathBuf, live: PathBuf },

    #[error("refusing to wipe {}: not empty and not a gensyscalls staging dir", path.display())]
    StagingNotOwned { path: PathBuf },

    #[error("'{func}' is listed twice for {arch}")]
    DuplicateStub { func: String, arch: Arch },

    #[error("{}: unknown architecture '{name}'", path.display())]
    UnknownArch { path: PathBuf, name: String },

    #[error("bad stub scan pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("`{cmd}` failed: {stderr}")]
    Vcs { cmd: String, stderr: String },
}

impl GenError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GenError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, GenError>;
