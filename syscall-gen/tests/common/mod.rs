#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use syscall_gen::vcs::VersionControl;
use syscall_gen::{GenConfig, Result};

/// A libc tree plus its staging dir, both under cargo's scratch space.
pub struct Scratch {
    pub root: PathBuf,
    pub libc: PathBuf,
    pub staging: PathBuf,
}

impl Scratch {
    pub fn new(name: &str) -> Self {
        let root = Path::new(env!("CARGO_TARGET_TMPDIR")).join("syscall-gen").join(name);
        if root.exists() {
            fs::remove_dir_all(&root).unwrap();
        }
        let libc = root.join("libc");
        fs::create_dir_all(&libc).unwrap();
        Self {
            staging: root.join("staging"),
            libc,
            root,
        }
    }

    pub fn write(&self, rel: &str, text: &str) {
        let path = self.libc.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }

    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.libc.join(rel)).unwrap()
    }

    pub fn exists(&self, rel: &str) -> bool {
        self.libc.join(rel).exists()
    }

    pub fn config(&self, compat_header: bool) -> GenConfig {
        GenConfig {
            staging_dir: self.staging.clone(),
            compat_header,
            ..GenConfig::default()
        }
    }

    /// Minimal kernel headers for the compatibility header scan.
    pub fn write_kernel_headers(&self) {
        self.write(
            "kernel/arch-arm/asm/unistd.h",
            "#define __NR_read (__NR_SYSCALL_BASE+ 3)\n#define __NR_close (__NR_SYSCALL_BASE+ 6)\n",
        );
        self.write(
            "kernel/arch-mips/asm/unistd.h",
            "#define __NR_read (__NR_Linux + 3)\n#define __NR_read (__NR_Linux + 3)\n",
        );
        self.write("kernel/arch-x86/asm/unistd_32.h", "#define __NR_read 3\n");
        self.write("kernel/arch-x86/asm/unistd_64.h", "#define __NR_read 0\n");
    }
}

/// Remembers what the sync engine asked version control to do.
#[derive(Default, Debug)]
pub struct RecordingVcs {
    pub added: Vec<PathBuf>,
    pub removed: Vec<PathBuf>,
}

impl VersionControl for RecordingVcs {
    fn add(&mut self, paths: &[PathBuf]) -> Result<()> {
        self.added.extend_from_slice(paths);
        Ok(())
    }

    fn remove(&mut self, paths: &[PathBuf]) -> Result<()> {
        self.removed.extend_from_slice(paths);
        Ok(())
    }
}
