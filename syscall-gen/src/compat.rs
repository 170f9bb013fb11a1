//! `SYS_*` constants for glibc source compatibility, scraped from the
//! kernel's `asm/unistd.h` headers.

use std::collections::BTreeSet;
use std::fmt::Write;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::arch::Arch;
use crate::descriptor::nr_symbol;
use crate::error::{GenError, Result};
use crate::stub::GENERATED_BANNER;

pub const COMPAT_HEADER_PATH: &str = "include/sys/glibc-syscalls.h";
const INCLUDE_GUARD: &str = "_BIONIC_GLIBC_SYSCALLS_H_";

lazy_static::lazy_static! {
    static ref NR_DEFINE: Regex = Regex::new(r"^#define __NR_([a-z]\S+) .*").unwrap();
}

/// Kernel header holding the `__NR_*` numbers, relative to the libc root.
pub fn default_kernel_header(arch: Arch) -> &'static str {
    match arch {
        Arch::Arm => "kernel/arch-arm/asm/unistd.h",
        Arch::Mips => "kernel/arch-mips/asm/unistd.h",
        Arch::X86 => "kernel/arch-x86/asm/unistd_32.h",
        Arch::X86_64 => "kernel/arch-x86/asm/unistd_64.h",
    }
}

/// Syscall names defined in a unistd header, sorted. MIPS defines
/// everything once per ABI, so duplicates are folded.
pub fn scan_unistd_h(text: &str) -> BTreeSet<String> {
    text.lines()
        .filter_map(|line| NR_DEFINE.captures(line))
        .map(|c| c[1].to_string())
        .collect()
}

/// Builds the combined header from each architecture's kernel header.
pub fn generate_compat_header(headers: &[(Arch, PathBuf)]) -> Result<String> {
    let mut out = String::new();
    let _ = writeln!(out, "/* {GENERATED_BANNER} */");
    let _ = writeln!(out, "#ifndef {INCLUDE_GUARD}");
    let _ = writeln!(out, "#define {INCLUDE_GUARD}");

    for (i, (arch, path)) in headers.iter().enumerate() {
        let directive = if i == 0 { "#if" } else { "#elif" };
        let _ = writeln!(out, "{directive} defined({})", arch.cpp_guard());

        let text = read_kernel_header(*arch, path)?;
        let names = scan_unistd_h(&text);
        log::debug!("{}: {} syscall numbers in {}", arch, names.len(), path.display());
        for name in names {
            let _ = writeln!(out, "#define SYS_{} {}", name, nr_symbol(&name));
        }
    }

    if !headers.is_empty() {
        out.push_str("#endif\n");
    }
    let _ = writeln!(out, "#endif /* {INCLUDE_GUARD} */");
    Ok(out)
}

fn read_kernel_header(arch: Arch, path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(GenError::MissingKernelHeader {
            arch,
            path: path.to_path_buf(),
        });
    }
    std::fs::read_to_string(path).map_err(|e| GenError::io(path, e))
}
