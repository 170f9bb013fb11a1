use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// CPU architectures stubs are generated for.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
pub enum Arch {
    #[strum(serialize = "arm")]
    Arm,
    #[strum(serialize = "mips")]
    Mips,
    #[strum(serialize = "x86")]
    X86,
    #[strum(serialize = "x86_64")]
    X86_64,
}

impl Arch {
    pub fn all() -> impl Iterator<Item = Arch> {
        Arch::iter()
    }

    /// `arch-arm`, `arch-x86_64`, ...
    pub fn dir(self) -> String {
        format!("arch-{}", self)
    }

    /// Directory holding the generated `.S` files, relative to the libc root.
    pub fn stub_dir(self) -> String {
        format!("{}/syscalls", self.dir())
    }

    pub fn stub_path(self, func: &str) -> String {
        format!("{}/{}.S", self.stub_dir(), func)
    }

    pub fn build_list_path(self) -> String {
        format!("{}/syscalls.mk", self.dir())
    }

    /// Compiler-defined macro that is set when building for this architecture.
    pub fn cpp_guard(self) -> &'static str {
        match self {
            Arch::Arm => "__arm__",
            Arch::Mips => "__mips__",
            Arch::X86 => "__i386__",
            Arch::X86_64 => "__x86_64__",
        }
    }

    /// Only x86 multiplexes a syscall family through one entry point (socketcall).
    pub fn supports_dispatch(self) -> bool {
        matches!(self, Arch::X86)
    }
}
