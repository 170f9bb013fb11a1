//! Per-architecture assembly stub generators.
//!
//! Every architecture has one [`StubGenerator`]. Generators are pure: they
//! turn a descriptor plus its [`ParameterLayout`] into assembly text.

use crate::alias::add_aliases;
use crate::arch::Arch;
use crate::descriptor::SyscallDescriptor;
use crate::error::Result;
use crate::layout::ParameterLayout;

mod arm;
mod mips;
mod x86;
mod x86_64;

pub use arm::ArmEabi;
pub use mips::Mips;
pub use x86::X86;
pub use x86_64::X86_64;

pub const GENERATED_BANNER: &str = "Generated by gensyscalls. Do not edit.";

/// Preamble shared by every stub that goes through `<machine/asm.h>`.
pub(crate) fn stub_header(func: &str) -> String {
    format!(
        "/* {GENERATED_BANNER} */\n\
         #include <asm/unistd.h>\n\
         #include <linux/err.h>\n\
         #include <machine/asm.h>\n\
         \n\
         ENTRY({func})\n"
    )
}

pub trait StubGenerator {
    fn arch(&self) -> Arch;

    /// Produces the stub body, without aliases.
    fn generate(&self, syscall: &SyscallDescriptor, layout: ParameterLayout) -> Result<String>;
}

pub fn generator_for(arch: Arch) -> &'static dyn StubGenerator {
    match arch {
        Arch::Arm => &ArmEabi,
        Arch::Mips => &Mips,
        Arch::X86 => &X86,
        Arch::X86_64 => &X86_64,
    }
}

/// Generates the complete stub of `syscall` for `arch`, aliases included.
pub fn generate_stub(syscall: &SyscallDescriptor, arch: Arch) -> Result<String> {
    syscall.validate()?;
    let layout = ParameterLayout::compute(arch, &syscall.params);
    let stub = generator_for(arch).generate(syscall, layout)?;
    Ok(add_aliases(stub, &syscall.func, &syscall.aliases))
}
