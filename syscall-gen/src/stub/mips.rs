use super::{StubGenerator, GENERATED_BANNER};
use crate::arch::Arch;
use crate::descriptor::SyscallDescriptor;
use crate::error::Result;
use crate::layout::ParameterLayout;

/// MIPS o32. Syscall arguments use the same registers as C calls, so the stub
/// never touches them. The kernel flags failure in `$a3`.
pub struct Mips;

impl StubGenerator for Mips {
    fn arch(&self) -> Arch {
        Arch::Mips
    }

    fn generate(&self, syscall: &SyscallDescriptor, _layout: ParameterLayout) -> Result<String> {
        let func = &syscall.func;
        let nr = syscall.nr_symbol();
        Ok(format!(
            "/* {GENERATED_BANNER} */\n\
             #include <asm/unistd.h>\n    \
             .text\n    \
             .globl {func}\n    \
             .align 4\n    \
             .ent {func}\n\
             \n\
             {func}:\n    \
             .set noreorder\n    \
             .cpload $t9\n    \
             li $v0, {nr}\n    \
             syscall\n    \
             bnez $a3, 1f\n    \
             move $a0, $v0\n    \
             j $ra\n    \
             nop\n\
             1:\n    \
             la $t9,__set_errno\n    \
             j $t9\n    \
             nop\n    \
             .set reorder\n    \
             .end {func}\n"
        ))
    }
}
