use super::{stub_header, StubGenerator};
use crate::arch::Arch;
use crate::descriptor::SyscallDescriptor;
use crate::error::Result;
use crate::layout::ParameterLayout;

/// Arguments beyond r0-r3 live on the stack; the long trampoline moves them.
const MAX_REGISTER_ARGS: usize = 4;

/// ARM EABI. Argument marshaling is left to the shared trampolines in libc;
/// the stub only loads the syscall number into `ip`.
pub struct ArmEabi;

impl ArmEabi {
    pub fn trampoline(layout: ParameterLayout) -> &'static str {
        if layout.words > MAX_REGISTER_ARGS {
            "__bionic_long_syscall_eabi"
        } else {
            "__bionic_syscall_eabi"
        }
    }
}

impl StubGenerator for ArmEabi {
    fn arch(&self) -> Arch {
        Arch::Arm
    }

    fn generate(&self, syscall: &SyscallDescriptor, layout: ParameterLayout) -> Result<String> {
        let mut out = stub_header(&syscall.func);
        out.push_str(&format!("    ldr     ip, ={}\n", syscall.nr_symbol()));
        out.push_str(&format!("    b       {}\n", Self::trampoline(layout)));
        out.push_str(&format!("END({})\n", syscall.func));
        Ok(out)
    }
}
