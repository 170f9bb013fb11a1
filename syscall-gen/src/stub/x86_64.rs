use super::{stub_header, StubGenerator};
use crate::arch::Arch;
use crate::descriptor::SyscallDescriptor;
use crate::error::Result;
use crate::layout::ParameterLayout;

/// x86-64 `syscall` stubs. The kernel takes its arguments in the C argument
/// registers except the 4th, which it wants in `%r10` instead of `%rcx`.
pub struct X86_64;

impl StubGenerator for X86_64 {
    fn arch(&self) -> Arch {
        Arch::X86_64
    }

    fn generate(&self, syscall: &SyscallDescriptor, layout: ParameterLayout) -> Result<String> {
        let mut out = stub_header(&syscall.func);
        if layout.words > 3 {
            out.push_str("    movq    %rcx, %r10\n");
        }
        out.push_str(&format!(
            "    movl    ${nr}, %eax\n    \
             syscall\n    \
             cmpq    $-MAX_ERRNO, %rax\n    \
             jb      1f\n    \
             negl    %eax\n    \
             movl    %eax, %edi\n    \
             call    __set_errno\n    \
             orq     $-1, %rax\n\
             1:\n    \
             ret\n\
             END({func})\n",
            nr = syscall.nr_symbol(),
            func = syscall.func,
        ));
        Ok(out)
    }
}
