use super::{stub_header, StubGenerator};
use crate::arch::Arch;
use crate::descriptor::SyscallDescriptor;
use crate::error::{GenError, Result};
use crate::layout::ParameterLayout;

/// Kernel argument registers, in argument order.
pub const X86_REGISTERS: [&str; 6] = ["%ebx", "%ecx", "%edx", "%esi", "%edi", "%ebp"];

/// The return address sits between `%esp` and the first argument.
const RETURN_ADDRESS_BIAS: usize = 4;
const WORD: usize = 4;

/// i386 `int $0x80` stubs: the C arguments arrive on the stack and must be
/// copied into callee-saved registers that get restored afterwards.
pub struct X86;

fn call_and_check(nr: &str) -> String {
    format!(
        "    movl    ${nr}, %eax\n    \
         int     $0x80\n    \
         cmpl    $-MAX_ERRNO, %eax\n    \
         jb      1f\n    \
         negl    %eax\n    \
         pushl   %eax\n    \
         call    __set_errno\n    \
         addl    $4, %esp\n    \
         orl     $-1, %eax\n\
         1:\n"
    )
}

fn epilogue(func: &str) -> String {
    format!("    ret\nEND({func})\n")
}

impl X86 {
    fn plain(syscall: &SyscallDescriptor, words: usize) -> Result<String> {
        let regs = X86_REGISTERS
            .get(..words)
            .ok_or_else(|| GenError::TooManyX86Args {
                func: syscall.func.clone(),
                words,
            })?;

        let mut out = stub_header(&syscall.func);
        let mut stack_bias = RETURN_ADDRESS_BIAS;

        for reg in regs {
            out.push_str(&format!("    pushl   {reg}\n"));
            stack_bias += WORD;
        }
        for (i, reg) in regs.iter().enumerate() {
            out.push_str(&format!("    mov     {}(%esp), {reg}\n", stack_bias + i * WORD));
        }

        out.push_str(&call_and_check(&syscall.nr_symbol()));

        for reg in regs.iter().rev() {
            out.push_str(&format!("    popl    {reg}\n"));
        }

        out.push_str(&epilogue(&syscall.func));
        Ok(out)
    }

    /// socketcall(2): `%ebx` selects the operation, `%ecx` points at the
    /// caller's own arguments on the stack.
    fn dispatch(syscall: &SyscallDescriptor, id: u32) -> String {
        let mut out = stub_header(&syscall.func);
        let mut stack_bias = RETURN_ADDRESS_BIAS;

        out.push_str("    pushl   %ebx\n");
        stack_bias += WORD;
        out.push_str("    pushl   %ecx\n");
        stack_bias += WORD;

        out.push_str(&format!("    mov     ${id}, %ebx\n"));
        out.push_str("    mov     %esp, %ecx\n");
        out.push_str(&format!("    addl    ${stack_bias}, %ecx\n"));

        out.push_str(&call_and_check(&syscall.nr_symbol()));

        out.push_str("    popl    %ecx\n");
        out.push_str("    popl    %ebx\n");

        out.push_str(&epilogue(&syscall.func));
        out
    }
}

impl StubGenerator for X86 {
    fn arch(&self) -> Arch {
        Arch::X86
    }

    fn generate(&self, syscall: &SyscallDescriptor, layout: ParameterLayout) -> Result<String> {
        match syscall.dispatch_id {
            Some(id) => Ok(Self::dispatch(syscall, id)),
            None => Self::plain(syscall, layout.words),
        }
    }
}
