//! Counting how many machine words a parameter list occupies.

use crate::arch::Arch;

const WIDE_TYPES: &[&str] = &[
    "int64_t",
    "uint64_t",
    "loff_t",
    "off64_t",
    "long long",
    "unsigned long long",
    "signed long long",
];

/// True for 64-bit scalars. Pointers never count, whatever they point to.
pub fn param_uses_64bits(param: &str) -> bool {
    let param = param.trim();
    WIDE_TYPES.iter().any(|t| param.starts_with(t)) && !param.contains('*')
}

/// ARM EABI: a 64-bit value starts on an even register, so `foo(int, off64_t)`
/// takes r0, a padding r1, then r2-r3.
pub fn count_arm_param_registers<S: AsRef<str>>(params: &[S]) -> usize {
    params.iter().fold(0, |count, p| {
        if param_uses_64bits(p.as_ref()) {
            (count + (count & 1)) + 2
        } else {
            count + 1
        }
    })
}

pub fn count_generic_param_registers<S: AsRef<str>>(params: &[S]) -> usize {
    params
        .iter()
        .map(|p| if param_uses_64bits(p.as_ref()) { 2 } else { 1 })
        .sum()
}

/// Word size is already 64 bits, so nothing is split.
pub fn count_generic_param_registers64<S: AsRef<str>>(params: &[S]) -> usize {
    params.len()
}

/// Words consumed by `params` under the convention of `arch`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParameterLayout {
    pub arch: Arch,
    pub words: usize,
}

impl ParameterLayout {
    pub fn compute<S: AsRef<str>>(arch: Arch, params: &[S]) -> Self {
        let words = match arch {
            Arch::Arm => count_arm_param_registers(params),
            Arch::Mips | Arch::X86 => count_generic_param_registers(params),
            Arch::X86_64 => count_generic_param_registers64(params),
        };
        Self { arch, words }
    }
}
