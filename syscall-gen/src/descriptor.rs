use std::collections::BTreeSet;

use crate::arch::Arch;
use crate::error::{GenError, Result};

/// One syscall as described by a single line of the descriptor table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyscallDescriptor {
    /// Exported C symbol, also the stub file name.
    pub func: String,
    /// Kernel-side name the syscall number is derived from.
    pub name: String,
    pub params: Vec<String>,
    pub aliases: Vec<String>,
    pub arches: BTreeSet<Arch>,
    /// Selector for socketcall-style multiplexed syscalls.
    pub dispatch_id: Option<u32>,
}

impl SyscallDescriptor {
    pub fn new(func: impl Into<String>, params: &[&str], arches: &[Arch]) -> Self {
        let func = func.into();
        Self {
            name: func.clone(),
            func,
            params: params.iter().map(|p| p.to_string()).collect(),
            aliases: Vec::new(),
            arches: arches.iter().copied().collect(),
            dispatch_id: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_aliases(mut self, aliases: &[&str]) -> Self {
        self.aliases = aliases.iter().map(|a| a.to_string()).collect();
        self
    }

    pub fn with_dispatch_id(mut self, id: u32) -> Self {
        self.dispatch_id = Some(id);
        self
    }

    pub fn applies_to(&self, arch: Arch) -> bool {
        self.arches.contains(&arch)
    }

    /// Symbol holding the syscall number. Names already starting with `__`
    /// (e.g. `__ARM_NR_cacheflush`) are used as is.
    pub fn nr_symbol(&self) -> String {
        nr_symbol(&self.name)
    }

    /// A dispatch id is only meaningful on x86, and every other
    /// architecture the descriptor targets must then be rejected.
    pub fn validate(&self) -> Result<()> {
        let Some(id) = self.dispatch_id else {
            return Ok(());
        };

        if let Some(arch) = self.arches.iter().find(|a| !a.supports_dispatch()) {
            return Err(GenError::DispatchUnsupported {
                func: self.func.clone(),
                arch: *arch,
            });
        }

        if !self.applies_to(Arch::X86) {
            return Err(GenError::DispatchWithoutX86 {
                func: self.func.clone(),
                id,
            });
        }

        Ok(())
    }
}

pub fn nr_symbol(name: &str) -> String {
    if name.starts_with("__") {
        name.to_string()
    } else {
        format!("__NR_{}", name)
    }
}
