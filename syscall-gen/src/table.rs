//! Parser for the `SYSCALLS.TXT` descriptor table.
//!
//! Each non-comment line looks like:
//!
//! ```text
//! return_type func[|alias1,alias2][:syscall_name[:dispatch_id]]([params]) arch_list
//! ```
//!
//! where `arch_list` is either `all` or a comma separated list of
//! architecture names.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::arch::Arch;
use crate::descriptor::SyscallDescriptor;
use crate::error::{GenError, Result};

fn is_comment_or_empty(s: &str) -> bool {
    let t = s.trim();
    t.is_empty() || t.starts_with('#')
}

struct LineParser<'a> {
    path: &'a Path,
    line: usize,
}

impl LineParser<'_> {
    fn err(&self, msg: impl Into<String>) -> GenError {
        GenError::Table {
            path: self.path.to_path_buf(),
            line: self.line,
            msg: msg.into(),
        }
    }

    fn parse(&self, text: &str) -> Result<SyscallDescriptor> {
        let lparen = text
            .find('(')
            .ok_or_else(|| self.err(format!("missing left parenthesis in '{text}'")))?;
        let rparen = match text.rfind(')') {
            Some(pos) if pos > lparen => pos,
            _ => {
                return Err(self.err(format!(
                    "missing or misplaced right parenthesis in '{text}'"
                )))
            }
        };

        let head: Vec<&str> = text[..lparen].split_whitespace().collect();
        if head.len() < 2 {
            return Err(self.err(format!("missing return type in '{text}'")));
        }
        let signature = head[head.len() - 1];

        let (func_part, name, dispatch_id) = self.split_signature(signature, text)?;

        let (func, aliases) = match func_part.split_once('|') {
            Some((func, list)) => (
                func,
                list.split(',')
                    .map(str::trim)
                    .filter(|a| !a.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
            None => (func_part, Vec::new()),
        };
        if func.is_empty() {
            return Err(self.err(format!("missing function name in '{text}'")));
        }

        let params = parse_params(&text[lparen + 1..rparen]);
        let arches = self.parse_arches(text[rparen + 1..].trim(), text)?;

        Ok(SyscallDescriptor {
            func: func.to_string(),
            name: name.unwrap_or(func).to_string(),
            params,
            aliases,
            arches,
            dispatch_id,
        })
    }

    /// Splits `func|aliases:name:id` into its three parts.
    fn split_signature<'s>(
        &self,
        signature: &'s str,
        text: &str,
    ) -> Result<(&'s str, Option<&'s str>, Option<u32>)> {
        let Some((func, rest)) = signature.split_once(':') else {
            return Ok((signature, None, None));
        };
        if func.is_empty() || rest.is_empty() {
            return Err(self.err(format!("misplaced colon in '{text}'")));
        }

        match rest.split_once(':') {
            None => Ok((func, Some(rest), None)),
            Some((name, id)) => {
                if name.is_empty() || id.is_empty() {
                    return Err(self.err(format!("misplaced colon in '{text}'")));
                }
                let id = id
                    .parse::<u32>()
                    .map_err(|_| self.err(format!("invalid dispatch id '{id}' in '{text}'")))?;
                Ok((func, Some(name), Some(id)))
            }
        }
    }

    fn parse_arches(&self, list: &str, text: &str) -> Result<BTreeSet<Arch>> {
        if list == "all" {
            return Ok(Arch::all().collect());
        }

        let mut arches = BTreeSet::new();
        for name in list.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            let arch = Arch::from_str(name).map_err(|_| {
                self.err(format!("invalid syscall architecture '{name}' in '{text}'"))
            })?;
            arches.insert(arch);
        }
        Ok(arches)
    }
}

fn parse_params(list: &str) -> Vec<String> {
    let list = list.trim();
    if list.is_empty() || list == "void" {
        return Vec::new();
    }
    list.split(',').map(|p| p.trim().to_string()).collect()
}

/// Parses table text. `path` is only used in error messages.
pub fn parse_table(text: &str, path: impl AsRef<Path>) -> Result<Vec<SyscallDescriptor>> {
    let path = path.as_ref();
    let mut syscalls = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        if is_comment_or_empty(line) {
            continue;
        }
        let parser = LineParser {
            path,
            line: idx + 1,
        };
        syscalls.push(parser.parse(line.trim())?);
    }

    Ok(syscalls)
}

pub fn load_table(path: impl AsRef<Path>) -> Result<Vec<SyscallDescriptor>> {
    let path: PathBuf = path.as_ref().to_path_buf();
    let text = std::fs::read_to_string(&path).map_err(|e| GenError::io(&path, e))?;
    let syscalls = parse_table(&text, &path)?;
    log::info!("loaded {} syscalls from {}", syscalls.len(), path.display());
    Ok(syscalls)
}
