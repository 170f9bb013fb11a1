use std::fmt::Write;

/// Appends one `.globl`/`.equ` pair per alias, binding it to `func`.
pub fn add_aliases<S: AsRef<str>>(mut stub: String, func: &str, aliases: &[S]) -> String {
    for alias in aliases {
        let alias = alias.as_ref();
        // writing into a String cannot fail
        let _ = write!(
            stub,
            "\n    .globl _C_LABEL({alias})\n    .equ _C_LABEL({alias}), _C_LABEL({func})\n"
        );
    }
    stub
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_aliases_leaves_stub_alone() {
        let stub = "END(read)\n".to_string();
        assert_eq!(add_aliases::<&str>(stub.clone(), "read", &[]), stub);
    }

    #[test]
    fn each_alias_gets_a_directive_pair() {
        let out = add_aliases("END(lseek64)\n".to_string(), "lseek64", &["lseek", "llseek"]);
        assert_eq!(
            out,
            "END(lseek64)\n\
             \n    .globl _C_LABEL(lseek)\n    .equ _C_LABEL(lseek), _C_LABEL(lseek64)\n\
             \n    .globl _C_LABEL(llseek)\n    .equ _C_LABEL(llseek), _C_LABEL(lseek64)\n"
        );
    }
}
