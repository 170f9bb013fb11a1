mod common;

use std::collections::BTreeSet;

use pretty_assertions::assert_eq;
use syscall_gen::artifact::generate;
use syscall_gen::table::parse_table;
use syscall_gen::vcs::NoVcs;
use syscall_gen::{Arch, GenError, Regenerator};

use common::{RecordingVcs, Scratch};

const READ_TABLE: &str = "ssize_t read(int, void*, size_t) x86,x86_64,arm,mips\n";

fn set(paths: &[&str]) -> BTreeSet<String> {
    paths.iter().map(|p| p.to_string()).collect()
}

#[test]
fn read_on_every_arch() {
    let scratch = Scratch::new("read_on_every_arch");
    scratch.write("SYSCALLS.TXT", READ_TABLE);

    let mut vcs = RecordingVcs::default();
    let plan = Regenerator::new(&scratch.libc, scratch.config(false), false)
        .run(&mut vcs)
        .unwrap();

    let stubs: Vec<String> = Arch::all().map(|a| a.stub_path("read")).collect();
    let build_lists: Vec<String> = Arch::all().map(|a| a.build_list_path()).collect();

    let mut expected: BTreeSet<String> = stubs.iter().cloned().collect();
    expected.extend(build_lists.iter().cloned());
    assert_eq!(plan.additions, expected);
    assert!(plan.edits.is_empty());
    assert!(plan.deletions.is_empty());

    for stub in &stubs {
        let text = scratch.read(stub);
        assert!(!text.contains("_C_LABEL"), "{stub} has alias directives");
        assert!(!text.contains(".equ"), "{stub} has alias directives");
    }
    assert!(scratch.read("arch-x86/syscalls/read.S").contains("    mov     24(%esp), %edx\n"));
    assert!(!scratch.read("arch-x86_64/syscalls/read.S").contains("%r10"));
    assert!(scratch.read("arch-arm/syscalls/read.S").contains("b       __bionic_syscall_eabi\n"));
    assert_eq!(
        scratch.read("arch-mips/syscalls.mk"),
        "# Generated by gensyscalls. Do not edit.\n\
         syscall_src :=\n\
         syscall_src += arch-mips/syscalls/read.S\n"
    );

    assert!(vcs.added.contains(&scratch.libc.join("arch-arm/syscalls/read.S")));
    assert!(vcs.added.contains(&scratch.libc.join("SYSCALLS.TXT")));
    assert!(vcs.removed.is_empty());
}

#[test]
fn generation_is_deterministic() {
    let syscalls = parse_table(READ_TABLE, "SYSCALLS.TXT").unwrap();
    let a = generate(&syscalls, None).unwrap();
    let b = generate(&syscalls, None).unwrap();
    let a: Vec<_> = a.iter().cloned().collect();
    let b: Vec<_> = b.iter().cloned().collect();
    assert_eq!(a, b);
}

#[test]
fn second_run_is_a_no_op() {
    let scratch = Scratch::new("second_run_is_a_no_op");
    scratch.write("SYSCALLS.TXT", READ_TABLE);
    scratch.write_kernel_headers();

    let regen = Regenerator::new(&scratch.libc, scratch.config(true), false);
    let first = regen.run(&mut NoVcs).unwrap();
    assert!(!first.is_empty());
    let stub = scratch.read("arch-x86/syscalls/read.S");

    let mut vcs = RecordingVcs::default();
    let second = regen.run(&mut vcs).unwrap();
    assert!(second.is_empty(), "{:?}", second);
    assert_eq!(scratch.read("arch-x86/syscalls/read.S"), stub);
    assert!(vcs.added.is_empty());
}

#[test]
fn edits_and_deletions() {
    let scratch = Scratch::new("edits_and_deletions");
    scratch.write(
        "SYSCALLS.TXT",
        "ssize_t read(int, void*, size_t) arm\nint close(int) arm\n",
    );
    let regen = Regenerator::new(&scratch.libc, scratch.config(false), false);
    regen.run(&mut NoVcs).unwrap();
    let pristine = scratch.read("arch-arm/syscalls/read.S");

    scratch.write("SYSCALLS.TXT", "ssize_t read(int, void*, size_t) arm\n");
    scratch.write("arch-arm/syscalls/read.S", "hand edited\n");
    scratch.write("arch-mips/syscalls/stale.S", "left over\n");

    let mut vcs = RecordingVcs::default();
    let plan = regen.run(&mut vcs).unwrap();

    assert!(plan.additions.is_empty());
    assert_eq!(
        plan.edits,
        set(&["arch-arm/syscalls.mk", "arch-arm/syscalls/read.S"])
    );
    assert_eq!(
        plan.deletions,
        set(&["arch-arm/syscalls/close.S", "arch-mips/syscalls/stale.S"])
    );

    assert_eq!(scratch.read("arch-arm/syscalls/read.S"), pristine);
    assert!(!scratch.exists("arch-arm/syscalls/close.S"));
    assert!(!scratch.exists("arch-mips/syscalls/stale.S"));
    assert_eq!(
        vcs.removed,
        vec![
            scratch.libc.join("arch-arm/syscalls/close.S"),
            scratch.libc.join("arch-mips/syscalls/stale.S"),
        ]
    );
}

#[test]
fn dry_run_touches_nothing() {
    let scratch = Scratch::new("dry_run_touches_nothing");
    scratch.write("SYSCALLS.TXT", READ_TABLE);
    scratch.write("arch-arm/syscalls/gone.S", "old\n");

    let mut vcs = RecordingVcs::default();
    let plan = Regenerator::new(&scratch.libc, scratch.config(false), true)
        .run(&mut vcs)
        .unwrap();

    assert_eq!(plan.additions.len(), 8);
    assert_eq!(plan.deletions, set(&["arch-arm/syscalls/gone.S"]));
    assert!(scratch.exists("arch-arm/syscalls/gone.S"));
    assert!(!scratch.exists("arch-arm/syscalls/read.S"));
    assert!(!scratch.exists("arch-x86/syscalls.mk"));
    assert!(vcs.added.is_empty() && vcs.removed.is_empty());
}

#[test]
fn dispatch_off_x86_is_rejected_before_writing() {
    let scratch = Scratch::new("dispatch_off_x86_is_rejected_before_writing");
    scratch.write(
        "SYSCALLS.TXT",
        "ssize_t read(int, void*, size_t) all\nint socket:socketcall:1(int, int, int) x86,x86_64\n",
    );

    let err = Regenerator::new(&scratch.libc, scratch.config(false), false)
        .run(&mut NoVcs)
        .unwrap_err();
    match err {
        GenError::DispatchUnsupported { func, arch } => {
            assert_eq!(func, "socket");
            assert_eq!(arch, Arch::X86_64);
        }
        other => panic!("unexpected error: {other}"),
    }

    assert!(!scratch.staging.exists());
    assert!(!scratch.exists("arch-x86"));
    assert!(!scratch.exists("arch-arm"));
}

#[test]
fn socketcall_on_x86() {
    let scratch = Scratch::new("socketcall_on_x86");
    scratch.write("SYSCALLS.TXT", "int socket:socketcall:1(int, int, int) x86\n");

    Regenerator::new(&scratch.libc, scratch.config(false), false)
        .run(&mut NoVcs)
        .unwrap();

    let text = scratch.read("arch-x86/syscalls/socket.S");
    assert!(text.contains("    mov     $1, %ebx\n    mov     %esp, %ecx\n    addl    $12, %ecx\n"));
    assert!(text.contains("$__NR_socketcall"));
    assert!(!scratch.exists("arch-arm/syscalls/socket.S"));
}

#[test]
fn compat_header() {
    let scratch = Scratch::new("compat_header");
    scratch.write("SYSCALLS.TXT", READ_TABLE);
    scratch.write_kernel_headers();

    Regenerator::new(&scratch.libc, scratch.config(true), false)
        .run(&mut NoVcs)
        .unwrap();

    assert_eq!(
        scratch.read("include/sys/glibc-syscalls.h"),
        "/* Generated by gensyscalls. Do not edit. */\n\
         #ifndef _BIONIC_GLIBC_SYSCALLS_H_\n\
         #define _BIONIC_GLIBC_SYSCALLS_H_\n\
         #if defined(__arm__)\n\
         #define SYS_close __NR_close\n\
         #define SYS_read __NR_read\n\
         #elif defined(__mips__)\n\
         #define SYS_read __NR_read\n\
         #elif defined(__i386__)\n\
         #define SYS_read __NR_read\n\
         #elif defined(__x86_64__)\n\
         #define SYS_read __NR_read\n\
         #endif\n\
         #endif /* _BIONIC_GLIBC_SYSCALLS_H_ */\n"
    );
}

#[test]
fn missing_kernel_header_aborts() {
    let scratch = Scratch::new("missing_kernel_header_aborts");
    scratch.write("SYSCALLS.TXT", READ_TABLE);
    scratch.write_kernel_headers();
    std::fs::remove_file(scratch.libc.join("kernel/arch-x86/asm/unistd_64.h")).unwrap();

    let err = Regenerator::new(&scratch.libc, scratch.config(true), false)
        .run(&mut NoVcs)
        .unwrap_err();
    assert!(matches!(
        err,
        GenError::MissingKernelHeader { arch: Arch::X86_64, .. }
    ));
    assert!(!scratch.exists("arch-arm"));
}

#[test]
fn staging_inside_the_tree_is_refused() {
    let scratch = Scratch::new("staging_inside_the_tree_is_refused");
    scratch.write("SYSCALLS.TXT", READ_TABLE);

    let mut config = scratch.config(false);
    config.staging_dir = scratch.libc.join("out");
    let err = Regenerator::new(&scratch.libc, config, false)
        .run(&mut NoVcs)
        .unwrap_err();
    assert!(matches!(err, GenError::StagingInsideTree { .. }));
}

#[test]
fn staging_that_resolves_to_the_tree_is_refused() {
    let scratch = Scratch::new("staging_that_resolves_to_the_tree_is_refused");
    scratch.write("SYSCALLS.TXT", READ_TABLE);
    scratch.write("keep_me.c", "int main;\n");
    std::fs::create_dir_all(&scratch.staging).unwrap();

    let mut config = scratch.config(false);
    config.staging_dir = scratch.staging.join("..").join("libc");
    let err = Regenerator::new(&scratch.libc, config, false)
        .run(&mut NoVcs)
        .unwrap_err();

    assert!(matches!(err, GenError::StagingInsideTree { .. }));
    assert!(scratch.exists("keep_me.c"));
    assert!(scratch.exists("SYSCALLS.TXT"));
}

#[test]
fn foreign_staging_dir_is_left_alone() {
    let scratch = Scratch::new("foreign_staging_dir_is_left_alone");
    scratch.write("SYSCALLS.TXT", READ_TABLE);
    std::fs::create_dir_all(&scratch.staging).unwrap();
    std::fs::write(scratch.staging.join("notes.txt"), "not ours\n").unwrap();

    let err = Regenerator::new(&scratch.libc, scratch.config(false), false)
        .run(&mut NoVcs)
        .unwrap_err();

    assert!(matches!(err, GenError::StagingNotOwned { .. }));
    assert!(scratch.staging.join("notes.txt").exists());
    assert!(!scratch.exists("arch-arm"));
}
