use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use syscall_gen::vcs::{Git, NoVcs, VersionControl};
use syscall_gen::{GenConfig, Regenerator};

#[derive(Parser, Debug)]
#[command(version, about = "Regenerate the assembly syscall stubs from SYSCALLS.TXT")]
struct Args {
    /// libc source root. Defaults to $ANDROID_BUILD_TOP/bionic/libc.
    #[arg(short, long)]
    libc_root: Option<PathBuf>,

    /// TOML config; `<libc-root>/gensyscalls.toml` is used when present.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long)]
    staging_dir: Option<PathBuf>,

    /// Compute and report the changes without touching the tree.
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Do not call git.
    #[arg(long)]
    no_vcs: bool,
}

fn libc_root(args: &Args) -> Result<PathBuf> {
    if let Some(root) = &args.libc_root {
        return Ok(root.clone());
    }
    let top = std::env::var_os("ANDROID_BUILD_TOP")
        .ok_or_else(|| anyhow!("pass --libc-root or set ANDROID_BUILD_TOP"))?;
    Ok(PathBuf::from(top).join("bionic").join("libc"))
}

fn load_config(args: &Args, root: &Path) -> Result<GenConfig> {
    let path = match &args.config {
        Some(path) => Some(path.clone()),
        None => Some(root.join("gensyscalls.toml")).filter(|p| p.is_file()),
    };

    let mut config = match path {
        Some(path) => GenConfig::new(&path)
            .with_context(|| format!("loading config: {}", path.display()))?,
        None => GenConfig::default(),
    };
    if let Some(dir) = &args.staging_dir {
        config.staging_dir = dir.clone();
    }
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let root = libc_root(&args)?;
    let root = root
        .canonicalize()
        .with_context(|| format!("libc root not found: {}", root.display()))?;
    let config = load_config(&args, &root)?;
    log::debug!("{:?}", config);

    let mut vcs: Box<dyn VersionControl> = if args.no_vcs || args.dry_run {
        Box::new(NoVcs)
    } else {
        Box::new(Git::new(&root))
    };

    let plan = Regenerator::new(&root, config, args.dry_run)
        .run(vcs.as_mut())
        .with_context(|| format!("regenerating stubs in {}", root.display()))?;

    if !plan.is_empty() {
        log::info!("ready to go!!");
    }
    Ok(())
}
