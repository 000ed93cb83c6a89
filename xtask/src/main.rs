use std::path::PathBuf;
use std::process::Command;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use schemars::schema_for;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Repo automation tasks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Run the local CI suite (see `CI_STEPS`).
    Ci {
        /// Skip the fuzz package check.
        #[arg(long)]
        no_fuzz: bool,
    },

    /// Generate JSON Schemas for patch input and config into `schemas/`.
    Schema {
        #[arg(long, default_value = "schemas")]
        out_dir: PathBuf,
    },
}

/// Steps run by `xtask ci`, in order. The last one checks `fuzz/`, which
/// is excluded from the workspace and so missed by `--workspace`.
const CI_STEPS: &[(&str, &[&str])] = &[
    ("fmt", &["fmt", "--all", "--check"]),
    (
        "clippy",
        &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
    ),
    ("test", &["test", "--workspace"]),
    ("fuzz", &["check", "--manifest-path", "fuzz/Cargo.toml", "--bins"]),
];

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.cmd {
        Cmd::Ci { no_fuzz } => ci(no_fuzz),
        Cmd::Schema { out_dir } => schema(out_dir),
    }
}

fn ci(no_fuzz: bool) -> Result<()> {
    for (name, args) in CI_STEPS {
        if no_fuzz && *name == "fuzz" {
            eprintln!("ci: skipping {name}");
            continue;
        }
        eprintln!("ci: {name}");
        run("cargo", args).with_context(|| format!("ci step '{name}'"))?;
    }
    Ok(())
}

fn schema(out_dir: PathBuf) -> Result<()> {
    std::fs::create_dir_all(&out_dir).context("create schema output dir")?;

    let patch_path = out_dir.join("patchsmith.patch.schema.json");
    let cfg_path = out_dir.join("patchsmith.config.schema.json");

    write_pretty_json(&patch_path, &schema_for!(patchsmith_types::Patch))?;
    write_pretty_json(&cfg_path, &schema_for!(patchsmith_types::ConfigFile))?;

    eprintln!("wrote {}", patch_path.display());
    eprintln!("wrote {}", cfg_path.display());
    Ok(())
}

fn write_pretty_json(path: &std::path::Path, value: &impl serde::Serialize) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value).context("serialize json")?;
    std::fs::write(path, bytes).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

fn run(bin: &str, args: &[&str]) -> Result<()> {
    let status = Command::new(bin)
        .args(args)
        .status()
        .with_context(|| format!("run {bin} {args:?}"))?;
    if !status.success() {
        bail!("command failed: {bin} {args:?}");
    }
    Ok(())
}
