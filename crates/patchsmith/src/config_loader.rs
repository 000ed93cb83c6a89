//! Config loading with include resolution.
//!
//! `includes` are resolved relative to the including file and loaded first;
//! the including file's own `[defaults]` win over anything it includes.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::debug;

use patchsmith_types::ConfigFile;

const MAX_INCLUDE_DEPTH: usize = 10;

/// Load `path` and everything it includes into one config with no
/// remaining `includes`.
pub fn load_config_with_includes<F>(path: &Path, expand_env: F) -> Result<ConfigFile>
where
    F: Fn(&str) -> Result<String> + Copy,
{
    let mut stack = HashSet::new();
    load_recursive(path, expand_env, &mut stack, 0)
}

fn load_recursive<F>(
    path: &Path,
    expand_env: F,
    stack: &mut HashSet<PathBuf>,
    depth: usize,
) -> Result<ConfigFile>
where
    F: Fn(&str) -> Result<String> + Copy,
{
    if depth > MAX_INCLUDE_DEPTH {
        bail!(
            "include depth exceeded maximum of {} levels at '{}'",
            MAX_INCLUDE_DEPTH,
            path.display()
        );
    }

    let canonical = path
        .canonicalize()
        .with_context(|| format!("canonicalize path '{}'", path.display()))?;
    if !stack.insert(canonical.clone()) {
        bail!("circular include detected: '{}'", path.display());
    }

    debug!("loading config from '{}' (depth {})", path.display(), depth);

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read config '{}'", path.display()))?;
    let expanded = expand_env(&text)?;
    let config: ConfigFile =
        toml::from_str(&expanded).with_context(|| format!("parse config '{}'", path.display()))?;

    let base_dir = path.parent().unwrap_or(Path::new("."));
    let mut merged = ConfigFile::default();

    for include in &config.includes {
        let full_path = base_dir.join(include);
        if !full_path.exists() {
            bail!(
                "included config file not found: '{}' (resolved from '{}')",
                full_path.display(),
                include
            );
        }
        let included = load_recursive(&full_path, expand_env, stack, depth + 1)?;
        merged = merge_configs(merged, included);
    }

    // A diamond (two files including the same third) is fine; only the
    // current include chain is checked for cycles.
    stack.remove(&canonical);

    Ok(merge_configs(
        merged,
        ConfigFile {
            includes: Vec::new(),
            defaults: config.defaults,
        },
    ))
}

/// Overlay `other` on `base`. Fields `other` leaves unset keep their
/// earlier value; set fields win even when equal to the built-ins.
fn merge_configs(base: ConfigFile, other: ConfigFile) -> ConfigFile {
    ConfigFile {
        includes: Vec::new(),
        defaults: base.defaults.merged_with(other.defaults),
    }
}
