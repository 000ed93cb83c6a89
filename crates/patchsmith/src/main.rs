use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use tracing::{debug, info};

use patchsmith_core::{render_changes, UnifiedEncoder};
use patchsmith_types::{ConfigFile, Defaults, OutputFormat, Patch, DEFAULT_CONTEXT_LINES};

mod config_loader;
mod env_expand;

use config_loader::load_config_with_includes;
use env_expand::expand_env_vars;

const DEFAULT_CONFIG_FILE: &str = "patchsmith.toml";

#[derive(Parser)]
#[command(name = "patchsmith")]
#[command(about = "Render aligned diff chunks as unified diffs", long_about = None)]
struct Cli {
    /// Enable verbose (info-level) logging to stderr.
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Enable debug-level logging to stderr.
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a JSON patch (or an array of patches) as a unified diff.
    Render(RenderArgs),

    /// Print the JSON schema for patch input or the config file.
    Schema(SchemaArgs),

    /// Print the effective configuration as TOML.
    Config(ConfigArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// JSON input file, or '-' for stdin.
    #[arg(long, value_name = "PATH")]
    input: PathBuf,

    /// Output format (overrides config).
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Unchanged lines kept around each change (overrides config).
    #[arg(long, value_name = "N")]
    context: Option<u32>,

    /// Write output here instead of stdout.
    #[arg(long, value_name = "PATH")]
    out: Option<PathBuf>,

    /// Path to a config file. If omitted, uses ./patchsmith.toml if present.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct SchemaArgs {
    #[arg(long, value_enum, default_value_t = SchemaKind::Patch)]
    kind: SchemaKind,
}

#[derive(Parser, Debug)]
struct ConfigArgs {
    /// Path to a config file. If omitted, uses ./patchsmith.toml if present.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Plain,
    Markup,
}

impl From<FormatArg> for OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Plain => OutputFormat::Plain,
            FormatArg::Markup => OutputFormat::Markup,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SchemaKind {
    Patch,
    Config,
}

/// Render input: one patch, or several per-change patches of a commit.
#[derive(Deserialize)]
#[serde(untagged)]
enum PatchInput {
    Many(Vec<Patch>),
    One(Patch),
}

#[cfg(not(test))]
fn main() -> std::process::ExitCode {
    match run_with_args(std::env::args_os()) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err:?}");
            std::process::ExitCode::from(1)
        }
    }
}

fn run_with_args<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = Cli::parse_from(args);
    init_logging(cli.verbose, cli.debug);

    match cli.command {
        Commands::Render(args) => cmd_render(args),
        Commands::Schema(args) => cmd_schema(args),
        Commands::Config(args) => cmd_config(args),
    }
}

/// Initialize tracing/logging based on CLI flags.
fn init_logging(verbose: bool, debug: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    debug!("Logging initialized at level: {}", level);
}

fn cmd_render(args: RenderArgs) -> Result<()> {
    let defaults = load_defaults(args.config)?;
    let context = args
        .context
        .or(defaults.context_lines)
        .unwrap_or(DEFAULT_CONTEXT_LINES);
    let format = args
        .format
        .map(OutputFormat::from)
        .or(defaults.format)
        .unwrap_or_default();
    info!(context, format = format.as_str(), "rendering");

    let text = read_input(&args.input)?;
    let input: PatchInput = serde_json::from_str(&text)
        .with_context(|| format!("parse patch JSON from {}", args.input.display()))?;

    let encoder = UnifiedEncoder::new(context as usize).with_format(format);
    let mut out = open_output(args.out.as_deref())?;

    match input {
        PatchInput::One(patch) => {
            debug!(files = patch.files.len(), "encoding single patch");
            encoder.encode(&patch, &mut out)?;
        }
        PatchInput::Many(patches) => {
            debug!(changes = patches.len(), "encoding change list");
            out.write_all(render_changes(&encoder, &patches).as_bytes())
                .context("write rendered changes")?;
        }
    }

    out.flush().context("flush output")?;
    Ok(())
}

fn cmd_schema(args: SchemaArgs) -> Result<()> {
    let schema = match args.kind {
        SchemaKind::Patch => schemars::schema_for!(Patch),
        SchemaKind::Config => schemars::schema_for!(ConfigFile),
    };
    let s = serde_json::to_string_pretty(&schema).context("render schema")?;
    println!("{s}");
    Ok(())
}

fn cmd_config(args: ConfigArgs) -> Result<()> {
    let effective = ConfigFile {
        includes: Vec::new(),
        defaults: load_defaults(args.config)?,
    };
    let s = toml::to_string_pretty(&effective).context("render toml")?;
    print!("{s}");
    Ok(())
}

/// Built-in defaults overlaid with the config file, if one is found.
fn load_defaults(path: Option<PathBuf>) -> Result<Defaults> {
    let user_path = path.or_else(|| {
        let p = PathBuf::from(DEFAULT_CONFIG_FILE);
        if p.exists() { Some(p) } else { None }
    });

    let Some(path) = user_path else {
        debug!("No config file found, using built-in defaults");
        return Ok(Defaults::built_in());
    };

    info!("Loading config from: {}", path.display());
    let parsed = load_config_with_includes(&path, |s| expand_env_vars(s).map(Cow::into_owned))?;
    Ok(Defaults::built_in().merged_with(parsed.defaults))
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        info!("Reading patch from stdin");
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("read patch from stdin")?;
        Ok(buf)
    } else {
        info!("Reading patch from file: {}", path.display());
        std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
    }
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    let Some(path) = path else {
        return Ok(Box::new(BufWriter::new(io::stdout().lock())));
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create dir {}", parent.display()))?;
        }
    }
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    Ok(Box::new(BufWriter::new(file)))
}
