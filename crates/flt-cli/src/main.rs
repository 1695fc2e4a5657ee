//! `flt` CLI — convert FLT filter files to and from JSON.
//!
//! ## Usage
//!
//! ```sh
//! # Encode a JSON filter to FLT (stdin → stdout)
//! echo '{"operation":"AND","conditions":[]}' | flt encode > filter.flt
//!
//! # Encode from file to file
//! flt encode -i filter.json -o filter.flt
//!
//! # Decode FLT to pretty-printed JSON, omitting default heads
//! flt decode -i filter.flt --strip-defaults
//!
//! # Fill in default heads and canonical names
//! flt normalize -i filter.json
//!
//! # Convert every .flt file in a directory to .json next to it
//! flt convert ./filters
//! ```
//!
//! Logging goes to stderr; set `FLT_LOG` (or `RUST_LOG`) or pass `-v`.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use flt_core::JsonFilter;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "flt", version, about = "FLT filter file converter")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log filter directive (overrides RUST_LOG)
    #[arg(long, env = "FLT_LOG", global = true)]
    log: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a JSON filter to FLT bytes
    Encode {
        /// Input JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Output FLT file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Decode FLT bytes to a JSON filter
    Decode {
        /// Input FLT file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Output JSON file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Omit `head` values that equal their defaults
        #[arg(long)]
        strip_defaults: bool,
    },
    /// Fill in default `head` values and canonical names of a JSON filter
    Normalize {
        /// Input JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Output JSON file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Convert every `.flt` file in a directory to a `.json` file beside it
    Convert {
        /// Directory to scan
        #[arg(default_value = ".")]
        dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log.as_deref());

    match cli.command {
        Commands::Encode { input, output } => {
            let json = read_text(input.as_deref())?;
            let bytes = flt_core::json_to_bytes(&json).context("Failed to encode JSON to FLT")?;
            write_output(output.as_deref(), &bytes)?;
        }
        Commands::Decode {
            input,
            output,
            strip_defaults,
        } => {
            let bytes = read_bytes(input.as_deref())?;
            let pretty = decode_to_pretty_json(&bytes, strip_defaults)?;
            write_output(output.as_deref(), pretty.as_bytes())?;
        }
        Commands::Normalize { input, output } => {
            let json = read_text(input.as_deref())?;
            let filter: JsonFilter =
                serde_json::from_str(&json).context("Input is not a valid JSON filter")?;
            let pretty = serde_json::to_string_pretty(&flt_core::normalize(&filter))?;
            write_output(output.as_deref(), pretty.as_bytes())?;
        }
        Commands::Convert { dir } => convert_dir(&dir)?,
    }

    Ok(())
}

fn init_logging(verbose: bool, directive: Option<&str>) {
    let filter = match directive {
        Some(directive) => directive.to_string(),
        None if verbose => "debug".to_string(),
        None => std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string()),
    };

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_target(false)
        .with_ansi(false)
        .compact()
        .with_env_filter(filter)
        .init();
}

fn decode_to_pretty_json(bytes: &[u8], strip_defaults: bool) -> Result<String> {
    let group = flt_core::decode(bytes).context("Failed to decode FLT")?;
    let mut filter = flt_core::to_json(&group);
    if strip_defaults {
        filter = flt_core::strip_defaults(&filter);
    }
    Ok(serde_json::to_string_pretty(&filter)?)
}

fn convert_dir(dir: &Path) -> Result<()> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "flt"))
        .collect();
    files.sort();

    if files.is_empty() {
        tracing::warn!(dir = %dir.display(), "no .flt files found");
    }

    for flt_path in files {
        let bytes = std::fs::read(&flt_path)
            .with_context(|| format!("Failed to read file: {}", flt_path.display()))?;
        let pretty = decode_to_pretty_json(&bytes, false)
            .with_context(|| format!("Failed to convert {}", flt_path.display()))?;
        let json_path = flt_path.with_extension("json");
        std::fs::write(&json_path, pretty)
            .with_context(|| format!("Failed to write file: {}", json_path.display()))?;
        println!("Converted {} to {}", flt_path.display(), json_path.display());
    }
    Ok(())
}

fn read_bytes(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(path) => {
            std::fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))
        }
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn read_text(path: Option<&Path>) -> Result<String> {
    let bytes = read_bytes(path)?;
    String::from_utf8(bytes).context("Input is not valid UTF-8")
}

fn write_output(path: Option<&Path>, content: &[u8]) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path.display()))?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(content).context("Failed to write to stdout")?;
            stdout.flush().context("Failed to write to stdout")?;
        }
    }
    Ok(())
}
