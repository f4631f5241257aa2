mod config;
mod inspect;

use std::io::{IsTerminal, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use config::{SlimctlConfigFile, load_config_file};
use inspect::{Summary, check_documented_limits};
use pkg_constants::paths::DEFAULT_SLIMCTL_CONFIG;
use pkg_slim::codec::{self, Object};
use pkg_slim::{EndpointSlice, EndpointSliceList, WireFormat};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "slimctl", about = "Convert and inspect Kubernetes EndpointSlices")]
struct Cli {
    /// Path to a YAML config file
    #[arg(long, default_value = DEFAULT_SLIMCTL_CONFIG)]
    config: String,

    /// Log filter (overrides RUST_LOG and the config file)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode a slice and re-encode it in another format
    Convert {
        /// Input format: json, yaml or protobuf
        #[arg(long)]
        from: Option<WireFormat>,
        /// Output format: json, yaml or protobuf
        #[arg(long)]
        to: Option<WireFormat>,
        /// The document is an EndpointSliceList
        #[arg(long)]
        list: bool,
        /// Read from a file instead of stdin
        #[arg(long)]
        input: Option<PathBuf>,
        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
        /// Indent JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Print a summary of each slice
    Inspect {
        /// Input format: json, yaml or protobuf
        #[arg(long)]
        from: Option<WireFormat>,
        /// The document is an EndpointSliceList
        #[arg(long)]
        list: bool,
        /// Read from a file instead of stdin
        #[arg(long)]
        input: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let file_config: SlimctlConfigFile = load_config_file(&cli.config)
        .with_context(|| format!("loading config {}", cli.config))?;
    init_tracing(cli.log_level.as_deref(), file_config.log_level.as_deref());

    match cli.command {
        Commands::Convert {
            from,
            to,
            list,
            input,
            output,
            pretty,
        } => {
            let from = resolve_format(from, file_config.input_format.as_deref())?;
            let to = resolve_format(to, file_config.output_format.as_deref())?;
            let pretty = pretty || file_config.pretty.unwrap_or(false);
            let bytes = read_input(input.as_deref())?;
            info!(%from, %to, list, "converting {} bytes", bytes.len());

            let out = if list {
                convert::<EndpointSliceList>(from, to, &bytes, pretty)?
            } else {
                convert::<EndpointSlice>(from, to, &bytes, pretty)?
            };
            write_output(output.as_deref(), &out, to)?;
        }
        Commands::Inspect { from, list, input } => {
            let from = resolve_format(from, file_config.input_format.as_deref())?;
            let bytes = read_input(input.as_deref())?;
            let slices = if list {
                codec::decode::<EndpointSliceList>(from, &bytes)?.items
            } else {
                vec![codec::decode::<EndpointSlice>(from, &bytes)?]
            };

            for (i, slice) in slices.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                check_documented_limits(slice);
                println!("{}", Summary::of(slice));
            }
            if slices.is_empty() {
                println!("(no slices)");
            }
        }
    }

    Ok(())
}

fn init_tracing(flag: Option<&str>, file: Option<&str>) {
    let filter = match flag {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(file.unwrap_or("warn"))),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Command-line flag, then config file, then JSON.
fn resolve_format(flag: Option<WireFormat>, file: Option<&str>) -> anyhow::Result<WireFormat> {
    if let Some(format) = flag {
        return Ok(format);
    }
    match file {
        Some(name) => Ok(name.parse()?),
        None => Ok(WireFormat::Json),
    }
}

fn convert<T: Object>(
    from: WireFormat,
    to: WireFormat,
    bytes: &[u8],
    pretty: bool,
) -> anyhow::Result<Vec<u8>> {
    let object: T = codec::decode(from, bytes)?;
    Ok(codec::encode(to, &object, pretty)?)
}

fn read_input(path: Option<&Path>) -> anyhow::Result<Vec<u8>> {
    match path {
        Some(path) => std::fs::read(path).with_context(|| format!("reading {}", path.display())),
        None => {
            let mut buf = Vec::new();
            std::io::stdin()
                .lock()
                .read_to_end(&mut buf)
                .context("reading stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&Path>, bytes: &[u8], format: WireFormat) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
            info!("wrote {} bytes to {}", bytes.len(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            if format.is_binary() && stdout.is_terminal() {
                warn!("writing {} output to a terminal", format);
            }
            stdout.write_all(bytes)?;
            if !format.is_binary() && !bytes.ends_with(b"\n") {
                stdout.write_all(b"\n")?;
            }
            stdout.flush()?;
        }
    }
    Ok(())
}
