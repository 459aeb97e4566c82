//! retrofit-gen CLI
//!
//! Reads a Rust source file, finds the annotated trait and writes the
//! generated client (or the class model as JSON) to a file or stdout.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use retrofit_codegen::{Generator, GeneratorConfig, InterfaceDescriptor};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Emit {
    /// Rust source for the client
    Code,
    /// The class model, as JSON
    Model,
}

#[derive(Parser, Debug)]
#[command(name = "retrofit-gen")]
#[command(about = "Generates an HTTP client from an annotated Rust trait", long_about = None)]
struct Args {
    /// Rust source file containing the trait
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Name of the trait; required when several traits carry metadata
    #[arg(long = "trait", value_name = "NAME")]
    trait_name: Option<String>,

    /// Name of the generated client type (default: trait name + suffix)
    #[arg(long)]
    client: Option<String>,

    /// Path of the trait as seen from the generated file
    #[arg(long)]
    interface_path: Option<String>,

    /// Write output here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Emit::Code)]
    emit: Emit,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = match &args.config {
        Some(path) => GeneratorConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => GeneratorConfig::default(),
    };

    let source = std::fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let interface = InterfaceDescriptor::from_source(&source, args.trait_name.as_deref())
        .with_context(|| format!("failed to read trait from {}", args.input.display()))?;

    let generator = Generator::default();
    let output = match args.emit {
        Emit::Model => {
            let class = generator.build(&interface)?;
            serde_json::to_string_pretty(&class)?
        }
        Emit::Code => {
            let mut target = config.target_for(&interface.name);
            if let Some(client) = args.client {
                target.client_name = client;
            }
            if let Some(path) = args.interface_path {
                target = target.with_interface_path(path);
            }
            generator.generate(&interface, &target)?
        }
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, &output)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), interface = %interface.name, "wrote client");
        }
        None => print!("{output}"),
    }
    Ok(())
}
