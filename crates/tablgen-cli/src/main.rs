//! tablgen CLI - Generate templ table components from Go structs
//!
//! ```text
//! tablgen --file models/users.go User Group
//! ```
//!
//! Reads the Go source file, selects the named struct types (every struct
//! when no names are given) and writes `models/users_tabl.templ`.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use std::path::PathBuf;

mod config;
mod generate;

use config::{Config, Overrides};
use generate::{Destination, Request};

#[derive(Parser, Debug)]
#[command(name = "tablgen")]
#[command(author, version, about = "Generate templ table components from Go struct declarations", long_about = None)]
struct Cli {
    /// Go source file to read
    #[arg(short, long)]
    file: PathBuf,

    /// Struct types to generate tables for (default: all)
    types: Vec<String>,

    /// Path to tablgen.toml (default: ./tablgen.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output file name suffix (default: _tabl.templ)
    #[arg(long)]
    suffix: Option<String>,

    /// Directory of .tmpl files overriding the built-in templates
    #[arg(short, long)]
    templates: Option<PathBuf>,

    /// Root template to render (default: base.tmpl)
    #[arg(long)]
    root: Option<String>,

    /// Output directory (default: the source file's directory)
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Print the result instead of writing a file
    #[arg(long, conflicts_with = "out_dir")]
    stdout: bool,

    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = match cli.verbose {
        0 if cli.quiet => EnvFilter::new("error"),
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(cli.verbose >= 2),
        )
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    let mut config = Config::load(cli.config.as_deref(), &cwd)?;
    config.apply(Overrides {
        suffix: cli.suffix,
        root_template: cli.root,
        template_dir: cli.templates,
    });
    config.validate()?;

    let request = Request {
        file: cli.file,
        targets: cli.types,
        out_dir: cli.out_dir,
        destination: if cli.stdout {
            Destination::Stdout
        } else {
            Destination::File
        },
    };

    generate::run(&request, &config)
}
