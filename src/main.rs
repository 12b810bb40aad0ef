//! dtsdoc: TypeScript declaration files from JSDoc doclets.
//!
//! Reads the JSON written by `jsdoc -X` and emits one `.d.ts` file.
//!
//! # Logging
//!
//! Integrity warnings are silent unless `--verbose` is given. Set the
//! `DTSDOC_LOG` environment variable to choose the level explicitly:
//!
//! ```bash
//! DTSDOC_LOG=debug dtsdoc doclets.json
//! ```

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use dtsdoc_emit::{AccessLevel, Destination, Diagnostics, Doclet, PublishOutcome, publish};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;
use config::DtsdocConfig;

#[derive(Parser, Debug)]
#[command(name = "dtsdoc", version, about = "Generate TypeScript declarations from JSDoc doclets")]
struct Cli {
    /// Doclet JSON produced by `jsdoc -X`, or `-` for stdin
    input: String,

    /// Output directory, or `console` to print to stdout
    #[arg(short, long)]
    destination: Option<String>,

    /// Output file name (default: <package>.d.ts, else types.d.ts)
    #[arg(short, long)]
    out_file: Option<String>,

    /// Minimum access level to emit (default: package)
    #[arg(short, long, value_enum)]
    access: Option<Access>,

    /// Emit private members regardless of --access
    #[arg(short, long)]
    private: bool,

    /// Configuration file (default: ./dtsdoc.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log integrity warnings and print a summary
    #[arg(short, long)]
    verbose: bool,

    /// Write a markdown warnings report next to the output file
    #[arg(long)]
    report: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Access {
    Private,
    Package,
    Protected,
    Public,
}

impl From<Access> for AccessLevel {
    fn from(value: Access) -> Self {
        match value {
            Access::Private => AccessLevel::Private,
            Access::Package => AccessLevel::Package,
            Access::Protected => AccessLevel::Protected,
            Access::Public => AccessLevel::Public,
        }
    }
}

fn init_tracing(verbose: bool) {
    // DTSDOC_LOG wins; otherwise warnings only show with --verbose.
    let default = if verbose { "warn" } else { "error" };
    let filter = EnvFilter::try_from_env("DTSDOC_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(false)
                .with_target(true)
                .with_level(true),
        )
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(&cli) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = DtsdocConfig::load(cli.config.as_deref())?;
    let mut options = config.emit_options();
    if let Some(destination) = &cli.destination {
        options.destination = Destination::from(destination.as_str());
    }
    if let Some(out_file) = &cli.out_file {
        options.out_file = Some(out_file.clone());
    }
    if let Some(access) = cli.access {
        options.access = access.into();
    }
    if cli.private {
        options.private = true;
    }
    tracing::debug!(?options, "resolved emit options");

    let json = read_input(&cli.input)?;
    let docs = Doclet::parse_list(&json)
        .with_context(|| format!("failed to read doclets from {}", cli.input))?;

    let mut diags = Diagnostics::new();
    let stdout = io::stdout();
    let outcome = publish(&docs, &options, &mut diags, &mut stdout.lock())?;

    if cli.report {
        match &outcome.path {
            Some(path) => {
                let report = diags
                    .write_report(path)
                    .with_context(|| format!("failed to write report for {}", path.display()))?;
                tracing::info!(report = %report.display(), "wrote warnings report");
            }
            None => eprint!("{}", diags.report()),
        }
    }

    if cli.verbose {
        print_status(&outcome, diags.len()).context("failed to write status")?;
    }
    Ok(())
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut json = String::new();
        io::stdin()
            .read_to_string(&mut json)
            .context("failed to read doclets from stdin")?;
        Ok(json)
    } else {
        fs::read_to_string(input).with_context(|| format!("failed to read {input}"))
    }
}

fn print_status(outcome: &PublishOutcome, warnings: usize) -> io::Result<()> {
    let mut stderr = StandardStream::stderr(ColorChoice::Auto);
    stderr.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
    write!(stderr, "Generated")?;
    stderr.reset()?;
    write!(stderr, " {} declarations", outcome.declarations)?;
    if let Some(path) = &outcome.path {
        write!(stderr, " in {}", path.display())?;
    }
    if warnings > 0 {
        stderr.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
        write!(stderr, " ({warnings} warnings)")?;
        stderr.reset()?;
    }
    writeln!(stderr)
}
