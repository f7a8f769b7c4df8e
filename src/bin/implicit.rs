#![allow(clippy::print_stderr)]

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::io::IsTerminal;
use std::path::PathBuf;

use implicit::common::diagnostics::diagnostic_codes;
use implicit::common::{Diagnostic, DiagnosticCategory, SourceLocation, parse_options};
use implicit::request::{self, DeriveRequest};
use implicit::resolver::DerivationError;

/// Exit status when a derivation or request fails.
const EXIT_FAILURE: i32 = 1;

#[derive(Parser, Debug)]
#[command(
    name = "implicit",
    version,
    about = "Derive implicit values and refinements from types"
)]
struct Cli {
    /// Disable colored diagnostics.
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve every target of a JSON derivation request and print the program.
    Derive(DeriveArgs),
}

#[derive(Args, Debug)]
struct DeriveArgs {
    /// Path to the request file.
    request: PathBuf,

    /// Attach a comment with the derived type to every shared derivation.
    #[arg(long = "emitTypeComments", alias = "emit-type-comments")]
    emit_type_comments: bool,

    /// Options as JSON, replacing the request's own `options`.
    #[arg(long)]
    options: Option<String>,

    /// Write the program here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON value to test every derived refinement against (repeatable).
    #[arg(long = "sample", value_name = "JSON")]
    samples: Vec<String>,
}

fn main() -> Result<()> {
    // Initialize tracing if IMPLICIT_LOG or RUST_LOG is set.
    implicit::tracing_config::init_tracing();

    let cli = Cli::parse();
    let color = !cli.no_color && std::io::stderr().is_terminal();
    colored::control::set_override(color);

    match cli.command {
        Command::Derive(args) => {
            if let Err(error) = derive(&args) {
                report(&error, &args);
                std::process::exit(EXIT_FAILURE);
            }
        }
    }
    Ok(())
}

fn derive(args: &DeriveArgs) -> Result<()> {
    let mut request = DeriveRequest::load(&args.request)?;
    if let Some(options) = &args.options {
        request.options = parse_options(options).map_err(|error| {
            let location = SourceLocation::new(args.request.display().to_string(), 1, 1);
            let diagnostic = Diagnostic::from_code(
                &location,
                diagnostic_codes::INVALID_DERIVE_OPTIONS,
                &[&error.to_string()],
            );
            anyhow::anyhow!(diagnostic.message_text)
        })?;
    }
    if args.emit_type_comments {
        request.options = request.options.with_type_comments(true);
    }

    let output = request::run(&request)?;
    let code = output.code();
    match &args.output {
        Some(path) => std::fs::write(path, &code)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => print!("{code}"),
    }

    for sample in &args.samples {
        let value: serde_json::Value = serde_json::from_str(sample)
            .with_context(|| format!("sample `{sample}` is not JSON"))?;
        for (index, target) in output.targets.iter().enumerate() {
            let passed = output.predicate(index)?.test(&value);
            let mark = if passed { "pass".green() } else { "fail".red() };
            eprintln!("{} {} {}", mark, target.name.bold(), sample);
        }
    }
    Ok(())
}

fn report(error: &anyhow::Error, args: &DeriveArgs) {
    match error.downcast_ref::<DerivationError>() {
        Some(derivation) => {
            let diagnostic = derivation.to_diagnostic();
            let location = format!("{}:{}:{}", diagnostic.file, diagnostic.line, diagnostic.column);
            let category = match diagnostic.category {
                DiagnosticCategory::Error => "error".red().bold(),
                DiagnosticCategory::Warning => "warning".yellow().bold(),
                DiagnosticCategory::Suggestion | DiagnosticCategory::Message => {
                    "message".blue().bold()
                }
            };
            eprintln!(
                "{} - {} {}: {}",
                location.cyan(),
                category,
                format!("IMP{}", diagnostic.code).bright_black(),
                diagnostic.message_text
            );
        }
        None => eprintln!(
            "{} {}: {:#}",
            "error".red().bold(),
            args.request.display(),
            error
        ),
    }
}
