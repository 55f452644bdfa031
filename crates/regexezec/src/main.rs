//! Regexeze command line.
//!
//! `regexezec translate` prints the standard-syntax regex for a Regexeze
//! pattern; `regexezec match` matches one against a target string and
//! reports the captured groups. The pattern comes from `--pattern`,
//! `--filename`, or, with neither, standard input.

mod report;

use std::io;
use std::path::PathBuf;
use std::process::exit;

use clap::{Parser, Subcommand};
use colored::Colorize;
use regexeze::{Error, Pattern};

#[derive(Parser)]
#[command(name = "regexezec")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Translate and match patterns written in Regexeze")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate a Regexeze pattern to standard regex syntax
    Translate {
        /// A pattern in Regexeze
        #[arg(short, long, conflicts_with = "filename")]
        pattern: Option<String>,

        /// A file containing a Regexeze pattern
        #[arg(short, long)]
        filename: Option<PathBuf>,
    },
    /// Match a target string against a Regexeze pattern
    Match {
        /// A pattern in Regexeze
        #[arg(short, long, conflicts_with = "filename")]
        pattern: Option<String>,

        /// A file containing a Regexeze pattern
        #[arg(short, long)]
        filename: Option<PathBuf>,

        /// The string to match
        #[arg(short, long)]
        target_string: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Translate { pattern, filename } => run_translate(pattern, filename),
        Commands::Match {
            pattern,
            filename,
            target_string,
        } => run_match(pattern, filename, &target_string),
    };

    if let Err(err) = result {
        eprintln!("{} {}", "error:".red().bold(), err);
        exit(1);
    }
}

/// Compile from whichever source was selected; stdin when neither flag is
/// given.
fn load_pattern(pattern: Option<String>, filename: Option<PathBuf>) -> Result<Pattern, Error> {
    match (pattern, filename) {
        (Some(pattern), _) => regexeze::compile(&pattern),
        (None, Some(path)) => regexeze::compile_file(path),
        (None, None) => regexeze::compile_reader(io::stdin().lock()),
    }
}

fn run_translate(pattern: Option<String>, filename: Option<PathBuf>) -> Result<(), Error> {
    let compiled = load_pattern(pattern, filename)?;
    println!("{}", compiled.as_str());
    Ok(())
}

fn run_match(
    pattern: Option<String>,
    filename: Option<PathBuf>,
    target: &str,
) -> Result<(), Error> {
    let compiled = load_pattern(pattern, filename)?;
    match compiled.match_start(target)? {
        Some(caps) => print!("{}", report::match_report(&compiled, &caps)?),
        None => println!("No match"),
    }
    Ok(())
}
