//! sfc-inherit CLI
//!
//! Usage:
//!   sfc-inherit [OPTIONS] [FILE]
//!
//! Options:
//!   -c, --config <FILE>  Options file overriding tag and attribute names (TOML)
//!   --deps               Print the ancestor files the component depends on
//!   -v, --verbose        Log resolution steps to stderr
//!   -h, --help           Print help

use std::path::{Path, PathBuf};

use clap::Parser;
use tokio::io::AsyncReadExt;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use sfc_inherit::{transform, FsHost, ResolveError, ResolverOptions};

#[derive(Parser)]
#[command(name = "sfc-inherit")]
#[command(about = "Resolve template inheritance between single-file components")]
struct Cli {
    /// Component file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Options file overriding tag and attribute names (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the ancestor files the component depends on to stderr
    #[arg(long)]
    deps: bool,

    /// Log resolution steps to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Load options
    let options = match &cli.config {
        Some(path) => match ResolverOptions::from_file(path) {
            Ok(o) => o,
            Err(e) => {
                eprintln!("Error loading options '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => ResolverOptions::default(),
    };

    // Read input; ancestors resolve against its directory
    let (source, dir, filename) = match &cli.input {
        Some(path) => match tokio::fs::read_to_string(path).await {
            Ok(content) => (
                content,
                path.parent().map(Path::to_path_buf).unwrap_or_default(),
                path.display().to_string(),
            ),
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match tokio::io::stdin().read_to_string(&mut buffer).await {
                Ok(_) => (buffer, PathBuf::from("."), "<stdin>".to_string()),
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    let host = FsHost::new();
    let result = transform(&source, &dir, &host, &options).await;

    if cli.deps {
        for dep in host.dependencies() {
            eprintln!("{}", dep.display());
        }
    }

    match result {
        Ok(code) => {
            print!("{}", code);
        }
        Err(e) => {
            report(&e, &source, &filename).await;
            std::process::exit(1);
        }
    }
}

/// Print an error, with source context when it comes from markup
///
/// Errors found in an ancestor are rendered against that ancestor's file.
async fn report(error: &ResolveError, source: &str, filename: &str) {
    let Some(markup) = error.markup_error() else {
        eprintln!("Error: {}", error);
        return;
    };

    match error.ancestor_path() {
        Some(path) => match tokio::fs::read_to_string(path).await {
            Ok(ancestor) => eprint!("{}", markup.format(&ancestor, &path.display().to_string())),
            Err(_) => eprintln!("Error: {}", error),
        },
        None if markup.span().end <= source.len() => {
            eprint!("{}", markup.format(source, filename));
        }
        None => eprintln!("Error: {}", error),
    }
}
