//! fragment-kit CLI
//!
//! Usage:
//!   fragment-kit [OPTIONS] [MANIFEST]
//!
//! Options:
//!   -n, --element-name <NAME>  Print the element tag for a component name
//!   -v, --verbose              Log framework activity to stderr
//!   -h, --help                 Print help

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use fragment_kit::{render_manifest, to_element_name, ComponentError, Manifest, RenderError};

#[derive(Parser)]
#[command(name = "fragment-kit")]
#[command(about = "Render component manifests to HTML")]
struct Cli {
    /// Manifest file (TOML) describing components and mounts
    manifest: Option<PathBuf>,

    /// Print the element tag a component name maps to
    #[arg(short = 'n', long, value_name = "NAME")]
    element_name: Option<String>,

    /// Log framework activity to stderr (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Some(name) = &cli.element_name {
        println!("{}", to_element_name(name));
        return;
    }

    let Some(path) = &cli.manifest else {
        eprintln!("Error: no manifest given (see --help)");
        std::process::exit(2);
    };

    let manifest = match Manifest::from_file(path) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Error loading manifest '{}': {}", path.display(), e);
            std::process::exit(1);
        }
    };

    match render_manifest(&manifest) {
        Ok(html) => {
            println!("{}", html);
        }
        Err(RenderError::Component(ComponentError::Template {
            name,
            contents,
            errors,
        })) => {
            for error in &errors {
                eprintln!("{}", error.format(&contents, &name));
            }
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
