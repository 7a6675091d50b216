//! svc-parse: resolve service credentials from an INI-style services file.
//!
//! Prints the resolved value to stdout; all diagnostics go to the log
//! stream (stderr by default) so the output can be captured by scripts.

use anyhow::Result;
use clap::Parser;
use std::fs::OpenOptions;
use svc_access::cli::Cli;
use svc_access::format::{render_resolution, render_section};
use svc_access::resolve::{ResolutionContext, resolve, resolve_section};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on --log option. stdout is not offered as a
    // destination; it is reserved for the resolved value.
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    match cli.log.as_str() {
        "0" | "off" => {
            // No logging
        }
        "stderr" => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        filename => {
            // Log to file (append mode)
            let file = OpenOptions::new().create(true).append(true).open(filename)?;
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(file)
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }

    let context = ResolutionContext::from_env();
    let request = cli.request();

    let outcome = if cli.all {
        resolve_section(&request, &context).map(|lookup| render_section(&lookup, cli.format))
    } else {
        resolve(&request, &context).map(|resolution| render_resolution(&resolution, cli.format))
    };

    match outcome {
        Ok(rendered) => {
            println!("{rendered}");
            Ok(())
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(err.exit_code());
        }
    }
}
