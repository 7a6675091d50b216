//! CLI definition for svc-parse.
//!
//! This module defines the CLI structure using clap's derive macros.
//!
//! Exit codes:
//! - `0` - value resolved and printed
//! - `2` - no services file could be located ("can't sense the presence")
//! - `3` - services file is malformed
//! - `4` - no section given and `DES_DB_SECTION` unset
//! - `5` - section not found in the file
//! - `6` - key not found in the section
//! - `1` - any other I/O failure

use crate::format::OutputFormat;
use crate::resolve::ResolutionRequest;
use clap::Parser;
use std::path::PathBuf;

/// Look up service credentials from an INI-style services file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Key to look up (e.g. "passwd")
    #[arg(required_unless_present = "all")]
    pub key: Option<String>,

    /// Section holding the key; empty or omitted falls back to $DES_DB_SECTION
    pub section: Option<String>,

    /// Services file path; omitted falls back to $DES_SERVICES, then ~/.desservices.ini
    pub path: Option<PathBuf>,

    /// Print every entry of the resolved section instead of one value
    #[arg(long)]
    pub all: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose resolution trace
    #[arg(short, long)]
    pub verbose: bool,

    /// Logging output: off, stderr (default), or a filename
    #[arg(long, default_value = "stderr")]
    pub log: String,
}

impl Cli {
    /// Build the resolution request from the positional arguments.
    pub fn request(&self) -> ResolutionRequest {
        ResolutionRequest {
            key: self.key.clone().unwrap_or_default(),
            section_hint: self.section.clone(),
            explicit_path: self.path.clone(),
        }
    }
}
