//! Layered lookup of service credentials from INI-style services files.
//!
//! A (section, key) pair resolves to a value by searching a services file
//! located through a precedence chain: explicit path argument, the
//! `DES_SERVICES` environment variable, then `~/.desservices.ini`. The
//! section follows its own chain: explicit hint, then `DES_DB_SECTION`.
//! When no file can be located at all, the failure renders the stable
//! "can't sense the presence" diagnostic that calling scripts branch on.

pub mod cli;
pub mod error;
pub mod format;
pub mod ini;
pub mod resolve;
