//! Error types for services-file resolution.

use std::path::PathBuf;

/// Stable phrase embedded in the [`ServiceError::ConfigAbsent`] message.
///
/// Callers grep diagnostic output for this exact substring to distinguish
/// "not configured at all" from "configured wrong", so it must never change.
pub const SENSE_PHRASE: &str = "can't sense the presence";

/// Result type for resolution operations.
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Errors that can occur while resolving a services-file entry.
///
/// Every failure is terminal for the resolution attempt; there is no retry
/// and no partial success. Each variant maps to a distinct CLI exit code via
/// [`ServiceError::exit_code`].
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// No services file could be located at any precedence level.
    #[error("can't sense the presence of a services file ({detail})")]
    ConfigAbsent { detail: String },

    /// The services file exists but is not well-formed.
    #[error("{}:{line}: {message}", .path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// No section was named by either the request or the environment.
    #[error("no section given and DES_DB_SECTION is unset")]
    MissingSection,

    /// The requested section is not present in the file.
    #[error("section [{section}] not found in {}", .path.display())]
    SectionNotFound { section: String, path: PathBuf },

    /// The requested key is not present in the section.
    #[error("no '{key}' entry in section [{section}]")]
    KeyNotFound { key: String, section: String },

    /// The services file exists but could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ServiceError {
    // Convenience constructors

    pub fn absent(detail: impl Into<String>) -> Self {
        Self::ConfigAbsent {
            detail: detail.into(),
        }
    }

    pub fn parse(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            line,
            message: message.into(),
        }
    }

    pub fn section_not_found(section: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::SectionNotFound {
            section: section.into(),
            path: path.into(),
        }
    }

    pub fn key_not_found(key: impl Into<String>, section: impl Into<String>) -> Self {
        Self::KeyNotFound {
            key: key.into(),
            section: section.into(),
        }
    }

    /// Process exit code used by the `svc-parse` binary.
    ///
    /// Calling scripts branch on the distinction between "not configured"
    /// and the other failure kinds, so every variant gets its own code.
    pub fn exit_code(&self) -> i32 {
        match self {
            ServiceError::ConfigAbsent { .. } => 2,
            ServiceError::Parse { .. } => 3,
            ServiceError::MissingSection => 4,
            ServiceError::SectionNotFound { .. } => 5,
            ServiceError::KeyNotFound { .. } => 6,
            ServiceError::Io { .. } => 1,
        }
    }
}
