//! Layered resolution of services-file entries.
//!
//! Both the file and the section are chosen through a precedence chain:
//! explicit request argument, then environment override, then default. The
//! resolver is a pure function of a request plus an environment snapshot
//! ([`ResolutionContext`]), so tests construct contexts directly instead of
//! mutating the real process environment.
//!
//! ## Environment Variables
//! - `DES_SERVICES` - Explicit services-file path (overrides the home default)
//! - `DES_DB_SECTION` - Section to read when the request names none
//!
//! The default path is `<home>/.desservices.ini`.

use crate::error::{Result, ServiceError};
use crate::ini::{Section, ServicesFile};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming an explicit services-file path.
pub const SERVICES_PATH_VAR: &str = "DES_SERVICES";

/// Environment variable naming the section to read.
pub const SERVICES_SECTION_VAR: &str = "DES_DB_SECTION";

/// File name of the default services file under the home directory.
pub const DEFAULT_SERVICES_FILE: &str = ".desservices.ini";

/// A single lookup: which key, and optionally which section and file.
///
/// Empty strings are treated as absent, so callers can pass positional
/// arguments through without special-casing `""`.
#[derive(Debug, Clone, Default)]
pub struct ResolutionRequest {
    pub key: String,
    pub section_hint: Option<String>,
    pub explicit_path: Option<PathBuf>,
}

impl ResolutionRequest {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            section_hint: None,
            explicit_path: None,
        }
    }

    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section_hint = Some(section.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit_path = Some(path.into());
        self
    }
}

/// Read-only environment snapshot taken once per resolution call.
#[derive(Debug, Clone, Default)]
pub struct ResolutionContext {
    /// Home directory, base for the default services-file path.
    pub home: Option<PathBuf>,
    /// Value of `DES_SERVICES`, if set and non-empty.
    pub services_path: Option<PathBuf>,
    /// Value of `DES_DB_SECTION`, if set and non-empty.
    pub services_section: Option<String>,
}

impl ResolutionContext {
    /// Snapshot the real process environment.
    pub fn from_env() -> Self {
        Self {
            home: dirs::home_dir(),
            services_path: std::env::var(SERVICES_PATH_VAR)
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            services_section: std::env::var(SERVICES_SECTION_VAR)
                .ok()
                .filter(|v| !v.is_empty()),
        }
    }
}

/// Which precedence level supplied the services-file path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PathSource {
    /// Explicit path argument
    Argument,
    /// `DES_SERVICES` environment variable
    Environment,
    /// `<home>/.desservices.ini`
    HomeDefault,
}

impl std::fmt::Display for PathSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathSource::Argument => write!(f, "argument"),
            PathSource::Environment => write!(f, "${SERVICES_PATH_VAR}"),
            PathSource::HomeDefault => write!(f, "home default"),
        }
    }
}

/// Which precedence level supplied the section name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionSource {
    /// Explicit section argument
    Argument,
    /// `DES_DB_SECTION` environment variable
    Environment,
}

impl std::fmt::Display for SectionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SectionSource::Argument => write!(f, "argument"),
            SectionSource::Environment => write!(f, "${SERVICES_SECTION_VAR}"),
        }
    }
}

/// A resolved value plus the provenance of the file and section used.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub value: String,
    pub path: PathBuf,
    pub path_source: PathSource,
    pub section: String,
    pub section_source: SectionSource,
}

/// An entire resolved section plus provenance.
#[derive(Debug, Clone)]
pub struct SectionLookup {
    pub path: PathBuf,
    pub path_source: PathSource,
    pub section_source: SectionSource,
    section: Section,
}

impl SectionLookup {
    pub fn name(&self) -> &str {
        self.section.name()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.section.get(key)
    }

    /// Entries in file order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.section.entries()
    }

    /// Which of `required` are absent from the section.
    ///
    /// A section meant for a database client usually needs `user`, `passwd`,
    /// `server`, and `type`; callers decide what their consumer requires.
    pub fn missing_keys<'a>(&self, required: &[&'a str]) -> Vec<&'a str> {
        required
            .iter()
            .copied()
            .filter(|key| self.get(key).is_none())
            .collect()
    }
}

/// Resolve a full section by the path/section precedence chains.
pub fn resolve_section(
    request: &ResolutionRequest,
    context: &ResolutionContext,
) -> Result<SectionLookup> {
    let (path, path_source) = select_path(request, context)?;
    debug!(path = %path.display(), source = %path_source, "selected services file");

    let file = load_file(&path, path_source)?;

    let (name, section_source) = select_section(request, context)?;
    debug!(section = %name, source = %section_source, "selected section");

    let section = file
        .section(&name)
        .ok_or_else(|| ServiceError::section_not_found(&name, &path))?
        .clone();

    Ok(SectionLookup {
        path,
        path_source,
        section_source,
        section,
    })
}

/// Resolve one key to its value.
///
/// Each call re-reads the file; nothing is cached between calls, so repeated
/// invocations always reflect the file and environment as they are now.
pub fn resolve(request: &ResolutionRequest, context: &ResolutionContext) -> Result<Resolution> {
    let lookup = resolve_section(request, context)?;

    let Some(value) = lookup.get(&request.key) else {
        return Err(ServiceError::key_not_found(&request.key, lookup.name()));
    };
    debug!(key = %request.key, "resolved entry");

    Ok(Resolution {
        value: value.to_string(),
        section: lookup.name().to_string(),
        path: lookup.path,
        path_source: lookup.path_source,
        section_source: lookup.section_source,
    })
}

/// First non-empty source wins: argument, then `DES_SERVICES`, then the
/// home default. An unresolvable path (no home directory either) reads the
/// same as a missing file to callers.
fn select_path(
    request: &ResolutionRequest,
    context: &ResolutionContext,
) -> Result<(PathBuf, PathSource)> {
    if let Some(path) = &request.explicit_path
        && !path.as_os_str().is_empty()
    {
        return Ok((path.clone(), PathSource::Argument));
    }
    if let Some(path) = &context.services_path {
        return Ok((path.clone(), PathSource::Environment));
    }
    if let Some(home) = &context.home {
        return Ok((home.join(DEFAULT_SERVICES_FILE), PathSource::HomeDefault));
    }
    Err(ServiceError::absent(format!(
        "no path argument, {SERVICES_PATH_VAR} unset, and no home directory to search"
    )))
}

fn select_section(
    request: &ResolutionRequest,
    context: &ResolutionContext,
) -> Result<(String, SectionSource)> {
    if let Some(section) = &request.section_hint
        && !section.is_empty()
    {
        return Ok((section.clone(), SectionSource::Argument));
    }
    if let Some(section) = &context.services_section {
        return Ok((section.clone(), SectionSource::Environment));
    }
    Err(ServiceError::MissingSection)
}

/// Read and parse the selected file. The handle is opened, fully read, and
/// closed before returning, on error paths included. A missing file at this
/// point is still "can't sense the presence", covering the race between
/// selection and open.
fn load_file(path: &Path, source: PathSource) -> Result<ServicesFile> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(ServiceError::absent(format!(
                "no services file at {} (from {source})",
                path.display()
            )));
        }
        Err(err) => {
            return Err(ServiceError::Io {
                path: path.to_path_buf(),
                source: err,
            });
        }
    };
    ServicesFile::parse(&content, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context_with_home(home: &Path) -> ResolutionContext {
        ResolutionContext {
            home: Some(home.to_path_buf()),
            ..Default::default()
        }
    }

    #[test]
    fn select_path_prefers_argument() {
        let request = ResolutionRequest::new("passwd").with_path("/tmp/explicit.ini");
        let context = ResolutionContext {
            home: Some(PathBuf::from("/home/nobody")),
            services_path: Some(PathBuf::from("/tmp/env.ini")),
            services_section: None,
        };
        let (path, source) = select_path(&request, &context).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/explicit.ini"));
        assert_eq!(source, PathSource::Argument);
    }

    #[test]
    fn select_path_falls_back_to_environment_then_home() {
        let request = ResolutionRequest::new("passwd");
        let context = ResolutionContext {
            home: Some(PathBuf::from("/home/nobody")),
            services_path: Some(PathBuf::from("/tmp/env.ini")),
            services_section: None,
        };
        let (path, source) = select_path(&request, &context).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/env.ini"));
        assert_eq!(source, PathSource::Environment);

        let context = context_with_home(Path::new("/home/nobody"));
        let (path, source) = select_path(&request, &context).unwrap();
        assert_eq!(path, PathBuf::from("/home/nobody/.desservices.ini"));
        assert_eq!(source, PathSource::HomeDefault);
    }

    #[test]
    fn select_path_with_nothing_is_config_absent() {
        let request = ResolutionRequest::new("passwd");
        let err = select_path(&request, &ResolutionContext::default()).unwrap_err();
        assert!(matches!(err, ServiceError::ConfigAbsent { .. }));
    }

    #[test]
    fn empty_path_argument_is_treated_as_absent() {
        let request = ResolutionRequest::new("passwd").with_path("");
        let context = context_with_home(Path::new("/home/nobody"));
        let (_, source) = select_path(&request, &context).unwrap();
        assert_eq!(source, PathSource::HomeDefault);
    }

    #[test]
    fn select_section_prefers_argument_over_environment() {
        let request = ResolutionRequest::new("passwd").with_section("db-destest");
        let context = ResolutionContext {
            services_section: Some("db-desoper".to_string()),
            ..Default::default()
        };
        let (section, source) = select_section(&request, &context).unwrap();
        assert_eq!(section, "db-destest");
        assert_eq!(source, SectionSource::Argument);
    }

    #[test]
    fn empty_section_hint_falls_back_to_environment() {
        let request = ResolutionRequest::new("passwd").with_section("");
        let context = ResolutionContext {
            services_section: Some("db-desoper".to_string()),
            ..Default::default()
        };
        let (section, source) = select_section(&request, &context).unwrap();
        assert_eq!(section, "db-desoper");
        assert_eq!(source, SectionSource::Environment);
    }

    #[test]
    fn no_section_from_any_source_is_missing_section() {
        let request = ResolutionRequest::new("passwd");
        let err = select_section(&request, &ResolutionContext::default()).unwrap_err();
        assert!(matches!(err, ServiceError::MissingSection));
    }
}
