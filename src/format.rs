//! Output rendering for resolved values and sections.

use crate::resolve::{Resolution, SectionLookup};
use clap::ValueEnum;
use serde_json::{Value, json};

/// Output format for resolution results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Bare value (or `key = value` lines) on stdout
    #[default]
    Text,
    /// JSON object including the file and section used
    Json,
}

/// Render a single resolved value.
///
/// Text output is the value alone, with no decoration, so it can be captured
/// directly by calling scripts.
pub fn render_resolution(resolution: &Resolution, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => resolution.value.clone(),
        OutputFormat::Json => json!({
            "value": resolution.value,
            "file": resolution.path,
            "file_source": resolution.path_source,
            "section": resolution.section,
            "section_source": resolution.section_source,
        })
        .to_string(),
    }
}

/// Render a full section.
pub fn render_section(lookup: &SectionLookup, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => lookup
            .entries()
            .map(|(key, value)| format!("{key} = {value}"))
            .collect::<Vec<_>>()
            .join("\n"),
        OutputFormat::Json => {
            let entries: serde_json::Map<String, Value> = lookup
                .entries()
                .map(|(key, value)| (key.to_string(), Value::String(value.to_string())))
                .collect();
            json!({
                "file": lookup.path,
                "file_source": lookup.path_source,
                "section": lookup.name(),
                "section_source": lookup.section_source,
                "entries": entries,
            })
            .to_string()
        }
    }
}
