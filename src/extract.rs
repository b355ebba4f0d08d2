//! Extraction of style sections into standalone staging files.
//!
//! Each section of a component file is written next to it as
//! `<component>.vue_sass_migrating.<index>.<lang>` so stylesheet tooling can process it
//! like any other stylesheet. The byte range of the section in the untouched component
//! is recorded alongside, for writeback.

use crate::error::MigrateError;
use crate::formats::Format;
use crate::input;
use crate::style_lang::StyleLang;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Marker embedded in every staging file name.
pub const STAGING_MARKER: &str = "vue_sass_migrating";

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
/// One extracted style section.
pub struct StyleChunk {
    /// Staging file holding the section content.
    pub staging_path: PathBuf,
    /// Declared language of the section.
    pub lang: StyleLang,
    /// Start of the section content in the original component text.
    pub byte_start: usize,
    /// End (exclusive) of the section content in the original component text.
    pub byte_end: usize,
    /// Ordinal of the section in its component.
    pub index: usize,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
/// A component file and the chunks extracted from it during this run.
pub struct ComponentFile {
    /// Location of the component file.
    pub path: PathBuf,
    /// Extracted chunks in document order.
    pub chunks: Vec<StyleChunk>,
}

impl ComponentFile {
    #[must_use]
    /// A component with nothing extracted yet.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            chunks: Vec::new(),
        }
    }
}

#[must_use]
/// Staging file name for a section; deterministic in component path, index and language.
pub fn staging_path(component: &Path, index: usize, lang: StyleLang) -> PathBuf {
    let mut name = component.as_os_str().to_owned();
    name.push(format!(".{STAGING_MARKER}.{index}.{}", lang.extension()));
    PathBuf::from(name)
}

/// Extract every style section of `component` into its own staging file.
///
/// Chunks are recorded before their staging file is written, so whatever was
/// created before a failure is still known to cleanup.
///
/// # Errors
///
/// Returns `Io`, `Parse`, `MalformedStyleElement` or `UnknownStyleLanguage`.
pub fn extract_component<F: Format>(
    component: &mut ComponentFile,
    format: &F,
) -> Result<(), MigrateError> {
    tracing::info!(path = %component.path.display(), "extract");
    let source =
        fs::read_to_string(&component.path).map_err(|e| MigrateError::io(&component.path, e))?;
    let sections = input::extract_style_sections(&source, format, &component.path)?;

    for section in sections {
        let lang = StyleLang::from_attribute(section.lang(), &component.path)?;
        let staging = staging_path(&component.path, section.index, lang);
        tracing::info!(path = %staging.display(), "extract section");
        component.chunks.push(StyleChunk {
            staging_path: staging.clone(),
            lang,
            byte_start: section.byte_start,
            byte_end: section.byte_end,
            index: section.index,
        });
        fs::write(&staging, &section.content).map_err(|e| MigrateError::io(&staging, e))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/extract.rs"]
mod tests;
