//! The edit plan splices processed style sections back into their component files.
//!
//! Byte ranges were recorded against the untouched component text during extraction,
//! so the plan is applied to that same text in one left-to-right pass. Ranges are
//! never recomputed; overlapping ranges are a hard error.

use crate::error::MigrateError;
use crate::extract::ComponentFile;
use std::fs;
use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq, Eq)]
/// Substitute `text` for the bytes `start..end` of the original text.
pub struct Replacement {
    /// First byte replaced (inclusive).
    pub start: usize,
    /// Byte where the untouched text resumes (exclusive).
    pub end: usize,
    /// New content for the range.
    pub text: String,
}

#[derive(Clone, Debug)]
/// All replacements for one component file.
pub struct EditPlan {
    /// Component file the replacements apply to.
    pub file: PathBuf,
    /// Replacements in any order; they are sorted when applied.
    pub replacements: Vec<Replacement>,
}

impl EditPlan {
    /// Build the plan for a component from the current content of its staging units.
    ///
    /// # Errors
    ///
    /// Returns `Io` if a staging unit cannot be read.
    pub fn for_component(component: &ComponentFile) -> Result<Self, MigrateError> {
        let mut replacements = Vec::with_capacity(component.chunks.len());
        for chunk in &component.chunks {
            let text = fs::read_to_string(&chunk.staging_path)
                .map_err(|e| MigrateError::io(&chunk.staging_path, e))?;
            replacements.push(Replacement {
                start: chunk.byte_start,
                end: chunk.byte_end,
                text,
            });
        }
        Ok(Self {
            file: component.path.clone(),
            replacements,
        })
    }

    /// Apply the plan to the file on disk.
    ///
    /// The file is only written when the spliced text differs. Returns whether it was written.
    ///
    /// # Errors
    ///
    /// Returns an error if file operations or splicing fail.
    pub fn apply(&self) -> Result<bool, MigrateError> {
        let original =
            fs::read_to_string(&self.file).map_err(|e| MigrateError::io(&self.file, e))?;
        let output = replace_many(&original, &self.replacements)?;
        if output == original {
            tracing::debug!(path = %self.file.display(), "component unchanged");
            return Ok(false);
        }
        fs::write(&self.file, output).map_err(|e| MigrateError::io(&self.file, e))?;
        Ok(true)
    }
}

/// Reassemble a component file from its staged style sections.
///
/// # Errors
///
/// Returns an error if reading, splicing or writing fails.
pub fn write_back(component: &ComponentFile) -> Result<bool, MigrateError> {
    tracing::info!(path = %component.path.display(), "writeback");
    EditPlan::for_component(component)?.apply()
}

/// Apply non-overlapping replacements to `original`.
///
/// Replacements are sorted by start; each must begin at or after the end of the
/// previous one.
///
/// # Errors
///
/// Returns `OverlappingReplacement` when ranges overlap and `ReplacementOutOfBounds`
/// when a range is inverted, exceeds the text, or splits a character.
pub fn replace_many(original: &str, replacements: &[Replacement]) -> Result<String, MigrateError> {
    let mut sorted: Vec<&Replacement> = replacements.iter().collect();
    sorted.sort_by_key(|r| r.start);

    let mut result = String::with_capacity(original.len());
    let mut cursor = 0;
    for r in sorted {
        if r.start < cursor {
            return Err(MigrateError::OverlappingReplacement {
                start: r.start,
                cursor,
            });
        }
        if r.end < r.start
            || r.end > original.len()
            || !original.is_char_boundary(r.start)
            || !original.is_char_boundary(r.end)
        {
            return Err(MigrateError::ReplacementOutOfBounds {
                start: r.start,
                end: r.end,
                len: original.len(),
            });
        }
        result.push_str(&original[cursor..r.start]);
        result.push_str(&r.text);
        cursor = r.end;
    }
    result.push_str(&original[cursor..]);
    Ok(result)
}

#[cfg(test)]
#[path = "tests/edit_plan.rs"]
mod tests;
