//! Error taxonomy for a migration run.
//!
//! Every variant is run-fatal: nothing is retried and nothing is isolated per file.
//! Cleanup of staging units still runs after any of these (see [`crate::migrate`]).

use std::io;
use std::path::PathBuf;

/// Errors that abort a migration run.
#[derive(Debug, thiserror::Error)]
pub enum MigrateError {
    /// A top-level style element does not hold exactly one raw text child.
    #[error("malformed style element in {path}: {reason}")]
    MalformedStyleElement {
        /// Component file containing the element.
        path: PathBuf,
        /// What was wrong with the element's children.
        reason: String,
    },

    /// A style section or stylesheet declares a language outside css/scss/sass.
    #[error("unknown style language '{lang}' in {path}")]
    UnknownStyleLanguage {
        /// File declaring the language.
        path: PathBuf,
        /// The declared language as written.
        lang: String,
    },

    /// Some but not all branches of a selector end on an unfixable deep pseudo-class.
    #[error(
        "some but not all selectors end on a deep pseudo-class, cannot fix automatically in {path}: {selector}"
    )]
    UnfixableSelectorAmbiguity {
        /// Stylesheet holding the rule.
        path: PathBuf,
        /// Selector after legacy combinator normalization.
        selector: String,
    },

    /// A replacement starts before the end of the one sorted ahead of it.
    #[error("replacements overlap: replacement starting at {start} precedes cursor {cursor}")]
    OverlappingReplacement {
        /// Start offset of the offending replacement.
        start: usize,
        /// End offset of the previous replacement.
        cursor: usize,
    },

    /// A replacement range does not fit the original text.
    #[error("replacement {start}..{end} is out of bounds for text of length {len}")]
    ReplacementOutOfBounds {
        /// Start offset of the replacement.
        start: usize,
        /// End offset of the replacement.
        end: usize,
        /// Byte length of the original text.
        len: usize,
    },

    /// The external normalizer exited unsuccessfully.
    #[error("process exited with code {}", display_exit_code(.exit_code))]
    ExternalProcessFailure {
        /// Exit status, `None` when the process was terminated by a signal.
        exit_code: Option<i32>,
    },

    /// Reading, writing, removing or spawning failed.
    #[error("I/O failure on {path}: {source}")]
    Io {
        /// Path (or program) the operation targeted.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },

    /// Walking the input directory failed.
    #[error("file discovery failed: {0}")]
    Discovery(#[from] ignore::Error),

    /// The markup parser could not produce a tree.
    #[error("failed to parse {path}: {message}")]
    Parse {
        /// Component file being parsed.
        path: PathBuf,
        /// Parser diagnostic.
        message: String,
    },

    /// Some staging units could not be removed after an otherwise successful run.
    #[error("failed to remove staging file(s): {}", display_paths(.paths))]
    Cleanup {
        /// Staging files left behind.
        paths: Vec<PathBuf>,
    },
}

impl MigrateError {
    #[must_use]
    /// Attach a path to an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[allow(clippy::ref_option)]
fn display_exit_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "<signal>".to_string(), |c| c.to_string())
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
