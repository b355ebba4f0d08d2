//! Configuration to acknowledge developer preferences as well as set defaults.
//!
//! We try to find a vue-style-migrate.toml, and if present we load settings from there.
//! The sass-migrator batch ceiling can additionally be overridden from the environment.

use facet::Facet;
use std::fs;
use std::path::Path;

/// Name of the optional configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = "vue-style-migrate.toml";

/// Environment variable overriding [`Config::sass_migrator_max_entries`].
pub const MAX_ENTRIES_ENV: &str = "SASS_MIGRATOR_MAX_ENTRIES";

/// Batch ceiling used when neither the file nor the environment set one.
pub const DEFAULT_SASS_MIGRATOR_MAX_ENTRIES: usize = 20;

#[derive(Facet, Clone, Debug, PartialEq)]
/// Run preferences loaded from vue-style-migrate.toml or falling back to defaults.
pub struct Config {
    #[facet(default = DEFAULT_SASS_MIGRATOR_MAX_ENTRIES)]
    /// Maximum number of files handed to one sass-migrator invocation.
    pub sass_migrator_max_entries: usize,
    #[facet(default = vec!["npx".to_string(), "sass-migrator".to_string()])]
    /// Program and leading arguments; the `division` subcommand is appended.
    pub sass_migrator_command: Vec<String>,
    #[facet(default = "vue".to_string())]
    /// File suffix identifying component files.
    pub component_extension: String,
    #[facet(default = vec!["scss".to_string(), "sass".to_string()])]
    /// File suffixes of stylesheets to rewrite and normalize.
    pub stylesheet_extensions: Vec<String>,
    #[facet(default = true)]
    /// Whether to run the external division migration at all.
    pub run_division: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sass_migrator_max_entries: DEFAULT_SASS_MIGRATOR_MAX_ENTRIES,
            sass_migrator_command: vec!["npx".to_string(), "sass-migrator".to_string()],
            component_extension: "vue".to_string(),
            stylesheet_extensions: vec!["scss".to_string(), "sass".to_string()],
            run_division: true,
        }
    }
}

impl Config {
    #[must_use]
    /// Load configuration from vue-style-migrate.toml in the working directory if present.
    pub fn load() -> Self {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    #[must_use]
    /// Load configuration from `path`, using defaults when it is missing or unreadable.
    pub fn load_from(path: &Path) -> Self {
        if let Ok(contents) = fs::read_to_string(path) {
            if let Ok(config) = facet_toml::from_str::<Self>(&contents) {
                return config;
            }
            tracing::warn!(path = %path.display(), "ignoring unparseable config file");
        }
        Self::default()
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        let raw = std::env::var(MAX_ENTRIES_ENV).ok();
        if let Some(max_entries) = parse_max_entries(raw.as_deref()) {
            self.sass_migrator_max_entries = max_entries;
        }
    }

    #[must_use]
    /// Batch ceiling, never below one.
    pub fn max_entries(&self) -> usize {
        if self.sass_migrator_max_entries == 0 {
            DEFAULT_SASS_MIGRATOR_MAX_ENTRIES
        } else {
            self.sass_migrator_max_entries
        }
    }
}

#[must_use]
/// Parse a batch ceiling; anything that is not a positive integer counts as absent.
pub fn parse_max_entries(value: Option<&str>) -> Option<usize> {
    value
        .map(str::trim)
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|n| *n > 0)
}

#[cfg(test)]
#[path = "tests/config.rs"]
mod tests;
