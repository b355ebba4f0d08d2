//! vue-style-migrate: migrate Vue single-file component styles to current Sass.
//!
//! Legacy deep combinators (`>>>`, `/deep/`) and single-argument `:deep(...)` are
//! rewritten to the bare `:deep` pseudo-class, Sass slash division is handed to
//! `sass-migrator division`, and style sections embedded in components are
//! extracted to staging files and spliced back afterwards.

#![allow(clippy::multiple_crate_versions)]

pub mod batch;
pub mod config;
pub mod edit_plan;
pub mod error;
pub mod extract;
pub mod formats;
pub mod input;
pub mod migrate;
pub mod rewrite;
pub mod section;
pub mod selector;
pub mod style_lang;
pub mod stylesheet;

pub use error::MigrateError;
pub use migrate::{MigrationReport, Migrator};

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
