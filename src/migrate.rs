//! The migration pipeline.
//!
//! discovery → extraction → selector rewrite → batched division migration → writeback,
//! followed by cleanup of every staging file on every exit path. Steps run strictly
//! one after another; the first failure skips all later steps except cleanup.

use crate::batch::{self, CommandRunner, SystemRunner};
use crate::config::Config;
use crate::edit_plan;
use crate::error::MigrateError;
use crate::extract::{self, ComponentFile};
use crate::formats::vue::VueFormat;
use crate::input;
use crate::rewrite;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::PathBuf;

#[derive(Serialize, Debug, Default, Clone, PartialEq, Eq)]
/// Summary of a finished run.
pub struct MigrationReport {
    /// Component files discovered and extracted.
    pub component_files: usize,
    /// Style sections staged for processing.
    pub style_chunks: usize,
    /// Stylesheets (staged or free-standing) passed through the selector rewrite.
    pub stylesheets: usize,
    /// Stylesheets whose selectors changed.
    pub rewritten_stylesheets: usize,
    /// Files per sass-migrator invocation, in order.
    pub migrator_batches: Vec<usize>,
    /// Component files whose content changed on writeback.
    pub written_component_files: usize,
}

/// Migrates every component file and stylesheet below a root directory.
pub struct Migrator<R: CommandRunner = SystemRunner> {
    root: PathBuf,
    config: Config,
    runner: R,
    components: Vec<ComponentFile>,
}

impl Migrator<SystemRunner> {
    #[must_use]
    /// A migrator that runs sass-migrator as a real child process.
    pub fn new(root: impl Into<PathBuf>, config: Config) -> Self {
        Self::with_runner(root, config, SystemRunner)
    }
}

impl<R: CommandRunner> Migrator<R> {
    #[must_use]
    /// A migrator with a custom process runner.
    pub fn with_runner(root: impl Into<PathBuf>, config: Config, runner: R) -> Self {
        Self {
            root: root.into(),
            config,
            runner,
            components: Vec::new(),
        }
    }

    #[must_use]
    /// The process runner, e.g. to inspect what was invoked.
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Run the whole pipeline, then remove all staging files.
    ///
    /// Cleanup runs whether or not the pipeline succeeded and never masks a
    /// pipeline error.
    ///
    /// # Errors
    ///
    /// Returns the first pipeline error, or `Cleanup` if only staging file removal failed.
    pub fn migrate(&mut self) -> Result<MigrationReport, MigrateError> {
        self.components.clear();
        let mut report = MigrationReport::default();
        let outcome = self.run_pipeline(&mut report);
        let cleanup = self.cleanup();
        outcome?;
        cleanup?;
        Ok(report)
    }

    fn run_pipeline(&mut self, report: &mut MigrationReport) -> Result<(), MigrateError> {
        let component_paths = input::find_files(
            &self.root,
            std::slice::from_ref(&self.config.component_extension),
        )?;
        for path in component_paths {
            let mut component = ComponentFile::new(path);
            let extracted = extract::extract_component(&mut component, &VueFormat);
            report.style_chunks += component.chunks.len();
            self.components.push(component);
            extracted?;
            report.component_files += 1;
        }

        tracing::info!("processing stylesheets");
        let stylesheets = input::find_files(&self.root, &self.config.stylesheet_extensions)?;
        for path in &stylesheets {
            tracing::info!(path = %path.display(), "rewriting deep selectors");
            if rewrite::rewrite_stylesheet_file(path)? {
                report.rewritten_stylesheets += 1;
            }
            report.stylesheets += 1;
        }

        if self.config.run_division {
            report.migrator_batches = batch::run_batches(
                &mut self.runner,
                &self.config.sass_migrator_command,
                &stylesheets,
                self.config.max_entries(),
            )?;
        }

        for component in &self.components {
            if edit_plan::write_back(component)? {
                report.written_component_files += 1;
            }
        }
        Ok(())
    }

    /// Remove every staging file created so far, best effort.
    fn cleanup(&mut self) -> Result<(), MigrateError> {
        tracing::info!("cleanup started");
        let mut leftover = Vec::new();
        for component in self.components.drain(..) {
            for chunk in component.chunks {
                tracing::info!(path = %chunk.staging_path.display(), "cleanup file");
                match fs::remove_file(&chunk.staging_path) {
                    Ok(()) => {}
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                    Err(e) => {
                        tracing::warn!(path = %chunk.staging_path.display(), error = %e, "failed to remove staging file");
                        leftover.push(chunk.staging_path);
                    }
                }
            }
        }
        tracing::info!("cleanup finished");
        if leftover.is_empty() {
            Ok(())
        } else {
            Err(MigrateError::Cleanup { paths: leftover })
        }
    }
}

#[cfg(test)]
#[path = "tests/migrate.rs"]
mod tests;
