use chrono::Utc;
use serde::Serialize;
use std::collections::HashSet;
use std::io::{Cursor, Write};
use std::path::PathBuf;
use std::sync::Arc;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::naming::archive_filename;
use super::progress::{
    entry_checkpoint, BuildState, ProgressObserver, DONE_CHECKPOINT, SERIALIZE_CHECKPOINT,
};
use super::sink::SaveSink;
use crate::common::config::{
    validate_compression_level, validate_prefix, Config, DEFAULT_ARCHIVE_PREFIX,
    DEFAULT_COMPRESSION_LEVEL,
};
use crate::common::errors::{FlingError, Result};
use crate::notify::{Notice, Notifier};
use crate::staging::StagedFile;

/// How archives are named and compressed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveOptions {
    /// File name prefix, followed by `-<timestamp>.zip`
    pub prefix: String,

    /// Deflate level, 1-9
    pub compression_level: i64,
}

impl Default for ArchiveOptions {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_ARCHIVE_PREFIX.to_string(),
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }
}

impl ArchiveOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            prefix: config.archive_prefix.clone(),
            compression_level: config.compression_level,
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_compression_level(self.compression_level)?;
        validate_prefix(&self.prefix)
    }
}

/// What a successful build produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedArchive {
    /// Generated archive name
    pub filename: String,

    /// Where the save target put it
    pub location: PathBuf,

    /// Number of entries in the archive
    pub entries: usize,

    /// Sum of the staged file sizes
    pub original_bytes: u64,

    /// Size of the serialized archive
    pub archive_bytes: u64,
}

/// Result of a build. Failures are reported, never propagated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BuildOutcome {
    Saved(SavedArchive),
    /// Nothing was staged; no work was done
    NoFiles,
    /// Construction, serialization or saving failed
    Failed { reason: String },
}

impl BuildOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, BuildOutcome::Saved(_))
    }
}

/// Bundles staged files into one zip and hands it to a save target.
///
/// State goes `Idle -> Building -> Idle`. `build` borrows the builder
/// mutably, so only one build can be in flight.
pub struct ArchiveBuilder {
    options: ArchiveOptions,
    sink: Box<dyn SaveSink>,
    notifier: Arc<dyn Notifier>,
    observer: Option<Box<dyn ProgressObserver>>,
    state: BuildState,
    progress: f32,
}

impl ArchiveBuilder {
    pub fn new(options: ArchiveOptions, sink: Box<dyn SaveSink>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            options,
            sink,
            notifier,
            observer: None,
            state: BuildState::Idle,
            progress: 0.0,
        }
    }

    /// Attach a progress observer, replacing any previous one
    pub fn with_observer(mut self, observer: Box<dyn ProgressObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn state(&self) -> BuildState {
        self.state
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn options(&self) -> &ArchiveOptions {
        &self.options
    }

    /// Build an archive from `files` in order and save it.
    ///
    /// Empty input is reported as `NoFiles` before any work starts. Any
    /// failure after that is logged, reported as `ArchiveFailed`, and returned
    /// as `BuildOutcome::Failed`. The builder is back to idle at 0% when this
    /// returns.
    pub fn build(&mut self, files: &[StagedFile]) -> BuildOutcome {
        if files.is_empty() {
            tracing::warn!("build requested with no staged files");
            self.notifier.notify(Notice::NoFiles);
            return BuildOutcome::NoFiles;
        }

        self.set_progress(BuildState::Building, 0.0);

        let outcome = match self.write_archive(files) {
            Ok(saved) => {
                tracing::info!(
                    filename = %saved.filename,
                    entries = saved.entries,
                    archive_bytes = saved.archive_bytes,
                    "archive created"
                );
                self.notifier.notify(Notice::ArchiveCreated {
                    filename: saved.filename.clone(),
                });
                BuildOutcome::Saved(saved)
            }
            Err(e) => {
                tracing::error!(error = %e, files = files.len(), "archive build failed");
                self.notifier.notify(Notice::ArchiveFailed);
                BuildOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        };

        self.set_progress(BuildState::Idle, 0.0);
        outcome
    }

    fn write_archive(&mut self, files: &[StagedFile]) -> Result<SavedArchive> {
        self.options.validate()?;

        let original_bytes: u64 = files.iter().map(|f| f.size()).sum();
        let entry_options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(self.options.compression_level));

        let mut zip = ZipWriter::new(Cursor::new(Vec::with_capacity(original_bytes as usize)));
        let mut seen = HashSet::with_capacity(files.len());

        for (index, staged) in files.iter().enumerate() {
            let name = staged.name();
            validate_entry_name(name)?;
            if !seen.insert(name) {
                return Err(FlingError::DuplicateEntry {
                    name: name.to_string(),
                });
            }

            zip.start_file(name, entry_options)?;
            zip.write_all(&staged.file.data)?;
            tracing::debug!(name, size = staged.size(), "added entry");

            self.set_progress(BuildState::Building, entry_checkpoint(index + 1, files.len()));
        }

        self.set_progress(BuildState::Building, SERIALIZE_CHECKPOINT);
        let blob = zip.finish()?.into_inner();
        self.set_progress(BuildState::Building, DONE_CHECKPOINT);

        let filename = archive_filename(&self.options.prefix, Utc::now());
        let location = self.sink.save(&filename, &blob)?;

        Ok(SavedArchive {
            filename,
            location,
            entries: files.len(),
            original_bytes,
            archive_bytes: blob.len() as u64,
        })
    }

    fn set_progress(&mut self, state: BuildState, percent: f32) {
        self.state = state;
        self.progress = percent;
        if let Some(observer) = self.observer.as_mut() {
            observer.on_progress(state, percent);
        }
    }
}

/// Entries sit at the archive root, so names must be plain file names
fn validate_entry_name(name: &str) -> Result<()> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\'])
        || name.contains('\0');
    if invalid {
        return Err(FlingError::InvalidEntryName {
            name: name.to_string(),
        });
    }
    Ok(())
}

impl std::fmt::Debug for ArchiveBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveBuilder")
            .field("options", &self.options)
            .field("state", &self.state)
            .field("progress", &self.progress)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_name_rules() {
        assert!(validate_entry_name("a.txt").is_ok());
        assert!(validate_entry_name("photo (1).png").is_ok());
        assert!(validate_entry_name("").is_err());
        assert!(validate_entry_name("..").is_err());
        assert!(validate_entry_name("dir/a.txt").is_err());
        assert!(validate_entry_name("dir\\a.txt").is_err());
    }

    #[test]
    fn test_options_from_config() {
        let config = Config {
            compression_level: 9,
            archive_prefix: "photos".to_string(),
            ..Config::default()
        };
        let options = ArchiveOptions::from_config(&config);
        assert_eq!(options.compression_level, 9);
        assert_eq!(options.prefix, "photos");
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_default_options_are_moderate_deflate() {
        let options = ArchiveOptions::default();
        assert_eq!(options.compression_level, 6);
        assert_eq!(options.prefix, "file-fling");
    }
}
