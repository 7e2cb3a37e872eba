use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::common::errors::Result;

/// Where a finished archive goes ("download")
pub trait SaveSink {
    /// Persist `bytes` under `filename` and return where they ended up
    fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf>;
}

/// Saves archives into a directory, never overwriting an existing file.
///
/// A taken name is saved as `name (1).zip`, `name (2).zip`, ... the same way
/// browsers number repeated downloads.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl SaveSink for DirectorySink {
    fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;

        for attempt in 0..u32::MAX {
            let path = self.dir.join(numbered_name(filename, attempt));
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    fill_or_discard(&path, move || {
                        file.write_all(bytes)?;
                        file.sync_all()
                    })?;
                    tracing::info!(path = %path.display(), bytes = bytes.len(), "saved archive");
                    return Ok(path);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Err(std::io::Error::new(
            ErrorKind::AlreadyExists,
            format!("no free name left for {}", filename),
        )
        .into())
    }
}

/// Run `write` against a freshly created `path`; on failure the partial file
/// is removed so a retry does not leave a truncated archive behind
fn fill_or_discard(path: &Path, write: impl FnOnce() -> std::io::Result<()>) -> std::io::Result<()> {
    write().inspect_err(|e| {
        tracing::warn!(path = %path.display(), error = %e, "discarding partial archive");
        if let Err(cleanup) = std::fs::remove_file(path) {
            tracing::warn!(path = %path.display(), error = %cleanup, "could not remove partial archive");
        }
    })
}

/// `report.zip` -> `report (2).zip`; attempt 0 keeps the name as is
fn numbered_name(filename: &str, attempt: u32) -> String {
    if attempt == 0 {
        return filename.to_string();
    }
    match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{} ({}).{}", stem, attempt, ext),
        _ => format!("{} ({})", filename, attempt),
    }
}

/// A saved archive held in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedBlob {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Keeps saved archives in memory. Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    saved: Arc<Mutex<Vec<SavedBlob>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything saved so far, oldest first
    pub fn saved(&self) -> Vec<SavedBlob> {
        self.saved
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl SaveSink for MemorySink {
    fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        self.saved
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(SavedBlob {
                filename: filename.to_string(),
                bytes: bytes.to_vec(),
            });
        Ok(PathBuf::from(filename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_numbered_name() {
        assert_eq!(numbered_name("a.zip", 0), "a.zip");
        assert_eq!(numbered_name("a.zip", 2), "a (2).zip");
        assert_eq!(numbered_name("noext", 1), "noext (1)");
        assert_eq!(numbered_name(".zip", 1), ".zip (1)");
    }

    #[test]
    fn test_directory_sink_never_overwrites() {
        let dir = TempDir::new().unwrap();
        let sink = DirectorySink::new(dir.path().join("out"));

        let first = sink.save("bundle.zip", b"one").unwrap();
        let second = sink.save("bundle.zip", b"two").unwrap();

        assert_eq!(first.file_name().unwrap(), "bundle.zip");
        assert_eq!(second.file_name().unwrap(), "bundle (1).zip");
        assert_eq!(std::fs::read(&first).unwrap(), b"one");
        assert_eq!(std::fs::read(&second).unwrap(), b"two");
    }

    #[test]
    fn test_failed_write_removes_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bundle.zip");
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .unwrap();

        let result = fill_or_discard(&path, move || {
            file.write_all(b"PK\x03\x04 half an archive")?;
            Err(std::io::Error::other("disk full"))
        });

        assert_eq!(result.unwrap_err().to_string(), "disk full");
        assert!(!path.exists());

        let sink = DirectorySink::new(dir.path());
        let retry = sink.save("bundle.zip", b"whole").unwrap();
        assert_eq!(retry.file_name().unwrap(), "bundle.zip");
    }

    #[test]
    fn test_successful_write_keeps_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bundle.zip");
        std::fs::write(&path, b"").unwrap();

        fill_or_discard(&path, || Ok(())).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_memory_sink_shares_storage() {
        let sink = MemorySink::new();
        let view = sink.clone();
        sink.save("x.zip", b"data").unwrap();
        assert_eq!(view.saved().len(), 1);
        assert_eq!(view.saved()[0].filename, "x.zip");
    }
}
