use std::path::PathBuf;
use thiserror::Error;

/// Error types for file-fling operations.
/// The binary uses `anyhow` at the top level, but these typed errors let the
/// library be precise about what went wrong inside a build or a preview.
#[derive(Debug, Error)]
pub enum FlingError {
    /// File system operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Reading a file from disk failed
    #[error("Failed to read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Path is not a regular file (directory, socket, ...)
    #[error("Not a regular file: '{}'", .path.display())]
    NotAFile { path: PathBuf },

    /// The zip container rejected an entry or failed to serialize
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Two staged files share a name; entries live at the archive root
    #[error("Duplicate entry name in archive: '{name}'")]
    DuplicateEntry { name: String },

    /// Entry name is empty or would create a nested path
    #[error("Invalid entry name: '{name}'")]
    InvalidEntryName { name: String },

    /// Image data behind a preview could not be decoded or encoded
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Preview handle was already revoked
    #[error("Preview handle is no longer valid: {url}")]
    PreviewRevoked { url: String },

    /// Configuration value is invalid
    #[error("Config error: {message}")]
    Config { message: String },
}

pub type Result<T> = std::result::Result<T, FlingError>;
