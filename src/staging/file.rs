use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

use super::preview::PreviewHandle;
use crate::common::errors::{FlingError, Result};

/// Fallback MIME type when neither content nor extension identify the file
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Extension table used when content sniffing finds nothing
const EXTENSION_MIME: &[(&str, &str)] = &[
    ("txt", "text/plain"),
    ("md", "text/markdown"),
    ("csv", "text/csv"),
    ("html", "text/html"),
    ("htm", "text/html"),
    ("css", "text/css"),
    ("js", "text/javascript"),
    ("json", "application/json"),
    ("xml", "application/xml"),
    ("svg", "image/svg+xml"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("bmp", "image/bmp"),
    ("webp", "image/webp"),
    ("tif", "image/tiff"),
    ("tiff", "image/tiff"),
    ("ico", "image/x-icon"),
    ("pdf", "application/pdf"),
    ("zip", "application/zip"),
];

/// A file picked by the user: name, payload and MIME type
#[derive(Debug, Clone)]
pub struct RawFile {
    /// Original file name, without any directory part
    pub name: String,

    /// File contents, shared so a build can read them without copying
    pub data: Arc<[u8]>,

    /// MIME type, e.g. `image/png`
    pub mime_type: String,
}

impl RawFile {
    /// Build a file from in-memory bytes, detecting the MIME type
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        let name = name.into();
        let data: Vec<u8> = data.into();
        let mime_type = detect_mime(&name, &data);
        Self {
            name,
            data: data.into(),
            mime_type,
        }
    }

    /// Build a file with an explicit MIME type
    pub fn with_mime(
        name: impl Into<String>,
        data: impl Into<Vec<u8>>,
        mime_type: impl Into<String>,
    ) -> Self {
        let data: Vec<u8> = data.into();
        Self {
            name: name.into(),
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Read a regular file from disk
    pub fn from_path(path: &Path) -> Result<Self> {
        let meta = std::fs::metadata(path).map_err(|source| FlingError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if !meta.is_file() {
            return Err(FlingError::NotAFile {
                path: path.to_path_buf(),
            });
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| FlingError::NotAFile {
                path: path.to_path_buf(),
            })?;

        let data = std::fs::read(path).map_err(|source| FlingError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!(path = %path.display(), bytes = data.len(), "read file");
        Ok(Self::new(name, data))
    }

    /// Size of the payload in bytes
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// Whether the file should get a preview handle
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}

/// Detect a MIME type from magic bytes, then from the file extension
pub fn detect_mime(name: &str, data: &[u8]) -> String {
    if let Some(kind) = infer::get(data) {
        return kind.mime_type().to_string();
    }

    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .and_then(|ext| {
            EXTENSION_MIME
                .iter()
                .find(|(known, _)| *known == ext)
                .map(|(_, mime)| mime.to_string())
        })
        .unwrap_or_else(|| OCTET_STREAM.to_string())
}

/// A file in the staging list
#[derive(Debug)]
pub struct StagedFile {
    /// Opaque id, unique within one staging list
    pub id: String,

    pub file: RawFile,

    /// Present for image files until the entry is removed or cleared
    pub preview: Option<PreviewHandle>,
}

impl StagedFile {
    pub fn name(&self) -> &str {
        &self.file.name
    }

    pub fn size(&self) -> u64 {
        self.file.size()
    }

    pub fn preview_url(&self) -> Option<&str> {
        self.preview.as_ref().map(|p| p.url())
    }

    /// Serializable view for listing
    pub fn summary(&self) -> StagedSummary {
        StagedSummary {
            id: self.id.clone(),
            name: self.file.name.clone(),
            size_bytes: self.size(),
            mime_type: self.file.mime_type.clone(),
            preview: self.preview_url().map(str::to_string),
        }
    }
}

/// Flat description of a staged file (used for JSON output)
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StagedSummary {
    pub id: String,
    pub name: String,
    pub size_bytes: u64,
    pub mime_type: String,
    pub preview: Option<String>,
}
