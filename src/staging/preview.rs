use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{Arc, Mutex, MutexGuard};

use image::ImageFormat;

use crate::common::errors::{FlingError, Result};

const URL_SCHEME: &str = "blob:file-fling/";

#[derive(Debug, Default)]
struct RegistryState {
    live: HashMap<String, PreviewEntry>,
    allocated: u64,
    revoked: u64,
}

#[derive(Debug)]
struct PreviewEntry {
    data: Arc<[u8]>,
    mime_type: String,
}

/// Issues and revokes transient preview URLs for image files.
///
/// Cloning is cheap and every clone refers to the same set of live handles.
#[derive(Debug, Clone, Default)]
pub struct PreviewRegistry {
    state: Arc<Mutex<RegistryState>>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Allocate a handle that keeps `data` resolvable until released
    pub fn allocate(&self, data: Arc<[u8]>, mime_type: &str) -> PreviewHandle {
        let url = format!("{}{}", URL_SCHEME, uuid::Uuid::new_v4());
        let mut state = self.lock();
        state.live.insert(
            url.clone(),
            PreviewEntry {
                data,
                mime_type: mime_type.to_string(),
            },
        );
        state.allocated += 1;
        drop(state);

        tracing::debug!(%url, mime_type, "allocated preview");
        PreviewHandle {
            url,
            registry: self.clone(),
            released: false,
        }
    }

    /// Bytes behind a live handle, `None` once it has been revoked
    pub fn resolve(&self, url: &str) -> Option<Arc<[u8]>> {
        self.lock().live.get(url).map(|entry| entry.data.clone())
    }

    /// MIME type behind a live handle
    pub fn mime_type(&self, url: &str) -> Option<String> {
        self.lock().live.get(url).map(|entry| entry.mime_type.clone())
    }

    /// Render the image behind a live handle as a PNG no larger than `max_edge`
    pub fn thumbnail(&self, url: &str, max_edge: u32) -> Result<Vec<u8>> {
        let data = self.resolve(url).ok_or_else(|| FlingError::PreviewRevoked {
            url: url.to_string(),
        })?;

        let img = image::load_from_memory(&data)?;
        let thumb = img.thumbnail(max_edge, max_edge);

        let mut out = Cursor::new(Vec::new());
        thumb.write_to(&mut out, ImageFormat::Png)?;
        Ok(out.into_inner())
    }

    /// Number of handles allocated and not yet released
    pub fn live_count(&self) -> usize {
        self.lock().live.len()
    }

    /// Total handles ever allocated by this registry
    pub fn allocated_count(&self) -> u64 {
        self.lock().allocated
    }

    /// Total handles released
    pub fn revoked_count(&self) -> u64 {
        self.lock().revoked
    }

    fn revoke(&self, url: &str) {
        let mut state = self.lock();
        if state.live.remove(url).is_some() {
            state.revoked += 1;
            tracing::debug!(%url, "revoked preview");
        } else {
            tracing::warn!(%url, "revoke of unknown preview handle ignored");
        }
    }
}

/// A transient URL-like reference to an image payload.
///
/// Handles cannot be cloned. Releasing consumes the handle, and a handle that
/// is dropped without an explicit release is released by `Drop`, so each one
/// is revoked exactly once.
#[derive(Debug)]
pub struct PreviewHandle {
    url: String,
    registry: PreviewRegistry,
    released: bool,
}

impl PreviewHandle {
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Revoke the handle now
    pub fn release(mut self) {
        self.revoke_once();
    }

    fn revoke_once(&mut self) {
        if !self.released {
            self.released = true;
            self.registry.revoke(&self.url);
        }
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.revoke_once();
    }
}
