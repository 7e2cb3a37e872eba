use std::sync::Arc;

use super::file::{RawFile, StagedFile};
use super::preview::PreviewRegistry;
use crate::notify::{Notice, Notifier};

/// Length of the hex ids handed out to staged files
const ID_LEN: usize = 8;

/// Insertion-ordered list of files waiting to be archived.
///
/// Dropping the list releases every preview handle it still owns.
pub struct StagingList {
    files: Vec<StagedFile>,
    previews: PreviewRegistry,
    notifier: Arc<dyn Notifier>,
}

impl StagingList {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self::with_registry(notifier, PreviewRegistry::new())
    }

    pub fn with_registry(notifier: Arc<dyn Notifier>, previews: PreviewRegistry) -> Self {
        Self {
            files: Vec::new(),
            previews,
            notifier,
        }
    }

    /// Append files in order. Image files get a preview handle.
    /// Returns how many were added.
    pub fn add<I>(&mut self, files: I) -> usize
    where
        I: IntoIterator<Item = RawFile>,
    {
        let before = self.files.len();

        for file in files {
            let id = self.fresh_id();
            let preview = if file.is_image() {
                Some(self.previews.allocate(file.data.clone(), &file.mime_type))
            } else {
                None
            };
            tracing::debug!(%id, name = %file.name, size = file.size(), "staged file");
            self.files.push(StagedFile { id, file, preview });
        }

        let count = self.files.len() - before;
        if count > 0 {
            self.notifier.notify(Notice::FilesAdded { count });
        }
        count
    }

    /// Remove a file by id, releasing its preview. Unknown ids are ignored.
    pub fn remove(&mut self, id: &str) -> bool {
        let Some(pos) = self.files.iter().position(|f| f.id == id) else {
            tracing::debug!(%id, "remove of unknown id ignored");
            return false;
        };

        let mut staged = self.files.remove(pos);
        if let Some(preview) = staged.preview.take() {
            preview.release();
        }
        tracing::debug!(%id, name = %staged.file.name, "unstaged file");
        true
    }

    /// Release every preview and empty the list
    pub fn clear_all(&mut self) {
        for mut staged in self.files.drain(..) {
            if let Some(preview) = staged.preview.take() {
                preview.release();
            }
        }
        self.notifier.notify(Notice::Cleared);
    }

    /// Sum of all staged file sizes, computed on demand
    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|f| f.size()).sum()
    }

    pub fn files(&self) -> &[StagedFile] {
        &self.files
    }

    pub fn get(&self, id: &str) -> Option<&StagedFile> {
        self.files.iter().find(|f| f.id == id)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn previews(&self) -> &PreviewRegistry {
        &self.previews
    }

    fn fresh_id(&self) -> String {
        loop {
            let candidate: String = uuid::Uuid::new_v4()
                .simple()
                .to_string()
                .chars()
                .take(ID_LEN)
                .collect();
            if !self.files.iter().any(|f| f.id == candidate) {
                return candidate;
            }
        }
    }
}

impl std::fmt::Debug for StagingList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StagingList")
            .field("files", &self.files)
            .field("previews", &self.previews)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::MemoryNotifier;

    #[test]
    fn test_ids_are_short_hex_and_unique() {
        let mut list = StagingList::new(Arc::new(MemoryNotifier::new()));
        list.add((0..50).map(|i| RawFile::new(format!("f{}.txt", i), vec![b'x'; i])));

        let mut ids: Vec<&str> = list.files().iter().map(|f| f.id.as_str()).collect();
        assert!(ids
            .iter()
            .all(|id| id.len() == ID_LEN && id.chars().all(|c| c.is_ascii_hexdigit())));
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn test_empty_add_is_silent() {
        let notifier = Arc::new(MemoryNotifier::new());
        let mut list = StagingList::new(notifier.clone());
        assert_eq!(list.add(Vec::new()), 0);
        assert!(notifier.notices().is_empty());
    }

    #[test]
    fn test_drop_releases_previews() {
        let registry = PreviewRegistry::new();
        {
            let mut list =
                StagingList::with_registry(Arc::new(MemoryNotifier::new()), registry.clone());
            list.add(vec![
                RawFile::with_mime("a.png", vec![1, 2, 3], "image/png"),
                RawFile::with_mime("b.jpg", vec![4, 5, 6], "image/jpeg"),
            ]);
            assert_eq!(registry.live_count(), 2);
        }
        assert_eq!(registry.live_count(), 0);
        assert_eq!(registry.revoked_count(), 2);
    }
}
