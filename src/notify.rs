use serde::Serialize;
use std::sync::Mutex;

use crate::common::format;

/// Something the user should be told about
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// Files were appended to the staging list
    FilesAdded { count: usize },
    /// The staging list was emptied
    Cleared,
    /// An archive was built and handed to the save target
    ArchiveCreated { filename: String },
    /// Building the archive failed (details go to the log)
    ArchiveFailed,
    /// A build was requested with nothing staged
    NoFiles,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

impl Notice {
    pub fn level(&self) -> NoticeLevel {
        match self {
            Notice::FilesAdded { .. } | Notice::ArchiveCreated { .. } => NoticeLevel::Success,
            Notice::Cleared => NoticeLevel::Info,
            Notice::ArchiveFailed | Notice::NoFiles => NoticeLevel::Error,
        }
    }

    /// Default user-facing wording
    pub fn message(&self) -> String {
        match self {
            Notice::FilesAdded { count } => format!("{} added", format::format_count(*count)),
            Notice::Cleared => "All files cleared".to_string(),
            Notice::ArchiveCreated { filename } => format!("Archive created: {}", filename),
            Notice::ArchiveFailed => "Failed to create archive".to_string(),
            Notice::NoFiles => "No files selected".to_string(),
        }
    }
}

/// Receives notices from the staging list and the archive builder
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Routes notices into the tracing log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level() {
            NoticeLevel::Error => tracing::warn!(notice = ?notice, "{}", notice.message()),
            _ => tracing::info!(notice = ?notice, "{}", notice.message()),
        }
    }
}

/// Keeps every notice in memory, in order
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .map(|n| n.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, notice: Notice) {
        self.notices
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(notice);
    }
}
