pub mod builder;
pub mod inspect;
pub mod naming;
pub mod progress;
pub mod sink;

pub use builder::{ArchiveBuilder, ArchiveOptions, BuildOutcome, SavedArchive};
pub use inspect::{list_entries, read_entries, ArchiveEntry};
pub use naming::{archive_filename, is_archive_filename};
pub use progress::{BuildState, ProgressLog, ProgressObserver};
pub use sink::{DirectorySink, MemorySink, SaveSink, SavedBlob};
