pub mod file;
pub mod list;
pub mod preview;

pub use file::{detect_mime, RawFile, StagedFile, StagedSummary};
pub use list::StagingList;
pub use preview::{PreviewHandle, PreviewRegistry};
