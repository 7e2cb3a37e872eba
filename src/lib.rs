//! # file-fling
//!
//! Stage a handful of files, review them, and fling them into one zip.
//!
//! The crate is split the way the work flows:
//!
//! - **Staging**: an insertion-ordered list of picked files, with preview
//!   handles for images that are released exactly once
//! - **Archive**: a builder that adds each staged file at the archive root,
//!   deflates at level 6, reports coarse progress checkpoints, and hands the
//!   timestamped result to a save target
//! - **Notify**: the success, info and error notices both of them emit
//! - **CLI**: one-shot `pack`/`list`/`inspect` commands and an interactive shell

pub mod archive;
pub mod cli;
pub mod common;
pub mod notify;
pub mod staging;
