// src/watch/mod.rs

//! Change detection and the watch loop.
//!
//! - [`patterns`] selects source files below a root with glob patterns.
//! - [`monitor`] snapshots modification times and diffs them (polling,
//!   no OS notification API).
//! - [`runner`] is the [`WatchLoop`] that re-runs the build on change.

pub mod monitor;
pub mod path_utils;
pub mod patterns;
pub mod runner;

pub use monitor::{diff, snapshot, ChangeMonitor, FileSetSnapshot};
pub use patterns::{collect_matching_files, SourcePattern};
pub use runner::{WatchLoop, WatchState};
