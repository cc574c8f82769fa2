// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Events emitted while generating a feed, for progress reporting
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// The input directory is being listed
    ScanStarted { directory: PathBuf },

    /// The directory listing has been classified
    DirectoryScanned {
        audio_files: usize,
        cover_art: Option<String>,
    },

    /// Metadata extraction for a file is starting
    EpisodeStarting {
        /// Index of this file in the sorted listing
        file_index: usize,
        total_files: usize,
        filename: String,
    },

    /// An episode was built successfully
    EpisodeProcessed {
        episode_number: u32,
        title: String,
        duration: Duration,
    },

    /// A file failed and was left out (best-effort mode only)
    EpisodeSkipped { filename: String, error: String },

    /// The feed file has been written
    FeedWritten {
        path: PathBuf,
        episode_count: usize,
    },
}

/// Trait for reporting progress events during feed generation.
///
/// Implementations can use this to display progress bars, log messages,
/// or collect statistics.
pub trait ProgressReporter: Send + Sync {
    /// Report a progress event
    fn report(&self, event: ProgressEvent);
}

/// A shared reference to a progress reporter
pub type SharedProgressReporter = Arc<dyn ProgressReporter>;

/// A no-op progress reporter that silently ignores all events.
/// Useful for tests or quiet mode.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn report(&self, _event: ProgressEvent) {}
}

impl NoopReporter {
    /// Create a new NoopReporter wrapped in an Arc
    pub fn shared() -> SharedProgressReporter {
        Arc::new(Self)
    }
}
