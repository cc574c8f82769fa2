pub mod episode;
pub mod error;
pub mod feed;
pub mod generate;
pub mod media;
pub mod metadata;
pub mod progress;
pub mod scan;

// Re-export main types for convenience
pub use episode::{PubDateLadder, PublicLocation, build_episode, format_duration};
pub use error::{GenerateError, MetadataError, RenderError, ScanError, UsageError, WriteError};
pub use feed::{Episode, Podcast, render_feed, render_feed_at};
pub use generate::{
    FEED_FILENAME, FailurePolicy, GenerateOptions, GenerateResult, PodcastBuild, build_podcast,
    generate_feed, write_feed,
};
pub use metadata::{MetadataSource, RawMetadata, SystemMetadataSource};
pub use progress::{NoopReporter, ProgressEvent, ProgressReporter, SharedProgressReporter};
pub use scan::{DirectoryListing, scan_directory};
