// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, Local};
use tracing::{debug, warn};

use crate::episode::{PubDateLadder, PublicLocation, build_episode};
use crate::error::{GenerateError, ScanError, UsageError, WriteError};
use crate::feed::{Podcast, render_feed};
use crate::metadata::MetadataSource;
use crate::progress::{ProgressEvent, SharedProgressReporter};
use crate::scan::scan_directory;

/// Name of the feed file written into the scanned directory
pub const FEED_FILENAME: &str = "podcast.rss";

const PARTIAL_SUFFIX: &str = ".partial";

/// What to do when a single audio file cannot be turned into an episode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Abort the whole run on the first bad file
    #[default]
    FailFast,
    /// Leave bad files out of the feed and carry on
    SkipInvalid,
}

/// Options for feed generation
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Public URL the directory's parent is hosted under
    pub base_url: String,
    pub failure_policy: FailurePolicy,
    /// Filename of the feed inside the scanned directory
    pub feed_filename: String,
}

impl GenerateOptions {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            failure_policy: FailurePolicy::default(),
            feed_filename: FEED_FILENAME.to_string(),
        }
    }
}

/// A podcast built from a directory, plus the files left out of it
#[derive(Debug, Clone)]
pub struct PodcastBuild {
    pub podcast: Podcast,
    /// Files skipped under [`FailurePolicy::SkipInvalid`] (filename, error)
    pub skipped_files: Vec<(String, String)>,
}

/// Result of a generate operation
#[derive(Debug, Clone)]
pub struct GenerateResult {
    pub feed_path: PathBuf,
    pub episode_count: usize,
    pub skipped_files: Vec<(String, String)>,
}

/// Base name of a directory, resolving `.` and `..` through the filesystem
pub fn directory_name(dir: &Path) -> Result<String, UsageError> {
    if let Some(name) = dir.file_name() {
        return Ok(name.to_string_lossy().into_owned());
    }

    dir.canonicalize()
        .ok()
        .and_then(|path| path.file_name().map(|n| n.to_string_lossy().into_owned()))
        .ok_or_else(|| UsageError::UnnamedDirectory(dir.to_path_buf()))
}

/// Scan a directory and build its podcast
///
/// `now` anchors the publication dates: the first episode is published at
/// `now`, every following one a second later. Audio files are processed one
/// at a time in sorted order.
pub fn build_podcast<S: MetadataSource + ?Sized>(
    source: &S,
    dir: &Path,
    options: &GenerateOptions,
    now: DateTime<FixedOffset>,
    reporter: &SharedProgressReporter,
) -> Result<PodcastBuild, GenerateError> {
    let exists = dir
        .try_exists()
        .map_err(|e| ScanError::ReadDirectoryFailed {
            path: dir.to_path_buf(),
            source: e,
        })?;
    if !exists {
        return Err(GenerateError::DirectoryNotFound(dir.to_path_buf()));
    }

    let location = PublicLocation::new(&options.base_url, directory_name(dir)?)?;

    reporter.report(ProgressEvent::ScanStarted {
        directory: dir.to_path_buf(),
    });

    let listing = scan_directory(dir)?;

    reporter.report(ProgressEvent::DirectoryScanned {
        audio_files: listing.audio_files.len(),
        cover_art: listing.cover_art.clone(),
    });

    if listing.is_empty() {
        return Err(GenerateError::NoEpisodes(dir.to_path_buf()));
    }

    let ladder = PubDateLadder::new(now);
    let total_files = listing.audio_files.len();
    let mut episodes = Vec::with_capacity(total_files);
    let mut skipped_files = Vec::new();
    let mut next_number: u32 = 1;

    for (file_index, filename) in listing.audio_files.iter().enumerate() {
        reporter.report(ProgressEvent::EpisodeStarting {
            file_index,
            total_files,
            filename: filename.clone(),
        });

        let path = listing.path_of(filename);
        match build_episode(
            source,
            &location,
            &path,
            ladder.date_for(next_number),
            next_number,
        ) {
            Ok(episode) => {
                debug!(episode = episode.episode_number, file = %filename, "built episode");
                reporter.report(ProgressEvent::EpisodeProcessed {
                    episode_number: episode.episode_number,
                    title: episode.title.clone(),
                    duration: episode.duration,
                });
                episodes.push(episode);
                next_number += 1;
            }
            Err(e) => match options.failure_policy {
                FailurePolicy::FailFast => {
                    return Err(GenerateError::Metadata {
                        filename: filename.clone(),
                        source: e,
                    });
                }
                FailurePolicy::SkipInvalid => {
                    warn!(file = %filename, error = %e, "skipping file");
                    reporter.report(ProgressEvent::EpisodeSkipped {
                        filename: filename.clone(),
                        error: e.to_string(),
                    });
                    skipped_files.push((filename.clone(), e.to_string()));
                }
            },
        }
    }

    if episodes.is_empty() {
        return Err(GenerateError::NoEpisodes(dir.to_path_buf()));
    }

    let cover_art_url = listing
        .cover_art
        .as_deref()
        .map(|filename| location.url_for(filename));

    Ok(PodcastBuild {
        podcast: Podcast::assemble(location.directory_name(), episodes, cover_art_url),
        skipped_files,
    })
}

/// Write the feed next to the audio files, replacing any previous feed
///
/// The document is written to a `.partial` file first and renamed into place,
/// so readers never see a truncated feed.
pub fn write_feed(path: &Path, xml: &str) -> Result<(), WriteError> {
    let mut partial = path.as_os_str().to_owned();
    partial.push(PARTIAL_SUFFIX);
    let partial = PathBuf::from(partial);

    if let Err(e) = std::fs::write(&partial, xml) {
        let _ = std::fs::remove_file(&partial);
        return Err(WriteError::FileWriteFailed {
            path: partial,
            source: e,
        });
    }

    std::fs::rename(&partial, path).map_err(|e| {
        let _ = std::fs::remove_file(&partial);
        WriteError::RenameFailed {
            from: partial.clone(),
            to: path.to_path_buf(),
            source: e,
        }
    })
}

/// Generate the RSS feed for a directory
///
/// This is the main entry point for the library. It:
/// 1. Scans the directory for audio files and cover art
/// 2. Builds one episode per audio file, in sorted order
/// 3. Renders the RSS document
/// 4. Writes it to `<dir>/podcast.rss`
///
/// Nothing is written unless every step before it succeeded.
pub fn generate_feed<S: MetadataSource + ?Sized>(
    source: &S,
    dir: &Path,
    options: &GenerateOptions,
    reporter: SharedProgressReporter,
) -> Result<GenerateResult, GenerateError> {
    let now = Local::now().fixed_offset();
    let build = build_podcast(source, dir, options, now, &reporter)?;

    let xml = render_feed(&build.podcast)?;
    let feed_path = dir.join(&options.feed_filename);
    write_feed(&feed_path, &xml)?;

    let episode_count = build.podcast.episodes.len();
    reporter.report(ProgressEvent::FeedWritten {
        path: feed_path.clone(),
        episode_count,
    });

    Ok(GenerateResult {
        feed_path,
        episode_count,
        skipped_files: build.skipped_files,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;
    use std::time::Duration;

    use chrono::TimeDelta;
    use percent_encoding::percent_decode_str;
    use tempfile::{TempDir, tempdir};

    use crate::error::MetadataError;
    use crate::metadata::RawMetadata;
    use crate::progress::NoopReporter;

    /// Metadata source answering from a filename-keyed table
    #[derive(Default)]
    struct FakeSource {
        entries: HashMap<String, RawMetadata>,
    }

    impl FakeSource {
        fn with(mut self, filename: &str, title: &str, comment: &str, secs: u64) -> Self {
            self.entries.insert(
                filename.to_string(),
                RawMetadata {
                    title: title.to_string(),
                    comment: comment.to_string(),
                    duration: Duration::from_secs(secs),
                },
            );
            self
        }
    }

    impl MetadataSource for FakeSource {
        fn extract(&self, path: &Path) -> Result<RawMetadata, MetadataError> {
            let name = path.file_name().unwrap().to_str().unwrap();
            self.entries
                .get(name)
                .cloned()
                .ok_or_else(|| MetadataError::MissingDuration {
                    path: path.to_path_buf(),
                })
        }
    }

    const BASE_URL: &str = "https://example.com/audiobooks";

    fn now() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2024-01-01T12:00:00+00:00").unwrap()
    }

    /// Create `<tmp>/<name>` containing the given files
    fn book_dir(name: &str, files: &[&str]) -> (TempDir, PathBuf) {
        let root = tempdir().unwrap();
        let dir = root.path().join(name);
        std::fs::create_dir(&dir).unwrap();
        for file in files {
            std::fs::write(dir.join(file), file.as_bytes()).unwrap();
        }
        (root, dir)
    }

    fn audiobook_source() -> FakeSource {
        FakeSource::default()
            .with("chapter01.mp3", "Chapter One", "The beginning of our story", 3725)
            .with("chapter02.mp3", "Chapter Two", "iTunPGAP", 125)
            .with("chapter03.mp3", "Chapter Three", "", 0)
    }

    fn build(
        source: &FakeSource,
        dir: &Path,
        options: &GenerateOptions,
    ) -> Result<PodcastBuild, GenerateError> {
        build_podcast(source, dir, options, now(), &NoopReporter::shared())
    }

    #[test]
    fn builds_audiobook_podcast() {
        let (_root, dir) = book_dir(
            "audiobook1",
            &["chapter02.mp3", "cover.jpg", "chapter03.mp3", "chapter01.mp3"],
        );

        let podcast = build(&audiobook_source(), &dir, &GenerateOptions::new(BASE_URL))
            .unwrap()
            .podcast;

        assert_eq!(podcast.title, "audiobook1");
        assert_eq!(podcast.description, "Audiobook podcast for audiobook1");
        assert_eq!(
            podcast.cover_art_url.unwrap().as_str(),
            "https://example.com/audiobooks/audiobook1/cover.jpg"
        );

        let titles: Vec<_> = podcast.episodes.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Chapter One", "Chapter Two", "Chapter Three"]);

        let numbers: Vec<_> = podcast.episodes.iter().map(|e| e.episode_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);

        assert_eq!(
            podcast.episodes[0].url.as_str(),
            "https://example.com/audiobooks/audiobook1/chapter01.mp3"
        );
        assert_eq!(podcast.episodes[0].guid(), podcast.episodes[0].url.as_str());
    }

    #[test]
    fn placeholder_and_empty_comments_use_title() {
        let (_root, dir) = book_dir(
            "audiobook1",
            &["chapter01.mp3", "chapter02.mp3", "chapter03.mp3"],
        );

        let podcast = build(&audiobook_source(), &dir, &GenerateOptions::new(BASE_URL))
            .unwrap()
            .podcast;

        assert_eq!(podcast.episodes[0].description, "The beginning of our story");
        assert_eq!(podcast.episodes[1].description, "Chapter Two");
        assert_eq!(podcast.episodes[2].description, "Chapter Three");
    }

    #[test]
    fn pub_dates_step_by_one_second_from_now() {
        let (_root, dir) = book_dir(
            "audiobook1",
            &["chapter01.mp3", "chapter02.mp3", "chapter03.mp3"],
        );

        let podcast = build(&audiobook_source(), &dir, &GenerateOptions::new(BASE_URL))
            .unwrap()
            .podcast;

        assert_eq!(podcast.episodes[0].pub_date, now());
        for pair in podcast.episodes.windows(2) {
            assert_eq!(pair[1].pub_date - pair[0].pub_date, TimeDelta::seconds(1));
        }
    }

    #[test]
    fn episode_urls_decode_to_original_names() {
        let files = ["01 Intro & Prologue.mp3", "02 Über #2?.m4b"];
        let (_root, dir) = book_dir("My Book (2024)", &files);
        let source = FakeSource::default()
            .with(files[0], "", "", 10)
            .with(files[1], "", "", 20);

        let podcast = build(&source, &dir, &GenerateOptions::new(BASE_URL))
            .unwrap()
            .podcast;

        for (episode, file) in podcast.episodes.iter().zip(files) {
            let segments: Vec<String> = episode
                .url
                .path_segments()
                .unwrap()
                .map(|s| percent_decode_str(s).decode_utf8().unwrap().into_owned())
                .collect();
            assert_eq!(segments, vec!["audiobooks", "My Book (2024)", file]);
        }
        assert_eq!(podcast.episodes[0].title, "01 Intro & Prologue");
    }

    #[test]
    fn unsupported_files_yield_no_episodes() {
        let (_root, dir) = book_dir("notes", &["readme.txt", "track.wav", "cover.png"]);

        let result = build(&FakeSource::default(), &dir, &GenerateOptions::new(BASE_URL));

        assert!(matches!(result, Err(GenerateError::NoEpisodes(_))));
    }

    #[test]
    fn missing_directory_is_not_found() {
        let root = tempdir().unwrap();

        let result = build(
            &FakeSource::default(),
            &root.path().join("missing"),
            &GenerateOptions::new(BASE_URL),
        );

        assert!(matches!(result, Err(GenerateError::DirectoryNotFound(_))));
    }

    #[cfg(unix)]
    #[test]
    fn uninspectable_directory_is_a_scan_error() {
        let root = tempdir().unwrap();
        let file = root.path().join("notes.txt");
        std::fs::write(&file, "not a directory").unwrap();

        // stat fails with ENOTDIR rather than reporting a missing path
        let result = build(
            &FakeSource::default(),
            &file.join("audiobook1"),
            &GenerateOptions::new(BASE_URL),
        );

        assert!(matches!(
            result,
            Err(GenerateError::Scan(ScanError::ReadDirectoryFailed { .. }))
        ));
    }

    #[test]
    fn unreadable_directory_is_a_scan_error() {
        let (_root, dir) = book_dir("audiobook1", &["chapter01.mp3"]);

        let result = build(
            &audiobook_source(),
            &dir.join("chapter01.mp3"),
            &GenerateOptions::new(BASE_URL),
        );

        assert!(matches!(result, Err(GenerateError::Scan(_))));
    }

    #[test]
    fn invalid_base_url_is_a_usage_error() {
        let (_root, dir) = book_dir("audiobook1", &["chapter01.mp3"]);

        let result = build(
            &audiobook_source(),
            &dir,
            &GenerateOptions::new("example.com/audiobooks"),
        );

        assert!(matches!(result, Err(GenerateError::Usage(_))));
    }

    #[test]
    fn fail_fast_aborts_on_first_bad_file() {
        let (_root, dir) = book_dir(
            "audiobook1",
            &["chapter01.mp3", "chapter02.mp3", "broken.mp3"],
        );

        let result = build(&audiobook_source(), &dir, &GenerateOptions::new(BASE_URL));

        match result {
            Err(GenerateError::Metadata { filename, .. }) => assert_eq!(filename, "broken.mp3"),
            other => panic!("expected metadata error, got {other:?}"),
        }
    }

    #[test]
    fn skip_invalid_keeps_numbering_contiguous() {
        let (_root, dir) = book_dir(
            "audiobook1",
            &["chapter01.mp3", "chapter01b.mp3", "chapter02.mp3"],
        );
        let options = GenerateOptions {
            failure_policy: FailurePolicy::SkipInvalid,
            ..GenerateOptions::new(BASE_URL)
        };

        let outcome = build(&audiobook_source(), &dir, &options).unwrap();

        assert_eq!(
            outcome.skipped_files.iter().map(|(f, _)| f.as_str()).collect::<Vec<_>>(),
            vec!["chapter01b.mp3"]
        );
        let episodes = &outcome.podcast.episodes;
        assert_eq!(episodes.len(), 2);
        assert_eq!(episodes[1].title, "Chapter Two");
        assert_eq!(episodes[1].episode_number, 2);
        assert_eq!(episodes[1].pub_date - episodes[0].pub_date, TimeDelta::seconds(1));
    }

    #[test]
    fn skip_invalid_with_only_bad_files_has_no_episodes() {
        let (_root, dir) = book_dir("audiobook1", &["broken.mp3"]);
        let options = GenerateOptions {
            failure_policy: FailurePolicy::SkipInvalid,
            ..GenerateOptions::new(BASE_URL)
        };

        let result = build(&FakeSource::default(), &dir, &options);

        assert!(matches!(result, Err(GenerateError::NoEpisodes(_))));
    }

    #[test]
    fn directory_name_resolves_dot() {
        let (_root, dir) = book_dir("audiobook1", &[]);

        assert_eq!(directory_name(&dir).unwrap(), "audiobook1");
        assert_eq!(directory_name(&dir.join(".")).unwrap(), "audiobook1");
    }

    #[test]
    fn generate_writes_feed_file() {
        let (_root, dir) = book_dir(
            "audiobook1",
            &["chapter01.mp3", "chapter02.mp3", "chapter03.mp3", "cover.jpg"],
        );
        std::fs::write(dir.join(FEED_FILENAME), "stale").unwrap();

        let result = generate_feed(
            &audiobook_source(),
            &dir,
            &GenerateOptions::new(BASE_URL),
            NoopReporter::shared(),
        )
        .unwrap();

        assert_eq!(result.feed_path, dir.join(FEED_FILENAME));
        assert_eq!(result.episode_count, 3);
        assert!(result.skipped_files.is_empty());
        assert!(!dir.join("podcast.rss.partial").exists());

        let xml = std::fs::read_to_string(&result.feed_path).unwrap();
        let channel = rss::Channel::read_from(xml.as_bytes()).unwrap();
        assert_eq!(channel.items().len(), 3);

        let episodes: Vec<_> = channel
            .items()
            .iter()
            .map(|item| item.itunes_ext().unwrap().episode().unwrap().to_string())
            .collect();
        assert_eq!(episodes, vec!["1", "2", "3"]);
        assert_eq!(
            channel.items()[0].guid().unwrap().value(),
            "https://example.com/audiobooks/audiobook1/chapter01.mp3"
        );
    }

    #[test]
    fn generate_writes_nothing_on_failure() {
        let (_root, dir) = book_dir("audiobook1", &["chapter01.mp3", "broken.mp3"]);

        let result = generate_feed(
            &audiobook_source(),
            &dir,
            &GenerateOptions::new(BASE_URL),
            NoopReporter::shared(),
        );

        assert!(result.is_err());
        assert!(!dir.join(FEED_FILENAME).exists());
        assert!(!dir.join("podcast.rss.partial").exists());
    }

    #[test]
    fn write_feed_fails_for_missing_directory() {
        let root = tempdir().unwrap();
        let path = root.path().join("missing").join(FEED_FILENAME);

        let result = write_feed(&path, "<rss/>");

        assert!(matches!(result, Err(WriteError::FileWriteFailed { .. })));
    }
}
