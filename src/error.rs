// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::PathBuf;
use thiserror::Error;

/// Errors caused by invalid command line input
#[derive(Error, Debug)]
pub enum UsageError {
    #[error("Invalid base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Base URL '{0}' cannot carry path segments")]
    CannotBeABase(String),

    #[error("Cannot determine a name for directory {0}")]
    UnnamedDirectory(PathBuf),
}

/// Errors that can occur while listing the input directory
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Failed to read directory {path}: {source}")]
    ReadDirectoryFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read directory entry in {path}: {source}")]
    ReadEntryFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Audio file name is not valid UTF-8: {0}")]
    InvalidFileName(PathBuf),
}

/// Errors that can occur while extracting metadata from a single audio file
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("Failed to open {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read file information for {path}: {source}")]
    StatFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read tags from {path}: {source}")]
    TagsUnreadable {
        path: PathBuf,
        #[source]
        source: symphonia::core::errors::Error,
    },

    #[error("Failed to run {program} on {path}: {source}")]
    ProbeFailed {
        program: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status} for {path}")]
    ProbeExited {
        program: String,
        path: PathBuf,
        status: std::process::ExitStatus,
    },

    #[error("No duration found in probe output for {path}")]
    MissingDuration { path: PathBuf },

    #[error("Failed to parse duration '{value}' for {path}: {reason}")]
    InvalidDuration {
        path: PathBuf,
        value: String,
        reason: String,
    },
}

/// Errors that can occur while serializing the feed
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to serialize RSS document: {0}")]
    Serialize(#[from] std::io::Error),

    #[error("RSS document is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Errors that can occur while writing the feed file
#[derive(Error, Debug)]
pub enum WriteError {
    #[error("Failed to write feed file {path}: {source}")]
    FileWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to move {from} into place at {to}: {source}")]
    RenameFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Top-level errors for feed generation
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Usage error: {0}")]
    Usage(#[from] UsageError),

    #[error("Directory '{0}' does not exist")]
    DirectoryNotFound(PathBuf),

    #[error("Error scanning directory: {0}")]
    Scan(#[from] ScanError),

    #[error("Failed to process {filename}: {source}")]
    Metadata {
        filename: String,
        #[source]
        source: MetadataError,
    },

    #[error("No audio files found in directory '{0}'")]
    NoEpisodes(PathBuf),

    #[error("Error rendering RSS feed: {0}")]
    Render(#[from] RenderError),

    #[error("Error writing RSS file: {0}")]
    Write(#[from] WriteError),
}
