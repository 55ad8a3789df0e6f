//! Error types for the `pktdump` crate.
//!
//! This module defines [`DumpError`], the unified error type returned by all
//! fallible operations in the crate. Every failure is fatal to a dump run;
//! variants carry the path or upstream message needed to explain it.

use std::{io::Error as IoError, path::PathBuf};

use ffmpeg_next::Error as FfmpegError;
use thiserror::Error;

/// The unified error type for all `pktdump` operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DumpError {
    /// The input's base name contains a `%` character.
    ///
    /// Raised while building the file-name template, before the input is
    /// opened or anything is written.
    #[error("cannot use filenames containing '%': {base_name}")]
    PercentInFileName {
        /// The offending base name (directory and extension stripped).
        base_name: String,
    },

    /// The input's base name leaves no room for the packet suffix.
    #[error("filename too long ({length} bytes, at most {limit} allowed)")]
    FileNameTooLong {
        /// Length of the base name in bytes.
        length: usize,
        /// Longest accepted base name in bytes.
        limit: usize,
    },

    /// The input path is not valid UTF-8, so no output name can be derived
    /// from it without altering it.
    #[error("input path is not valid UTF-8: {}", path.display())]
    NonUtf8FileName {
        /// The path as given.
        path: PathBuf,
    },

    /// The input could not be opened or its stream info could not be read.
    #[error("cannot open input {path}: {reason}")]
    FileOpen {
        /// Path that was passed to [`crate::MediaSource::open`].
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// A packet or extradata file could not be written.
    #[error("write to {path} failed: {source}")]
    Write {
        /// Destination file.
        path: PathBuf,
        /// The I/O error reported by the operating system.
        #[source]
        source: IoError,
    },

    /// An error originating from the FFmpeg libraries.
    #[error("FFmpeg error: {0}")]
    FfmpegError(String),

    /// An I/O error not tied to a specific output file.
    #[error("I/O error: {0}")]
    IoError(#[from] IoError),

    /// The run was cancelled via a [`CancellationToken`](crate::CancellationToken).
    #[error("Operation cancelled")]
    Cancelled,
}

impl From<FfmpegError> for DumpError {
    fn from(error: FfmpegError) -> Self {
        DumpError::FfmpegError(error.to_string())
    }
}
