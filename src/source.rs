//! Core [`MediaSource`] implementation.
//!
//! `MediaSource` owns the FFmpeg demuxer context for one input file. It
//! exposes the per-stream extradata and a [`PacketIterator`] over the
//! demuxed packets; it never decodes anything.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
};

use ffmpeg_next::format::context::Input;

use crate::{error::DumpError, packet_iterator::PacketIterator};

/// Codec initialisation bytes of one stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamExtradata {
    /// Index of the owning stream.
    pub stream_index: usize,
    /// Codec name as reported by FFmpeg (e.g. `h264`, `aac`).
    pub codec: String,
    /// The raw extradata bytes.
    pub data: Vec<u8>,
}

impl StreamExtradata {
    /// Length of the extradata in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always `false` for values returned by [`MediaSource::extradata`].
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// An opened media file, ready for demuxing.
///
/// # Example
///
/// ```no_run
/// use pktdump::{DumpError, MediaSource};
///
/// let mut source = MediaSource::open("input.mkv")?;
/// for blob in source.extradata() {
///     println!("stream {} ({}): {} bytes", blob.stream_index, blob.codec, blob.len());
/// }
/// let count = source.packets().count();
/// println!("{count} packets");
/// # Ok::<(), DumpError>(())
/// ```
pub struct MediaSource {
    pub(crate) input_context: Input,
    path: PathBuf,
}

impl Debug for MediaSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("MediaSource")
            .field("path", &self.path)
            .field("stream_count", &self.stream_count())
            .finish_non_exhaustive()
    }
}

impl MediaSource {
    /// Open a media file and read its stream information.
    ///
    /// Initialises FFmpeg (idempotent) before opening.
    ///
    /// # Errors
    ///
    /// Returns [`DumpError::FileOpen`] if FFmpeg cannot be initialised, the
    /// file cannot be opened, or its stream information cannot be read.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DumpError> {
        let path = path.as_ref().to_path_buf();

        log::debug!("Opening media file: {}", path.display());

        ffmpeg_next::init().map_err(|error| DumpError::FileOpen {
            path: path.clone(),
            reason: format!("FFmpeg initialisation failed: {error}"),
        })?;

        let input_context =
            ffmpeg_next::format::input(&path).map_err(|error| DumpError::FileOpen {
                path: path.clone(),
                reason: error.to_string(),
            })?;

        log::debug!(
            "Opened {} ({}, {} streams)",
            path.display(),
            input_context.format().name(),
            input_context.streams().count()
        );

        Ok(Self {
            input_context,
            path,
        })
    }

    /// Path the source was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of streams in the container.
    pub fn stream_count(&self) -> usize {
        self.input_context.streams().count()
    }

    /// Short name of the detected container format.
    pub fn format_name(&self) -> String {
        self.input_context.format().name().to_string()
    }

    /// Extradata of every stream that has any, in stream order.
    pub fn extradata(&self) -> Vec<StreamExtradata> {
        let mut blobs = Vec::new();

        for stream in self.input_context.streams() {
            let parameters = stream.parameters();
            let data = unsafe {
                let raw = parameters.as_ptr();
                let size = (*raw).extradata_size;
                if size > 0 && !(*raw).extradata.is_null() {
                    std::slice::from_raw_parts((*raw).extradata, size as usize).to_vec()
                } else {
                    Vec::new()
                }
            };

            if data.is_empty() {
                continue;
            }

            let codec = parameters.id().name().to_string();
            log::debug!(
                "Stream {} ({codec}) carries {} bytes of extradata",
                stream.index(),
                data.len()
            );

            blobs.push(StreamExtradata {
                stream_index: stream.index(),
                codec,
                data,
            });
        }

        blobs
    }

    /// Iterate over the demuxed packets from the current read position.
    pub fn packets(&mut self) -> PacketIterator<'_> {
        PacketIterator::new(self)
    }
}
