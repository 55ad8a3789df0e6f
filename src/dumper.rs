//! The packet dump loop.
//!
//! [`PacketDumper`] ties the pieces together: it derives the
//! [`FileNameTemplate`] from the input path, opens a [`MediaSource`],
//! writes every stream's extradata and then every packet to its own file.
//! Each output is announced to a caller-supplied closure before it is
//! written, so a front end can list names even in a dry run.
//!
//! # Example
//!
//! ```no_run
//! use pktdump::{DumpEntry, DumpOptions, PacketDumper};
//!
//! let dumper = PacketDumper::new(DumpOptions::new().with_max_packets(50));
//! let summary = dumper.run("input.mp4", |entry| {
//!     if let DumpEntry::Packet { suffix, .. } = entry {
//!         println!("{suffix}");
//!     }
//! })?;
//! println!("{} packets, {} bytes", summary.packets, summary.bytes);
//! # Ok::<(), pktdump::DumpError>(())
//! ```

use std::{
    collections::BTreeMap,
    fs::OpenOptions,
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    configuration::DumpOptions,
    error::DumpError,
    naming::FileNameTemplate,
    packet_iterator::DemuxedPacket,
    progress::ProgressTracker,
    source::{MediaSource, StreamExtradata},
};

/// One output announced by [`PacketDumper::run`].
#[derive(Debug)]
pub enum DumpEntry<'a> {
    /// A stream's extradata, about to be written.
    Extradata {
        /// Name suffix, e.g. `_extradata_00_000041.bin`.
        suffix: String,
        /// Full output path.
        path: PathBuf,
        /// The extradata itself.
        extradata: &'a StreamExtradata,
    },
    /// The packet file-name template, announced once before the first packet.
    Template {
        /// Rendered template, see [`FileNameTemplate::describe`].
        description: String,
    },
    /// A demuxed packet, about to be written.
    Packet {
        /// Name suffix, e.g. `_00000012_01_0000001024_000371__.bin`.
        suffix: String,
        /// Full output path.
        path: PathBuf,
        /// The packet itself.
        packet: &'a DemuxedPacket,
    },
}

/// Per-stream packet totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamTally {
    /// Packets read from this stream.
    pub packets: u64,
    /// Payload bytes read from this stream.
    pub bytes: u64,
    /// Keyframe packets read from this stream.
    pub keyframes: u64,
}

/// Totals gathered during one [`PacketDumper::run`].
#[derive(Debug, Clone, Default)]
pub struct DumpSummary {
    /// Container format name reported by FFmpeg.
    pub format: String,
    /// Number of streams in the input.
    pub stream_count: usize,
    /// Extradata blobs found (and written, unless dry run).
    pub extradata_blobs: u64,
    /// Packets read.
    pub packets: u64,
    /// Packet payload bytes read.
    pub bytes: u64,
    /// Keyframe packets read.
    pub keyframes: u64,
    /// Per-stream totals keyed by stream index.
    pub streams: BTreeMap<usize, StreamTally>,
    /// Files created on disk. Zero for a dry run.
    pub files_written: u64,
    /// `true` if the run stopped because the packet limit was reached.
    pub limit_reached: bool,
    /// The read error that ended the demux loop early, if any.
    pub read_error: Option<String>,
}

/// Runs the demux-and-dump loop for one input.
#[derive(Debug, Clone, Default)]
pub struct PacketDumper {
    options: DumpOptions,
}

impl PacketDumper {
    /// Create a dumper with the given options.
    pub fn new(options: DumpOptions) -> Self {
        Self { options }
    }

    /// The options this dumper runs with.
    pub fn options(&self) -> &DumpOptions {
        &self.options
    }

    /// Build the file-name template for `input` under these options.
    ///
    /// # Errors
    ///
    /// See [`FileNameTemplate::from_input`].
    pub fn template_for<P: AsRef<Path>>(&self, input: P) -> Result<FileNameTemplate, DumpError> {
        let template = FileNameTemplate::from_input(input)?;
        Ok(match self.options.output_directory() {
            Some(directory) => template.with_output_directory(directory),
            None => template,
        })
    }

    /// Dump `input`, announcing every output to `on_entry` before writing it.
    ///
    /// The file-name template is validated before the input is opened, so
    /// a bad name never touches the filesystem.
    ///
    /// # Errors
    ///
    /// - [`DumpError::NonUtf8FileName`], [`DumpError::PercentInFileName`] or
    ///   [`DumpError::FileNameTooLong`] for an unusable input name.
    /// - [`DumpError::FileOpen`] if the input cannot be opened.
    /// - [`DumpError::Write`] on the first failed file write.
    /// - [`DumpError::Cancelled`] if the cancellation token fires.
    pub fn run<P, F>(&self, input: P, mut on_entry: F) -> Result<DumpSummary, DumpError>
    where
        P: AsRef<Path>,
        F: FnMut(&DumpEntry<'_>),
    {
        let input = input.as_ref();
        let template = self.template_for(input)?;
        let mut source = MediaSource::open(input)?;

        let mut summary = DumpSummary {
            format: source.format_name(),
            stream_count: source.stream_count(),
            ..DumpSummary::default()
        };

        for extradata in source.extradata() {
            let suffix = template.extradata_suffix(extradata.stream_index, extradata.len());
            let path = template.extradata_path(extradata.stream_index, extradata.len());
            on_entry(&DumpEntry::Extradata {
                suffix,
                path: path.clone(),
                extradata: &extradata,
            });

            if !self.options.dry_run {
                write_file(&path, &extradata.data)?;
                summary.files_written += 1;
            }
            summary.extradata_blobs += 1;
        }

        on_entry(&DumpEntry::Template {
            description: template.describe(),
        });

        let mut tracker = ProgressTracker::new(
            self.options.progress.clone(),
            self.options.max_packets,
            self.options.batch_size,
        );
        let mut packets = source.packets();

        loop {
            if self.options.is_cancelled() {
                return Err(DumpError::Cancelled);
            }
            let Some(packet) = packets.next() else {
                break;
            };

            let path = template.packet_path(
                packet.sequence(),
                packet.stream_index(),
                packet.timestamp(),
                packet.size(),
                packet.is_keyframe(),
            );
            on_entry(&DumpEntry::Packet {
                suffix: template.packet_suffix(
                    packet.sequence(),
                    packet.stream_index(),
                    packet.timestamp(),
                    packet.size(),
                    packet.is_keyframe(),
                ),
                path: path.clone(),
                packet: &packet,
            });

            if !self.options.dry_run {
                write_file(&path, packet.data())?;
                summary.files_written += 1;
            }

            summary.record(&packet);
            tracker.advance(packet.size());

            if self
                .options
                .max_packets
                .is_some_and(|limit| summary.packets >= limit)
            {
                summary.limit_reached = true;
                break;
            }
        }

        summary.read_error = packets.read_error().map(str::to_string);
        tracker.finish();

        log::debug!(
            "Dumped {} packets ({} bytes) from {}",
            summary.packets,
            summary.bytes,
            input.display()
        );

        Ok(summary)
    }
}

impl DumpSummary {
    fn record(&mut self, packet: &DemuxedPacket) {
        let size = packet.size() as u64;
        let tally = self.streams.entry(packet.stream_index()).or_default();
        tally.packets += 1;
        tally.bytes += size;
        self.packets += 1;
        self.bytes += size;
        if packet.is_keyframe() {
            tally.keyframes += 1;
            self.keyframes += 1;
        }
    }
}

/// Create (or truncate) `path` and write `data` to it.
fn write_file(path: &Path, data: &[u8]) -> Result<(), DumpError> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o644);
    }

    let write_error = |source| DumpError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut file = options.open(path).map_err(write_error)?;
    file.write_all(data).map_err(write_error)?;

    log::trace!("Wrote {} bytes to {}", data.len(), path.display());
    Ok(())
}
