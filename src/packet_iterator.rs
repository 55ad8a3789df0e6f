//! Raw packet-level iteration.
//!
//! This module provides [`PacketIterator`] for reading the demuxed packets
//! of a media file in demux order, without decoding. Each yielded
//! [`DemuxedPacket`] owns its payload until it is dropped.
//!
//! # Example
//!
//! ```no_run
//! use pktdump::{DumpError, MediaSource};
//!
//! let mut source = MediaSource::open("input.mp4")?;
//! for packet in source.packets() {
//!     if packet.is_keyframe() {
//!         println!("keyframe #{} in stream {}", packet.sequence(), packet.stream_index());
//!     }
//! }
//! # Ok::<(), DumpError>(())
//! ```

use std::fmt::{Debug, Formatter, Result as FmtResult};

use ffmpeg_next::{Error as FfmpegError, Packet};
use ffmpeg_sys_next::AV_NOPTS_VALUE;

use crate::source::MediaSource;

/// One packet as returned by a single demuxer read.
pub struct DemuxedPacket {
    sequence: u64,
    packet: Packet,
}

impl DemuxedPacket {
    /// Zero-based position of this packet in the read order.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// The stream this packet belongs to.
    pub fn stream_index(&self) -> usize {
        self.packet.stream()
    }

    /// Presentation timestamp in stream time base, if the demuxer set one.
    pub fn pts(&self) -> Option<i64> {
        self.packet.pts()
    }

    /// Decoding timestamp in stream time base, if the demuxer set one.
    pub fn dts(&self) -> Option<i64> {
        self.packet.dts()
    }

    /// Presentation timestamp as used in file names.
    ///
    /// A missing PTS is reported as FFmpeg's `AV_NOPTS_VALUE`.
    pub fn timestamp(&self) -> i64 {
        self.pts().unwrap_or(AV_NOPTS_VALUE)
    }

    /// Payload size in bytes.
    pub fn size(&self) -> usize {
        self.packet.size()
    }

    /// Whether the demuxer flagged this packet as a keyframe.
    pub fn is_keyframe(&self) -> bool {
        self.packet.is_key()
    }

    /// The raw payload. Empty if the packet carries no data.
    pub fn data(&self) -> &[u8] {
        self.packet.data().unwrap_or(&[])
    }
}

impl Debug for DemuxedPacket {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("DemuxedPacket")
            .field("sequence", &self.sequence)
            .field("stream_index", &self.stream_index())
            .field("pts", &self.pts())
            .field("size", &self.size())
            .field("is_keyframe", &self.is_keyframe())
            .finish()
    }
}

/// A lazy iterator over demuxed packets.
///
/// The iterator ends at end of input. A read failure other than end of
/// input also ends it; the failure is logged and kept available through
/// [`read_error`](PacketIterator::read_error).
pub struct PacketIterator<'a> {
    source: &'a mut MediaSource,
    next_sequence: u64,
    read_error: Option<String>,
    done: bool,
}

impl<'a> PacketIterator<'a> {
    pub(crate) fn new(source: &'a mut MediaSource) -> Self {
        log::debug!("Creating PacketIterator for {}", source.path().display());
        Self {
            source,
            next_sequence: 0,
            read_error: None,
            done: false,
        }
    }

    /// The read error that ended iteration, if it did not end at end of input.
    pub fn read_error(&self) -> Option<&str> {
        self.read_error.as_deref()
    }

    /// Number of packets yielded so far.
    pub fn packets_read(&self) -> u64 {
        self.next_sequence
    }
}

impl Iterator for PacketIterator<'_> {
    type Item = DemuxedPacket;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut packet = Packet::empty();
        match packet.read(&mut self.source.input_context) {
            Ok(()) => {
                let sequence = self.next_sequence;
                self.next_sequence += 1;
                Some(DemuxedPacket { sequence, packet })
            }
            Err(FfmpegError::Eof) => {
                self.done = true;
                None
            }
            Err(error) => {
                log::warn!(
                    "Stopping demux of {} after {} packets: {error}",
                    self.source.path().display(),
                    self.next_sequence
                );
                self.read_error = Some(error.to_string());
                self.done = true;
                None
            }
        }
    }
}
