//! # pktdump
//!
//! Dump every packet of a media file, exactly as the demuxer hands it out,
//! to its own file. Built on FFmpeg via the
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next) crate.
//!
//! Each packet file is named after the input and the packet's position,
//! stream, timestamp, size and keyframe flag:
//!
//! ```text
//! clip_extradata_00_000041.bin
//! clip_00000000_00_0000000000_004521_K.bin
//! clip_00000001_01_0000000000_000371_K.bin
//! ```
//!
//! Per-stream extradata (codec initialisation bytes such as H.264 SPS/PPS
//! or an AAC AudioSpecificConfig) is written once, before the packets.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pktdump::{DumpEntry, DumpOptions, PacketDumper};
//!
//! let options = DumpOptions::new()
//!     .with_max_packets(100)
//!     .with_output_directory("packets");
//! let summary = PacketDumper::new(options).run("input.mp4", |entry| {
//!     if let DumpEntry::Packet { path, .. } = entry {
//!         println!("{}", path.display());
//!     }
//! })?;
//! println!("{} packets written", summary.packets);
//! # Ok::<(), pktdump::DumpError>(())
//! ```
//!
//! Use [`MediaSource`] directly to inspect packets without writing files.
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed on your system.

pub mod configuration;
pub mod dumper;
pub mod error;
pub mod ffmpeg;
pub mod naming;
pub mod packet_iterator;
pub mod progress;
pub mod source;

pub use configuration::DumpOptions;
pub use dumper::{DumpEntry, DumpSummary, PacketDumper, StreamTally};
pub use error::DumpError;
pub use ffmpeg::{FfmpegLogLevel, UnknownLogLevel, get_ffmpeg_log_level, set_ffmpeg_log_level};
pub use naming::{FileNameTemplate, MAX_BASE_NAME_LENGTH};
pub use packet_iterator::{DemuxedPacket, PacketIterator};
pub use progress::{CancellationToken, ProgressCallback, ProgressInfo};
pub use source::{MediaSource, StreamExtradata};
