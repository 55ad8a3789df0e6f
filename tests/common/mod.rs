//! Shared helpers for integration tests.
//!
//! Inputs are synthesised as small PCM WAV files so the suite does not
//! depend on checked-in media. Tests that want a real video use
//! `tests/fixtures/sample_video.mp4` and skip when it is absent.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

pub const SAMPLE_RATE: u32 = 8_000;

pub fn sample_video_path() -> &'static str {
    "tests/fixtures/sample_video.mp4"
}

/// Deterministic 16-bit mono PCM payload of `seconds` seconds.
pub fn pcm_payload(seconds: u32) -> Vec<u8> {
    let samples = SAMPLE_RATE * seconds;
    (0..samples)
        .flat_map(|index| {
            let sample = ((index % 200) as i16 - 100) * 150;
            sample.to_le_bytes()
        })
        .collect()
}

/// Write a canonical 44-byte-header WAV file containing `payload`.
pub fn write_wav(path: &Path, payload: &[u8]) {
    write_wav_with_extradata(path, payload, &[]);
}

/// Write a PCM WAV whose `fmt ` chunk is a WAVEFORMATEX with `cbSize`
/// trailing bytes. FFmpeg's RIFF reader exposes those bytes as the
/// stream's extradata. An empty `extradata` gives the plain 16-byte chunk.
pub fn write_wav_with_extradata(path: &Path, payload: &[u8], extradata: &[u8]) {
    let channels: u16 = 1;
    let bits_per_sample: u16 = 16;
    let block_align = channels * bits_per_sample / 8;
    let byte_rate = SAMPLE_RATE * u32::from(block_align);
    let fmt_size = if extradata.is_empty() {
        16
    } else {
        18 + extradata.len() as u32
    };
    let riff_size = 4 + (8 + fmt_size) + (8 + payload.len() as u32);

    let mut bytes = Vec::with_capacity(8 + riff_size as usize);
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&riff_size.to_le_bytes());
    bytes.extend_from_slice(b"WAVE");
    bytes.extend_from_slice(b"fmt ");
    bytes.extend_from_slice(&fmt_size.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&channels.to_le_bytes());
    bytes.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
    bytes.extend_from_slice(&byte_rate.to_le_bytes());
    bytes.extend_from_slice(&block_align.to_le_bytes());
    bytes.extend_from_slice(&bits_per_sample.to_le_bytes());
    if !extradata.is_empty() {
        bytes.extend_from_slice(&(extradata.len() as u16).to_le_bytes());
        bytes.extend_from_slice(extradata);
    }
    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    bytes.extend_from_slice(payload);

    std::fs::write(path, bytes).expect("write wav input");
}

/// Create `<directory>/<name>` holding two seconds of PCM audio.
pub fn sample_wav(directory: &Path, name: &str) -> (PathBuf, Vec<u8>) {
    let path = directory.join(name);
    let payload = pcm_payload(2);
    write_wav(&path, &payload);
    (path, payload)
}

/// Extradata carried by [`sample_wav_with_extradata`]. Even length keeps
/// the `fmt ` chunk free of RIFF padding.
pub const SAMPLE_EXTRADATA: [u8; 6] = [0xDE, 0xAD, 0xBE, 0xEF, 0x01, 0x02];

/// Like [`sample_wav`], with [`SAMPLE_EXTRADATA`] attached to the stream.
pub fn sample_wav_with_extradata(directory: &Path, name: &str) -> (PathBuf, Vec<u8>) {
    let path = directory.join(name);
    let payload = pcm_payload(2);
    write_wav_with_extradata(&path, &payload, &SAMPLE_EXTRADATA);
    (path, payload)
}

/// Sorted names of the `.bin` files in `directory`.
pub fn dumped_files(directory: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(directory)
        .expect("read output directory")
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".bin"))
        .collect();
    names.sort();
    names
}
