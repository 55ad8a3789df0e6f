//! Output file naming.
//!
//! Every dumped packet lands in a file whose name encodes where it came
//! from:
//!
//! ```text
//! <base>_<seq:08>_<stream:02>_<pts:010>_<size:06>_<K|_>.bin
//! <base>_extradata_<stream:02>_<length:06>.bin
//! ```
//!
//! `<base>` is the input's file name without directory and without its
//! last extension. Numbers are zero padded to the given minimum width and
//! grow past it when larger.
//!
//! # Example
//!
//! ```
//! use pktdump::FileNameTemplate;
//!
//! let template = FileNameTemplate::from_input("media/clip.mkv")?;
//! assert_eq!(template.base_name(), "clip");
//! assert_eq!(
//!     template.packet_suffix(3, 1, 9000, 1234, true),
//!     "_00000003_01_0000009000_001234_K.bin",
//! );
//! # Ok::<(), pktdump::DumpError>(())
//! ```

use std::path::{Path, PathBuf};

use crate::error::DumpError;

/// Size of the file-name buffer the naming scheme is designed around.
const FILE_NAME_BUFFER_SIZE: usize = 4096;

/// Bytes reserved for the packet suffix template (including terminator).
const PACKET_SUFFIX_RESERVE: usize = 31;

/// Longest base name accepted by [`FileNameTemplate::from_input`].
pub const MAX_BASE_NAME_LENGTH: usize = FILE_NAME_BUFFER_SIZE - 2 - PACKET_SUFFIX_RESERVE;

fn keyframe_flag(is_keyframe: bool) -> char {
    if is_keyframe { 'K' } else { '_' }
}

/// Derives output file names from an input path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNameTemplate {
    base_name: String,
    output_directory: Option<PathBuf>,
}

impl FileNameTemplate {
    /// Build a template from the input file path.
    ///
    /// The base name is everything after the last `/` with the last `.`
    /// and whatever follows it removed. No filesystem access happens here.
    ///
    /// # Errors
    ///
    /// Returns [`DumpError::NonUtf8FileName`] if the path is not valid
    /// UTF-8, [`DumpError::PercentInFileName`] if the base name contains a
    /// `%`, or [`DumpError::FileNameTooLong`] if it is longer than
    /// [`MAX_BASE_NAME_LENGTH`].
    pub fn from_input<P: AsRef<Path>>(input: P) -> Result<Self, DumpError> {
        let path = input.as_ref();
        let input = path.to_str().ok_or_else(|| DumpError::NonUtf8FileName {
            path: path.to_path_buf(),
        })?;
        let base_name = derive_base_name(input);

        if base_name.contains('%') {
            return Err(DumpError::PercentInFileName {
                base_name: base_name.to_string(),
            });
        }
        if base_name.len() > MAX_BASE_NAME_LENGTH {
            return Err(DumpError::FileNameTooLong {
                length: base_name.len(),
                limit: MAX_BASE_NAME_LENGTH,
            });
        }

        Ok(Self {
            base_name: base_name.to_string(),
            output_directory: None,
        })
    }

    /// Place output files in `directory` instead of the working directory.
    #[must_use]
    pub fn with_output_directory<P: Into<PathBuf>>(mut self, directory: P) -> Self {
        self.output_directory = Some(directory.into());
        self
    }

    /// The base name shared by every output file.
    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    /// The directory output files are written to, if not the working one.
    pub fn output_directory(&self) -> Option<&Path> {
        self.output_directory.as_deref()
    }

    /// Suffix identifying one packet, e.g. `_00000000_00_0000000000_000512_K.bin`.
    pub fn packet_suffix(
        &self,
        sequence: u64,
        stream_index: usize,
        timestamp: i64,
        size: usize,
        is_keyframe: bool,
    ) -> String {
        format!(
            "_{sequence:08}_{stream_index:02}_{timestamp:010}_{size:06}_{}.bin",
            keyframe_flag(is_keyframe)
        )
    }

    /// Suffix identifying one stream's extradata, e.g. `_extradata_01_000042.bin`.
    pub fn extradata_suffix(&self, stream_index: usize, length: usize) -> String {
        format!("_extradata_{stream_index:02}_{length:06}.bin")
    }

    /// Full output path for one packet.
    pub fn packet_path(
        &self,
        sequence: u64,
        stream_index: usize,
        timestamp: i64,
        size: usize,
        is_keyframe: bool,
    ) -> PathBuf {
        self.resolve(&self.packet_suffix(sequence, stream_index, timestamp, size, is_keyframe))
    }

    /// Full output path for one stream's extradata.
    pub fn extradata_path(&self, stream_index: usize, length: usize) -> PathBuf {
        self.resolve(&self.extradata_suffix(stream_index, length))
    }

    /// Human-readable form of the packet file-name template.
    pub fn describe(&self) -> String {
        let file_name = format!(
            "{}_{{seq:08}}_{{stream:02}}_{{pts:010}}_{{size:06}}_{{K|_}}.bin",
            self.base_name
        );
        match &self.output_directory {
            Some(directory) => directory.join(file_name).display().to_string(),
            None => file_name,
        }
    }

    fn resolve(&self, suffix: &str) -> PathBuf {
        let file_name = format!("{}{suffix}", self.base_name);
        match &self.output_directory {
            Some(directory) => directory.join(file_name),
            None => PathBuf::from(file_name),
        }
    }
}

/// Strip everything up to the last `/` and from the last `.` onwards.
fn derive_base_name(input: &str) -> &str {
    let file_name = match input.rfind('/') {
        Some(slash) => &input[slash + 1..],
        None => input,
    };
    match file_name.rfind('.') {
        Some(dot) => &file_name[..dot],
        None => file_name,
    }
}
