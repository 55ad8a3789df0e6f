//! Dump configuration.
//!
//! [`DumpOptions`] is a builder that carries the run settings (dry run,
//! packet limit, output directory) together with progress callbacks and
//! cancellation tokens, so [`PacketDumper`](crate::PacketDumper) does not
//! need a long argument list.
//!
//! # Example
//!
//! ```
//! use pktdump::{CancellationToken, DumpOptions};
//!
//! let token = CancellationToken::new();
//! let options = DumpOptions::new()
//!     .with_dry_run(true)
//!     .with_max_packets(100)
//!     .with_output_directory("packets")
//!     .with_cancellation(token.clone());
//!
//! assert!(options.is_dry_run());
//! assert_eq!(options.max_packets(), Some(100));
//! ```

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::progress::{CancellationToken, NoOpProgress, ProgressCallback};

/// Settings for a dump run.
///
/// A default-constructed value writes every packet of the input to the
/// current working directory.
#[derive(Clone)]
pub struct DumpOptions {
    pub(crate) dry_run: bool,
    /// `None` means no limit.
    pub(crate) max_packets: Option<u64>,
    pub(crate) output_directory: Option<PathBuf>,
    pub(crate) progress: Arc<dyn ProgressCallback>,
    pub(crate) cancellation: Option<CancellationToken>,
    pub(crate) batch_size: u64,
}

impl Debug for DumpOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("DumpOptions")
            .field("dry_run", &self.dry_run)
            .field("max_packets", &self.max_packets)
            .field("output_directory", &self.output_directory)
            .field("has_cancellation", &self.cancellation.is_some())
            .field("batch_size", &self.batch_size)
            .finish()
    }
}

impl Default for DumpOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl DumpOptions {
    /// Create options with default settings.
    ///
    /// Defaults: files are written, no packet limit, working directory,
    /// no progress callback, no cancellation, batch size 1.
    pub fn new() -> Self {
        Self {
            dry_run: false,
            max_packets: None,
            output_directory: None,
            progress: Arc::new(NoOpProgress),
            cancellation: None,
            batch_size: 1,
        }
    }

    /// Demux and report file names without writing anything.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Stop after `count` packets. `0` removes the limit.
    #[must_use]
    pub fn with_max_packets(mut self, count: u64) -> Self {
        self.max_packets = (count > 0).then_some(count);
        self
    }

    /// Write output files into `directory`. The directory must exist.
    #[must_use]
    pub fn with_output_directory<P: Into<PathBuf>>(mut self, directory: P) -> Self {
        self.output_directory = Some(directory.into());
        self
    }

    /// Attach a progress callback.
    #[must_use]
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    /// Attach a cancellation token, checked before each packet read.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Fire the progress callback every `size` packets (minimum 1).
    #[must_use]
    pub fn with_batch_size(mut self, size: u64) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Whether this run only reports names.
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// The packet limit, if any.
    pub fn max_packets(&self) -> Option<u64> {
        self.max_packets
    }

    /// The configured output directory, if any.
    pub fn output_directory(&self) -> Option<&Path> {
        self.output_directory.as_deref()
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(|token| token.is_cancelled())
    }
}
