//! DumpOptions builder tests.

use std::path::Path;

use pktdump::{CancellationToken, DumpOptions};

#[test]
fn options_defaults() {
    let options = DumpOptions::new();
    assert!(!options.is_dry_run());
    assert_eq!(options.max_packets(), None);
    assert_eq!(options.output_directory(), None);

    let debug = format!("{options:?}");
    assert!(debug.contains("DumpOptions"));
    assert!(debug.contains("has_cancellation: false"));
    assert!(debug.contains("batch_size: 1"));
}

#[test]
fn options_with_max_packets() {
    let options = DumpOptions::new().with_max_packets(25);
    assert_eq!(options.max_packets(), Some(25));
}

#[test]
fn options_zero_max_packets_is_unlimited() {
    let options = DumpOptions::new().with_max_packets(25).with_max_packets(0);
    assert_eq!(options.max_packets(), None);
}

#[test]
fn options_with_output_directory() {
    let options = DumpOptions::new().with_output_directory("packets");
    assert_eq!(options.output_directory(), Some(Path::new("packets")));
}

#[test]
fn options_with_batch_size_clamps_zero() {
    let options = DumpOptions::new().with_batch_size(0);
    assert!(format!("{options:?}").contains("batch_size: 1"));
}

#[test]
fn options_with_cancellation() {
    let options = DumpOptions::new().with_cancellation(CancellationToken::new());
    assert!(format!("{options:?}").contains("has_cancellation: true"));
}

#[test]
fn options_builder_chaining() {
    let options = DumpOptions::new()
        .with_dry_run(true)
        .with_max_packets(10)
        .with_batch_size(4);
    assert!(options.is_dry_run());
    assert_eq!(options.max_packets(), Some(10));
    assert!(format!("{options:?}").contains("batch_size: 4"));
}
