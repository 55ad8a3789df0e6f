//! Benchmarks for file-name rendering and dry-run demuxing.
//!
//! Run with: cargo bench
//!
//! The demux benchmark uses `tests/fixtures/sample_video.mp4` and is
//! skipped when the fixture is absent.

use std::{hint::black_box, path::Path};

use criterion::Criterion;
use pktdump::{DumpOptions, FfmpegLogLevel, FileNameTemplate, PacketDumper};

const SAMPLE_VIDEO: &str = "tests/fixtures/sample_video.mp4";

fn benchmark_name_rendering(criterion: &mut Criterion) {
    let template = FileNameTemplate::from_input("media/recording.mkv")
        .unwrap()
        .with_output_directory("packets");

    criterion.bench_function("render packet suffix", |bencher| {
        bencher.iter(|| {
            template.packet_suffix(
                black_box(123_456),
                black_box(1),
                black_box(90_000),
                black_box(4096),
                black_box(true),
            )
        });
    });

    criterion.bench_function("render packet path", |bencher| {
        bencher.iter(|| {
            template.packet_path(
                black_box(123_456),
                black_box(1),
                black_box(-3003),
                black_box(512),
                black_box(false),
            )
        });
    });

    criterion.bench_function("derive template from input", |bencher| {
        bencher.iter(|| FileNameTemplate::from_input(black_box("/a/b/c/clip.v2.ts")).unwrap());
    });
}

fn benchmark_dry_run(criterion: &mut Criterion) {
    if !Path::new(SAMPLE_VIDEO).exists() {
        eprintln!("Skipping benchmark: fixture not found");
        return;
    }
    pktdump::set_ffmpeg_log_level(FfmpegLogLevel::Error);

    let dumper = PacketDumper::new(DumpOptions::new().with_dry_run(true));
    criterion.bench_function("dry-run demux of sample video", |bencher| {
        bencher.iter(|| dumper.run(SAMPLE_VIDEO, |_| {}).unwrap());
    });
}

criterion::criterion_group!(benches, benchmark_name_rendering, benchmark_dry_run);
criterion::criterion_main!(benches);
