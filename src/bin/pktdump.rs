use std::{fs, path::PathBuf, sync::Arc, thread, time::Duration};

use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use pktdump::{
    DumpEntry, DumpError, DumpOptions, DumpSummary, FfmpegLogLevel, PacketDumper,
    ProgressCallback, ProgressInfo,
};
use serde_json::json;

const CLI_AFTER_HELP: &str = "Each packet is dumped in its own file named like\n  $(basename file.ext)_$PKTNUM_$STREAMINDEX_$STAMP_$SIZE_$FLAGS.bin\n\nExamples:\n  pktdump input.mp4\n  pktdump -n input.mkv 100\n  pktdump --out-dir packets --progress input.ts\n  pktdump --completions zsh > _pktdump";

/// Pause between wake-ups while waiting at the end of a run.
const IDLE_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Parser)]
#[command(
    name = "pktdump",
    version,
    about = "Dump (up to max-packet-count) packets as they are demuxed by FFmpeg",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    /// Write no file at all, only demux.
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Wait at end of processing instead of quitting.
    #[arg(short = 'w', long)]
    wait: bool,

    /// Input media file.
    #[arg(required_unless_present = "completions")]
    input: Option<String>,

    /// Stop after this many packets (0 dumps everything).
    #[arg(default_value_t = 0)]
    max_packet_count: u64,

    /// Directory to write files into (created if missing).
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// FFmpeg log level (quiet, panic, fatal, error, warning, info, verbose, debug, trace).
    #[arg(long)]
    log_level: Option<String>,

    /// Show additional diagnostics on stderr.
    #[arg(long)]
    verbose: bool,

    /// Show a progress bar on stderr.
    #[arg(long)]
    progress: bool,

    /// Print a JSON summary instead of the per-file listing.
    #[arg(long)]
    json: bool,

    /// Print a shell completion script and exit.
    #[arg(long, value_enum, value_name = "SHELL")]
    completions: Option<Shell>,
}

struct TerminalProgress {
    bar: ProgressBar,
}

impl TerminalProgress {
    fn new(total: Option<u64>) -> Result<Self, Box<dyn std::error::Error>> {
        let bar = match total {
            Some(total) => {
                let bar = ProgressBar::new(total);
                bar.set_style(ProgressStyle::with_template(
                    "{bar:40.cyan/blue} {pos}/{len} packets {msg}",
                )?);
                bar
            }
            None => {
                let bar = ProgressBar::new_spinner();
                bar.set_style(ProgressStyle::with_template("{spinner} {pos} packets {msg}")?);
                bar
            }
        };
        Ok(Self { bar })
    }
}

impl ProgressCallback for TerminalProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        self.bar.set_position(info.current);
        self.bar.set_message(format!("({} bytes)", info.bytes_written));
    }
}

fn entry_line(entry: &DumpEntry<'_>) -> String {
    match entry {
        DumpEntry::Extradata { suffix, .. } | DumpEntry::Packet { suffix, .. } => suffix.clone(),
        DumpEntry::Template { description } => format!("FNTEMPLATE: '{description}'"),
    }
}

fn summary_json(input: &str, dry_run: bool, summary: &DumpSummary) -> serde_json::Value {
    let streams: Vec<_> = summary
        .streams
        .iter()
        .map(|(index, tally)| {
            json!({
                "stream_index": index,
                "packets": tally.packets,
                "bytes": tally.bytes,
                "keyframes": tally.keyframes,
            })
        })
        .collect();

    json!({
        "input": input,
        "format": summary.format,
        "stream_count": summary.stream_count,
        "dry_run": dry_run,
        "extradata_blobs": summary.extradata_blobs,
        "packets": summary.packets,
        "bytes": summary.bytes,
        "keyframes": summary.keyframes,
        "files_written": summary.files_written,
        "limit_reached": summary.limit_reached,
        "read_error": summary.read_error,
        "streams": streams,
    })
}

/// Errors caused by how the input was named; the usage line follows them.
fn wants_usage_hint(error: &(dyn std::error::Error + 'static)) -> bool {
    matches!(
        error.downcast_ref::<DumpError>(),
        Some(
            DumpError::PercentInFileName { .. }
                | DumpError::FileNameTooLong { .. }
                | DumpError::NonUtf8FileName { .. }
        )
    )
}

fn idle_forever() -> ! {
    loop {
        thread::sleep(IDLE_INTERVAL);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(shell) = cli.completions {
        let mut command = Cli::command();
        clap_complete::generate(shell, &mut command, "pktdump", &mut std::io::stdout());
        return Ok(());
    }

    let input = cli.input.ok_or("missing input file")?;

    if let Some(level) = &cli.log_level {
        pktdump::set_ffmpeg_log_level(level.parse::<FfmpegLogLevel>()?);
    }

    let mut options = DumpOptions::new()
        .with_dry_run(cli.dry_run)
        .with_max_packets(cli.max_packet_count);
    if let Some(directory) = &cli.out_dir {
        options = options.with_output_directory(directory.clone());
    }

    let progress = if cli.progress {
        let progress = Arc::new(TerminalProgress::new(options.max_packets())?);
        options = options
            .with_progress(progress.clone())
            .with_batch_size(16);
        Some(progress)
    } else {
        None
    };

    let dumper = PacketDumper::new(options);

    // Name problems must surface before the output directory is touched.
    let template = dumper.template_for(&input)?;
    if cli.verbose {
        eprintln!(
            "{} base name '{}'",
            "template".cyan().bold(),
            template.base_name()
        );
    }
    if let Some(directory) = template.output_directory() {
        if !cli.dry_run {
            fs::create_dir_all(directory)?;
        }
    }

    let summary = dumper.run(&input, |entry| {
        if cli.verbose {
            match entry {
                DumpEntry::Extradata { path, extradata, .. } => eprintln!(
                    "{} stream {} ({}) -> {}",
                    "extradata".cyan().bold(),
                    extradata.stream_index,
                    extradata.codec,
                    path.display()
                ),
                DumpEntry::Packet { path, .. } => {
                    eprintln!("{} {}", "packet".cyan().bold(), path.display())
                }
                DumpEntry::Template { .. } => {}
            }
        }
        if cli.json {
            return;
        }
        let line = entry_line(entry);
        match &progress {
            Some(progress) => progress.bar.suspend(|| println!("{line}")),
            None => println!("{line}"),
        }
    })?;

    if let Some(progress) = &progress {
        progress.bar.finish_and_clear();
    }

    if let Some(error) = &summary.read_error {
        eprintln!(
            "{} demuxing stopped early: {error}",
            "warning:".yellow().bold()
        );
    }

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary_json(&input, cli.dry_run, &summary))?
        );
    } else if cli.verbose {
        eprintln!(
            "{} {} packets, {} bytes, {} files written",
            "done".green().bold(),
            summary.packets,
            summary.bytes,
            summary.files_written
        );
    }

    if cli.wait {
        idle_forever();
    }

    Ok(())
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => {
            // Help and version go to stdout and are not failures.
            let code = if error.use_stderr() { 1 } else { 0 };
            let _ = error.print();
            std::process::exit(code);
        }
    };

    if let Err(error) = run(cli) {
        eprintln!("{} {error}", "error:".red().bold());
        if wants_usage_hint(&*error) {
            eprintln!("\n{}", Cli::command().render_usage());
        }
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Cli, entry_line, wants_usage_hint};
    use pktdump::{DumpEntry, DumpError};

    #[test]
    fn combined_short_flags() {
        let cli = Cli::try_parse_from(["pktdump", "-nw", "input.mp4"]).unwrap();
        assert!(cli.dry_run);
        assert!(cli.wait);
        assert_eq!(cli.input.as_deref(), Some("input.mp4"));
        assert_eq!(cli.max_packet_count, 0);
    }

    #[test]
    fn separate_short_flags_and_limit() {
        let cli = Cli::try_parse_from(["pktdump", "-n", "input.mp4", "25"]).unwrap();
        assert!(cli.dry_run);
        assert!(!cli.wait);
        assert_eq!(cli.max_packet_count, 25);
    }

    #[test]
    fn input_is_required() {
        assert!(Cli::try_parse_from(["pktdump", "-n"]).is_err());
    }

    #[test]
    fn non_numeric_limit_is_rejected() {
        assert!(Cli::try_parse_from(["pktdump", "input.mp4", "ten"]).is_err());
    }

    #[test]
    fn completions_do_not_need_input() {
        let cli = Cli::try_parse_from(["pktdump", "--completions", "bash"]).unwrap();
        assert!(cli.completions.is_some());
        assert!(cli.input.is_none());
    }

    #[test]
    fn template_line_format() {
        let entry = DumpEntry::Template {
            description: "clip_{seq:08}".to_string(),
        };
        assert_eq!(entry_line(&entry), "FNTEMPLATE: 'clip_{seq:08}'");
    }

    #[test]
    fn name_errors_get_a_usage_hint() {
        let percent = DumpError::PercentInFileName {
            base_name: "100%".to_string(),
        };
        let too_long = DumpError::FileNameTooLong {
            length: 5000,
            limit: pktdump::MAX_BASE_NAME_LENGTH,
        };
        assert!(wants_usage_hint(&percent));
        assert!(wants_usage_hint(&too_long));
    }

    #[test]
    fn runtime_errors_get_no_usage_hint() {
        let open = DumpError::FileOpen {
            path: "missing.mp4".into(),
            reason: "No such file or directory".to_string(),
        };
        let boxed: Box<dyn std::error::Error> = "missing input file".into();
        assert!(!wants_usage_hint(&open));
        assert!(!wants_usage_hint(&DumpError::Cancelled));
        assert!(!wants_usage_hint(&*boxed));
    }
}
