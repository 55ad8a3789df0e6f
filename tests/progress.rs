//! CancellationToken and FFmpeg log level tests.

use pktdump::{CancellationToken, FfmpegLogLevel, UnknownLogLevel};

// ── CancellationToken ──────────────────────────────────────────────

#[test]
fn cancellation_token_default_not_cancelled() {
    assert!(!CancellationToken::new().is_cancelled());
    assert!(!CancellationToken::default().is_cancelled());
}

#[test]
fn cancellation_token_clone_shares_state() {
    let token = CancellationToken::new();
    let clone = token.clone();
    assert!(!clone.is_cancelled());

    token.cancel();
    assert!(clone.is_cancelled());
}

#[test]
fn cancellation_token_across_threads() {
    let token = CancellationToken::new();
    let remote = token.clone();
    std::thread::spawn(move || remote.cancel()).join().unwrap();
    assert!(token.is_cancelled());
}

// ── FfmpegLogLevel ─────────────────────────────────────────────────

#[test]
fn log_level_parses_names_case_insensitively() {
    assert_eq!("quiet".parse::<FfmpegLogLevel>(), Ok(FfmpegLogLevel::Quiet));
    assert_eq!("ERROR".parse::<FfmpegLogLevel>(), Ok(FfmpegLogLevel::Error));
    assert_eq!("warn".parse::<FfmpegLogLevel>(), Ok(FfmpegLogLevel::Warning));
    assert_eq!("Trace".parse::<FfmpegLogLevel>(), Ok(FfmpegLogLevel::Trace));
}

#[test]
fn log_level_rejects_unknown_names() {
    let error = "loud".parse::<FfmpegLogLevel>().unwrap_err();
    assert!(error.to_string().contains("unknown FFmpeg log level 'loud'"));
}

#[test]
fn unknown_log_level_is_a_std_error() {
    fn parse(value: &str) -> Result<FfmpegLogLevel, Box<dyn std::error::Error>> {
        Ok(value.parse::<FfmpegLogLevel>()?)
    }

    let error = parse("Loud").unwrap_err();
    let unknown = error.downcast_ref::<UnknownLogLevel>().expect("UnknownLogLevel");
    assert_eq!(unknown, &UnknownLogLevel("Loud".to_string()));
    assert!(error.source().is_none());
    assert_eq!(
        error.to_string(),
        "unknown FFmpeg log level 'Loud' (expected one of: quiet, panic, fatal, error, \
         warning, info, verbose, debug, trace)"
    );
}

#[test]
fn log_level_round_trips_through_ffmpeg() {
    pktdump::set_ffmpeg_log_level(FfmpegLogLevel::Fatal);
    assert_eq!(pktdump::get_ffmpeg_log_level(), Some(FfmpegLogLevel::Fatal));
    pktdump::set_ffmpeg_log_level(FfmpegLogLevel::Error);
}
