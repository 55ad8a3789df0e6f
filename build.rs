//! Windows FFmpeg discovery hints for `ffmpeg-sys-next`.
//!
//! Nothing is configured here; the script only warns when the environment
//! is unlikely to let `ffmpeg-sys-next` find the demuxer libraries.

use std::env;
use std::path::PathBuf;

fn warn(message: &str) {
    println!("cargo:warning=pktdump: {message}");
}

fn main() {
    println!("cargo:rerun-if-env-changed=FFMPEG_DIR");
    println!("cargo:rerun-if-env-changed=VCPKG_ROOT");
    println!("cargo:rerun-if-env-changed=VCPKGRS_DYNAMIC");
    println!("cargo:rerun-if-env-changed=VCPKGRS_TRIPLET");

    let is_windows = env::var("CARGO_CFG_TARGET_OS").is_ok_and(|os| os == "windows");
    if !is_windows || env::var_os("FFMPEG_DIR").is_some() {
        return;
    }

    let Ok(vcpkg_root) = env::var("VCPKG_ROOT") else {
        warn("FFMPEG_DIR is not set. Install FFmpeg via vcpkg and set VCPKG_ROOT + FFMPEG_DIR.");
        return;
    };

    let triplet = env::var("VCPKGRS_TRIPLET").unwrap_or_else(|_| "x64-windows".to_string());
    let candidate = PathBuf::from(vcpkg_root).join("installed").join(triplet);

    if !candidate.exists() {
        warn(&format!(
            "VCPKG_ROOT is set but no FFmpeg install was found at {}.",
            candidate.display()
        ));
        return;
    }

    warn(&format!(
        "found vcpkg FFmpeg at {0}; set FFMPEG_DIR={0} to make discovery explicit.",
        candidate.display()
    ));
    if env::var_os("VCPKGRS_DYNAMIC").is_none() {
        warn("set VCPKGRS_DYNAMIC=1 when linking a dynamic vcpkg FFmpeg build.");
    }
}
