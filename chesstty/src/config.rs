//! Configuration for ChessTTY runtime.
//!
//! Centralises all runtime tunables: the search worker executable and depth,
//! the log directory, and the animation and main-loop rates. Every value has a
//! compile-time default and can be overridden at runtime via a dedicated
//! environment variable. Command-line flags override both for a single run.

use std::path::PathBuf;

use engine::DEFAULT_SEARCH_DEPTH;

use crate::core::animation::{DEFAULT_FRAMES_PER_SQUARE, MAX_FRAMES_PER_SQUARE};

/// Name of the bundled search worker binary.
pub const SEARCH_WORKER_BIN: &str = "chesstty-search";

/// Default directory for the daily rolling log files.
const DEFAULT_LOG_DIR: &str = "logs";

/// Default animation frame rate.
const DEFAULT_ANIMATION_FPS: u32 = 60;

/// Default main loop rate.
const DEFAULT_MAX_FPS: u32 = 120;

/// Get the search worker executable.
///
/// Priority:
/// 1. `CHESSTTY_ENGINE_PATH` env variable if set
/// 2. `chesstty-search` next to the running executable
/// 3. `chesstty-search` on `PATH`
pub fn get_engine_path() -> PathBuf {
    if let Ok(path) = std::env::var("CHESSTTY_ENGINE_PATH") {
        return PathBuf::from(path);
    }

    resolve_sibling_binary(SEARCH_WORKER_BIN)
}

/// Get the search depth.
///
/// Priority:
/// 1. `CHESSTTY_SEARCH_DEPTH` env variable if set (falls back to default if
///    the value is not a positive `u8`)
/// 2. `3` as fallback
pub fn get_search_depth() -> u8 {
    parse_env("CHESSTTY_SEARCH_DEPTH")
        .filter(|depth| *depth > 0)
        .unwrap_or(DEFAULT_SEARCH_DEPTH)
}

/// Get the log directory.
///
/// Priority:
/// 1. `CHESSTTY_LOG_DIR` env variable if set
/// 2. `logs` (relative to the working directory) as fallback
pub fn get_log_dir() -> PathBuf {
    if let Ok(path) = std::env::var("CHESSTTY_LOG_DIR") {
        return PathBuf::from(path);
    }

    PathBuf::from(DEFAULT_LOG_DIR)
}

/// Get the number of animation frames per square moved.
///
/// Values outside `1..=MAX_FRAMES_PER_SQUARE` fall back to the default.
pub fn get_frames_per_square() -> u32 {
    frames_per_square_or_default(parse_env("CHESSTTY_FRAMES_PER_SQUARE"))
}

fn frames_per_square_or_default(value: Option<u32>) -> u32 {
    value
        .filter(|n| (1..=MAX_FRAMES_PER_SQUARE).contains(n))
        .unwrap_or(DEFAULT_FRAMES_PER_SQUARE)
}

/// Get the animation frame rate. Zero is ignored.
pub fn get_animation_fps() -> u32 {
    parse_env("CHESSTTY_ANIMATION_FPS")
        .filter(|fps| *fps > 0)
        .unwrap_or(DEFAULT_ANIMATION_FPS)
}

/// Get the main loop rate. Zero is ignored.
pub fn get_max_fps() -> u32 {
    parse_env("CHESSTTY_MAX_FPS")
        .filter(|fps| *fps > 0)
        .unwrap_or(DEFAULT_MAX_FPS)
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok()?.trim().parse().ok()
}

/// Resolve the path to a sibling binary distributed alongside this executable.
///
/// Falls back to `name` as-is, relying on `PATH` lookup, so that `cargo run`
/// workflows keep working when binaries are not co-located.
pub fn resolve_sibling_binary(name: &str) -> PathBuf {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            let candidate = dir.join(name);
            if candidate.exists() {
                return candidate;
            }
        }
    }

    PathBuf::from(name)
}
