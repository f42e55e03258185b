//! Diagnostics channel configuration.
//!
//! The channel is set via the `BETAINV_DIAGNOSTICS` environment variable:
//! - `text` (default): one human-readable line per failure on stdout.
//! - `json`: one JSONL record per failure on stdout.
//! - `off`: failures are reported through the status code only.
//!
//! A hook registered with `betainv_set_diagnostic_hook` takes precedence
//! over all three.

use std::sync::atomic::{AtomicU8, Ordering};

/// Environment variable consulted on first use.
pub const DIAGNOSTICS_ENV: &str = "BETAINV_DIAGNOSTICS";

/// Where failure diagnostics go when no hook is registered.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticMode {
    /// `betainv: <symbol> failed: <message>` on stdout.
    #[default]
    Text,
    /// JSONL record on stdout.
    Json,
    /// No output.
    Off,
}

impl DiagnosticMode {
    /// Parse from string (case-insensitive). Unknown values map to `Text`.
    #[must_use]
    pub fn from_str_loose(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" | "jsonl" | "structured" => Self::Json,
            "off" | "quiet" | "none" => Self::Off,
            _ => Self::Text,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
            Self::Off => "off",
        }
    }

    /// Returns true if failures write to stdout.
    #[must_use]
    pub const fn writes_stdout(self) -> bool {
        !matches!(self, Self::Off)
    }
}

// 0 = unresolved, otherwise a cached mode.
static CACHED_MODE: AtomicU8 = AtomicU8::new(MODE_UNRESOLVED);

const MODE_UNRESOLVED: u8 = 0;
const MODE_TEXT: u8 = 1;
const MODE_JSON: u8 = 2;
const MODE_OFF: u8 = 3;

fn mode_to_u8(mode: DiagnosticMode) -> u8 {
    match mode {
        DiagnosticMode::Text => MODE_TEXT,
        DiagnosticMode::Json => MODE_JSON,
        DiagnosticMode::Off => MODE_OFF,
    }
}

fn u8_to_mode(v: u8) -> DiagnosticMode {
    match v {
        MODE_JSON => DiagnosticMode::Json,
        MODE_OFF => DiagnosticMode::Off,
        _ => DiagnosticMode::Text,
    }
}

/// Get the configured mode (reads the environment on first call, caches thereafter).
#[must_use]
pub fn diagnostic_mode() -> DiagnosticMode {
    let cached = CACHED_MODE.load(Ordering::Acquire);
    if cached != MODE_UNRESOLVED {
        return u8_to_mode(cached);
    }

    let mode = std::env::var(DIAGNOSTICS_ENV)
        .map(|v| DiagnosticMode::from_str_loose(&v))
        .unwrap_or_default();
    // Racing resolvers read the same environment; a programmatic override
    // that landed first wins.
    match CACHED_MODE.compare_exchange(
        MODE_UNRESOLVED,
        mode_to_u8(mode),
        Ordering::AcqRel,
        Ordering::Acquire,
    ) {
        Ok(_) => mode,
        Err(current) => u8_to_mode(current),
    }
}

/// Override the mode for the rest of the process, returning the previous one.
pub fn set_diagnostic_mode(mode: DiagnosticMode) -> DiagnosticMode {
    let previous = diagnostic_mode();
    CACHED_MODE.store(mode_to_u8(mode), Ordering::Release);
    previous
}
