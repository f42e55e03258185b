//! Failure diagnostics: stdout text, JSONL, or a caller-registered hook.

use std::ffi::{CString, c_char, c_int};
use std::io::Write;

use parking_lot::RwLock;
use serde::Serialize;

use crate::boundary::BoundaryFailure;
use crate::config::{DiagnosticMode, diagnostic_mode};

/// C callback receiving `(kind code, NUL-terminated message)` for each failure.
///
/// The message pointer is only valid for the duration of the call.
pub type DiagnosticHook = unsafe extern "C" fn(kind: c_int, message: *const c_char);

static HOOK: RwLock<Option<DiagnosticHook>> = parking_lot::const_rwlock(None);

/// Failure class as reported to hooks and in JSONL records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum DiagnosticKind {
    Domain = 1,
    Convergence = 2,
    Evaluation = 3,
    NullOutput = 4,
    Panic = 5,
}

impl DiagnosticKind {
    #[must_use]
    pub const fn code(self) -> c_int {
        self as c_int
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Domain => "domain",
            Self::Convergence => "convergence",
            Self::Evaluation => "evaluation",
            Self::NullOutput => "null_output",
            Self::Panic => "panic",
        }
    }
}

/// One JSONL diagnostic line.
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticRecord<'a> {
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    pub level: &'static str,
    pub event: &'static str,
    pub symbol: &'a str,
    pub kind: &'static str,
    pub message: &'a str,
    /// `[a, b, probability-or-x]`; non-finite values serialize as `null`.
    pub inputs: [f64; 3],
}

/// Install `hook` (or clear with `None`), returning the previous one.
pub fn set_hook(hook: Option<DiagnosticHook>) -> Option<DiagnosticHook> {
    std::mem::replace(&mut *HOOK.write(), hook)
}

pub(crate) fn emit(symbol: &'static str, inputs: [f64; 3], failure: &BoundaryFailure) {
    let kind = failure.kind();
    let message = failure.to_string();

    // Copy out so the hook runs without the lock held.
    let hook = *HOOK.read();
    if let Some(hook) = hook {
        let c_message = CString::new(message.replace('\0', " ")).unwrap_or_default();
        // SAFETY: the hook was registered by the caller as a valid C function;
        // `c_message` outlives the call.
        unsafe { hook(kind.code(), c_message.as_ptr()) };
        return;
    }

    let line = match diagnostic_mode() {
        DiagnosticMode::Off => return,
        DiagnosticMode::Text => render_text(symbol, &message),
        DiagnosticMode::Json => match render_json(symbol, kind, &message, inputs) {
            Ok(line) => line,
            Err(_) => render_text(symbol, &message),
        },
    };
    // Write failures are not reportable through the status code.
    let mut out = std::io::stdout().lock();
    let _ = writeln!(out, "{line}");
    let _ = out.flush();
}

pub(crate) fn render_text(symbol: &str, message: &str) -> String {
    format!("betainv: {symbol} failed: {message}")
}

pub(crate) fn render_json(
    symbol: &str,
    kind: DiagnosticKind,
    message: &str,
    inputs: [f64; 3],
) -> Result<String, serde_json::Error> {
    serde_json::to_string(&DiagnosticRecord {
        timestamp: now_unix_ms(),
        level: "error",
        event: "boundary_failure",
        symbol,
        kind: kind.as_str(),
        message,
        inputs,
    })
}

fn now_unix_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
