//! Classify failures into retry policy error kinds.

use std::error::Error;
use std::io;

use super::kind::ErrorKind;
use crate::store::StoreError;

const STORAGE_PATTERNS: &[&str] = &["database", "sqlite", "constraint"];
const NETWORK_PATTERNS: &[&str] = &[
    "timeout",
    "timed out",
    "connection",
    "unknown host",
    "unable to resolve",
    "could not resolve",
    "dns",
    "429",
    "too many requests",
    "unreachable",
];
const PARSE_PATTERNS: &[&str] = &[
    "parse",
    "malformed",
    "invalid json",
    "unexpected token",
    "decode",
    "bencode",
];
const IO_PATTERNS: &[&str] = &[
    "permission denied",
    "no space",
    "disk full",
    "no such file",
    "read-only file system",
];

/// Classify a failure by walking its `source()` chain.
///
/// The first link with a recognised concrete type decides. When no link
/// is recognised, the display text of each link is matched against fixed
/// substring tables. Anything else is `Unknown`.
pub fn classify(err: &(dyn Error + 'static)) -> ErrorKind {
    let mut link = Some(err);
    while let Some(e) = link {
        if let Some(kind) = classify_typed(e) {
            return kind;
        }
        link = e.source();
    }

    let mut link = Some(err);
    while let Some(e) = link {
        let kind = classify_message(&e.to_string());
        if kind != ErrorKind::Unknown {
            return kind;
        }
        link = e.source();
    }
    ErrorKind::Unknown
}

/// Convenience for callers that hold an `anyhow::Error`.
pub fn classify_anyhow(err: &anyhow::Error) -> ErrorKind {
    classify(err.as_ref())
}

/// Classify free text (an error message without a typed cause).
pub fn classify_message(message: &str) -> ErrorKind {
    let lower = message.to_lowercase();
    let tables: [(&[&str], ErrorKind); 4] = [
        (STORAGE_PATTERNS, ErrorKind::Storage),
        (NETWORK_PATTERNS, ErrorKind::Network),
        (PARSE_PATTERNS, ErrorKind::Parse),
        (IO_PATTERNS, ErrorKind::Io),
    ];
    for (patterns, kind) in tables {
        if patterns.iter().any(|p| lower.contains(p)) {
            return kind;
        }
    }
    ErrorKind::Unknown
}

/// Classify an io error by its kind.
///
/// `Other`, `Interrupted` and `WouldBlock` say nothing about the failing
/// resource, so they are left to the message tables.
pub fn classify_io_error(e: &io::Error) -> Option<ErrorKind> {
    use io::ErrorKind as K;
    match e.kind() {
        K::ConnectionRefused
        | K::ConnectionReset
        | K::ConnectionAborted
        | K::NotConnected
        | K::NetworkUnreachable
        | K::HostUnreachable
        | K::NetworkDown
        | K::AddrInUse
        | K::AddrNotAvailable
        | K::TimedOut
        | K::BrokenPipe => Some(ErrorKind::Network),
        K::InvalidData | K::UnexpectedEof => Some(ErrorKind::Parse),
        K::Other | K::Interrupted | K::WouldBlock => None,
        _ => Some(ErrorKind::Io),
    }
}

fn classify_typed(e: &(dyn Error + 'static)) -> Option<ErrorKind> {
    if let Some(io_err) = e.downcast_ref::<io::Error>() {
        return classify_io_error(io_err);
    }
    if e.is::<sqlx::Error>() || e.is::<StoreError>() {
        return Some(ErrorKind::Storage);
    }
    if e.is::<serde_json::Error>()
        || e.is::<toml::de::Error>()
        || e.is::<std::num::ParseIntError>()
        || e.is::<std::num::ParseFloatError>()
        || e.is::<std::str::Utf8Error>()
        || e.is::<std::string::FromUtf8Error>()
    {
        return Some(ErrorKind::Parse);
    }
    None
}
