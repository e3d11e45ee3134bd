//! Closed set of failure categories shared by the classifier, the retry
//! policy, the message table, and the record store.

use std::fmt;
use std::str::FromStr;

/// High-level classification of a failure.
///
/// Adding a variant is a compile-time-checked change: the retry policy,
/// the user-facing message table, and the classifier all match on it
/// exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Transport or connectivity failure (DNS, refused, reset, timeout, throttled).
    Network,
    /// Malformed or undecodable content.
    Parse,
    /// Persistence-layer failure (database unavailable, constraint, pool).
    Storage,
    /// Filesystem failure (permissions, missing file, no space).
    Io,
    /// Anything the classifier does not recognise.
    Unknown,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 5] = [
        ErrorKind::Network,
        ErrorKind::Parse,
        ErrorKind::Storage,
        ErrorKind::Io,
        ErrorKind::Unknown,
    ];

    /// Stable name stored in the `kind` column.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Network => "NETWORK_ERROR",
            ErrorKind::Parse => "PARSE_ERROR",
            ErrorKind::Storage => "STORAGE_ERROR",
            ErrorKind::Io => "IO_ERROR",
            ErrorKind::Unknown => "UNKNOWN_ERROR",
        }
    }

    /// Older name still found in existing logs, if any.
    pub fn legacy_name(self) -> Option<&'static str> {
        match self {
            ErrorKind::Storage => Some("DATABASE_ERROR"),
            _ => None,
        }
    }

    /// Decode a stored name. Unrecognised values map to `Unknown`.
    pub fn from_stored(s: &str) -> Self {
        match s {
            "NETWORK_ERROR" => ErrorKind::Network,
            "PARSE_ERROR" => ErrorKind::Parse,
            "STORAGE_ERROR" | "DATABASE_ERROR" => ErrorKind::Storage,
            "IO_ERROR" => ErrorKind::Io,
            _ => ErrorKind::Unknown,
        }
    }

    /// Short lowercase name, used in log lines and CLI output.
    pub fn short_name(self) -> &'static str {
        match self {
            ErrorKind::Network => "network",
            ErrorKind::Parse => "parse",
            ErrorKind::Storage => "storage",
            ErrorKind::Io => "io",
            ErrorKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Error returned when parsing a kind name from user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKindName(pub String);

impl fmt::Display for UnknownKindName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown error kind '{}' (expected network, parse, storage, io or unknown)",
            self.0
        )
    }
}

impl std::error::Error for UnknownKindName {}

impl FromStr for ErrorKind {
    type Err = UnknownKindName;

    /// Accepts both the short names (`network`) and the stored names
    /// (`NETWORK_ERROR`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let kind = match lower.as_str() {
            "network" | "network_error" => ErrorKind::Network,
            "parse" | "parse_error" => ErrorKind::Parse,
            "storage" | "storage_error" | "database" | "database_error" => ErrorKind::Storage,
            "io" | "io_error" => ErrorKind::Io,
            "unknown" | "unknown_error" => ErrorKind::Unknown,
            _ => return Err(UnknownKindName(s.to_string())),
        };
        Ok(kind)
    }
}
