//! User-facing messages for each error kind.

use std::error::Error;
use std::fmt;

use crate::retry::ErrorKind;

/// A stable, localisable message shown to end users.
///
/// `key()` is the lookup key for translations; `Display` renders the
/// built-in English text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserMessage {
    RateLimited,
    NetworkTimeout,
    HostUnreachable,
    Network,
    Parse,
    Storage,
    Io,
    Unexpected,
}

impl UserMessage {
    pub fn key(self) -> &'static str {
        match self {
            UserMessage::RateLimited => "error.network.rate_limited",
            UserMessage::NetworkTimeout => "error.network.timeout",
            UserMessage::HostUnreachable => "error.network.host_unreachable",
            UserMessage::Network => "error.network",
            UserMessage::Parse => "error.parse",
            UserMessage::Storage => "error.storage",
            UserMessage::Io => "error.io",
            UserMessage::Unexpected => "error.unexpected",
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            UserMessage::RateLimited => "Rate limit exceeded. Please try again later.",
            UserMessage::NetworkTimeout => {
                "Network request timed out. Please check your connection."
            }
            UserMessage::HostUnreachable => {
                "Cannot reach server. Please check your internet connection."
            }
            UserMessage::Network => {
                "Network error occurred. Please check your internet connection."
            }
            UserMessage::Parse => {
                "Failed to parse data. The content may be malformed or in an unexpected format."
            }
            UserMessage::Storage => "Database error occurred. Please try restarting the app.",
            UserMessage::Io => {
                "File operation failed. Please check storage permissions and available space."
            }
            UserMessage::Unexpected => "An unexpected error occurred. Please try again.",
        }
    }
}

impl fmt::Display for UserMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Pick the message for `kind`. For `Network`, the cause text refines it:
/// rate limiting first, then timeouts, then host resolution.
pub fn user_facing_message(kind: ErrorKind, cause: Option<&str>) -> UserMessage {
    match kind {
        ErrorKind::Network => cause
            .map(str::to_lowercase)
            .and_then(|msg| refine_network(&msg))
            .unwrap_or(UserMessage::Network),
        ErrorKind::Parse => UserMessage::Parse,
        ErrorKind::Storage => UserMessage::Storage,
        ErrorKind::Io => UserMessage::Io,
        ErrorKind::Unknown => UserMessage::Unexpected,
    }
}

/// Same as `user_facing_message`, using the error's display text as the cause.
pub fn user_facing_message_for(
    kind: ErrorKind,
    cause: Option<&(dyn Error + 'static)>,
) -> UserMessage {
    let text = cause.map(|e| e.to_string());
    user_facing_message(kind, text.as_deref())
}

fn refine_network(msg: &str) -> Option<UserMessage> {
    if msg.contains("429") || msg.contains("too many requests") {
        Some(UserMessage::RateLimited)
    } else if msg.contains("timeout") || msg.contains("timed out") {
        Some(UserMessage::NetworkTimeout)
    } else if msg.contains("unknown host") || msg.contains("unable to resolve") {
        Some(UserMessage::HostUnreachable)
    } else {
        None
    }
}
