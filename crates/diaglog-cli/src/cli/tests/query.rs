//! Tests for recent, show, count, policy and message.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;
use diaglog_core::retry::ErrorKind;

#[test]
fn cli_parse_recent_defaults() {
    match parse(&["diaglog", "recent"]) {
        CliCommand::Recent {
            limit,
            source,
            kind,
        } => {
            assert_eq!(limit, 20);
            assert!(source.is_none());
            assert!(kind.is_none());
        }
        _ => panic!("expected Recent"),
    }
}

#[test]
fn cli_parse_recent_by_source() {
    match parse(&["diaglog", "recent", "--limit", "5", "--source", "FeedDownload"]) {
        CliCommand::Recent {
            limit,
            source,
            kind,
        } => {
            assert_eq!(limit, 5);
            assert_eq!(source.as_deref(), Some("FeedDownload"));
            assert!(kind.is_none());
        }
        _ => panic!("expected Recent with --source"),
    }
}

#[test]
fn cli_parse_recent_by_kind() {
    match parse(&["diaglog", "recent", "--kind", "network"]) {
        CliCommand::Recent { kind, .. } => assert_eq!(kind, Some(ErrorKind::Network)),
        _ => panic!("expected Recent with --kind"),
    }
}

#[test]
fn cli_rejects_source_and_kind_together() {
    let res = Cli::try_parse_from(["diaglog", "recent", "--source", "A", "--kind", "io"]);
    assert!(res.is_err());
}

#[test]
fn cli_rejects_unknown_kind() {
    let res = Cli::try_parse_from(["diaglog", "recent", "--kind", "tracker"]);
    assert!(res.is_err());
}

#[test]
fn cli_parse_show() {
    match parse(&["diaglog", "show", "42"]) {
        CliCommand::Show { id } => assert_eq!(id, 42),
        _ => panic!("expected Show"),
    }
}

#[test]
fn cli_parse_count() {
    match parse(&["diaglog", "count"]) {
        CliCommand::Count => {}
        _ => panic!("expected Count"),
    }
}

#[test]
fn cli_parse_policy() {
    match parse(&[
        "diaglog",
        "policy",
        "--kind",
        "IO_ERROR",
        "--retry-count",
        "1",
        "--max-retries",
        "5",
    ]) {
        CliCommand::Policy {
            kind,
            retry_count,
            max_retries,
        } => {
            assert_eq!(kind, ErrorKind::Io);
            assert_eq!(retry_count, 1);
            assert_eq!(max_retries, Some(5));
        }
        _ => panic!("expected Policy"),
    }
}

#[test]
fn cli_parse_message() {
    match parse(&["diaglog", "message", "--kind", "network", "--cause", "429", "--key"]) {
        CliCommand::Message { kind, cause, key } => {
            assert_eq!(kind, ErrorKind::Network);
            assert_eq!(cause.as_deref(), Some("429"));
            assert!(key);
        }
        _ => panic!("expected Message"),
    }
}
