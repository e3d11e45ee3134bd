//! `ErrorReport`: what a caller hands to `Reporter::report`.

use std::error::Error;
use std::fmt::Write;

use crate::retry::{classify, classify_message, ErrorKind};
use crate::store::{NewErrorRecord, RecordContext};

/// Source label used when a caller passes an empty one.
pub const UNSPECIFIED_SOURCE: &str = "unspecified";

/// A failure to be recorded. Built with `ErrorReport::new` and the
/// chained setters; the kind is classified from the cause (or message)
/// when not given.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    source: String,
    message: String,
    kind: Option<ErrorKind>,
    cause: Option<Cause>,
    retry_count: u32,
    context: Option<RecordContext>,
}

#[derive(Debug, Clone)]
struct Cause {
    kind: ErrorKind,
    text: String,
    trace: String,
}

impl ErrorReport {
    pub fn new(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            message: message.into(),
            kind: None,
            cause: None,
            retry_count: 0,
            context: None,
        }
    }

    /// Report a raw error: message is its display text, kind is classified.
    pub fn from_error(source: impl Into<String>, err: &(dyn Error + 'static)) -> Self {
        Self::new(source, err.to_string()).cause(err)
    }

    pub fn kind(mut self, kind: ErrorKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Attach the underlying failure. Its cause chain becomes the trace.
    pub fn cause(mut self, err: &(dyn Error + 'static)) -> Self {
        self.cause = Some(Cause {
            kind: classify(err),
            text: err.to_string(),
            trace: format_trace(err),
        });
        self
    }

    pub fn cause_anyhow(self, err: &anyhow::Error) -> Self {
        self.cause(err.as_ref())
    }

    pub fn retry_count(mut self, retry_count: u32) -> Self {
        self.retry_count = retry_count;
        self
    }

    pub fn context(mut self, context: RecordContext) -> Self {
        self.context = Some(context);
        self
    }

    pub fn context_field(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.context
            .get_or_insert_with(RecordContext::new)
            .insert(key.into(), value.into());
        self
    }

    /// Kind this report will be recorded under.
    pub fn resolved_kind(&self) -> ErrorKind {
        if let Some(kind) = self.kind {
            return kind;
        }
        match &self.cause {
            Some(cause) if cause.kind != ErrorKind::Unknown => cause.kind,
            _ => classify_message(&self.message),
        }
    }

    /// Display text of the attached cause, if any.
    pub fn cause_text(&self) -> Option<&str> {
        self.cause.as_ref().map(|c| c.text.as_str())
    }

    pub(crate) fn into_record(self, timestamp: i64) -> NewErrorRecord {
        let kind = self.resolved_kind();
        let message = match self.message.trim() {
            "" => match &self.cause {
                Some(cause) if !cause.text.trim().is_empty() => cause.text.trim().to_string(),
                _ => kind.as_str().to_string(),
            },
            trimmed => trimmed.to_string(),
        };
        let source = match self.source.trim() {
            "" => UNSPECIFIED_SOURCE.to_string(),
            trimmed => trimmed.to_string(),
        };

        NewErrorRecord {
            kind,
            message,
            trace: self.cause.map(|c| c.trace),
            source,
            timestamp,
            retry_count: self.retry_count,
            context: self.context,
        }
    }
}

/// Render an error and its `source()` chain:
///
/// ```text
/// top-level message
///
/// Caused by:
///     0: first source
///     1: second source
/// ```
pub fn format_trace(err: &(dyn Error + 'static)) -> String {
    let mut out = err.to_string();
    let mut link = err.source();
    if link.is_some() {
        out.push_str("\n\nCaused by:");
    }
    let mut depth = 0usize;
    while let Some(e) = link {
        let _ = write!(out, "\n    {depth}: {e}");
        depth += 1;
        link = e.source();
    }
    out
}
