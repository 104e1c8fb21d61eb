//! Structured diagnostics emitted while parsing a deck.
//!
//! Parsers never log through a global; they receive a [`DiagnosticSink`] and
//! report every recoverable problem (dropped animation, unresolvable
//! relationship, failed slide) to it. [`TracingSink`] forwards to `tracing`,
//! [`CollectingSink`] buffers for callers that want to report warnings
//! alongside the result.
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
}

/// What kind of recoverable problem was met.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DiagnosticKind {
    /// A relationship id could not be resolved to a part
    UnresolvableRelationship,
    /// An animation behavior had no resolvable target and was skipped
    DroppedAnimation,
    /// A timing behavior the parser does not model
    UnsupportedBehavior,
    /// Slide content could not be parsed; a stub was recorded
    SlideParseFailure,
    /// The notes part of a slide could not be read; the slide kept no notes
    NotesUnreadable,
    /// Slide timing could not be parsed; an empty failed sequence was recorded
    AnimationParseFailure,
    /// A metadata part was missing or unreadable; defaults were used
    MetadataFallback,
    /// The deck deadline passed before the slide was started
    SlideTimedOut,
}

impl DiagnosticKind {
    /// Stable identifier used as a structured log field.
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticKind::UnresolvableRelationship => "unresolvable_relationship",
            DiagnosticKind::DroppedAnimation => "dropped_animation",
            DiagnosticKind::UnsupportedBehavior => "unsupported_behavior",
            DiagnosticKind::SlideParseFailure => "slide_parse_failure",
            DiagnosticKind::NotesUnreadable => "notes_unreadable",
            DiagnosticKind::AnimationParseFailure => "animation_parse_failure",
            DiagnosticKind::MetadataFallback => "metadata_fallback",
            DiagnosticKind::SlideTimedOut => "slide_timed_out",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single diagnostic event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    /// 1-based slide number, if the event belongs to a slide
    pub slide_number: Option<u32>,
    pub message: String,
}

impl Diagnostic {
    /// Create a warning-level diagnostic.
    pub fn warning(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            kind,
            slide_number: None,
            message: message.into(),
        }
    }

    /// Create a debug-level diagnostic.
    pub fn debug(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Debug,
            ..Self::warning(kind, message)
        }
    }

    /// Create an error-level diagnostic.
    pub fn error(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            ..Self::warning(kind, message)
        }
    }

    /// Attach the slide the event belongs to.
    #[inline]
    pub fn for_slide(mut self, slide_number: u32) -> Self {
        self.slide_number = Some(slide_number);
        self
    }
}

/// Receiver for parse diagnostics.
///
/// Implementations must be shareable across the per-slide workers.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to the `tracing` subscriber installed by the caller.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, d: Diagnostic) {
        let slide = d.slide_number.unwrap_or(0);
        let kind = d.kind.as_str();
        match d.severity {
            Severity::Debug => tracing::debug!(slide, kind, "{}", d.message),
            Severity::Info => tracing::info!(slide, kind, "{}", d.message),
            Severity::Warning => tracing::warn!(slide, kind, "{}", d.message),
            Severity::Error => tracing::error!(slide, kind, "{}", d.message),
        }
    }
}

/// Discards every diagnostic.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn emit(&self, _diagnostic: Diagnostic) {}
}

/// Buffers diagnostics in memory.
///
/// Events from parallel workers arrive in completion order; [`Self::sorted`]
/// gives a stable order by slide number.
#[derive(Debug, Default)]
pub struct CollectingSink {
    events: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events in arrival order.
    pub fn events(&self) -> Vec<Diagnostic> {
        self.events.lock().clone()
    }

    /// Snapshot ordered by slide number (deck-level events first).
    pub fn sorted(&self) -> Vec<Diagnostic> {
        let mut events = self.events();
        events.sort_by_key(|d| d.slide_number.unwrap_or(0));
        events
    }

    /// Events of one kind, in arrival order.
    pub fn of_kind(&self, kind: DiagnosticKind) -> Vec<Diagnostic> {
        self.events
            .lock()
            .iter()
            .filter(|d| d.kind == kind)
            .cloned()
            .collect()
    }

    /// Take all buffered events, leaving the sink empty.
    pub fn drain(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.events.lock())
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl DiagnosticSink for CollectingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        self.events.lock().push(diagnostic);
    }
}
