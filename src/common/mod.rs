//! Common types shared across the package and presentation layers.
pub mod diagnostics;

pub use diagnostics::{
    CollectingSink, Diagnostic, DiagnosticKind, DiagnosticSink, NullSink, Severity, TracingSink,
};
