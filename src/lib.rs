//! Slidetrack - PowerPoint (.pptx) parsing for video composition
//!
//! This library turns a `.pptx` buffer into structured data: deck metadata,
//! per-slide content (title, text, notes, layout, image references), a
//! normalized animation model per slide, and a scene timeline that says when
//! each slide starts and how long it stays on screen.
//!
//! # Features
//!
//! - **OPC package reader**: bounded ZIP inflation and relationship resolution
//! - **Slide content**: text blocks, title, speaker notes, layout, images,
//!   video and audio clips, background and transition
//! - **Animation timelines**: the PowerPoint timing tree flattened into
//!   entrance/exit/emphasis/motion effects with a stable effect vocabulary
//! - **Failure isolation**: a corrupt slide becomes a stub, the deck still parses
//! - **Parallel parsing**: slides fan out over the rayon pool
//!
//! # Example - Parsing a deck
//!
//! ```no_run
//! use slidetrack::{DeckParser, ParseOptions};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bytes = std::fs::read("deck.pptx")?;
//! let result = DeckParser::new(ParseOptions::default()).parse(&bytes)?;
//!
//! println!("{} by {}", result.metadata.title, result.metadata.author);
//! for slide in &result.slides {
//!     println!("Slide {}: {}", slide.slide_number, slide.title);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Collecting diagnostics
//!
//! ```no_run
//! use std::sync::Arc;
//! use slidetrack::common::{CollectingSink, Severity};
//! use slidetrack::{DeckParser, ParseOptions};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let sink = Arc::new(CollectingSink::new());
//! let parser = DeckParser::new(ParseOptions::default()).with_sink(sink.clone());
//! let result = parser.parse(&std::fs::read("deck.pptx")?)?;
//!
//! for d in sink.sorted().iter().filter(|d| d.severity >= Severity::Warning) {
//!     eprintln!("slide {:?}: {}", d.slide_number, d.message);
//! }
//! # let _ = result;
//! # Ok(())
//! # }
//! ```

/// Diagnostics shared by every parsing stage
pub mod common;

/// Whole-deck orchestration
pub mod deck;

/// OOXML (Office Open XML) package and PresentationML parsing
pub mod ooxml;

/// Parse configuration
pub mod options;

/// Scene timeline computation
pub mod timeline;

#[cfg(test)]
mod test_support;

// Re-export commonly used types for convenience
pub use common::{CollectingSink, DiagnosticSink, NullSink, TracingSink};
pub use deck::{DeckParseResult, DeckParser};
pub use ooxml::metadata::DeckMetadata;
pub use ooxml::pptx::{
    AnimationNode, AnimationSequence, ImageRef, MediaRef, Slide, SlideBackground, SlideLayout, SlideTransition,
};
pub use ooxml::{OoxmlError, Result};
pub use options::ParseOptions;
pub use timeline::{Scene, SceneTimeline, TimelineOptions};
