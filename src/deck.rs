//! Whole-deck parsing.
//!
//! [`DeckParser`] opens a `.pptx` buffer once and drives every per-slide stage
//! over the shared, read-only package:
//!
//! 1. resolve slide order from `presentation.xml`
//! 2. read deck metadata
//! 3. parse each slide's content and animations, optionally on the rayon pool
//! 4. join everything into a [`SceneTimeline`]
//!
//! Only a buffer that cannot be opened as a presentation fails the parse.
//! Individual slides that cannot be read come back as stubs with
//! `parse_error` set.
//!
//! # Example
//!
//! ```no_run
//! use slidetrack::{DeckParser, ParseOptions};
//!
//! let bytes = std::fs::read("deck.pptx")?;
//! let result = DeckParser::new(ParseOptions::default()).parse(&bytes)?;
//! for scene in &result.timeline.scenes {
//!     println!("slide {} at {}ms for {}ms", scene.slide_number, scene.start_ms, scene.duration_ms);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
use crate::common::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink, TracingSink};
use crate::ooxml::error::Result;
use crate::ooxml::metadata::{DeckMetadata, extract_metadata};
use crate::ooxml::opc::{OpcPackage, PackURI};
use crate::ooxml::pptx::animations::{AnimationSequence, parse_animations};
use crate::ooxml::pptx::presentation::{SlideSize, read_deck_structure};
use crate::ooxml::pptx::slide::{Slide, parse_slide};
use crate::options::ParseOptions;
use crate::timeline::{SceneTimeline, compute_timeline};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// Message carried by slides skipped because the deck deadline passed.
pub const TIMED_OUT_MESSAGE: &str = "deck parse timed out";

/// Everything extracted from one deck.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckParseResult {
    pub metadata: DeckMetadata,
    pub slide_size: Option<SlideSize>,
    pub slides: Vec<Slide>,
    /// One sequence per slide, in slide order
    pub animation_sequences: Vec<AnimationSequence>,
    pub timeline: SceneTimeline,
    pub success: bool,
    pub error: Option<String>,
}

impl DeckParseResult {
    /// Result for a buffer that could not be opened.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
            ..Self::default()
        }
    }

    /// Slides that came back as stubs.
    pub fn failed_slides(&self) -> impl Iterator<Item = &Slide> {
        self.slides.iter().filter(|s| s.is_failed())
    }
}

/// Parser for `.pptx` buffers.
#[derive(Clone)]
pub struct DeckParser {
    options: ParseOptions,
    sink: Arc<dyn DiagnosticSink>,
}

impl Default for DeckParser {
    fn default() -> Self {
        Self::new(ParseOptions::default())
    }
}

impl std::fmt::Debug for DeckParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeckParser")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl DeckParser {
    /// Create a parser that reports diagnostics through `tracing`.
    pub fn new(options: ParseOptions) -> Self {
        Self {
            options,
            sink: Arc::new(TracingSink),
        }
    }

    /// Route diagnostics to `sink` instead.
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    #[inline]
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse a deck.
    ///
    /// # Errors
    /// Fails only when the buffer is not a readable presentation package:
    /// not a ZIP, over the package limits, or missing/malformed
    /// `presentation.xml`.
    pub fn parse(&self, bytes: &[u8]) -> Result<DeckParseResult> {
        let started = Instant::now();
        let sink: &dyn DiagnosticSink = self.sink.as_ref();

        let package = OpcPackage::from_bytes(bytes, &self.options.limits)?;
        let presentation = package.main_document_uri()?;
        let structure = read_deck_structure(&package, &presentation, sink)?;

        let mut metadata = extract_metadata(&package, sink);
        metadata.slide_count = structure.slide_parts.len() as u32;

        let deadline = self.options.deck_timeout().map(|timeout| started + timeout);
        let parse_one = |(index, uri): (usize, &PackURI)| {
            self.parse_slide_at(&package, uri, index as u32 + 1, deadline)
        };

        let per_slide: Vec<(Slide, AnimationSequence)> = if self.options.parallel {
            structure.slide_parts.par_iter().enumerate().map(parse_one).collect()
        } else {
            structure.slide_parts.iter().enumerate().map(parse_one).collect()
        };
        let (slides, animation_sequences): (Vec<_>, Vec<_>) = per_slide.into_iter().unzip();

        let timeline = compute_timeline(&slides, &animation_sequences, &self.options.timeline);
        tracing::debug!(
            slides = slides.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "deck parsed"
        );

        Ok(DeckParseResult {
            metadata,
            slide_size: structure.slide_size,
            slides,
            animation_sequences,
            timeline,
            success: true,
            error: None,
        })
    }

    /// Parse a deck, folding a fatal error into the result.
    pub fn parse_or_report(&self, bytes: &[u8]) -> DeckParseResult {
        match self.parse(bytes) {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(error = %e, "deck could not be parsed");
                DeckParseResult::failed(e.to_string())
            },
        }
    }

    fn parse_slide_at(
        &self,
        package: &OpcPackage,
        uri: &PackURI,
        slide_number: u32,
        deadline: Option<Instant>,
    ) -> (Slide, AnimationSequence) {
        let sink: &dyn DiagnosticSink = self.sink.as_ref();

        if deadline.is_some_and(|d| Instant::now() >= d) {
            sink.emit(
                Diagnostic::error(DiagnosticKind::SlideTimedOut, format!("{} skipped: {}", uri, TIMED_OUT_MESSAGE))
                    .for_slide(slide_number),
            );
            return (
                Slide::failed(slide_number, uri, TIMED_OUT_MESSAGE),
                AnimationSequence::failed(slide_number, TIMED_OUT_MESSAGE),
            );
        }

        let slide = parse_slide(package, uri, slide_number, sink);
        let sequence = parse_animations(package, uri, slide_number, &self.options.animation, sink);
        (slide, sequence)
    }
}
