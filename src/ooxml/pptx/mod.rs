//! PowerPoint (.pptx) presentation support.
//!
//! This module reads the parts of a presentation package that matter for
//! video composition:
//!
//! - `presentation`: slide order and slide size from `presentation.xml`
//! - `slide`: per-slide text, title, notes, layout and media references
//! - `animations`: the per-slide timing tree, normalized
//! - `media`: image and clip relationship resolution, payload access
//! - `background`, `transitions`: how a slide looks behind its shapes and how
//!   it enters the show
//!
//! Every per-slide entry point takes the shared, immutable [`OpcPackage`]
//! and a [`DiagnosticSink`], and turns its own failures into data rather
//! than errors.
//!
//! [`OpcPackage`]: crate::ooxml::opc::OpcPackage
//! [`DiagnosticSink`]: crate::common::DiagnosticSink
pub mod animations;
pub mod background;
pub mod layout;
pub mod media;
pub mod notes;
pub mod presentation;
pub mod shape_tree;
pub mod slide;
pub mod transitions;

pub use animations::{AnimationNode, AnimationOptions, AnimationSequence, parse_animations};
pub use background::{GradientStop, SlideBackground};
pub use layout::SlideLayout;
pub use media::{
    ImageRef, MediaKind, MediaPayload, MediaRef, collect_images, media_payloads, resolve_clips_with,
    resolve_images,
};
pub use presentation::{DeckStructure, SlideSize, read_deck_structure, slide_part_uris};
pub use slide::{Slide, parse_slide};
pub use transitions::{SlideTransition, TransitionKind, TransitionSpeed};
