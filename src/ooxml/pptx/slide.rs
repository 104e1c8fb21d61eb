//! Slide content parsing.
//!
//! A slide is read into its text blocks, title, speaker notes, layout, media
//! references, background and transition. Failures never propagate: a slide
//! that cannot be read becomes a stub carrying `parse_error`, so the rest of
//! the deck still parses.
use crate::common::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink};
use crate::ooxml::error::Result;
use crate::ooxml::opc::{OpcPackage, PackURI, Relationships};
use crate::ooxml::pptx::background::{SlideBackground, parse_background_xml};
use crate::ooxml::pptx::layout::{SlideLayout, resolve_layout};
use crate::ooxml::pptx::media::{ImageRef, MediaRef, resolve_clips_with, resolve_images_with};
use crate::ooxml::pptx::notes::read_notes;
use crate::ooxml::pptx::shape_tree::ShapeTree;
use crate::ooxml::pptx::transitions::{SlideTransition, parse_transition_xml};
use serde::{Deserialize, Serialize};

/// Normalized content of one slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    /// 1-based position in the deck
    pub slide_number: u32,
    pub title: String,
    /// Text blocks joined by `\n`
    pub content: String,
    pub notes: Option<String>,
    pub layout: SlideLayout,
    pub layout_name: Option<String>,
    pub images: Vec<ImageRef>,
    /// Video and audio clips
    pub media: Vec<MediaRef>,
    /// Background set on the slide itself; `None` when inherited
    pub background: Option<SlideBackground>,
    pub transition: Option<SlideTransition>,
    /// Partname of the slide, e.g. `/ppt/slides/slide3.xml`
    pub part_name: String,
    pub parse_error: Option<String>,
}

impl Slide {
    /// Stub recorded for a slide that could not be parsed.
    pub fn failed(slide_number: u32, part: &PackURI, message: impl Into<String>) -> Self {
        Self {
            slide_number,
            title: default_title(slide_number),
            content: String::new(),
            notes: None,
            layout: SlideLayout::Unknown,
            layout_name: None,
            images: Vec::new(),
            media: Vec::new(),
            background: None,
            transition: None,
            part_name: part.to_string(),
            parse_error: Some(message.into()),
        }
    }

    #[inline]
    pub fn is_failed(&self) -> bool {
        self.parse_error.is_some()
    }

    /// Whitespace-separated word count of the content.
    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }
}

#[inline]
fn default_title(slide_number: u32) -> String {
    format!("Slide {}", slide_number)
}

/// Parse one slide part. Errors become a [`Slide::failed`] stub plus a
/// `SlideParseFailure` diagnostic.
pub fn parse_slide(
    package: &OpcPackage,
    slide_uri: &PackURI,
    slide_number: u32,
    sink: &dyn DiagnosticSink,
) -> Slide {
    match try_parse_slide(package, slide_uri, slide_number, sink) {
        Ok(slide) => slide,
        Err(e) => {
            sink.emit(
                Diagnostic::error(DiagnosticKind::SlideParseFailure, format!("{}: {}", slide_uri, e))
                    .for_slide(slide_number),
            );
            Slide::failed(slide_number, slide_uri, e.to_string())
        },
    }
}

fn try_parse_slide(
    package: &OpcPackage,
    slide_uri: &PackURI,
    slide_number: u32,
    sink: &dyn DiagnosticSink,
) -> Result<Slide> {
    let xml = package.require_part(slide_uri)?;
    let tree = ShapeTree::parse(xml)?;

    let rels = package.relationships(slide_uri).unwrap_or_else(|e| {
        sink.emit(
            Diagnostic::warning(
                DiagnosticKind::UnresolvableRelationship,
                format!("relationships of {} unreadable: {}", slide_uri, e),
            )
            .for_slide(slide_number),
        );
        Relationships::new()
    });

    let blocks: Vec<String> = tree.block_texts().collect();
    let title = blocks
        .iter()
        .map(|b| b.trim())
        .find(|b| !b.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| default_title(slide_number));

    let notes = read_notes(package, slide_uri, &rels).unwrap_or_else(|e| {
        sink.emit(
            Diagnostic::warning(DiagnosticKind::NotesUnreadable, format!("notes unreadable: {}", e))
                .for_slide(slide_number),
        );
        None
    });

    let layout = resolve_layout(package, &rels, slide_number, sink);
    let images = resolve_images_with(package, &rels, slide_number, &tree.image_rids, sink);
    let media = resolve_clips_with(package, &rels, slide_number, &tree.clips, sink);
    let background = parse_background_xml(xml)?.map(|bg| bg.resolve(package, &rels, slide_number, sink));
    let transition = parse_transition_xml(xml)?;

    Ok(Slide {
        slide_number,
        title,
        content: blocks.join("\n"),
        notes,
        layout: layout.layout,
        layout_name: layout.name,
        images,
        media,
        background,
        transition,
        part_name: slide_uri.to_string(),
        parse_error: None,
    })
}
