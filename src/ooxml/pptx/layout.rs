//! Slide layout classification.
use crate::common::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink};
use crate::ooxml::error::Result;
use crate::ooxml::opc::constants::relationship_type;
use crate::ooxml::opc::{OpcPackage, Relationships};
use crate::ooxml::xml::attr;
use quick_xml::Reader;
use quick_xml::events::Event;
use serde::{Deserialize, Serialize};

/// Normalized layout of a slide, derived from its layout part's `type`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum SlideLayout {
    /// `title`
    Title,
    /// `obj`, `tx`
    TitleAndContent,
    /// `secHead`
    SectionHeader,
    /// `twoObj`, `twoColTx`
    TwoContent,
    /// `twoTxTwoObj`
    Comparison,
    /// `titleOnly`
    TitleOnly,
    /// `blank`
    Blank,
    /// `objTx`
    ContentWithCaption,
    /// `picTx`
    PictureWithCaption,
    /// Any other layout type, kept verbatim
    Other(String),
    /// The slide has no layout relationship
    #[default]
    Unknown,
}

impl SlideLayout {
    /// Map an `ST_SlideLayoutType` value.
    pub fn from_type(kind: &str) -> Self {
        match kind {
            "title" => SlideLayout::Title,
            "obj" | "tx" => SlideLayout::TitleAndContent,
            "secHead" => SlideLayout::SectionHeader,
            "twoObj" | "twoColTx" => SlideLayout::TwoContent,
            "twoTxTwoObj" => SlideLayout::Comparison,
            "titleOnly" => SlideLayout::TitleOnly,
            "blank" => SlideLayout::Blank,
            "objTx" => SlideLayout::ContentWithCaption,
            "picTx" => SlideLayout::PictureWithCaption,
            other => SlideLayout::Other(other.to_string()),
        }
    }
}

/// Layout of a slide plus the layout's display name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LayoutInfo {
    pub layout: SlideLayout,
    pub name: Option<String>,
}

/// Resolve a slide's layout through its `slideLayout` relationship.
///
/// No relationship gives `Unknown`. A relationship whose part is missing or
/// unreadable also gives `Unknown`, with a diagnostic; the slide itself is not
/// failed for it.
pub fn resolve_layout(
    package: &OpcPackage,
    rels: &Relationships,
    slide_number: u32,
    sink: &dyn DiagnosticSink,
) -> LayoutInfo {
    let Some(rel) = rels.first_of_type(relationship_type::SLIDE_LAYOUT) else {
        return LayoutInfo::default();
    };

    let xml = match rel.target_partname() {
        Ok(uri) => package.part(&uri),
        Err(_) => None,
    };
    let Some(xml) = xml else {
        sink.emit(
            Diagnostic::warning(
                DiagnosticKind::UnresolvableRelationship,
                format!("layout relationship {} -> {} not found", rel.r_id(), rel.target_ref()),
            )
            .for_slide(slide_number),
        );
        return LayoutInfo::default();
    };

    match parse_layout_xml(xml) {
        Ok(info) => info,
        Err(e) => {
            sink.emit(
                Diagnostic::warning(DiagnosticKind::UnresolvableRelationship, format!("layout part unreadable: {}", e))
                    .for_slide(slide_number),
            );
            LayoutInfo::default()
        },
    }
}

/// Read `p:sldLayout/@type` and `p:cSld/@name` from a layout part.
///
/// A layout without `type` is a custom layout (`cust`).
pub fn parse_layout_xml(xml: &[u8]) -> Result<LayoutInfo> {
    let mut reader = Reader::from_reader(xml);
    let mut info = LayoutInfo {
        layout: SlideLayout::from_type("cust"),
        name: None,
    };

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => match e.local_name().as_ref() {
                b"sldLayout" => {
                    if let Some(kind) = attr(&e, b"type")? {
                        info.layout = SlideLayout::from_type(&kind);
                    }
                },
                b"cSld" => {
                    info.name = attr(&e, b"name")?.filter(|n| !n.is_empty());
                    break;
                },
                _ => {},
            },
            Event::Eof => break,
            _ => {},
        }
    }

    Ok(info)
}
