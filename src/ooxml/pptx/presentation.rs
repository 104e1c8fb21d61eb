/// Deck structure: which slide parts make up the deck, and in what order.
///
/// Slide order is the document order of `p:sldIdLst/p:sldId` in the
/// presentation part, resolved through `presentation.xml.rels`. Slide
/// filenames carry no ordering meaning.
use crate::common::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink};
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::{OpcPackage, PackURI};
use crate::ooxml::xml::{attr, prefixed_attr};
use quick_xml::Reader;
use quick_xml::events::Event;
use serde::{Deserialize, Serialize};

/// Slide dimensions in EMU (914400 per inch).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideSize {
    pub cx: i64,
    pub cy: i64,
}

impl SlideSize {
    /// Width over height.
    pub fn aspect_ratio(&self) -> f64 {
        if self.cy == 0 {
            0.0
        } else {
            self.cx as f64 / self.cy as f64
        }
    }
}

/// Ordered slide parts plus deck-wide properties of the presentation part.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeckStructure {
    pub slide_parts: Vec<PackURI>,
    pub slide_size: Option<SlideSize>,
}

/// Ordered slide partnames of a presentation.
pub fn slide_part_uris(
    package: &OpcPackage,
    presentation_uri: &PackURI,
    sink: &dyn DiagnosticSink,
) -> Result<Vec<PackURI>> {
    Ok(read_deck_structure(package, presentation_uri, sink)?.slide_parts)
}

/// Read the presentation part and resolve its slide list.
///
/// # Errors
/// `PartNotFound` when the presentation part is absent, `Xml` when it is
/// malformed. Both mean the buffer is not a usable presentation.
pub fn read_deck_structure(
    package: &OpcPackage,
    presentation_uri: &PackURI,
    sink: &dyn DiagnosticSink,
) -> Result<DeckStructure> {
    let xml = package
        .part(presentation_uri)
        .ok_or_else(|| OoxmlError::PartNotFound(presentation_uri.to_string()))?;
    let (slide_rids, slide_size) = parse_presentation_xml(xml)?;
    let rels = package.relationships(presentation_uri)?;

    let mut slide_parts = Vec::with_capacity(slide_rids.len());
    for r_id in slide_rids {
        let resolved = rels
            .get(&r_id)
            .ok_or_else(|| format!("slide relationship {} not declared", r_id))
            .and_then(|rel| rel.target_partname().map_err(|e| e.to_string()));
        match resolved {
            Ok(uri) => slide_parts.push(uri),
            Err(reason) => sink.emit(Diagnostic::warning(DiagnosticKind::UnresolvableRelationship, reason)),
        }
    }

    Ok(DeckStructure {
        slide_parts,
        slide_size,
    })
}

/// Parse the `sldIdLst` relationship ids and `sldSz` of a presentation part.
fn parse_presentation_xml(xml: &[u8]) -> Result<(Vec<String>, Option<SlideSize>)> {
    let mut reader = Reader::from_reader(xml);
    let mut slide_rids = Vec::new();
    let mut slide_size = None;
    let mut in_sld_id_lst = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.local_name().as_ref() == b"sldIdLst" => in_sld_id_lst = true,
            Event::End(e) if e.local_name().as_ref() == b"sldIdLst" => in_sld_id_lst = false,
            Event::Start(e) | Event::Empty(e) => match e.local_name().as_ref() {
                b"sldId" if in_sld_id_lst => {
                    if let Some(r_id) = prefixed_attr(&e, b"id")? {
                        slide_rids.push(r_id);
                    }
                },
                b"sldSz" => {
                    let cx = attr(&e, b"cx")?.and_then(|v| v.parse().ok());
                    let cy = attr(&e, b"cy")?.and_then(|v| v.parse().ok());
                    if let (Some(cx), Some(cy)) = (cx, cy) {
                        slide_size = Some(SlideSize { cx, cy });
                    }
                },
                _ => {},
            },
            Event::Eof => break,
            _ => {},
        }
    }

    Ok((slide_rids, slide_size))
}
