//! Speaker notes.
use crate::ooxml::error::Result;
use crate::ooxml::opc::constants::relationship_type;
use crate::ooxml::opc::{OpcPackage, PackURI, Relationships};
use crate::ooxml::pptx::shape_tree::ShapeTree;

/// Locate the notes slide for a slide.
///
/// Uses the slide's `notesSlide` relationship. Without one, tries
/// `/ppt/notesSlides/notesSlide{idx}.xml` where `idx` is the slide filename
/// index, and accepts it only when that notes part's own `slide` relationship
/// points back at `slide_uri`. Notes parts are numbered in creation order, so
/// the index alone can name another slide's notes.
pub fn notes_part_uri(package: &OpcPackage, slide_uri: &PackURI, rels: &Relationships) -> Option<PackURI> {
    if let Some(rel) = rels.first_of_type(relationship_type::NOTES_SLIDE)
        && let Ok(uri) = rel.target_partname()
        && package.contains_part(&uri)
    {
        return Some(uri);
    }

    let idx = slide_uri.idx()?;
    let candidate = PackURI::new(format!("/ppt/notesSlides/notesSlide{}.xml", idx))
        .ok()
        .filter(|uri| package.contains_part(uri))?;
    let back = package.relationships(&candidate).ok()?;
    let owner = back.first_of_type(relationship_type::SLIDE)?.target_partname().ok()?;
    (owner == *slide_uri).then_some(candidate)
}

/// Read the notes text for a slide, if it has any.
pub fn read_notes(package: &OpcPackage, slide_uri: &PackURI, rels: &Relationships) -> Result<Option<String>> {
    match notes_part_uri(package, slide_uri, rels).and_then(|uri| package.part(&uri)) {
        Some(xml) => parse_notes_xml(xml),
        None => Ok(None),
    }
}

/// Extract the body-placeholder text of a notes slide.
///
/// The slide image, header, footer, date and slide-number placeholders are
/// excluded. Blank notes give `None`.
pub fn parse_notes_xml(xml: &[u8]) -> Result<Option<String>> {
    let tree = ShapeTree::parse(xml)?;
    let text = tree
        .blocks
        .iter()
        .filter(|b| b.is_placeholder("body"))
        .map(|b| b.text())
        .collect::<Vec<_>>()
        .join("\n");

    let text = text.trim();
    Ok((!text.is_empty()).then(|| text.to_string()))
}
