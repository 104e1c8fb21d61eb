//! Image and clip asset collection.
//!
//! Picture shapes reference images through the slide's relationships
//! (`a:blip/@r:embed` → `image` relationship → `/ppt/media/...`). This module
//! turns those references into [`ImageRef`] records with stable ids and, for
//! the asset-upload collaborator, pairs them with the raw media bytes.
//!
//! Video and audio shapes reference their clip twice: `a:videoFile/@r:link`
//! (or `a:audioFile`) and, since PowerPoint 2010, `p14:media/@r:embed`. The
//! embedded reference is tried first.
use crate::common::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink};
use crate::ooxml::error::Result;
use crate::ooxml::opc::constants::content_type;
use crate::ooxml::opc::{OpcPackage, PackURI, Relationships};
use crate::ooxml::pptx::shape_tree::{ClipReference, ShapeTree};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// An image referenced by a slide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRef {
    /// `slide{n}-{rId}`, stable across parses
    pub id: String,
    pub relationship_id: String,
    /// Absolute partname of the media part, e.g. `/ppt/media/image1.png`
    pub media_part_path: String,
    pub content_type: String,
    pub size_bytes: u64,
}

/// Whether a clip is video or audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MediaKind {
    Video,
    Audio,
}

impl MediaKind {
    /// Guess from a part extension; `None` for unknown extensions.
    pub fn from_ext(ext: &str) -> Option<Self> {
        match content_type::for_media_ext(ext).split('/').next() {
            Some("video") => Some(MediaKind::Video),
            Some("audio") => Some(MediaKind::Audio),
            _ => None,
        }
    }
}

/// A video or audio clip placed on a slide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaRef {
    /// `slide{n}-{rId}` of the relationship that resolved
    pub id: String,
    pub kind: MediaKind,
    pub relationship_id: String,
    pub media_part_path: String,
    pub content_type: String,
    pub size_bytes: u64,
}

/// An image record with its bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaPayload {
    pub image: ImageRef,
    pub bytes: Vec<u8>,
}

/// Stable id of an image on a slide.
#[inline]
pub fn image_id(slide_number: u32, r_id: &str) -> String {
    format!("slide{}-{}", slide_number, r_id)
}

/// Resolve relationship ids of a slide to image records.
pub fn resolve_images(
    package: &OpcPackage,
    slide_uri: &PackURI,
    slide_number: u32,
    r_ids: &[String],
    sink: &dyn DiagnosticSink,
) -> Result<Vec<ImageRef>> {
    let rels = package.relationships(slide_uri)?;
    Ok(resolve_images_with(package, &rels, slide_number, r_ids, sink))
}

/// Resolve relationship ids against already-parsed slide relationships.
///
/// Duplicate ids collapse to the first occurrence. Unknown ids, external
/// targets and targets missing from the package are dropped with an
/// `UnresolvableRelationship` diagnostic.
pub fn resolve_images_with(
    package: &OpcPackage,
    rels: &Relationships,
    slide_number: u32,
    r_ids: &[String],
    sink: &dyn DiagnosticSink,
) -> Vec<ImageRef> {
    let mut seen = HashSet::new();
    let mut images = Vec::new();

    for r_id in r_ids {
        if !seen.insert(r_id.as_str()) {
            continue;
        }

        let (uri, bytes) = match resolve_target(package, rels, "image", r_id) {
            Ok(target) => target,
            Err(reason) => {
                drop_unresolvable(sink, slide_number, reason);
                continue;
            },
        };

        images.push(ImageRef {
            id: image_id(slide_number, r_id),
            relationship_id: r_id.clone(),
            media_part_path: uri.to_string(),
            content_type: content_type::for_image_ext(uri.ext()).to_string(),
            size_bytes: bytes.len() as u64,
        });
    }

    images
}

/// Resolve the clip references of a slide's shape tree.
///
/// A clip whose references all fail to resolve is dropped with one
/// `UnresolvableRelationship` diagnostic. Clips sharing a media part collapse
/// to the first.
pub fn resolve_clips_with(
    package: &OpcPackage,
    rels: &Relationships,
    slide_number: u32,
    clips: &[ClipReference],
    sink: &dyn DiagnosticSink,
) -> Vec<MediaRef> {
    let mut seen = HashSet::new();
    let mut media = Vec::new();

    for clip in clips {
        let mut failures = Vec::new();
        let resolved = clip
            .embed_rid
            .iter()
            .chain(clip.link_rid.iter())
            .find_map(|r_id| match resolve_target(package, rels, "media", r_id) {
                Ok(target) => Some((r_id, target)),
                Err(reason) => {
                    failures.push(reason);
                    None
                },
            });

        let Some((r_id, (uri, bytes))) = resolved else {
            if failures.is_empty() {
                failures.push("media shape carries no relationship id".to_string());
            }
            drop_unresolvable(sink, slide_number, failures.join("; "));
            continue;
        };
        if !seen.insert(uri.clone()) {
            continue;
        }

        let kind = clip
            .kind
            .or_else(|| MediaKind::from_ext(uri.ext()))
            .unwrap_or(MediaKind::Video);
        media.push(MediaRef {
            id: image_id(slide_number, r_id),
            kind,
            relationship_id: r_id.clone(),
            media_part_path: uri.to_string(),
            content_type: content_type::for_media_ext(uri.ext()).to_string(),
            size_bytes: bytes.len() as u64,
        });
    }

    media
}

/// Follow an internal relationship to a part present in the package.
fn resolve_target<'p>(
    package: &'p OpcPackage,
    rels: &Relationships,
    what: &str,
    r_id: &str,
) -> std::result::Result<(PackURI, &'p [u8]), String> {
    let rel = rels
        .get(r_id)
        .ok_or_else(|| format!("{} relationship {} not declared", what, r_id))?;
    if rel.is_external() {
        return Err(format!("{} relationship {} is external ({})", what, r_id, rel.target_ref()));
    }
    let uri = rel
        .target_partname()
        .map_err(|e| format!("{} relationship {}: {}", what, r_id, e))?;
    match package.part(&uri) {
        Some(bytes) => Ok((uri, bytes)),
        None => Err(format!("{} relationship {} targets missing part {}", what, r_id, uri)),
    }
}

fn drop_unresolvable(sink: &dyn DiagnosticSink, slide_number: u32, reason: String) {
    sink.emit(Diagnostic::warning(DiagnosticKind::UnresolvableRelationship, reason).for_slide(slide_number));
}

/// Scan a slide's shape tree and resolve every image it references.
pub fn collect_images(
    package: &OpcPackage,
    slide_uri: &PackURI,
    slide_number: u32,
    sink: &dyn DiagnosticSink,
) -> Result<Vec<ImageRef>> {
    let xml = package.require_part(slide_uri)?;
    let tree = ShapeTree::parse(xml)?;
    resolve_images(package, slide_uri, slide_number, &tree.image_rids, sink)
}

/// Pair image records with their bytes. Records whose part vanished are skipped.
pub fn media_payloads(package: &OpcPackage, images: &[ImageRef]) -> Vec<MediaPayload> {
    images
        .iter()
        .filter_map(|image| {
            let bytes = package.get_part(&image.media_part_path)?;
            Some(MediaPayload {
                image: image.clone(),
                bytes: bytes.to_vec(),
            })
        })
        .collect()
}
