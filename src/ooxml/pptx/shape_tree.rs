/// Shape-tree scanning shared by slides and notes slides.
///
/// Walks `p:cSld/p:spTree` in document order (group shapes included) and
/// collects, per text body, its non-empty paragraphs, the placeholder type of
/// the owning shape, every `a:blip/@r:embed` image reference and the
/// relationship ids of video and audio shapes.
use crate::ooxml::error::Result;
use crate::ooxml::pptx::media::MediaKind;
use crate::ooxml::xml::{attr, prefixed_attr, push_entity, push_text};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// One `txBody` and the shape it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBlock {
    /// `p:ph/@type` of the owning shape; `Some("obj")` for a placeholder without a type
    pub placeholder: Option<String>,
    /// Non-empty paragraphs; `a:br` line breaks appear as `\n`
    pub paragraphs: Vec<String>,
}

impl TextBlock {
    /// Paragraphs joined by newlines.
    pub fn text(&self) -> String {
        self.paragraphs.join("\n")
    }

    pub fn is_placeholder(&self, kind: &str) -> bool {
        self.placeholder.as_deref() == Some(kind)
    }
}

/// Video or audio reference of one picture shape.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClipReference {
    /// From the reference element; `None` when only `p14:media` is present
    pub kind: Option<MediaKind>,
    /// `r:link` of `a:videoFile`, `a:audioFile` or `a:quickTimeFile`
    pub link_rid: Option<String>,
    /// `r:embed` of `p14:media` or `a:wavAudioFile`
    pub embed_rid: Option<String>,
}

/// Text blocks and media references of one shape tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShapeTree {
    pub blocks: Vec<TextBlock>,
    /// `r:embed` ids in document order, duplicates included
    pub image_rids: Vec<String>,
    pub clips: Vec<ClipReference>,
}

impl ShapeTree {
    /// Scan a slide-like part (`p:sld`, `p:notes`, ...).
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        let mut tree = ShapeTree::default();

        let mut sp_tree_depth = 0usize;
        let mut placeholder: Option<String> = None;
        let mut body: Option<TextBlock> = None;
        let mut paragraph: Option<String> = None;
        let mut in_text = false;
        let mut clip: Option<ClipReference> = None;

        loop {
            match reader.read_event()? {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"spTree" => sp_tree_depth += 1,
                    _ if sp_tree_depth == 0 => {},
                    b"sp" | b"pic" | b"graphicFrame" | b"cxnSp" => {
                        placeholder = None;
                        clip = None;
                    },
                    b"ph" => placeholder = Some(placeholder_type(&e)?),
                    b"txBody" => {
                        body = Some(TextBlock {
                            placeholder: placeholder.clone(),
                            paragraphs: Vec::new(),
                        })
                    },
                    b"p" if body.is_some() => paragraph = Some(String::new()),
                    b"t" if paragraph.is_some() => in_text = true,
                    b"br" => {
                        if let Some(p) = paragraph.as_mut() {
                            p.push('\n');
                        }
                    },
                    b"blip" => push_blip(&mut tree, &e)?,
                    name @ (b"videoFile" | b"quickTimeFile" | b"audioFile" | b"wavAudioFile" | b"media") => {
                        note_clip(&mut clip, name, &e)?
                    },
                    _ => {},
                },
                Event::Empty(e) if sp_tree_depth > 0 => match e.local_name().as_ref() {
                    b"ph" => placeholder = Some(placeholder_type(&e)?),
                    b"br" => {
                        if let Some(p) = paragraph.as_mut() {
                            p.push('\n');
                        }
                    },
                    b"blip" => push_blip(&mut tree, &e)?,
                    name @ (b"videoFile" | b"quickTimeFile" | b"audioFile" | b"wavAudioFile" | b"media") => {
                        note_clip(&mut clip, name, &e)?
                    },
                    _ => {},
                },
                Event::Text(e) if in_text => {
                    if let Some(p) = paragraph.as_mut() {
                        push_text(p, &e)?;
                    }
                },
                Event::GeneralRef(e) if in_text => {
                    if let Some(p) = paragraph.as_mut() {
                        push_entity(p, &e)?;
                    }
                },
                Event::End(e) => match e.local_name().as_ref() {
                    b"spTree" => sp_tree_depth = sp_tree_depth.saturating_sub(1),
                    b"t" => in_text = false,
                    b"pic" => {
                        if let Some(c) = clip.take() {
                            tree.clips.push(c);
                        }
                    },
                    b"p" => {
                        if let (Some(p), Some(b)) = (paragraph.take(), body.as_mut())
                            && !p.trim().is_empty()
                        {
                            b.paragraphs.push(p);
                        }
                    },
                    b"txBody" => {
                        if let Some(b) = body.take()
                            && !b.paragraphs.is_empty()
                        {
                            tree.blocks.push(b);
                        }
                    },
                    _ => {},
                },
                Event::Eof => break,
                _ => {},
            }
        }

        Ok(tree)
    }

    /// Text of every block, in document order.
    pub fn block_texts(&self) -> impl Iterator<Item = String> + '_ {
        self.blocks.iter().map(TextBlock::text)
    }
}

fn placeholder_type(e: &BytesStart<'_>) -> Result<String> {
    Ok(attr(e, b"type")?.unwrap_or_else(|| "obj".to_string()))
}

fn push_blip(tree: &mut ShapeTree, e: &BytesStart<'_>) -> Result<()> {
    if let Some(r_id) = prefixed_attr(e, b"embed")? {
        tree.image_rids.push(r_id);
    }
    Ok(())
}

fn note_clip(clip: &mut Option<ClipReference>, name: &[u8], e: &BytesStart<'_>) -> Result<()> {
    let c = clip.get_or_insert_with(ClipReference::default);
    match name {
        b"videoFile" | b"quickTimeFile" => {
            c.kind = Some(MediaKind::Video);
            c.link_rid = prefixed_attr(e, b"link")?;
        },
        b"audioFile" => {
            c.kind = Some(MediaKind::Audio);
            c.link_rid = prefixed_attr(e, b"link")?;
        },
        b"wavAudioFile" => {
            c.kind = Some(MediaKind::Audio);
            if c.embed_rid.is_none() {
                c.embed_rid = prefixed_attr(e, b"embed")?;
            }
        },
        _ => c.embed_rid = prefixed_attr(e, b"embed")?,
    }
    Ok(())
}
