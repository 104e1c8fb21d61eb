//! In-memory `.pptx` fixtures for unit tests.
use std::io::{Cursor, Write};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

pub(crate) const NS: &str = concat!(
    r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
    r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
    r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" "#,
    r#"xmlns:p14="http://schemas.microsoft.com/office/powerpoint/2010/main""#
);

const REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const MS_MEDIA_REL: &str = "http://schemas.microsoft.com/office/2007/relationships/media";

/// Zip the given members in order.
pub(crate) fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, data) in entries {
        writer.start_file(*name, options).unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// Wrap a `<p:timing>` body (or anything else) in a minimal slide part.
pub(crate) fn slide_xml(shapes: &str, trailer: &str) -> String {
    slide_xml_with_background("", shapes, trailer)
}

/// Like [`slide_xml`] with a `<p:bg>` element ahead of the shape tree.
pub(crate) fn slide_xml_with_background(background: &str, shapes: &str, trailer: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld {NS}><p:cSld>{background}<p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>{shapes}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>{trailer}</p:sld>"#
    )
}

/// A text shape; each `\n`-separated line becomes a paragraph.
pub(crate) fn text_shape(id: u32, text: &str) -> String {
    let paragraphs: String = text
        .split('\n')
        .map(|line| format!("<a:p><a:r><a:rPr lang=\"en-US\"/><a:t>{line}</a:t></a:r></a:p>"))
        .collect();
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="Shape {id}"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:lstStyle/>{paragraphs}</p:txBody></p:sp>"#
    )
}

/// A picture shape embedding the given relationship id.
pub(crate) fn picture_shape(id: u32, r_id: &str) -> String {
    format!(
        r#"<p:pic><p:nvPicPr><p:cNvPr id="{id}" name="Picture {id}"/><p:cNvPicPr/><p:nvPr/></p:nvPicPr><p:blipFill><a:blip r:embed="{r_id}"/><a:stretch><a:fillRect/></a:stretch></p:blipFill><p:spPr/></p:pic>"#
    )
}

/// A picture shape carrying a video or audio reference.
///
/// `element` is `videoFile` or `audioFile`; `embed_rid` adds the `p14:media`
/// extension PowerPoint 2010+ writes for embedded clips.
pub(crate) fn media_shape(id: u32, element: &str, link_rid: &str, embed_rid: Option<&str>) -> String {
    let ext = embed_rid
        .map(|r_id| {
            format!(
                r#"<p:extLst><p:ext uri="{{DAA4B4D4-6D71-4841-9C94-3DE7FCFB9230}}"><p14:media r:embed="{r_id}"/></p:ext></p:extLst>"#
            )
        })
        .unwrap_or_default();
    format!(
        r#"<p:pic><p:nvPicPr><p:cNvPr id="{id}" name="Media {id}"/><p:cNvPicPr/><p:nvPr><a:{element} r:link="{link_rid}"/>{ext}</p:nvPr></p:nvPicPr><p:blipFill/><p:spPr/></p:pic>"#
    )
}

/// Wrap timing children (`<p:par>` click groups) in the standard root/mainSeq frame.
pub(crate) fn main_sequence(click_groups: &str) -> String {
    format!(
        r#"<p:timing><p:tnLst><p:par><p:cTn id="1" dur="indefinite" restart="never" nodeType="tmRoot"><p:childTnLst><p:seq concurrent="1" nextAc="seek"><p:cTn id="2" dur="indefinite" nodeType="mainSeq"><p:childTnLst>{click_groups}</p:childTnLst></p:cTn><p:prevCondLst><p:cond evt="onPrev" delay="0"><p:tgtEl><p:sldTgt/></p:tgtEl></p:cond></p:prevCondLst><p:nextCondLst><p:cond evt="onNext" delay="0"><p:tgtEl><p:sldTgt/></p:tgtEl></p:cond></p:nextCondLst></p:seq></p:childTnLst></p:cTn></p:par></p:tnLst></p:timing>"#
    )
}

/// One click step holding the given behaviors inside an effect container.
pub(crate) fn click_group(ctn_id: u32, delay: &str, behaviors: &str) -> String {
    format!(
        r#"<p:par><p:cTn id="{ctn_id}" fill="hold"><p:stCondLst><p:cond delay="indefinite"/></p:stCondLst><p:childTnLst><p:par><p:cTn id="{inner}" fill="hold"><p:stCondLst><p:cond delay="{delay}"/></p:stCondLst><p:childTnLst><p:par><p:cTn id="{effect}" presetID="10" presetClass="entr" presetSubtype="0" fill="hold" nodeType="clickEffect"><p:stCondLst><p:cond delay="0"/></p:stCondLst><p:childTnLst>{behaviors}</p:childTnLst></p:cTn></p:par></p:childTnLst></p:cTn></p:par></p:childTnLst></p:cTn></p:par>"#,
        inner = ctn_id + 1,
        effect = ctn_id + 2,
    )
}

/// An `<p:animEffect>` behavior; `dur` is omitted when `None`.
pub(crate) fn anim_effect(
    ctn_id: u32,
    spid: u32,
    transition: &str,
    filter: &str,
    dur: Option<&str>,
    extra_ctn_attrs: &str,
) -> String {
    let dur = dur.map(|d| format!(r#" dur="{d}""#)).unwrap_or_default();
    format!(
        r#"<p:animEffect transition="{transition}" filter="{filter}"><p:cBhvr><p:cTn id="{ctn_id}"{dur}{extra_ctn_attrs}/><p:tgtEl><p:spTgt spid="{spid}"/></p:tgtEl></p:cBhvr></p:animEffect>"#
    )
}

/// A visibility `<p:set>` behavior.
pub(crate) fn set_visible(ctn_id: u32, spid: u32) -> String {
    format!(
        r#"<p:set><p:cBhvr><p:cTn id="{ctn_id}" dur="1" fill="hold"><p:stCondLst><p:cond delay="0"/></p:stCondLst></p:cTn><p:tgtEl><p:spTgt spid="{spid}"/></p:tgtEl><p:attrNameLst><p:attrName>style.visibility</p:attrName></p:attrNameLst></p:cBhvr><p:to><p:strVal val="visible"/></p:to></p:set>"#
    )
}

/// Notes slide part with a slide image placeholder, a body and a slide number.
pub(crate) fn notes_xml(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:notes {NS}><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/><p:sp><p:nvSpPr><p:cNvPr id="2" name="Slide Image"/><p:cNvSpPr/><p:nvPr><p:ph type="sldImg"/></p:nvPr></p:nvSpPr><p:spPr/></p:sp><p:sp><p:nvSpPr><p:cNvPr id="3" name="Notes"/><p:cNvSpPr/><p:nvPr><p:ph type="body" idx="1"/></p:nvPr></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:p><a:r><a:t>{body}</a:t></a:r></a:p></p:txBody></p:sp><p:sp><p:nvSpPr><p:cNvPr id="4" name="Slide Number"/><p:cNvSpPr/><p:nvPr><p:ph type="sldNum" idx="5"/></p:nvPr></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:p><a:fld id="{{B6F15528-21DE-4FAA-801E-634DDDAF4B2B}}" type="slidenum"><a:t>7</a:t></a:fld></a:p></p:txBody></p:sp></p:spTree></p:cSld></p:notes>"#
    )
}

/// Rels part of a notes slide pointing back at its slide.
pub(crate) fn notes_rels_xml(slide_target: &str) -> String {
    rels_xml(&[("rId1".to_string(), "slide".to_string(), slide_target.to_string())])
}

/// `kind` is either a short officeDocument relationship name or a full type URI.
fn rels_xml(rels: &[(String, String, String)]) -> String {
    let body: String = rels
        .iter()
        .map(|(id, kind, target)| {
            let reltype = if kind.contains("://") {
                kind.clone()
            } else {
                format!("{REL_BASE}/{kind}")
            };
            format!(r#"<Relationship Id="{id}" Type="{reltype}" Target="{target}"/>"#)
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="{REL_NS}">{body}</Relationships>"#
    )
}

/// Describes one slide of a fixture deck.
#[derive(Debug, Clone)]
pub(crate) struct SlideFixture {
    name: String,
    shapes: String,
    timing: String,
    raw: Option<Vec<u8>>,
    pictures: Vec<(String, String, Vec<u8>)>,
    /// (r:id, relationship type, media file name, bytes)
    clips: Vec<(String, String, String, Vec<u8>)>,
    background: String,
    transition: String,
    notes: Option<Vec<u8>>,
    layout: Option<(String, String)>,
    next_id: u32,
}

impl SlideFixture {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            shapes: String::new(),
            timing: String::new(),
            raw: None,
            pictures: Vec::new(),
            clips: Vec::new(),
            background: String::new(),
            transition: String::new(),
            notes: None,
            layout: Some(("obj".to_string(), "Title and Content".to_string())),
            next_id: 2,
        }
    }

    pub(crate) fn text(mut self, text: &str) -> Self {
        self.shapes.push_str(&text_shape(self.next_id, text));
        self.next_id += 1;
        self
    }

    /// Picture shape plus an image relationship to `/ppt/media/{media}`.
    pub(crate) fn picture(mut self, r_id: &str, media: &str, bytes: &[u8]) -> Self {
        self.shapes.push_str(&picture_shape(self.next_id, r_id));
        self.next_id += 1;
        if !self.pictures.iter().any(|(id, _, _)| id == r_id) {
            self.pictures.push((r_id.to_string(), media.to_string(), bytes.to_vec()));
        }
        self
    }

    /// Image relationship without a picture shape, e.g. for a background fill.
    pub(crate) fn image_rel(mut self, r_id: &str, media: &str, bytes: &[u8]) -> Self {
        self.pictures.push((r_id.to_string(), media.to_string(), bytes.to_vec()));
        self
    }

    /// Video shape linking `link_rid` and embedding `embed_rid`, both targeting
    /// `/ppt/media/{media}`.
    pub(crate) fn video(mut self, link_rid: &str, embed_rid: &str, media: &str, bytes: &[u8]) -> Self {
        self.shapes
            .push_str(&media_shape(self.next_id, "videoFile", link_rid, Some(embed_rid)));
        self.next_id += 1;
        self.clips
            .push((link_rid.to_string(), "video".to_string(), media.to_string(), bytes.to_vec()));
        self.clips
            .push((embed_rid.to_string(), MS_MEDIA_REL.to_string(), media.to_string(), bytes.to_vec()));
        self
    }

    /// Audio shape linking `r_id` to `/ppt/media/{media}`.
    pub(crate) fn audio(mut self, r_id: &str, media: &str, bytes: &[u8]) -> Self {
        self.shapes.push_str(&media_shape(self.next_id, "audioFile", r_id, None));
        self.next_id += 1;
        self.clips
            .push((r_id.to_string(), "audio".to_string(), media.to_string(), bytes.to_vec()));
        self
    }

    /// `<p:bg>` element of the slide.
    pub(crate) fn background(mut self, xml: &str) -> Self {
        self.background = xml.to_string();
        self
    }

    /// `<p:transition>` (or `mc:AlternateContent`) placed ahead of the timing.
    pub(crate) fn transition(mut self, xml: &str) -> Self {
        self.transition = xml.to_string();
        self
    }

    /// Raw shape XML appended to the shape tree.
    pub(crate) fn shape_xml(mut self, xml: &str) -> Self {
        self.shapes.push_str(xml);
        self
    }

    pub(crate) fn timing(mut self, timing: &str) -> Self {
        self.timing = timing.to_string();
        self
    }

    pub(crate) fn notes(mut self, notes: &str) -> Self {
        self.notes = Some(notes_xml(notes).into_bytes());
        self
    }

    /// Replace the notes part with arbitrary bytes.
    pub(crate) fn raw_notes(mut self, bytes: &[u8]) -> Self {
        self.notes = Some(bytes.to_vec());
        self
    }

    pub(crate) fn layout(mut self, kind: &str, name: &str) -> Self {
        self.layout = Some((kind.to_string(), name.to_string()));
        self
    }

    pub(crate) fn without_layout(mut self) -> Self {
        self.layout = None;
        self
    }

    /// Replace the slide part with arbitrary bytes.
    pub(crate) fn raw(mut self, bytes: &[u8]) -> Self {
        self.raw = Some(bytes.to_vec());
        self
    }
}

/// Builds a complete `.pptx` container in memory.
#[derive(Debug, Clone, Default)]
pub(crate) struct DeckBuilder {
    slides: Vec<SlideFixture>,
    core: Option<String>,
    app: Option<String>,
    without_core: bool,
    dangling_slide_ids: Vec<String>,
    extra: Vec<(String, Vec<u8>)>,
}

impl DeckBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Add a slide with one text shape per entry.
    pub(crate) fn slide(self, name: &str, texts: &[&str]) -> Self {
        let fixture = texts
            .iter()
            .fold(SlideFixture::new(name), |fixture, text| fixture.text(text));
        self.slide_fixture(fixture)
    }

    pub(crate) fn slide_fixture(mut self, fixture: SlideFixture) -> Self {
        self.slides.push(fixture);
        self
    }

    pub(crate) fn core_xml(mut self, xml: &str) -> Self {
        self.core = Some(xml.to_string());
        self
    }

    pub(crate) fn app_xml(mut self, xml: &str) -> Self {
        self.app = Some(xml.to_string());
        self
    }

    pub(crate) fn without_core(mut self) -> Self {
        self.without_core = true;
        self
    }

    /// Add a `sldId` whose r:id has no relationship.
    pub(crate) fn dangling_slide_id(mut self, r_id: &str) -> Self {
        self.dangling_slide_ids.push(r_id.to_string());
        self
    }

    pub(crate) fn extra_part(mut self, name: &str, bytes: &[u8]) -> Self {
        self.extra.push((name.to_string(), bytes.to_vec()));
        self
    }

    pub(crate) fn build(&self) -> Vec<u8> {
        let mut entries: Vec<(String, Vec<u8>)> = Vec::new();

        entries.push((
            "[Content_Types].xml".to_string(),
            br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Default Extension="png" ContentType="image/png"/></Types>"#
                .to_vec(),
        ));

        entries.push((
            "_rels/.rels".to_string(),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="{REL_NS}"><Relationship Id="rId1" Type="{REL_BASE}/officeDocument" Target="ppt/presentation.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/><Relationship Id="rId3" Type="{REL_BASE}/extended-properties" Target="docProps/app.xml"/></Relationships>"#
            )
            .into_bytes(),
        ));

        if !self.without_core {
            let core = self.core.clone().unwrap_or_else(|| {
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><dc:title>Fixture Deck</dc:title><dc:creator>Fixture Author</dc:creator><dcterms:created xsi:type="dcterms:W3CDTF">2024-03-01T09:30:00Z</dcterms:created></cp:coreProperties>"#
                    .to_string()
            });
            entries.push(("docProps/core.xml".to_string(), core.into_bytes()));
        }
        if let Some(app) = &self.app {
            entries.push(("docProps/app.xml".to_string(), app.clone().into_bytes()));
        }

        let mut sld_ids = String::new();
        let mut pres_rels = Vec::new();
        for (i, slide) in self.slides.iter().enumerate() {
            let r_id = format!("rId{}", i + 10);
            sld_ids.push_str(&format!(r#"<p:sldId id="{}" r:id="{}"/>"#, 256 + i, r_id));
            pres_rels.push((r_id, "slide".to_string(), format!("slides/{}", slide.name)));
        }
        for (i, r_id) in self.dangling_slide_ids.iter().enumerate() {
            sld_ids.push_str(&format!(r#"<p:sldId id="{}" r:id="{}"/>"#, 900 + i, r_id));
        }
        // Declared in reverse so order can only come from sldIdLst
        pres_rels.reverse();

        entries.push((
            "ppt/presentation.xml".to_string(),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation {NS}><p:sldMasterIdLst/><p:sldIdLst>{sld_ids}</p:sldIdLst><p:sldSz cx="12192000" cy="6858000"/><p:notesSz cx="6858000" cy="9144000"/></p:presentation>"#
            )
            .into_bytes(),
        ));
        entries.push(("ppt/_rels/presentation.xml.rels".to_string(), rels_xml(&pres_rels).into_bytes()));

        entries.push((
            "ppt/slideLayouts/slideLayout1.xml".to_string(),
            br#"<p:sldLayout type="obj"><p:cSld name="Title and Content"/></p:sldLayout>"#.to_vec(),
        ));

        for (i, slide) in self.slides.iter().enumerate() {
            let body = match &slide.raw {
                Some(raw) => raw.clone(),
                None => slide_xml_with_background(
                    &slide.background,
                    &slide.shapes,
                    &format!("{}{}", slide.transition, slide.timing),
                )
                .into_bytes(),
            };
            entries.push((format!("ppt/slides/{}", slide.name), body));

            let mut rels = Vec::new();
            if let Some((kind, name)) = &slide.layout {
                let layout_name = format!("slideLayout{}.xml", i + 100);
                entries.push((
                    format!("ppt/slideLayouts/{}", layout_name),
                    format!(
                        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldLayout {NS} type="{kind}" preserve="1"><p:cSld name="{name}"><p:spTree/></p:cSld></p:sldLayout>"#
                    )
                    .into_bytes(),
                ));
                rels.push((
                    "rId1".to_string(),
                    "slideLayout".to_string(),
                    format!("../slideLayouts/{}", layout_name),
                ));
            }
            for (r_id, media, bytes) in &slide.pictures {
                rels.push((r_id.clone(), "image".to_string(), format!("../media/{}", media)));
                entries.push((format!("ppt/media/{}", media), bytes.clone()));
            }
            for (r_id, kind, media, bytes) in &slide.clips {
                rels.push((r_id.clone(), kind.clone(), format!("../media/{}", media)));
                entries.push((format!("ppt/media/{}", media), bytes.clone()));
            }
            // Numbered in creation order, not by slide filename
            if let Some(notes) = &slide.notes {
                let notes_name = format!("notesSlide{}.xml", i + 1);
                rels.push((
                    "rId99".to_string(),
                    "notesSlide".to_string(),
                    format!("../notesSlides/{}", notes_name),
                ));
                entries.push((format!("ppt/notesSlides/{}", notes_name), notes.clone()));
                entries.push((
                    format!("ppt/notesSlides/_rels/{}.rels", notes_name),
                    notes_rels_xml(&format!("../slides/{}", slide.name)).into_bytes(),
                ));
            }
            entries.push((format!("ppt/slides/_rels/{}.rels", slide.name), rels_xml(&rels).into_bytes()));
        }

        entries.extend(self.extra.iter().cloned());

        // A media file shared by several relationships is stored once
        let mut seen = std::collections::HashSet::new();
        entries.retain(|(name, _)| seen.insert(name.clone()));

        let borrowed: Vec<(&str, &[u8])> =
            entries.iter().map(|(n, b)| (n.as_str(), b.as_slice())).collect();
        zip_bytes(&borrowed)
    }
}
