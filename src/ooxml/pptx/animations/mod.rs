//! Slide animation timelines.
//!
//! A slide's `p:timing` element describes its build as a tree of parallel
//! (`par`), sequential (`seq`) and exclusive (`excl`) time containers whose
//! leaves are behaviors (`animEffect`, `animMotion`, `set`, ...). This module
//! reads that tree into a typed form and flattens it into a list of
//! [`AnimationNode`]s in document order, mapping PowerPoint's effect
//! vocabulary to a small stable taxonomy.
//!
//! Parsing is isolated per slide: a malformed or too-deep timing tree yields a
//! failed [`AnimationSequence`] and leaves the slide's content untouched.
//!
//! # Example
//!
//! ```no_run
//! use slidetrack::common::TracingSink;
//! use slidetrack::ooxml::opc::{OpcPackage, PackURI, PackageLimits};
//! use slidetrack::ooxml::pptx::animations::{AnimationOptions, parse_animations};
//!
//! let bytes = std::fs::read("deck.pptx")?;
//! let pkg = OpcPackage::from_bytes(&bytes, &PackageLimits::default())?;
//! let slide = PackURI::new("/ppt/slides/slide1.xml")?;
//! let sequence = parse_animations(&pkg, &slide, 1, &AnimationOptions::default(), &TracingSink);
//! for node in &sequence.animations {
//!     println!("{} {}ms", node.common().effect_name, node.common().duration_ms);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
mod extract;
mod model;
mod tables;
mod tree;

pub use extract::{DEFAULT_DURATION_MS, parse_duration, parse_iterations};
pub use model::{
    AnimationCategory, AnimationCommon, AnimationNode, AnimationSequence, Direction, Easing, FillMode,
    Iterations, StepPosition,
};
pub use tables::{filter_base, map_effect, map_fill};

use crate::common::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink};
use crate::ooxml::opc::{OpcPackage, PackURI};
use serde::{Deserialize, Serialize};

/// Settings for the timing-tree walk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnimationOptions {
    /// Maximum time-node nesting before the tree is rejected
    pub max_depth: usize,
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self { max_depth: 50 }
    }
}

impl AnimationOptions {
    #[inline]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Parse the animations of one slide part.
pub fn parse_animations(
    package: &OpcPackage,
    slide_uri: &PackURI,
    slide_number: u32,
    options: &AnimationOptions,
    sink: &dyn DiagnosticSink,
) -> AnimationSequence {
    match package.part(slide_uri) {
        Some(xml) => parse_animations_xml(xml, slide_number, options, sink),
        None => fail(slide_number, format!("Part not found: {}", slide_uri), sink),
    }
}

/// Parse the animations of slide XML already in memory.
pub fn parse_animations_xml(
    xml: &[u8],
    slide_number: u32,
    options: &AnimationOptions,
    sink: &dyn DiagnosticSink,
) -> AnimationSequence {
    match tree::parse_timing(xml, options.max_depth) {
        Ok(None) => AnimationSequence::empty(slide_number),
        Ok(Some(roots)) => {
            let nodes = extract::Extractor::new(slide_number, sink).extract(&roots);
            AnimationSequence::new(slide_number, nodes)
        },
        Err(e) => fail(slide_number, e.to_string(), sink),
    }
}

fn fail(slide_number: u32, message: String, sink: &dyn DiagnosticSink) -> AnimationSequence {
    sink.emit(Diagnostic::error(DiagnosticKind::AnimationParseFailure, message.clone()).for_slide(slide_number));
    AnimationSequence::failed(slide_number, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::diagnostics::CollectingSink;
    use crate::test_support::{anim_effect, click_group, main_sequence, set_visible, slide_xml};

    fn parse(timing: &str) -> (AnimationSequence, CollectingSink) {
        let sink = CollectingSink::new();
        let xml = slide_xml("", timing);
        let seq = parse_animations_xml(xml.as_bytes(), 1, &AnimationOptions::default(), &sink);
        (seq, sink)
    }

    fn single_effect(transition: &str, filter: &str, dur: Option<&str>, extra: &str) -> AnimationCommon {
        let timing = main_sequence(&click_group(3, "0", &anim_effect(10, 4, transition, filter, dur, extra)));
        let (seq, _) = parse(&timing);
        assert!(seq.success);
        assert_eq!(seq.animations.len(), 1);
        seq.animations[0].common().clone()
    }

    #[test]
    fn test_no_timing() {
        let (seq, sink) = parse("");
        assert!(seq.success);
        assert!(seq.animations.is_empty());
        assert_eq!(seq.total_duration_ms, 0);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_missing_duration_defaults() {
        let node = single_effect("in", "fade", None, "");
        assert_eq!(node.duration_ms, 1000);
    }

    #[test]
    fn test_effect_mapping() {
        let zoom = single_effect("in", "zoom", Some("500"), "");
        assert_eq!((zoom.category, zoom.effect_name.as_str()), (AnimationCategory::Entrance, "zoomIn"));

        let fade = single_effect("out", "fade", Some("500"), "");
        assert_eq!((fade.category, fade.effect_name.as_str()), (AnimationCategory::Exit, "fadeOut"));

        let spin = single_effect("emphasis", "spin", Some("500"), "");
        assert_eq!((spin.category, spin.effect_name.as_str()), (AnimationCategory::Emphasis, "spin"));

        let plain = single_effect("none", "spin", Some("500"), "");
        assert_eq!((plain.category, plain.effect_name.as_str()), (AnimationCategory::Emphasis, "spin"));
    }

    #[test]
    fn test_common_fields() {
        let node = single_effect(
            "in",
            "wipe(down)",
            Some("750"),
            r#" accel="50000" repeatCount="3000" autoRev="1" fill="remove""#,
        );
        assert_eq!(node.id, "s1-n10");
        assert_eq!(node.element_id, "4");
        assert_eq!(node.effect_name, "wipeIn");
        assert_eq!(node.duration_ms, 750);
        assert_eq!(node.delay_ms, 0);
        assert_eq!(node.easing, Easing::EaseIn);
        assert_eq!(node.iterations, Iterations::Count(3.0));
        assert_eq!(node.direction, Direction::Alternate);
        assert_eq!(node.fill_mode, FillMode::None);
        assert_eq!(node.custom_properties["filter"], "wipe(down)");
        assert_eq!(node.custom_properties["presetClass"], "entr");
        assert_eq!(node.custom_properties["presetId"], "10");
        assert_eq!(node.custom_properties["behavior"], "animEffect");
    }

    #[test]
    fn test_fill_inherited_from_ancestor() {
        let timing = format!(
            r#"<p:timing><p:tnLst><p:par><p:cTn id="1" fill="freeze"><p:childTnLst><p:par><p:cTn id="2"><p:childTnLst>{}</p:childTnLst></p:cTn></p:par></p:childTnLst></p:cTn></p:par></p:tnLst></p:timing>"#,
            anim_effect(3, 4, "in", "fade", Some("500"), "")
        );
        let (seq, _) = parse(&timing);
        assert_eq!(seq.animations[0].common().fill_mode, FillMode::Both);
    }

    #[test]
    fn test_set_and_motion() {
        let motion = r#"<p:animMotion origin="layout" path="M 0 0 L 0.25 0.1 E" pathEditMode="relative" ptsTypes=""><p:cBhvr><p:cTn id="12" dur="2000" decel="100000" fill="hold"/><p:tgtEl><p:spTgt spid="5"/></p:tgtEl><p:attrNameLst><p:attrName>ppt_x</p:attrName><p:attrName>ppt_y</p:attrName></p:attrNameLst></p:cBhvr></p:animMotion>"#;
        let behaviors = format!("{}{}", set_visible(11, 5), motion);
        let (seq, _) = parse(&main_sequence(&click_group(3, "0", &behaviors)));

        assert_eq!(seq.animations.len(), 2);
        let AnimationNode::Set(set) = &seq.animations[0] else { panic!("expected set") };
        assert_eq!(set.effect_name, "set");
        assert_eq!(set.category, AnimationCategory::Emphasis);
        assert_eq!(set.duration_ms, 0);
        assert_eq!(set.fill_mode, FillMode::Both);
        assert_eq!(set.custom_properties["attributeName"], "style.visibility");
        assert_eq!(set.custom_properties["value"], "visible");

        let AnimationNode::Motion(path) = &seq.animations[1] else { panic!("expected motion") };
        assert_eq!(path.category, AnimationCategory::Motion);
        assert_eq!(path.effect_name, "path");
        assert_eq!(path.easing, Easing::Linear);
        assert_eq!(path.fill_mode, FillMode::Forwards);
        assert_eq!(path.duration_ms, 2000);
        assert_eq!(path.custom_properties["origin"], "layout");
        assert_eq!(path.custom_properties["path"], "M 0 0 L 0.25 0.1 E");
        assert_eq!(path.custom_properties["pathEditMode"], "relative");
        assert_eq!(seq.total_duration_ms, 2000);
    }

    #[test]
    fn test_total_is_max_end() {
        let behaviors = format!(
            "{}{}",
            anim_effect(10, 4, "in", "fade", Some("500"), ""),
            anim_effect(11, 5, "in", "fade", Some("1200"), "")
        );
        let (seq, _) = parse(&main_sequence(&click_group(3, "0", &behaviors)));
        assert_eq!(seq.total_duration_ms, 1200);
    }

    #[test]
    fn test_positions() {
        let groups = format!(
            "{}{}",
            click_group(3, "0", &anim_effect(10, 4, "in", "fade", Some("500"), "")),
            click_group(20, "250", &anim_effect(30, 5, "out", "fade", Some("500"), ""))
        );
        let (seq, _) = parse(&main_sequence(&groups));

        let first = seq.animations[0].common().position;
        let second = seq.animations[1].common().position;
        assert_eq!((first.sequence, first.step, first.start_delay_ms), (0, 0, 0));
        assert_eq!((second.sequence, second.step, second.start_delay_ms), (0, 1, 250));
    }

    #[test]
    fn test_dropped_and_unsupported() {
        let no_target = r#"<p:animEffect transition="in" filter="fade"><p:cBhvr><p:cTn id="40" dur="500"/><p:tgtEl><p:sldTgt/></p:tgtEl></p:cBhvr></p:animEffect>"#;
        let anim_clr = r#"<p:animClr clrSpc="rgb" dir="cw"><p:cBhvr><p:cTn id="41" dur="500"/><p:tgtEl><p:spTgt spid="4"/></p:tgtEl></p:cBhvr></p:animClr>"#;
        let scale = r#"<p:animScale><p:cBhvr><p:cTn id="42" dur="800"/><p:tgtEl><p:spTgt spid="4"/></p:tgtEl></p:cBhvr><p:by x="150000" y="150000"/></p:animScale>"#;
        let behaviors = format!("{}{}{}", no_target, anim_clr, scale);
        let (seq, sink) = parse(&main_sequence(&click_group(3, "0", &behaviors)));

        assert!(seq.success);
        assert_eq!(seq.animations.len(), 1);
        let AnimationNode::Effect(grow) = &seq.animations[0] else { panic!("expected effect") };
        assert_eq!(grow.effect_name, "grow");
        assert_eq!(grow.category, AnimationCategory::Emphasis);

        let dropped = sink.of_kind(DiagnosticKind::DroppedAnimation);
        assert_eq!(dropped.len(), 1);
        assert_eq!(dropped[0].slide_number, Some(1));
        assert_eq!(sink.of_kind(DiagnosticKind::UnsupportedBehavior).len(), 1);
    }

    #[test]
    fn test_malformed_timing_fails() {
        let (seq, sink) = parse("<p:timing><p:tnLst><p:par><p:cTn id=\"1\"></p:par></p:tnLst></p:timing>");
        assert!(!seq.success);
        assert!(seq.animations.is_empty());
        assert!(seq.error.is_some());
        assert_eq!(sink.of_kind(DiagnosticKind::AnimationParseFailure).len(), 1);
    }

    #[test]
    fn test_depth_cap_fails() {
        let mut xml = anim_effect(999, 2, "in", "fade", Some("500"), "");
        for i in 0..60 {
            xml = format!(r#"<p:par><p:cTn id="{}"><p:childTnLst>{}</p:childTnLst></p:cTn></p:par>"#, i + 1, xml);
        }
        let (seq, _) = parse(&format!("<p:timing><p:tnLst>{}</p:tnLst></p:timing>", xml));
        assert!(!seq.success);
        assert!(seq.error.unwrap().contains("50"));

        let sink = CollectingSink::new();
        let relaxed = parse_animations_xml(
            slide_xml("", &format!("<p:timing><p:tnLst>{}</p:tnLst></p:timing>", xml)).as_bytes(),
            1,
            &AnimationOptions::default().with_max_depth(100),
            &sink,
        );
        assert!(relaxed.success);
        assert_eq!(relaxed.animations.len(), 1);
    }

    #[test]
    fn test_behavior_outside_sequence() {
        let timing = format!(
            "<p:timing><p:tnLst><p:par><p:cTn id=\"1\" nodeType=\"tmRoot\"><p:childTnLst>{}</p:childTnLst></p:cTn></p:par></p:tnLst></p:timing>",
            anim_effect(5, 3, "in", "appear", Some("1"), "")
        );
        let (seq, _) = parse(&timing);
        assert_eq!(seq.animations.len(), 1);
        assert_eq!(seq.animations[0].common().position.sequence, 0);
        assert_eq!(seq.animations[0].common().effect_name, "appear");
    }
}
