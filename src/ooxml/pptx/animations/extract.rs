//! Flattening of the timing tree into normalized animation nodes.
use super::model::{
    AnimationCategory, AnimationCommon, AnimationNode, Direction, Easing, FillMode, Iterations, StepPosition,
};
use super::tables::{map_effect, map_fill};
use super::tree::{Behavior, BehaviorKind, CommonTimeNode, TimeNode};
use crate::common::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink};
use std::collections::BTreeMap;

/// Duration used when a behavior has no finite `dur`.
pub const DEFAULT_DURATION_MS: u64 = 1000;

/// Inherited state while descending the tree.
#[derive(Clone, Copy, Default)]
struct Scope<'t> {
    fill: Option<&'t str>,
    /// Nearest ancestor `cTn` carrying preset attributes
    preset: Option<&'t CommonTimeNode>,
    position: StepPosition,
    in_sequence: bool,
}

impl<'t> Scope<'t> {
    fn enter(&self, ctn: &'t CommonTimeNode) -> Self {
        let mut next = *self;
        if let Some(fill) = ctn.fill.as_deref() {
            next.fill = Some(fill);
        }
        if ctn.preset_class.is_some() {
            next.preset = Some(ctn);
        }
        next.position.start_delay_ms += ctn.delay_ms();
        next
    }
}

pub(crate) struct Extractor<'s> {
    slide_number: u32,
    sink: &'s dyn DiagnosticSink,
    nodes: Vec<AnimationNode>,
    next_sequence: u32,
    ordinal: u32,
}

impl<'s> Extractor<'s> {
    pub(crate) fn new(slide_number: u32, sink: &'s dyn DiagnosticSink) -> Self {
        Self {
            slide_number,
            sink,
            nodes: Vec::new(),
            next_sequence: 0,
            ordinal: 0,
        }
    }

    /// Walk the roots of a `tnLst` in document order.
    pub(crate) fn extract(mut self, roots: &[TimeNode]) -> Vec<AnimationNode> {
        let scope = Scope::default();
        for node in roots {
            self.walk(node, &scope);
        }
        self.nodes
    }

    fn walk<'t>(&mut self, node: &'t TimeNode, scope: &Scope<'t>) {
        match node {
            TimeNode::Seq(seq) if !scope.in_sequence => {
                let mut inner = scope.enter(&seq.ctn);
                inner.in_sequence = true;
                inner.position = StepPosition {
                    sequence: self.next_sequence,
                    step: 0,
                    start_delay_ms: 0,
                };
                self.next_sequence += 1;

                for (step, child) in seq.children.iter().enumerate() {
                    let mut step_scope = inner;
                    step_scope.position.step = step as u32;
                    self.walk(child, &step_scope);
                }
            },
            TimeNode::Par(c) | TimeNode::Seq(c) | TimeNode::Excl(c) => {
                let inner = scope.enter(&c.ctn);
                for child in &c.children {
                    self.walk(child, &inner);
                }
            },
            TimeNode::Behavior(b) => {
                self.ordinal += 1;
                if let Some(node) = self.convert(b, scope) {
                    self.nodes.push(node);
                }
            },
        }
    }

    fn convert(&self, b: &Behavior, scope: &Scope<'_>) -> Option<AnimationNode> {
        match b.kind {
            BehaviorKind::AnimEffect
            | BehaviorKind::AnimMotion
            | BehaviorKind::Set
            | BehaviorKind::AnimScale
            | BehaviorKind::AnimRot => {},
            other => {
                self.sink.emit(
                    Diagnostic::debug(
                        DiagnosticKind::UnsupportedBehavior,
                        format!("skipping {} behavior {}", other.as_str(), self.node_id(&b.ctn)),
                    )
                    .for_slide(self.slide_number),
                );
                return None;
            },
        }

        let Some(element_id) = b.target.clone() else {
            self.sink.emit(
                Diagnostic::warning(
                    DiagnosticKind::DroppedAnimation,
                    format!("{} behavior {} has no shape target", b.kind.as_str(), self.node_id(&b.ctn)),
                )
                .for_slide(self.slide_number),
            );
            return None;
        };

        let mut common = AnimationCommon {
            id: self.node_id(&b.ctn),
            element_id,
            category: AnimationCategory::Emphasis,
            effect_name: String::new(),
            duration_ms: parse_duration(b.ctn.dur.as_deref()),
            delay_ms: 0,
            easing: Easing::from_accel_decel(b.ctn.accel, b.ctn.decel),
            iterations: parse_iterations(b.ctn.repeat_count.as_deref()),
            direction: if b.ctn.auto_rev {
                Direction::Alternate
            } else {
                Direction::Normal
            },
            fill_mode: map_fill(b.ctn.fill.as_deref().or(scope.fill)),
            custom_properties: base_properties(b, scope),
            position: StepPosition {
                start_delay_ms: scope.position.start_delay_ms + b.ctn.delay_ms(),
                ..scope.position
            },
        };

        Some(match b.kind {
            BehaviorKind::AnimMotion => {
                common.category = AnimationCategory::Motion;
                common.effect_name = "path".to_string();
                common.easing = Easing::Linear;
                common.fill_mode = FillMode::Forwards;
                for key in ["origin", "path", "pathEditMode"] {
                    if let Some(v) = b.attrs.get(key) {
                        common.custom_properties.insert(key.to_string(), v.clone());
                    }
                }
                AnimationNode::Motion(common)
            },
            BehaviorKind::Set => {
                common.effect_name = "set".to_string();
                common.duration_ms = 0;
                common.fill_mode = FillMode::Both;
                if let Some(name) = b.attr_names.first() {
                    common.custom_properties.insert("attributeName".to_string(), name.clone());
                }
                if let Some(value) = &b.to_value {
                    common.custom_properties.insert("value".to_string(), value.clone());
                }
                AnimationNode::Set(common)
            },
            BehaviorKind::AnimScale => {
                common.effect_name = "grow".to_string();
                AnimationNode::Effect(common)
            },
            BehaviorKind::AnimRot => {
                common.effect_name = "spin".to_string();
                if let Some(by) = b.attrs.get("by") {
                    common.custom_properties.insert("by".to_string(), by.clone());
                }
                AnimationNode::Effect(common)
            },
            _ => {
                let transition = b.attrs.get("transition").map(String::as_str);
                let filter = b.attrs.get("filter").map(String::as_str);
                let (category, name) = map_effect(transition, filter);
                common.category = category;
                common.effect_name = name.to_string();
                if let Some(filter) = filter {
                    common.custom_properties.insert("filter".to_string(), filter.to_string());
                }
                if let Some(transition) = transition {
                    common.custom_properties.insert("transition".to_string(), transition.to_string());
                }
                AnimationNode::Effect(common)
            },
        })
    }

    fn node_id(&self, ctn: &CommonTimeNode) -> String {
        match ctn.id {
            Some(id) => format!("s{}-n{}", self.slide_number, id),
            None => format!("s{}-x{}", self.slide_number, self.ordinal),
        }
    }
}

fn base_properties(b: &Behavior, scope: &Scope<'_>) -> BTreeMap<String, String> {
    let mut props = BTreeMap::new();
    props.insert("behavior".to_string(), b.kind.as_str().to_string());
    if let Some(preset) = scope.preset {
        let fields = [
            ("presetClass", &preset.preset_class),
            ("presetId", &preset.preset_id),
            ("presetSubtype", &preset.preset_subtype),
        ];
        for (key, value) in fields {
            if let Some(v) = value {
                props.insert(key.to_string(), v.clone());
            }
        }
    }
    props
}

/// `cTn/@dur` in ms; absent, `indefinite` or unparsable gives the default.
pub fn parse_duration(dur: Option<&str>) -> u64 {
    dur.and_then(|d| d.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_DURATION_MS)
}

/// `cTn/@repeatCount` in thousandths.
pub fn parse_iterations(repeat_count: Option<&str>) -> Iterations {
    match repeat_count.map(str::trim) {
        Some("indefinite") => Iterations::Infinite,
        Some(raw) => match raw.parse::<f64>() {
            Ok(n) if n > 0.0 => Iterations::Count(n / 1000.0),
            _ => Iterations::default(),
        },
        None => Iterations::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration(Some("500")), 500);
        assert_eq!(parse_duration(None), DEFAULT_DURATION_MS);
        assert_eq!(parse_duration(Some("indefinite")), DEFAULT_DURATION_MS);
        assert_eq!(parse_duration(Some("fast")), DEFAULT_DURATION_MS);
    }

    #[test]
    fn test_parse_iterations() {
        assert_eq!(parse_iterations(Some("2000")), Iterations::Count(2.0));
        assert_eq!(parse_iterations(Some("1500")), Iterations::Count(1.5));
        assert_eq!(parse_iterations(Some("indefinite")), Iterations::Infinite);
        assert_eq!(parse_iterations(Some("0")), Iterations::Count(1.0));
        assert_eq!(parse_iterations(None), Iterations::Count(1.0));
    }
}
