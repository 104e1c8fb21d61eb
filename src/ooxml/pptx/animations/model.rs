//! Normalized animation model.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Broad class of an animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationCategory {
    Entrance,
    Exit,
    Emphasis,
    Motion,
}

/// Timing curve of an animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl Easing {
    /// Derive the curve from `accel`/`decel` (any positive value counts).
    pub fn from_accel_decel(accel: i64, decel: i64) -> Self {
        match (accel > 0, decel > 0) {
            (true, true) => Easing::EaseInOut,
            (true, false) => Easing::EaseIn,
            (false, true) => Easing::EaseOut,
            (false, false) => Easing::Linear,
        }
    }
}

/// What the target looks like outside the active interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillMode {
    None,
    #[default]
    Forwards,
    Both,
}

/// Repeat count of an animation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Iterations {
    Count(f64),
    Infinite,
}

impl Default for Iterations {
    fn default() -> Self {
        Iterations::Count(1.0)
    }
}

/// Playback direction of repeated iterations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Normal,
    Alternate,
}

/// Where a node sits in the slide's build order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepPosition {
    /// Index of the enclosing top-level sequence; 0 outside any sequence
    pub sequence: u32,
    /// Index of the step (click group) within the sequence
    pub step: u32,
    /// Sum of the numeric start delays between the step and the node
    pub start_delay_ms: u64,
}

/// Fields shared by every animation variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationCommon {
    /// `s{slide}-n{cTn id}`, or `s{slide}-x{ordinal}` when the behavior has no id
    pub id: String,
    /// Shape id (`spid`) of the animated element
    pub element_id: String,
    pub category: AnimationCategory,
    pub effect_name: String,
    pub duration_ms: u64,
    pub delay_ms: u64,
    pub easing: Easing,
    pub iterations: Iterations,
    pub direction: Direction,
    pub fill_mode: FillMode,
    pub custom_properties: BTreeMap<String, String>,
    pub position: StepPosition,
}

/// One normalized animation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AnimationNode {
    /// Visual effect: entrance, exit or emphasis
    Effect(AnimationCommon),
    /// Motion path
    Motion(AnimationCommon),
    /// Instant property set, e.g. visibility
    Set(AnimationCommon),
}

impl AnimationNode {
    pub fn common(&self) -> &AnimationCommon {
        match self {
            AnimationNode::Effect(c) | AnimationNode::Motion(c) | AnimationNode::Set(c) => c,
        }
    }

    /// Variant name as it appears on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            AnimationNode::Effect(_) => "effect",
            AnimationNode::Motion(_) => "motion",
            AnimationNode::Set(_) => "set",
        }
    }

    /// `delay_ms + duration_ms`.
    #[inline]
    pub fn end_ms(&self) -> u64 {
        let c = self.common();
        c.delay_ms + c.duration_ms
    }
}

/// Animations of one slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationSequence {
    pub slide_number: u32,
    /// `max(delay_ms + duration_ms)` over the animations, 0 when empty
    pub total_duration_ms: u64,
    pub animations: Vec<AnimationNode>,
    pub success: bool,
    pub error: Option<String>,
}

impl AnimationSequence {
    /// A successful sequence over `animations`.
    pub fn new(slide_number: u32, animations: Vec<AnimationNode>) -> Self {
        let total_duration_ms = animations.iter().map(AnimationNode::end_ms).max().unwrap_or(0);
        Self {
            slide_number,
            total_duration_ms,
            animations,
            success: true,
            error: None,
        }
    }

    /// A successful sequence without animations.
    pub fn empty(slide_number: u32) -> Self {
        Self::new(slide_number, Vec::new())
    }

    /// A failed sequence; never carries partial animations.
    pub fn failed(slide_number: u32, message: impl Into<String>) -> Self {
        Self {
            slide_number,
            total_duration_ms: 0,
            animations: Vec::new(),
            success: false,
            error: Some(message.into()),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(duration_ms: u64) -> AnimationNode {
        AnimationNode::Effect(AnimationCommon {
            id: "s1-n5".into(),
            element_id: "4".into(),
            category: AnimationCategory::Entrance,
            effect_name: "fadeIn".into(),
            duration_ms,
            delay_ms: 0,
            easing: Easing::Linear,
            iterations: Iterations::default(),
            direction: Direction::Normal,
            fill_mode: FillMode::Forwards,
            custom_properties: BTreeMap::new(),
            position: StepPosition::default(),
        })
    }

    #[test]
    fn test_easing_truth_table() {
        assert_eq!(Easing::from_accel_decel(50000, 50000), Easing::EaseInOut);
        assert_eq!(Easing::from_accel_decel(50000, 0), Easing::EaseIn);
        assert_eq!(Easing::from_accel_decel(0, 100000), Easing::EaseOut);
        assert_eq!(Easing::from_accel_decel(0, 0), Easing::Linear);
        assert_eq!(Easing::from_accel_decel(-5, 0), Easing::Linear);
    }

    #[test]
    fn test_total_duration() {
        let seq = AnimationSequence::new(1, vec![node(500), node(1200)]);
        assert_eq!(seq.total_duration_ms, 1200);
        assert!(seq.success);

        let empty = AnimationSequence::empty(2);
        assert_eq!(empty.total_duration_ms, 0);
        assert!(empty.success && empty.is_empty());

        let failed = AnimationSequence::failed(3, "bad timing");
        assert!(!failed.success);
        assert_eq!(failed.error.as_deref(), Some("bad timing"));
    }

    #[test]
    fn test_wire_format() {
        let json = serde_json::to_value(node(500)).unwrap();
        assert_eq!(json["type"], "effect");
        assert_eq!(json["effectName"], "fadeIn");
        assert_eq!(json["easing"], "linear");
        assert_eq!(json["fillMode"], "forwards");
        assert_eq!(json["position"]["startDelayMs"], 0);

        assert_eq!(serde_json::to_value(Easing::EaseInOut).unwrap(), "ease-in-out");
        assert_eq!(serde_json::to_value(Iterations::Infinite).unwrap(), "infinite");
    }
}
