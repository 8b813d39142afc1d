//! Animation playback state and the state machine that picks clips.
//!
//! - [`Animation`] is the per-entity playback cursor into a clip of the
//!   [`AnimationLibrary`].
//! - [`Condition`] is a small data-driven predicate language over
//!   [`Signals`].
//! - [`AnimationStateMachine`] holds prioritised transitions between named
//!   states and turns a state plus facing into a clip name. It is immutable
//!   and shared between entities through an `Arc`.
//! - [`AnimationController`] stores the per-entity current state.

use std::sync::Arc;

use bevy_ecs::prelude::Component;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::components::signals::Signals;
use crate::geom::Vec2I;
use crate::resources::animationlibrary::AnimationLibrary;
use crate::resources::assets::SpriteFrame;

/// Raised on [`Signals`] when a non-looping clip reaches its last frame.
pub const ANIMATION_ENDED: &str = "animation_ended";

#[derive(Debug, Clone, Component, PartialEq)]
pub struct Animation {
    /// Clip key in the [`AnimationLibrary`].
    pub clip: String,
    /// Index into the clip's frames.
    pub frame: usize,
    pub elapsed: f32,
    pub playing: bool,
    /// Set when a non-looping clip has shown its last frame.
    pub finished: bool,
}

impl Animation {
    pub fn new(clip: impl Into<String>) -> Self {
        Self {
            clip: clip.into(),
            frame: 0,
            elapsed: 0.0,
            playing: true,
            finished: false,
        }
    }

    /// Restart playback on `clip` at `first_frame`.
    pub fn play(&mut self, clip: impl Into<String>, first_frame: usize) {
        self.clip = clip.into();
        self.frame = first_frame;
        self.elapsed = 0.0;
        self.playing = true;
        self.finished = false;
    }

    /// Frame to draw, `None` if the clip is not in the library.
    pub fn current_frame<'a>(&self, library: &'a AnimationLibrary) -> Option<&'a SpriteFrame> {
        library.get(&self.clip)?.frames.get(self.frame)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CmpOp {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl CmpOp {
    fn ints(self, a: i32, b: i32) -> bool {
        match self {
            CmpOp::Lt => a < b,
            CmpOp::Le => a <= b,
            CmpOp::Gt => a > b,
            CmpOp::Ge => a >= b,
            CmpOp::Eq => a == b,
            CmpOp::Ne => a != b,
        }
    }

    fn floats(self, a: f32, b: f32) -> bool {
        match self {
            CmpOp::Lt => a < b,
            CmpOp::Le => a <= b,
            CmpOp::Gt => a > b,
            CmpOp::Ge => a >= b,
            CmpOp::Eq => (a - b).abs() < f32::EPSILON,
            CmpOp::Ne => (a - b).abs() >= f32::EPSILON,
        }
    }
}

/// Predicate over an entity's [`Signals`]. A comparison against a missing
/// key is false.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Condition {
    Always,
    ScalarCmp {
        key: String,
        op: CmpOp,
        value: f32,
    },
    ScalarRange {
        key: String,
        min: f32,
        max: f32,
        inclusive: bool,
    },
    IntegerCmp {
        key: String,
        op: CmpOp,
        value: i32,
    },
    IntegerRange {
        key: String,
        min: i32,
        max: i32,
        inclusive: bool,
    },
    HasFlag {
        key: String,
    },
    LacksFlag {
        key: String,
    },
    All(Vec<Condition>),
    Any(Vec<Condition>),
    Not(Box<Condition>),
}

impl Condition {
    pub fn flag(key: &str) -> Self {
        Condition::HasFlag {
            key: key.to_owned(),
        }
    }

    pub fn no_flag(key: &str) -> Self {
        Condition::LacksFlag {
            key: key.to_owned(),
        }
    }

    pub fn int(key: &str, op: CmpOp, value: i32) -> Self {
        Condition::IntegerCmp {
            key: key.to_owned(),
            op,
            value,
        }
    }

    pub fn is_met(&self, signals: &Signals) -> bool {
        match self {
            Condition::Always => true,
            Condition::ScalarCmp { key, op, value } => signals
                .scalar(key)
                .is_some_and(|v| op.floats(v, *value)),
            Condition::ScalarRange {
                key,
                min,
                max,
                inclusive,
            } => signals.scalar(key).is_some_and(|v| {
                if *inclusive {
                    v >= *min && v <= *max
                } else {
                    v > *min && v < *max
                }
            }),
            Condition::IntegerCmp { key, op, value } => signals
                .integer(key)
                .is_some_and(|v| op.ints(v, *value)),
            Condition::IntegerRange {
                key,
                min,
                max,
                inclusive,
            } => signals.integer(key).is_some_and(|v| {
                if *inclusive {
                    v >= *min && v <= *max
                } else {
                    v > *min && v < *max
                }
            }),
            Condition::HasFlag { key } => signals.has_flag(key),
            Condition::LacksFlag { key } => !signals.has_flag(key),
            Condition::All(conditions) => conditions.iter().all(|c| c.is_met(signals)),
            Condition::Any(conditions) => conditions.iter().any(|c| c.is_met(signals)),
            Condition::Not(c) => !c.is_met(signals),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub to: String,
    pub when: Condition,
    pub priority: i32,
}

/// How a state name becomes a clip key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClipNaming {
    /// `{state}_{left|right|up|down}` from the facing direction.
    #[default]
    Directional,
    /// The state name itself.
    StateName,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationStateMachine {
    initial: String,
    transitions: FxHashMap<String, Vec<Transition>>,
    naming: ClipNaming,
    /// States that always play the same clip regardless of facing.
    fixed_clips: FxHashMap<String, String>,
}

impl AnimationStateMachine {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            initial: initial.into(),
            transitions: FxHashMap::default(),
            naming: ClipNaming::default(),
            fixed_clips: FxHashMap::default(),
        }
    }

    pub fn with_naming(mut self, naming: ClipNaming) -> Self {
        self.naming = naming;
        self
    }

    /// Play `clip` for `state` whatever the facing direction.
    pub fn with_fixed_clip(mut self, state: impl Into<String>, clip: impl Into<String>) -> Self {
        self.fixed_clips.insert(state.into(), clip.into());
        self
    }

    pub fn with_transition(
        mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        when: Condition,
        priority: i32,
    ) -> Self {
        self.add_transition(from, to, when, priority);
        self
    }

    pub fn add_transition(
        &mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        when: Condition,
        priority: i32,
    ) -> &mut Self {
        self.transitions
            .entry(from.into())
            .or_default()
            .push(Transition {
                to: to.into(),
                when,
                priority,
            });
        self
    }

    pub fn initial(&self) -> &str {
        &self.initial
    }

    pub fn naming(&self) -> ClipNaming {
        self.naming
    }

    pub fn transitions_from(&self, state: &str) -> &[Transition] {
        self.transitions.get(state).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The state to move to from `current`, if any transition fires.
    ///
    /// The satisfied transition with the highest priority wins; on equal
    /// priority the one added first wins.
    pub fn next_state(&self, current: &str, signals: &Signals) -> Option<&str> {
        let mut best: Option<&Transition> = None;
        for t in self.transitions_from(current) {
            if !t.when.is_met(signals) {
                continue;
            }
            if best.is_none_or(|b| t.priority > b.priority) {
                best = Some(t);
            }
        }
        best.map(|t| t.to.as_str())
    }

    /// Clip key for `state` seen facing `facing`, optionally prefixed with
    /// `{prefix}_`.
    pub fn clip_name(&self, state: &str, facing: Vec2I, prefix: Option<&str>) -> String {
        let base = match self.fixed_clips.get(state) {
            Some(clip) => clip.clone(),
            None => match self.naming {
                ClipNaming::Directional => format!("{state}_{}", direction_name(facing)),
                ClipNaming::StateName => state.to_owned(),
            },
        };
        match prefix {
            Some(p) if !p.is_empty() => format!("{p}_{base}"),
            _ => base,
        }
    }
}

/// Horizontal facing wins over vertical; no facing reads as "down".
pub fn direction_name(facing: Vec2I) -> &'static str {
    if facing.x < 0 {
        "left"
    } else if facing.x > 0 {
        "right"
    } else if facing.y < 0 {
        "up"
    } else {
        "down"
    }
}

/// Per-entity state of a shared [`AnimationStateMachine`].
#[derive(Debug, Clone, Component)]
pub struct AnimationController {
    pub machine: Arc<AnimationStateMachine>,
    pub current_state: String,
    pub prefix: Option<String>,
}

impl AnimationController {
    pub fn new(machine: Arc<AnimationStateMachine>) -> Self {
        let current_state = machine.initial().to_owned();
        Self {
            machine,
            current_state,
            prefix: None,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Advance one transition step and return the clip that should play.
    pub fn step(&mut self, signals: &Signals) -> String {
        if let Some(next) = self.machine.next_state(&self.current_state, signals) {
            if next != self.current_state {
                self.current_state = next.to_owned();
            }
        }
        let facing = Vec2I::new(
            signals.integer("facing_x").unwrap_or(0),
            signals.integer("facing_y").unwrap_or(0),
        );
        self.machine
            .clip_name(&self.current_state, facing, self.prefix.as_deref())
    }
}
