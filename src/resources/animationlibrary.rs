//! Registry of reusable animation clips.
//!
//! Clips are shared by every entity that plays them; per-entity playback
//! lives in [`Animation`](crate::components::animation::Animation).

use bevy_ecs::prelude::Resource;
use rustc_hash::FxHashMap;

use crate::resources::assets::SpriteFrame;

/// One animation clip.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationDef {
    pub name: String,
    pub frames: Vec<SpriteFrame>,
    /// Index of the first frame played.
    pub first_frame: usize,
    /// Index of the last frame played, inclusive.
    pub last_frame: usize,
    /// Seconds each frame stays on screen.
    pub frame_time: f32,
    pub looped: bool,
}

impl AnimationDef {
    /// A clip playing every frame in `frames`. Returns `None` for an empty
    /// frame list.
    pub fn from_frames(
        name: impl Into<String>,
        frames: Vec<SpriteFrame>,
        frame_time: f32,
        looped: bool,
    ) -> Option<Self> {
        let last_frame = frames.len().checked_sub(1)?;
        Some(Self {
            name: name.into(),
            frames,
            first_frame: 0,
            last_frame,
            frame_time,
            looped,
        })
    }
}

#[derive(Resource, Debug, Default)]
pub struct AnimationLibrary {
    clips: FxHashMap<String, AnimationDef>,
}

impl AnimationLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `def` under its own name, replacing any clip with that name.
    pub fn add(&mut self, def: AnimationDef) {
        self.clips.insert(def.name.clone(), def);
    }

    pub fn get(&self, name: &str) -> Option<&AnimationDef> {
        self.clips.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.clips.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.clips.keys().map(String::as_str)
    }
}
