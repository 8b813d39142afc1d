//! Per-entity signal storage.
//!
//! Systems publish small facts about an entity here (`moving`, `facing_x`,
//! `animation_ended`, ...) and other systems, mostly the animation state
//! machine, read them back through [`Condition`](crate::components::animation::Condition).

use bevy_ecs::prelude::Component;
use rustc_hash::{FxHashMap, FxHashSet};

#[derive(Debug, Clone, Default, Component)]
pub struct Signals {
    scalars: FxHashMap<String, f32>,
    integers: FxHashMap<String, i32>,
    flags: FxHashSet<String>,
}

impl Signals {
    pub fn set_scalar(&mut self, key: &str, value: f32) {
        if let Some(v) = self.scalars.get_mut(key) {
            *v = value;
        } else {
            self.scalars.insert(key.to_owned(), value);
        }
    }
    pub fn scalar(&self, key: &str) -> Option<f32> {
        self.scalars.get(key).copied()
    }

    pub fn set_integer(&mut self, key: &str, value: i32) {
        if let Some(v) = self.integers.get_mut(key) {
            *v = value;
        } else {
            self.integers.insert(key.to_owned(), value);
        }
    }
    pub fn integer(&self, key: &str) -> Option<i32> {
        self.integers.get(key).copied()
    }

    pub fn set_flag(&mut self, key: &str) {
        if !self.flags.contains(key) {
            self.flags.insert(key.to_owned());
        }
    }
    pub fn clear_flag(&mut self, key: &str) {
        self.flags.remove(key);
    }
    /// Set or clear `key` depending on `on`.
    pub fn put_flag(&mut self, key: &str, on: bool) {
        if on {
            self.set_flag(key);
        } else {
            self.clear_flag(key);
        }
    }
    pub fn has_flag(&self, key: &str) -> bool {
        self.flags.contains(key)
    }

    pub fn flags(&self) -> impl Iterator<Item = &str> {
        self.flags.iter().map(String::as_str)
    }
}
