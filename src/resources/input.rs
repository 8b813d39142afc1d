//! Per-frame keyboard input resource.
//!
//! [`InputState`] holds the keys the engine cares about. WASD and the arrow
//! keys both steer; Space and Enter are the two action buttons; F11 toggles
//! debug drawing. The game loop fills it from raylib every frame, tests fill
//! it by hand.
use bevy_ecs::prelude::*;
use raylib::prelude::KeyboardKey;

use crate::geom::Vec2I;

/// Boolean key state with an associated keyboard binding.
#[derive(Debug, Clone, Copy)]
pub struct BoolState {
    pub active: bool,
    pub just_pressed: bool,
    pub just_released: bool,
    pub key_binding: KeyboardKey,
}

impl BoolState {
    pub fn bound(key: KeyboardKey) -> Self {
        Self {
            active: false,
            just_pressed: false,
            just_released: false,
            key_binding: key,
        }
    }

    /// Feed the current "is down" reading; edges are derived from the
    /// previous one.
    pub fn update(&mut self, down: bool) {
        self.just_pressed = down && !self.active;
        self.just_released = !down && self.active;
        self.active = down;
    }
}

impl Default for BoolState {
    fn default() -> Self {
        Self::bound(KeyboardKey::KEY_NULL)
    }
}

#[derive(Resource, Debug, Clone)]
pub struct InputState {
    pub maindirection_up: BoolState,
    pub maindirection_left: BoolState,
    pub maindirection_down: BoolState,
    pub maindirection_right: BoolState,
    // Arrow keys
    pub secondarydirection_up: BoolState,
    pub secondarydirection_down: BoolState,
    pub secondarydirection_left: BoolState,
    pub secondarydirection_right: BoolState,
    pub action_back: BoolState,
    pub action_1: BoolState,
    pub action_2: BoolState,
    pub mode_debug: BoolState,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            maindirection_up: BoolState::bound(KeyboardKey::KEY_W),
            maindirection_left: BoolState::bound(KeyboardKey::KEY_A),
            maindirection_down: BoolState::bound(KeyboardKey::KEY_S),
            maindirection_right: BoolState::bound(KeyboardKey::KEY_D),
            secondarydirection_up: BoolState::bound(KeyboardKey::KEY_UP),
            secondarydirection_down: BoolState::bound(KeyboardKey::KEY_DOWN),
            secondarydirection_left: BoolState::bound(KeyboardKey::KEY_LEFT),
            secondarydirection_right: BoolState::bound(KeyboardKey::KEY_RIGHT),
            action_back: BoolState::bound(KeyboardKey::KEY_ESCAPE),
            action_1: BoolState::bound(KeyboardKey::KEY_SPACE),
            action_2: BoolState::bound(KeyboardKey::KEY_ENTER),
            mode_debug: BoolState::bound(KeyboardKey::KEY_F11),
        }
    }
}

impl InputState {
    /// All bindings, for polling.
    pub fn states_mut(&mut self) -> [&mut BoolState; 12] {
        [
            &mut self.maindirection_up,
            &mut self.maindirection_left,
            &mut self.maindirection_down,
            &mut self.maindirection_right,
            &mut self.secondarydirection_up,
            &mut self.secondarydirection_down,
            &mut self.secondarydirection_left,
            &mut self.secondarydirection_right,
            &mut self.action_back,
            &mut self.action_1,
            &mut self.action_2,
            &mut self.mode_debug,
        ]
    }

    /// Held direction from WASD or the arrows. Opposite keys cancel out.
    pub fn direction(&self) -> Vec2I {
        let up = self.maindirection_up.active || self.secondarydirection_up.active;
        let down = self.maindirection_down.active || self.secondarydirection_down.active;
        let left = self.maindirection_left.active || self.secondarydirection_left.active;
        let right = self.maindirection_right.active || self.secondarydirection_right.active;
        Vec2I::new(
            i32::from(right) - i32::from(left),
            i32::from(down) - i32::from(up),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boolstate_edges() {
        let mut bs = BoolState::default();
        bs.update(true);
        assert!(bs.active && bs.just_pressed && !bs.just_released);
        bs.update(true);
        assert!(bs.active && !bs.just_pressed);
        bs.update(false);
        assert!(!bs.active && bs.just_released);
    }

    #[test]
    fn test_default_key_bindings() {
        let input = InputState::default();
        assert_eq!(input.maindirection_up.key_binding, KeyboardKey::KEY_W);
        assert_eq!(input.secondarydirection_left.key_binding, KeyboardKey::KEY_LEFT);
        assert_eq!(input.action_1.key_binding, KeyboardKey::KEY_SPACE);
        assert_eq!(input.action_2.key_binding, KeyboardKey::KEY_ENTER);
        assert_eq!(input.mode_debug.key_binding, KeyboardKey::KEY_F11);
    }

    #[test]
    fn test_direction_combines_wasd_and_arrows() {
        let mut input = InputState::default();
        assert_eq!(input.direction(), Vec2I::ZERO);
        input.maindirection_up.active = true;
        input.secondarydirection_right.active = true;
        assert_eq!(input.direction(), Vec2I::new(1, -1));
        input.maindirection_down.active = true;
        assert_eq!(input.direction(), Vec2I::new(1, 0));
    }
}
