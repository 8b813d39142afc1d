//! Keyboard polling.
//!
//! [`poll_keyboard`] reads raylib's key state into an [`InputState`]. The
//! game loop calls it once per frame before handing the state to the
//! active scene.
use raylib::prelude::RaylibHandle;

use crate::resources::input::InputState;

pub fn poll_keyboard(rl: &RaylibHandle, input: &mut InputState) {
    for state in input.states_mut() {
        let down = rl.is_key_down(state.key_binding);
        state.update(down);
    }
}
