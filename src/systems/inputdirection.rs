//! Keyboard steering.
//!
//! Copies the held direction from [`InputState`] into the
//! [`Movement`] of every [`InputControlled`] entity. Opposite keys cancel;
//! diagonal speed is normalised later by the movement system.
use bevy_ecs::prelude::*;

use crate::components::inputcontrolled::InputControlled;
use crate::components::movement::Movement;
use crate::resources::input::InputState;

pub fn input_direction(
    mut query: Query<&mut Movement, With<InputControlled>>,
    input_state: Res<InputState>,
) {
    let dir = input_state.direction();
    for mut movement in query.iter_mut() {
        movement.desired_dir = dir;
    }
}
