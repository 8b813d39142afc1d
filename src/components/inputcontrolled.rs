//! Marker for entities steered by the keyboard.
//!
//! The [`input_direction`](crate::systems::inputdirection::input_direction)
//! system writes the pressed direction into the entity's
//! [`Movement`](crate::components::movement::Movement).

use bevy_ecs::prelude::Component;

#[derive(Component, Clone, Copy, Debug, Default)]
pub struct InputControlled;
