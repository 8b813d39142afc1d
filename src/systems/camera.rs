//! Camera follow system.

use bevy_ecs::prelude::*;

use crate::components::boxcollider::BoxCollider;
use crate::components::cameratarget::CameraTarget;
use crate::components::mapposition::MapPosition;
use crate::resources::camera::Camera;

/// Centre the [`Camera`] on the first [`CameraTarget`].
///
/// The collider centre is used when the target has one, otherwise its
/// position.
pub fn camera_follow(
    query: Query<(&MapPosition, Option<&BoxCollider>), With<CameraTarget>>,
    camera: Option<ResMut<Camera>>,
) {
    let Some(mut camera) = camera else {
        return;
    };
    if let Some((position, collider)) = query.iter().next() {
        let focus = match collider {
            Some(c) => c.center(position.pos),
            None => position.pos,
        };
        camera.centre_on(focus);
    }
}
