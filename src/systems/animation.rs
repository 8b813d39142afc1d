//! Animation systems.
//!
//! - [`animation_controller`] runs each entity's
//!   [`AnimationController`] against its [`Signals`] and switches the
//!   [`Animation`] clip when the resulting clip name changes.
//! - [`animation`] advances playback time and steps frames.
//!
//! Run the controller first so a clip switch and the first frame of the new
//! clip land in the same tick.

use bevy_ecs::prelude::*;
use log::{debug, warn};

use crate::components::animation::{ANIMATION_ENDED, Animation, AnimationController};
use crate::components::signals::Signals;
use crate::resources::animationlibrary::AnimationLibrary;
use crate::resources::worldtime::WorldTime;

/// Pick the clip for every controlled entity.
///
/// A clip missing from the library stops playback so the sprite fallback is
/// drawn; an existing clip restarts at its first frame.
pub fn animation_controller(
    mut query: Query<(Entity, &mut AnimationController, &mut Animation, &mut Signals)>,
    library: Res<AnimationLibrary>,
) {
    for (entity, mut controller, mut anim, mut signals) in query.iter_mut() {
        let clip = controller.step(&signals);
        if clip == anim.clip {
            continue;
        }
        signals.clear_flag(ANIMATION_ENDED);
        match library.get(&clip) {
            Some(def) => {
                debug!("{:?}: {} -> {}", entity, anim.clip, clip);
                anim.play(clip, def.first_frame);
            }
            None => {
                warn!("{:?}: animation '{}' not found, using sprite fallback", entity, clip);
                anim.clip = clip;
                anim.frame = 0;
                anim.elapsed = 0.0;
                anim.playing = false;
                anim.finished = false;
            }
        }
    }
}

/// Advance playback of every playing [`Animation`].
///
/// At the end of a looping clip playback wraps to the first frame. A
/// non-looping clip holds its last frame, stops, sets `finished` and raises
/// the `animation_ended` signal flag.
pub fn animation(
    mut query: Query<(&mut Animation, Option<&mut Signals>)>,
    library: Res<AnimationLibrary>,
    time: Res<WorldTime>,
) {
    for (mut anim, mut maybe_signals) in query.iter_mut() {
        if !anim.playing {
            continue;
        }
        let Some(def) = library.get(&anim.clip) else {
            continue;
        };
        if def.frame_time <= 0.0 {
            continue;
        }

        anim.elapsed += time.delta;
        while anim.playing && anim.elapsed >= def.frame_time {
            anim.elapsed -= def.frame_time;
            if anim.frame < def.last_frame {
                anim.frame += 1;
            } else if def.looped {
                anim.frame = def.first_frame;
            } else {
                anim.frame = def.last_frame;
                anim.elapsed = 0.0;
                anim.playing = false;
                anim.finished = true;
                if let Some(signals) = maybe_signals.as_mut() {
                    signals.set_flag(ANIMATION_ENDED);
                }
            }
        }
    }
}
