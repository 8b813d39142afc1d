//! Shortcuts for the usual top-down character setup.

use bevy_ecs::prelude::*;
use log::debug;
use raylib::prelude::{Color, Vector2};

use crate::components::animation::{
    Animation, AnimationStateMachine, ClipNaming, CmpOp, Condition,
};
use crate::components::boxcollider::BoxCollider;
use crate::components::mapposition::MapPosition;
use crate::components::movement::Movement;
use crate::components::signals::Signals;
use crate::components::sprite::Sprite;
use crate::resources::animationlibrary::{AnimationDef, AnimationLibrary};
use crate::resources::assets::SpriteFrame;

/// Colour of a character drawn without frames.
pub const FALLBACK_COLOR: Color = Color::new(80, 200, 120, 255);

/// Register every clip in `clips` as `{prefix}_{name}`. Clips without frames
/// are skipped. Returns how many were registered.
pub fn setup_animations<I, S>(
    library: &mut AnimationLibrary,
    prefix: &str,
    clips: I,
    frame_time: f32,
    looped: bool,
) -> usize
where
    I: IntoIterator<Item = (S, Vec<SpriteFrame>)>,
    S: AsRef<str>,
{
    let mut added = 0;
    for (name, frames) in clips {
        let key = format!("{}_{}", prefix, name.as_ref());
        match AnimationDef::from_frames(key.as_str(), frames, frame_time, looped) {
            Some(def) => {
                library.add(def);
                added += 1;
            }
            None => debug!("Skipping empty animation '{}'", key),
        }
    }
    added
}

fn facing(x: i32, y: i32) -> Condition {
    Condition::All(vec![
        Condition::int("facing_x", CmpOp::Eq, x),
        Condition::int("facing_y", CmpOp::Eq, y),
    ])
}

fn moving_towards(x: i32, y: i32) -> Condition {
    Condition::All(vec![Condition::flag("moving"), facing(x, y)])
}

/// Not moving and facing `dir` on any axis. Checked left, right, up, down,
/// so a diagonal stop keeps the horizontal clip.
fn stopped_facing(dir: &str) -> Condition {
    let axis = match dir {
        "left" => Condition::int("facing_x", CmpOp::Lt, 0),
        "right" => Condition::int("facing_x", CmpOp::Gt, 0),
        "up" => Condition::int("facing_y", CmpOp::Lt, 0),
        _ => Condition::int("facing_y", CmpOp::Gt, 0),
    };
    Condition::All(vec![Condition::no_flag("moving"), axis])
}

const CARDINALS: [(&str, i32, i32); 4] = [
    ("left", -1, 0),
    ("right", 1, 0),
    ("up", 0, -1),
    ("down", 0, 1),
];

/// Walking diagonals resolve to the vertical clip.
const DIAGONALS: [(i32, i32, &str); 4] = [(-1, -1, "up"), (1, -1, "up"), (-1, 1, "down"), (1, 1, "down")];

/// Eight-state machine over `{prefix}_idle_*` and `{prefix}_walk_*` where
/// each state name is also its clip name.
///
/// Driven by the `moving` flag and the `facing_x`/`facing_y` integers
/// published by the movement system. Starts in `{prefix}_idle_down`.
pub fn character_state_machine(prefix: &str) -> AnimationStateMachine {
    let idle = |dir: &str| format!("{prefix}_idle_{dir}");
    let walk = |dir: &str| format!("{prefix}_walk_{dir}");
    let mut machine =
        AnimationStateMachine::new(idle("down")).with_naming(ClipNaming::StateName);

    for (from, _, _) in CARDINALS {
        for (to, x, y) in CARDINALS {
            machine.add_transition(idle(from), walk(to), moving_towards(x, y), 10);
            machine.add_transition(walk(from), walk(to), moving_towards(x, y), 10);
        }
        for (x, y, to) in DIAGONALS {
            machine.add_transition(idle(from), walk(to), moving_towards(x, y), 8);
            machine.add_transition(walk(from), walk(to), moving_towards(x, y), 8);
        }
        // stopping keeps the way the character was facing
        for (to, _, _) in CARDINALS {
            machine.add_transition(walk(from), idle(to), stopped_facing(to), 10);
        }
    }
    machine
}

/// Four-state `idle`/`walk`/`attack`/`dead` machine with directional clip
/// names (`walk_left`, `idle_down`, ...). The `dead` state always plays
/// `death`.
///
/// Game code raises the `attacking` flag to start an attack and clears it
/// to end one, usually when `animation_ended` shows up. The `dead` flag wins
/// over everything.
pub fn default_character_machine() -> AnimationStateMachine {
    let mut machine = AnimationStateMachine::new("idle")
        .with_naming(ClipNaming::Directional)
        .with_fixed_clip("dead", "death");

    for state in ["idle", "walk", "attack"] {
        machine.add_transition(state, "dead", Condition::flag("dead"), 100);
    }
    for state in ["idle", "walk"] {
        machine.add_transition(state, "attack", Condition::flag("attacking"), 20);
    }
    machine.add_transition("idle", "walk", Condition::flag("moving"), 10);
    machine.add_transition("walk", "idle", Condition::no_flag("moving"), 10);
    machine.add_transition(
        "attack",
        "idle",
        Condition::All(vec![
            Condition::no_flag("attacking"),
            Condition::no_flag("moving"),
        ]),
        10,
    );
    machine.add_transition(
        "attack",
        "walk",
        Condition::All(vec![Condition::no_flag("attacking"), Condition::flag("moving")]),
        10,
    );
    machine
}

/// Spawn a character that walks with tile collision.
///
/// The collider covers `size` at the entity position, the character faces
/// down and its animation starts at `{prefix}_idle_down`. Without a
/// `fallback` frame it is drawn as a solid [`FALLBACK_COLOR`] box.
pub fn spawn_moving_character(
    world: &mut World,
    prefix: &str,
    pos: Vector2,
    size: Vector2,
    speed: f32,
    fallback: Option<SpriteFrame>,
) -> Entity {
    let mut sprite = Sprite::solid(size.x, size.y, FALLBACK_COLOR);
    if let Some(frame) = fallback {
        sprite = sprite.with_frame(frame);
    }
    let movement = Movement::new(speed);
    let mut signals = Signals::default();
    signals.set_integer("facing_x", movement.facing_dir.x);
    signals.set_integer("facing_y", movement.facing_dir.y);

    world
        .spawn((
            MapPosition::from_vec(pos),
            BoxCollider::new(size.x, size.y),
            movement,
            signals,
            Animation::new(format!("{prefix}_idle_down")),
            sprite,
        ))
        .id()
}
