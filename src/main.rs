//! rayx top-down demo.
//!
//! A title screen leads to a dungeon loaded from a Tiled map. The player
//! walks with WASD or the arrow keys and attacks with Space; slimes chase the
//! player whenever they can see them. F11 toggles debug drawing, Escape goes
//! back to the title and quits from there.
//!
//! Sprite sheets are read from `demos/assets/` when present. Missing sheets
//! are replaced by generated placeholder frames so the demo runs without any
//! art.
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --config demos/assets/config.ini
//! ```

// Do not create console on Windows
#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bevy_ecs::prelude::*;
use clap::Parser;
use log::{info, warn};
use raylib::prelude::*;

use rayx::components::animation::{
    ANIMATION_ENDED, Animation, AnimationController, AnimationStateMachine,
};
use rayx::components::boxcollider::BoxCollider;
use rayx::components::cameratarget::CameraTarget;
use rayx::components::chaser::Chaser;
use rayx::components::dead::Dead;
use rayx::components::inputcontrolled::InputControlled;
use rayx::components::mapposition::MapPosition;
use rayx::components::movement::Movement;
use rayx::components::signals::Signals;
use rayx::components::sprite::Sprite;
use rayx::components::zindex::ZIndex;
use rayx::game::Game;
use rayx::geom::{Rect, Vec2I};
use rayx::resources::animationlibrary::AnimationLibrary;
use rayx::resources::assets::{AssetError, Assets, SpriteSheet};
use rayx::resources::gameconfig::GameConfig;
use rayx::resources::input::InputState;
use rayx::scene::{Scene, SceneContext, SceneError, SceneTransition};
use rayx::systems::animation::animation;
use rayx::systems::lifecycle::remove_dead;
use rayx::systems::movement::movement;
use rayx::topdown::{
    TopdownScene, TopdownWorld, chase, default_character_machine, setup_animations,
    spawn_moving_character,
};

const DEFAULT_MAP: &str = "demos/assets/level.tmx";
const FRAME: i32 = 48;
const FRAMES_PER_CLIP: i32 = 4;
/// How far in front of the player an attack lands.
const ATTACK_REACH: f32 = 14.0;

/// Clip names, one sheet row each.
const CLIP_ROWS: [&str; 13] = [
    "idle_down",
    "idle_left",
    "idle_right",
    "idle_up",
    "walk_down",
    "walk_left",
    "walk_right",
    "walk_up",
    "attack_down",
    "attack_left",
    "attack_right",
    "attack_up",
    "death",
];

/// rayx top-down demo
#[derive(Parser)]
#[command(version, about = "Top-down demo for the rayx engine layer")]
struct Cli {
    /// INI file with window, camera and map settings.
    #[arg(long, value_name = "PATH", default_value = "./config.ini")]
    config: PathBuf,

    /// Tiled map to play, overriding the config file.
    #[arg(long, value_name = "PATH")]
    map: Option<PathBuf>,

    /// Start with debug drawing on.
    #[arg(long)]
    debug: bool,
}

/// What the title screen needs to build the level again.
#[derive(Debug, Clone)]
struct LevelSettings {
    map: PathBuf,
    collision_layer: usize,
    zoom: f32,
    debug: bool,
}

struct TitleScene {
    level: LevelSettings,
}

impl Scene for TitleScene {
    fn on_enter(&mut self, _ctx: &mut SceneContext) -> Result<(), SceneError> {
        Ok(())
    }

    fn update(&mut self, input: &InputState, _dt: f32) -> SceneTransition {
        if input.action_2.just_pressed || input.action_1.just_pressed {
            SceneTransition::Switch(Box::new(level_scene(self.level.clone())))
        } else if input.action_back.just_pressed {
            SceneTransition::Quit
        } else {
            SceneTransition::Stay
        }
    }

    fn draw(&mut self, d: &mut RaylibDrawHandle) {
        let w = d.get_screen_width();
        let h = d.get_screen_height();
        // roughly centred, default font glyphs are about half as wide as tall
        let title = "RAYX DUNGEON";
        let tw = title.len() as i32 * 20;
        d.draw_text(title, (w - tw) / 2, h / 3, 40, Color::RAYWHITE);
        let hint = "ENTER to play - ESC to quit";
        let hw = hint.len() as i32 * 10;
        d.draw_text(hint, (w - hw) / 2, h / 2, 20, Color::LIGHTGRAY);
    }

    fn name(&self) -> &str {
        "title"
    }
}

fn level_scene(level: LevelSettings) -> TopdownScene {
    let back = level.clone();
    TopdownScene::new(level.map.clone())
        .with_name("dungeon")
        .with_collision_layer(level.collision_layer)
        .with_zoom(level.zoom)
        .with_debug(level.debug)
        .with_setup(setup_level)
        .with_transition(move |world, input| {
            let player_alive = {
                let w = world.world_mut();
                let mut q = w.query_filtered::<(), With<CameraTarget>>();
                q.iter(w).next().is_some()
            };
            if input.action_back.just_pressed || !player_alive {
                SceneTransition::Switch(Box::new(TitleScene {
                    level: back.clone(),
                }))
            } else {
                SceneTransition::Stay
            }
        })
}

/// Load a sheet from disk, or paint a placeholder one with the same layout.
fn load_or_generate_sheet(
    rl: &mut RaylibHandle,
    thread: &RaylibThread,
    assets: &mut Assets,
    name: &str,
    base: Color,
) -> Result<(), AssetError> {
    let path = Path::new("demos/assets").join(format!("{name}.png"));
    match assets.load_sprite_sheet(rl, thread, name, &path, FRAME as u32, FRAME as u32) {
        Ok(_) => return Ok(()),
        Err(e) => warn!("{}; generating placeholder frames", e),
    }

    let (w, h) = (FRAME * FRAMES_PER_CLIP, FRAME * CLIP_ROWS.len() as i32);
    let mut image = Image::gen_image_color(w, h, Color::BLANK);
    for (row, clip) in CLIP_ROWS.iter().enumerate() {
        let row = row as i32;
        let tint = match *clip {
            c if c.starts_with("attack") => Color::ORANGE,
            "death" => Color::DARKGRAY,
            _ => base,
        };
        for col in 0..FRAMES_PER_CLIP {
            let (x, y) = (col * FRAME, row * FRAME);
            // body sits on the 16x16 collider in the middle of the frame
            let bob = if clip.starts_with("walk") { col % 2 } else { 0 };
            image.draw_rectangle(x + 14, y + 14 - bob, 20, 20, tint);
            // a dot on the side the character faces
            let (dx, dy) = match *clip {
                c if c.ends_with("left") => (15, 22),
                c if c.ends_with("right") => (29, 22),
                c if c.ends_with("up") => (22, 15),
                _ => (22, 29),
            };
            image.draw_rectangle(x + dx, y + dy - bob, 4, 4, Color::BLACK);
        }
    }
    let texture = rl
        .load_texture_from_image(thread, &image)
        .map_err(|e| AssetError::Texture {
            path,
            message: e.to_string(),
        })?;
    assets.insert_texture(name, texture);
    assets.insert_sheet(SpriteSheet::split(name, name, w as u32, h as u32, FRAME as u32, FRAME as u32)?);
    Ok(())
}

fn register_clips(assets: &Assets, library: &mut AnimationLibrary, name: &str) {
    let Ok(sheet) = assets.sprite_sheet(name) else {
        return;
    };
    let mut looping = Vec::new();
    let mut once = Vec::new();
    for (row, clip) in CLIP_ROWS.iter().enumerate() {
        let frames = sheet.row(row).unwrap_or_default();
        if clip.starts_with("attack") || *clip == "death" {
            once.push((*clip, frames));
        } else {
            looping.push((*clip, frames));
        }
    }
    let added = setup_animations(library, name, looping, 0.15, true)
        + setup_animations(library, name, once, 0.08, false);
    info!("Registered {} clips for '{}'", added, name);
}

fn setup_level(world: &mut TopdownWorld, ctx: &mut SceneContext) -> Result<(), SceneError> {
    let w = world.world_mut();
    if let Some((rl, thread)) = ctx.raylib() {
        let mut assets = w.resource_mut::<Assets>();
        load_or_generate_sheet(rl, thread, &mut assets, "player", Color::SKYBLUE)?;
        load_or_generate_sheet(rl, thread, &mut assets, "slime", Color::LIME)?;
    }
    w.resource_scope(|w, mut library: Mut<AnimationLibrary>| {
        let assets = w.resource::<Assets>();
        register_clips(assets, &mut library, "player");
        register_clips(assets, &mut library, "slime");
    });

    let machine = Arc::new(default_character_machine());
    let player = spawn_character(w, &machine, "player", Vector2::new(48.0, 48.0), 150.0);
    w.entity_mut(player)
        .insert((InputControlled, CameraTarget, ZIndex(1)));

    for (x, y) in [(240.0, 64.0), (320.0, 200.0), (96.0, 240.0)] {
        let slime = spawn_character(w, &machine, "slime", Vector2::new(x, y), 60.0);
        w.entity_mut(slime).insert(Chaser::new(player, 160.0));
    }

    let schedule = world.schedule_mut();
    schedule.add_systems((player_attack, combat).chain().after(chase).before(movement));
    schedule.add_systems(reap_dead.after(animation).before(remove_dead));
    Ok(())
}

/// A 16x16 walker drawn from a 48x48 frame centred on its collider.
fn spawn_character(
    world: &mut World,
    machine: &Arc<AnimationStateMachine>,
    prefix: &str,
    pos: Vector2,
    speed: f32,
) -> Entity {
    let fallback = world
        .resource::<Assets>()
        .sprite_sheet(prefix)
        .ok()
        .and_then(|s| s.frame(0));
    let e = spawn_moving_character(world, prefix, pos, Vector2::new(16.0, 16.0), speed, fallback);
    let mut entity = world.entity_mut(e);
    if let Some(mut sprite) = entity.get_mut::<Sprite>() {
        sprite.size = Vector2::new(FRAME as f32, FRAME as f32);
        sprite.offset = Vector2::new(-16.0, -16.0);
    }
    entity.insert(AnimationController::new(Arc::clone(machine)).with_prefix(prefix));
    e
}

/// Space starts an attack that roots the player until the clip ends.
fn player_attack(
    mut query: Query<(&mut Signals, &mut Movement, &Animation), With<InputControlled>>,
    input: Res<InputState>,
) {
    for (mut signals, mut movement, anim) in query.iter_mut() {
        if signals.has_flag("attacking") {
            // a missing attack clip never ends, so give up once nothing plays
            if signals.has_flag(ANIMATION_ENDED) || !anim.playing {
                signals.clear_flag("attacking");
            } else {
                movement.desired_dir = Vec2I::ZERO;
            }
        } else if input.action_1.just_pressed {
            signals.set_flag("attacking");
            movement.desired_dir = Vec2I::ZERO;
        }
    }
}

fn attack_box(body: Rect, facing: Vec2I) -> Rect {
    Rect::new(
        body.x + facing.x as f32 * ATTACK_REACH,
        body.y + facing.y as f32 * ATTACK_REACH,
        body.w,
        body.h,
    )
}

/// Attacks kill the slimes in front of the player; touching a live slime
/// kills the player.
fn combat(
    mut players: Query<
        (Entity, &MapPosition, &BoxCollider, &mut Movement, &mut Signals),
        With<InputControlled>,
    >,
    mut slimes: Query<
        (Entity, &MapPosition, &BoxCollider, &mut Movement, &mut Signals),
        (With<Chaser>, Without<InputControlled>),
    >,
    mut commands: Commands,
) {
    for (player, pos, collider, mut movement, mut signals) in players.iter_mut() {
        let body = collider.rect(pos.pos);
        if signals.has_flag("attacking") {
            let reach = attack_box(body, movement.facing_dir);
            for (slime, spos, scollider, mut smovement, mut ssignals) in slimes.iter_mut() {
                if ssignals.has_flag("dead") || !reach.intersects(&scollider.rect(spos.pos)) {
                    continue;
                }
                info!("Slime {:?} defeated", slime);
                ssignals.set_flag("dead");
                smovement.desired_dir = Vec2I::ZERO;
                commands.entity(slime).remove::<Chaser>();
            }
            continue;
        }
        let bitten = slimes
            .iter()
            .any(|(_, spos, scollider, _, ssignals)| {
                !ssignals.has_flag("dead") && body.intersects(&scollider.rect(spos.pos))
            });
        if bitten {
            info!("Player {:?} was caught", player);
            signals.set_flag("dead");
            movement.desired_dir = Vec2I::ZERO;
            commands.entity(player).remove::<InputControlled>();
        }
    }
}

/// Mark dying characters [`Dead`] once their death clip has played.
fn reap_dead(
    query: Query<(Entity, &Signals, &Animation), Without<Dead>>,
    mut commands: Commands,
) {
    for (entity, signals, anim) in query.iter() {
        if signals.has_flag("dead") && anim.clip.ends_with("death") && !anim.playing {
            commands.entity(entity).insert(Dead);
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = GameConfig::with_path(&cli.config);
    if let Err(e) = config.load_from_file() {
        warn!("{}; using defaults", e);
    }
    let map = cli
        .map
        .or_else(|| config.map_path.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_MAP));
    info!("Level map: {}", map.display());

    let title = TitleScene {
        level: LevelSettings {
            map,
            collision_layer: config.collision_layer,
            zoom: config.camera_zoom,
            debug: cli.debug,
        },
    };

    if let Err(e) = Game::new(config).run(Box::new(title)) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
