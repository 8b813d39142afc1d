//! Drawing of a scene's world with raylib.
//!
//! Rendering runs inside raylib's drawing scope, so it is a function over
//! the [`World`] rather than a scheduled system. [`render_world`] draws the
//! tile layers (culled to the camera), then sprites sorted by [`ZIndex`] and
//! bottom edge, then debug overlays when [`DebugMode`] is present.

use bevy_ecs::prelude::*;
use log::warn;
use raylib::prelude::*;

use crate::components::animation::Animation;
use crate::components::boxcollider::BoxCollider;
use crate::components::chaser::Chaser;
use crate::components::mapposition::MapPosition;
use crate::components::sprite::Sprite;
use crate::components::zindex::ZIndex;
use crate::geom::{Rect, Vec2I};
use crate::resources::animationlibrary::AnimationLibrary;
use crate::resources::assets::{Assets, SpriteFrame};
use crate::resources::camera::Camera;
use crate::resources::debugmode::DebugMode;
use crate::resources::tilemap::{CollisionLayer, TileMap, TileRange};

const MISSING_TILE_COLORS: [Color; 4] = [
    Color::new(90, 90, 110, 255),
    Color::new(120, 100, 80, 255),
    Color::new(70, 110, 80, 255),
    Color::new(110, 70, 90, 255),
];

struct DrawItem {
    z: i32,
    bottom: f32,
    dest: Rect,
    frame: Option<SpriteFrame>,
    color: Color,
    flip_h: bool,
}

/// Draw the world as seen by its [`Camera`]. Does nothing without one.
pub fn render_world(world: &mut World, d: &mut RaylibDrawHandle) {
    let Some(camera) = world.get_resource::<Camera>().copied() else {
        return;
    };
    let view = camera.view_rect();
    let debug = world.contains_resource::<DebugMode>();

    let mut colliders: Vec<(Rect, Vector2)> = Vec::new();
    let mut sight_lines: Vec<(Vector2, Vector2)> = Vec::new();
    if debug {
        let mut q = world.query::<(&BoxCollider, &MapPosition)>();
        colliders = q.iter(world).map(|(c, p)| (c.rect(p.pos), p.pos)).collect();
        let mut chasers = world.query::<(&Chaser, &MapPosition, Option<&BoxCollider>)>();
        let w: &World = world;
        sight_lines = chasers
            .iter(w)
            .filter_map(|(chaser, p, c)| {
                let from = c.map_or(p.pos, |c| c.center(p.pos));
                let target = w.get::<MapPosition>(chaser.target)?;
                let to = match w.get::<BoxCollider>(chaser.target) {
                    Some(tc) => tc.center(target.pos),
                    None => target.pos,
                };
                Some((from, to))
            })
            .collect();
    }

    let mut query = world.query::<(
        &MapPosition,
        &Sprite,
        Option<&Animation>,
        Option<&ZIndex>,
    )>();
    let world: &World = world;
    let library = world.get_resource::<AnimationLibrary>();

    let mut to_draw: Vec<DrawItem> = query
        .iter(world)
        .filter_map(|(p, s, anim, z)| {
            let dest = Rect::new(
                p.pos.x + s.offset.x,
                p.pos.y + s.offset.y,
                s.size.x,
                s.size.y,
            );
            if !dest.intersects(&view) {
                return None;
            }
            let animated = match (anim, library) {
                (Some(a), Some(lib)) if a.playing || a.finished => a.current_frame(lib).cloned(),
                _ => None,
            };
            Some(DrawItem {
                z: z.map(|z| z.0).unwrap_or(0),
                bottom: dest.bottom(),
                dest,
                frame: animated.or_else(|| s.fallback.clone()),
                color: s.color,
                flip_h: s.flip_h,
            })
        })
        .collect();

    to_draw.sort_by(|a, b| a.z.cmp(&b.z).then(a.bottom.total_cmp(&b.bottom)));

    let assets = world.get_resource::<Assets>();
    let mut d2 = d.begin_mode2D(camera.to_raylib());

    if let Some(map) = world.get_resource::<TileMap>() {
        draw_tiles(&mut d2, map, assets, &camera);
    }

    for item in &to_draw {
        let texture = item
            .frame
            .as_ref()
            .and_then(|f| assets.and_then(|a| a.texture(&f.tex_key).ok()).map(|t| (f, t)));
        match texture {
            Some((frame, tex)) => {
                let mut src = Rectangle::from(frame.src);
                if item.flip_h {
                    src.width = -src.width;
                }
                d2.draw_texture_pro(
                    tex,
                    src,
                    Rectangle::from(item.dest),
                    Vector2::zero(),
                    0.0,
                    Color::WHITE,
                );
            }
            None => d2.draw_rectangle_rec(Rectangle::from(item.dest), item.color),
        }
    }

    if debug {
        draw_debug_overlays(&mut d2, world, &colliders, &sight_lines);
    }
}

fn draw_tiles<D: RaylibDraw>(d: &mut D, map: &TileMap, assets: Option<&Assets>, camera: &Camera) {
    let range = camera.visible_tiles(map.tile_w(), map.tile_h());
    let (tw, th) = (map.tile_w() as f32, map.tile_h() as f32);
    for layer in 0..map.num_layers() {
        let result = map.for_each_in(range, layer, |tx, ty, gid| {
            let dest = Rectangle::new(tx as f32 * tw, ty as f32 * th, tw, th);
            let tile = map.resolve_gid(gid).and_then(|(ts, local)| {
                let tex = assets?.texture(&ts.image_key).ok()?;
                Some((tex, ts.source_rect(local)))
            });
            match tile {
                Some((tex, src)) => {
                    d.draw_texture_pro(tex, Rectangle::from(src), dest, Vector2::zero(), 0.0, Color::WHITE)
                }
                None => {
                    let color = MISSING_TILE_COLORS[gid as usize % MISSING_TILE_COLORS.len()];
                    d.draw_rectangle_rec(dest, color);
                }
            }
        });
        if let Err(e) = result {
            warn!("Cannot draw tile layer {}: {}", layer, e);
        }
    }
}

fn draw_debug_overlays<D: RaylibDraw>(
    d: &mut D,
    world: &World,
    colliders: &[(Rect, Vector2)],
    sight_lines: &[(Vector2, Vector2)],
) {
    if let (Some(map), Some(layer)) = (
        world.get_resource::<TileMap>(),
        world.get_resource::<CollisionLayer>(),
    ) {
        let (tw, th) = (map.tile_w() as f32, map.tile_h() as f32);
        let whole_map = TileRange {
            min: Vec2I::ZERO,
            max: Vec2I::new(map.map_size().w as i32, map.map_size().h as i32),
        };
        let _ = map.for_each_in(whole_map, layer.0, |tx, ty, _| {
            d.draw_rectangle_lines_ex(
                Rectangle::new(tx as f32 * tw, ty as f32 * th, tw, th),
                1.0,
                Color::YELLOW,
            );
        });
    }

    for (rect, p) in colliders {
        d.draw_rectangle_lines_ex(Rectangle::from(*rect), 1.0, Color::RED);
        d.draw_line_v(Vector2::new(p.x - 3.0, p.y), Vector2::new(p.x + 3.0, p.y), Color::GREEN);
        d.draw_line_v(Vector2::new(p.x, p.y - 3.0), Vector2::new(p.x, p.y + 3.0), Color::GREEN);
    }
    for (from, to) in sight_lines {
        d.draw_line_v(*from, *to, Color::SKYBLUE);
    }
}

/// Screen-space debug text: FPS, entity count and camera state.
pub fn render_debug_ui(world: &World, d: &mut RaylibDrawHandle) {
    if !world.contains_resource::<DebugMode>() {
        return;
    }
    let fps = d.get_fps();
    d.draw_text(
        &format!("DEBUG MODE (press F11 to toggle) | FPS: {}", fps),
        10,
        10,
        10,
        Color::WHITE,
    );
    let entity_count = world.entities().count_spawned();
    d.draw_text(&format!("Entities: {}", entity_count), 10, 24, 10, Color::WHITE);
    if let Some(cam) = world.get_resource::<Camera>() {
        let mouse = d.get_mouse_position();
        let mouse_world = cam.screen_to_world(mouse);
        d.draw_text(
            &format!(
                "Camera: ({:.1}, {:.1}) zoom {:.2} | Mouse world: ({:.1}, {:.1})",
                cam.pos.x, cam.pos.y, cam.zoom(), mouse_world.x, mouse_world.y
            ),
            10,
            38,
            10,
            Color::WHITE,
        );
    }
}
