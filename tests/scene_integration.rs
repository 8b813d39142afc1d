//! Scene manager transitions and the headless top-down scene.

use std::cell::RefCell;
use std::rc::Rc;

use raylib::prelude::{RaylibDrawHandle, Vector2};

use rayx::components::inputcontrolled::InputControlled;
use rayx::components::mapposition::MapPosition;
use rayx::geom::Size;
use rayx::resources::input::InputState;
use rayx::resources::tilemap::{TileLayer, TileMap};
use rayx::scene::{Scene, SceneContext, SceneError, SceneManager, SceneTransition};
use rayx::topdown::{TopdownScene, spawn_moving_character};

type Log = Rc<RefCell<Vec<String>>>;

/// Records its lifecycle and follows a scripted list of transitions.
struct Scripted {
    name: &'static str,
    log: Log,
    script: Vec<SceneTransition>,
    fail_enter: bool,
}

impl Scripted {
    fn new(name: &'static str, log: &Log) -> Self {
        Self {
            name,
            log: Rc::clone(log),
            script: Vec::new(),
            fail_enter: false,
        }
    }

    fn then(mut self, t: SceneTransition) -> Self {
        self.script.insert(0, t);
        self
    }
}

impl Scene for Scripted {
    fn on_enter(&mut self, _ctx: &mut SceneContext) -> Result<(), SceneError> {
        self.log.borrow_mut().push(format!("enter {}", self.name));
        if self.fail_enter {
            return Err(SceneError::Setup(format!("{} refused", self.name)));
        }
        Ok(())
    }

    fn on_exit(&mut self) {
        self.log.borrow_mut().push(format!("exit {}", self.name));
    }

    fn update(&mut self, _input: &InputState, _dt: f32) -> SceneTransition {
        self.log.borrow_mut().push(format!("update {}", self.name));
        self.script.pop().unwrap_or(SceneTransition::Stay)
    }

    fn draw(&mut self, _d: &mut RaylibDrawHandle) {}

    fn name(&self) -> &str {
        self.name
    }
}

fn entries(log: &Log) -> Vec<String> {
    log.borrow().clone()
}

fn ctx() -> SceneContext<'static> {
    SceneContext::headless(Size::new(320, 240))
}

#[test]
fn first_scene_is_entered() {
    let log: Log = Rc::default();
    let mut ctx = ctx();
    let manager = SceneManager::new(Box::new(Scripted::new("title", &log)), &mut ctx).unwrap();
    assert_eq!(manager.current_name(), Some("title"));
    assert!(!manager.is_finished());
    assert_eq!(entries(&log), vec!["enter title"]);
}

#[test]
fn switch_exits_old_before_entering_new() {
    let log: Log = Rc::default();
    let mut ctx = ctx();
    let next = Scripted::new("level", &log);
    let first = Scripted::new("title", &log)
        .then(SceneTransition::Stay)
        .then(SceneTransition::Switch(Box::new(next)));
    let mut manager = SceneManager::new(Box::new(first), &mut ctx).unwrap();
    let input = InputState::default();

    manager.update(&input, 0.016, &mut ctx).unwrap();
    assert_eq!(manager.current_name(), Some("title"));
    manager.update(&input, 0.016, &mut ctx).unwrap();
    assert_eq!(manager.current_name(), Some("level"));
    manager.update(&input, 0.016, &mut ctx).unwrap();

    assert_eq!(
        entries(&log),
        vec![
            "enter title",
            "update title",
            "update title",
            "exit title",
            "enter level",
            "update level",
        ]
    );
}

#[test]
fn quit_exits_and_finishes() {
    let log: Log = Rc::default();
    let mut ctx = ctx();
    let first = Scripted::new("title", &log).then(SceneTransition::Quit);
    let mut manager = SceneManager::new(Box::new(first), &mut ctx).unwrap();

    manager.update(&InputState::default(), 0.016, &mut ctx).unwrap();
    assert!(manager.is_finished());
    assert_eq!(manager.current_name(), None);
    // further updates are no-ops
    manager.update(&InputState::default(), 0.016, &mut ctx).unwrap();
    assert_eq!(entries(&log), vec!["enter title", "update title", "exit title"]);
}

#[test]
fn failed_enter_is_reported() {
    let log: Log = Rc::default();
    let mut ctx = ctx();
    let mut broken = Scripted::new("broken", &log);
    broken.fail_enter = true;
    let first = Scripted::new("title", &log).then(SceneTransition::Switch(Box::new(broken)));
    let mut manager = SceneManager::new(Box::new(first), &mut ctx).unwrap();

    let result = manager.update(&InputState::default(), 0.016, &mut ctx);
    assert!(matches!(result, Err(SceneError::Setup(_))));
    assert!(manager.is_finished());
}

fn small_map() -> TileMap {
    TileMap::new(
        16,
        16,
        Size::new(8, 8),
        vec![
            TileLayer {
                name: "floor".into(),
                data: vec![1; 64],
            },
            TileLayer {
                name: "walls".into(),
                data: vec![0; 64],
            },
        ],
        vec![],
    )
    .unwrap()
}

#[test]
fn topdown_scene_runs_headless() {
    let scene = TopdownScene::from_map(small_map())
        .with_setup(|world, ctx| {
            assert!(ctx.is_headless());
            let player = spawn_moving_character(
                world.world_mut(),
                "player",
                Vector2::new(32.0, 32.0),
                Vector2::new(16.0, 16.0),
                100.0,
                None,
            );
            world.world_mut().entity_mut(player).insert(InputControlled);
            Ok(())
        })
        .with_transition(|_, input| {
            if input.action_back.just_pressed {
                SceneTransition::Quit
            } else {
                SceneTransition::Stay
            }
        });

    let mut ctx = ctx();
    let mut manager = SceneManager::new(Box::new(scene), &mut ctx).unwrap();
    assert_eq!(manager.current_name(), Some("topdown"));

    let mut input = InputState::default();
    input.maindirection_down.update(true);
    manager.update(&input, 0.1, &mut ctx).unwrap();
    assert!(!manager.is_finished());

    input.action_back.update(true);
    manager.update(&input, 0.1, &mut ctx).unwrap();
    assert!(manager.is_finished());
}

#[test]
fn topdown_scene_moves_its_world() {
    let mut scene = TopdownScene::from_map(small_map()).with_setup(|world, _| {
        let e = spawn_moving_character(
            world.world_mut(),
            "player",
            Vector2::new(32.0, 32.0),
            Vector2::new(16.0, 16.0),
            100.0,
            None,
        );
        world.world_mut().entity_mut(e).insert(InputControlled);
        Ok(())
    });
    let mut ctx = ctx();
    scene.on_enter(&mut ctx).unwrap();

    let mut input = InputState::default();
    input.maindirection_down.update(true);
    scene.update(&input, 0.1);

    let world = scene.world_mut().unwrap().world_mut();
    let mut q = world.query_filtered::<&MapPosition, bevy_ecs::prelude::With<InputControlled>>();
    let pos = q.single(world).unwrap().pos;
    assert!((pos.y - 42.0).abs() < 1e-3, "y = {}", pos.y);

    scene.on_exit();
    assert!(scene.world().is_none());
}

#[test]
fn topdown_scene_with_missing_map_fails_to_enter() {
    let mut ctx = ctx();
    let result = SceneManager::new(Box::new(TopdownScene::new("no/such/level.tmx")), &mut ctx);
    assert!(matches!(result, Err(SceneError::Tiled(_))));
}
