//! The game scene: entities, contact rules, and score/level/game-over state
//!
//! The scene owns the physics world and is the only thing that creates or
//! destroys entities. The live ball's id lives inside `GamePhase::Playing`, so
//! a ball exists exactly when play is active.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Body, BrickColor, EntityId, EntityKind, Shape};
use super::physics::{Arena, Contact, PhysicsWorld};
use crate::consts::*;

/// One row of the brick grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrickRow {
    pub color: BrickColor,
    /// Row height is arena height divided by this
    pub height_divisor: f32,
}

/// Row layout, top row first (closest to the paddle last)
pub const BRICK_ROW_LAYOUT: [BrickRow; BRICK_ROWS] = [
    BrickRow { color: BrickColor::Red, height_divisor: 1.14 },
    BrickRow { color: BrickColor::Red, height_divisor: 1.17 },
    BrickRow { color: BrickColor::Orange, height_divisor: 1.202 },
    BrickRow { color: BrickColor::Orange, height_divisor: 1.235 },
    BrickRow { color: BrickColor::Green, height_divisor: 1.272 },
    BrickRow { color: BrickColor::Green, height_divisor: 1.310 },
    BrickRow { color: BrickColor::Yellow, height_divisor: 1.350 },
    BrickRow { color: BrickColor::Yellow, height_divisor: 1.392 },
];

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay with the given live ball
    Playing { ball: EntityId },
    /// Ball went past the paddle; only a restart leaves this phase
    GameOver,
}

/// Things that happened inside the scene, drained by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    NewGame,
    BrickDestroyed { color: BrickColor, score: u32 },
    /// Grid cleared; `level` is the level now starting
    LevelCleared { level: u32 },
    GameOver { score: u32, level: u32 },
}

/// A contact the scene cares about, with the ball already identified
enum BallContact {
    Brick { ball: EntityId, brick: EntityId, color: BrickColor },
    Floor { ball: EntityId },
}

pub struct GameScene {
    world: PhysicsWorld,
    level: u32,
    score: u32,
    phase: GamePhase,
    paddle: EntityId,
    floor: EntityId,
    events: Vec<GameEvent>,
}

impl GameScene {
    /// Build the arena and start the first game
    pub fn new(arena: Arena) -> Self {
        // Placeholder ids; start_new_game replaces them
        let mut scene = Self {
            world: PhysicsWorld::new(arena),
            level: 1,
            score: 0,
            phase: GamePhase::GameOver,
            paddle: EntityId(0),
            floor: EntityId(0),
            events: Vec::new(),
        };
        scene.start_new_game();
        scene
    }

    /// Reset level and score and replace every entity with a fresh one
    pub fn start_new_game(&mut self) {
        self.world.clear();
        self.level = 1;
        self.score = 0;
        self.make_ball();
        self.make_paddle();
        self.make_bricks();
        self.make_floor();
        self.events.push(GameEvent::NewGame);

        let arena = self.world.arena();
        log::info!("New game: {} bricks, arena {}x{}", self.brick_count(), arena.width, arena.height);
    }

    /// Replace the ball with a fresh one at the spawn point and launch it
    pub fn make_ball(&mut self) -> EntityId {
        if let GamePhase::Playing { ball } = self.phase {
            self.world.despawn(ball);
        }
        let ball = spawn_ball(&mut self.world);
        self.phase = GamePhase::Playing { ball };
        ball
    }

    /// Add a full grid of bricks
    pub fn make_bricks(&mut self) {
        spawn_bricks(&mut self.world);
    }

    /// Add one row of bricks at height `y`
    pub fn make_rows(&mut self, color: BrickColor, y: f32) {
        spawn_row(&mut self.world, color, y);
    }

    /// Replace the paddle with a fresh one at the centre
    pub fn make_paddle(&mut self) -> EntityId {
        self.world.despawn(self.paddle);
        self.paddle = spawn_paddle(&mut self.world);
        self.paddle
    }

    /// Replace the floor sensor
    pub fn make_floor(&mut self) -> EntityId {
        self.world.despawn(self.floor);
        self.floor = spawn_floor(&mut self.world);
        self.floor
    }

    /// Horizontal drag: move the paddle under the finger, clamped to the arena
    pub fn touch_moved(&mut self, x: f32) {
        if !x.is_finite() {
            return;
        }
        let arena = self.world.arena();
        let min_x = PADDLE_EDGE_INSET;
        let max_x = (arena.width - PADDLE_EDGE_INSET).max(min_x);
        if let Some(paddle) = self.world.get_mut(self.paddle) {
            paddle.pos = Vec2::new(x.clamp(min_x, max_x), PADDLE_Y);
        }
    }

    /// Contact-begin handler. Pair order does not matter.
    pub fn did_begin(&mut self, contact: Contact) {
        match self.classify(contact) {
            Some(BallContact::Brick { ball, brick, color }) => {
                self.remove_brick(brick);
                self.update_score(1);
                self.events.push(GameEvent::BrickDestroyed {
                    color,
                    score: self.score,
                });
                log::debug!("Brick {:?} ({}) destroyed, score {}", brick, color.as_str(), self.score);

                if self.brick_count() == 0 {
                    self.world.despawn(ball);
                    self.level += 1;
                    self.events.push(GameEvent::LevelCleared { level: self.level });
                    log::info!("Level cleared! Now on level {} (score {})", self.level, self.score);

                    self.make_ball();
                    self.make_bricks();
                }
            }
            Some(BallContact::Floor { ball }) => {
                self.world.despawn(ball);
                self.phase = GamePhase::GameOver;
                self.events.push(GameEvent::GameOver {
                    score: self.score,
                    level: self.level,
                });
                log::info!("Game over at level {} with score {}", self.level, self.score);
            }
            None => {}
        }
    }

    /// Resolve a contact into one the scene handles
    ///
    /// Only the live ball counts, and both bodies must still exist.
    fn classify(&self, contact: Contact) -> Option<BallContact> {
        let GamePhase::Playing { ball } = self.phase else {
            return None;
        };
        let other = if contact.a == ball {
            contact.b
        } else if contact.b == ball {
            contact.a
        } else {
            return None;
        };
        self.world.get(ball)?;

        match self.world.get(other)?.kind {
            EntityKind::Brick { color } => Some(BallContact::Brick {
                ball,
                brick: other,
                color,
            }),
            EntityKind::Floor => Some(BallContact::Floor { ball }),
            EntityKind::Ball | EntityKind::Paddle => None,
        }
    }

    /// Remove a brick. Returns false if it was already gone or is not a brick.
    pub fn remove_brick(&mut self, id: EntityId) -> bool {
        match self.world.get(id) {
            Some(entity) if entity.kind.is_brick() => self.world.despawn(id).is_some(),
            _ => false,
        }
    }

    pub fn update_score(&mut self, delta: u32) {
        self.score = self.score.saturating_add(delta);
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// The live ball, if play is active
    pub fn ball(&self) -> Option<EntityId> {
        match self.phase {
            GamePhase::Playing { ball } => Some(ball),
            GamePhase::GameOver => None,
        }
    }

    pub fn paddle(&self) -> EntityId {
        self.paddle
    }

    pub fn floor(&self) -> EntityId {
        self.floor
    }

    /// Current paddle centre x
    pub fn paddle_x(&self) -> f32 {
        self.world
            .get(self.paddle)
            .map(|p| p.pos.x)
            .unwrap_or_else(|| self.world.arena().center_x())
    }

    pub fn brick_count(&self) -> usize {
        self.world.count(|e| e.kind.is_brick())
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub(crate) fn world_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.world
    }

    /// Take all events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Ball spawn point for an arena
pub fn ball_spawn_point(arena: Arena) -> Vec2 {
    Vec2::new(arena.center_x(), arena.height / BALL_SPAWN_DIVISOR)
}

fn spawn_ball(world: &mut PhysicsWorld) -> EntityId {
    let pos = ball_spawn_point(world.arena());
    let ball = world.spawn(
        EntityKind::Ball,
        Shape::Circle { radius: BALL_RADIUS },
        pos,
        Body::ball(),
    );
    world.apply_impulse(ball, BALL_LAUNCH_IMPULSE, BALL_MASS);
    ball
}

fn spawn_paddle(world: &mut PhysicsWorld) -> EntityId {
    let x = world.arena().center_x();
    world.spawn(
        EntityKind::Paddle,
        Shape::rect(PADDLE_WIDTH, PADDLE_HEIGHT),
        Vec2::new(x, PADDLE_Y),
        Body::paddle(),
    )
}

fn spawn_floor(world: &mut PhysicsWorld) -> EntityId {
    let arena = world.arena();
    world.spawn(
        EntityKind::Floor,
        Shape::rect(arena.width, FLOOR_HEIGHT),
        Vec2::new(arena.center_x(), FLOOR_Y),
        Body::floor(),
    )
}

fn spawn_bricks(world: &mut PhysicsWorld) {
    let height = world.arena().height;
    for row in &BRICK_ROW_LAYOUT {
        spawn_row(world, row.color, height / row.height_divisor);
    }
}

fn spawn_row(world: &mut PhysicsWorld, color: BrickColor, y: f32) {
    let row_width = BRICK_PITCH * BRICKS_PER_ROW as f32;
    let x_offset = (world.arena().width - row_width) / 2.0;

    for i in 0..BRICKS_PER_ROW {
        let x = x_offset + (i as f32 + 0.5) * BRICK_PITCH;
        world.spawn(
            EntityKind::Brick { color },
            Shape::rect(BRICK_WIDTH, BRICK_HEIGHT),
            Vec2::new(x, y),
            Body::brick(),
        );
    }
}
