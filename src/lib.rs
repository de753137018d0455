//! Block Breaker - A single-screen brick breaker
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, contacts, game scene)
//! - `hud`: Presentation layer (overlay text, best score, replay)
//! - `storage`: Key-value settings store (memory, file, LocalStorage)
//! - `best_score`: Persisted best score
//! - `settings`: Arena and simulation configuration

pub mod best_score;
pub mod hud;
pub mod settings;
pub mod sim;
pub mod storage;

pub use best_score::BestScore;
pub use hud::{App, GameOverOverlay, Overlay};
pub use settings::Settings;
pub use storage::{KeyValueStore, MemoryStore, StorageError};

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the stepper will try to catch up on (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Default arena (portrait phone screen, in points)
    pub const DEFAULT_ARENA_WIDTH: f32 = 390.0;
    pub const DEFAULT_ARENA_HEIGHT: f32 = 844.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 12.0;
    /// Spawn height is arena height divided by this
    pub const BALL_SPAWN_DIVISOR: f32 = 1.6;
    /// Launch impulse applied to every freshly spawned ball
    pub const BALL_LAUNCH_IMPULSE: Vec2 = Vec2::new(8.0, -8.0);
    /// Ball mass; turns the launch impulse into ~320 pt/s per axis
    pub const BALL_MASS: f32 = 0.025;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 120.0;
    pub const PADDLE_HEIGHT: f32 = 24.0;
    pub const PADDLE_Y: f32 = 40.0;
    /// Paddle centre may not come closer than this to either side wall
    pub const PADDLE_EDGE_INSET: f32 = 64.0;

    /// Floor sensor
    pub const FLOOR_Y: f32 = 12.0;
    pub const FLOOR_HEIGHT: f32 = 24.0;

    /// Brick grid
    pub const BRICK_WIDTH: f32 = 35.0;
    pub const BRICK_HEIGHT: f32 = 16.0;
    /// Horizontal distance between neighbouring brick centres
    pub const BRICK_PITCH: f32 = 50.0;
    pub const BRICKS_PER_ROW: usize = 8;
    pub const BRICK_ROWS: usize = 8;
    pub const BRICKS_PER_LEVEL: usize = BRICKS_PER_ROW * BRICK_ROWS;
}
