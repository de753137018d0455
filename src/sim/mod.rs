//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod physics;
pub mod scene;
pub mod tick;

pub use collision::{CollisionResult, ball_border_collision, ball_rect_collision, bounce};
pub use entity::{Aabb, Body, BrickColor, Entity, EntityId, EntityKind, Shape};
pub use physics::{Arena, Contact, PhysicsWorld};
pub use scene::{BRICK_ROW_LAYOUT, BrickRow, GameEvent, GamePhase, GameScene, ball_spawn_point};
pub use tick::{Stepper, TickInput, tick};
