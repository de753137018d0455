//! Entity records
//!
//! Every object in the arena is a flat tagged record: what it is (`EntityKind`),
//! its collision shape, where it is, and how the physics world treats it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Stable handle to an entity inside a `PhysicsWorld`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Brick colors (cosmetic only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrickColor {
    Red,
    Orange,
    Green,
    Yellow,
}

impl BrickColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            BrickColor::Red => "red",
            BrickColor::Orange => "orange",
            BrickColor::Green => "green",
            BrickColor::Yellow => "yellow",
        }
    }

    /// CSS hex color for hosts that draw bricks
    pub fn hex(&self) -> &'static str {
        match self {
            BrickColor::Red => "#ff3b30",
            BrickColor::Orange => "#ff9500",
            BrickColor::Green => "#34c759",
            BrickColor::Yellow => "#ffcc00",
        }
    }
}

/// What an entity is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Ball,
    Paddle,
    Brick { color: BrickColor },
    Floor,
}

impl EntityKind {
    #[inline]
    pub fn is_brick(&self) -> bool {
        matches!(self, EntityKind::Brick { .. })
    }
}

/// Collision shape, centred on the entity position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle { radius: f32 },
    Rect { half_extents: Vec2 },
}

impl Shape {
    pub fn rect(width: f32, height: f32) -> Self {
        Shape::Rect {
            half_extents: Vec2::new(width / 2.0, height / 2.0),
        }
    }

    /// Half size of the shape's bounding box
    pub fn half_extents(&self) -> Vec2 {
        match *self {
            Shape::Circle { radius } => Vec2::splat(radius),
            Shape::Rect { half_extents } => half_extents,
        }
    }
}

/// Physics flags for a body
///
/// The world has no friction or rotation model: every body is frictionless
/// and keeps its orientation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Bounciness (1.0 = fully elastic)
    pub restitution: f32,
    /// Fraction of velocity lost per second
    pub linear_damping: f32,
    /// Moved by the simulation (false = only moved by direct placement)
    pub dynamic: bool,
    /// Reports contacts but never pushes anything back
    pub sensor: bool,
}

impl Body {
    /// Fully elastic, undamped moving body
    pub fn ball() -> Self {
        Self {
            restitution: 1.0,
            linear_damping: 0.0,
            dynamic: true,
            sensor: false,
        }
    }

    /// Fully elastic static body
    pub fn paddle() -> Self {
        Self {
            dynamic: false,
            ..Self::ball()
        }
    }

    /// Static body that leaves restitution to the ball
    pub fn brick() -> Self {
        Self {
            restitution: 0.0,
            ..Self::paddle()
        }
    }

    /// Invisible static sensor
    pub fn floor() -> Self {
        Self {
            sensor: true,
            ..Self::brick()
        }
    }
}

/// Axis-aligned bounding box, the broad phase of `PhysicsWorld::step`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }
}

/// A single arena object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub shape: Shape,
    pub pos: Vec2,
    pub vel: Vec2,
    pub body: Body,
}

impl Entity {
    pub fn aabb(&self) -> Aabb {
        let half = self.shape.half_extents();
        Aabb {
            min: self.pos - half,
            max: self.pos + half,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_presets() {
        assert!(Body::ball().dynamic);
        assert!(!Body::paddle().dynamic);
        assert_eq!(Body::paddle().restitution, 1.0);
        assert!(Body::floor().sensor);
        assert!(!Body::brick().sensor);
        assert_eq!(Body::brick().restitution, 0.0);
    }

    #[test]
    fn test_aabb() {
        let paddle = Entity {
            id: EntityId(1),
            kind: EntityKind::Paddle,
            shape: Shape::rect(120.0, 24.0),
            pos: Vec2::new(100.0, 40.0),
            vel: Vec2::ZERO,
            body: Body::paddle(),
        };
        let aabb = paddle.aabb();
        assert_eq!(aabb.min, Vec2::new(40.0, 28.0));
        assert_eq!(aabb.max, Vec2::new(160.0, 52.0));

        let ball = Entity {
            id: EntityId(2),
            kind: EntityKind::Ball,
            shape: Shape::Circle { radius: 12.0 },
            pos: Vec2::new(100.0, 60.0),
            vel: Vec2::ZERO,
            body: Body::ball(),
        };
        assert!(ball.aabb().overlaps(&aabb));
    }
}
