//! Minimal contact-driven physics world
//!
//! Zero gravity, frictionless, no rotation. Dynamic circles move and bounce
//! off the arena's edge loop and off static rectangles; sensors only report.
//! `step` returns the contacts that began during the step, the same surface a
//! host engine's contact-begin callback would deliver.

use std::collections::BTreeSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{ball_border_collision, ball_rect_collision, bounce};
use super::entity::{Aabb, Body, Entity, EntityId, EntityKind, Shape};

/// Arena frame/bounds (origin bottom-left, y up)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.width / 2.0
    }
}

/// Two bodies that started touching. Order of `a` and `b` carries no meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub a: EntityId,
    pub b: EntityId,
}

impl Contact {
    /// Same pair with the bodies swapped
    pub fn swapped(self) -> Self {
        Self {
            a: self.b,
            b: self.a,
        }
    }
}

/// Key for a touching pair (smaller id first)
fn pair_key(x: EntityId, y: EntityId) -> (EntityId, EntityId) {
    if x <= y { (x, y) } else { (y, x) }
}

/// All entities in the arena plus the set of pairs currently touching
#[derive(Debug, Clone)]
pub struct PhysicsWorld {
    arena: Arena,
    /// Sorted by id (ids are allocated in increasing order)
    entities: Vec<Entity>,
    touching: BTreeSet<(EntityId, EntityId)>,
    next_id: u32,
}

impl PhysicsWorld {
    pub fn new(arena: Arena) -> Self {
        Self {
            arena,
            entities: Vec::new(),
            touching: BTreeSet::new(),
            next_id: 1,
        }
    }

    pub fn arena(&self) -> Arena {
        self.arena
    }

    /// Add a body at rest and return its id
    pub fn spawn(&mut self, kind: EntityKind, shape: Shape, pos: Vec2, body: Body) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.entities.push(Entity {
            id,
            kind,
            shape,
            pos,
            vel: Vec2::ZERO,
            body,
        });
        id
    }

    /// Remove a body. Returns it if it existed.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        let index = self.index_of(id)?;
        self.touching.retain(|(a, b)| *a != id && *b != id);
        Some(self.entities.remove(index))
    }

    /// Remove every body. Ids are never reused.
    pub fn clear(&mut self) {
        self.entities.clear();
        self.touching.clear();
    }

    fn index_of(&self, id: EntityId) -> Option<usize> {
        self.entities.binary_search_by_key(&id, |e| e.id).ok()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.index_of(id).map(|i| &self.entities[i])
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        let index = self.index_of(id)?;
        Some(&mut self.entities[index])
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Count entities matching a predicate
    pub fn count(&self, pred: impl Fn(&Entity) -> bool) -> usize {
        self.entities.iter().filter(|e| pred(e)).count()
    }

    /// Instantaneous velocity change of impulse / mass (static bodies ignore it)
    pub fn apply_impulse(&mut self, id: EntityId, impulse: Vec2, mass: f32) {
        if mass <= 0.0 {
            return;
        }
        if let Some(entity) = self.get_mut(id) {
            if entity.body.dynamic {
                entity.vel += impulse / mass;
            }
        }
    }

    /// Advance every dynamic body by `dt` and report contacts that began
    pub fn step(&mut self, dt: f32) -> Vec<Contact> {
        let arena = self.arena;

        // Static rectangles, copied out so dynamics can be mutated in place
        let statics: Vec<(EntityId, Aabb, Vec2, Vec2, Body)> = self
            .entities
            .iter()
            .filter(|e| !e.body.dynamic)
            .filter_map(|e| match e.shape {
                Shape::Rect { half_extents } => Some((e.id, e.aabb(), e.pos, half_extents, e.body)),
                Shape::Circle { .. } => None,
            })
            .collect();

        let mut now_touching = BTreeSet::new();

        for entity in self.entities.iter_mut().filter(|e| e.body.dynamic) {
            let damping = (1.0 - entity.body.linear_damping * dt).max(0.0);
            entity.vel *= damping;
            entity.pos += entity.vel * dt;

            // Only circles collide; other dynamic shapes just drift
            let Shape::Circle { radius } = entity.shape else {
                continue;
            };

            // Edge loop (two passes resolve a corner)
            for _ in 0..2 {
                let hit = ball_border_collision(entity.pos, radius, arena.width, arena.height);
                if !hit.hit {
                    break;
                }
                entity.pos += hit.normal * hit.penetration;
                entity.vel = bounce(entity.vel, hit.normal, entity.body.restitution);
            }

            for &(other_id, bounds, center, half_extents, body) in &statics {
                if !entity.aabb().overlaps(&bounds) {
                    continue;
                }
                let hit = ball_rect_collision(entity.pos, radius, center, half_extents);
                if !hit.hit {
                    continue;
                }
                now_touching.insert(pair_key(entity.id, other_id));
                if body.sensor {
                    continue;
                }
                entity.pos += hit.normal * hit.penetration;
                let restitution = entity.body.restitution.max(body.restitution);
                entity.vel = bounce(entity.vel, hit.normal, restitution);
            }
        }

        let began: Vec<Contact> = now_touching
            .difference(&self.touching)
            .map(|&(a, b)| Contact { a, b })
            .collect();
        self.touching = now_touching;
        began
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::BrickColor;

    fn world() -> PhysicsWorld {
        PhysicsWorld::new(Arena::new(390.0, 844.0))
    }

    fn spawn_ball(world: &mut PhysicsWorld, pos: Vec2, vel: Vec2) -> EntityId {
        let id = world.spawn(EntityKind::Ball, Shape::Circle { radius: 12.0 }, pos, Body::ball());
        world.apply_impulse(id, vel, 1.0);
        id
    }

    #[test]
    fn test_ids_monotonic_and_not_reused() {
        let mut w = world();
        let a = w.spawn(EntityKind::Floor, Shape::rect(390.0, 24.0), Vec2::ZERO, Body::floor());
        let b = w.spawn(EntityKind::Paddle, Shape::rect(120.0, 24.0), Vec2::ZERO, Body::paddle());
        assert!(a < b);
        assert!(w.despawn(a).is_some());
        assert!(w.despawn(a).is_none());
        w.clear();
        assert!(w.is_empty());
        let c = w.spawn(EntityKind::Ball, Shape::Circle { radius: 12.0 }, Vec2::ZERO, Body::ball());
        assert!(c > b);
    }

    #[test]
    fn test_impulse_ignored_for_static() {
        let mut w = world();
        let paddle = w.spawn(EntityKind::Paddle, Shape::rect(120.0, 24.0), Vec2::ZERO, Body::paddle());
        w.apply_impulse(paddle, Vec2::new(8.0, -8.0), 0.025);
        assert_eq!(w.get(paddle).map(|e| e.vel), Some(Vec2::ZERO));

        let ball = spawn_ball(&mut w, Vec2::new(100.0, 400.0), Vec2::ZERO);
        w.apply_impulse(ball, Vec2::new(8.0, -8.0), 0.025);
        let vel = w.get(ball).map(|e| e.vel).unwrap_or_default();
        assert!((vel - Vec2::new(320.0, -320.0)).length() < 0.01);
    }

    #[test]
    fn test_border_bounce() {
        let mut w = world();
        let ball = spawn_ball(&mut w, Vec2::new(380.0, 400.0), Vec2::new(300.0, 0.0));
        let contacts = w.step(1.0 / 120.0);
        // The border is not an entity, no contact
        assert!(contacts.is_empty());
        let e = w.get(ball).cloned().unwrap_or_else(|| panic!("ball missing"));
        assert!(e.vel.x < 0.0);
        assert!(e.pos.x <= 390.0 - 12.0 + 0.001);
    }

    #[test]
    fn test_paddle_bounce_reports_once() {
        let mut w = world();
        let paddle = w.spawn(
            EntityKind::Paddle,
            Shape::rect(120.0, 24.0),
            Vec2::new(195.0, 40.0),
            Body::paddle(),
        );
        // Ball just above the paddle top (52), falling
        let ball = spawn_ball(&mut w, Vec2::new(195.0, 65.0), Vec2::new(0.0, -240.0));
        let contacts = w.step(1.0 / 120.0);
        assert_eq!(contacts, vec![Contact { a: paddle, b: ball }]);
        let vel = w.get(ball).map(|e| e.vel).unwrap_or_default();
        assert!(vel.y > 0.0, "ball should bounce upward");

        // Moving away: no further contact reports
        for _ in 0..10 {
            assert!(w.step(1.0 / 120.0).is_empty());
        }
    }

    #[test]
    fn test_sensor_reports_once_without_blocking() {
        let mut w = world();
        w.spawn(
            EntityKind::Floor,
            Shape::rect(390.0, 24.0),
            Vec2::new(195.0, 12.0),
            Body::floor(),
        );
        let ball = spawn_ball(&mut w, Vec2::new(195.0, 38.0), Vec2::new(0.0, -240.0));
        let mut reported = 0;
        for _ in 0..6 {
            reported += w.step(1.0 / 120.0).len();
        }
        assert_eq!(reported, 1);
        // Ball passed into the sensor instead of bouncing
        let vel = w.get(ball).map(|e| e.vel).unwrap_or_default();
        assert!(vel.y < 0.0);
    }

    #[test]
    fn test_despawn_forgets_touching_pairs() {
        let mut w = world();
        let floor = w.spawn(
            EntityKind::Floor,
            Shape::rect(390.0, 24.0),
            Vec2::new(195.0, 12.0),
            Body::floor(),
        );
        let ball = spawn_ball(&mut w, Vec2::new(195.0, 20.0), Vec2::ZERO);
        assert_eq!(w.step(1.0 / 120.0), vec![Contact { a: floor, b: ball }]);
        w.despawn(ball);
        assert!(w.step(1.0 / 120.0).is_empty());
        // A new ball in the same spot is a fresh contact
        let ball = spawn_ball(&mut w, Vec2::new(195.0, 20.0), Vec2::ZERO);
        assert_eq!(w.step(1.0 / 120.0), vec![Contact { a: floor, b: ball }]);
    }

    #[test]
    fn test_corner_near_miss_is_not_contact() {
        let mut w = world();
        let paddle = w.spawn(
            EntityKind::Paddle,
            Shape::rect(120.0, 24.0),
            Vec2::new(195.0, 40.0),
            Body::paddle(),
        );
        // Bounding boxes overlap at the paddle's top-right corner (255, 52),
        // but the circle is 14.1 from it
        let ball = spawn_ball(&mut w, Vec2::new(265.0, 62.0), Vec2::ZERO);
        let bounds = w.get(paddle).map(|e| e.aabb());
        let ball_bounds = w.get(ball).map(|e| e.aabb());
        assert!(matches!((ball_bounds, bounds), (Some(b), Some(p)) if b.overlaps(&p)));

        assert!(w.step(1.0 / 120.0).is_empty());
        assert_eq!(w.get(ball).map(|e| e.pos), Some(Vec2::new(265.0, 62.0)));

        // Nudged into the corner it becomes a contact
        if let Some(e) = w.get_mut(ball) {
            e.pos = Vec2::new(262.0, 59.0);
        }
        assert_eq!(w.step(1.0 / 120.0), vec![Contact { a: paddle, b: ball }]);
    }

    #[test]
    fn test_far_apart_boxes_do_not_overlap() {
        let mut w = world();
        let brick = w.spawn(
            EntityKind::Brick { color: BrickColor::Red },
            Shape::rect(35.0, 16.0),
            Vec2::new(100.0, 700.0),
            Body::brick(),
        );
        let ball = spawn_ball(&mut w, Vec2::new(100.0, 400.0), Vec2::ZERO);
        let (Some(brick), Some(ball)) = (w.get(brick), w.get(ball)) else {
            panic!("entities missing");
        };
        assert!(!ball.aabb().overlaps(&brick.aabb()));
        assert!(brick.aabb().overlaps(&brick.aabb()));
    }

    #[test]
    fn test_contact_swapped() {
        let c = Contact {
            a: EntityId(1),
            b: EntityId(2),
        };
        assert_eq!(c.swapped().a, EntityId(2));
        assert_eq!(c.swapped().swapped(), c);
    }
}
