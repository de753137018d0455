//! Collision detection and response for circles against boxes
//!
//! The ball is the only moving shape, so every test here is circle vs
//! axis-aligned rectangle (bricks, paddle, floor) or circle vs the arena's
//! edge loop.

use glam::Vec2;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Surface normal at collision (pointing toward ball center, for reflection)
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check collision between a ball and an axis-aligned rectangle
///
/// Uses the closest point on the box to the ball center. When the center is
/// already inside the box, the ball is pushed out through the nearest face.
pub fn ball_rect_collision(
    ball_pos: Vec2,
    ball_radius: f32,
    rect_center: Vec2,
    half_extents: Vec2,
) -> CollisionResult {
    let min = rect_center - half_extents;
    let max = rect_center + half_extents;
    let closest = ball_pos.clamp(min, max);
    let offset = ball_pos - closest;
    let dist_sq = offset.length_squared();

    if dist_sq >= ball_radius * ball_radius {
        return CollisionResult::miss();
    }

    if dist_sq > 1e-6 {
        let dist = dist_sq.sqrt();
        return CollisionResult {
            hit: true,
            normal: offset / dist,
            penetration: ball_radius - dist,
        };
    }

    // Center inside the box: leave through the nearest face
    let faces = [
        (ball_pos.x - min.x, Vec2::NEG_X),
        (max.x - ball_pos.x, Vec2::X),
        (ball_pos.y - min.y, Vec2::NEG_Y),
        (max.y - ball_pos.y, Vec2::Y),
    ];
    let (depth, normal) = faces
        .into_iter()
        .min_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
        .unwrap_or((0.0, Vec2::Y));

    CollisionResult {
        hit: true,
        normal,
        penetration: depth + ball_radius,
    }
}

/// Check collision with the arena's edge loop
///
/// Returns the wall with the deepest penetration; call again after correcting
/// to resolve a corner.
pub fn ball_border_collision(ball_pos: Vec2, ball_radius: f32, width: f32, height: f32) -> CollisionResult {
    let walls = [
        (ball_radius - ball_pos.x, Vec2::X),
        (ball_pos.x + ball_radius - width, Vec2::NEG_X),
        (ball_radius - ball_pos.y, Vec2::Y),
        (ball_pos.y + ball_radius - height, Vec2::NEG_Y),
    ];

    walls
        .into_iter()
        .filter(|(penetration, _)| *penetration > 0.0)
        .max_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(penetration, normal)| CollisionResult {
            hit: true,
            normal,
            penetration,
        })
        .unwrap_or_else(CollisionResult::miss)
}

/// Bounce velocity off a surface with the given restitution
///
/// Only the normal component changes, and only when moving into the surface.
/// With restitution 1 this is the mirror reflection v' = v - 2(v·n)n.
pub fn bounce(velocity: Vec2, normal: Vec2, restitution: f32) -> Vec2 {
    let approach = velocity.dot(normal);
    if approach >= 0.0 {
        return velocity;
    }
    velocity - (1.0 + restitution) * approach * normal
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ball_rect_collision_top_face() {
        // 35x16 brick at (100, 100), ball just above it
        let half = Vec2::new(17.5, 8.0);
        let result = ball_rect_collision(Vec2::new(100.0, 118.0), 12.0, Vec2::new(100.0, 100.0), half);
        assert!(result.hit);
        assert!((result.normal - Vec2::Y).length() < 0.001);
        assert!((result.penetration - 2.0).abs() < 0.001);
    }

    #[test]
    fn test_ball_rect_collision_corner() {
        let half = Vec2::new(10.0, 10.0);
        let ball_pos = Vec2::new(15.0, 15.0);
        let result = ball_rect_collision(ball_pos, 12.0, Vec2::ZERO, half);
        assert!(result.hit);
        // Normal points diagonally away from the corner
        assert!(result.normal.x > 0.5 && result.normal.y > 0.5);
        assert!((result.penetration - (12.0 - 50.0f32.sqrt())).abs() < 0.001);
    }

    #[test]
    fn test_ball_rect_collision_miss() {
        let half = Vec2::new(10.0, 10.0);
        let result = ball_rect_collision(Vec2::new(40.0, 0.0), 12.0, Vec2::ZERO, half);
        assert!(!result.hit);

        // Exactly touching is not a hit
        let result = ball_rect_collision(Vec2::new(22.0, 0.0), 12.0, Vec2::ZERO, half);
        assert!(!result.hit);
    }

    #[test]
    fn test_ball_rect_collision_center_inside() {
        let half = Vec2::new(60.0, 12.0);
        let result = ball_rect_collision(Vec2::new(0.0, 10.0), 12.0, Vec2::ZERO, half);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::Y);
        assert!((result.penetration - 14.0).abs() < 0.001);
    }

    #[test]
    fn test_border_collision() {
        // Inside - no collision
        let result = ball_border_collision(Vec2::new(100.0, 100.0), 12.0, 390.0, 844.0);
        assert!(!result.hit);

        // Touching right wall
        let result = ball_border_collision(Vec2::new(385.0, 100.0), 12.0, 390.0, 844.0);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::NEG_X);
        assert!((result.penetration - 7.0).abs() < 0.001);

        // Corner picks the deeper wall
        let result = ball_border_collision(Vec2::new(5.0, 840.0), 12.0, 390.0, 844.0);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::NEG_Y);
    }

    #[test]
    fn test_bounce() {
        let v = Vec2::new(320.0, -320.0);
        // Elastic bounce off the paddle top mirrors the vertical component
        assert_eq!(bounce(v, Vec2::Y, 1.0), Vec2::new(320.0, 320.0));
        // Ball moving right hits a wall whose normal points left
        assert_eq!(bounce(Vec2::new(100.0, 0.0), Vec2::NEG_X, 1.0), Vec2::new(-100.0, 0.0));
        // Dead stop on the normal axis
        assert_eq!(bounce(v, Vec2::Y, 0.0), Vec2::new(320.0, 0.0));
        // Separating: unchanged
        assert_eq!(bounce(v, Vec2::NEG_Y, 1.0), v);
    }
}
