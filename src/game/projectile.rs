//! Projectiles fired by the actor.

use serde::{Serialize, Deserialize};

use crate::core::hash::StateHasher;
use crate::core::vec2::{Real, Vec2};
use crate::game::collision::circles_overlap;
use crate::game::config::ProjectileConfig;
use crate::game::EntityId;

/// A projectile travelling in a straight line.
///
/// `active` is true while it is on screen and has not hit anything.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Projectile {
    id: EntityId,
    position: Vec2,
    velocity: Vec2,
    radius: Real,
    offscreen_margin: Real,
    active: bool,
}

impl Projectile {
    /// Fire from `start` towards `aim`.
    ///
    /// Velocity is fixed here. If `start == aim` the projectile travels
    /// along +x.
    pub fn new(id: EntityId, start: Vec2, aim: Vec2, config: &ProjectileConfig) -> Self {
        let dir = start.direction_to(aim).unwrap_or(Vec2::RIGHT);
        Self {
            id,
            position: start,
            velocity: dir.scale(config.speed),
            radius: config.radius,
            offscreen_margin: config.offscreen_margin,
            active: true,
        }
    }

    /// Move one tick, deactivating once outside the padded bounds.
    pub fn advance(&mut self, bounds_width: Real, bounds_height: Real) {
        if !self.active {
            return;
        }

        self.position += self.velocity;

        let margin = self.offscreen_margin;
        let min = Vec2::new(-margin, -margin);
        let max = Vec2::new(bounds_width + margin, bounds_height + margin);
        if !self.position.is_within(min, max) {
            self.active = false;
        }
    }

    /// Mark as consumed by a hit.
    #[inline]
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Strict circle test against a point with radius `other_radius`.
    #[inline]
    pub fn is_colliding_with(&self, point: Vec2, other_radius: Real) -> bool {
        circles_overlap(self.position, self.radius, point, other_radius)
    }

    /// Entity id.
    #[inline]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Current position.
    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Per-tick displacement.
    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Whether the projectile is still in flight.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Hash this projectile's state for verification.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_u32(self.id);
        hasher.update_vec2(self.position);
        hasher.update_vec2(self.velocity);
        hasher.update_bool(self.active);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDTH: Real = 1280.0;
    const HEIGHT: Real = 720.0;

    fn fire(start: Vec2, aim: Vec2) -> Projectile {
        Projectile::new(0, start, aim, &ProjectileConfig::default())
    }

    #[test]
    fn test_velocity_towards_aim() {
        let p = fire(Vec2::new(0.0, 0.0), Vec2::new(30.0, 40.0));
        assert!((p.velocity().length() - 10.0).abs() < 1e-12);
        assert!((p.velocity().x - 6.0).abs() < 1e-12);
        assert!((p.velocity().y - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_aim_fires_right() {
        let start = Vec2::new(300.0, 200.0);
        let mut p = fire(start, start);
        assert_eq!(p.velocity(), Vec2::new(10.0, 0.0));

        p.advance(WIDTH, HEIGHT);
        p.advance(WIDTH, HEIGHT);
        assert_eq!(p.position(), Vec2::new(320.0, 200.0));
    }

    #[test]
    fn test_reaches_lone_pursuer_in_expected_ticks() {
        let start = Vec2::new(150.0, 360.0);
        let target = Vec2::new(1250.0, 360.0);
        let config = ProjectileConfig::default();
        let mut p = Projectile::new(0, start, target, &config);

        assert_eq!(p.velocity(), Vec2::new(config.speed, 0.0));

        let ticks = (1100.0 / config.speed).ceil() as u32;
        for _ in 0..ticks {
            p.advance(WIDTH, HEIGHT);
        }

        assert!(p.position().x >= 1250.0);
        assert!(p.is_active());
        assert!(p.is_colliding_with(target, 30.0));
    }

    #[test]
    fn test_expires_past_margin() {
        let mut p = fire(Vec2::new(1320.0, 360.0), Vec2::new(2000.0, 360.0));
        p.advance(WIDTH, HEIGHT);
        // 1330 is exactly at the padded edge
        assert!(p.is_active());
        p.advance(WIDTH, HEIGHT);
        assert!(!p.is_active());

        // Inactive projectiles stay put
        let frozen = p.position();
        p.advance(WIDTH, HEIGHT);
        assert_eq!(p.position(), frozen);
    }

    #[test]
    fn test_expires_on_every_edge() {
        let edges = [
            (Vec2::new(10.0, 360.0), Vec2::new(0.0, 360.0)),
            (Vec2::new(640.0, 10.0), Vec2::new(640.0, 0.0)),
            (Vec2::new(640.0, 710.0), Vec2::new(640.0, 720.0)),
        ];
        for (start, aim) in edges {
            let mut p = fire(start, aim);
            for _ in 0..7 {
                p.advance(WIDTH, HEIGHT);
            }
            assert!(!p.is_active(), "projectile from {} should expire", start);
        }
    }

    #[test]
    fn test_deactivate() {
        let mut p = fire(Vec2::new(100.0, 100.0), Vec2::new(200.0, 100.0));
        p.deactivate();
        assert!(!p.is_active());
    }

    #[test]
    fn test_collision_uses_own_radius() {
        let p = fire(Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0));
        // radius 8 + 30 = 38
        assert!(p.is_colliding_with(Vec2::new(37.9, 0.0), 30.0));
        assert!(!p.is_colliding_with(Vec2::new(38.0, 0.0), 30.0));
    }
}
