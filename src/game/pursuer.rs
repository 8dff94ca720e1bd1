//! Pursuers: hostile entities that chase the actor.

use serde::{Serialize, Deserialize};

use crate::core::hash::StateHasher;
use crate::core::vec2::{Real, Vec2};
use crate::game::collision::circles_overlap;
use crate::game::config::PursuerConfig;
use crate::game::EntityId;

/// A hostile entity.
///
/// `alive` is true exactly while health is above zero. Once it flips the
/// pursuer is inert until the loop sweeps it out.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Pursuer {
    id: EntityId,
    position: Vec2,
    health: Real,
    max_health: Real,
    radius: Real,
    speed: Real,
    alive: bool,
}

impl Pursuer {
    /// Create a pursuer at full health.
    pub fn new(id: EntityId, position: Vec2, config: &PursuerConfig) -> Self {
        Self {
            id,
            position,
            health: config.max_health,
            max_health: config.max_health,
            radius: config.radius,
            speed: config.speed,
            alive: true,
        }
    }

    /// Step `speed` units towards `target`.
    ///
    /// No-op when dead or already standing on the target.
    pub fn move_towards(&mut self, target: Vec2) {
        if !self.alive {
            return;
        }
        if let Some(dir) = self.position.direction_to(target) {
            self.position += dir.scale(self.speed);
        }
    }

    /// Apply damage. Returns whether the pursuer is still alive.
    ///
    /// Death is permanent; further damage keeps it dead.
    pub fn take_damage(&mut self, amount: Real) -> bool {
        self.health = (self.health - amount.max(0.0)).max(0.0);
        if self.health <= 0.0 {
            self.alive = false;
        }
        self.alive
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

    /// Current health.
    #[inline]
    pub fn health(&self) -> Real {
        self.health
    }

    /// Health as a fraction of maximum.
    #[inline]
    pub fn health_ratio(&self) -> Real {
        self.health / self.max_health
    }

    /// Collision radius.
    #[inline]
    pub fn radius(&self) -> Real {
        self.radius
    }

    /// Whether the pursuer is still in play.
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Hash this pursuer's state for verification.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_u32(self.id);
        hasher.update_vec2(self.position);
        hasher.update_real(self.health);
        hasher.update_bool(self.alive);
    }
}
