//! Player-controlled actor.

use serde::{Serialize, Deserialize};

use crate::core::hash::StateHasher;
use crate::core::vec2::{Real, Vec2};
use crate::game::config::GameConfig;
use crate::game::input::Direction;

/// Health ratio at or below which the actor is displayed as critical.
pub const CRITICAL_HEALTH_RATIO: Real = 0.3;

/// The single player-controlled entity.
///
/// Position always stays inside the arena shrunk by the actor's radius.
/// Health only goes down during a session.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Actor {
    position: Vec2,
    health: Real,
    max_health: Real,
    radius: Real,
    speed: Real,
    fire_interval_ms: u64,
    /// Timestamp of the last accepted shot (`None` until the first one)
    last_fire_ms: Option<u64>,
    bounds_min: Vec2,
    bounds_max: Vec2,
}

impl Actor {
    /// Create the actor at its configured start position (clamped into bounds).
    pub fn new(config: &GameConfig) -> Self {
        let bounds_min = config.actor_min_position();
        let bounds_max = config.actor_max_position();
        let start = config.actor_start();

        Self {
            position: start.clamp_to_rect(bounds_min, bounds_max),
            health: config.actor.max_health,
            max_health: config.actor.max_health,
            radius: config.actor.radius,
            speed: config.actor.speed,
            fire_interval_ms: config.actor.fire_interval_ms,
            last_fire_ms: None,
            bounds_min,
            bounds_max,
        }
    }

    /// Step by `direction * speed`, then clamp each axis to the arena.
    ///
    /// Diagonal input is not normalized.
    pub fn move_by(&mut self, direction: Direction) {
        let step = Vec2::new(direction.dx as Real, direction.dy as Real).scale(self.speed);
        self.position = (self.position + step).clamp_to_rect(self.bounds_min, self.bounds_max);
    }

    /// Apply damage. Returns whether the actor is still alive.
    pub fn take_damage(&mut self, amount: Real) -> bool {
        self.health = (self.health - amount.max(0.0)).max(0.0);
        self.is_alive()
    }

    /// Check the fire cooldown and, if it has elapsed, commit a shot at `now_ms`.
    ///
    /// Mutates on success: only call when actually about to fire.
    pub fn can_fire(&mut self, now_ms: u64) -> bool {
        let ready = match self.last_fire_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) >= self.fire_interval_ms,
        };
        if ready {
            self.last_fire_ms = Some(now_ms);
        }
        ready
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

    /// Collision radius.
    #[inline]
    pub fn radius(&self) -> Real {
        self.radius
    }

    /// Whether health is above zero.
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Health as a fraction of maximum, in [0, 1].
    #[inline]
    pub fn health_ratio(&self) -> Real {
        self.health / self.max_health
    }

    /// Health rounded up for display.
    #[inline]
    pub fn displayed_health(&self) -> u32 {
        self.health.ceil() as u32
    }

    /// Timestamp of the last accepted shot.
    #[inline]
    pub fn last_fire_ms(&self) -> Option<u64> {
        self.last_fire_ms
    }

    /// Hash this actor's mutable state for verification.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_vec2(self.position);
        hasher.update_real(self.health);
        hasher.update_u64(self.last_fire_ms.unwrap_or(u64::MAX));
    }
}
