//! Game Events
//!
//! Events generated during simulation for logging, presentation and replay
//! comparison.

use serde::{Serialize, Deserialize};

use crate::core::vec2::{Real, Vec2};
use crate::game::EntityId;

/// Game event data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameEventData {
    /// Actor fired a projectile
    ProjectileFired {
        projectile_id: EntityId,
        origin: Vec2,
        aim: Vec2,
        /// Pursuer targeted, `None` when fired at the default aim point
        target_id: Option<EntityId>,
    },

    /// A pursuer entered the arena
    PursuerSpawned {
        pursuer_id: EntityId,
        position: Vec2,
    },

    /// A projectile hit a pursuer that survived
    PursuerHit {
        pursuer_id: EntityId,
        projectile_id: EntityId,
        remaining_health: Real,
    },

    /// A projectile killed a pursuer
    PursuerKilled {
        pursuer_id: EntityId,
        projectile_id: EntityId,
        reward: u32,
        new_score: u32,
    },

    /// A pursuer's contact damaged the actor
    ActorDamaged {
        pursuer_id: EntityId,
        amount: Real,
        remaining_health: Real,
    },

    /// The actor died; no further events follow
    SessionEnded {
        final_score: u32,
    },
}

/// A game event with the tick it occurred on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Tick when event occurred
    pub tick: u32,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(tick: u32, data: GameEventData) -> Self {
        Self { tick, data }
    }

    /// Create projectile fired event.
    pub fn projectile_fired(
        tick: u32,
        projectile_id: EntityId,
        origin: Vec2,
        aim: Vec2,
        target_id: Option<EntityId>,
    ) -> Self {
        Self::new(
            tick,
            GameEventData::ProjectileFired {
                projectile_id,
                origin,
                aim,
                target_id,
            },
        )
    }

    /// Create pursuer spawned event.
    pub fn pursuer_spawned(tick: u32, pursuer_id: EntityId, position: Vec2) -> Self {
        Self::new(tick, GameEventData::PursuerSpawned { pursuer_id, position })
    }

    /// Create pursuer hit event.
    pub fn pursuer_hit(
        tick: u32,
        pursuer_id: EntityId,
        projectile_id: EntityId,
        remaining_health: Real,
    ) -> Self {
        Self::new(
            tick,
            GameEventData::PursuerHit {
                pursuer_id,
                projectile_id,
                remaining_health,
            },
        )
    }

    /// Create pursuer killed event.
    pub fn pursuer_killed(
        tick: u32,
        pursuer_id: EntityId,
        projectile_id: EntityId,
        reward: u32,
        new_score: u32,
    ) -> Self {
        Self::new(
            tick,
            GameEventData::PursuerKilled {
                pursuer_id,
                projectile_id,
                reward,
                new_score,
            },
        )
    }

    /// Create actor damaged event.
    pub fn actor_damaged(tick: u32, pursuer_id: EntityId, amount: Real, remaining_health: Real) -> Self {
        Self::new(
            tick,
            GameEventData::ActorDamaged {
                pursuer_id,
                amount,
                remaining_health,
            },
        )
    }

    /// Create session ended event.
    pub fn session_ended(tick: u32, final_score: u32) -> Self {
        Self::new(tick, GameEventData::SessionEnded { final_score })
    }

    /// Whether this is the terminal event.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self.data, GameEventData::SessionEnded { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_carry_tick() {
        let event = GameEvent::pursuer_killed(42, 3, 7, 10, 20);
        assert_eq!(event.tick, 42);
        assert_eq!(
            event.data,
            GameEventData::PursuerKilled {
                pursuer_id: 3,
                projectile_id: 7,
                reward: 10,
                new_score: 20,
            }
        );
        assert!(!event.is_terminal());
        assert!(GameEvent::session_ended(600, 0).is_terminal());
    }

    #[test]
    fn test_event_json_shape() {
        let event = GameEvent::session_ended(12, 30);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["tick"], 12);
        assert_eq!(json["data"]["SessionEnded"]["final_score"], 30);

        let back: GameEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }
}
