//! Read-only presentation view of a session.
//!
//! Built on demand from the loop. Nothing here is ever fed back into the
//! simulation.

use serde::Serialize;

use crate::core::vec2::{Real, Vec2};
use crate::game::actor::{Actor, CRITICAL_HEALTH_RATIO};
use crate::game::projectile::Projectile;
use crate::game::pursuer::Pursuer;
use crate::game::tick::SessionPhase;
use crate::game::EntityId;

/// Actor fields a renderer needs.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ActorView {
    /// Centre position
    pub position: Vec2,
    /// Exact health
    pub health: Real,
    /// Health rounded up
    pub displayed_health: u32,
    /// Health as a fraction of maximum
    pub health_ratio: Real,
    /// Health bar should be drawn in the warning colour
    pub critical: bool,
}

impl From<&Actor> for ActorView {
    fn from(actor: &Actor) -> Self {
        let health_ratio = actor.health_ratio();
        Self {
            position: actor.position(),
            health: actor.health(),
            displayed_health: actor.displayed_health(),
            health_ratio,
            critical: health_ratio <= CRITICAL_HEALTH_RATIO,
        }
    }
}

/// Pursuer fields a renderer needs.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PursuerView {
    /// Entity id
    pub id: EntityId,
    /// Centre position
    pub position: Vec2,
    /// Health as a fraction of maximum
    pub health_ratio: Real,
}

impl From<&Pursuer> for PursuerView {
    fn from(pursuer: &Pursuer) -> Self {
        Self {
            id: pursuer.id(),
            position: pursuer.position(),
            health_ratio: pursuer.health_ratio(),
        }
    }
}

/// Projectile fields a renderer needs.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProjectileView {
    /// Entity id
    pub id: EntityId,
    /// Centre position
    pub position: Vec2,
}

impl From<&Projectile> for ProjectileView {
    fn from(projectile: &Projectile) -> Self {
        Self {
            id: projectile.id(),
            position: projectile.position(),
        }
    }
}

/// Everything needed to draw one frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SessionSnapshot {
    /// Ticks simulated so far
    pub tick: u32,
    /// Current score
    pub score: u32,
    /// Running or over
    pub phase: SessionPhase,
    /// The actor
    pub actor: ActorView,
    /// Live pursuers in registration order
    pub pursuers: Vec<PursuerView>,
    /// Live projectiles in registration order
    pub projectiles: Vec<ProjectileView>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::config::GameConfig;

    #[test]
    fn test_actor_view_critical_threshold() {
        let mut actor = Actor::new(&GameConfig::default());

        actor.take_damage(69.0);
        let view = ActorView::from(&actor);
        assert_eq!(view.displayed_health, 31);
        assert!(!view.critical);

        actor.take_damage(1.0);
        let view = ActorView::from(&actor);
        assert_eq!(view.health_ratio, 0.3);
        assert!(view.critical);
    }

    #[test]
    fn test_actor_view_rounds_up() {
        let mut actor = Actor::new(&GameConfig::default());
        actor.take_damage(0.5);
        assert_eq!(ActorView::from(&actor).displayed_health, 100);
    }
}
