//! Authoritative Simulation Tick
//!
//! The per-frame loop. Each `update` runs, in this fixed order:
//!
//! 1. Input (move, maybe fire)
//! 2. Advance projectiles, then living pursuers
//! 3. Spawn
//! 4. Collisions: projectiles vs pursuers, then pursuers vs actor
//! 5. Sweep inactive projectiles and dead pursuers
//! 6. Terminal check
//!
//! Entities flagged dead in step 4 stay in their collections until step 5,
//! so they are visible to collision logic for exactly the tick they died in.

use serde::{Serialize, Deserialize};
use tracing::{debug, info, trace};

use crate::core::hash::{compute_state_hash, StateHash};
use crate::core::rng::DeterministicRng;
use crate::core::vec2::Vec2;
use crate::game::actor::Actor;
use crate::game::collision::nearest;
use crate::game::config::GameConfig;
use crate::game::events::GameEvent;
use crate::game::input::{InputRecording, InputSource};
use crate::game::projectile::Projectile;
use crate::game::pursuer::Pursuer;
use crate::game::snapshot::{ActorView, ProjectileView, PursuerView, SessionSnapshot};
use crate::game::spawn::SpawnController;
use crate::game::EntityId;

/// Offset of the aim point used when there is nothing to shoot at.
const DEFAULT_AIM_OFFSET: Vec2 = Vec2::new(100.0, 0.0);

/// Session state machine. `Running -> GameOver` is one-way.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Ticks are being simulated
    #[default]
    Running,
    /// The actor died; `update` is a no-op from here on
    GameOver {
        /// Score at the moment of death
        final_score: u32,
    },
}

/// Result of a tick.
#[derive(Debug, Default)]
pub struct TickResult {
    /// Events generated this tick
    pub events: Vec<GameEvent>,
    /// Whether the session is over (set on the terminal tick and every call after)
    pub session_ended: bool,
}

/// Owns the actor, every projectile and pursuer, the score and the RNG.
///
/// Collections are private; all mutation goes through the entities' own
/// methods, driven from `update`.
#[derive(Clone, Debug)]
pub struct SimulationLoop {
    config: GameConfig,
    seed: u64,
    rng: DeterministicRng,
    spawner: SpawnController,
    actor: Actor,
    projectiles: Vec<Projectile>,
    pursuers: Vec<Pursuer>,
    score: u32,
    phase: SessionPhase,
    tick: u32,
    last_spawn_ms: Option<u64>,
    next_entity_id: EntityId,
    pending_events: Vec<GameEvent>,
}

impl SimulationLoop {
    /// Start a session. The configuration is fixed for its lifetime.
    pub fn new(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            seed,
            rng: DeterministicRng::new(seed),
            spawner: SpawnController::new(config.arena, config.spawn),
            actor: Actor::new(&config),
            projectiles: Vec::new(),
            pursuers: Vec::new(),
            score: 0,
            phase: SessionPhase::Running,
            tick: 0,
            last_spawn_ms: None,
            next_entity_id: 0,
            pending_events: Vec::new(),
        }
    }

    /// Run one simulation tick at caller-supplied time `now_ms`.
    ///
    /// Once the session is over this returns immediately without touching
    /// any state.
    pub fn update<I: InputSource + ?Sized>(&mut self, input: &I, now_ms: u64) -> TickResult {
        if self.is_game_over() {
            return TickResult {
                events: Vec::new(),
                session_ended: true,
            };
        }

        self.tick += 1;

        // 1. Input
        self.apply_input(input, now_ms);

        // 2. Advance
        self.advance_entities();

        // 3. Spawn
        self.maybe_spawn(now_ms);

        // 4. Collisions
        self.resolve_projectile_hits();
        let actor_died = self.resolve_contact_damage();

        // 5. Cleanup
        self.projectiles.retain(Projectile::is_active);
        self.pursuers.retain(Pursuer::is_alive);

        // 6. Terminal check
        if actor_died {
            self.end_session();
        }

        TickResult {
            events: std::mem::take(&mut self.pending_events),
            session_ended: self.is_game_over(),
        }
    }

    fn apply_input<I: InputSource + ?Sized>(&mut self, input: &I, now_ms: u64) {
        self.actor.move_by(input.direction());

        if !input.is_firing() || !self.actor.can_fire(now_ms) {
            return;
        }

        let origin = self.actor.position();
        let target = nearest(
            origin,
            self.pursuers.iter().filter(|p| p.is_alive()).map(Pursuer::position),
        )
        .and_then(|idx| self.pursuers.iter().filter(|p| p.is_alive()).nth(idx));

        let (aim, target_id) = match target {
            Some(pursuer) => (pursuer.position(), Some(pursuer.id())),
            None => (origin + DEFAULT_AIM_OFFSET, None),
        };

        let id = self.allocate_id();
        self.projectiles.push(Projectile::new(id, origin, aim, &self.config.projectile));

        debug!(tick = self.tick, projectile = id, ?target_id, "projectile fired");
        self.pending_events
            .push(GameEvent::projectile_fired(self.tick, id, origin, aim, target_id));
    }

    fn advance_entities(&mut self) {
        let (width, height) = (self.config.arena.width, self.config.arena.height);
        for projectile in &mut self.projectiles {
            projectile.advance(width, height);
        }

        let target = self.actor.position();
        for pursuer in self.pursuers.iter_mut().filter(|p| p.is_alive()) {
            pursuer.move_towards(target);
        }
    }

    fn maybe_spawn(&mut self, now_ms: u64) {
        let Some(request) = self.spawner.poll(now_ms, self.last_spawn_ms, &mut self.rng) else {
            return;
        };
        self.last_spawn_ms = Some(now_ms);

        let id = self.allocate_id();
        self.pursuers.push(Pursuer::new(id, request.position, &self.config.pursuer));

        debug!(tick = self.tick, pursuer = id, x = request.position.x, y = request.position.y, "pursuer spawned");
        self.pending_events
            .push(GameEvent::pursuer_spawned(self.tick, id, request.position));
    }

    /// Each active projectile hits at most the first living pursuer it overlaps.
    fn resolve_projectile_hits(&mut self) {
        let damage = self.config.projectile.damage;
        let reward = self.config.pursuer.kill_reward;

        for projectile in self.projectiles.iter_mut().filter(|p| p.is_active()) {
            let hit = self
                .pursuers
                .iter_mut()
                .filter(|p| p.is_alive())
                .find(|p| projectile.is_colliding_with(p.position(), p.radius()));

            let Some(pursuer) = hit else {
                continue;
            };

            projectile.deactivate();
            if pursuer.take_damage(damage) {
                trace!(tick = self.tick, pursuer = pursuer.id(), health = pursuer.health(), "pursuer hit");
                self.pending_events.push(GameEvent::pursuer_hit(
                    self.tick,
                    pursuer.id(),
                    projectile.id(),
                    pursuer.health(),
                ));
            } else {
                self.score = self.score.saturating_add(reward);
                trace!(tick = self.tick, pursuer = pursuer.id(), score = self.score, "pursuer killed");
                self.pending_events.push(GameEvent::pursuer_killed(
                    self.tick,
                    pursuer.id(),
                    projectile.id(),
                    reward,
                    self.score,
                ));
            }
        }
    }

    /// Returns true if the actor died. Stops at the killing contact.
    fn resolve_contact_damage(&mut self) -> bool {
        let damage = self.config.contact_damage_per_tick();
        let (position, radius) = (self.actor.position(), self.actor.radius());

        for pursuer in self.pursuers.iter().filter(|p| p.is_alive()) {
            if !pursuer.is_colliding_with(position, radius) {
                continue;
            }

            let alive = self.actor.take_damage(damage);
            self.pending_events.push(GameEvent::actor_damaged(
                self.tick,
                pursuer.id(),
                damage,
                self.actor.health(),
            ));
            if !alive {
                return true;
            }
        }

        false
    }

    fn end_session(&mut self) {
        self.phase = SessionPhase::GameOver {
            final_score: self.score,
        };
        info!(tick = self.tick, final_score = self.score, "session over");
        self.pending_events
            .push(GameEvent::session_ended(self.tick, self.score));
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = self.next_entity_id;
        self.next_entity_id += 1;
        id
    }

    /// Read-only view for presentation.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            tick: self.tick,
            score: self.score,
            phase: self.phase,
            actor: ActorView::from(&self.actor),
            pursuers: self.pursuers.iter().map(PursuerView::from).collect(),
            projectiles: self.projectiles.iter().map(ProjectileView::from).collect(),
        }
    }

    /// Digest of the full simulation state, for replay verification.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.tick, self.seed, |hasher| {
            hasher.update_u32(self.score);
            match self.phase {
                SessionPhase::Running => hasher.update_u8(0),
                SessionPhase::GameOver { final_score } => {
                    hasher.update_u8(1);
                    hasher.update_u32(final_score);
                }
            }
            hasher.update_u64(self.last_spawn_ms.unwrap_or(u64::MAX));
            hasher.update_u32(self.next_entity_id);

            self.actor.hash_into(hasher);

            hasher.update_u32(self.pursuers.len() as u32);
            for pursuer in &self.pursuers {
                pursuer.hash_into(hasher);
            }

            hasher.update_u32(self.projectiles.len() as u32);
            for projectile in &self.projectiles {
                projectile.hash_into(hasher);
            }
        })
    }

    /// Ticks simulated so far.
    #[inline]
    pub fn tick(&self) -> u32 {
        self.tick
    }

    /// RNG seed the session was started with.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Current score.
    #[inline]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Current phase.
    #[inline]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Whether the actor has died.
    #[inline]
    pub fn is_game_over(&self) -> bool {
        matches!(self.phase, SessionPhase::GameOver { .. })
    }

    /// Session configuration.
    #[inline]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The actor.
    #[inline]
    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    /// Live pursuers in registration order.
    #[inline]
    pub fn pursuers(&self) -> &[Pursuer] {
        &self.pursuers
    }

    /// Live projectiles in registration order.
    #[inline]
    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// A session whose spawner never fires, for hand-placed scenarios.
    #[cfg(test)]
    pub(crate) fn without_spawns(mut config: GameConfig, seed: u64) -> Self {
        config.spawn.interval_ms = u64::MAX;
        let mut session = Self::new(config, seed);
        session.last_spawn_ms = Some(0);
        session
    }

    /// Register a pursuer directly.
    #[cfg(test)]
    pub(crate) fn place_pursuer(&mut self, position: Vec2) -> EntityId {
        let id = self.allocate_id();
        self.pursuers.push(Pursuer::new(id, position, &self.config.pursuer));
        id
    }

    /// Register a projectile directly.
    #[cfg(test)]
    pub(crate) fn place_projectile(&mut self, start: Vec2, aim: Vec2) -> EntityId {
        let id = self.allocate_id();
        self.projectiles.push(Projectile::new(id, start, aim, &self.config.projectile));
        id
    }
}

/// Replay a session from recorded inputs on a synthetic clock
/// (`now = tick_index * tick_ms`).
///
/// Stops early if the session ends. Returns the final loop and every event.
pub fn replay_session(
    config: GameConfig,
    seed: u64,
    recording: &InputRecording,
    tick_count: u32,
    tick_ms: u64,
) -> (SimulationLoop, Vec<GameEvent>) {
    let mut session = SimulationLoop::new(config, seed);
    let mut all_events = Vec::new();

    for t in 0..tick_count {
        let frame = recording.input_at(t);
        let result = session.update(&frame, u64::from(t) * tick_ms);
        all_events.extend(result.events);

        if result.session_ended {
            break;
        }
    }

    (session, all_events)
}
