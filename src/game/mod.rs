//! Game Logic Module
//!
//! All session simulation code. Deterministic for a given seed, input
//! sequence and clock readings.
//!
//! ## Module Structure
//!
//! - `config`: Tuning bundle, JSON loading and validation
//! - `input`: Input sources, per-tick frames, recording
//! - `actor`: The player-controlled actor
//! - `pursuer`: Hostile entities
//! - `projectile`: Shots fired by the actor
//! - `spawn`: Pursuer spawn cadence and placement
//! - `collision`: Circle overlap and target selection
//! - `tick`: The per-frame simulation loop and replay
//! - `events`: Game events for logging and replay comparison
//! - `snapshot`: Read-only presentation view

pub mod config;
pub mod input;
pub mod actor;
pub mod pursuer;
pub mod projectile;
pub mod spawn;
pub mod collision;
pub mod tick;
pub mod events;
pub mod snapshot;

/// Identifier for pursuers and projectiles. Assigned monotonically, never reused.
pub type EntityId = u32;

// Re-export key types
pub use config::{GameConfig, ConfigError};
pub use input::{Direction, InputSource, KeyboardState, InputFrame, InputRecording};
pub use actor::Actor;
pub use pursuer::Pursuer;
pub use projectile::Projectile;
pub use spawn::SpawnController;
pub use tick::{SimulationLoop, SessionPhase, TickResult, replay_session};
pub use events::{GameEvent, GameEventData};
pub use snapshot::SessionSnapshot;
