//! # Archer Survival
//!
//! Deterministic simulation core for a top-down survival shooter: one
//! actor fires at the nearest of an endless wave of pursuers until contact
//! damage wears it down.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     ARCHER SURVIVAL                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── vec2.rs     - 2D vector math                            │
//! │  ├── rng.rs      - Deterministic Xorshift128+ PRNG           │
//! │  └── hash.rs     - State hashing for verification            │
//! │                                                              │
//! │  game/           - Session logic (deterministic)             │
//! │  ├── config.rs   - Tuning bundle, JSON loading               │
//! │  ├── input.rs    - Input sources, frames, recording          │
//! │  ├── actor.rs    - Player-controlled actor                   │
//! │  ├── pursuer.rs  - Hostile pursuers                          │
//! │  ├── projectile.rs - Projectiles                             │
//! │  ├── spawn.rs    - Spawn cadence and placement               │
//! │  ├── collision.rs- Collision detection                       │
//! │  ├── tick.rs     - Authoritative simulation loop             │
//! │  ├── events.rs   - Per-tick events                           │
//! │  └── snapshot.rs - Read-only presentation view               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! The `core/` and `game/` modules never read the system clock or any
//! global state:
//! - Time is passed into every `update` by the caller
//! - Entities live in insertion-ordered `Vec`s
//! - All randomness comes from a seeded Xorshift128+
//!
//! Given identical config, seed, inputs and timestamps, a session produces
//! the same state digest on every run.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;

// Re-export commonly used types
pub use crate::core::vec2::{Real, Vec2};
pub use crate::core::rng::DeterministicRng;
pub use crate::game::config::{GameConfig, ConfigError};
pub use crate::game::input::{InputFrame, InputRecording, InputSource, KeyboardState};
pub use crate::game::tick::{SimulationLoop, SessionPhase, TickResult};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Simulation tick rate (Hz)
pub const TICK_RATE: u32 = 60;

/// Milliseconds per tick on a synthetic clock
pub const TICK_MS: u64 = 1000 / TICK_RATE as u64;
