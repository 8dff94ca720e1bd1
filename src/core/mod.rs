//! Core deterministic primitives.
//!
//! Vector math, seeded randomness and state hashing shared by the
//! simulation. Nothing in here reads the system clock or global state.

pub mod vec2;
pub mod rng;
pub mod hash;

// Re-export core types
pub use vec2::{Real, Vec2};
pub use rng::DeterministicRng;
pub use hash::{StateHash, StateHasher, compute_state_hash};
