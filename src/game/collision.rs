//! Collision Detection
//!
//! Circle-overlap predicates and target selection shared by projectiles,
//! pursuers and the simulation loop.

use crate::core::vec2::{Real, Vec2};

/// Check if two circles overlap.
///
/// Strict: circles that exactly touch (`distance == radius_a + radius_b`)
/// do not collide.
#[inline]
pub fn circles_overlap(pos_a: Vec2, radius_a: Real, pos_b: Vec2, radius_b: Real) -> bool {
    pos_a.distance(pos_b) < radius_a + radius_b
}

/// Index of the entity closest to `origin`.
///
/// Ties keep the first candidate in iteration order, so selection is stable
/// for a given registration order. Returns `None` for an empty iterator.
pub fn nearest<I>(origin: Vec2, candidates: I) -> Option<usize>
where
    I: IntoIterator<Item = Vec2>,
{
    let mut best: Option<(usize, Real)> = None;

    for (idx, pos) in candidates.into_iter().enumerate() {
        let dist = origin.distance(pos);
        match best {
            Some((_, best_dist)) if dist >= best_dist => {}
            _ => best = Some((idx, dist)),
        }
    }

    best.map(|(idx, _)| idx)
}
