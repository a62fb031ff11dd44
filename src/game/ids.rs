//! Entity id allocation.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::game::EntityId;

/// Largest id the allocator draws.
pub const MAX_ID: EntityId = 10_000_000;

/// Draws retried on collision before the last draw is accepted as-is.
pub const ALLOCATION_RETRIES: usize = 10;

/// Hands out random, almost certainly unique, entity ids.
///
/// Owned by one [`World`](crate::game::World), so separate matches never
/// share an id space.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    rng: StdRng,
    given: HashSet<EntityId>,
}

impl IdAllocator {
    /// Create an allocator seeded for reproducible draws.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            given: HashSet::new(),
        }
    }

    /// Mark an id loaded from a match file as taken.
    ///
    /// Returns `false` if it was already taken.
    pub fn reserve(&mut self, id: EntityId) -> bool {
        self.given.insert(id)
    }

    /// Whether `id` has been handed out or reserved.
    #[must_use]
    pub fn is_taken(&self, id: EntityId) -> bool {
        self.given.contains(&id)
    }

    /// Draw a new id.
    ///
    /// Collisions are retried [`ALLOCATION_RETRIES`] times; after that the
    /// final draw is accepted even if it collides.
    pub fn allocate(&mut self) -> EntityId {
        let mut id = self.draw();
        for _ in 1..ALLOCATION_RETRIES {
            if !self.given.contains(&id) {
                break;
            }
            id = self.draw();
        }
        self.given.insert(id);
        id
    }

    fn draw(&mut self) -> EntityId {
        self.rng.gen_range(1..=MAX_ID)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_ids() {
        let mut a = IdAllocator::new(7);
        let mut b = IdAllocator::new(7);
        for _ in 0..100 {
            assert_eq!(a.allocate(), b.allocate());
        }
    }

    #[test]
    fn test_ids_in_range_and_recorded() {
        let mut ids = IdAllocator::new(1);
        for _ in 0..1000 {
            let id = ids.allocate();
            assert!((1..=MAX_ID).contains(&id));
            assert!(ids.is_taken(id));
        }
    }

    #[test]
    fn test_reserved_ids_are_avoided() {
        let mut probe = IdAllocator::new(99);
        let first = probe.allocate();

        let mut ids = IdAllocator::new(99);
        assert!(ids.reserve(first));
        assert!(!ids.reserve(first));
        assert_ne!(ids.allocate(), first);
    }
}
