//! World invariants - consistency checks that detect bugs.
//!
//! These should never trigger on a world produced by loading a valid match
//! file and applying commands. Tests and the fuzzer run them after every
//! mutation.

use std::collections::HashMap;

use crate::game::{Cell, Coord, EntityId, World};

/// Invariant violation error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invariant violation: {message}")]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl InvariantViolation {
    fn new(message: String) -> Self {
        Self { message }
    }
}

/// Check all world invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(world: &World) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    // An id appears in at most one cell.
    let mut seen: HashMap<EntityId, Coord> = HashMap::new();
    for (coord, cell) in world.board.iter() {
        if let Cell::Entity(id) = cell {
            if let Some(first) = seen.insert(id, coord) {
                violations.push(InvariantViolation::new(format!(
                    "entity {id} appears at both {first} and {coord}"
                )));
            }
        }
    }

    // Every live entity sits on a cell holding its own id.
    let live = world
        .robots
        .iter()
        .filter(|r| r.is_alive())
        .map(|r| ("robot", r.id, r.coord()))
        .chain(world.trees.iter().map(|t| ("tree", t.id, t.coord())))
        .chain(world.gold_mines.iter().map(|m| ("gold mine", m.id, m.coord())));
    let mut live_ids = HashMap::new();
    for (what, id, coord) in live {
        if live_ids.insert(id, what).is_some() {
            violations.push(InvariantViolation::new(format!(
                "id {id} is shared by more than one live entity"
            )));
        }
        match world.board.get(coord) {
            Some(Cell::Entity(on_board)) if on_board == id => {}
            Some(cell) => violations.push(InvariantViolation::new(format!(
                "{what} {id} at {coord} but the cell holds {cell:?}"
            ))),
            None => violations.push(InvariantViolation::new(format!(
                "{what} {id} is off the board at {coord}"
            ))),
        }
    }

    // No cell names an entity that is not live.
    for id in seen.keys() {
        if !live_ids.contains_key(id) {
            violations.push(InvariantViolation::new(format!(
                "board holds id {id} with no live entity"
            )));
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Board, Economy, IdAllocator, RobotType, Team, Tree};

    fn create_test_world() -> World {
        let board = Board::new(6, 6, "inv").unwrap();
        World::new(board, Economy::default(), IdAllocator::new(11))
    }

    #[test]
    fn test_consistent_world_has_no_violations() {
        let mut world = create_test_world();
        world
            .spawn_robot(Coord::new(1, 1), Team::Red, RobotType::Peasant)
            .unwrap();
        world.trees.push(Tree::new(5, Coord::new(2, 2)));
        world.board.set(Coord::new(2, 2), Cell::Entity(5));

        assert!(check_invariants(&world).is_empty());
    }

    #[test]
    fn test_dead_robot_cleared_is_consistent() {
        let mut world = create_test_world();
        let id = world
            .spawn_robot(Coord::new(1, 1), Team::Red, RobotType::Peasant)
            .unwrap();
        world.kill_robot(id);
        assert!(check_invariants(&world).is_empty());
    }

    #[test]
    fn test_duplicate_cell_detected() {
        let mut world = create_test_world();
        let id = world
            .spawn_robot(Coord::new(1, 1), Team::Red, RobotType::Peasant)
            .unwrap();
        world.board.set(Coord::new(4, 4), Cell::Entity(id));

        let violations = check_invariants(&world);
        assert!(violations
            .iter()
            .any(|v| v.message.contains("appears at both")));
    }

    #[test]
    fn test_orphan_and_misplaced_detected() {
        let mut world = create_test_world();
        world.board.set(Coord::new(0, 0), Cell::Entity(999));
        world.trees.push(Tree::new(6, Coord::new(3, 3)));

        let violations = check_invariants(&world);
        assert_eq!(violations.len(), 2);
    }
}
