//! ATTACK area damage.
//!
//! Every live robot and every tree within the damage radius of the target
//! cell takes the attacker's damage. Gold mines are never damaged.

use crate::game::{Coord, EntityId, World};

/// What an attack destroyed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttackResult {
    /// Robots whose health reached zero or below, in collection order.
    pub robots_destroyed: Vec<EntityId>,
    /// Trees felled by the blast.
    pub trees_destroyed: Vec<EntityId>,
}

/// Apply area damage centred on `target`.
///
/// `damage_radius` is a squared distance; a negative radius hits nothing.
/// Robots already dead earlier in the turn are skipped so each death is
/// reported exactly once.
pub fn resolve_attack(
    world: &mut World,
    target: Coord,
    damage_radius: i32,
    damage: i32,
) -> AttackResult {
    let radius = i64::from(damage_radius);
    let mut result = AttackResult::default();

    for robot in &mut world.robots {
        if robot.is_alive() && robot.coord().dist2(target) <= radius {
            robot.health = robot.health.saturating_sub(damage);
            if !robot.is_alive() {
                result.robots_destroyed.push(robot.id);
            }
        }
    }
    for &id in &result.robots_destroyed {
        world.kill_robot(id);
    }

    for tree in &mut world.trees {
        if tree.coord().dist2(target) <= radius {
            tree.health = tree.health.saturating_sub(damage);
            if tree.health <= 0 {
                result.trees_destroyed.push(tree.id);
            }
        }
    }
    for &id in &result.trees_destroyed {
        world.kill_tree(id);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{
        Board, Cell, Economy, GoldMine, IdAllocator, RobotType, Team, Tree,
        GOLD_MINE_STARTING_HEALTH,
    };

    fn world_with_grid() -> World {
        let board = Board::new(10, 10, "combat").unwrap();
        World::new(board, Economy::default(), IdAllocator::new(3))
    }

    #[test]
    fn test_point_blast_hits_only_target_cell() {
        let mut world = world_with_grid();
        let hit = world
            .spawn_robot(Coord::new(4, 4), Team::Blue, RobotType::Pike)
            .unwrap();
        let miss = world
            .spawn_robot(Coord::new(4, 5), Team::Blue, RobotType::Pike)
            .unwrap();

        let result = resolve_attack(&mut world, Coord::new(4, 4), 0, 30);
        assert!(result.robots_destroyed.is_empty());
        assert_eq!(world.robot(hit).unwrap().health, 120);
        assert_eq!(world.robot(miss).unwrap().health, 150);
    }

    #[test]
    fn test_lethal_blast_clears_cell() {
        let mut world = world_with_grid();
        let victim = world
            .spawn_robot(Coord::new(2, 2), Team::Red, RobotType::Peasant)
            .unwrap();

        let result = resolve_attack(&mut world, Coord::new(2, 3), 1, 60);
        assert_eq!(result.robots_destroyed, vec![victim]);
        assert_eq!(world.robot(victim).unwrap().health, 0);
        assert!(world.board.is_empty(Coord::new(2, 2)));
    }

    #[test]
    fn test_trees_damaged_mines_untouched() {
        let mut world = world_with_grid();
        world.trees.push(Tree::new(100, Coord::new(5, 5)));
        world.board.set(Coord::new(5, 5), Cell::Entity(100));
        world.gold_mines.push(GoldMine::new(200, Coord::new(5, 6)));
        world.board.set(Coord::new(5, 6), Cell::Entity(200));

        resolve_attack(&mut world, Coord::new(5, 5), 2, 1000);

        assert!(world.tree(100).is_none());
        assert!(world.board.is_empty(Coord::new(5, 5)));
        assert_eq!(
            world.gold_mine(200).unwrap().health,
            GOLD_MINE_STARTING_HEALTH
        );
    }

    #[test]
    fn test_dead_robots_not_reported_twice() {
        let mut world = world_with_grid();
        let id = world
            .spawn_robot(Coord::new(1, 1), Team::Red, RobotType::Peasant)
            .unwrap();
        world.kill_robot(id);

        let result = resolve_attack(&mut world, Coord::new(1, 1), 0, 10);
        assert!(result.robots_destroyed.is_empty());
        assert_eq!(world.robot(id).unwrap().health, 0);
    }

    #[test]
    fn test_negative_radius_hits_nothing() {
        let mut world = world_with_grid();
        let id = world
            .spawn_robot(Coord::new(1, 1), Team::Red, RobotType::Peasant)
            .unwrap();
        resolve_attack(&mut world, Coord::new(1, 1), -1, 10);
        assert_eq!(world.robot(id).unwrap().health, 50);
    }
}
