//! Command validation and application.
//!
//! [`apply`] checks a command's preconditions against the world and, if they
//! all hold, mutates the world. It owns no state; robots created or
//! destroyed are reported back in [`Effects`] so the caller can start or
//! stop their agents.

use crate::game::{
    resolve_attack, Cell, Command, Coord, EntityId, Robot, RobotType, Shortfall, World,
    CUT_AMOUNT, MINE_AMOUNT,
};

/// Squared distance covering the 8-neighbourhood of a cell.
pub const ADJACENT_RADIUS: i64 = 2;

/// Side effects of an applied command that outlive the world mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Effects {
    /// Robots created by the command.
    pub spawned: Vec<EntityId>,
    /// Robots whose health first reached zero or below.
    pub destroyed: Vec<EntityId>,
}

/// Why a command was not applied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    /// The acting robot is missing or already dead.
    #[error("Cannot {command}: robot {actor} is not alive.")]
    ActorNotAlive {
        /// Keyword of the rejected command.
        command: &'static str,
        /// Robot that tried to act.
        actor: EntityId,
    },
    /// Target cell is outside the board.
    #[error("Cannot {command}: {at} is off the map.")]
    OffMap {
        /// Keyword of the rejected command.
        command: &'static str,
        /// Target cell.
        at: Coord,
    },
    /// Target cell is beyond the type's radius.
    #[error("Cannot {command}: {at} is too far from current location.")]
    OutOfRange {
        /// Keyword of the rejected command.
        command: &'static str,
        /// Target cell.
        at: Coord,
    },
    /// BUILD target is not in the 8-neighbourhood.
    #[error("Cannot BUILD: {at} is not adjacent to the robot.")]
    NotAdjacent {
        /// Target cell.
        at: Coord,
    },
    /// Target cell holds a wall or an entity.
    #[error("Cannot {command}: {at} is a wall or is occupied.")]
    Occupied {
        /// Keyword of the rejected command.
        command: &'static str,
        /// Target cell.
        at: Coord,
    },
    /// Buildings cannot move.
    #[error("Cannot MOVE: Only units can move.")]
    Immobile,
    /// The pair is not a legal build.
    #[error("Cannot BUILD: A {from} cannot build a {to}.")]
    IllegalBuild {
        /// Builder type.
        from: RobotType,
        /// Requested type.
        to: RobotType,
    },
    /// The pair is not a legal train.
    #[error("Cannot TRAIN: A {from} cannot train to become a {to}.")]
    IllegalTrain {
        /// Current type.
        from: RobotType,
        /// Requested type.
        to: RobotType,
    },
    /// The team cannot pay.
    #[error("Cannot {command}: Insufficient {short}.")]
    Insufficient {
        /// Keyword of the rejected command.
        command: &'static str,
        /// Missing resource.
        short: Shortfall,
    },
    /// Only the gathering type may CUT or MINE.
    #[error("Cannot {command}: Robot is not a PEASANT.")]
    NotGatherer {
        /// Keyword of the rejected command.
        command: &'static str,
    },
    /// No standing tree has that id.
    #[error("Cannot CUT: No tree with id {0} exists.")]
    NoSuchTree(EntityId),
    /// No active gold mine has that id.
    #[error("Cannot MINE: No gold mine with id {0} exists.")]
    NoSuchMine(EntityId),
    /// The resource is not in the 8-neighbourhood.
    #[error("Cannot {command}: Robot is not adjacent to {target}.")]
    ResourceNotAdjacent {
        /// Keyword of the rejected command.
        command: &'static str,
        /// "tree" or "mine".
        target: &'static str,
    },
}

/// Validate `command` for robot `actor` and apply it to `world`.
///
/// # Errors
///
/// Returns the first failed precondition; the world is unchanged in that case.
pub fn apply(world: &mut World, actor: EntityId, command: Command) -> Result<Effects, Rejection> {
    let robot = match world.robot(actor) {
        Some(robot) if robot.is_alive() => robot.clone(),
        _ => {
            return Err(Rejection::ActorNotAlive {
                command: command.keyword(),
                actor,
            });
        }
    };

    match command {
        Command::Attack { target } => attack(world, &robot, target),
        Command::Build { at, kind } => build(world, &robot, at, kind),
        Command::Cut { tree } => cut(world, &robot, tree),
        Command::Mine { mine: id } => mine(world, &robot, id),
        Command::Move { to } => move_to(world, &robot, to),
        Command::Train { kind } => train(world, &robot, kind),
        Command::Explode => {
            world.kill_robot(robot.id);
            Ok(Effects {
                spawned: Vec::new(),
                destroyed: vec![robot.id],
            })
        }
    }
}

fn attack(world: &mut World, robot: &Robot, target: Coord) -> Result<Effects, Rejection> {
    const COMMAND: &str = "ATTACK";
    let stats = robot.kind.stats();

    if !world.board.in_bounds(target) {
        return Err(Rejection::OffMap {
            command: COMMAND,
            at: target,
        });
    }
    if robot.coord().dist2(target) > i64::from(stats.attack_radius) {
        return Err(Rejection::OutOfRange {
            command: COMMAND,
            at: target,
        });
    }

    let result = resolve_attack(world, target, stats.damage_radius, stats.attack_damage);
    Ok(Effects {
        spawned: Vec::new(),
        destroyed: result.robots_destroyed,
    })
}

fn build(world: &mut World, robot: &Robot, at: Coord, kind: RobotType) -> Result<Effects, Rejection> {
    const COMMAND: &str = "BUILD";

    if !robot.kind.can_build(kind) {
        return Err(Rejection::IllegalBuild {
            from: robot.kind,
            to: kind,
        });
    }
    if !world.board.in_bounds(at) {
        return Err(Rejection::OffMap {
            command: COMMAND,
            at,
        });
    }
    if robot.coord().dist2(at) > ADJACENT_RADIUS {
        return Err(Rejection::NotAdjacent { at });
    }
    if !world.board.is_empty(at) {
        return Err(Rejection::Occupied {
            command: COMMAND,
            at,
        });
    }
    world
        .economy
        .pay(robot.team, kind.stats())
        .map_err(|short| Rejection::Insufficient {
            command: COMMAND,
            short,
        })?;

    let spawned = world
        .spawn_robot(at, robot.team, kind)
        .into_iter()
        .collect();
    Ok(Effects {
        spawned,
        destroyed: Vec::new(),
    })
}

fn cut(world: &mut World, robot: &Robot, tree_id: EntityId) -> Result<Effects, Rejection> {
    const COMMAND: &str = "CUT";

    if !robot.kind.gathers() {
        return Err(Rejection::NotGatherer { command: COMMAND });
    }
    let tree = world.tree(tree_id).ok_or(Rejection::NoSuchTree(tree_id))?;
    if robot.coord().dist2(tree.coord()) > ADJACENT_RADIUS {
        return Err(Rejection::ResourceNotAdjacent {
            command: COMMAND,
            target: "tree",
        });
    }

    // The full amount is granted even when the tree has less left.
    world.economy.add_wood(robot.team, CUT_AMOUNT);
    let felled = world
        .trees
        .iter_mut()
        .find(|t| t.id == tree_id)
        .is_some_and(|tree| {
            tree.health = tree.health.saturating_sub(resource_amount(CUT_AMOUNT));
            tree.health <= 0
        });
    if felled {
        world.kill_tree(tree_id);
    }
    Ok(Effects::default())
}

fn mine(world: &mut World, robot: &Robot, mine_id: EntityId) -> Result<Effects, Rejection> {
    const COMMAND: &str = "MINE";

    if !robot.kind.gathers() {
        return Err(Rejection::NotGatherer { command: COMMAND });
    }
    let mine = world
        .gold_mine(mine_id)
        .ok_or(Rejection::NoSuchMine(mine_id))?;
    if robot.coord().dist2(mine.coord()) > ADJACENT_RADIUS {
        return Err(Rejection::ResourceNotAdjacent {
            command: COMMAND,
            target: "mine",
        });
    }

    world.economy.add_gold(robot.team, MINE_AMOUNT);
    let exhausted = world
        .gold_mines
        .iter_mut()
        .find(|m| m.id == mine_id)
        .is_some_and(|mine| {
            mine.health = mine.health.saturating_sub(resource_amount(MINE_AMOUNT));
            mine.health <= 0
        });
    if exhausted {
        world.kill_gold_mine(mine_id);
    }
    Ok(Effects::default())
}

fn move_to(world: &mut World, robot: &Robot, to: Coord) -> Result<Effects, Rejection> {
    const COMMAND: &str = "MOVE";

    if !robot.kind.is_unit() {
        return Err(Rejection::Immobile);
    }
    if !world.board.in_bounds(to) {
        return Err(Rejection::OffMap {
            command: COMMAND,
            at: to,
        });
    }
    if robot.coord().dist2(to) > i64::from(robot.kind.stats().move_radius) {
        return Err(Rejection::OutOfRange {
            command: COMMAND,
            at: to,
        });
    }
    if !world.board.is_empty(to) {
        return Err(Rejection::Occupied {
            command: COMMAND,
            at: to,
        });
    }

    world.board.set(robot.coord(), Cell::Empty);
    world.board.set(to, Cell::Entity(robot.id));
    if let Some(moved) = world.robot_mut(robot.id) {
        moved.x = to.x;
        moved.y = to.y;
    }
    Ok(Effects::default())
}

fn train(world: &mut World, robot: &Robot, kind: RobotType) -> Result<Effects, Rejection> {
    if !robot.kind.can_train(kind) {
        return Err(Rejection::IllegalTrain {
            from: robot.kind,
            to: kind,
        });
    }
    world
        .economy
        .pay(robot.team, kind.stats())
        .map_err(|short| Rejection::Insufficient {
            command: "TRAIN",
            short,
        })?;

    if let Some(trained) = world.robot_mut(robot.id) {
        trained.kind = kind;
        trained.health = kind.stats().starting_health;
    }
    Ok(Effects::default())
}

/// Harvest amounts as health deltas.
fn resource_amount(amount: i64) -> i32 {
    i32::try_from(amount).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Board, Economy, GoldMine, IdAllocator, Team, Tree};

    fn create_test_world(gold: i64, wood: i64) -> World {
        let board = Board::new(10, 10, "rules").unwrap();
        World::new(board, Economy::new(gold, wood), IdAllocator::new(5))
    }

    fn spawn(world: &mut World, x: i32, y: i32, team: Team, kind: RobotType) -> EntityId {
        world.spawn_robot(Coord::new(x, y), team, kind).unwrap()
    }

    fn place_tree(world: &mut World, id: EntityId, x: i32, y: i32, health: i32) {
        let mut tree = Tree::new(id, Coord::new(x, y));
        tree.health = health;
        world.trees.push(tree);
        world.board.set(Coord::new(x, y), Cell::Entity(id));
    }

    fn place_mine(world: &mut World, id: EntityId, x: i32, y: i32, health: i32) {
        let mut mine = GoldMine::new(id, Coord::new(x, y));
        mine.health = health;
        world.gold_mines.push(mine);
        world.board.set(Coord::new(x, y), Cell::Entity(id));
    }

    #[test]
    fn test_move_updates_board_and_robot() {
        let mut world = create_test_world(0, 0);
        let id = spawn(&mut world, 3, 3, Team::Red, RobotType::Peasant);

        apply(&mut world, id, Command::Move { to: Coord::new(4, 4) }).unwrap();

        let robot = world.robot(id).unwrap();
        assert_eq!(robot.coord(), Coord::new(4, 4));
        assert!(world.board.is_empty(Coord::new(3, 3)));
        assert_eq!(world.board.get(Coord::new(4, 4)), Some(Cell::Entity(id)));
    }

    #[test]
    fn test_move_rejections() {
        let mut world = create_test_world(0, 0);
        let id = spawn(&mut world, 0, 0, Team::Red, RobotType::Pike);
        let house = spawn(&mut world, 5, 5, Team::Red, RobotType::House);
        world.board.set(Coord::new(1, 0), Cell::Wall);

        assert_eq!(
            apply(&mut world, id, Command::Move { to: Coord::new(1, 0) }),
            Err(Rejection::Occupied {
                command: "MOVE",
                at: Coord::new(1, 0)
            })
        );
        assert!(matches!(
            apply(&mut world, id, Command::Move { to: Coord::new(1, 1) }),
            Err(Rejection::OutOfRange { .. })
        ));
        assert!(matches!(
            apply(&mut world, id, Command::Move { to: Coord::new(-1, 0) }),
            Err(Rejection::OffMap { .. })
        ));
        assert_eq!(
            apply(&mut world, house, Command::Move { to: Coord::new(5, 6) }),
            Err(Rejection::Immobile)
        );
        assert_eq!(world.robot(id).unwrap().coord(), Coord::new(0, 0));
    }

    #[test]
    fn test_attack_out_of_range() {
        let mut world = create_test_world(0, 0);
        let pike = spawn(&mut world, 0, 0, Team::Red, RobotType::Pike);
        let target = spawn(&mut world, 3, 0, Team::Blue, RobotType::Peasant);

        let err = apply(&mut world, pike, Command::Attack { target: Coord::new(3, 0) }).unwrap_err();
        assert_eq!(err.to_string(), "Cannot ATTACK: (3, 0) is too far from current location.");
        assert_eq!(world.robot(target).unwrap().health, 50);
    }

    #[test]
    fn test_attack_kills_and_reports() {
        let mut world = create_test_world(0, 0);
        let horse = spawn(&mut world, 0, 0, Team::Red, RobotType::Horse);
        let target = spawn(&mut world, 1, 0, Team::Blue, RobotType::Peasant);
        world.robot_mut(target).unwrap().health = 30;

        let effects = apply(&mut world, horse, Command::Attack { target: Coord::new(1, 0) }).unwrap();
        assert_eq!(effects.destroyed, vec![target]);
        assert!(world.board.is_empty(Coord::new(1, 0)));
    }

    #[test]
    fn test_peasant_cannot_attack() {
        let mut world = create_test_world(0, 0);
        let peasant = spawn(&mut world, 0, 0, Team::Red, RobotType::Peasant);
        assert!(matches!(
            apply(&mut world, peasant, Command::Attack { target: Coord::new(0, 0) }),
            Err(Rejection::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_build_house() {
        let mut world = create_test_world(600, 900);
        let peasant = spawn(&mut world, 2, 2, Team::Blue, RobotType::Peasant);

        let effects = apply(
            &mut world,
            peasant,
            Command::Build {
                at: Coord::new(3, 3),
                kind: RobotType::House,
            },
        )
        .unwrap();

        assert_eq!(effects.spawned.len(), 1);
        let house = world.robot(effects.spawned[0]).unwrap();
        assert_eq!(house.kind, RobotType::House);
        assert_eq!(house.team, Team::Blue);
        assert_eq!(house.health, 300);
        assert_eq!(world.economy.gold(Team::Blue), 100);
        assert_eq!(world.economy.wood(Team::Blue), 100);
        assert_eq!(world.economy.gold(Team::Red), 600);
    }

    #[test]
    fn test_build_rejections() {
        let mut world = create_test_world(600, 900);
        let peasant = spawn(&mut world, 2, 2, Team::Red, RobotType::Peasant);
        spawn(&mut world, 3, 2, Team::Red, RobotType::Peasant);

        let build = |at, kind| Command::Build { at, kind };
        assert_eq!(
            apply(&mut world, peasant, build(Coord::new(3, 3), RobotType::Archer)),
            Err(Rejection::IllegalBuild {
                from: RobotType::Peasant,
                to: RobotType::Archer
            })
        );
        assert_eq!(
            apply(&mut world, peasant, build(Coord::new(4, 2), RobotType::House)),
            Err(Rejection::NotAdjacent { at: Coord::new(4, 2) })
        );
        assert!(matches!(
            apply(&mut world, peasant, build(Coord::new(3, 2), RobotType::House)),
            Err(Rejection::Occupied { command: "BUILD", .. })
        ));
        assert_eq!(world.economy.gold(Team::Red), 600);
    }

    #[test]
    fn test_build_insufficient_wood_not_partially_applied() {
        let mut world = create_test_world(500, 799);
        let peasant = spawn(&mut world, 2, 2, Team::Red, RobotType::Peasant);
        let before = world.robots.len();

        let err = apply(
            &mut world,
            peasant,
            Command::Build {
                at: Coord::new(2, 3),
                kind: RobotType::House,
            },
        )
        .unwrap_err();

        assert_eq!(err.to_string(), "Cannot BUILD: Insufficient wood.");
        assert_eq!(world.economy.gold(Team::Red), 500);
        assert_eq!(world.economy.wood(Team::Red), 799);
        assert_eq!(world.robots.len(), before);
    }

    #[test]
    fn test_cut_grants_full_amount_and_fells() {
        let mut world = create_test_world(0, 0);
        let peasant = spawn(&mut world, 0, 0, Team::Red, RobotType::Peasant);
        place_tree(&mut world, 77, 1, 1, 4);

        apply(&mut world, peasant, Command::Cut { tree: 77 }).unwrap();

        assert_eq!(world.economy.wood(Team::Red), CUT_AMOUNT);
        assert!(world.tree(77).is_none());
        assert!(world.board.is_empty(Coord::new(1, 1)));
    }

    #[test]
    fn test_cut_rejections() {
        let mut world = create_test_world(0, 0);
        let peasant = spawn(&mut world, 0, 0, Team::Red, RobotType::Peasant);
        let pike = spawn(&mut world, 5, 5, Team::Red, RobotType::Pike);
        place_tree(&mut world, 77, 2, 0, 200);
        place_tree(&mut world, 78, 5, 6, 200);

        assert_eq!(
            apply(&mut world, pike, Command::Cut { tree: 78 }),
            Err(Rejection::NotGatherer { command: "CUT" })
        );
        assert_eq!(
            apply(&mut world, peasant, Command::Cut { tree: 1 }),
            Err(Rejection::NoSuchTree(1))
        );
        assert!(matches!(
            apply(&mut world, peasant, Command::Cut { tree: 77 }),
            Err(Rejection::ResourceNotAdjacent { .. })
        ));
        assert_eq!(world.economy.wood(Team::Red), 0);
    }

    #[test]
    fn test_mine_exhausts_into_wall() {
        let mut world = create_test_world(0, 0);
        let peasant = spawn(&mut world, 4, 4, Team::Blue, RobotType::Peasant);
        place_mine(&mut world, 90, 5, 4, 10);

        apply(&mut world, peasant, Command::Mine { mine: 90 }).unwrap();

        assert_eq!(world.economy.gold(Team::Blue), MINE_AMOUNT);
        assert!(world.gold_mine(90).is_none());
        assert_eq!(world.board.get(Coord::new(5, 4)), Some(Cell::Wall));
    }

    #[test]
    fn test_mine_looks_up_mines_not_trees() {
        let mut world = create_test_world(0, 0);
        let peasant = spawn(&mut world, 4, 4, Team::Blue, RobotType::Peasant);
        place_tree(&mut world, 91, 5, 4, 200);

        assert_eq!(
            apply(&mut world, peasant, Command::Mine { mine: 91 }),
            Err(Rejection::NoSuchMine(91))
        );
    }

    #[test]
    fn test_train_resets_health_in_place() {
        let mut world = create_test_world(100, 120);
        let peasant = spawn(&mut world, 1, 1, Team::Red, RobotType::Peasant);
        world.robot_mut(peasant).unwrap().health = 5;

        apply(&mut world, peasant, Command::Train { kind: RobotType::Pike }).unwrap();

        let robot = world.robot(peasant).unwrap();
        assert_eq!(robot.kind, RobotType::Pike);
        assert_eq!(robot.health, 150);
        assert_eq!(robot.coord(), Coord::new(1, 1));
        assert_eq!(world.economy.gold(Team::Red), 0);
        assert_eq!(world.economy.wood(Team::Red), 0);
    }

    #[test]
    fn test_train_rejections() {
        let mut world = create_test_world(10, 10);
        let peasant = spawn(&mut world, 1, 1, Team::Red, RobotType::Peasant);
        let archer = spawn(&mut world, 2, 2, Team::Red, RobotType::Archer);

        assert_eq!(
            apply(&mut world, archer, Command::Train { kind: RobotType::Pike }),
            Err(Rejection::IllegalTrain {
                from: RobotType::Archer,
                to: RobotType::Pike
            })
        );
        assert_eq!(
            apply(&mut world, peasant, Command::Train { kind: RobotType::Horse })
                .unwrap_err()
                .to_string(),
            "Cannot TRAIN: Insufficient gold."
        );
        assert_eq!(world.robot(peasant).unwrap().kind, RobotType::Peasant);
    }

    #[test]
    fn test_explode() {
        let mut world = create_test_world(0, 0);
        let id = spawn(&mut world, 6, 6, Team::Blue, RobotType::Archer);

        let effects = apply(&mut world, id, Command::Explode).unwrap();
        assert_eq!(effects.destroyed, vec![id]);
        assert_eq!(world.robot(id).unwrap().health, 0);
        assert!(world.board.is_empty(Coord::new(6, 6)));

        assert!(matches!(
            apply(&mut world, id, Command::Explode),
            Err(Rejection::ActorNotAlive { .. })
        ));
    }
}
