#![no_main]

//! Full match turn fuzzer.
//!
//! This fuzz target applies fuzzer-chosen command lines for every robot
//! through the real turn loop:
//! 1. Parse and validate commands
//! 2. Apply moves, attacks, builds, trains and gathering
//! 3. Kill agents of destroyed robots and start agents for built ones
//! 4. Remove the dead and check termination
//!
//! The board invariants must hold after every turn.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use warcode::game::{
    check_invariants, Board, Cell, Coord, Economy, GoldMine, IdAllocator, RobotType, Team, Tree,
};
use warcode::sandbox::{Reply, ScriptedAgent, ScriptedFactory};
use warcode::{Match, MatchConfig, Robot, World};

/// A fuzzer-generated command.
#[derive(Arbitrary, Debug, Clone)]
enum FuzzCommand {
    Attack { x: i8, y: i8 },
    Build { x: i8, y: i8, kind: u8 },
    Cut { tree: u8 },
    Mine { mine: u8 },
    Move { x: i8, y: i8 },
    Train { kind: u8 },
    Explode,
    Garbage(String),
    Silent,
}

impl FuzzCommand {
    fn reply(&self) -> Reply {
        let kind = |k: &u8| RobotType::ALL[usize::from(*k) % RobotType::ALL.len()];
        match self {
            FuzzCommand::Attack { x, y } => Reply::line(format!("ATTACK {x} {y}")),
            FuzzCommand::Build { x, y, kind: k } => {
                Reply::line(format!("BUILD {x} {y} {}", kind(k)))
            }
            FuzzCommand::Cut { tree } => Reply::line(format!("CUT {}", 100 + u32::from(*tree % 8))),
            FuzzCommand::Mine { mine } => Reply::line(format!("MINE {}", 200 + u32::from(*mine % 4))),
            FuzzCommand::Move { x, y } => Reply::line(format!("MOVE {x} {y}")),
            FuzzCommand::Train { kind: k } => Reply::line(format!("TRAIN {}", kind(k))),
            FuzzCommand::Explode => Reply::line("EXPLODE"),
            FuzzCommand::Garbage(line) => Reply::line(line.clone()),
            FuzzCommand::Silent => Reply::Silent,
        }
    }
}

/// Structured input for match fuzzing.
#[derive(Arbitrary, Debug)]
struct MatchInput {
    /// Per-robot scripts, handed out in creation order.
    scripts: Vec<Vec<FuzzCommand>>,
    /// Starting gold and wood for both teams.
    gold: u16,
    wood: u16,
    /// Id allocator seed.
    seed: u64,
    /// Number of turns to simulate.
    num_turns: u8,
}

fn create_world(gold: i64, wood: i64, seed: u64) -> Option<World> {
    let board = Board::new(16, 16, "fuzz")?;
    let mut world = World::new(board, Economy::new(gold, wood), IdAllocator::new(seed));
    for i in 0..8u32 {
        let at = Coord::new(7, i32::try_from(i * 2).ok()?);
        world.ids.reserve(100 + i);
        world.trees.push(Tree::new(100 + i, at));
        world.board.set(at, Cell::Entity(100 + i));
    }
    for i in 0..4u32 {
        let at = Coord::new(8, i32::try_from(i * 4 + 1).ok()?);
        world.ids.reserve(200 + i);
        world.gold_mines.push(GoldMine::new(200 + i, at));
        world.board.set(at, Cell::Entity(200 + i));
    }
    world.board.set(Coord::new(0, 8), Cell::Wall);
    for (team, x) in [(Team::Red, 3), (Team::Blue, 12)] {
        world.spawn_robot(Coord::new(x, 3), team, RobotType::Peasant)?;
        world.spawn_robot(Coord::new(x, 8), team, RobotType::House)?;
        world.spawn_robot(Coord::new(x, 12), team, RobotType::Archer)?;
    }
    Some(world)
}

fuzz_target!(|input: MatchInput| {
    let num_turns = u32::from(input.num_turns % 20).max(1);
    let Some(world) = create_world(i64::from(input.gold), i64::from(input.wood), input.seed) else {
        return;
    };

    let mut scripts: Vec<Vec<Reply>> = input
        .scripts
        .iter()
        .take(16)
        .map(|s| s.iter().take(20).map(FuzzCommand::reply).collect())
        .collect();
    let factory = ScriptedFactory::new(move |_: &Robot| {
        let script = if scripts.is_empty() { Vec::new() } else { scripts.remove(0) };
        ScriptedAgent::new(script, Reply::line("EXPLODE"))
    });
    let config = MatchConfig {
        max_turns: num_turns,
        seed: input.seed,
        ..MatchConfig::default()
    };

    let Ok(mut game) = Match::new(world, Box::new(factory), config) else {
        return;
    };
    assert!(check_invariants(game.world()).is_empty());

    while game.step() {
        let violations = check_invariants(game.world());
        assert!(
            violations.is_empty(),
            "Invariants violated after turn {}: {:?}",
            game.turn(),
            violations
        );
    }

    let violations = check_invariants(game.world());
    assert!(violations.is_empty(), "Invariants violated at end: {violations:?}");
    assert!(game.turn() <= num_turns);
    let result = game.result();
    assert!(result.red.gold >= 0 && result.blue.gold >= 0);
    assert!(result.red.wood >= 0 && result.blue.wood >= 0);
});
