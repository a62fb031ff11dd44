//! Benchmarks for running complete matches and parsing commands.
//!
//! Matches use scripted agents, so this measures the engine's turn loop and
//! rule application without any process overhead.

#![allow(missing_docs)]

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use warcode::game::{Board, Cell, Command, Coord, Economy, IdAllocator, Tree};
use warcode::sandbox::{ScriptedAgent, ScriptedFactory};
use warcode::{Match, MatchConfig, Robot, RobotType, Team, World};

/// A 32x32 arena: peasants cutting trees on both sides.
fn create_arena() -> World {
    let board = Board::new(32, 32, "bench").unwrap();
    let mut world = World::new(board, Economy::new(0, 0), IdAllocator::new(7));
    for (team, x) in [(Team::Red, 4), (Team::Blue, 27)] {
        for y in (2..30).step_by(3) {
            let tree = 1000 + u32::try_from(x * 100 + y).unwrap();
            world.ids.reserve(tree);
            world.trees.push(Tree::new(tree, Coord::new(x + 1, y)));
            world.board.set(Coord::new(x + 1, y), Cell::Entity(tree));
            world.spawn_robot(Coord::new(x, y), team, RobotType::Peasant);
        }
    }
    world
}

fn cutter(robot: &Robot) -> ScriptedAgent {
    let tree = 1000 + u32::try_from(robot.x * 100 + robot.y).unwrap();
    ScriptedAgent::repeating(format!("CUT {tree}"))
}

fn run(config: MatchConfig) -> Option<Team> {
    let factory = ScriptedFactory::new(cutter);
    let mut game = Match::new(create_arena(), Box::new(factory), config).unwrap();
    game.run()
}

fn bench_full_match(c: &mut Criterion) {
    let config = MatchConfig::default();

    c.bench_function("full_match_1000_turns", |b| {
        b.iter(|| black_box(run(black_box(config))));
    });
}

fn bench_short_match(c: &mut Criterion) {
    let config = MatchConfig {
        max_turns: 100,
        ..MatchConfig::default()
    };

    c.bench_function("short_match_100_turns", |b| {
        b.iter(|| black_box(run(black_box(config))));
    });
}

fn bench_parse(c: &mut Criterion) {
    let lines = [
        "MOVE 3 4",
        "ATTACK 10 12",
        "BUILD 5 6 HOUSE",
        "TRAIN ARCHER",
        "CUT 1234567",
        "EXPLODE",
        "MOVE three 4",
    ];

    c.bench_function("parse_commands", |b| {
        b.iter(|| {
            for line in &lines {
                let _ = black_box(black_box(line).parse::<Command>());
            }
        });
    });
}

criterion_group!(benches, bench_full_match, bench_short_match, bench_parse);
criterion_main!(benches);
