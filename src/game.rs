//! Game layer for Warcode.
//!
//! Implements the rules of a match:
//! - Board with walls, robots, trees and gold mines
//! - Robot type catalog and legal BUILD/TRAIN transitions
//! - Per-team gold and wood
//! - Command parsing, validation and application
//! - ATTACK area damage

mod combat;
mod command;
mod economy;
mod entity;
mod ids;
mod invariants;
mod map;
mod rules;
mod state;
mod types;

pub use combat::{resolve_attack, AttackResult};
pub use command::{Command, ParseError};
pub use economy::{Economy, Shortfall, Treasury};
pub use entity::{EntityId, GoldMine, Robot, Tree};
pub use ids::{IdAllocator, ALLOCATION_RETRIES, MAX_ID};
pub use invariants::{check_invariants, InvariantViolation};
pub use map::{Board, Cell, Coord};
pub use rules::{apply, Effects, Rejection, ADJACENT_RADIUS};
pub use state::World;
pub use types::{
    RobotType, Team, TypeStats, UnknownType, CUT_AMOUNT, GOLD_MINE_STARTING_HEALTH,
    LEGAL_BUILDS, LEGAL_TRAINS, MINE_AMOUNT, TREE_STARTING_HEALTH,
};
