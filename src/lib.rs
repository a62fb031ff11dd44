// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Warcode: a turn-based match engine for programming competitions.
//!
//! Two teams of robots fight over a grid of walls, trees and gold mines.
//! Every robot is driven by its own agent process, which gets one line of
//! input per turn and must answer one command line within a time budget:
//! - Agents run suspended between turns and are killed when their robot dies
//! - Commands are parsed into a closed set and validated before any effect
//! - A silent, crashed or slow agent loses its robot instead of the match
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │     Match Engine (turn scheduler)   │
//! ├──────────────────┬──────────────────┤
//! │  Agent Sandbox   │    Game Rules    │
//! ├──────────────────┴──────────────────┤
//! │       World (board, economy)        │
//! └─────────────────────────────────────┘
//! ```

pub mod engine;
pub mod error;
pub mod game;
pub mod log;
pub mod sandbox;

pub use engine::{run_match, Match, MatchConfig, MatchResult, Phase, TeamSummary};
pub use error::{MatchError, MatchFileError, SandboxError};

// Re-export key game types at crate root for convenience
pub use game::{Board, Cell, Command, Coord, EntityId, Robot, RobotType, Team, World};
