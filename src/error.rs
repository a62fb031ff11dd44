//! Error types for match setup.
//!
//! Everything here is fatal to a match before its first turn. Problems that
//! happen during play (bad commands, slow or crashed agents) are recovered
//! inside the turn loop and never surface as these errors.

use std::io;
use std::path::PathBuf;

use crate::game::{Coord, EntityId};

/// Failure to create an agent sandbox.
#[derive(Debug, thiserror::Error)]
pub enum SandboxError {
    /// The runtime identifier is not one the sandbox can launch.
    #[error("Sorry, but '{0}' is not a supported agent runtime")]
    UnsupportedRuntime(String),
    /// The OS refused to start the agent process.
    #[error("failed to start agent '{program}': {source}")]
    Spawn {
        /// Program that was launched.
        program: String,
        /// Underlying OS error.
        source: io::Error,
    },
    /// A standard stream of the child was not captured.
    #[error("agent process has no {0} pipe")]
    MissingPipe(&'static str),
}

/// A match file that cannot start a match.
#[derive(Debug, thiserror::Error)]
pub enum MatchFileError {
    /// The file could not be read or written.
    #[error("{}: {source}", .path.display())]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying OS error.
        source: io::Error,
    },
    /// The JSON does not match the schema.
    #[error("malformed match file: {0}")]
    Json(#[from] serde_json::Error),
    /// Board rows are missing or of unequal length.
    #[error("board rows are empty or ragged")]
    RaggedBoard,
    /// Declared size disagrees with the board rows.
    #[error("map declares {declared_width}x{declared_height} but the board is {width}x{height}")]
    DimensionMismatch {
        /// Width field.
        declared_width: i32,
        /// Height field.
        declared_height: i32,
        /// Columns in the board.
        width: i32,
        /// Rows in the board.
        height: i32,
    },
    /// The same id is used twice.
    #[error("id {0} is used by more than one entity")]
    DuplicateId(EntityId),
    /// An entity's cell does not hold its id.
    #[error("{kind} {id} at {at} does not match the board")]
    Misplaced {
        /// "robot", "tree" or "gold mine".
        kind: &'static str,
        /// Entity id.
        id: EntityId,
        /// Declared position.
        at: Coord,
    },
    /// The board names an id no entity claims.
    #[error("board cell {at} holds id {id}, which no entity claims")]
    UnknownBoardId {
        /// Unclaimed id.
        id: EntityId,
        /// Cell holding it.
        at: Coord,
    },
    /// An entity would start the match dead.
    #[error("{kind} {id} has non-positive health {health}")]
    NonPositiveHealth {
        /// "robot", "tree" or "gold mine".
        kind: &'static str,
        /// Entity id.
        id: EntityId,
        /// Declared health.
        health: i32,
    },
}

/// Failure to set up a match.
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    /// The match file is invalid.
    #[error(transparent)]
    MatchFile(#[from] MatchFileError),
    /// An agent for a starting robot could not be launched.
    #[error("robot {robot}: {source}")]
    Sandbox {
        /// Robot whose agent failed.
        robot: EntityId,
        /// Launch failure.
        source: SandboxError,
    },
}
