//! Robots, trees and gold mines.

use serde::Serialize;

use crate::game::{
    Coord, RobotType, Team, GOLD_MINE_STARTING_HEALTH, TREE_STARTING_HEALTH,
};

/// Globally unique identifier shared by robots, trees and gold mines.
pub type EntityId = u32;

/// A robot controlled by one agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Robot {
    /// Unique identifier.
    pub id: EntityId,
    /// Column on the board.
    pub x: i32,
    /// Row on the board.
    pub y: i32,
    /// Owning team.
    pub team: Team,
    /// Current type.
    #[serde(rename = "type")]
    pub kind: RobotType,
    /// Current health; the robot is dead at or below zero.
    pub health: i32,
}

impl Robot {
    /// Create a robot with its type's starting health.
    #[must_use]
    pub fn new(id: EntityId, coord: Coord, team: Team, kind: RobotType) -> Self {
        Self {
            id,
            x: coord.x,
            y: coord.y,
            team,
            kind,
            health: kind.stats().starting_health,
        }
    }

    /// Override the starting health.
    #[must_use]
    pub fn with_health(mut self, health: i32) -> Self {
        self.health = health;
        self
    }

    /// Position on the board.
    #[must_use]
    pub const fn coord(&self) -> Coord {
        Coord::new(self.x, self.y)
    }

    /// Whether the robot still has health left.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.health > 0
    }
}

/// A tree, harvested with CUT for wood.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tree {
    /// Unique identifier.
    pub id: EntityId,
    /// Column on the board.
    pub x: i32,
    /// Row on the board.
    pub y: i32,
    /// Remaining wood; may dip below zero before removal.
    pub health: i32,
}

impl Tree {
    /// Create a tree at full health.
    #[must_use]
    pub const fn new(id: EntityId, coord: Coord) -> Self {
        Self {
            id,
            x: coord.x,
            y: coord.y,
            health: TREE_STARTING_HEALTH,
        }
    }

    /// Position on the board.
    #[must_use]
    pub const fn coord(&self) -> Coord {
        Coord::new(self.x, self.y)
    }
}

/// A gold mine, harvested with MINE for gold. Immune to ATTACK.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoldMine {
    /// Unique identifier.
    pub id: EntityId,
    /// Column on the board.
    pub x: i32,
    /// Row on the board.
    pub y: i32,
    /// Remaining gold; may dip below zero before removal.
    pub health: i32,
}

impl GoldMine {
    /// Create a gold mine at full health.
    #[must_use]
    pub const fn new(id: EntityId, coord: Coord) -> Self {
        Self {
            id,
            x: coord.x,
            y: coord.y,
            health: GOLD_MINE_STARTING_HEALTH,
        }
    }

    /// Position on the board.
    #[must_use]
    pub const fn coord(&self) -> Coord {
        Coord::new(self.x, self.y)
    }
}
