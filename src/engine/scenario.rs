//! Match files: the JSON starting position of a match.
//!
//! ```json
//! {
//!   "map": {"width": 3, "height": 1, "board": [[7, " ", "W"]], "name": "tiny"},
//!   "trees": [],
//!   "gold_mines": [],
//!   "robots": [{"id": 7, "x": 0, "y": 0, "team": "RED", "type": "PEASANT"}]
//! }
//! ```
//!
//! Loading is all-or-nothing: [`MatchFile::into_world`] either returns a
//! consistent [`World`] or the first problem found.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::engine::MatchConfig;
use crate::error::MatchFileError;
use crate::game::{
    Board, Cell, Coord, Economy, EntityId, GoldMine, IdAllocator, Robot, RobotType, Team, Tree,
    World, GOLD_MINE_STARTING_HEALTH, TREE_STARTING_HEALTH,
};

/// The `map` object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapRecord {
    /// Declared width.
    pub width: i32,
    /// Declared height.
    pub height: i32,
    /// Cells as `board[y][x]`.
    pub board: Vec<Vec<Cell>>,
    /// Map name.
    pub name: String,
}

/// A robot entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RobotRecord {
    /// Entity id.
    pub id: EntityId,
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
    /// Owning team.
    pub team: Team,
    /// Robot type.
    #[serde(rename = "type")]
    pub kind: RobotType,
    /// Health, defaulting to the type's starting health.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<i32>,
}

/// A tree or gold mine entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecord {
    /// Entity id.
    pub id: EntityId,
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
    /// Health, defaulting to the resource's starting health.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<i32>,
}

/// A whole match file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchFile {
    /// Board and its dimensions.
    pub map: MapRecord,
    /// Starting trees.
    pub trees: Vec<ResourceRecord>,
    /// Starting gold mines.
    pub gold_mines: Vec<ResourceRecord>,
    /// Starting robots.
    pub robots: Vec<RobotRecord>,
}

impl MatchFile {
    /// Parse a match file from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not match the schema.
    pub fn from_json(text: &str) -> Result<Self, MatchFileError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse a match file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, MatchFileError> {
        let text = fs::read_to_string(path).map_err(|source| MatchFileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Serialize to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, MatchFileError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the match file to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), MatchFileError> {
        fs::write(path, self.to_json()?).map_err(|source| MatchFileError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Check the file without building a world.
    ///
    /// # Errors
    ///
    /// Returns the first inconsistency found.
    pub fn validate(&self) -> Result<(), MatchFileError> {
        self.clone().into_world(&MatchConfig::default()).map(|_| ())
    }

    /// Build the starting world.
    ///
    /// # Errors
    ///
    /// Returns an error if the board is malformed, an entity is off its
    /// cell, an id is reused, the board names an unknown id, or an entity
    /// would start dead.
    pub fn into_world(self, config: &MatchConfig) -> Result<World, MatchFileError> {
        let MatchFile {
            map,
            trees,
            gold_mines,
            robots,
        } = self;

        let board = Board::from_rows(map.board, map.name).ok_or(MatchFileError::RaggedBoard)?;
        if board.width() != map.width || board.height() != map.height {
            return Err(MatchFileError::DimensionMismatch {
                declared_width: map.width,
                declared_height: map.height,
                width: board.width(),
                height: board.height(),
            });
        }

        let mut world = World::new(
            board,
            Economy::new(config.starting_gold, config.starting_wood),
            IdAllocator::new(config.seed),
        );
        let mut claimed = HashSet::new();
        let mut claim = |world: &mut World, kind, id, at, health: i32| {
            if health <= 0 {
                return Err(MatchFileError::NonPositiveHealth { kind, id, health });
            }
            if !world.ids.reserve(id) {
                return Err(MatchFileError::DuplicateId(id));
            }
            if world.board.get(at) != Some(Cell::Entity(id)) {
                return Err(MatchFileError::Misplaced { kind, id, at });
            }
            claimed.insert(id);
            Ok(())
        };

        for record in trees {
            let at = Coord::new(record.x, record.y);
            let health = record.health.unwrap_or(TREE_STARTING_HEALTH);
            claim(&mut world, "tree", record.id, at, health)?;
            world.trees.push(Tree { health, ..Tree::new(record.id, at) });
        }
        for record in gold_mines {
            let at = Coord::new(record.x, record.y);
            let health = record.health.unwrap_or(GOLD_MINE_STARTING_HEALTH);
            claim(&mut world, "gold mine", record.id, at, health)?;
            world.gold_mines.push(GoldMine {
                health,
                ..GoldMine::new(record.id, at)
            });
        }
        for record in robots {
            let at = Coord::new(record.x, record.y);
            let health = record
                .health
                .unwrap_or(record.kind.stats().starting_health);
            claim(&mut world, "robot", record.id, at, health)?;
            world
                .robots
                .push(Robot::new(record.id, at, record.team, record.kind).with_health(health));
        }

        let unknown = world.board.iter().find_map(|(at, cell)| match cell {
            Cell::Entity(id) if !claimed.contains(&id) => Some((id, at)),
            _ => None,
        });
        if let Some((id, at)) = unknown {
            return Err(MatchFileError::UnknownBoardId { id, at });
        }

        tracing::debug!(
            map = world.board.name(),
            robots = world.robots.len(),
            trees = world.trees.len(),
            gold_mines = world.gold_mines.len(),
            "match file loaded"
        );
        Ok(world)
    }
}

impl World {
    /// Capture the current position as a match file.
    ///
    /// Dead robots are left out; balances are not part of the format.
    #[must_use]
    pub fn to_match_file(&self) -> MatchFile {
        MatchFile {
            map: MapRecord {
                width: self.board.width(),
                height: self.board.height(),
                board: self.board.to_rows(),
                name: self.board.name().to_string(),
            },
            trees: self
                .trees
                .iter()
                .map(|t| ResourceRecord {
                    id: t.id,
                    x: t.x,
                    y: t.y,
                    health: Some(t.health),
                })
                .collect(),
            gold_mines: self
                .gold_mines
                .iter()
                .map(|m| ResourceRecord {
                    id: m.id,
                    x: m.x,
                    y: m.y,
                    health: Some(m.health),
                })
                .collect(),
            robots: self
                .robots
                .iter()
                .filter(|r| r.is_alive())
                .map(|r| RobotRecord {
                    id: r.id,
                    x: r.x,
                    y: r.y,
                    team: r.team,
                    kind: r.kind,
                    health: Some(r.health),
                })
                .collect(),
        }
    }
}
