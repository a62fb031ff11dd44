//! World state: board, entity collections and economy.

use crate::game::{
    Board, Cell, Coord, Economy, EntityId, GoldMine, IdAllocator, Robot, RobotType, Team, Tree,
};

/// Everything a match mutates.
///
/// Robots stay in `robots` after dying until [`World::remove_dead`] runs at
/// the end of a turn; trees and gold mines leave their collections as soon
/// as they are destroyed.
#[derive(Debug, Clone)]
pub struct World {
    /// The board.
    pub board: Board,
    /// Robots in creation order.
    pub robots: Vec<Robot>,
    /// Standing trees.
    pub trees: Vec<Tree>,
    /// Unexhausted gold mines.
    pub gold_mines: Vec<GoldMine>,
    /// Team balances.
    pub economy: Economy,
    /// Id source for entities created during the match.
    pub ids: IdAllocator,
}

impl World {
    /// Create an empty world on the given board.
    #[must_use]
    pub fn new(board: Board, economy: Economy, ids: IdAllocator) -> Self {
        Self {
            board,
            robots: Vec::new(),
            trees: Vec::new(),
            gold_mines: Vec::new(),
            economy,
            ids,
        }
    }

    /// Get a robot by id.
    #[must_use]
    pub fn robot(&self, id: EntityId) -> Option<&Robot> {
        self.robots.iter().find(|r| r.id == id)
    }

    /// Get a mutable reference to a robot by id.
    #[must_use]
    pub fn robot_mut(&mut self, id: EntityId) -> Option<&mut Robot> {
        self.robots.iter_mut().find(|r| r.id == id)
    }

    /// Get a tree by id.
    #[must_use]
    pub fn tree(&self, id: EntityId) -> Option<&Tree> {
        self.trees.iter().find(|t| t.id == id)
    }

    /// Get a gold mine by id.
    #[must_use]
    pub fn gold_mine(&self, id: EntityId) -> Option<&GoldMine> {
        self.gold_mines.iter().find(|m| m.id == id)
    }

    /// Place a new robot with a freshly allocated id on an empty cell.
    ///
    /// Returns the new id, or `None` if the cell is not empty.
    pub fn spawn_robot(&mut self, coord: Coord, team: Team, kind: RobotType) -> Option<EntityId> {
        if !self.board.is_empty(coord) {
            return None;
        }
        let id = self.ids.allocate();
        self.board.set(coord, Cell::Entity(id));
        self.robots.push(Robot::new(id, coord, team, kind));
        Some(id)
    }

    /// Kill a robot: health to zero and its cell cleared.
    ///
    /// The robot stays in the collection until [`World::remove_dead`].
    pub fn kill_robot(&mut self, id: EntityId) {
        let Some(robot) = self.robot_mut(id) else {
            return;
        };
        robot.health = 0;
        let coord = robot.coord();
        if self.board.get(coord) == Some(Cell::Entity(id)) {
            self.board.set(coord, Cell::Empty);
        }
    }

    /// Destroy a tree; its cell becomes empty.
    pub fn kill_tree(&mut self, id: EntityId) {
        if let Some(idx) = self.trees.iter().position(|t| t.id == id) {
            let tree = self.trees.remove(idx);
            self.board.set(tree.coord(), Cell::Empty);
        }
    }

    /// Exhaust a gold mine; its cell becomes a wall.
    pub fn kill_gold_mine(&mut self, id: EntityId) {
        if let Some(idx) = self.gold_mines.iter().position(|m| m.id == id) {
            let mine = self.gold_mines.remove(idx);
            self.board.set(mine.coord(), Cell::Wall);
        }
    }

    /// Drop every robot whose health is at or below zero.
    ///
    /// Returns the ids removed.
    pub fn remove_dead(&mut self) -> Vec<EntityId> {
        let dead: Vec<EntityId> = self
            .robots
            .iter()
            .filter(|r| !r.is_alive())
            .map(|r| r.id)
            .collect();
        self.robots.retain(Robot::is_alive);
        dead
    }

    /// Live robots of one team.
    pub fn team_robots(&self, team: Team) -> impl Iterator<Item = &Robot> {
        self.robots
            .iter()
            .filter(move |r| r.team == team && r.is_alive())
    }

    /// Sum of current health across a team's live robots.
    #[must_use]
    pub fn team_health(&self, team: Team) -> i64 {
        self.team_robots(team).map(|r| i64::from(r.health)).sum()
    }

    /// Highest id among a team's live robots.
    #[must_use]
    pub fn highest_robot_id(&self, team: Team) -> Option<EntityId> {
        self.team_robots(team).map(|r| r.id).max()
    }

    /// Whether every live robot belongs to the same team (vacuously true
    /// when none are left).
    #[must_use]
    pub fn single_team_left(&self) -> bool {
        let mut teams = self.robots.iter().filter(|r| r.is_alive()).map(|r| r.team);
        match teams.next() {
            Some(first) => teams.all(|team| team == first),
            None => true,
        }
    }
}
