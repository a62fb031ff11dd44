//! Match engine: the turn scheduler.
//!
//! A [`Match`] owns the [`World`] and one agent per live robot. Each turn it
//! snapshots the live robots, asks each one's agent for a command under its
//! time budget, and applies the command through [`game::apply`]. Agents of
//! robots that die are killed on the spot; dead robots leave the world at the
//! end of the turn, after which termination is checked.

pub mod input;
pub mod scenario;

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::error::MatchError;
use crate::game::{self, Command, Effects, EntityId, Robot, Team, World};
use crate::log::{EventLog, NullLog};
use crate::sandbox::{Agent, AgentFactory};

use self::input::{StatusInput, TurnInput};
use self::scenario::MatchFile;

/// Configuration for a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchConfig {
    /// Turn after which the match ends regardless of standing.
    pub max_turns: u32,
    /// Budget multiplier for a robot's very first turn.
    pub first_turn_multiplier: u32,
    /// Seed for the entity id allocator.
    pub seed: u64,
    /// Gold each team starts with.
    pub starting_gold: i64,
    /// Wood each team starts with.
    pub starting_wood: i64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            max_turns: 1000,
            first_turn_multiplier: 5,
            seed: 0,
            starting_gold: 0,
            starting_wood: 0,
        }
    }
}

/// Lifecycle of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    /// Created, no turn played yet.
    NotStarted,
    /// Turns are being played.
    Running,
    /// Termination reached; the winner is final.
    Over,
}

/// End-of-match standing of one team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TeamSummary {
    /// Live robots.
    pub robots: usize,
    /// Sum of live robots' health.
    pub health: i64,
    /// Gold balance.
    pub gold: i64,
    /// Wood balance.
    pub wood: i64,
    /// Highest live robot id.
    pub highest_id: Option<EntityId>,
}

impl TeamSummary {
    /// Current standing of `team` in `world`.
    #[must_use]
    pub fn of(world: &World, team: Team) -> Self {
        Self {
            robots: world.team_robots(team).count(),
            health: world.team_health(team),
            gold: world.economy.gold(team),
            wood: world.economy.wood(team),
            highest_id: world.highest_robot_id(team),
        }
    }

    /// Tie-break chain: health, then gold, then wood, then highest id.
    #[must_use]
    pub fn rank(&self, other: &Self) -> Ordering {
        self.health
            .cmp(&other.health)
            .then_with(|| self.gold.cmp(&other.gold))
            .then_with(|| self.wood.cmp(&other.wood))
            .then_with(|| self.highest_id.cmp(&other.highest_id))
    }
}

/// Final result of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    /// Winning team, `None` for a draw.
    pub winner: Option<Team>,
    /// Turns played.
    pub turns_played: u32,
    /// RED's final standing.
    pub red: TeamSummary,
    /// BLUE's final standing.
    pub blue: TeamSummary,
    /// Turns forfeited by agents that did not answer in time.
    pub agents_timed_out: u32,
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.winner {
            Some(team) => write!(f, "{team} wins after {} turns", self.turns_played),
            None => write!(f, "draw after {} turns", self.turns_played),
        }
    }
}

/// A robot's agent and how many turns it has been offered.
#[derive(Debug)]
struct Seat {
    agent: Box<dyn Agent>,
    turns_taken: u32,
}

/// One match between RED and BLUE.
pub struct Match {
    world: World,
    seats: BTreeMap<EntityId, Seat>,
    factory: Box<dyn AgentFactory>,
    input: Box<dyn TurnInput>,
    log: Box<dyn EventLog>,
    config: MatchConfig,
    phase: Phase,
    turn: u32,
    retired_timeouts: u32,
}

impl fmt::Debug for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Match")
            .field("phase", &self.phase)
            .field("turn", &self.turn)
            .field("agents", &self.seats.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Match {
    /// Set up a match on `world`, starting one agent per live robot.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::Sandbox`] if any agent fails to start.
    pub fn new(
        world: World,
        factory: Box<dyn AgentFactory>,
        config: MatchConfig,
    ) -> Result<Self, MatchError> {
        let mut this = Self {
            world,
            seats: BTreeMap::new(),
            factory,
            input: Box::new(StatusInput),
            log: Box::new(NullLog),
            config,
            phase: Phase::NotStarted,
            turn: 0,
            retired_timeouts: 0,
        };
        let robots: Vec<Robot> = this.world.robots.iter().filter(|r| r.is_alive()).cloned().collect();
        for robot in &robots {
            let agent = this
                .factory
                .spawn(robot)
                .map_err(|source| MatchError::Sandbox { robot: robot.id, source })?;
            this.seats.insert(robot.id, Seat { agent, turns_taken: 0 });
        }
        tracing::debug!(agents = this.seats.len(), "match ready");
        Ok(this)
    }

    /// Build the world from a match file and set up a match on it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is invalid or an agent fails to start.
    pub fn from_file(
        file: MatchFile,
        factory: Box<dyn AgentFactory>,
        config: MatchConfig,
    ) -> Result<Self, MatchError> {
        let world = file.into_world(&config)?;
        Self::new(world, factory, config)
    }

    /// Replace the event sink.
    #[must_use]
    pub fn with_log(mut self, log: Box<dyn EventLog>) -> Self {
        self.log = log;
        self
    }

    /// Replace the turn input provider.
    #[must_use]
    pub fn with_input(mut self, input: Box<dyn TurnInput>) -> Self {
        self.input = input;
        self
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Current turn number (0 before the first turn).
    #[must_use]
    pub const fn turn(&self) -> u32 {
        self.turn
    }

    /// The world as it stands.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Whether termination has been reached.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.phase == Phase::Over
    }

    /// Play the match to the end and return the winner (`None` on a draw).
    pub fn run(&mut self) -> Option<Team> {
        while self.step() {}
        self.winner()
    }

    /// Advance by one turn: start the match at turn 1, or move to the next
    /// turn. Returns whether the match is still running afterwards.
    pub fn step(&mut self) -> bool {
        match self.phase {
            Phase::Over => return false,
            Phase::NotStarted => {
                self.phase = Phase::Running;
                self.turn = 1;
                tracing::info!(
                    map = self.world.board.name(),
                    robots = self.seats.len(),
                    "match started"
                );
            }
            Phase::Running => self.turn += 1,
        }
        self.run_turn();
        self.phase == Phase::Running
    }

    /// Play the current turn: every robot alive at its start acts once in
    /// snapshot order, the dead are removed, then termination is checked.
    pub fn run_turn(&mut self) {
        if self.phase != Phase::Running {
            return;
        }
        tracing::trace!(turn = self.turn, "turn started");

        let snapshot: Vec<EntityId> = self
            .world
            .robots
            .iter()
            .filter(|r| r.is_alive())
            .map(|r| r.id)
            .collect();
        for id in snapshot {
            self.act(id);
        }

        for id in self.world.remove_dead() {
            self.retire(id);
        }

        if self.turn >= self.config.max_turns || self.world.single_team_left() {
            self.phase = Phase::Over;
            let winner = self.winner();
            tracing::info!(turn = self.turn, winner = ?winner, "match over");
            match winner {
                Some(team) => self.log.log(None, &format!("{team} wins")),
                None => self.log.log(None, "Draw"),
            }
        }
    }

    /// Winner once the match is over; `None` while running or on a draw.
    #[must_use]
    pub fn winner(&self) -> Option<Team> {
        if self.phase != Phase::Over {
            return None;
        }
        let red = TeamSummary::of(&self.world, Team::Red);
        let blue = TeamSummary::of(&self.world, Team::Blue);
        match red.rank(&blue) {
            Ordering::Greater => Some(Team::Red),
            Ordering::Less => Some(Team::Blue),
            Ordering::Equal => None,
        }
    }

    /// Snapshot of the outcome so far.
    #[must_use]
    pub fn result(&self) -> MatchResult {
        let live_timeouts: u32 = self.seats.values().map(|s| s.agent.forced_actions()).sum();
        MatchResult {
            winner: self.winner(),
            turns_played: self.turn,
            red: TeamSummary::of(&self.world, Team::Red),
            blue: TeamSummary::of(&self.world, Team::Blue),
            agents_timed_out: self.retired_timeouts + live_timeouts,
        }
    }

    /// Offer one robot its turn.
    fn act(&mut self, id: EntityId) {
        // Killed earlier this turn by another robot.
        let Some(robot) = self.world.robot(id).filter(|r| r.is_alive()).cloned() else {
            return;
        };
        let input = self.input.render(&self.world, &robot, self.turn);
        let Some(seat) = self.seats.get_mut(&id) else {
            tracing::warn!(robot = id, "live robot has no agent");
            return;
        };

        let multiplier = if seat.turns_taken == 0 {
            self.config.first_turn_multiplier
        } else {
            1
        };
        let budget = Duration::from_millis(
            robot
                .kind
                .stats()
                .time_limit_ms
                .saturating_mul(u64::from(multiplier)),
        );
        let line = seat.agent.submit_turn(&input, budget);
        seat.turns_taken += 1;
        for diagnostic in seat.agent.drain_diagnostics() {
            self.log.log(Some(&robot), &diagnostic);
        }
        self.log.log_action(&robot, &line);

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                self.log.log(Some(&robot), &format!("Invalid action '{}': {e}", line.trim()));
                return;
            }
        };
        match game::apply(&mut self.world, id, command) {
            Ok(effects) => self.settle(effects),
            Err(rejection) => self.log.log(Some(&robot), &rejection.to_string()),
        }
    }

    /// Kill agents of robots that just died and start agents for new ones.
    fn settle(&mut self, effects: Effects) {
        for id in effects.destroyed {
            self.retire(id);
        }
        for id in effects.spawned {
            let Some(robot) = self.world.robot(id).cloned() else {
                continue;
            };
            match self.factory.spawn(&robot) {
                Ok(agent) => {
                    self.seats.insert(id, Seat { agent, turns_taken: 0 });
                }
                Err(e) => {
                    tracing::warn!(robot = id, error = %e, "agent failed to start");
                    self.log
                        .log(Some(&robot), &format!("Agent failed to start, robot destroyed: {e}"));
                    self.world.kill_robot(id);
                }
            }
        }
    }

    /// Kill and forget a dead robot's agent. Safe to call more than once.
    fn retire(&mut self, id: EntityId) {
        if let Some(mut seat) = self.seats.remove(&id) {
            seat.agent.kill();
            self.retired_timeouts += seat.agent.forced_actions();
        }
    }
}

impl Drop for Match {
    fn drop(&mut self) {
        for seat in self.seats.values_mut() {
            seat.agent.kill();
        }
    }
}

/// Run a complete match from a match file.
///
/// # Errors
///
/// Returns an error if the match cannot be set up.
pub fn run_match(
    file: MatchFile,
    factory: Box<dyn AgentFactory>,
    config: MatchConfig,
    log: Box<dyn EventLog>,
) -> Result<MatchResult, MatchError> {
    let mut game = Match::from_file(file, factory, config)?.with_log(log);
    game.run();
    Ok(game.result())
}
