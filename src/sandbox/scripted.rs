//! In-process agents that replay a fixed script.
//!
//! Used by tests, benches and the fuzzer to drive matches deterministically
//! without launching processes. Every agent shares an [`AgentProbe`] with
//! whoever created it, so callers can inspect what the engine sent after
//! the agent has been moved into a match.

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::error::SandboxError;
use crate::game::{EntityId, Robot};
use crate::sandbox::{Agent, AgentFactory, FORCED_ACTION};

/// One scripted turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Answer with this line.
    Line(String),
    /// Never answer; the turn is forfeited.
    Silent,
}

impl Reply {
    /// Shorthand for [`Reply::Line`].
    #[must_use]
    pub fn line(line: impl Into<String>) -> Self {
        Reply::Line(line.into())
    }
}

/// What the engine did to one agent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeRecord {
    /// Turn inputs in the order received.
    pub inputs: Vec<String>,
    /// Time budget of each turn.
    pub time_limits: Vec<Duration>,
    /// Times `kill` was called.
    pub kills: u32,
}

/// Shared view of one agent's [`ProbeRecord`].
#[derive(Debug, Clone, Default)]
pub struct AgentProbe(Arc<Mutex<ProbeRecord>>);

impl AgentProbe {
    /// Snapshot of the record.
    #[must_use]
    pub fn record(&self) -> ProbeRecord {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, ProbeRecord> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// An agent that answers from a queue of [`Reply`] values.
#[derive(Debug)]
pub struct ScriptedAgent {
    script: VecDeque<Reply>,
    fallback: Reply,
    probe: AgentProbe,
    forced: u32,
    killed: bool,
}

impl ScriptedAgent {
    /// Play `script`, then answer `fallback` forever.
    pub fn new(script: impl IntoIterator<Item = Reply>, fallback: Reply) -> Self {
        Self {
            script: script.into_iter().collect(),
            fallback,
            probe: AgentProbe::default(),
            forced: 0,
            killed: false,
        }
    }

    /// Answer the same line every turn.
    pub fn repeating(line: impl Into<String>) -> Self {
        Self::new(std::iter::empty(), Reply::line(line))
    }

    /// Never answer.
    pub fn silent() -> Self {
        Self::new(std::iter::empty(), Reply::Silent)
    }

    /// Handle for inspecting this agent later.
    #[must_use]
    pub fn probe(&self) -> AgentProbe {
        self.probe.clone()
    }
}

impl Agent for ScriptedAgent {
    fn submit_turn(&mut self, input: &str, time_limit: Duration) -> String {
        {
            let mut record = self.probe.lock();
            record.inputs.push(input.to_string());
            record.time_limits.push(time_limit);
        }
        let reply = self.script.pop_front().unwrap_or_else(|| self.fallback.clone());
        match reply {
            Reply::Line(line) if !self.killed => line,
            _ => {
                self.forced += 1;
                FORCED_ACTION.to_string()
            }
        }
    }

    fn kill(&mut self) {
        self.killed = true;
        self.probe.lock().kills += 1;
    }

    fn forced_actions(&self) -> u32 {
        self.forced
    }
}

/// Probes of every agent a [`ScriptedFactory`] created, by robot id.
#[derive(Debug, Clone, Default)]
pub struct ProbeBook(Arc<Mutex<BTreeMap<EntityId, AgentProbe>>>);

impl ProbeBook {
    /// Record of the agent created for `robot`.
    #[must_use]
    pub fn get(&self, robot: EntityId) -> Option<ProbeRecord> {
        self.lock().get(&robot).map(AgentProbe::record)
    }

    /// Ids of every robot an agent was created for.
    #[must_use]
    pub fn robots(&self) -> Vec<EntityId> {
        self.lock().keys().copied().collect()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<EntityId, AgentProbe>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Creates a [`ScriptedAgent`] per robot by calling a script function.
pub struct ScriptedFactory<F> {
    script: F,
    book: ProbeBook,
}

impl<F> ScriptedFactory<F>
where
    F: FnMut(&Robot) -> ScriptedAgent,
{
    /// Create a factory from a per-robot script.
    pub fn new(script: F) -> Self {
        Self {
            script,
            book: ProbeBook::default(),
        }
    }

    /// Handle to the probes of every agent created so far or later.
    #[must_use]
    pub fn probes(&self) -> ProbeBook {
        self.book.clone()
    }
}

impl<F> std::fmt::Debug for ScriptedFactory<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptedFactory")
            .field("book", &self.book)
            .finish_non_exhaustive()
    }
}

impl<F> AgentFactory for ScriptedFactory<F>
where
    F: FnMut(&Robot) -> ScriptedAgent,
{
    fn spawn(&mut self, robot: &Robot) -> Result<Box<dyn Agent>, SandboxError> {
        let agent = (self.script)(robot);
        self.book.lock().insert(robot.id, agent.probe());
        Ok(Box::new(agent))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Coord, RobotType, Team};

    #[test]
    fn test_script_then_fallback() {
        let mut agent = ScriptedAgent::new(
            [Reply::line("MOVE 1 1"), Reply::Silent],
            Reply::line("CUT 4"),
        );
        let limit = Duration::from_millis(5);
        assert_eq!(agent.submit_turn("a", limit), "MOVE 1 1");
        assert_eq!(agent.submit_turn("b", limit), FORCED_ACTION);
        assert_eq!(agent.submit_turn("c", limit), "CUT 4");
        assert_eq!(agent.forced_actions(), 1);

        let record = agent.probe().record();
        assert_eq!(record.inputs, vec!["a", "b", "c"]);
        assert_eq!(record.time_limits, vec![limit; 3]);
    }

    #[test]
    fn test_factory_records_probes() {
        let mut factory = ScriptedFactory::new(|_: &Robot| ScriptedAgent::repeating("EXPLODE"));
        let book = factory.probes();
        let robot = Robot::new(7, Coord::new(0, 0), Team::Blue, RobotType::Pike);

        let mut agent = factory.spawn(&robot).unwrap();
        agent.kill();

        assert_eq!(book.robots(), vec![7]);
        assert_eq!(book.get(7).unwrap().kills, 1);
        assert!(book.get(8).is_none());
    }
}
