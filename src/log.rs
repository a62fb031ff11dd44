//! Match event sinks.
//!
//! The engine reports what each robot did and why commands were rejected
//! through [`EventLog`]. Nothing in the engine depends on a sink being
//! attached; [`NullLog`] discards everything.

use std::io::Write;

use crate::game::Robot;

/// Receiver of line-oriented match events.
pub trait EventLog {
    /// Record a message, tagged with the robot it concerns if known.
    fn log(&mut self, robot: Option<&Robot>, message: &str);

    /// Record the raw command line a robot's agent produced.
    fn log_action(&mut self, robot: &Robot, line: &str);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLog;

impl EventLog for NullLog {
    fn log(&mut self, _robot: Option<&Robot>, _message: &str) {}

    fn log_action(&mut self, _robot: &Robot, _line: &str) {}
}

/// Forwards events to `tracing` with `team` and `robot` fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl EventLog for TracingLog {
    fn log(&mut self, robot: Option<&Robot>, message: &str) {
        match robot {
            Some(robot) => tracing::debug!(team = %robot.team, robot = robot.id, "{message}"),
            None => tracing::debug!("{message}"),
        }
    }

    fn log_action(&mut self, robot: &Robot, line: &str) {
        tracing::info!(team = %robot.team, robot = robot.id, action = line.trim_end(), "action");
    }
}

/// Writes events as text lines: `RED player 42> message`.
///
/// Write failures are swallowed so a broken sink never stalls a match.
#[derive(Debug)]
pub struct WriterLog<W: Write> {
    out: W,
}

impl<W: Write> WriterLog<W> {
    /// Wrap a writer.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Recover the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, robot: Option<&Robot>, line: &str) {
        let result = match robot {
            Some(robot) => writeln!(self.out, "{} player {}> {line}", robot.team, robot.id),
            None => writeln!(self.out, "engine> {line}"),
        };
        if let Err(e) = result {
            tracing::warn!(error = %e, "event log write failed");
        }
    }
}

impl<W: Write> EventLog for WriterLog<W> {
    fn log(&mut self, robot: Option<&Robot>, message: &str) {
        for line in message.lines() {
            self.line(robot, line);
        }
    }

    fn log_action(&mut self, robot: &Robot, line: &str) {
        self.line(Some(robot), &format!("Action is '{}'", line.trim_end()));
    }
}
