//! Agent sandboxes.
//!
//! Each robot is driven by one [`Agent`]. The engine only ever asks an agent
//! for one command line under a time budget and tells it when its robot is
//! dead; how the agent runs (an OS process held suspended between turns, or
//! an in-process script for tests) is up to the implementation.
//!
//! An agent that misses its budget, crashes, or breaks the pipe answers
//! [`FORCED_ACTION`] so its robot is lost instead of stalling the match.

mod process;
mod scripted;

pub use process::{ProcessAgent, ProcessConfig, ProcessFactory};
pub use scripted::{AgentProbe, ProbeBook, ProbeRecord, Reply, ScriptedAgent, ScriptedFactory};

use std::fmt;
use std::path::PathBuf;
use std::process::Command;
use std::str::FromStr;
use std::time::Duration;

use crate::error::SandboxError;
use crate::game::Robot;

/// Command returned in place of a missing or unreadable reply.
pub const FORCED_ACTION: &str = "EXPLODE";

/// One robot's decision process.
pub trait Agent: fmt::Debug {
    /// Hand the agent one line of turn input and wait up to `time_limit`
    /// for one line of output.
    ///
    /// Never fails: any problem yields [`FORCED_ACTION`].
    fn submit_turn(&mut self, input: &str, time_limit: Duration) -> String;

    /// Terminate the agent unconditionally.
    fn kill(&mut self);

    /// Diagnostic lines (agent stderr, discarded output) collected since
    /// the last call.
    fn drain_diagnostics(&mut self) -> Vec<String> {
        Vec::new()
    }

    /// How many turns this agent forfeited with [`FORCED_ACTION`].
    fn forced_actions(&self) -> u32 {
        0
    }
}

/// Creates agents for robots, at match start and whenever one is built.
pub trait AgentFactory {
    /// Start an agent for `robot`.
    ///
    /// # Errors
    ///
    /// Returns an error if the agent cannot be started.
    fn spawn(&mut self, robot: &Robot) -> Result<Box<dyn Agent>, SandboxError>;
}

/// How an agent's code is launched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentRuntime {
    /// A directory containing `main.py`, run with the configured interpreter.
    Python,
    /// A native executable, run directly.
    Executable,
}

impl FromStr for AgentRuntime {
    type Err = SandboxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "python" => Ok(AgentRuntime::Python),
            "executable" => Ok(AgentRuntime::Executable),
            other => Err(SandboxError::UnsupportedRuntime(other.to_string())),
        }
    }
}

/// Where a team's agent code lives and how to run it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentSpec {
    /// Runtime identifier (`python` or `executable`).
    pub runtime: String,
    /// Code directory (python) or executable path.
    pub path: PathBuf,
    /// Extra arguments passed to the program.
    pub args: Vec<String>,
}

impl AgentSpec {
    /// Describe an agent.
    #[must_use]
    pub fn new(runtime: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            runtime: runtime.into(),
            path: path.into(),
            args: Vec::new(),
        }
    }

    /// Append program arguments.
    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Build the OS command that launches this agent.
    ///
    /// # Errors
    ///
    /// Returns [`SandboxError::UnsupportedRuntime`] for an unknown runtime.
    pub fn command(&self, config: &ProcessConfig) -> Result<Command, SandboxError> {
        let mut command = match self.runtime.parse::<AgentRuntime>()? {
            AgentRuntime::Python => {
                let mut command = Command::new(&config.python);
                command.arg(self.path.join("main.py"));
                command
            }
            AgentRuntime::Executable => Command::new(&self.path),
        };
        command.args(&self.args);
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_parse() {
        assert_eq!("python".parse::<AgentRuntime>().unwrap(), AgentRuntime::Python);
        assert_eq!(
            "executable".parse::<AgentRuntime>().unwrap(),
            AgentRuntime::Executable
        );
        assert!(matches!(
            "java".parse::<AgentRuntime>(),
            Err(SandboxError::UnsupportedRuntime(name)) if name == "java"
        ));
    }

    #[test]
    fn test_python_command_runs_main() {
        let config = ProcessConfig::default();
        let command = AgentSpec::new("python", "bots/red").command(&config).unwrap();
        assert_eq!(command.get_program(), config.python.as_str());
        let args: Vec<_> = command.get_args().collect();
        assert_eq!(args, vec![std::path::Path::new("bots/red/main.py").as_os_str()]);
    }

    #[test]
    fn test_executable_command_with_args() {
        let command = AgentSpec::new("executable", "/bin/bot")
            .with_args(["--fast", "1"])
            .command(&ProcessConfig::default())
            .unwrap();
        assert_eq!(command.get_program(), "/bin/bot");
        assert_eq!(command.get_args().count(), 2);
    }

    #[test]
    fn test_unsupported_runtime_fails_command() {
        let err = AgentSpec::new("ruby", "x")
            .command(&ProcessConfig::default())
            .unwrap_err();
        assert!(matches!(err, SandboxError::UnsupportedRuntime(_)));
    }
}
