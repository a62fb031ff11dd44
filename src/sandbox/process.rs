//! Agents running as OS processes.
//!
//! The child is stopped with `SIGSTOP` whenever it is not its turn and
//! resumed with `SIGCONT` only while the engine waits for its reply, so an
//! agent cannot compute on other robots' time. A writer thread feeds its
//! stdin and reader threads forward its stdout and stderr line by line over
//! channels, so the engine never blocks on a pipe: it only polls the stdout
//! channel against a deadline that starts before the input is handed over.

use std::io::{self, BufRead, BufReader, Read, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::SandboxError;
use crate::game::{Robot, Team};
use crate::sandbox::{Agent, AgentFactory, AgentSpec, FORCED_ACTION};

/// Process sandbox settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessConfig {
    /// Sleep between checks for a reply.
    pub poll_interval: Duration,
    /// Interpreter for the `python` runtime.
    pub python: String,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_micros(100),
            python: "python3".to_string(),
        }
    }
}

/// Why a turn produced no reply.
#[derive(Debug, thiserror::Error)]
enum Forfeit {
    #[error("no reply within {0:?}")]
    Timeout(Duration),
    #[error("agent closed its output")]
    Exited,
    #[error("agent input is closed")]
    Closed,
}

/// An agent process, suspended between turns.
#[derive(Debug)]
pub struct ProcessAgent {
    child: Child,
    input: Option<Sender<Vec<u8>>>,
    replies: Receiver<String>,
    stderr: Receiver<String>,
    diagnostics: Vec<String>,
    poll_interval: Duration,
    forced: u32,
    killed: bool,
}

impl ProcessAgent {
    /// Launch an agent described by `spec`.
    ///
    /// # Errors
    ///
    /// Returns an error for an unsupported runtime or if the process or its
    /// reader threads cannot be started.
    pub fn launch(spec: &AgentSpec, config: &ProcessConfig) -> Result<Self, SandboxError> {
        Self::spawn(spec.command(config)?, config)
    }

    /// Start `command` as an agent with piped standard streams.
    ///
    /// The process is suspended before this returns.
    ///
    /// # Errors
    ///
    /// Returns an error if the process or its reader threads cannot be
    /// started.
    pub fn spawn(mut command: Command, config: &ProcessConfig) -> Result<Self, SandboxError> {
        let program = command.get_program().to_string_lossy().into_owned();
        let mut child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| SandboxError::Spawn {
                program: program.clone(),
                source,
            })?;

        let pipes = (child.stdin.take(), child.stdout.take(), child.stderr.take());
        let (Some(stdin), Some(stdout), Some(stderr)) = pipes else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(SandboxError::MissingPipe("standard"));
        };

        let pid = child.id();
        let pumps = forward_input(stdin, format!("agent-{pid}-in")).and_then(|input| {
            let replies = forward_lines(stdout, format!("agent-{pid}-out"))?;
            let stderr = forward_lines(stderr, format!("agent-{pid}-err"))?;
            Ok((input, replies, stderr))
        });
        let (input, replies, stderr) = match pumps {
            Ok(pumps) => pumps,
            Err(source) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(SandboxError::Spawn { program, source });
            }
        };

        let agent = Self {
            child,
            input: Some(input),
            replies,
            stderr,
            diagnostics: Vec::new(),
            poll_interval: config.poll_interval,
            forced: 0,
            killed: false,
        };
        agent.suspend();
        tracing::debug!(pid, %program, "agent started");
        Ok(agent)
    }

    fn exchange(&mut self, input: &str, time_limit: Duration) -> Result<String, Forfeit> {
        // Lines the agent wrote after its last reply are not this turn's answer.
        while let Ok(stale) = self.replies.try_recv() {
            self.diagnostics.push(format!("discarded output '{stale}'"));
        }

        let deadline = Instant::now() + time_limit;
        self.resume();
        let mut bytes = input.as_bytes().to_vec();
        if !input.ends_with('\n') {
            bytes.push(b'\n');
        }
        let sender = self.input.as_ref().ok_or(Forfeit::Closed)?;
        if sender.send(bytes).is_err() {
            self.input = None;
            return Err(Forfeit::Closed);
        }

        loop {
            match self.replies.try_recv() {
                Ok(line) => return Ok(line),
                Err(TryRecvError::Disconnected) => return Err(Forfeit::Exited),
                Err(TryRecvError::Empty) => {}
            }
            if Instant::now() >= deadline {
                return Err(Forfeit::Timeout(time_limit));
            }
            thread::sleep(self.poll_interval);
        }
    }

    fn suspend(&self) {
        if !self.killed {
            if let Err(e) = signal::stop(self.child.id()) {
                tracing::warn!(pid = self.child.id(), error = %e, "failed to suspend agent");
            }
        }
    }

    fn resume(&self) {
        if !self.killed {
            if let Err(e) = signal::resume(self.child.id()) {
                tracing::warn!(pid = self.child.id(), error = %e, "failed to resume agent");
            }
        }
    }
}

impl Agent for ProcessAgent {
    fn submit_turn(&mut self, input: &str, time_limit: Duration) -> String {
        if self.killed {
            return FORCED_ACTION.to_string();
        }
        let outcome = self.exchange(input, time_limit);
        self.suspend();
        match outcome {
            Ok(line) => line,
            Err(reason) => {
                tracing::debug!(pid = self.child.id(), %reason, "agent forfeited turn");
                self.forced += 1;
                FORCED_ACTION.to_string()
            }
        }
    }

    fn kill(&mut self) {
        if self.killed {
            return;
        }
        self.killed = true;
        self.input = None;
        if let Err(e) = self.child.kill() {
            tracing::debug!(pid = self.child.id(), error = %e, "agent already exited");
        }
        if let Err(e) = self.child.wait() {
            tracing::warn!(pid = self.child.id(), error = %e, "failed to reap agent");
        }
    }

    fn drain_diagnostics(&mut self) -> Vec<String> {
        let mut lines = std::mem::take(&mut self.diagnostics);
        lines.extend(self.stderr.try_iter());
        lines
    }

    fn forced_actions(&self) -> u32 {
        self.forced
    }
}

impl Drop for ProcessAgent {
    fn drop(&mut self) {
        self.kill();
    }
}

/// Launches one process per robot from a per-team [`AgentSpec`].
#[derive(Debug, Clone)]
pub struct ProcessFactory {
    red: AgentSpec,
    blue: AgentSpec,
    config: ProcessConfig,
}

impl ProcessFactory {
    /// Create a factory for the two teams.
    ///
    /// # Errors
    ///
    /// Returns [`SandboxError::UnsupportedRuntime`] if either team names an
    /// unknown runtime.
    pub fn new(red: AgentSpec, blue: AgentSpec, config: ProcessConfig) -> Result<Self, SandboxError> {
        red.command(&config)?;
        blue.command(&config)?;
        Ok(Self { red, blue, config })
    }
}

impl AgentFactory for ProcessFactory {
    fn spawn(&mut self, robot: &Robot) -> Result<Box<dyn Agent>, SandboxError> {
        let spec = match robot.team {
            Team::Red => &self.red,
            Team::Blue => &self.blue,
        };
        Ok(Box::new(ProcessAgent::launch(spec, &self.config)?))
    }
}

/// Write queued turn inputs to the child's stdin until it closes.
fn forward_input(stdin: ChildStdin, name: String) -> io::Result<Sender<Vec<u8>>> {
    let (tx, rx) = mpsc::channel::<Vec<u8>>();
    thread::Builder::new().name(name).spawn(move || {
        let mut stdin = stdin;
        for bytes in rx {
            if stdin.write_all(&bytes).and_then(|()| stdin.flush()).is_err() {
                break;
            }
        }
    })?;
    Ok(tx)
}

fn forward_lines<R>(reader: R, name: String) -> io::Result<Receiver<String>>
where
    R: Read + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::Builder::new().name(name).spawn(move || {
        for line in BufReader::new(reader).lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    })?;
    Ok(rx)
}

#[cfg(unix)]
mod signal {
    use std::io;

    pub(super) fn stop(pid: u32) -> io::Result<()> {
        send(pid, libc::SIGSTOP)
    }

    pub(super) fn resume(pid: u32) -> io::Result<()> {
        send(pid, libc::SIGCONT)
    }

    fn send(pid: u32, sig: libc::c_int) -> io::Result<()> {
        let pid = libc::pid_t::try_from(pid).map_err(io::Error::other)?;
        // SAFETY: kill(2) has no memory effects; pid is our own unreaped child.
        if unsafe { libc::kill(pid, sig) } == 0 {
            Ok(())
        } else {
            Err(io::Error::last_os_error())
        }
    }
}

#[cfg(not(unix))]
mod signal {
    use std::io;

    pub(super) fn stop(_pid: u32) -> io::Result<()> {
        Ok(())
    }

    pub(super) fn resume(_pid: u32) -> io::Result<()> {
        Ok(())
    }
}
