//! Output formatting utilities for CLI.

use serde::Serialize;
use warcode::{MatchResult, TeamSummary};

/// JSON-serializable match result.
#[derive(Debug, Serialize)]
pub(super) struct JsonMatchResult<'a> {
    /// Map name.
    pub(super) map: &'a str,
    /// Id seed used.
    pub(super) seed: u64,
    /// The result itself.
    #[serde(flatten)]
    pub(super) result: &'a MatchResult,
}

impl<'a> JsonMatchResult<'a> {
    /// Wrap a result with its run parameters.
    pub(super) fn new(result: &'a MatchResult, map: &'a str, seed: u64) -> Self {
        Self { map, seed, result }
    }
}

/// Format a match result as human-readable text.
pub(super) fn format_text(result: &MatchResult, map: &str, seed: u64) -> String {
    let mut output = String::new();

    output.push_str(&format!("Match Result ({map}, seed: {seed})\n"));
    match result.winner {
        Some(team) => output.push_str(&format!("  Winner: {team}\n")),
        None => output.push_str("  Result: Draw\n"),
    }
    output.push_str(&format!("  Turns:  {}\n", result.turns_played));
    if result.agents_timed_out > 0 {
        output.push_str(&format!("  Forfeited turns: {}\n", result.agents_timed_out));
    }
    output.push('\n');

    output.push_str("Teams:\n");
    for (name, summary) in [("RED", &result.red), ("BLUE", &result.blue)] {
        output.push_str(&format_team(name, summary));
    }

    output
}

fn format_team(name: &str, summary: &TeamSummary) -> String {
    format!(
        "  {name:<5} robots: {:>3}  health: {:>6}  gold: {:>6}  wood: {:>6}\n",
        summary.robots, summary.health, summary.gold, summary.wood
    )
}
