//! Match file validation command implementation.

use super::CliError;
use std::path::Path;
use warcode::engine::scenario::MatchFile;
use warcode::game::check_invariants;
use warcode::{MatchConfig, Team};

/// Execute the validate command.
///
/// # Errors
///
/// Returns an error if the match file cannot be read or is invalid.
pub(crate) fn execute(map: &Path) -> Result<(), CliError> {
    println!("Validating: {}", map.display());
    println!();

    let file = MatchFile::load(map);
    print_check("JSON schema", file.is_ok());
    let file = file?;

    let world = file.into_world(&MatchConfig::default());
    print_check("Board and entities agree", world.is_ok());
    let world = world?;

    let violations = check_invariants(&world);
    print_check("Board invariants", violations.is_empty());
    if let Some(first) = violations.first() {
        return Err(CliError::new(first.to_string()));
    }

    println!();
    println!("Summary:");
    println!("  Name:       {}", world.board.name());
    println!("  Size:       {}x{}", world.board.width(), world.board.height());
    println!("  Trees:      {}", world.trees.len());
    println!("  Gold mines: {}", world.gold_mines.len());
    for team in Team::ALL {
        println!("  {team:<5} robots: {}", world.team_robots(team).count());
    }

    Ok(())
}

fn print_check(name: &str, ok: bool) {
    let status = if ok { "OK" } else { "FAIL" };
    println!("  [{status:>4}] {name}");
}
