//! Parsing agent output lines into commands.

use std::fmt;
use std::str::FromStr;

use crate::game::{Coord, EntityId, RobotType, UnknownType};

/// One command an agent may issue per turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Damage everything around a target cell.
    Attack {
        /// Target cell.
        target: Coord,
    },
    /// Construct a new robot on an adjacent empty cell.
    Build {
        /// Where the new robot goes.
        at: Coord,
        /// Type of the new robot.
        kind: RobotType,
    },
    /// Harvest wood from an adjacent tree.
    Cut {
        /// Tree to cut.
        tree: EntityId,
    },
    /// Harvest gold from an adjacent gold mine.
    Mine {
        /// Mine to work.
        mine: EntityId,
    },
    /// Move to an empty cell within range.
    Move {
        /// Destination cell.
        to: Coord,
    },
    /// Convert in place to another type.
    Train {
        /// Type to become.
        kind: RobotType,
    },
    /// Self-destruct.
    Explode,
}

impl Command {
    /// Keyword that starts this command on the wire.
    #[must_use]
    pub const fn keyword(&self) -> &'static str {
        match self {
            Command::Attack { .. } => "ATTACK",
            Command::Build { .. } => "BUILD",
            Command::Cut { .. } => "CUT",
            Command::Mine { .. } => "MINE",
            Command::Move { .. } => "MOVE",
            Command::Train { .. } => "TRAIN",
            Command::Explode => "EXPLODE",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = self.keyword();
        match self {
            Command::Attack { target: c } | Command::Move { to: c } => {
                write!(f, "{keyword} {} {}", c.x, c.y)
            }
            Command::Build { at, kind } => write!(f, "{keyword} {} {} {kind}", at.x, at.y),
            Command::Cut { tree: id } | Command::Mine { mine: id } => write!(f, "{keyword} {id}"),
            Command::Train { kind } => write!(f, "{keyword} {kind}"),
            Command::Explode => f.write_str(keyword),
        }
    }
}

/// Why a line could not be parsed into a [`Command`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The line held no tokens.
    #[error("empty command")]
    Empty,
    /// The first token is not one of the seven keywords.
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
    /// Wrong number of arguments for the keyword.
    #[error("{command} takes {expected} argument(s), got {found}")]
    Arity {
        /// Keyword that was recognised.
        command: &'static str,
        /// Arguments the keyword takes.
        expected: usize,
        /// Arguments supplied.
        found: usize,
    },
    /// An argument that must be an integer is not one.
    #[error("{command}: '{token}' is not an integer")]
    NotAnInteger {
        /// Keyword that was recognised.
        command: &'static str,
        /// Offending token.
        token: String,
    },
    /// A type argument is not in the catalog.
    #[error("{command}: {source}")]
    UnknownType {
        /// Keyword that was recognised.
        command: &'static str,
        /// Underlying lookup failure.
        source: UnknownType,
    },
}

struct Args<'a> {
    command: &'static str,
    tokens: Vec<&'a str>,
}

impl<'a> Args<'a> {
    fn expect(command: &'static str, tokens: Vec<&'a str>, expected: usize) -> Result<Self, ParseError> {
        if tokens.len() != expected {
            return Err(ParseError::Arity {
                command,
                expected,
                found: tokens.len(),
            });
        }
        Ok(Self { command, tokens })
    }

    fn int<T: FromStr>(&self, idx: usize) -> Result<T, ParseError> {
        let token = self.tokens[idx];
        token.parse().map_err(|_| ParseError::NotAnInteger {
            command: self.command,
            token: token.to_string(),
        })
    }

    fn coord(&self, idx: usize) -> Result<Coord, ParseError> {
        Ok(Coord::new(self.int(idx)?, self.int(idx + 1)?))
    }

    fn kind(&self, idx: usize) -> Result<RobotType, ParseError> {
        self.tokens[idx]
            .parse()
            .map_err(|source| ParseError::UnknownType {
                command: self.command,
                source,
            })
    }
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut tokens = line.split_whitespace();
        let keyword = tokens.next().ok_or(ParseError::Empty)?;
        let rest: Vec<&str> = tokens.collect();

        match keyword {
            "ATTACK" => {
                let args = Args::expect("ATTACK", rest, 2)?;
                Ok(Command::Attack {
                    target: args.coord(0)?,
                })
            }
            "BUILD" => {
                let args = Args::expect("BUILD", rest, 3)?;
                Ok(Command::Build {
                    at: args.coord(0)?,
                    kind: args.kind(2)?,
                })
            }
            "CUT" => {
                let args = Args::expect("CUT", rest, 1)?;
                Ok(Command::Cut { tree: args.int(0)? })
            }
            "MINE" => {
                let args = Args::expect("MINE", rest, 1)?;
                Ok(Command::Mine { mine: args.int(0)? })
            }
            "MOVE" => {
                let args = Args::expect("MOVE", rest, 2)?;
                Ok(Command::Move { to: args.coord(0)? })
            }
            "TRAIN" => {
                let args = Args::expect("TRAIN", rest, 1)?;
                Ok(Command::Train { kind: args.kind(0)? })
            }
            "EXPLODE" => {
                Args::expect("EXPLODE", rest, 0)?;
                Ok(Command::Explode)
            }
            other => Err(ParseError::UnknownCommand(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_every_command() {
        assert_eq!(
            "ATTACK 3 4".parse(),
            Ok(Command::Attack {
                target: Coord::new(3, 4)
            })
        );
        assert_eq!(
            "BUILD 1 2 HOUSE".parse(),
            Ok(Command::Build {
                at: Coord::new(1, 2),
                kind: RobotType::House
            })
        );
        assert_eq!("CUT 17".parse(), Ok(Command::Cut { tree: 17 }));
        assert_eq!("MINE 99".parse(), Ok(Command::Mine { mine: 99 }));
        assert_eq!(
            "MOVE -1 0".parse(),
            Ok(Command::Move {
                to: Coord::new(-1, 0)
            })
        );
        assert_eq!(
            "TRAIN ARCHER".parse(),
            Ok(Command::Train {
                kind: RobotType::Archer
            })
        );
        assert_eq!("EXPLODE".parse(), Ok(Command::Explode));
    }

    #[test]
    fn test_surrounding_whitespace_ignored() {
        assert_eq!("  EXPLODE \n".parse(), Ok(Command::Explode));
        assert_eq!(
            "MOVE\t2   3\r\n".parse(),
            Ok(Command::Move {
                to: Coord::new(2, 3)
            })
        );
    }

    #[test]
    fn test_empty_and_unknown() {
        assert_eq!("".parse::<Command>(), Err(ParseError::Empty));
        assert_eq!("   \n".parse::<Command>(), Err(ParseError::Empty));
        assert_eq!(
            "attack 1 1".parse::<Command>(),
            Err(ParseError::UnknownCommand("attack".to_string()))
        );
    }

    #[test]
    fn test_wrong_arity() {
        assert_eq!(
            "MOVE 1".parse::<Command>(),
            Err(ParseError::Arity {
                command: "MOVE",
                expected: 2,
                found: 1
            })
        );
        assert!(matches!(
            "EXPLODE now".parse::<Command>(),
            Err(ParseError::Arity { .. })
        ));
        assert!(matches!(
            "BUILD 1 1".parse::<Command>(),
            Err(ParseError::Arity { .. })
        ));
    }

    #[test]
    fn test_non_numeric_arguments() {
        assert!(matches!(
            "ATTACK x 1".parse::<Command>(),
            Err(ParseError::NotAnInteger { command: "ATTACK", .. })
        ));
        assert!(matches!(
            "CUT -5".parse::<Command>(),
            Err(ParseError::NotAnInteger { command: "CUT", .. })
        ));
        assert!(matches!(
            "MOVE 1.5 2".parse::<Command>(),
            Err(ParseError::NotAnInteger { .. })
        ));
    }

    #[test]
    fn test_unknown_type_name() {
        let err = "TRAIN KNIGHT".parse::<Command>().unwrap_err();
        assert_eq!(err.to_string(), "TRAIN: unknown robot type 'KNIGHT'");
    }

    #[test]
    fn test_display_matches_wire_form() {
        for line in ["ATTACK 3 -4", "BUILD 0 1 PEASANT", "CUT 5", "MINE 6", "MOVE 7 8", "TRAIN PIKE", "EXPLODE"] {
            let command: Command = line.parse().unwrap();
            assert_eq!(command.to_string(), line);
        }
    }
}
