//! Turn input providers.
//!
//! What an agent sees each turn is decided outside the engine. The engine
//! asks a [`TurnInput`] for one line per robot per turn and passes it on
//! verbatim.

use serde_json::json;

use crate::game::{Robot, World};

/// Produces the input line handed to a robot's agent.
pub trait TurnInput {
    /// Render the input for `robot` on `turn`. Must not contain a newline.
    fn render(&self, world: &World, robot: &Robot, turn: u32) -> String;
}

/// Turn number, the acting robot and its team's balances as one JSON line.
///
/// ```text
/// {"turn":3,"robot":{"id":7,"x":0,"y":0,"team":"RED","type":"PEASANT","health":50},"gold":10,"wood":0,"width":4,"height":2}
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusInput;

impl TurnInput for StatusInput {
    fn render(&self, world: &World, robot: &Robot, turn: u32) -> String {
        let treasury = world.economy.treasury(robot.team);
        json!({
            "turn": turn,
            "robot": robot,
            "gold": treasury.gold,
            "wood": treasury.wood,
            "width": world.board.width(),
            "height": world.board.height(),
        })
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Board, Coord, Economy, IdAllocator, RobotType, Team};

    #[test]
    fn test_status_input_is_one_json_line() {
        let board = Board::new(4, 2, "input").unwrap();
        let mut world = World::new(board, Economy::new(10, 0), IdAllocator::new(5));
        let id = world
            .spawn_robot(Coord::new(1, 1), Team::Blue, RobotType::Pike)
            .unwrap();
        let robot = world.robot(id).unwrap().clone();

        let line = StatusInput.render(&world, &robot, 3);
        assert!(!line.contains('\n'));

        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["turn"], 3);
        assert_eq!(value["gold"], 10);
        assert_eq!(value["robot"]["id"], id);
        assert_eq!(value["robot"]["team"], "BLUE");
        assert_eq!(value["robot"]["type"], "PIKE");
        assert_eq!(value["width"], 4);
    }
}
