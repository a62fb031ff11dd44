//! Board, cell and coordinate types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game::EntityId;

/// A coordinate on the board.
///
/// Signed so that off-board targets parsed from agent commands can be
/// represented and rejected by bounds checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Coord {
    /// X coordinate (column).
    pub x: i32,
    /// Y coordinate (row).
    pub y: i32,
}

impl Coord {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to `other`.
    #[must_use]
    pub const fn dist2(self, other: Coord) -> i64 {
        let dx = self.x as i64 - other.x as i64;
        let dy = self.y as i64 - other.y as i64;
        dx * dx + dy * dy
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Contents of a single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "RawCell", into = "RawCell")]
pub enum Cell {
    /// Nothing here.
    #[default]
    Empty,
    /// Impassable terrain (including mined-out gold mines).
    Wall,
    /// Occupied by the robot, tree or gold mine with this id.
    Entity(EntityId),
}

impl Cell {
    /// Whether the cell is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }
}

/// Wire form of a cell: `" "`, `"W"` or an integer id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawCell {
    Id(EntityId),
    Mark(String),
}

impl TryFrom<RawCell> for Cell {
    type Error = String;

    fn try_from(raw: RawCell) -> Result<Self, Self::Error> {
        match raw {
            RawCell::Id(id) => Ok(Cell::Entity(id)),
            RawCell::Mark(mark) => match mark.as_str() {
                " " => Ok(Cell::Empty),
                "W" => Ok(Cell::Wall),
                other => Err(format!("invalid board cell '{other}'")),
            },
        }
    }
}

impl From<Cell> for RawCell {
    fn from(cell: Cell) -> Self {
        match cell {
            Cell::Empty => RawCell::Mark(" ".to_string()),
            Cell::Wall => RawCell::Mark("W".to_string()),
            Cell::Entity(id) => RawCell::Id(id),
        }
    }
}

/// The match board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Width in cells.
    width: i32,
    /// Height in cells.
    height: i32,
    /// Cells stored in row-major order.
    cells: Vec<Cell>,
    /// Human-readable map name.
    name: String,
}

impl Board {
    /// Create an empty board.
    ///
    /// Returns `None` if width or height is not positive.
    #[must_use]
    pub fn new(width: i32, height: i32, name: impl Into<String>) -> Option<Self> {
        if width <= 0 || height <= 0 {
            return None;
        }

        let size = usize::try_from(width).ok()? * usize::try_from(height).ok()?;
        Some(Self {
            width,
            height,
            cells: vec![Cell::Empty; size],
            name: name.into(),
        })
    }

    /// Build a board from rows of cells (`rows[y][x]`).
    ///
    /// Returns `None` if the rows are empty or ragged.
    #[must_use]
    pub fn from_rows(rows: Vec<Vec<Cell>>, name: impl Into<String>) -> Option<Self> {
        let height = i32::try_from(rows.len()).ok()?;
        let width = i32::try_from(rows.first()?.len()).ok()?;
        if width == 0 || rows.iter().any(|row| row.len() != rows[0].len()) {
            return None;
        }

        Some(Self {
            width,
            height,
            cells: rows.into_iter().flatten().collect(),
            name: name.into(),
        })
    }

    /// Rows of cells (`rows[y][x]`), the wire layout.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<Cell>> {
        self.cells
            .chunks(self.width as usize)
            .map(<[Cell]>::to_vec)
            .collect()
    }

    /// Width of the board.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Height of the board.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Name of the map this board came from.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check if a coordinate is on the board.
    #[must_use]
    pub const fn in_bounds(&self, coord: Coord) -> bool {
        coord.x >= 0 && coord.y >= 0 && coord.x < self.width && coord.y < self.height
    }

    /// Convert a coordinate to an index into the cells array.
    #[allow(clippy::cast_sign_loss)]
    fn index(&self, coord: Coord) -> Option<usize> {
        if self.in_bounds(coord) {
            Some(coord.y as usize * self.width as usize + coord.x as usize)
        } else {
            None
        }
    }

    /// Get the cell at the given coordinate.
    #[must_use]
    pub fn get(&self, coord: Coord) -> Option<Cell> {
        self.index(coord).map(|idx| self.cells[idx])
    }

    /// Set the cell at the given coordinate.
    ///
    /// Returns `false` if the coordinate is out of bounds.
    pub fn set(&mut self, coord: Coord, cell: Cell) -> bool {
        if let Some(idx) = self.index(coord) {
            self.cells[idx] = cell;
            true
        } else {
            false
        }
    }

    /// Whether the coordinate is on the board and empty.
    #[must_use]
    pub fn is_empty(&self, coord: Coord) -> bool {
        self.get(coord).is_some_and(Cell::is_empty)
    }

    /// Iterate over all coordinates and cells.
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn iter(&self) -> impl Iterator<Item = (Coord, Cell)> + '_ {
        let width = self.width as usize;
        self.cells.iter().enumerate().map(move |(idx, cell)| {
            let x = (idx % width) as i32;
            let y = (idx / width) as i32;
            (Coord::new(x, y), *cell)
        })
    }
}
