use core::fmt;

use serde::{Deserialize, Serialize};

/// A tile on the arena grid.
///
/// Serialized as a two-element array (`[x, y]`), which is how both the match server and the
/// policy profiles write locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct GridLocation {
    pub x: i32,
    pub y: i32,
}

impl GridLocation {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The tile one row further from the agent's own edge.
    pub const fn step_forward(self) -> Self {
        Self {
            x: self.x,
            y: self.y + 1,
        }
    }

    pub fn distance(self, other: GridLocation) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        (dx * dx + dy * dy).sqrt()
    }
}

impl From<[i32; 2]> for GridLocation {
    fn from([x, y]: [i32; 2]) -> Self {
        Self { x, y }
    }
}

impl From<GridLocation> for [i32; 2] {
    fn from(value: GridLocation) -> Self {
        [value.x, value.y]
    }
}

impl From<(i32, i32)> for GridLocation {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for GridLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}
