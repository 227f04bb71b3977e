use lane_core::GridLocation;
use serde::{Deserialize, Serialize};

/// One of the four diagonal edges of the diamond arena.
///
/// The agent owns the two bottom edges; mobile units spawned on one of them walk toward the
/// diagonally opposite top edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Edge {
    pub fn opposite(self) -> Edge {
        match self {
            Edge::TopLeft => Edge::BottomRight,
            Edge::TopRight => Edge::BottomLeft,
            Edge::BottomLeft => Edge::TopRight,
            Edge::BottomRight => Edge::TopLeft,
        }
    }

    pub fn is_friendly(self) -> bool {
        matches!(self, Edge::BottomLeft | Edge::BottomRight)
    }
}

/// Square grid clipped to a diamond. The agent holds rows `0..half`, the opponent the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arena {
    size: i32,
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(28)
    }
}

impl Arena {
    pub fn new(size: u32) -> Self {
        assert!(size >= 2 && size % 2 == 0, "arena size must be even and >= 2");
        Self { size: size as i32 }
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn half(&self) -> i32 {
        self.size / 2
    }

    pub fn in_bounds(&self, loc: GridLocation) -> bool {
        let half = self.half();
        let GridLocation { x, y } = loc;
        if y < 0 || y >= self.size {
            return false;
        }
        if y < half {
            x >= half - 1 - y && x <= half + y
        } else {
            x >= y - half && x <= self.size - 1 - (y - half)
        }
    }

    pub fn in_friendly_half(&self, loc: GridLocation) -> bool {
        self.in_bounds(loc) && loc.y < self.half()
    }

    /// Edge tiles, ordered from the arena's middle row outward.
    pub fn edge_locations(&self, edge: Edge) -> Vec<GridLocation> {
        let half = self.half();
        (0..half)
            .map(|i| match edge {
                Edge::BottomLeft => GridLocation::new(half - 1 - i, i),
                Edge::BottomRight => GridLocation::new(half + i, i),
                Edge::TopLeft => GridLocation::new(i, half + i),
                Edge::TopRight => GridLocation::new(self.size - 1 - i, half + i),
            })
            .collect()
    }

    pub fn edge_of(&self, loc: GridLocation) -> Option<Edge> {
        if !self.in_bounds(loc) {
            return None;
        }
        let half = self.half();
        let GridLocation { x, y } = loc;
        if y < half {
            if x == half - 1 - y {
                Some(Edge::BottomLeft)
            } else if x == half + y {
                Some(Edge::BottomRight)
            } else {
                None
            }
        } else if x == y - half {
            Some(Edge::TopLeft)
        } else if x == self.size - 1 - (y - half) {
            Some(Edge::TopRight)
        } else {
            None
        }
    }

    pub fn is_on_edge(&self, loc: GridLocation, edge: Edge) -> bool {
        self.edge_of(loc) == Some(edge)
    }

    /// Number of 4-neighbour steps from `loc` to the line containing `edge`.
    ///
    /// Every step changes the relevant diagonal coordinate by exactly one, so this never
    /// overestimates.
    pub(crate) fn steps_to_edge(&self, loc: GridLocation, edge: Edge) -> u32 {
        let half = self.half();
        let GridLocation { x, y } = loc;
        let d = match edge {
            Edge::TopRight => (self.size - 1 + half) - (x + y),
            Edge::TopLeft => half - (y - x),
            Edge::BottomLeft => (x + y) - (half - 1),
            Edge::BottomRight => half - (x - y),
        };
        d.max(0) as u32
    }

    pub fn locations_in_range(&self, center: GridLocation, range: f64) -> Vec<GridLocation> {
        let reach = range.ceil() as i32;
        let mut out = Vec::new();
        for y in (center.y - reach)..=(center.y + reach) {
            for x in (center.x - reach)..=(center.x + reach) {
                let loc = GridLocation::new(x, y);
                if self.in_bounds(loc) && center.distance(loc) <= range {
                    out.push(loc);
                }
            }
        }
        out
    }
}
