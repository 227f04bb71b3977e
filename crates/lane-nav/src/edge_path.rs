use core::cmp::Ordering;
use std::collections::BinaryHeap;

use lane_core::GridLocation;

use crate::{Arena, Edge};

#[derive(Debug)]
struct OpenNode {
    f: u32,
    g: u32,
    loc: GridLocation,
    tie: u64,
}

impl OpenNode {
    fn key(&self) -> (u32, u32, GridLocation, u64) {
        (self.f, self.g, self.loc, self.tie)
    }
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for OpenNode {}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering to make BinaryHeap behave like a min-heap.
        other.key().cmp(&self.key())
    }
}

/// A* from a spawn tile to any tile of the opposite edge.
///
/// Shortest in 4-neighbour steps, with a fixed neighbour order so equal inputs always produce the
/// same path.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgePathfinder {
    arena: Arena,
}

impl EdgePathfinder {
    pub fn new(arena: Arena) -> Self {
        Self { arena }
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// The edge a unit spawned at `start` walks toward.
    ///
    /// Tiles that are not on an edge target the far edge of their own lane half.
    pub fn target_edge(&self, start: GridLocation) -> Option<Edge> {
        if let Some(edge) = self.arena.edge_of(start) {
            return Some(edge.opposite());
        }
        if !self.arena.in_bounds(start) {
            return None;
        }
        let left = start.x < self.arena.half();
        let bottom = start.y < self.arena.half();
        Some(match (bottom, left) {
            (true, true) => Edge::TopRight,
            (true, false) => Edge::TopLeft,
            (false, true) => Edge::BottomRight,
            (false, false) => Edge::BottomLeft,
        })
    }

    fn idx(&self, loc: GridLocation) -> usize {
        (loc.y * self.arena.size() + loc.x) as usize
    }

    fn neighbors(loc: GridLocation) -> [GridLocation; 4] {
        // Fixed order for determinism: up, right, down, left.
        [
            GridLocation::new(loc.x, loc.y + 1),
            GridLocation::new(loc.x + 1, loc.y),
            GridLocation::new(loc.x, loc.y - 1),
            GridLocation::new(loc.x - 1, loc.y),
        ]
    }

    fn reconstruct_path(
        &self,
        came_from: &[Option<GridLocation>],
        mut current: GridLocation,
    ) -> Vec<GridLocation> {
        let mut out = vec![current];
        while let Some(prev) = came_from[self.idx(current)] {
            current = prev;
            out.push(current);
        }
        out.reverse();
        out
    }

    /// Path from `start` (inclusive) to the first reached tile of the target edge.
    ///
    /// Returns `None` when `start` is outside the arena or blocked, or when every route to the
    /// target edge is walled off.
    pub fn find_path_to_edge<B>(&self, start: GridLocation, blocked: B) -> Option<Vec<GridLocation>>
    where
        B: Fn(GridLocation) -> bool,
    {
        if !self.arena.in_bounds(start) || blocked(start) {
            return None;
        }
        let target = self.target_edge(start)?;

        let grid_len = (self.arena.size() * self.arena.size()) as usize;
        let mut g_score = vec![u32::MAX; grid_len];
        let mut came_from: Vec<Option<GridLocation>> = vec![None; grid_len];
        let mut open = BinaryHeap::<OpenNode>::new();
        let mut tie: u64 = 0;

        g_score[self.idx(start)] = 0;
        open.push(OpenNode {
            f: self.arena.steps_to_edge(start, target),
            g: 0,
            loc: start,
            tie,
        });
        tie += 1;

        while let Some(node) = open.pop() {
            if self.arena.is_on_edge(node.loc, target) {
                return Some(self.reconstruct_path(&came_from, node.loc));
            }

            if node.g != g_score[self.idx(node.loc)] {
                // Stale heap entry.
                continue;
            }

            for n in Self::neighbors(node.loc) {
                if !self.arena.in_bounds(n) || blocked(n) {
                    continue;
                }
                let n_idx = self.idx(n);
                let tentative_g = node.g.saturating_add(1);
                if tentative_g >= g_score[n_idx] {
                    continue;
                }

                came_from[n_idx] = Some(node.loc);
                g_score[n_idx] = tentative_g;
                open.push(OpenNode {
                    f: tentative_g.saturating_add(self.arena.steps_to_edge(n, target)),
                    g: tentative_g,
                    loc: n,
                    tie,
                });
                tie += 1;
            }
        }

        None
    }
}
