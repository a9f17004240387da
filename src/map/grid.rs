//! Walkability grid over the arena, with A* search and line-of-sight queries.
//!
//! "No path" and "no sight" are ordinary answers here: every query returns an
//! empty `Vec`, `false` or `None` instead of an error.

use glam::{IVec2, Vec2};
use pathfinding::grid::Grid;
use tracing::trace;

/// Tuning knobs for [`NavGrid::find_path`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathOptions {
    /// Adds the four diagonal neighbours, at a cost of √2.
    pub allow_diagonal: bool,
    /// Scales the Euclidean heuristic; 1.0 keeps it admissible.
    pub heuristic_weight: f32,
    /// Upper bound on open-list expansions before the search gives up.
    pub max_iterations: usize,
}

impl Default for PathOptions {
    fn default() -> Self {
        Self {
            allow_diagonal: true,
            heuristic_weight: 1.0,
            max_iterations: 1000,
        }
    }
}

/// A single cell as reported by [`NavGrid::debug_cells`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugCell {
    /// World position of the cell's top-left corner
    pub origin: Vec2,
    pub walkable: bool,
}

const ORTHOGONAL: [IVec2; 4] = [IVec2::new(0, -1), IVec2::new(1, 0), IVec2::new(0, 1), IVec2::new(-1, 0)];
const DIAGONAL: [IVec2; 4] = [IVec2::new(-1, -1), IVec2::new(1, -1), IVec2::new(1, 1), IVec2::new(-1, 1)];

/// Search bookkeeping for one cell.
#[derive(Debug, Clone, Copy, Default)]
struct SearchNode {
    g: f32,
    h: f32,
    f: f32,
    parent: Option<usize>,
    open: bool,
    closed: bool,
}

/// A uniform grid of square cells laid over the arena. Every cell starts walkable.
#[derive(Debug, Clone)]
pub struct NavGrid {
    cells: Grid,
    cell_size: f32,
}

impl NavGrid {
    /// Covers a `width` x `height` arena with cells of `cell_size`. Partial cells at the edges are dropped.
    pub fn new(width: f32, height: f32, cell_size: f32) -> Self {
        let columns = (width / cell_size).floor().max(0.0) as usize;
        let rows = (height / cell_size).floor().max(0.0) as usize;
        let mut cells = Grid::new(columns, rows);
        cells.fill();
        Self { cells, cell_size }
    }

    pub fn width(&self) -> usize {
        self.cells.width
    }

    pub fn height(&self) -> usize {
        self.cells.height
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn world_to_grid(&self, position: Vec2) -> IVec2 {
        (position / self.cell_size).floor().as_ivec2()
    }

    /// Returns the world position of the center of `cell`.
    pub fn grid_to_world(&self, cell: IVec2) -> Vec2 {
        cell.as_vec2() * self.cell_size + Vec2::splat(self.cell_size / 2.0)
    }

    pub fn is_valid(&self, cell: IVec2) -> bool {
        cell.x >= 0 && cell.y >= 0 && (cell.x as usize) < self.cells.width && (cell.y as usize) < self.cells.height
    }

    fn cell_walkable(&self, cell: IVec2) -> bool {
        self.is_valid(cell) && self.cells.has_vertex((cell.x as usize, cell.y as usize))
    }

    /// Whether the cell containing `position` can be walked on. Off-grid positions never are.
    pub fn is_walkable(&self, position: Vec2) -> bool {
        self.cell_walkable(self.world_to_grid(position))
    }

    /// Marks the cell containing `position`. Writes outside the grid are ignored.
    pub fn set_walkable(&mut self, position: Vec2, walkable: bool) {
        let cell = self.world_to_grid(position);
        if !self.is_valid(cell) {
            return;
        }
        let vertex = (cell.x as usize, cell.y as usize);
        if walkable {
            self.cells.add_vertex(vertex);
        } else {
            self.cells.remove_vertex(vertex);
        }
    }

    pub fn set_obstacles(&mut self, obstacles: &[Vec2]) {
        for obstacle in obstacles {
            self.set_walkable(*obstacle, false);
        }
    }

    /// Makes every cell walkable again.
    pub fn clear_obstacles(&mut self) {
        self.cells.fill();
    }

    fn index(&self, cell: IVec2) -> usize {
        cell.y as usize * self.cells.width + cell.x as usize
    }

    fn cell_at(&self, index: usize) -> IVec2 {
        IVec2::new((index % self.cells.width) as i32, (index / self.cells.width) as i32)
    }

    /// Runs A* from the cell containing `start` to the cell containing `end`.
    ///
    /// The returned waypoints are cell centers in world space, beginning with
    /// the first step after the start cell and ending in the goal cell. When
    /// both positions share a cell the goal cell is the only waypoint. Returns
    /// an empty path when either end is off-grid or blocked, or when the
    /// search runs out of iterations.
    pub fn find_path(&self, start: Vec2, end: Vec2, options: PathOptions) -> Vec<Vec2> {
        let start_cell = self.world_to_grid(start);
        let end_cell = self.world_to_grid(end);

        if !self.cell_walkable(start_cell) || !self.cell_walkable(end_cell) {
            return Vec::new();
        }
        if start_cell == end_cell {
            return vec![self.grid_to_world(end_cell)];
        }

        let heuristic = |cell: IVec2| (cell - end_cell).as_vec2().length() * options.heuristic_weight;

        let mut nodes = vec![SearchNode::default(); self.cells.width * self.cells.height];
        // Open list is scanned linearly; the first node with strictly lowest f wins ties.
        let mut open: Vec<usize> = Vec::new();

        let start_index = self.index(start_cell);
        let h = heuristic(start_cell);
        nodes[start_index] = SearchNode {
            g: 0.0,
            h,
            f: h,
            parent: None,
            open: true,
            closed: false,
        };
        open.push(start_index);

        let mut iterations = 0;
        while !open.is_empty() && iterations < options.max_iterations {
            iterations += 1;

            let mut best = 0;
            for (slot, &index) in open.iter().enumerate().skip(1) {
                if nodes[index].f < nodes[open[best]].f {
                    best = slot;
                }
            }
            let current = open.remove(best);
            nodes[current].open = false;
            nodes[current].closed = true;

            let current_cell = self.cell_at(current);
            if current_cell == end_cell {
                return self.reconstruct(&nodes, current);
            }

            let diagonals: &[IVec2] = if options.allow_diagonal { &DIAGONAL } else { &[] };
            for offset in ORTHOGONAL.iter().chain(diagonals) {
                let neighbour_cell = current_cell + *offset;
                if !self.cell_walkable(neighbour_cell) {
                    continue;
                }
                let neighbour = self.index(neighbour_cell);
                if nodes[neighbour].closed {
                    continue;
                }

                let step = if offset.x != 0 && offset.y != 0 {
                    std::f32::consts::SQRT_2
                } else {
                    1.0
                };
                let tentative = nodes[current].g + step;

                let node = &mut nodes[neighbour];
                if !node.open {
                    node.g = tentative;
                    node.h = heuristic(neighbour_cell);
                    node.f = node.g + node.h;
                    node.parent = Some(current);
                    node.open = true;
                    open.push(neighbour);
                } else if tentative < node.g {
                    node.g = tentative;
                    node.f = node.g + node.h;
                    node.parent = Some(current);
                }
            }
        }

        trace!(
            start = ?start_cell,
            end = ?end_cell,
            iterations,
            "No path found"
        );
        Vec::new()
    }

    fn reconstruct(&self, nodes: &[SearchNode], goal: usize) -> Vec<Vec2> {
        let mut path = Vec::new();
        let mut current = goal;
        // The start node is the only one without a parent and is left out.
        while let Some(parent) = nodes[current].parent {
            path.push(self.grid_to_world(self.cell_at(current)));
            current = parent;
        }
        path.reverse();
        path
    }

    /// Walks a Bresenham line between the cells of `start` and `end`.
    ///
    /// Fails as soon as a traversed cell is off-grid or blocked, including the end cell itself.
    pub fn has_line_of_sight(&self, start: Vec2, end: Vec2) -> bool {
        let from = self.world_to_grid(start);
        let to = self.world_to_grid(end);
        // Endpoints first, so the deltas below stay within the grid.
        if !self.cell_walkable(from) || !self.cell_walkable(to) {
            return false;
        }

        let dx = (to.x - from.x).abs();
        let dy = (to.y - from.y).abs();
        let sx = if from.x < to.x { 1 } else { -1 };
        let sy = if from.y < to.y { 1 } else { -1 };
        let mut err = dx - dy;
        let mut cell = from;

        loop {
            if !self.cell_walkable(cell) {
                return false;
            }
            if cell == to {
                return true;
            }

            let e2 = 2 * err;
            if e2 > -dy {
                err -= dy;
                cell.x += sx;
            }
            if e2 < dx {
                err += dx;
                cell.y += sy;
            }
        }
    }

    /// Finds a walkable spot near `target`.
    ///
    /// A walkable target is returned unchanged. Otherwise squares of growing
    /// radius (1 to 10 cells) are scanned column by column, and the center of
    /// the first walkable cell found is returned.
    pub fn closest_walkable_position(&self, target: Vec2) -> Option<Vec2> {
        let center = self.world_to_grid(target);
        if self.cell_walkable(center) {
            return Some(target);
        }

        for radius in 1..=10 {
            for x in (center.x - radius)..=(center.x + radius) {
                for y in (center.y - radius)..=(center.y + radius) {
                    let cell = IVec2::new(x, y);
                    if self.cell_walkable(cell) {
                        return Some(self.grid_to_world(cell));
                    }
                }
            }
        }

        None
    }

    /// Every cell in row-major order, for debug overlays.
    pub fn debug_cells(&self) -> Vec<DebugCell> {
        let mut cells = Vec::with_capacity(self.cells.width * self.cells.height);
        for y in 0..self.cells.height {
            for x in 0..self.cells.width {
                cells.push(DebugCell {
                    origin: Vec2::new(x as f32, y as f32) * self.cell_size,
                    walkable: self.cells.has_vertex((x, y)),
                });
            }
        }
        cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions_drop_partial_cells() {
        let grid = NavGrid::new(1200.0, 800.0, 32.0);
        assert_eq!(grid.width(), 37);
        assert_eq!(grid.height(), 25);
    }

    #[test]
    fn test_out_of_grid_writes_are_ignored() {
        let mut grid = NavGrid::new(320.0, 320.0, 32.0);
        grid.set_walkable(Vec2::new(-50.0, 10.0), false);
        grid.set_walkable(Vec2::new(5000.0, 10.0), false);
        assert!(grid.debug_cells().iter().all(|cell| cell.walkable));
    }

    #[test]
    fn test_same_cell_path_is_single_waypoint() {
        let grid = NavGrid::new(320.0, 320.0, 32.0);
        let path = grid.find_path(Vec2::new(40.0, 40.0), Vec2::new(50.0, 60.0), PathOptions::default());
        assert_eq!(path, vec![Vec2::new(48.0, 48.0)]);
    }
}
