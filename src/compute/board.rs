//! Board model - sparse live-cell set and the B3/S23 generation scan.

use std::collections::HashSet;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Size of one grid cell in pixels.
pub const PIXEL_SIZE: u32 = 10;

/// Moore neighborhood offsets in scan order.
const MOORE_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// A coordinate on the unbounded grid. Membership in a generation means alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Cell displaced by `(dx, dy)`, or None if it leaves the `i32` plane.
    #[inline]
    pub fn offset(self, dx: i32, dy: i32) -> Option<Self> {
        Some(Self::new(self.x.checked_add(dx)?, self.y.checked_add(dy)?))
    }

    /// The (up to) eight Moore neighbors of this cell.
    pub fn neighbors(self) -> impl Iterator<Item = Cell> {
        MOORE_OFFSETS
            .into_iter()
            .filter_map(move |(dx, dy)| self.offset(dx, dy))
    }
}

/// Conway's rule: survival on 2 or 3 neighbors, birth on exactly 3.
#[inline]
pub const fn lives_on(alive: bool, neighbors: u8) -> bool {
    matches!((alive, neighbors), (true, 2 | 3) | (false, 3))
}

/// Board size in grid units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardDimensions {
    pub width: i32,
    pub height: i32,
}

impl BoardDimensions {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Convert a pixel-space size to grid units, rounding half up.
    pub fn from_pixels(width_px: u32, height_px: u32) -> Self {
        let to_cells = |px: u32| {
            let cells = (u64::from(px) + u64::from(PIXEL_SIZE / 2)) / u64::from(PIXEL_SIZE);
            cells as i32
        };
        Self::new(to_cells(width_px), to_cells(height_px))
    }

    /// Pattern anchor: half-dimensions rounded half up.
    #[inline]
    pub fn center(&self) -> Cell {
        Cell::new((self.width + 1) / 2, (self.height + 1) / 2)
    }

    /// Number of coordinates available to random seeding, `[1, w] x [1, h]`.
    #[inline]
    pub fn capacity(&self) -> u64 {
        self.width.max(0) as u64 * self.height.max(0) as u64
    }
}

/// One generation of live cells.
///
/// Cells are kept in the order they were added, which is the order reported
/// to callers. A coordinate index backs membership tests.
#[derive(Debug, Clone, Default)]
pub struct Board {
    dims: BoardDimensions,
    cells: Vec<Cell>,
    index: HashSet<Cell>,
}

impl Board {
    /// Create an empty board.
    pub fn new(dims: BoardDimensions) -> Self {
        Self {
            dims,
            cells: Vec::new(),
            index: HashSet::new(),
        }
    }

    /// Create a board holding `cells` in the given order.
    pub fn from_cells(dims: BoardDimensions, cells: Vec<Cell>) -> Self {
        let index = cells.iter().copied().collect();
        Self { dims, cells, index }
    }

    #[inline]
    pub fn dimensions(&self) -> BoardDimensions {
        self.dims
    }

    /// Live cells in report order. May contain duplicates after a pattern merge.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Append a live cell.
    pub fn push(&mut self, cell: Cell) {
        self.index.insert(cell);
        self.cells.push(cell);
    }

    /// Kill every cell and adopt new dimensions.
    pub fn reset(&mut self, dims: BoardDimensions) {
        self.dims = dims;
        self.cells.clear();
        self.index.clear();
    }

    /// Replace the whole generation, keeping dimensions.
    pub fn replace(&mut self, cells: Vec<Cell>) {
        self.index = cells.iter().copied().collect();
        self.cells = cells;
    }

    /// Check if a live cell sits at exactly `(x, y)`.
    #[inline]
    pub fn exists(&self, x: i32, y: i32) -> bool {
        self.index.contains(&Cell::new(x, y))
    }

    /// Count live Moore neighbors. No wraparound.
    pub fn neighbor_count(&self, cell: Cell) -> u8 {
        cell.neighbors()
            .filter(|n| self.index.contains(n))
            .count() as u8
    }

    /// Compute the next generation over `[0, width] x [0, height]`.
    ///
    /// Cells are emitted x-major, then y, matching a serial scan; rayon
    /// splits the columns but `collect` keeps their order.
    pub fn next_generation(&self) -> Vec<Cell> {
        let BoardDimensions { width, height } = self.dims;

        (0..=width)
            .into_par_iter()
            .flat_map_iter(|x| {
                (0..=height).filter_map(move |y| {
                    let cell = Cell::new(x, y);
                    let alive = self.index.contains(&cell);
                    lives_on(alive, self.neighbor_count(cell)).then_some(cell)
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(cells: &[(i32, i32)]) -> Board {
        let mut board = Board::new(BoardDimensions::new(10, 10));
        for &(x, y) in cells {
            board.push(Cell::new(x, y));
        }
        board
    }

    #[test]
    fn test_rule_table() {
        assert!(!lives_on(true, 0));
        assert!(!lives_on(true, 1));
        assert!(lives_on(true, 2));
        assert!(lives_on(true, 3));
        assert!(!lives_on(true, 4));
        assert!(!lives_on(true, 8));
        assert!(lives_on(false, 3));
        assert!(!lives_on(false, 2));
        assert!(!lives_on(false, 4));
    }

    #[test]
    fn test_dimensions_from_pixels() {
        let dims = BoardDimensions::from_pixels(104, 95);
        assert_eq!(dims, BoardDimensions::new(10, 10));

        let dims = BoardDimensions::from_pixels(1015, 4);
        assert_eq!(dims, BoardDimensions::new(102, 0));
    }

    #[test]
    fn test_center_rounds_half_up() {
        assert_eq!(BoardDimensions::new(10, 10).center(), Cell::new(5, 5));
        assert_eq!(BoardDimensions::new(5, 7).center(), Cell::new(3, 4));
    }

    #[test]
    fn test_exists() {
        let board = board_with(&[(3, 3)]);
        assert!(board.exists(3, 3));
        assert!(!board.exists(3, 4));
        assert!(!board.exists(-3, -3));
    }

    #[test]
    fn test_neighbor_count() {
        let board = board_with(&[(1, 2), (2, 3), (3, 1), (3, 2), (3, 3)]);
        assert_eq!(board.neighbor_count(Cell::new(2, 1)), 3);
        assert_eq!(board.neighbor_count(Cell::new(2, 2)), 5);
        // Self is not counted
        assert_eq!(board.neighbor_count(Cell::new(3, 2)), 3);
    }

    #[test]
    fn test_neighbor_count_no_wraparound() {
        let board = board_with(&[(0, 0), (10, 10)]);
        assert_eq!(board.neighbor_count(Cell::new(0, 10)), 0);
        assert_eq!(board.neighbor_count(Cell::new(1, 1)), 1);
    }

    #[test]
    fn test_underpopulation() {
        let board = board_with(&[(3, 3), (4, 3)]);
        assert!(board.next_generation().is_empty());
    }

    #[test]
    fn test_overpopulation_and_birth() {
        let board = board_with(&[(1, 2), (2, 3), (3, 1), (3, 2), (3, 3)]);
        assert!(!board.exists(2, 1));

        let next = Board::from_cells(board.dimensions(), board.next_generation());
        assert_eq!(next.len(), 5);
        assert!(!next.exists(2, 2));
        for (x, y) in [(2, 1), (2, 3), (3, 2), (3, 3), (4, 2)] {
            assert!(next.exists(x, y), "expected ({x}, {y}) alive");
        }
    }

    #[test]
    fn test_scan_order_is_x_major() {
        let board = board_with(&[(1, 2), (2, 3), (3, 1), (3, 2), (3, 3)]);
        assert_eq!(
            board.next_generation(),
            vec![
                Cell::new(2, 1),
                Cell::new(2, 3),
                Cell::new(3, 2),
                Cell::new(3, 3),
                Cell::new(4, 2),
            ]
        );
    }

    #[test]
    fn test_scan_includes_far_edge() {
        // Blinker on the inclusive edge column x = width
        let board = board_with(&[(10, 4), (10, 5), (10, 6)]);
        assert_eq!(
            board.next_generation(),
            vec![Cell::new(9, 5), Cell::new(10, 5)]
        );
    }

    #[test]
    fn test_cells_outside_scan_die() {
        let board = board_with(&[(-1, 0), (-1, 1), (-2, 0), (-2, 1)]);
        assert!(board.next_generation().is_empty());
    }

    #[test]
    fn test_neighbors_at_plane_edge() {
        assert_eq!(Cell::new(i32::MAX, 0).neighbors().count(), 5);
        assert_eq!(Cell::new(0, 0).neighbors().count(), 8);
    }
}
