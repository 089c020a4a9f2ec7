//! Simulation state - current generation, pending pattern and seeding.
//!
//! This is the single-threaded core the runtime engine drives. It owns no
//! timers or channels; every operation runs to completion on the caller.

use rand::prelude::*;

use super::{Board, BoardDimensions, Cell, PatternKind};
use crate::schema::{ConfigError, Configuration};

/// Generation state of one Life session.
pub struct Simulation {
    board: Board,
    /// Cells merged into the generation by the next step.
    pending: Vec<Cell>,
    center: Cell,
    rng: StdRng,
}

impl Simulation {
    /// Create an empty simulation. `seed` fixes random placement.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            board: Board::default(),
            pending: Vec::new(),
            center: Cell::new(0, 0),
            rng,
        }
    }

    /// Create a simulation around an existing board.
    pub fn from_board(board: Board, seed: Option<u64>) -> Self {
        let center = board.dimensions().center();
        Self {
            board,
            center,
            ..Self::new(seed)
        }
    }

    /// Start over with a fresh random generation.
    ///
    /// Recomputes dimensions and center, then places
    /// `number_of_live_cell` cells uniformly over `[1, width] x [1, height]`,
    /// redrawing on collisions. Validation guarantees enough free
    /// coordinates exist, so the redraw loop terminates.
    pub fn reset(&mut self, config: &Configuration) -> Result<(), ConfigError> {
        config.validate()?;

        let dims = config.dimensions();
        self.board.reset(dims);
        self.center = dims.center();

        for _ in 0..config.number_of_live_cell {
            loop {
                let x = self.rng.gen_range(1..=dims.width);
                let y = self.rng.gen_range(1..=dims.height);
                if !self.board.exists(x, y) {
                    self.board.push(Cell::new(x, y));
                    break;
                }
            }
        }

        Ok(())
    }

    /// Replace the pending queue with a catalog pattern at the center.
    pub fn queue_pattern(&mut self, kind: PatternKind) {
        self.pending = kind.cells_at(self.center);
    }

    /// Replace the pending queue with explicit cells.
    pub fn queue_cells(&mut self, cells: Vec<Cell>) {
        self.pending = cells;
    }

    /// Advance one generation and return it.
    ///
    /// The pending queue is appended after the scanned cells without
    /// deduplication and then cleared.
    pub fn step(&mut self) -> &[Cell] {
        let mut next = self.board.next_generation();
        next.append(&mut self.pending);
        self.board.replace(next);
        self.board.cells()
    }

    #[inline]
    pub fn generation(&self) -> &[Cell] {
        self.board.cells()
    }

    #[inline]
    pub fn pending(&self) -> &[Cell] {
        &self.pending
    }

    #[inline]
    pub fn dimensions(&self) -> BoardDimensions {
        self.board.dimensions()
    }

    #[inline]
    pub fn center(&self) -> Cell {
        self.center
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn config(width: u32, height: u32, live: u32) -> Configuration {
        Configuration {
            board_width: width,
            board_height: height,
            number_of_live_cell: live,
        }
    }

    #[test]
    fn test_reset_places_distinct_cells_in_range() {
        let mut sim = Simulation::new(Some(42));
        sim.reset(&config(200, 150, 120)).unwrap();

        let dims = sim.dimensions();
        assert_eq!(dims, BoardDimensions::new(20, 15));
        assert_eq!(sim.center(), Cell::new(10, 8));

        let cells = sim.generation();
        assert_eq!(cells.len(), 120);
        let distinct: HashSet<_> = cells.iter().collect();
        assert_eq!(distinct.len(), 120);
        assert!(
            cells
                .iter()
                .all(|c| (1..=20).contains(&c.x) && (1..=15).contains(&c.y))
        );
    }

    #[test]
    fn test_reset_deterministic_with_seed() {
        let mut a = Simulation::new(Some(7));
        let mut b = Simulation::new(Some(7));
        a.reset(&config(300, 300, 200)).unwrap();
        b.reset(&config(300, 300, 200)).unwrap();
        assert_eq!(a.generation(), b.generation());
    }

    #[test]
    fn test_reset_can_fill_board() {
        let mut sim = Simulation::new(Some(1));
        sim.reset(&config(50, 50, 25)).unwrap();
        assert_eq!(sim.generation().len(), 25);
    }

    #[test]
    fn test_reset_rejects_overfull_board() {
        let mut sim = Simulation::new(Some(1));
        sim.reset(&config(100, 100, 3)).unwrap();
        let before = sim.generation().to_vec();

        let err = sim.reset(&config(50, 50, 26)).unwrap_err();
        assert!(matches!(err, ConfigError::TooManyLiveCells { .. }));
        assert_eq!(sim.generation(), before.as_slice());
    }

    #[test]
    fn test_reset_clears_previous_generation() {
        let mut sim = Simulation::new(Some(3));
        sim.reset(&config(100, 100, 40)).unwrap();
        sim.reset(&config(100, 100, 0)).unwrap();
        assert!(sim.generation().is_empty());
    }

    #[test]
    fn test_glider_appended_after_scan() {
        let dims = BoardDimensions::new(10, 10);
        let blinker = vec![Cell::new(1, 1), Cell::new(2, 1), Cell::new(3, 1)];
        let mut sim = Simulation::from_board(Board::from_cells(dims, blinker), None);

        sim.queue_pattern(PatternKind::Glider);
        assert_eq!(sim.pending().len(), 5);

        let next = sim.step().to_vec();
        let mut expected = vec![Cell::new(2, 0), Cell::new(2, 1), Cell::new(2, 2)];
        expected.extend(PatternKind::Glider.cells_at(Cell::new(5, 5)));
        assert_eq!(next, expected);
        assert!(sim.pending().is_empty());
    }

    #[test]
    fn test_pending_drained_once() {
        let mut sim = Simulation::new(Some(5));
        sim.reset(&config(100, 100, 0)).unwrap();
        sim.queue_cells(vec![Cell::new(50, 50)]);

        assert_eq!(sim.step(), &[Cell::new(50, 50)]);
        // Lone cell dies on the next step; nothing is re-merged
        assert!(sim.step().is_empty());
    }

    #[test]
    fn test_pattern_duplicates_kept() {
        let dims = BoardDimensions::new(10, 10);
        let block = vec![
            Cell::new(1, 1),
            Cell::new(1, 2),
            Cell::new(2, 1),
            Cell::new(2, 2),
        ];
        let mut sim = Simulation::from_board(Board::from_cells(dims, block), None);
        sim.queue_cells(vec![Cell::new(1, 1)]);

        let next = sim.step();
        assert_eq!(next.len(), 5);
        assert_eq!(next.iter().filter(|c| **c == Cell::new(1, 1)).count(), 2);
    }

    #[test]
    fn test_queue_replaces_pending() {
        let mut sim = Simulation::new(Some(9));
        sim.reset(&config(100, 100, 0)).unwrap();
        sim.queue_pattern(PatternKind::HeavyWeightSpaceship);
        sim.queue_pattern(PatternKind::Beacon);
        assert_eq!(sim.pending(), PatternKind::Beacon.cells_at(sim.center()));
    }
}
