use std::collections::BTreeSet;

use crate::components::{CandyKind, MIN_RUN};
use crate::grid::{Cell, Grid, Tile};
use crate::rng::RandomSource;

/// Union of every cell that belongs to a run of `MIN_RUN` or more.
pub type MatchSet = BTreeSet<Cell>;

/// The match-3 board: candy grid plus the click-selection cursor.
#[derive(Debug, Clone)]
pub struct Board {
    pub rows: usize,
    pub cols: usize,
    pub grid: Grid,
    selected: Option<Cell>,
}

impl Board {
    /// Create a randomly seeded board with no matches on it.
    /// Matched cells are re-rolled until a full scan finds nothing.
    pub fn new(rows: usize, cols: usize, rng: &mut impl RandomSource) -> Self {
        assert!(rows > 0 && cols > 0, "board must be at least 1x1");

        let mut board = Board {
            rows,
            cols,
            grid: Grid::new(rows, cols),
            selected: None,
        };
        for row in 0..rows {
            for col in 0..cols {
                board.grid.set(Cell::new(row, col), Some(Tile::random(rng)));
            }
        }

        let mut rerolls = 0;
        loop {
            let matches = board.find_matches();
            if matches.is_empty() {
                break;
            }
            rerolls += matches.len();
            for cell in matches {
                board.grid.set(cell, Some(Tile::random(rng)));
            }
        }
        log::debug!("seeded {}x{} board ({} rerolls)", rows, cols, rerolls);

        board
    }

    /// Build a board from an explicit row-major layout. No sanitization.
    pub fn from_kinds(rows: usize, cols: usize, kinds: &[CandyKind]) -> Self {
        assert!(rows > 0 && cols > 0, "board must be at least 1x1");
        assert_eq!(kinds.len(), rows * cols, "layout size does not match {}x{}", rows, cols);

        let mut grid = Grid::new(rows, cols);
        for (i, kind) in kinds.iter().enumerate() {
            grid.set(Cell::new(i / cols, i % cols), Some(Tile::new(*kind)));
        }
        Board {
            rows,
            cols,
            grid,
            selected: None,
        }
    }

    pub fn get(&self, cell: Cell) -> Option<&Tile> {
        self.grid.get(cell)
    }

    pub fn selected(&self) -> Option<Cell> {
        self.selected
    }

    /// True when neither tile is empty and both share a kind.
    fn same_kind_at(&self, a: Cell, b: Cell) -> bool {
        match (self.grid.get(a), self.grid.get(b)) {
            (Some(x), Some(y)) => x.same_kind(y),
            _ => false,
        }
    }

    /// Collect every cell in a horizontal or vertical run of `MIN_RUN`+.
    ///
    /// Each line is scanned once: a run closes at index `i` when the tile
    /// there differs from the one before it (or the line ends), and is kept
    /// only if it reached `MIN_RUN`. Empty cells never extend a run.
    pub fn find_matches(&self) -> MatchSet {
        let mut matched = MatchSet::new();

        for row in 0..self.rows {
            let mut run_start = 0;
            for col in 1..=self.cols {
                let same = col < self.cols
                    && self.same_kind_at(Cell::new(row, col), Cell::new(row, col - 1));
                if !same {
                    if col - run_start >= MIN_RUN {
                        matched.extend((run_start..col).map(|c| Cell::new(row, c)));
                    }
                    run_start = col;
                }
            }
        }

        for col in 0..self.cols {
            let mut run_start = 0;
            for row in 1..=self.rows {
                let same = row < self.rows
                    && self.same_kind_at(Cell::new(row, col), Cell::new(row - 1, col));
                if !same {
                    if row - run_start >= MIN_RUN {
                        matched.extend((run_start..row).map(|r| Cell::new(r, col)));
                    }
                    run_start = row;
                }
            }
        }

        matched
    }

    /// Exchange two tiles. No adjacency or match check; calling it twice
    /// restores the original grid.
    pub fn swap(&mut self, a: Cell, b: Cell) {
        self.grid.swap(a, b);
    }

    /// Empty every cell in `matched`. Scoring and refill happen elsewhere.
    pub fn crush(&mut self, matched: &MatchSet) {
        for &cell in matched {
            self.grid.set(cell, None);
        }
    }

    /// Compact each column downward, keeping tile order, then refill the
    /// gap at the top with random tiles. Returns the number of new tiles.
    pub fn apply_gravity(&mut self, rng: &mut impl RandomSource) -> usize {
        let mut spawned = 0;

        for col in 0..self.cols {
            // Walk bottom-up, moving each tile to the lowest free slot.
            let mut write_row = self.rows;
            for row in (0..self.rows).rev() {
                if let Some(tile) = self.grid.take(Cell::new(row, col)) {
                    write_row -= 1;
                    self.grid.set(Cell::new(write_row, col), Some(tile));
                }
            }

            for row in 0..write_row {
                self.grid.set(Cell::new(row, col), Some(Tile::random(rng)));
            }
            spawned += write_row;
        }

        spawned
    }

    /// Click-to-select. Returns a swap candidate when the click lands on a
    /// neighbour of the current selection; otherwise updates the selection.
    pub fn select(&mut self, cell: Cell) -> Option<(Cell, Cell)> {
        assert!(
            self.grid.contains(cell),
            "cell ({}, {}) outside {}x{} board",
            cell.row,
            cell.col,
            self.rows,
            self.cols
        );

        match self.selected {
            Some(current) if current == cell => {
                self.selected = None;
                None
            }
            None => {
                self.selected = Some(cell);
                None
            }
            Some(current) if current.is_adjacent(cell) => {
                self.selected = None;
                Some((current, cell))
            }
            Some(_) => {
                self.selected = Some(cell);
                None
            }
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::CandyKind::*;
    use crate::rng::{Rng, ScriptedRng};

    /// 8x8 layout with no runs: rows alternate between two shifted 4-kind
    /// cycles. Cherry never appears.
    fn quiet_layout() -> Vec<CandyKind> {
        let even = [Lemon, Mint, Blueberry, Grape];
        let odd = [Grape, Orange, Lemon, Mint];
        let mut kinds = Vec::with_capacity(64);
        for row in 0..8 {
            let pattern = if row % 2 == 0 { even } else { odd };
            for col in 0..8 {
                kinds.push(pattern[(col + row / 2) % 4]);
            }
        }
        kinds
    }

    fn cells(list: &[(usize, usize)]) -> MatchSet {
        list.iter().map(|&(r, c)| Cell::new(r, c)).collect()
    }

    #[test]
    fn quiet_layout_has_no_matches() {
        let board = Board::from_kinds(8, 8, &quiet_layout());
        assert!(board.find_matches().is_empty());
    }

    #[test]
    fn new_board_has_no_matches() {
        for seed in 1..50 {
            let mut rng = Rng::new(seed);
            let board = Board::new(8, 8, &mut rng);
            assert!(board.find_matches().is_empty(), "seed {} left a match", seed);
            assert_eq!(board.grid.count_empty(), 0);
        }
    }

    #[test]
    fn finds_single_horizontal_run() {
        let mut kinds = quiet_layout();
        kinds[0] = Cherry;
        kinds[1] = Cherry;
        kinds[2] = Cherry;
        let board = Board::from_kinds(8, 8, &kinds);
        assert_eq!(board.find_matches(), cells(&[(0, 0), (0, 1), (0, 2)]));
    }

    #[test]
    fn finds_vertical_run_at_bottom_edge() {
        let mut kinds = quiet_layout();
        for row in 4..8 {
            kinds[row * 8 + 7] = Cherry;
        }
        let board = Board::from_kinds(8, 8, &kinds);
        assert_eq!(board.find_matches(), cells(&[(4, 7), (5, 7), (6, 7), (7, 7)]));
    }

    #[test]
    fn crossing_runs_share_a_cell_once() {
        let mut kinds = quiet_layout();
        // Horizontal run on row 2, cols 1..=3; vertical run on col 2, rows 1..=3.
        for col in 1..=3 {
            kinds[2 * 8 + col] = Orange;
        }
        kinds[8 + 2] = Orange;
        kinds[3 * 8 + 2] = Orange;
        let board = Board::from_kinds(8, 8, &kinds);
        let matches = board.find_matches();
        assert_eq!(matches.len(), 5);
        assert!(matches.contains(&Cell::new(2, 2)));
    }

    #[test]
    fn two_in_a_row_is_not_a_match() {
        let mut kinds = quiet_layout();
        kinds[8 * 5 + 3] = Cherry;
        kinds[8 * 5 + 4] = Cherry;
        let board = Board::from_kinds(8, 8, &kinds);
        assert!(board.find_matches().is_empty());
    }

    #[test]
    fn empty_cells_break_runs() {
        let mut board = Board::from_kinds(1, 5, &[Mint, Mint, Mint, Mint, Mint]);
        board.grid.set(Cell::new(0, 2), None);
        assert!(board.find_matches().is_empty());
    }

    #[test]
    fn swap_is_its_own_inverse() {
        let mut rng = Rng::new(99);
        let mut board = Board::new(8, 8, &mut rng);
        let before = board.grid.clone();
        let pairs = [
            (Cell::new(0, 0), Cell::new(0, 1)),
            (Cell::new(3, 4), Cell::new(4, 4)),
            (Cell::new(7, 7), Cell::new(0, 0)),
            (Cell::new(2, 2), Cell::new(2, 2)),
        ];
        for (a, b) in pairs {
            board.swap(a, b);
            board.swap(a, b);
            assert_eq!(board.grid, before);
        }
    }

    #[test]
    fn crush_empties_only_matched_cells() {
        let mut kinds = quiet_layout();
        kinds[0] = Cherry;
        kinds[1] = Cherry;
        kinds[2] = Cherry;
        let mut board = Board::from_kinds(8, 8, &kinds);
        let matches = board.find_matches();
        board.crush(&matches);
        assert_eq!(board.grid.count_empty(), 3);
        for cell in &matches {
            assert!(board.get(*cell).is_none());
        }
        assert!(board.get(Cell::new(0, 3)).is_some());
    }

    #[test]
    fn gravity_compacts_and_preserves_order() {
        // Single column, top to bottom: Cherry, Lemon, _, Mint, _
        let mut board = Board::from_kinds(5, 1, &[Cherry, Lemon, Grape, Mint, Grape]);
        board.grid.set(Cell::new(2, 0), None);
        board.grid.set(Cell::new(4, 0), None);

        let mut rng = ScriptedRng::new(&[5]);
        let spawned = board.apply_gravity(&mut rng);

        assert_eq!(spawned, 2);
        let column: Vec<CandyKind> = (0..5).map(|r| board.get(Cell::new(r, 0)).unwrap().kind).collect();
        assert_eq!(column, vec![Orange, Orange, Cherry, Lemon, Mint]);
    }

    #[test]
    fn gravity_leaves_no_empty_cells() {
        let mut rng = Rng::new(5);
        for _ in 0..20 {
            let mut board = Board::new(8, 8, &mut rng);
            let hole: MatchSet = (0..8)
                .map(|i| Cell::new(rng.next_int(8) as usize, i))
                .collect();

            // Remember the surviving order per column.
            let mut expected: Vec<Vec<CandyKind>> = Vec::new();
            for col in 0..8 {
                expected.push(
                    (0..8)
                        .map(|row| Cell::new(row, col))
                        .filter(|c| !hole.contains(c))
                        .map(|c| board.get(c).unwrap().kind)
                        .collect(),
                );
            }

            board.crush(&hole);
            board.apply_gravity(&mut rng);
            assert_eq!(board.grid.count_empty(), 0);

            for (col, survivors) in expected.iter().enumerate() {
                let offset = 8 - survivors.len();
                for (i, kind) in survivors.iter().enumerate() {
                    assert_eq!(board.get(Cell::new(offset + i, col)).unwrap().kind, *kind);
                }
            }
        }
    }

    #[test]
    fn cascades_terminate() {
        let mut rng = Rng::new(2024);
        for _ in 0..50 {
            let mut board = Board::new(8, 8, &mut rng);
            // Force a starting match on the top row.
            for col in 0..3 {
                board.grid.set(Cell::new(0, col), Some(Tile::new(Cherry)));
            }
            let mut matches = board.find_matches();
            let mut rounds = 0;
            while !matches.is_empty() {
                board.crush(&matches);
                board.apply_gravity(&mut rng);
                matches = board.find_matches();
                rounds += 1;
                assert!(rounds < 1000, "cascade did not settle");
            }
        }
    }

    #[test]
    fn select_state_machine() {
        let mut board = Board::from_kinds(8, 8, &quiet_layout());
        let a = Cell::new(3, 3);

        assert_eq!(board.select(a), None);
        assert_eq!(board.selected(), Some(a));

        // Same cell toggles off.
        assert_eq!(board.select(a), None);
        assert_eq!(board.selected(), None);

        // Non-adjacent click moves the selection.
        board.select(a);
        assert_eq!(board.select(Cell::new(5, 5)), None);
        assert_eq!(board.selected(), Some(Cell::new(5, 5)));

        // Adjacent click yields a swap pair and clears the selection.
        assert_eq!(
            board.select(Cell::new(5, 4)),
            Some((Cell::new(5, 5), Cell::new(5, 4)))
        );
        assert_eq!(board.selected(), None);
    }

    #[test]
    fn diagonal_is_not_adjacent() {
        let mut board = Board::from_kinds(8, 8, &quiet_layout());
        board.select(Cell::new(1, 1));
        assert_eq!(board.select(Cell::new(2, 2)), None);
        assert_eq!(board.selected(), Some(Cell::new(2, 2)));
    }

    #[test]
    #[should_panic]
    fn select_out_of_range_panics() {
        let mut board = Board::from_kinds(8, 8, &quiet_layout());
        board.select(Cell::new(0, 8));
    }
}
