use crate::grid::Cell;
use crate::systems::board::Board;

/// A swap that produces at least one match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapMove {
    pub from: Cell,
    pub to: Cell,
    /// Cells the swap would match before any cascade.
    pub matched: usize,
}

/// Scans every right and down neighbour pair and reports the swap that
/// matches the most cells. Ties keep the first pair in row-major order.
pub fn find_best_swap(board: &Board) -> Option<SwapMove> {
    let mut sim = board.clone();
    let mut best: Option<SwapMove> = None;

    for_each_valid_swap(&mut sim, |mv| {
        if best.map_or(true, |b| mv.matched > b.matched) {
            best = Some(mv);
        }
    });

    best
}

/// Number of distinct swaps that produce a match. Zero means the board is
/// stuck.
pub fn count_valid_swaps(board: &Board) -> usize {
    let mut sim = board.clone();
    let mut count = 0;
    for_each_valid_swap(&mut sim, |_| count += 1);
    count
}

fn for_each_valid_swap(sim: &mut Board, mut visit: impl FnMut(SwapMove)) {
    for row in 0..sim.rows {
        for col in 0..sim.cols {
            let from = Cell::new(row, col);
            let neighbours = [
                (col + 1 < sim.cols).then(|| Cell::new(row, col + 1)),
                (row + 1 < sim.rows).then(|| Cell::new(row + 1, col)),
            ];
            for to in neighbours.into_iter().flatten() {
                sim.swap(from, to);
                let matched = sim.find_matches().len();
                sim.swap(from, to);
                if matched > 0 {
                    visit(SwapMove { from, to, matched });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::CandyKind::*;

    #[test]
    fn finds_the_only_move() {
        // Swapping (0,2) and (1,2) completes a cherry run on row 0.
        let board = Board::from_kinds(
            3,
            4,
            &[
                Cherry, Cherry, Lemon, Mint,
                Grape, Orange, Cherry, Lemon,
                Mint, Grape, Orange, Blueberry,
            ],
        );
        let mv = find_best_swap(&board).expect("a move exists");
        assert_eq!(mv.from, Cell::new(0, 2));
        assert_eq!(mv.to, Cell::new(1, 2));
        assert_eq!(mv.matched, 3);
        assert_eq!(count_valid_swaps(&board), 1);
    }

    #[test]
    fn prefers_larger_matches() {
        // Three moves exist. Swapping (0,5) with (1,5) lines up four mints.
        let board = Board::from_kinds(
            2,
            8,
            &[
                Cherry, Cherry, Lemon, Blueberry, Mint, Lemon, Mint, Mint,
                Grape, Orange, Cherry, Grape, Blueberry, Mint, Orange, Blueberry,
            ],
        );
        let mv = find_best_swap(&board).expect("a move exists");
        assert_eq!((mv.from, mv.to), (Cell::new(0, 5), Cell::new(1, 5)));
        assert_eq!(mv.matched, 4);
        assert_eq!(count_valid_swaps(&board), 3);
    }

    #[test]
    fn stuck_board_has_no_moves() {
        let board = Board::from_kinds(
            2,
            3,
            &[Cherry, Lemon, Mint, Grape, Orange, Blueberry],
        );
        assert_eq!(find_best_swap(&board), None);
        assert_eq!(count_valid_swaps(&board), 0);
    }

    #[test]
    fn hint_search_leaves_board_untouched() {
        let board = Board::from_kinds(
            3,
            4,
            &[
                Cherry, Cherry, Lemon, Mint,
                Grape, Orange, Cherry, Lemon,
                Mint, Grape, Orange, Blueberry,
            ],
        );
        let before = board.grid.clone();
        let _ = find_best_swap(&board);
        assert_eq!(board.grid, before);
    }
}
