use crate::components::{CandyKind, Special};
use crate::rng::RandomSource;

/// A single candy on the board. Never mutated in place; refills and crushes
/// replace the whole value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub kind: CandyKind,
    pub special: Special,
}

impl Tile {
    pub fn new(kind: CandyKind) -> Self {
        Tile {
            kind,
            special: Special::None,
        }
    }

    pub fn with_special(kind: CandyKind, special: Special) -> Self {
        Tile { kind, special }
    }

    /// A plain tile of a uniformly random kind.
    pub fn random(rng: &mut impl RandomSource) -> Self {
        let i = rng.next_int(CandyKind::ALL.len() as u32) as usize;
        Tile::new(CandyKind::ALL[i])
    }

    /// Match comparison. Only the kind counts; `special` is ignored.
    pub fn same_kind(&self, other: &Tile) -> bool {
        self.kind == other.kind
    }
}

/// A board coordinate. Ordered row-major so match sets iterate top-left first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Cell { row, col }
    }

    /// True if the two cells share an edge (Manhattan distance 1).
    pub fn is_adjacent(self, other: Cell) -> bool {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col) == 1
    }
}

/// Row-major grid storage: index = row * cols + col. `None` is an empty cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    pub rows: usize,
    pub cols: usize,
    tiles: Vec<Option<Tile>>,
}

impl Grid {
    pub fn new(rows: usize, cols: usize) -> Self {
        Grid {
            rows,
            cols,
            tiles: vec![None; rows * cols],
        }
    }

    #[inline]
    fn idx(&self, cell: Cell) -> usize {
        assert!(
            cell.row < self.rows && cell.col < self.cols,
            "cell ({}, {}) outside {}x{} grid",
            cell.row,
            cell.col,
            self.rows,
            self.cols
        );
        cell.row * self.cols + cell.col
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }

    pub fn get(&self, cell: Cell) -> Option<&Tile> {
        self.tiles[self.idx(cell)].as_ref()
    }

    pub fn set(&mut self, cell: Cell, tile: Option<Tile>) {
        let i = self.idx(cell);
        self.tiles[i] = tile;
    }

    /// Remove and return the tile at `cell`, leaving it empty.
    pub fn take(&mut self, cell: Cell) -> Option<Tile> {
        let i = self.idx(cell);
        self.tiles[i].take()
    }

    pub fn swap(&mut self, a: Cell, b: Cell) {
        let ia = self.idx(a);
        let ib = self.idx(b);
        self.tiles.swap(ia, ib);
    }

    pub fn count_empty(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_none()).count()
    }

    /// All cells in row-major order together with their contents.
    pub fn iter(&self) -> impl Iterator<Item = (Cell, Option<&Tile>)> + '_ {
        let cols = self.cols;
        self.tiles
            .iter()
            .enumerate()
            .map(move |(i, t)| (Cell::new(i / cols, i % cols), t.as_ref()))
    }
}
