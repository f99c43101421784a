use glam::Vec2;

use crate::components::{DEFAULT_COLS, DEFAULT_ROWS};
use crate::grid::Cell;

/// Reference view size the default layout is centered in.
pub const VIEW_WIDTH: f32 = 1280.0;
pub const VIEW_HEIGHT: f32 = 720.0;

pub const TILE_SIZE: f32 = 72.0;
pub const TILE_PADDING: f32 = 6.0;

/// Board is pushed down this far to leave room for the HUD.
const HUD_OFFSET_Y: f32 = 20.0;

/// Screen-space placement of the board. Y grows downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardLayout {
    /// Top-left corner of cell (0, 0).
    pub origin: Vec2,
    pub tile_size: f32,
    pub padding: f32,
    pub rows: usize,
    pub cols: usize,
}

impl BoardLayout {
    /// Center a `rows` x `cols` board in a view of the given size.
    pub fn centered(view: Vec2, rows: usize, cols: usize, tile_size: f32, padding: f32) -> Self {
        let board = Vec2::new(cols as f32, rows as f32) * tile_size;
        let origin = ((view - board) * 0.5).floor() + Vec2::new(0.0, HUD_OFFSET_Y);
        BoardLayout {
            origin,
            tile_size,
            padding,
            rows,
            cols,
        }
    }

    /// Total board size in pixels.
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.cols as f32, self.rows as f32) * self.tile_size
    }

    /// Map a pointer position to the cell under it.
    pub fn cell_at(&self, point: Vec2) -> Option<Cell> {
        let local = ((point - self.origin) / self.tile_size).floor();
        if !local.is_finite() || local.x < 0.0 || local.y < 0.0 {
            return None;
        }
        let (col, row) = (local.x as usize, local.y as usize);
        (row < self.rows && col < self.cols).then(|| Cell::new(row, col))
    }

    /// Padded rectangle a tile is drawn in: (top-left, size).
    pub fn cell_rect(&self, cell: Cell) -> (Vec2, Vec2) {
        let corner = self.origin + Vec2::new(cell.col as f32, cell.row as f32) * self.tile_size;
        let inset = (self.padding / 2.0).floor();
        (
            corner + Vec2::splat(inset),
            Vec2::splat(self.tile_size - self.padding),
        )
    }
}

impl Default for BoardLayout {
    fn default() -> Self {
        Self::centered(
            Vec2::new(VIEW_WIDTH, VIEW_HEIGHT),
            DEFAULT_ROWS,
            DEFAULT_COLS,
            TILE_SIZE,
            TILE_PADDING,
        )
    }
}
