use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::components::{
    GameEvent, LevelConfig, CRUSH_ANIM_TIME, DEFAULT_COLS, DEFAULT_ROWS, LEVELS, SCORE_PER_TILE,
};
use crate::grid::Cell;
use crate::layout::BoardLayout;
use crate::rng::{RandomSource, Rng};
use crate::systems::animation::{match_pulse, CrushTimer};
use crate::systems::board::{Board, MatchSet};
use crate::systems::hint::{count_valid_swaps, find_best_swap, SwapMove};

/// Session-level state. Only `Playing` accepts taps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SessionState {
    Menu = 0,
    Playing = 1,
    LevelComplete = 2,
    GameOver = 3,
}

/// Per-cell data written each tick for the host renderer.
/// 8 floats = 32 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct CellInstance {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub kind: f32,
    pub special: f32,
    pub highlight: f32, // crush overlay strength, 0 when not matched
    pub flags: f32,     // bit 0 = visible, bit 1 = selected, bit 2 = matched
}

pub const FLAG_VISIBLE: u32 = 1 << 0;
pub const FLAG_SELECTED: u32 = 1 << 1;
pub const FLAG_MATCHED: u32 = 1 << 2;

/// One play session: the current level's board, score and moves, the crush
/// cycle in flight, and the menu/level state machine around it.
pub struct GameSession<R: RandomSource = Rng> {
    pub board: Board,
    pub state: SessionState,
    pub score: u32,
    pub moves_remaining: u32,
    pub level_index: usize,
    pub layout: BoardLayout,

    levels: Vec<LevelConfig>,
    rng: R,
    pending_matches: MatchSet,
    crush_timer: CrushTimer,
    cascade_depth: u32,
    elapsed: f32,

    // Events for the host. Commands issued between ticks append here and
    // stay visible through the next tick.
    pub events: Vec<GameEvent>,
    published_events: usize,

    // Rebuilt every tick, read by the host renderer.
    pub render_buffer: Vec<CellInstance>,

    // Input queue (cell coordinates from the host)
    pub pending_tap: Option<Cell>,
}

impl GameSession<Rng> {
    pub fn new(seed: u64) -> Self {
        Self::with_levels(Rng::new(seed), LEVELS.to_vec())
    }
}

impl<R: RandomSource> GameSession<R> {
    /// Start in `Menu` on level 0 with the given random source and level table.
    pub fn with_levels(mut rng: R, levels: Vec<LevelConfig>) -> Self {
        assert!(!levels.is_empty(), "level table must not be empty");

        let board = Board::new(DEFAULT_ROWS, DEFAULT_COLS, &mut rng);
        let first = levels[0];
        GameSession {
            board,
            state: SessionState::Menu,
            score: 0,
            moves_remaining: first.move_allowance,
            level_index: 0,
            layout: BoardLayout::default(),
            levels,
            rng,
            pending_matches: MatchSet::new(),
            crush_timer: CrushTimer::new(CRUSH_ANIM_TIME),
            cascade_depth: 0,
            elapsed: 0.0,
            events: Vec::with_capacity(8),
            published_events: 0,
            render_buffer: Vec::with_capacity(DEFAULT_ROWS * DEFAULT_COLS),
            pending_tap: None,
        }
    }

    pub fn level(&self) -> LevelConfig {
        self.levels[self.level_index]
    }

    pub fn target_score(&self) -> u32 {
        self.level().target_score
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// How far the current crush window has run, 0.0 -> 1.0.
    pub fn crush_progress(&self) -> f32 {
        self.crush_timer.progress()
    }

    /// Swaps on the current board that would match. Zero means stuck.
    pub fn valid_swap_count(&self) -> usize {
        count_valid_swaps(&self.board)
    }

    pub fn selected(&self) -> Option<Cell> {
        self.board.selected()
    }

    /// Cells waiting to be crushed; empty outside a crush cycle.
    pub fn pending_matches(&self) -> &MatchSet {
        &self.pending_matches
    }

    pub fn is_resolving(&self) -> bool {
        self.crush_timer.is_active()
    }

    /// Best available swap, if any. None while a cycle is resolving.
    pub fn hint(&self) -> Option<SwapMove> {
        if self.is_resolving() {
            return None;
        }
        find_best_swap(&self.board)
    }

    /// Queue a tap in cell space. Applied on the next `tick`.
    pub fn select_cell(&mut self, row: usize, col: usize) {
        if self.state != SessionState::Playing {
            return;
        }
        assert!(
            row < self.board.rows && col < self.board.cols,
            "cell ({}, {}) outside {}x{} board",
            row,
            col,
            self.board.rows,
            self.board.cols
        );
        self.pending_tap = Some(Cell::new(row, col));
    }

    /// Queue a tap in screen space. A tap off the board drops the selection.
    pub fn tap_point(&mut self, point: Vec2) {
        if self.state != SessionState::Playing {
            return;
        }
        match self.layout.cell_at(point) {
            Some(cell) => self.select_cell(cell.row, cell.col),
            None => self.clear_selection(),
        }
    }

    /// Drop the selection, along with any tap still waiting for a tick.
    pub fn clear_selection(&mut self) {
        self.pending_tap = None;
        self.board.clear_selection();
    }

    // -----------------------------------------------------------------------
    // State machine commands
    // -----------------------------------------------------------------------

    /// Menu -> Playing on a fresh board for the current level.
    pub fn start_game(&mut self) -> bool {
        if self.state != SessionState::Menu {
            return false;
        }
        self.reset_level();
        self.state = SessionState::Playing;
        true
    }

    /// LevelComplete -> Playing on the next level, wrapping after the last.
    pub fn advance_level(&mut self) -> bool {
        if self.state != SessionState::LevelComplete {
            return false;
        }
        self.level_index = (self.level_index + 1) % self.levels.len();
        self.reset_level();
        self.state = SessionState::Playing;
        true
    }

    /// GameOver -> Playing on the same level.
    pub fn retry_level(&mut self) -> bool {
        if self.state != SessionState::GameOver {
            return false;
        }
        self.reset_level();
        self.state = SessionState::Playing;
        true
    }

    /// Back to the menu from any other state. A crush cycle still in flight
    /// is discarded along with the rest of the level's progress.
    pub fn quit_to_menu(&mut self) -> bool {
        if self.state == SessionState::Menu {
            return false;
        }
        if self.is_resolving() {
            log::info!(
                "quit during crush cycle; dropping {} pending cells",
                self.pending_matches.len()
            );
        }
        self.cancel_crush_cycle();
        self.pending_tap = None;
        self.board.clear_selection();
        self.state = SessionState::Menu;
        true
    }

    fn reset_level(&mut self) {
        let level = self.level();
        self.board = Board::new(self.board.rows, self.board.cols, &mut self.rng);
        self.score = 0;
        self.moves_remaining = level.move_allowance;
        self.pending_tap = None;
        self.cancel_crush_cycle();
        log::info!(
            "level {} started: target {}, {} moves",
            self.level_index + 1,
            level.target_score,
            level.move_allowance
        );
    }

    // -----------------------------------------------------------------------
    // Turn resolution
    // -----------------------------------------------------------------------

    /// Try to swap two adjacent cells. Accepted only if the swap creates a
    /// match; otherwise the swap is undone. Ignored (false, no event) outside
    /// `Playing` or while a cycle is resolving.
    pub fn attempt_swap(&mut self, a: Cell, b: Cell) -> bool {
        assert!(
            a.is_adjacent(b),
            "swap requires adjacent cells, got ({}, {}) and ({}, {})",
            a.row,
            a.col,
            b.row,
            b.col
        );
        if self.state != SessionState::Playing || self.is_resolving() {
            return false;
        }

        self.board.swap(a, b);
        let matches = self.board.find_matches();
        if matches.is_empty() {
            self.board.swap(a, b);
            self.events.push(GameEvent::InvalidSwap);
            log::debug!("invalid swap {:?} <-> {:?}", a, b);
            return false;
        }

        self.events.push(GameEvent::SwapAccepted);
        self.moves_remaining = self.moves_remaining.saturating_sub(1);
        self.cascade_depth = 0;
        log::debug!(
            "swap {:?} <-> {:?} matched {} cells, {} moves left",
            a,
            b,
            matches.len(),
            self.moves_remaining
        );
        self.start_crush_cycle(matches);
        true
    }

    fn start_crush_cycle(&mut self, matches: MatchSet) {
        self.pending_matches = matches;
        self.crush_timer.start();
    }

    fn cancel_crush_cycle(&mut self) {
        self.pending_matches.clear();
        self.crush_timer.stop();
        self.cascade_depth = 0;
    }

    /// Crush the pending set, score it, refill, and either chain into a
    /// cascade or settle the turn.
    fn finish_crush_cycle(&mut self) {
        let matches = std::mem::take(&mut self.pending_matches);
        self.board.crush(&matches);
        self.score += matches.len() as u32 * SCORE_PER_TILE;
        let spawned = self.board.apply_gravity(&mut self.rng);
        self.events.push(GameEvent::MatchResolved);
        log::debug!(
            "crushed {} cells (cascade {}), spawned {}, score {}",
            matches.len(),
            self.cascade_depth,
            spawned,
            self.score
        );

        let cascade = self.board.find_matches();
        if !cascade.is_empty() {
            self.cascade_depth += 1;
            self.start_crush_cycle(cascade);
            return;
        }

        self.cascade_depth = 0;
        if self.score >= self.target_score() {
            self.state = SessionState::LevelComplete;
            self.events.push(GameEvent::LevelComplete);
            log::info!("level {} complete with {} points", self.level_index + 1, self.score);
        } else if self.moves_remaining == 0 {
            self.state = SessionState::GameOver;
            self.events.push(GameEvent::GameOver);
            log::info!(
                "out of moves on level {} at {}/{}",
                self.level_index + 1,
                self.score,
                self.target_score()
            );
        }
    }

    /// Main simulation tick. Called each frame from the host.
    pub fn tick(&mut self, dt: f32) {
        // Drop what the host saw after the previous tick; keep anything
        // emitted by commands since then.
        self.events.drain(..self.published_events);
        self.elapsed += dt;

        if self.state == SessionState::Playing {
            self.process_input();
            if self.crush_timer.tick(dt) {
                self.finish_crush_cycle();
            }
        }

        self.rebuild_render_buffer();
        self.published_events = self.events.len();
    }

    fn process_input(&mut self) {
        if let Some(cell) = self.pending_tap.take() {
            // Selection still moves while resolving, but swaps wait.
            if let Some((a, b)) = self.board.select(cell) {
                if !self.is_resolving() {
                    self.attempt_swap(a, b);
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Host-facing buffers
    // -----------------------------------------------------------------------

    fn rebuild_render_buffer(&mut self) {
        self.render_buffer.clear();

        let selected = self.board.selected();
        let pulse = match_pulse(self.elapsed);

        for (cell, tile) in self.board.grid.iter() {
            let Some(tile) = tile else { continue };
            let (min, size) = self.layout.cell_rect(cell);

            let mut flags = FLAG_VISIBLE;
            if selected == Some(cell) {
                flags |= FLAG_SELECTED;
            }
            let matched = self.pending_matches.contains(&cell);
            if matched {
                flags |= FLAG_MATCHED;
            }

            self.render_buffer.push(CellInstance {
                x: min.x,
                y: min.y,
                width: size.x,
                height: size.y,
                kind: tile.kind as u8 as f32,
                special: tile.special as u8 as f32,
                highlight: if matched { pulse } else { 0.0 },
                flags: flags as f32,
            });
        }
    }

    /// Render buffer as raw bytes for zero-copy upload.
    pub fn render_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.render_buffer)
    }

    /// Pointer to the render buffer data for SharedArrayBuffer access.
    pub fn render_buffer_ptr(&self) -> *const CellInstance {
        self.render_buffer.as_ptr()
    }

    pub fn render_buffer_len(&self) -> usize {
        self.render_buffer.len()
    }

    pub fn events_ptr(&self) -> *const GameEvent {
        self.events.as_ptr()
    }

    pub fn events_len(&self) -> usize {
        self.events.len()
    }

    /// Kind per cell in row-major order, 255 for empty cells.
    pub fn board_kinds(&self) -> Vec<u8> {
        self.board
            .grid
            .iter()
            .map(|(_, tile)| tile.map_or(u8::MAX, |t| t.kind as u8))
            .collect()
    }
}
