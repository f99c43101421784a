use std::cell::RefCell;
use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::components::CandyKind;
use crate::state::GameSession;

thread_local! {
    static GAME: RefCell<Option<GameSession>> = RefCell::new(None);
}

fn with_game<R>(f: impl FnOnce(&mut GameSession) -> R) -> R {
    GAME.with(|cell| {
        let mut borrow = cell.borrow_mut();
        let session = borrow.as_mut().expect("Game not initialized. Call init_game() first.");
        f(session)
    })
}

/// Create a fresh session in the menu. Also used to reset.
#[wasm_bindgen]
pub fn init_game(seed: f64) {
    let session = GameSession::new(seed as u64);
    GAME.with(|cell| {
        *cell.borrow_mut() = Some(session);
    });
    log::info!("sweetmatch-sim: session initialized with seed {}", seed as u64);
}

#[wasm_bindgen]
pub fn tick_game(dt: f32) {
    with_game(|g| g.tick(dt));
}

/// Tap in cell space.
#[wasm_bindgen]
pub fn select_cell(row: u32, col: u32) {
    with_game(|g| g.select_cell(row as usize, col as usize));
}

/// Tap in screen space; taps off the board clear the selection.
#[wasm_bindgen]
pub fn tap_point(x: f32, y: f32) {
    with_game(|g| g.tap_point(Vec2::new(x, y)));
}

#[wasm_bindgen]
pub fn start_game() -> bool {
    with_game(|g| g.start_game())
}

#[wasm_bindgen]
pub fn advance_level() -> bool {
    with_game(|g| g.advance_level())
}

#[wasm_bindgen]
pub fn retry_level() -> bool {
    with_game(|g| g.retry_level())
}

#[wasm_bindgen]
pub fn quit_to_menu() -> bool {
    with_game(|g| g.quit_to_menu())
}

/// 0 = Menu, 1 = Playing, 2 = LevelComplete, 3 = GameOver.
#[wasm_bindgen]
pub fn get_session_state() -> u8 {
    with_game(|g| g.state as u8)
}

#[wasm_bindgen]
pub fn get_score() -> u32 {
    with_game(|g| g.score)
}

#[wasm_bindgen]
pub fn get_moves_remaining() -> u32 {
    with_game(|g| g.moves_remaining)
}

#[wasm_bindgen]
pub fn get_target_score() -> u32 {
    with_game(|g| g.target_score())
}

/// Zero-based level index; the HUD shows it plus one.
#[wasm_bindgen]
pub fn get_level_index() -> u32 {
    with_game(|g| g.level_index as u32)
}

#[wasm_bindgen]
pub fn is_resolving() -> bool {
    with_game(|g| g.is_resolving())
}

/// Crush window progress, 0.0 -> 1.0. Zero when nothing is resolving.
#[wasm_bindgen]
pub fn get_crush_progress() -> f32 {
    with_game(|g| g.crush_progress())
}

/// Number of swaps that would match. Zero means the board is stuck.
#[wasm_bindgen]
pub fn get_valid_swap_count() -> u32 {
    with_game(|g| g.valid_swap_count() as u32)
}

#[wasm_bindgen]
pub fn get_level_count() -> u32 {
    with_game(|g| g.level_count() as u32)
}

/// Board rectangle in view pixels: [x, y, width, height].
#[wasm_bindgen]
pub fn get_board_rect() -> js_sys::Float32Array {
    with_game(|g| {
        let size = g.layout.size();
        js_sys::Float32Array::from(&[g.layout.origin.x, g.layout.origin.y, size.x, size.y][..])
    })
}

/// Candy color as 0xRRGGBB. Kind indices wrap around the palette.
#[wasm_bindgen]
pub fn get_candy_color(kind: u8) -> u32 {
    let [r, g, b] = CandyKind::from_index(kind as usize).color();
    (r as u32) << 16 | (g as u32) << 8 | b as u32
}

/// Display name of a candy kind. Kind indices wrap around the palette.
#[wasm_bindgen]
pub fn get_candy_name(kind: u8) -> String {
    CandyKind::from_index(kind as usize).name().to_string()
}

#[wasm_bindgen]
pub fn get_board_rows() -> u32 {
    with_game(|g| g.board.rows as u32)
}

#[wasm_bindgen]
pub fn get_board_cols() -> u32 {
    with_game(|g| g.board.cols as u32)
}

/// Selected cell packed as row * cols + col, or -1.
#[wasm_bindgen]
pub fn get_selected() -> i32 {
    with_game(|g| {
        g.selected()
            .map_or(-1, |c| (c.row * g.board.cols + c.col) as i32)
    })
}

/// Candy kind per cell in row-major order (255 = empty).
#[wasm_bindgen]
pub fn get_board_kinds() -> js_sys::Uint8Array {
    with_game(|g| js_sys::Uint8Array::from(g.board_kinds().as_slice()))
}

/// Suggested swap packed as [from_row, from_col, to_row, to_col], or empty.
#[wasm_bindgen]
pub fn get_hint() -> js_sys::Uint32Array {
    with_game(|g| match g.hint() {
        Some(mv) => js_sys::Uint32Array::from(
            &[
                mv.from.row as u32,
                mv.from.col as u32,
                mv.to.row as u32,
                mv.to.col as u32,
            ][..],
        ),
        None => js_sys::Uint32Array::new_with_length(0),
    })
}

/// Returns a pointer to the cell instance buffer (8 f32 per cell).
#[wasm_bindgen]
pub fn get_render_buffer_ptr() -> *const f32 {
    with_game(|g| g.render_buffer_ptr() as *const f32)
}

/// Returns the number of cell instances.
#[wasm_bindgen]
pub fn get_render_buffer_len() -> u32 {
    with_game(|g| g.render_buffer_len() as u32)
}

/// Returns a pointer to the event buffer (u8 per event).
#[wasm_bindgen]
pub fn get_events_ptr() -> *const u8 {
    with_game(|g| g.events_ptr() as *const u8)
}

/// Returns the number of events published by the last tick, plus any
/// emitted by commands since.
#[wasm_bindgen]
pub fn get_events_len() -> u32 {
    with_game(|g| g.events_len() as u32)
}
