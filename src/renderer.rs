use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Block;

use crate::config::{
    GLYPH_EMPTY, GLYPH_FOOD, GLYPH_OBSTACLE, GLYPH_SNAKE_BODY, GLYPH_SNAKE_HEAD_DOWN,
    GLYPH_SNAKE_HEAD_LEFT, GLYPH_SNAKE_HEAD_RIGHT, GLYPH_SNAKE_HEAD_UP, GridSize, THEME,
};
use crate::game::{GameState, GameStatus};
use crate::grid::Tile;
use crate::input::Direction;
use crate::snake::Position;
use crate::ui::hud::render_hud;
use crate::ui::menu::{render_game_over_menu, render_pause_menu, render_start_menu};

/// Renders the full game frame from immutable state.
pub fn render(frame: &mut Frame<'_>, state: &GameState) {
    let area = frame.area();
    let play_area = render_hud(frame, area, state);

    let block = Block::bordered().border_style(Style::new().fg(THEME.border_fg));
    let inner = block.inner(play_area);
    frame.render_widget(block, play_area);

    let buffer = frame.buffer_mut();
    render_tiles(buffer, inner, state);
    render_food(buffer, inner, state);
    render_snake(buffer, inner, state);

    if state.is_start_screen() {
        render_start_menu(frame, play_area, state.grid().obstacle_count());
        return;
    }

    match state.status() {
        GameStatus::NotPlaying => render_pause_menu(frame, play_area),
        GameStatus::GameOver(reason) => {
            render_game_over_menu(frame, play_area, state.snake().len(), reason);
        }
        GameStatus::Playing => {}
    }
}

fn render_tiles(buffer: &mut Buffer, inner: Rect, state: &GameState) {
    let bounds = state.bounds();
    let empty_style = Style::new().fg(THEME.menu_footer).bg(THEME.play_bg);
    let obstacle_style = Style::new().fg(THEME.obstacle).bg(THEME.play_bg);

    for (y, row) in (0_i32..).zip(state.grid().rows()) {
        for (x, tile) in (0_i32..).zip(row) {
            let Some((cx, cy)) = logical_to_terminal(inner, bounds, Position { x, y }) else {
                continue;
            };
            let (glyph, style) = match tile {
                Tile::Empty => (GLYPH_EMPTY, empty_style),
                Tile::Obstacle => (GLYPH_OBSTACLE, obstacle_style),
            };
            buffer.set_string(cx, cy, glyph, style);
        }
    }
}

fn render_food(buffer: &mut Buffer, inner: Rect, state: &GameState) {
    let Some((x, y)) = logical_to_terminal(inner, state.bounds(), state.food().position) else {
        return;
    };

    buffer.set_string(x, y, GLYPH_FOOD, Style::new().fg(THEME.food).bg(THEME.play_bg));
}

fn render_snake(buffer: &mut Buffer, inner: Rect, state: &GameState) {
    let snake = state.snake();
    let body_style = Style::new().fg(THEME.snake_body).bg(THEME.play_bg);

    // Tail first so the head wins when segments overlap.
    for segment in snake.segments().skip(1).collect::<Vec<_>>().into_iter().rev() {
        if let Some((x, y)) = logical_to_terminal(inner, state.bounds(), *segment) {
            buffer.set_string(x, y, GLYPH_SNAKE_BODY, body_style);
        }
    }

    if let Some((x, y)) = logical_to_terminal(inner, state.bounds(), snake.head()) {
        buffer.set_string(
            x,
            y,
            head_glyph(snake.heading()),
            Style::new()
                .fg(THEME.snake_head)
                .bg(THEME.play_bg)
                .add_modifier(Modifier::BOLD),
        );
    }
}

fn head_glyph(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => GLYPH_SNAKE_HEAD_UP,
        Direction::Down => GLYPH_SNAKE_HEAD_DOWN,
        Direction::Left => GLYPH_SNAKE_HEAD_LEFT,
        Direction::Right => GLYPH_SNAKE_HEAD_RIGHT,
    }
}

/// Maps a board cell to a terminal cell, or `None` when it falls outside
/// the drawable area.
fn logical_to_terminal(inner: Rect, bounds: GridSize, position: Position) -> Option<(u16, u16)> {
    if !position.is_within_bounds(bounds) {
        return None;
    }

    let x_offset = u16::try_from(position.x).ok()?;
    let y_offset = u16::try_from(position.y).ok()?;

    let x = inner.x.saturating_add(x_offset);
    let y = inner.y.saturating_add(y_offset);
    if x >= inner.right() || y >= inner.bottom() {
        return None;
    }

    Some((x, y))
}
