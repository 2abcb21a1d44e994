use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Block;

use crate::config::{
    BORDER_PLAY_FIELD, CELL_COLUMNS, GLYPH_FOOD, GLYPH_SNAKE_BODY, GLYPH_SNAKE_HEAD_DOWN,
    GLYPH_SNAKE_HEAD_LEFT, GLYPH_SNAKE_HEAD_RIGHT, GLYPH_SNAKE_HEAD_UP, Theme,
};
use crate::game::{RoundStatus, Snapshot};
use crate::grid::{Cell, GridSpace};
use crate::input::Direction;
use crate::ui::hud::render_hud;
use crate::ui::menu::{render_game_over_menu, render_pause_menu};

/// Renders the full game frame from an immutable snapshot.
pub fn render(frame: &mut Frame<'_>, snapshot: &Snapshot<'_>, theme: &Theme) {
    let area = frame.area();
    let available = render_hud(frame, area, snapshot, theme);
    let play_area = play_field_area(available, snapshot.grid);

    let block = Block::bordered()
        .border_set(BORDER_PLAY_FIELD)
        .border_style(Style::new().fg(theme.border_fg));
    let inner = block.inner(play_area);
    frame.render_widget(block, play_area);

    render_food(frame, inner, snapshot, theme);
    render_snake(frame, inner, snapshot, theme);

    match snapshot.status {
        RoundStatus::Paused => render_pause_menu(frame, play_area, theme),
        RoundStatus::GameOver => render_game_over_menu(
            frame,
            play_area,
            snapshot.score,
            snapshot.board_cleared,
            theme,
        ),
        RoundStatus::Playing => {}
    }
}

/// Centers a bordered field sized for the grid, clipped to `area`.
fn play_field_area(area: Rect, grid: GridSpace) -> Rect {
    let width = grid
        .width()
        .saturating_mul(CELL_COLUMNS)
        .saturating_add(2)
        .min(area.width);
    let height = grid.height().saturating_add(2).min(area.height);

    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_food(frame: &mut Frame<'_>, inner: Rect, snapshot: &Snapshot<'_>, theme: &Theme) {
    let Some((x, y)) = logical_to_terminal(inner, snapshot.grid, snapshot.food) else {
        return;
    };

    frame
        .buffer_mut()
        .set_string(x, y, GLYPH_FOOD, Style::new().fg(theme.food));
}

fn render_snake(frame: &mut Frame<'_>, inner: Rect, snapshot: &Snapshot<'_>, theme: &Theme) {
    let buffer = frame.buffer_mut();

    // Tail first so the head is drawn last and stays visible.
    for (index, segment) in snapshot.positions.iter().enumerate().rev() {
        let Some((x, y)) = logical_to_terminal(inner, snapshot.grid, *segment) else {
            continue;
        };

        if index == 0 {
            buffer.set_string(
                x,
                y,
                head_glyph(snapshot.direction),
                Style::new()
                    .fg(theme.snake_head)
                    .add_modifier(Modifier::BOLD),
            );
        } else {
            buffer.set_string(x, y, GLYPH_SNAKE_BODY, Style::new().fg(theme.snake_body));
        }
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

/// Maps a cell to the terminal column/row of its left half.
///
/// Returns `None` when the cell would fall outside the visible field.
fn logical_to_terminal(inner: Rect, grid: GridSpace, cell: Cell) -> Option<(u16, u16)> {
    if !grid.contains(cell) {
        return None;
    }

    let x_offset = u16::try_from(cell.x).ok()?.checked_mul(CELL_COLUMNS)?;
    let y_offset = u16::try_from(cell.y).ok()?;

    let x = inner.x.saturating_add(x_offset);
    let y = inner.y.saturating_add(y_offset);
    if x.saturating_add(CELL_COLUMNS) > inner.right() || y >= inner.bottom() {
        return None;
    }

    Some((x, y))
}
