use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Clear, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::config::Theme;

/// Draws the pause screen as a centered popup.
pub fn render_pause_menu(frame: &mut Frame<'_>, area: Rect, theme: &Theme) {
    let lines = vec![
        title_line("PAUSED", theme.pause_title),
        Line::from(""),
        Line::from("Press P to continue"),
        Line::from("[Esc] Quit"),
    ];
    render_popup(frame, area, lines, " pause ", theme);
}

/// Draws the game-over screen with the final score.
pub fn render_game_over_menu(
    frame: &mut Frame<'_>,
    area: Rect,
    score: u32,
    board_cleared: bool,
    theme: &Theme,
) {
    let mut lines = vec![
        title_line("GAME OVER", theme.game_over_title),
        Line::from(""),
    ];
    if board_cleared {
        lines.push(Line::from("Board cleared!"));
    }
    lines.extend([
        Line::from(format!("Final Score: {score}")),
        Line::from(""),
        Line::from("[Enter] Play again"),
        Line::from("[Esc] Quit"),
    ]);
    render_popup(frame, area, lines, " game over ", theme);
}

fn title_line(text: &'static str, color: Color) -> Line<'static> {
    Line::styled(text, Style::new().fg(color).add_modifier(Modifier::BOLD))
}

fn render_popup(
    frame: &mut Frame<'_>,
    area: Rect,
    lines: Vec<Line<'static>>,
    title: &'static str,
    theme: &Theme,
) {
    let content_width = lines
        .iter()
        .map(Line::width)
        .chain(std::iter::once(title.width()))
        .max()
        .unwrap_or(0);
    let width = u16::try_from(content_width + 4).unwrap_or(u16::MAX);
    let height = u16::try_from(lines.len() + 2).unwrap_or(u16::MAX);
    let popup = centered_popup(area, width, height);

    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .style(Style::new().fg(theme.hud_text))
            .block(Block::bordered().title(title)),
        popup,
    );
}

/// Centers a `width` x `height` rectangle in `area`, shrinking it to fit.
fn centered_popup(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);

    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
