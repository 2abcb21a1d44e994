use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::config::Theme;
use crate::game::Snapshot;

const HUD_MARGIN_X: u16 = 1;
const SEPARATOR: &str = " · ";

/// Renders the one-line HUD and returns the area left for the play field.
#[must_use]
pub fn render_hud(
    frame: &mut Frame<'_>,
    area: Rect,
    snapshot: &Snapshot<'_>,
    theme: &Theme,
) -> Rect {
    let [hud_area, rest] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);
    let hud_area = inset_horizontal(hud_area, HUD_MARGIN_X);

    frame.render_widget(
        Paragraph::new(hud_line(snapshot, usize::from(hud_area.width), theme)),
        hud_area,
    );

    rest
}

/// Builds the HUD row: score on the left, pacing stats right-aligned.
///
/// The stats are dropped when they do not fit next to the score.
fn hud_line(snapshot: &Snapshot<'_>, width: usize, theme: &Theme) -> Line<'static> {
    let score = format!("Score: {}", snapshot.score);
    let stats = [
        format!("Length {}", snapshot.size),
        format!("Speed {:.1}", snapshot.speed),
        format!("Step {}ms", snapshot.move_delay.as_millis()),
    ]
    .join(SEPARATOR);

    let score_width = score.width();
    let stats_width = stats.width();
    let score_span = Span::styled(
        score,
        Style::new().fg(theme.hud_text).add_modifier(Modifier::BOLD),
    );

    if score_width + 1 + stats_width > width {
        return Line::from(score_span);
    }

    let padding = " ".repeat(width - score_width - stats_width);
    Line::from(vec![
        score_span,
        Span::raw(padding),
        Span::styled(stats, Style::new().fg(theme.hud_muted)),
    ])
}

fn inset_horizontal(area: Rect, margin: u16) -> Rect {
    let width = area.width.saturating_sub(margin.saturating_mul(2));
    Rect {
        x: area.x.saturating_add(margin.min(area.width)),
        width,
        ..area
    }
}
