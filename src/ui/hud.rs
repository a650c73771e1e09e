use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::config::THEME;
use crate::game::{GameState, GameStatus};

const SEPARATOR: &str = " │ ";

/// Renders the one-line status bar and returns the remaining play area above it.
#[must_use]
pub fn render_hud(frame: &mut Frame<'_>, area: Rect, state: &GameState) -> Rect {
    let [play_area, status_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);

    frame.render_widget(
        Paragraph::new(status_line(state, usize::from(status_area.width)))
            .alignment(Alignment::Right),
        status_area,
    );

    play_area
}

fn status_line(state: &GameState, available_width: usize) -> Line<'static> {
    let fields = [
        ("Length", "L", state.snake().len().to_string()),
        (
            "Tick",
            "T",
            format!("{}ms", state.tick_interval().as_millis()),
        ),
        (
            "Grid",
            "G",
            format!("{}x{}", state.bounds().width, state.bounds().height),
        ),
        ("", "", status_label(state.status()).to_owned()),
    ];

    let compact = line_width(&fields, false) > available_width;
    let label_style = Style::default().fg(THEME.menu_footer);
    let value_style = Style::default()
        .fg(THEME.hud_text)
        .add_modifier(Modifier::BOLD);

    let mut spans = Vec::new();
    for (index, (long, short, value)) in fields.into_iter().enumerate() {
        if index > 0 {
            spans.push(Span::styled(SEPARATOR, label_style));
        }
        let label = if compact { short } else { long };
        if !label.is_empty() {
            spans.push(Span::styled(format!("{label} "), label_style));
        }
        spans.push(Span::styled(value, value_style));
    }

    Line::from(spans)
}

fn line_width(fields: &[(&str, &str, String)], compact: bool) -> usize {
    let separators = SEPARATOR.width() * fields.len().saturating_sub(1);
    fields
        .iter()
        .map(|(long, short, value)| {
            let label = if compact { short } else { long };
            let label_width = if label.is_empty() { 0 } else { label.width() + 1 };
            label_width + value.width()
        })
        .sum::<usize>()
        + separators
}

fn status_label(status: GameStatus) -> &'static str {
    match status {
        GameStatus::NotPlaying => "paused",
        GameStatus::Playing => "playing",
        GameStatus::GameOver(_) => "game over",
    }
}

#[cfg(test)]
mod tests {
    use super::{line_width, status_label};
    use crate::game::{DeathReason, GameStatus};

    #[test]
    fn compact_labels_are_narrower() {
        let fields = [
            ("Length", "L", "12".to_owned()),
            ("Tick", "T", "100ms".to_owned()),
            ("", "", "playing".to_owned()),
        ];

        assert!(line_width(&fields, true) < line_width(&fields, false));
        assert_eq!(line_width(&fields, true), 2 + 2 + 2 + 5 + 7 + 6);
    }

    #[test]
    fn every_status_has_a_label() {
        assert_eq!(status_label(GameStatus::Playing), "playing");
        assert_eq!(
            status_label(GameStatus::GameOver(DeathReason::SelfCollision)),
            "game over"
        );
    }
}
