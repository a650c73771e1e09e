use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Clear, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::config::THEME;
use crate::game::DeathReason;

/// Draws the start screen as a centered popup.
pub fn render_start_menu(frame: &mut Frame<'_>, area: Rect, obstacles: usize) {
    let body = [
        "SNAKE".to_owned(),
        String::new(),
        format!("{obstacles} obstacles on the board"),
        String::new(),
        "[Space]/[Enter] Start".to_owned(),
        "[Q]/[Esc] Quit".to_owned(),
        String::new(),
        "Arrows, WASD or HJKL to steer".to_owned(),
    ];

    render_popup(frame, area, " start ", &body);
}

/// Draws the pause screen as a centered popup.
pub fn render_pause_menu(frame: &mut Frame<'_>, area: Rect) {
    let body = [
        "PAUSED".to_owned(),
        String::new(),
        "[Space]/[P] Resume".to_owned(),
        "[R] Restart".to_owned(),
        "[Q]/[Esc] Quit".to_owned(),
    ];

    render_popup(frame, area, " pause ", &body);
}

/// Draws the game-over screen as a centered popup.
pub fn render_game_over_menu(frame: &mut Frame<'_>, area: Rect, length: usize, reason: DeathReason) {
    let body = [
        "GAME OVER".to_owned(),
        String::new(),
        format!("Length: {length}"),
        match reason {
            DeathReason::SelfCollision => "Cause: hit yourself".to_owned(),
            DeathReason::ObstacleCollision => "Cause: hit an obstacle".to_owned(),
        },
        String::new(),
        "[R] Play Again".to_owned(),
        "[Q]/[Esc] Quit".to_owned(),
    ];

    render_popup(frame, area, " game over ", &body);
}

fn render_popup(frame: &mut Frame<'_>, area: Rect, title: &str, body: &[String]) {
    let popup = centered_popup(area, popup_width(body), body.len() + 2);
    frame.render_widget(Clear, popup);

    let mut lines: Vec<Line<'_>> = body.iter().map(|text| Line::from(text.as_str())).collect();
    if let Some(first) = lines.first_mut() {
        *first = first.clone().style(
            Style::default()
                .fg(THEME.menu_title)
                .add_modifier(Modifier::BOLD),
        );
    }

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(
                Block::bordered()
                    .title(title)
                    .border_style(Style::default().fg(THEME.menu_footer)),
            ),
        popup,
    );
}

/// Widest line plus border and one column of padding on each side.
fn popup_width(body: &[String]) -> usize {
    body.iter().map(|line| line.width()).max().unwrap_or(0) + 4
}

fn centered_popup(area: Rect, width: usize, height: usize) -> Rect {
    let width = u16::try_from(width).unwrap_or(u16::MAX).min(area.width);
    let height = u16::try_from(height).unwrap_or(u16::MAX).min(area.height);

    let [_, mid, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height),
        Constraint::Fill(1),
    ])
    .areas(area);

    let [_, center, _] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(width),
        Constraint::Fill(1),
    ])
    .areas(mid);

    center
}

#[cfg(test)]
mod tests {
    use ratatui::layout::Rect;

    use super::{centered_popup, popup_width};

    #[test]
    fn popup_width_uses_display_width() {
        let body = vec!["abc".to_owned(), "▲▲▲▲▲".to_owned()];
        assert_eq!(popup_width(&body), 9);
    }

    #[test]
    fn popup_is_centered_and_clamped() {
        let area = Rect::new(0, 0, 40, 20);

        let popup = centered_popup(area, 10, 6);
        assert_eq!((popup.width, popup.height), (10, 6));
        assert_eq!((popup.x, popup.y), (15, 7));

        let clamped = centered_popup(area, 100, 100);
        assert_eq!(clamped, area);
    }
}
