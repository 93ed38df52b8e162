use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;

use super::centered_rect;

const KEYS: &[(&str, &str)] = &[
    ("j / k", "move cursor"),
    ("space", "collapse / expand card"),
    ("h / l", "collapse, jump to parent / expand"),
    ("m", "grab card, j/k to shift, enter to drop"),
    ("s", "cycle project or product status"),
    ("f", "status filter"),
    ("r", "refresh from server"),
    ("g / G", "first / last row"),
    ("esc", "dismiss message, cancel move"),
    ("q", "quit"),
];

pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let popup = centered_rect(48, KEYS.len() as u16 + 2, area);
    frame.render_widget(Clear, popup);

    let lines: Vec<Line> = KEYS
        .iter()
        .map(|(key, what)| {
            Line::from(vec![
                Span::styled(
                    format!(" {key:<8}"),
                    Style::default()
                        .fg(theme.highlight)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled((*what).to_string(), Style::default().fg(theme.text)),
            ])
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.highlight))
        .title(" keys ")
        .style(Style::default().bg(theme.background));
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}
