use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::model::project::ProjectStatus;

use crate::tui::app::App;

use super::centered_rect;

/// The project-status filter: multi-select checkboxes over the closed
/// status set.
pub fn render_filter_popup(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let popup = centered_rect(34, ProjectStatus::ALL.len() as u16 + 2, area);
    frame.render_widget(Clear, popup);

    let mut lines = Vec::new();
    for (index, status) in ProjectStatus::ALL.into_iter().enumerate() {
        let checked = if app.filter.allows(status) { "x" } else { " " };
        let style = if index == app.filter_cursor {
            Style::default()
                .fg(theme.text_bright)
                .bg(theme.selection_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text)
        };
        lines.push(Line::from(Span::styled(
            format!(" [{checked}] {:<10}", status.label()),
            style,
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.highlight))
        .title(" project status ")
        .style(Style::default().bg(theme.background));
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}
