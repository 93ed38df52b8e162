pub mod board_view;
pub mod filter_popup;
pub mod help_overlay;
pub mod status_row;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use super::app::{App, Mode};

/// Main render function — dispatches to sub-renderers
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: title bar | board | status row
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    render_title_bar(frame, app, chunks[0]);
    board_view::render_board(frame, app, chunks[1]);
    status_row::render_status_row(frame, app, chunks[2]);

    if app.mode == Mode::Filter {
        filter_popup::render_filter_popup(frame, app, area);
    }
    if app.show_help {
        help_overlay::render_help(frame, app, area);
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let projects = app.view.projects.len();
    let filter_note = if app.filter.all_visible() {
        String::new()
    } else {
        "  [filtered]".to_string()
    };

    let line = Line::from(vec![
        Span::styled(
            " gantry ",
            Style::default()
                .fg(theme.background)
                .bg(theme.highlight)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {} projects", projects),
            Style::default().fg(theme.text).bg(theme.background),
        ),
        Span::styled(
            filter_note,
            Style::default().fg(theme.yellow).bg(theme.background),
        ),
    ]);
    frame.render_widget(
        Paragraph::new(line).style(Style::default().bg(theme.background)),
        area,
    );
}

/// Centered rectangle for popups
pub(super) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect {
        x: area.x + (area.width.saturating_sub(w)) / 2,
        y: area.y + (area.height.saturating_sub(h)) / 2,
        width: w,
        height: h,
    }
}
