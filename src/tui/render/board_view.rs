use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::model::board::{ProductCard, ProjectCard};
use crate::model::stage::StageRecord;

use crate::tui::app::{App, BoardRow};

/// Render the three-level board tree
pub fn render_board(frame: &mut Frame, app: &mut App, area: Rect) {
    let theme = app.theme.clone();

    if app.rows.is_empty() {
        let message = if app.loading {
            " fetching board…"
        } else if app.filter.all_visible() {
            " No projects"
        } else {
            " no projects match the status filter"
        };
        let empty =
            Paragraph::new(message).style(Style::default().fg(theme.dim).bg(theme.background));
        frame.render_widget(empty, area);
        return;
    }

    // Clamp cursor and scroll to the visible window
    let visible_height = area.height as usize;
    app.cursor = app.cursor.min(app.rows.len() - 1);
    if app.cursor < app.scroll_offset {
        app.scroll_offset = app.cursor;
    } else if visible_height > 0 && app.cursor >= app.scroll_offset + visible_height {
        app.scroll_offset = app.cursor.saturating_sub(visible_height - 1);
    }

    let held_token = app.move_state.as_ref().map(|ms| ms.token.as_str());
    let end = app.rows.len().min(app.scroll_offset + visible_height);
    let mut lines: Vec<Line> = Vec::with_capacity(visible_height);

    for (index, row) in app.rows[app.scroll_offset..end]
        .iter()
        .copied()
        .enumerate()
        .map(|(offset, row)| (app.scroll_offset + offset, row))
    {
        let is_cursor = index == app.cursor;
        let is_held = held_token.is_some_and(|token| app.row_token(row) == token);

        let mut line = match row {
            BoardRow::Project { project } => {
                project_line(app, &app.view.projects[project], is_held)
            }
            BoardRow::Product { project, product } => {
                product_line(app, &app.view.projects[project].products[product], is_held)
            }
            BoardRow::Stage {
                project,
                product,
                stage,
            } => {
                let owner = &app.view.projects[project].products[product];
                stage_line(app, &owner.stages[stage], stage + 1 == owner.stages.len())
            }
        };

        if is_cursor {
            line = line.style(Style::default().bg(theme.selection_bg));
            pad_line(&mut line, area.width);
        }
        lines.push(line);
    }

    let paragraph = Paragraph::new(lines).style(Style::default().bg(theme.background));
    frame.render_widget(paragraph, area);
}

fn project_line<'a>(app: &App, card: &'a ProjectCard, is_held: bool) -> Line<'a> {
    let theme = &app.theme;
    let collapsed = app.collapsed_projects.contains(&card.id);
    let marker = if collapsed { "▸" } else { "▾" };
    let held_mark = if is_held { "◆ " } else { "" };

    let mut spans = vec![
        Span::styled(
            format!("{held_mark}{marker} "),
            Style::default().fg(if is_held { theme.highlight } else { theme.dim }),
        ),
        Span::styled(
            truncate(&card.name, 48),
            Style::default()
                .fg(theme.text_bright)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  [{}]", card.status.label()),
            Style::default().fg(theme.project_status_color(card.status)),
        ),
        Span::styled(
            format!("  {} products", card.products.len()),
            Style::default().fg(theme.dim),
        ),
    ];
    if let Some(manager) = &card.manager {
        spans.push(Span::styled(
            format!("  {}", truncate(manager, 24)),
            Style::default().fg(theme.purple),
        ));
    }
    Line::from(spans)
}

fn product_line<'a>(app: &App, card: &'a ProductCard, is_held: bool) -> Line<'a> {
    let theme = &app.theme;
    let collapsed = app.collapsed_products.contains(&card.id);
    let marker = if collapsed { "▸" } else { "▾" };
    let held_mark = if is_held { "◆ " } else { "" };

    Line::from(vec![
        Span::styled(
            format!("  {held_mark}{marker} "),
            Style::default().fg(if is_held { theme.highlight } else { theme.dim }),
        ),
        Span::styled(truncate(&card.name, 44), Style::default().fg(theme.text)),
        Span::styled(
            format!("  [{}]", card.status.label()),
            Style::default().fg(theme.product_status_color(card.status)),
        ),
        Span::styled(
            format!("  {} stages", card.stages.len()),
            Style::default().fg(theme.dim),
        ),
    ])
}

fn stage_line<'a>(app: &App, stage: &'a StageRecord, is_last: bool) -> Line<'a> {
    let theme = &app.theme;
    let branch = if is_last { "└─" } else { "├─" };

    Line::from(vec![
        Span::styled(format!("    {branch} "), Style::default().fg(theme.dim)),
        Span::styled(truncate(&stage.name, 40), Style::default().fg(theme.text)),
        Span::styled(
            format!(
                "  {} → {}",
                stage.start_date.format("%d %b"),
                stage.end_date.format("%d %b")
            ),
            Style::default().fg(theme.cyan),
        ),
    ])
}

/// Truncate to a display width, appending an ellipsis when cut
fn truncate(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > max_width.saturating_sub(1) {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Extend a line's background to the full row width
fn pad_line(line: &mut Line, width: u16) {
    let used: usize = line.spans.iter().map(|span| span.content.width()).sum();
    let remaining = (width as usize).saturating_sub(used);
    if remaining > 0 {
        line.push_span(Span::raw(" ".repeat(remaining)));
    }
}
