use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::ops::token::{self, CardKind};

use crate::tui::app::{App, Mode};

/// Bottom status row: mode and key hints on the left, sync state or the
/// error banner on the right.
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    let (mode_label, hints) = match app.mode {
        Mode::Navigate => (
            " NAV ",
            "j/k move · space fold · m grab · s status · f filter · r refresh · ? help",
        ),
        Mode::Move => (" MOVE ", "j/k shift · g/G ends · enter drop · esc cancel"),
        Mode::Filter => (" FILTER ", "j/k move · space toggle · a all · esc close"),
    };

    let mut spans = vec![
        Span::styled(
            mode_label,
            Style::default()
                .fg(theme.background)
                .bg(theme.highlight)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" {hints}"), Style::default().fg(theme.dim)),
    ];

    if let Some(ms) = &app.move_state {
        let (kind, id) = token::decode(&ms.token);
        let kind = match kind {
            CardKind::Project => "project",
            CardKind::Product => "product",
            CardKind::Stage => "stage",
        };
        spans.push(Span::styled(
            format!("  moving {kind} {id}"),
            Style::default().fg(theme.highlight),
        ));
    }

    let right = if let Some(error) = &app.error {
        Span::styled(
            format!(" {error} "),
            Style::default()
                .fg(theme.text_bright)
                .bg(theme.red)
                .add_modifier(Modifier::BOLD),
        )
    } else if app.loading {
        Span::styled(" syncing… ", Style::default().fg(theme.yellow))
    } else if app.gesture.is_persisting() {
        Span::styled(" saving order… ", Style::default().fg(theme.yellow))
    } else if let Some(message) = &app.status_message {
        Span::styled(format!(" {message} "), Style::default().fg(theme.green))
    } else {
        Span::raw("")
    };

    let used: usize = spans.iter().map(|s| s.content.width()).sum();
    let padding = (area.width as usize)
        .saturating_sub(used)
        .saturating_sub(right.content.width());
    spans.push(Span::styled(
        " ".repeat(padding),
        Style::default().bg(theme.background),
    ));
    spans.push(right);

    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(theme.background)),
        area,
    );
}
