use crossterm::event::{KeyCode, KeyEvent};

use crate::model::project::ProjectStatus;

use crate::tui::app::{App, Mode};

use super::*;

pub(super) fn open_filter(app: &mut App) {
    app.filter_cursor = 0;
    app.mode = Mode::Filter;
}

/// Multi-select checkboxes over the closed project-status set. Toggles apply
/// and persist immediately; filtering never touches card order.
pub(super) fn handle_filter(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            let last = ProjectStatus::ALL.len() - 1;
            app.filter_cursor = (app.filter_cursor + 1).min(last);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.filter_cursor = app.filter_cursor.saturating_sub(1);
        }
        KeyCode::Char(' ') | KeyCode::Enter => {
            let status = ProjectStatus::ALL[app.filter_cursor];
            app.filter.toggle(status);
            app.prefs.save_status_filter(&app.filter);
            app.rebuild_board();
        }
        KeyCode::Char('a') => {
            app.filter.show_all();
            app.prefs.save_status_filter(&app.filter);
            app.rebuild_board();
        }
        KeyCode::Esc | KeyCode::Char('f') | KeyCode::Char('q') => {
            app.mode = Mode::Navigate;
        }
        _ => {}
    }
}
