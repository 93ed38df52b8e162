use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::io::prefs;
use crate::sync::worker::SyncRequest;

use crate::tui::app::{App, BoardRow};

use super::*;

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) | (_, KeyCode::Char('q')) => {
            app.should_quit = true;
        }
        (_, KeyCode::Char('j') | KeyCode::Down) => move_cursor(app, 1),
        (_, KeyCode::Char('k') | KeyCode::Up) => move_cursor(app, -1),
        (_, KeyCode::Char('g') | KeyCode::Home) => app.cursor = 0,
        (_, KeyCode::Char('G') | KeyCode::End) => {
            app.cursor = app.rows.len().saturating_sub(1);
        }
        (_, KeyCode::Char(' ') | KeyCode::Enter) => toggle_collapse(app),
        (_, KeyCode::Char('h') | KeyCode::Left) => collapse_or_ascend(app),
        (_, KeyCode::Char('l') | KeyCode::Right) => expand(app),
        (_, KeyCode::Char('m')) => enter_move_mode(app),
        (_, KeyCode::Char('s')) => cycle_status(app),
        (_, KeyCode::Char('f')) => open_filter(app),
        (_, KeyCode::Char('r')) => {
            app.error = None;
            app.refetch();
        }
        (_, KeyCode::Char('?')) => app.show_help = true,
        (_, KeyCode::Esc) => {
            app.error = None;
            app.status_message = None;
        }
        _ => {}
    }
}

pub(super) fn move_cursor(app: &mut App, direction: i32) {
    if app.rows.is_empty() {
        return;
    }
    let last = app.rows.len() as i32 - 1;
    app.cursor = (app.cursor as i32 + direction).clamp(0, last) as usize;
}

/// Space/Enter: flip the collapse state of the project or product under the
/// cursor. The new set is persisted immediately, best effort.
pub(super) fn toggle_collapse(app: &mut App) {
    match app.current_row() {
        Some(BoardRow::Project { project }) => {
            let id = app.view.projects[project].id.clone();
            app.collapsed_projects = prefs::toggle(&app.collapsed_projects, &id);
            app.prefs
                .save_set(prefs::COLLAPSED_PROJECTS, &app.collapsed_projects);
            app.refresh_view();
        }
        Some(BoardRow::Product { project, product }) => {
            let id = app.view.projects[project].products[product].id.clone();
            app.collapsed_products = prefs::toggle(&app.collapsed_products, &id);
            app.prefs
                .save_set(prefs::COLLAPSED_PRODUCTS, &app.collapsed_products);
            app.refresh_view();
        }
        _ => {}
    }
}

/// `h`: collapse the card under the cursor, or jump to its parent when it is
/// a stage (stages have no collapse state of their own).
pub(super) fn collapse_or_ascend(app: &mut App) {
    match app.current_row() {
        Some(BoardRow::Project { project }) => {
            let id = app.view.projects[project].id.clone();
            if !app.collapsed_projects.contains(&id) {
                app.collapsed_projects = prefs::toggle(&app.collapsed_projects, &id);
                app.prefs
                    .save_set(prefs::COLLAPSED_PROJECTS, &app.collapsed_projects);
                app.refresh_view();
            }
        }
        Some(BoardRow::Product { project, product }) => {
            let id = app.view.projects[project].products[product].id.clone();
            if app.collapsed_products.contains(&id) {
                // Already collapsed: go to the owning project row
                let token = app.row_token(BoardRow::Project { project });
                app.follow_token(&token);
            } else {
                app.collapsed_products = prefs::toggle(&app.collapsed_products, &id);
                app.prefs
                    .save_set(prefs::COLLAPSED_PRODUCTS, &app.collapsed_products);
                app.refresh_view();
            }
        }
        Some(BoardRow::Stage { project, product, .. }) => {
            let token = app.row_token(BoardRow::Product { project, product });
            app.follow_token(&token);
        }
        None => {}
    }
}

pub(super) fn expand(app: &mut App) {
    match app.current_row() {
        Some(BoardRow::Project { project }) => {
            let id = app.view.projects[project].id.clone();
            if app.collapsed_projects.contains(&id) {
                app.collapsed_projects = prefs::toggle(&app.collapsed_projects, &id);
                app.prefs
                    .save_set(prefs::COLLAPSED_PROJECTS, &app.collapsed_projects);
                app.refresh_view();
            }
        }
        Some(BoardRow::Product { project, product }) => {
            let id = app.view.projects[project].products[product].id.clone();
            if app.collapsed_products.contains(&id) {
                app.collapsed_products = prefs::toggle(&app.collapsed_products, &id);
                app.prefs
                    .save_set(prefs::COLLAPSED_PRODUCTS, &app.collapsed_products);
                app.refresh_view();
            }
        }
        _ => {}
    }
}

/// `s`: cycle the status of the project or product under the cursor. The
/// local records are patched first so the board reflects the change with no
/// latency; the persistence call follows, and any failure rolls back via
/// re-fetch in `pump_sync`.
pub(super) fn cycle_status(app: &mut App) {
    match app.current_row() {
        Some(BoardRow::Project { project }) => {
            let card = &app.view.projects[project];
            let id = card.id.clone();
            let next = card.status.next();
            for record in app.records.iter_mut().filter(|r| r.project_id == id) {
                record.project_status = next;
            }
            app.rebuild_board();
            app.sync.submit(SyncRequest::SetProjectStatus {
                project_id: id,
                status: next,
            });
            app.status_message = Some(format!("project status → {}", next.label()));
        }
        Some(BoardRow::Product { project, product }) => {
            let owner = app.view.projects[project].id.clone();
            let card = &app.view.projects[project].products[product];
            let id = card.id.clone();
            let next = card.status.next();
            let version = card.version;
            let order_index = card.order;
            for record in app.records.iter_mut().filter(|r| r.product_id == id) {
                record.product_status = next;
            }
            app.rebuild_board();
            app.sync.submit(SyncRequest::SetProductStatus {
                project_id: owner,
                product_id: id,
                version,
                status: next,
                order_index,
            });
            app.status_message = Some(format!("product status → {}", next.label()));
        }
        _ => {}
    }
}
