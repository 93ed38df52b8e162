use crossterm::event::{KeyCode, KeyEvent};

use crate::ops::token::{self, CardKind};
use crate::sync::worker::SyncRequest;
use crate::sync::{self, DropOutcome, GesturePhase, ReorderTarget};

use crate::tui::app::{App, BoardRow, Mode, MoveState};

use super::*;

/// Enter MOVE mode for the card under the cursor. The gesture works on the
/// card's sibling list; single-item lists have nowhere to go.
pub(super) fn enter_move_mode(app: &mut App) {
    let Some(row) = app.current_row() else {
        return;
    };

    let (kind, source_id, target, sibling_ids) = match row {
        BoardRow::Project { project } => {
            let ids: Vec<String> = app.view.projects.iter().map(|p| p.id.clone()).collect();
            let id = app.view.projects[project].id.clone();
            (CardKind::Project, id, ReorderTarget::Projects, ids)
        }
        BoardRow::Product { project, product } => {
            let owner = &app.view.projects[project];
            let ids: Vec<String> = owner.products.iter().map(|p| p.id.clone()).collect();
            let id = owner.products[product].id.clone();
            (
                CardKind::Product,
                id,
                ReorderTarget::Products {
                    project_id: owner.id.clone(),
                },
                ids,
            )
        }
        BoardRow::Stage {
            project,
            product,
            stage,
        } => {
            let owner = &app.view.projects[project].products[product];
            let ids: Vec<String> = owner.stages.iter().map(|s| s.id.clone()).collect();
            let id = owner.stages[stage].id.clone();
            (
                CardKind::Stage,
                id,
                ReorderTarget::Stages {
                    product_id: owner.id.clone(),
                },
                ids,
            )
        }
    };

    if sibling_ids.len() < 2 {
        return;
    }
    let Some(origin) = sibling_ids.iter().position(|id| *id == source_id) else {
        return;
    };

    let held = token::encode(kind, &source_id);
    app.gesture = GesturePhase::Dragging {
        token: held.clone(),
    };
    app.move_state = Some(MoveState {
        token: held,
        target,
        source_id,
        sibling_ids,
        origin,
        slot: origin,
    });
    app.mode = Mode::Move;
}

pub(super) fn handle_move(app: &mut App, key: KeyEvent) {
    match key.code {
        // Drop the card
        KeyCode::Enter | KeyCode::Char('m') => confirm_move(app),
        // Abandon the gesture; nothing was mutated
        KeyCode::Esc => cancel_move(app),
        KeyCode::Char('j') | KeyCode::Down => shift_slot(app, 1),
        KeyCode::Char('k') | KeyCode::Up => shift_slot(app, -1),
        KeyCode::Char('g') | KeyCode::Home => jump_slot(app, true),
        KeyCode::Char('G') | KeyCode::End => jump_slot(app, false),
        _ => {}
    }
}

fn shift_slot(app: &mut App, direction: i32) {
    if let Some(ms) = &mut app.move_state {
        let last = ms.sibling_ids.len() as i32 - 1;
        ms.slot = (ms.slot as i32 + direction).clamp(0, last) as usize;
    }
    preview_changed(app);
}

fn jump_slot(app: &mut App, to_top: bool) {
    if let Some(ms) = &mut app.move_state {
        ms.slot = if to_top { 0 } else { ms.sibling_ids.len() - 1 };
    }
    preview_changed(app);
}

fn preview_changed(app: &mut App) {
    let held = app.move_state.as_ref().map(|ms| ms.token.clone());
    app.refresh_view();
    if let Some(held) = held {
        app.follow_token(&held);
    }
}

/// Confirm the drop: resolve it against the committed board, apply the plan
/// optimistically (snapshot + flat records), then hand the persistence call
/// to the worker. A slot equal to the origin is the no-movement case.
fn confirm_move(app: &mut App) {
    let Some(ms) = app.move_state.take() else {
        app.mode = Mode::Navigate;
        return;
    };
    app.mode = Mode::Navigate;

    let target_id = if ms.slot == ms.origin {
        None
    } else {
        Some(ms.sibling_ids[ms.slot].clone())
    };

    match sync::resolve_drop(&app.board, &ms.target, &ms.source_id, target_id.as_deref()) {
        DropOutcome::Cancelled => {
            app.gesture = GesturePhase::Idle;
        }
        DropOutcome::Planned(plan) => {
            sync::apply_plan(&mut app.board, &mut app.records, &plan);
            let seq = app.sync.submit(SyncRequest::Reorder(plan));
            app.gesture = GesturePhase::Persisting { seq };
        }
    }

    app.refresh_view();
    app.follow_token(&ms.token);
}

fn cancel_move(app: &mut App) {
    app.move_state = None;
    app.gesture = GesturePhase::Idle;
    app.mode = Mode::Navigate;
    app.refresh_view();
}
