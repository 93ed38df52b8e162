//! Optimistic reorder coordination.
//!
//! A reorder gesture runs `Idle → Dragging → (drop) → Persisting` and ends
//! `Committed` or `RolledBack`. The local mutation is applied before any
//! network call; a failed persistence discards the optimistic state by
//! re-fetching the board, which is always the source of truth. There is no
//! retry and no abortion of superseded in-flight requests.

pub mod worker;

use crate::model::board::BoardSnapshot;
use crate::model::stage::StageRecord;
use crate::ops::reorder::{SiblingItem, move_and_reindex};

/// Which sibling list a gesture operates on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReorderTarget {
    Projects,
    Products { project_id: String },
    Stages { product_id: String },
}

/// The computed outcome of a drop: the new order index for every sibling in
/// the affected list. Re-submitting the same plan is safe; the server treats
/// it as a full replacement of sibling order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderPlan {
    pub target: ReorderTarget,
    pub orders: Vec<(String, i64)>,
}

/// Result of resolving a drop event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// No target, unknown ids, or no movement: straight back to idle
    Cancelled,
    Planned(ReorderPlan),
}

/// Where the current gesture stands. `Committed`/`RolledBack` are momentary
/// and collapse back to `Idle` once the outcome is handled.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GesturePhase {
    #[default]
    Idle,
    Dragging {
        token: String,
    },
    Persisting {
        seq: u64,
    },
}

impl GesturePhase {
    pub fn is_dragging(&self) -> bool {
        matches!(self, GesturePhase::Dragging { .. })
    }

    pub fn is_persisting(&self) -> bool {
        matches!(self, GesturePhase::Persisting { .. })
    }
}

/// Resolve a drop event into a plan, or the cancelled/no-movement case when
/// the target is absent, equals the source, or the move changes nothing.
pub fn resolve_drop(
    board: &BoardSnapshot,
    target: &ReorderTarget,
    source_id: &str,
    target_id: Option<&str>,
) -> DropOutcome {
    let Some(target_id) = target_id else {
        return DropOutcome::Cancelled;
    };
    if target_id == source_id {
        return DropOutcome::Cancelled;
    }
    let orders = match target {
        ReorderTarget::Projects => plan_siblings(&board.projects, source_id, target_id),
        ReorderTarget::Products { project_id } => board
            .project(project_id)
            .and_then(|p| plan_siblings(&p.products, source_id, target_id)),
        ReorderTarget::Stages { product_id } => board
            .product(product_id)
            .and_then(|p| plan_siblings(&p.stages, source_id, target_id)),
    };
    match orders {
        Some(orders) => DropOutcome::Planned(ReorderPlan {
            target: target.clone(),
            orders,
        }),
        None => DropOutcome::Cancelled,
    }
}

fn plan_siblings<T: SiblingItem + Clone>(
    list: &[T],
    source_id: &str,
    target_id: &str,
) -> Option<Vec<(String, i64)>> {
    let moved = move_and_reindex(list, source_id, target_id);
    let unchanged = moved
        .iter()
        .map(SiblingItem::ident)
        .eq(list.iter().map(SiblingItem::ident));
    if unchanged {
        return None;
    }
    Some(
        moved
            .iter()
            .enumerate()
            .map(|(index, item)| (item.ident().to_string(), index as i64))
            .collect(),
    )
}

/// Apply a plan to local state: rewrite the affected sibling list inside the
/// snapshot and patch the flat record collection so every view derived from
/// it stays consistent. Records outside the affected group are untouched.
/// This runs before the persistence request is issued.
pub fn apply_plan(board: &mut BoardSnapshot, records: &mut [StageRecord], plan: &ReorderPlan) {
    match &plan.target {
        ReorderTarget::Projects => {
            reindex_siblings(&mut board.projects, &plan.orders);
            for record in records.iter_mut() {
                if let Some(order) = order_of(plan, &record.project_id) {
                    record.project_order = Some(order);
                }
            }
        }
        ReorderTarget::Products { project_id } => {
            if let Some(project) = board.project_mut(project_id) {
                reindex_siblings(&mut project.products, &plan.orders);
            }
            for record in records.iter_mut().filter(|r| &r.project_id == project_id) {
                if let Some(order) = order_of(plan, &record.product_id) {
                    record.product_order = Some(order);
                }
            }
        }
        ReorderTarget::Stages { product_id } => {
            if let Some(product) = board.product_mut(product_id) {
                reindex_siblings(&mut product.stages, &plan.orders);
            }
            for record in records.iter_mut().filter(|r| &r.product_id == product_id) {
                if let Some(order) = order_of(plan, &record.id) {
                    record.order = Some(order);
                }
            }
        }
    }
}

fn order_of(plan: &ReorderPlan, id: &str) -> Option<i64> {
    plan.orders
        .iter()
        .find(|(plan_id, _)| plan_id == id)
        .map(|(_, order)| *order)
}

fn reindex_siblings<T: SiblingItem>(list: &mut [T], orders: &[(String, i64)]) {
    for item in list.iter_mut() {
        if let Some(order) = orders
            .iter()
            .find(|(id, _)| id == item.ident())
            .map(|(_, order)| *order)
        {
            item.set_order(order);
        }
    }
    list.sort_by_key(|item| item.order().unwrap_or(i64::MAX));
}
