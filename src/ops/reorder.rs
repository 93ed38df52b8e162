//! The reorder engine.
//!
//! One list-move function shared by all three board levels; only the
//! identity scheme and the sibling list passed in differ.

use crate::model::board::{ProductCard, ProjectCard};
use crate::model::stage::StageRecord;

/// An entity that lives in an ordered sibling list.
pub trait SiblingItem {
    fn ident(&self) -> &str;
    fn order(&self) -> Option<i64>;
    fn set_order(&mut self, order: i64);
}

impl SiblingItem for StageRecord {
    fn ident(&self) -> &str {
        &self.id
    }
    fn order(&self) -> Option<i64> {
        self.order
    }
    fn set_order(&mut self, order: i64) {
        self.order = Some(order);
    }
}

impl SiblingItem for ProductCard {
    fn ident(&self) -> &str {
        &self.id
    }
    fn order(&self) -> Option<i64> {
        self.order
    }
    fn set_order(&mut self, order: i64) {
        self.order = Some(order);
    }
}

impl SiblingItem for ProjectCard {
    fn ident(&self) -> &str {
        &self.id
    }
    fn order(&self) -> Option<i64> {
        self.order
    }
    fn set_order(&mut self, order: i64) {
        self.order = Some(order);
    }
}

/// Move the item identified by `source_id` to the slot currently occupied by
/// `target_id` (list move, not swap: everything between the two positions
/// shifts by one), then reassign every item's order index to its new
/// position, 0-based and contiguous.
///
/// An unknown id or `source_id == target_id` is the cancelled/no-movement
/// case: the input order comes back untouched, original indices included.
/// The input list is never mutated.
pub fn move_and_reindex<T: SiblingItem + Clone>(
    list: &[T],
    source_id: &str,
    target_id: &str,
) -> Vec<T> {
    let mut out: Vec<T> = list.to_vec();
    if source_id == target_id {
        return out;
    }
    let source = out.iter().position(|item| item.ident() == source_id);
    let target = out.iter().position(|item| item.ident() == target_id);
    let (Some(source), Some(target)) = (source, target) else {
        return out;
    };

    let item = out.remove(source);
    out.insert(target, item);
    for (index, item) in out.iter_mut().enumerate() {
        item.set_order(index as i64);
    }
    out
}
