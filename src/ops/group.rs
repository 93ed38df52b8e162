//! Grouping and sibling ordering for the flat board feed.
//!
//! Pure functions over the fetched record list; no network or storage
//! access, unit-testable with literal fixtures.

use indexmap::IndexMap;

use crate::model::stage::StageRecord;

/// Bucket records by owning project, preserving feed order both across
/// buckets and within each bucket. Placeholder rows are kept: they are the
/// only witness of an otherwise empty project.
pub fn group_by_project(records: &[StageRecord]) -> IndexMap<String, Vec<StageRecord>> {
    let mut groups: IndexMap<String, Vec<StageRecord>> = IndexMap::new();
    for record in records {
        groups
            .entry(record.project_id.clone())
            .or_default()
            .push(record.clone());
    }
    groups
}

/// Bucket one project's records by owning product. Placeholder rows carry no
/// real work and are dropped before grouping, as are rows without a product.
pub fn group_by_product(records: &[StageRecord]) -> IndexMap<String, Vec<StageRecord>> {
    let mut groups: IndexMap<String, Vec<StageRecord>> = IndexMap::new();
    for record in records {
        if record.is_placeholder() || record.product_id.is_empty() {
            continue;
        }
        groups
            .entry(record.product_id.clone())
            .or_default()
            .push(record.clone());
    }
    groups
}

/// Stable ascending sort by order index. Items with no index sort last via a
/// large sentinel and keep their relative input order among themselves.
pub fn sort_by_sibling_order<T>(list: &mut [T], order_of: impl Fn(&T) -> Option<i64>) {
    list.sort_by_key(|item| order_of(item).unwrap_or(i64::MAX));
}
