use indexmap::IndexMap;
use serde::Serialize;

use crate::ops::group::{group_by_product, group_by_project, sort_by_sibling_order};

use super::product::ProductStatus;
use super::project::{ProjectStatus, StatusFilter};
use super::stage::StageRecord;

/// A product on the board: identity plus its ordered stage list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductCard {
    pub id: String,
    pub name: String,
    pub status: ProductStatus,
    pub version: i64,
    pub order: Option<i64>,
    pub stages: Vec<StageRecord>,
}

/// A project on the board: identity plus its ordered product list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectCard {
    pub id: String,
    pub name: String,
    pub status: ProjectStatus,
    pub manager: Option<String>,
    pub order: Option<i64>,
    pub products: Vec<ProductCard>,
}

/// The derived three-level board tree. Never persisted; rebuilt whenever the
/// flat record list or the status filter changes, and patched in place by
/// reorders. The server remains the source of truth and the snapshot is
/// always reconcilable by re-fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BoardSnapshot {
    pub projects: Vec<ProjectCard>,
}

impl BoardSnapshot {
    /// Group the flat record list into the project → product → stage tree.
    ///
    /// The status filter drops whole projects before grouping. Placeholder
    /// rows never appear as stages but still witness their product and
    /// project, so empty containers stay visible.
    pub fn build(records: &[StageRecord], filter: &StatusFilter) -> Self {
        let mut projects = Vec::new();
        for (project_id, rows) in group_by_project(records) {
            let head = &rows[0];
            if !filter.allows(head.project_status) {
                continue;
            }

            // Product identity comes from the first row that mentions it,
            // placeholders included; insertion order is preserved.
            let mut heads: IndexMap<&str, &StageRecord> = IndexMap::new();
            for row in &rows {
                if !row.product_id.is_empty() {
                    heads.entry(row.product_id.as_str()).or_insert(row);
                }
            }

            let mut stage_groups = group_by_product(&rows);
            let mut products: Vec<ProductCard> = heads
                .iter()
                .map(|(product_id, head)| {
                    let mut stages = stage_groups.shift_remove(*product_id).unwrap_or_default();
                    sort_by_sibling_order(&mut stages, |s: &StageRecord| s.order);
                    ProductCard {
                        id: (*product_id).to_string(),
                        name: head.product_name.clone(),
                        status: head.product_status,
                        version: head.product_version,
                        order: head.product_order,
                        stages,
                    }
                })
                .collect();
            sort_by_sibling_order(&mut products, |p: &ProductCard| p.order);

            projects.push(ProjectCard {
                id: project_id,
                name: head.project_name.clone(),
                status: head.project_status,
                manager: head.project_manager.clone(),
                order: head.project_order,
                products,
            });
        }
        sort_by_sibling_order(&mut projects, |p: &ProjectCard| p.order);
        BoardSnapshot { projects }
    }

    pub fn project(&self, project_id: &str) -> Option<&ProjectCard> {
        self.projects.iter().find(|p| p.id == project_id)
    }

    pub fn project_mut(&mut self, project_id: &str) -> Option<&mut ProjectCard> {
        self.projects.iter_mut().find(|p| p.id == project_id)
    }

    pub fn product(&self, product_id: &str) -> Option<&ProductCard> {
        self.projects
            .iter()
            .flat_map(|p| p.products.iter())
            .find(|pd| pd.id == product_id)
    }

    pub fn product_mut(&mut self, product_id: &str) -> Option<&mut ProductCard> {
        self.projects
            .iter_mut()
            .flat_map(|p| p.products.iter_mut())
            .find(|pd| pd.id == product_id)
    }

    /// The project owning a given product
    pub fn project_of_product(&self, product_id: &str) -> Option<&ProjectCard> {
        self.projects
            .iter()
            .find(|p| p.products.iter().any(|pd| pd.id == product_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: &str, name: &str, order: Option<i64>, product: &str, project: &str) -> StageRecord {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": name,
            "order": order,
            "productId": product,
            "productName": format!("{} name", product),
            "projectId": project,
            "projectName": format!("{} name", project),
        }))
        .unwrap()
    }

    #[test]
    fn builds_three_level_tree_in_order() {
        let mut r1 = rec("s0", "Cut", Some(1), "pd1", "pr1");
        r1.product_order = Some(1);
        r1.project_order = Some(0);
        let mut r2 = rec("s1", "Weld", Some(0), "pd1", "pr1");
        r2.product_order = Some(1);
        r2.project_order = Some(0);
        let mut r3 = rec("s2", "Paint", Some(0), "pd2", "pr1");
        r3.product_order = Some(0);
        r3.project_order = Some(0);

        let board = BoardSnapshot::build(&[r1, r2, r3], &StatusFilter::default());
        assert_eq!(board.projects.len(), 1);
        let products: Vec<&str> = board.projects[0]
            .products
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(products, vec!["pd2", "pd1"]);
        let stages: Vec<&str> = board.projects[0].products[1]
            .stages
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(stages, vec!["s1", "s0"]);
    }

    #[test]
    fn placeholder_keeps_product_visible_but_contributes_no_stage() {
        let empty = rec("placeholder-pd9", "", None, "pd9", "pr1");
        let real = rec("s1", "Drill", Some(0), "pd1", "pr1");
        let board = BoardSnapshot::build(&[empty, real], &StatusFilter::default());

        let project = &board.projects[0];
        assert_eq!(project.products.len(), 2);
        let pd9 = project.products.iter().find(|p| p.id == "pd9").unwrap();
        assert!(pd9.stages.is_empty());
    }

    #[test]
    fn filter_drops_whole_projects_without_touching_order() {
        let mut active = rec("s1", "Cut", Some(0), "pd1", "pr1");
        active.project_status = ProjectStatus::Active;
        let mut archived = rec("s2", "Old", Some(0), "pd2", "pr2");
        archived.project_status = ProjectStatus::Archived;

        let mut filter = StatusFilter::default();
        filter.toggle(ProjectStatus::Archived);

        let board = BoardSnapshot::build(&[archived.clone(), active.clone()], &filter);
        assert_eq!(board.projects.len(), 1);
        assert_eq!(board.projects[0].id, "pr1");

        // With the filter open again, both projects come back
        let board = BoardSnapshot::build(&[archived, active], &StatusFilter::default());
        assert_eq!(board.projects.len(), 2);
    }
}
