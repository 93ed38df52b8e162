use crate::model::board::BoardSnapshot;
use crate::sync::{ReorderPlan, ReorderTarget};

/// Print the board tree, or the full snapshot as JSON.
pub fn print_board(board: &BoardSnapshot, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(board)?);
        return Ok(());
    }

    for project in &board.projects {
        let manager = project
            .manager
            .as_deref()
            .map(|m| format!("  ({m})"))
            .unwrap_or_default();
        println!(
            "{} [{}]{}",
            project.name,
            project.status.label(),
            manager
        );
        for product in &project.products {
            println!("  {} [{}]", product.name, product.status.label());
            for stage in &product.stages {
                println!(
                    "    - {}  {} -> {}",
                    stage.name,
                    stage.start_date.format("%Y-%m-%d"),
                    stage.end_date.format("%Y-%m-%d")
                );
            }
        }
    }
    Ok(())
}

/// Print the persisted sibling order after a move.
pub fn print_orders(plan: &ReorderPlan, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        let orders: Vec<serde_json::Value> = plan
            .orders
            .iter()
            .map(|(id, order)| serde_json::json!({"id": id, "order": order}))
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({"orders": orders}))?
        );
        return Ok(());
    }

    let scope = match &plan.target {
        ReorderTarget::Projects => "projects".to_string(),
        ReorderTarget::Products { project_id } => format!("products of {project_id}"),
        ReorderTarget::Stages { product_id } => format!("stages of {product_id}"),
    };
    println!("new order for {scope}:");
    for (id, order) in &plan.orders {
        println!("  {order}  {id}");
    }
    Ok(())
}
