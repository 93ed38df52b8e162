use std::path::Path;

use crate::api::{ApiError, BoardApi, HttpApi};
use crate::io::config_io;
use crate::model::board::BoardSnapshot;
use crate::model::project::StatusFilter;
use crate::sync::{self, DropOutcome, ReorderTarget};

use super::commands::{Cli, Commands, KindArg, LoginArgs, MvArgs, StatusCmd, StatusTarget};
use super::output;

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let dir = config_io::config_dir(cli.config_dir.as_deref())?;
    match cli.command {
        Some(Commands::Board) => cmd_board(&dir, cli.json),
        Some(Commands::Mv(args)) => cmd_mv(&dir, args, cli.json),
        Some(Commands::Status(args)) => cmd_status(&dir, args),
        Some(Commands::Login(args)) => cmd_login(&dir, args),
        // No subcommand launches the TUI; handled in main
        None => Ok(()),
    }
}

fn client(dir: &Path) -> Result<HttpApi, Box<dyn std::error::Error>> {
    let config = config_io::read_config(dir)?;
    Ok(HttpApi::new(
        &config.server.base_url,
        config.auth.token.as_deref(),
    )?)
}

fn cmd_board(dir: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let api = client(dir)?;
    let records = api.fetch_board()?;
    let board = BoardSnapshot::build(&records, &StatusFilter::default());
    output::print_board(&board, json)
}

/// Resolve the card's sibling list, plan the move against the live board and
/// persist it. "no movement" is a report, not an error.
fn cmd_mv(dir: &Path, args: MvArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let api = client(dir)?;
    let records = api.fetch_board()?;
    let board = BoardSnapshot::build(&records, &StatusFilter::default());

    let target = match args.kind {
        KindArg::Project => ReorderTarget::Projects,
        KindArg::Product => {
            let owner = board
                .project_of_product(&args.id)
                .ok_or_else(|| format!("product not found: {}", args.id))?;
            ReorderTarget::Products {
                project_id: owner.id.clone(),
            }
        }
        KindArg::Stage => {
            let owner = board
                .projects
                .iter()
                .flat_map(|p| p.products.iter())
                .find(|product| product.stages.iter().any(|s| s.id == args.id))
                .ok_or_else(|| format!("stage not found: {}", args.id))?;
            ReorderTarget::Stages {
                product_id: owner.id.clone(),
            }
        }
    };

    match sync::resolve_drop(&board, &target, &args.id, Some(&args.target)) {
        DropOutcome::Cancelled => {
            println!("no movement");
            Ok(())
        }
        DropOutcome::Planned(plan) => {
            match &plan.target {
                ReorderTarget::Projects => api.reorder_projects(&plan.orders)?,
                ReorderTarget::Products { .. } => api.reorder_products(&plan.orders)?,
                ReorderTarget::Stages { product_id } => {
                    api.reorder_stages(product_id, &plan.orders)?
                }
            }
            output::print_orders(&plan, json)
        }
    }
}

fn cmd_status(dir: &Path, args: StatusCmd) -> Result<(), Box<dyn std::error::Error>> {
    let api = client(dir)?;
    match args.target {
        StatusTarget::Project { id, status } => {
            let status = status.into();
            api.set_project_status(&id, status)?;
            println!("project {} -> {}", id, status.label());
        }
        StatusTarget::Product {
            project_id,
            id,
            status,
        } => {
            // The server checks the product version; fetch the current one
            let records = api.fetch_board()?;
            let board = BoardSnapshot::build(&records, &StatusFilter::default());
            let card = board
                .product(&id)
                .ok_or_else(|| format!("product not found: {}", id))?;

            let status = status.into();
            match api.set_product_status(&project_id, &id, card.version, status, card.order) {
                Err(ApiError::Conflict) => {
                    return Err("edit conflict: the product changed on the server; rerun to retry against the fresh version".into());
                }
                other => other?,
            }
            println!("product {} -> {}", id, status.label());
        }
    }
    Ok(())
}

fn cmd_login(dir: &Path, args: LoginArgs) -> Result<(), Box<dyn std::error::Error>> {
    config_io::write_login(dir, &args.token, args.server.as_deref())?;
    println!("token stored in {}", dir.join("config.toml").display());
    Ok(())
}
