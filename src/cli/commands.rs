use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::model::product::ProductStatus;
use crate::model::project::ProjectStatus;

#[derive(Parser)]
#[command(name = "gy", about = concat!("[#] gantry v", env!("CARGO_PKG_VERSION"), " - the board lives on the server"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different config directory
    #[arg(short = 'C', long = "config-dir", global = true)]
    pub config_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the project board
    Board,
    /// Move a card to the slot of another card in the same sibling list
    Mv(MvArgs),
    /// Change a project or product status
    Status(StatusCmd),
    /// Store the server URL and session token
    Login(LoginArgs),
}

#[derive(Args)]
pub struct MvArgs {
    /// What is being moved
    #[arg(value_enum)]
    pub kind: KindArg,
    /// Id of the card to move
    pub id: String,
    /// Id of the sibling currently occupying the destination slot
    pub target: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum KindArg {
    Project,
    Product,
    Stage,
}

#[derive(Args)]
pub struct StatusCmd {
    #[command(subcommand)]
    pub target: StatusTarget,
}

#[derive(Subcommand)]
pub enum StatusTarget {
    /// Set a project's status
    Project {
        id: String,
        #[arg(value_enum)]
        status: ProjectStatusArg,
    },
    /// Set a product's status
    Product {
        project_id: String,
        id: String,
        #[arg(value_enum)]
        status: ProductStatusArg,
    },
}

#[derive(Args)]
pub struct LoginArgs {
    /// Bearer token issued by the tracking server
    #[arg(long)]
    pub token: String,
    /// Server base URL (kept from the existing config when omitted)
    #[arg(long)]
    pub server: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ProjectStatusArg {
    Planned,
    Active,
    Paused,
    Done,
    Archived,
}

impl From<ProjectStatusArg> for ProjectStatus {
    fn from(arg: ProjectStatusArg) -> Self {
        match arg {
            ProjectStatusArg::Planned => ProjectStatus::Planned,
            ProjectStatusArg::Active => ProjectStatus::Active,
            ProjectStatusArg::Paused => ProjectStatus::Paused,
            ProjectStatusArg::Done => ProjectStatus::Done,
            ProjectStatusArg::Archived => ProjectStatus::Archived,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ProductStatusArg {
    New,
    Inwork,
    Paused,
    Done,
}

impl From<ProductStatusArg> for ProductStatus {
    fn from(arg: ProductStatusArg) -> Self {
        match arg {
            ProductStatusArg::New => ProductStatus::New,
            ProductStatusArg::Inwork => ProductStatus::Inwork,
            ProductStatusArg::Paused => ProductStatus::Paused,
            ProductStatusArg::Done => ProductStatus::Done,
        }
    }
}
