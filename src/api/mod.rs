pub mod http;

pub use http::HttpApi;

use thiserror::Error;

use crate::model::product::ProductStatus;
use crate::model::project::ProjectStatus;
use crate::model::stage::StageRecord;

/// Errors from the tracking server boundary.
///
/// Reorder and status failures are recoverable by re-fetch; a conflict means
/// the record changed under us and local edits must be discarded.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("no session token configured; run `gy login --token <token>` first")]
    MissingToken,

    #[error("no server configured; set [server] base_url in config.toml")]
    MissingServer,

    #[error("edit conflict: the record changed on the server, board refreshed")]
    Conflict,

    #[error("server returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("request failed: {0}")]
    Transport(String),

    #[error("could not decode server response: {0}")]
    Decode(String),
}

/// The data-access seam. The TUI and CLI only ever talk to the server
/// through this trait, so the sync layer is testable against an in-memory
/// implementation.
pub trait BoardApi {
    /// Fetch the full board feed (flat, denormalized stage rows)
    fn fetch_board(&self) -> Result<Vec<StageRecord>, ApiError>;

    /// Replace the stage order within one product
    fn reorder_stages(&self, product_id: &str, orders: &[(String, i64)]) -> Result<(), ApiError>;

    /// Replace the product order across the board
    fn reorder_products(&self, orders: &[(String, i64)]) -> Result<(), ApiError>;

    /// Replace the project order across the board
    fn reorder_projects(&self, orders: &[(String, i64)]) -> Result<(), ApiError>;

    fn set_project_status(&self, project_id: &str, status: ProjectStatus) -> Result<(), ApiError>;

    /// Product updates resend the last known version; the server rejects a
    /// stale one with a conflict.
    fn set_product_status(
        &self,
        project_id: &str,
        product_id: &str,
        version: i64,
        status: ProductStatus,
        order_index: Option<i64>,
    ) -> Result<(), ApiError>;
}
