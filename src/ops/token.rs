//! Card token codec.
//!
//! Every draggable card on the board carries a token naming it across the
//! three levels: projects and products get a kind tag prefix, stages are
//! identified by their raw id (stages never change kind within one gesture,
//! so the bare id is unambiguous).

/// Which level of the board a card belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardKind {
    Project,
    Product,
    Stage,
}

const PROJECT_TAG: &str = "project-";
const PRODUCT_TAG: &str = "product-";

pub fn encode(kind: CardKind, id: &str) -> String {
    match kind {
        CardKind::Project => format!("{PROJECT_TAG}{id}"),
        CardKind::Product => format!("{PRODUCT_TAG}{id}"),
        CardKind::Stage => id.to_string(),
    }
}

/// Inverse of [`encode`]. Tokens without a known kind tag are stage tokens;
/// feeding anything not produced by `encode` is a programmer error.
pub fn decode(token: &str) -> (CardKind, &str) {
    if let Some(id) = token.strip_prefix(PROJECT_TAG) {
        (CardKind::Project, id)
    } else if let Some(id) = token.strip_prefix(PRODUCT_TAG) {
        (CardKind::Product, id)
    } else {
        (CardKind::Stage, token)
    }
}
