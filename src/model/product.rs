use serde::{Deserialize, Serialize};

/// Product lifecycle status. Updates are concurrency-controlled by the
/// product's version field, so a stale write is rejected by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    #[default]
    New,
    Inwork,
    Paused,
    Done,
}

impl ProductStatus {
    pub const ALL: [ProductStatus; 4] = [
        ProductStatus::New,
        ProductStatus::Inwork,
        ProductStatus::Paused,
        ProductStatus::Done,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ProductStatus::New => "new",
            ProductStatus::Inwork => "inwork",
            ProductStatus::Paused => "paused",
            ProductStatus::Done => "done",
        }
    }

    pub fn parse(s: &str) -> Option<ProductStatus> {
        ProductStatus::ALL.into_iter().find(|st| st.label() == s)
    }

    pub fn next(self) -> ProductStatus {
        match self {
            ProductStatus::New => ProductStatus::Inwork,
            ProductStatus::Inwork => ProductStatus::Paused,
            ProductStatus::Paused => ProductStatus::Done,
            ProductStatus::Done => ProductStatus::New,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_uses_lowercase_wire_names() {
        assert_eq!(
            serde_json::to_string(&ProductStatus::Inwork).unwrap(),
            r#""inwork""#
        );
        let parsed: ProductStatus = serde_json::from_str(r#""done""#).unwrap();
        assert_eq!(parsed, ProductStatus::Done);
    }

    #[test]
    fn cycle_returns_to_start() {
        let mut cur = ProductStatus::New;
        for _ in 0..ProductStatus::ALL.len() {
            cur = cur.next();
        }
        assert_eq!(cur, ProductStatus::New);
    }
}
