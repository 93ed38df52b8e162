//! HTTP implementation of the data-access seam.

use serde::Serialize;

use crate::model::product::ProductStatus;
use crate::model::project::ProjectStatus;
use crate::model::stage::StageRecord;

use super::{ApiError, BoardApi};

/// Blocking client for the tracking server. All calls carry the bearer
/// token; construction fails early when the token or server is missing so
/// no request is ever attempted unauthenticated.
pub struct HttpApi {
    base_url: String,
    token: String,
}

impl HttpApi {
    pub fn new(base_url: &str, token: Option<&str>) -> Result<Self, ApiError> {
        let base_url = base_url.trim_end_matches('/');
        if base_url.is_empty() {
            return Err(ApiError::MissingServer);
        }
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(ApiError::MissingToken)?;
        Ok(HttpApi {
            base_url: base_url.to_string(),
            token: token.to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn put_json(&self, path: &str, body: impl Serialize) -> Result<(), ApiError> {
        let response = ureq::put(&self.url(path))
            .set("Authorization", &format!("Bearer {}", self.token))
            .set("Accept", "application/json")
            .send_json(body);

        match response {
            Ok(_) => Ok(()),
            Err(ureq::Error::Status(409, _)) => Err(ApiError::Conflict),
            Err(ureq::Error::Status(code, resp)) => {
                let body = resp.into_string().unwrap_or_default();
                Err(ApiError::Http { status: code, body })
            }
            Err(e) => Err(ApiError::Transport(e.to_string())),
        }
    }
}

impl BoardApi for HttpApi {
    fn fetch_board(&self) -> Result<Vec<StageRecord>, ApiError> {
        let response = ureq::get(&self.url("/projects/gantt"))
            .set("Authorization", &format!("Bearer {}", self.token))
            .set("Accept", "application/json")
            .call();

        match response {
            Ok(resp) => resp
                .into_json::<Vec<StageRecord>>()
                .map_err(|e| ApiError::Decode(e.to_string())),
            Err(ureq::Error::Status(code, resp)) => {
                let body = resp.into_string().unwrap_or_default();
                Err(ApiError::Http { status: code, body })
            }
            Err(e) => Err(ApiError::Transport(e.to_string())),
        }
    }

    fn reorder_stages(&self, product_id: &str, orders: &[(String, i64)]) -> Result<(), ApiError> {
        let path = format!("/projects/products/{product_id}/work-stages/order");
        self.put_json(&path, stage_order_body(orders))
    }

    fn reorder_products(&self, orders: &[(String, i64)]) -> Result<(), ApiError> {
        self.put_json("/projects/products/reorder", product_order_body(orders))
    }

    fn reorder_projects(&self, orders: &[(String, i64)]) -> Result<(), ApiError> {
        self.put_json("/projects/reorder", project_order_body(orders))
    }

    fn set_project_status(&self, project_id: &str, status: ProjectStatus) -> Result<(), ApiError> {
        let path = format!("/projects/{project_id}");
        self.put_json(&path, ProjectStatusBody { status })
    }

    fn set_product_status(
        &self,
        project_id: &str,
        product_id: &str,
        version: i64,
        status: ProductStatus,
        order_index: Option<i64>,
    ) -> Result<(), ApiError> {
        let path = format!("/projects/{project_id}/products/{product_id}");
        self.put_json(
            &path,
            ProductStatusBody {
                version,
                status,
                order_index,
            },
        )
    }
}

// ---------------------------------------------------------------------------
// Wire bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct StageOrder<'a> {
    id: &'a str,
    order: i64,
}

#[derive(Debug, Serialize)]
struct StageOrderBody<'a> {
    stages: Vec<StageOrder<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SiblingOrder<'a> {
    id: &'a str,
    order_index: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProductOrderBody<'a> {
    product_orders: Vec<SiblingOrder<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectOrderBody<'a> {
    project_orders: Vec<SiblingOrder<'a>>,
}

#[derive(Debug, Serialize)]
struct ProjectStatusBody {
    status: ProjectStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProductStatusBody {
    version: i64,
    status: ProductStatus,
    order_index: Option<i64>,
}

fn stage_order_body(orders: &[(String, i64)]) -> StageOrderBody<'_> {
    StageOrderBody {
        stages: orders
            .iter()
            .map(|(id, order)| StageOrder { id, order: *order })
            .collect(),
    }
}

fn sibling_orders(orders: &[(String, i64)]) -> Vec<SiblingOrder<'_>> {
    orders
        .iter()
        .map(|(id, order)| SiblingOrder {
            id,
            order_index: *order,
        })
        .collect()
}

fn product_order_body(orders: &[(String, i64)]) -> ProductOrderBody<'_> {
    ProductOrderBody {
        product_orders: sibling_orders(orders),
    }
}

fn project_order_body(orders: &[(String, i64)]) -> ProjectOrderBody<'_> {
    ProjectOrderBody {
        project_orders: sibling_orders(orders),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn orders() -> Vec<(String, i64)> {
        vec![("a".to_string(), 0), ("b".to_string(), 1)]
    }

    #[test]
    fn stage_body_matches_wire_shape() {
        let value = serde_json::to_value(stage_order_body(&orders())).unwrap();
        assert_eq!(
            value,
            json!({"stages": [{"id": "a", "order": 0}, {"id": "b", "order": 1}]})
        );
    }

    #[test]
    fn product_body_matches_wire_shape() {
        let value = serde_json::to_value(product_order_body(&orders())).unwrap();
        assert_eq!(
            value,
            json!({"productOrders": [
                {"id": "a", "orderIndex": 0},
                {"id": "b", "orderIndex": 1}
            ]})
        );
    }

    #[test]
    fn project_body_matches_wire_shape() {
        let value = serde_json::to_value(project_order_body(&orders())).unwrap();
        assert_eq!(
            value,
            json!({"projectOrders": [
                {"id": "a", "orderIndex": 0},
                {"id": "b", "orderIndex": 1}
            ]})
        );
    }

    #[test]
    fn status_bodies_match_wire_shape() {
        let value = serde_json::to_value(ProjectStatusBody {
            status: ProjectStatus::Paused,
        })
        .unwrap();
        assert_eq!(value, json!({"status": "paused"}));

        let value = serde_json::to_value(ProductStatusBody {
            version: 4,
            status: ProductStatus::Inwork,
            order_index: Some(2),
        })
        .unwrap();
        assert_eq!(
            value,
            json!({"version": 4, "status": "inwork", "orderIndex": 2})
        );
    }

    #[test]
    fn construction_requires_token_and_server() {
        assert!(matches!(
            HttpApi::new("https://track.example.com", None),
            Err(ApiError::MissingToken)
        ));
        assert!(matches!(
            HttpApi::new("https://track.example.com", Some("  ")),
            Err(ApiError::MissingToken)
        ));
        assert!(matches!(
            HttpApi::new("", Some("tok")),
            Err(ApiError::MissingServer)
        ));
        assert!(HttpApi::new("https://track.example.com/", Some("tok")).is_ok());
    }
}
