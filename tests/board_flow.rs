//! Integration tests for the optimistic reorder flow.
//!
//! Each test drives the real plan/apply/worker pipeline against an
//! in-memory backend, covering the commit path and the
//! rollback-by-refetch path.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use pretty_assertions::assert_eq;

use gantry::api::{ApiError, BoardApi};
use gantry::model::board::BoardSnapshot;
use gantry::model::product::ProductStatus;
use gantry::model::project::{ProjectStatus, StatusFilter};
use gantry::model::stage::StageRecord;
use gantry::sync::worker::{SyncHandle, SyncOutcome, SyncRequest};
use gantry::sync::{self, DropOutcome, ReorderTarget};

/// In-memory stand-in for the tracking server. Reorders mutate the stored
/// records the way the real server replaces sibling order wholesale.
struct FakeServer {
    records: Mutex<Vec<StageRecord>>,
    fail_persists: AtomicBool,
    calls: Mutex<Vec<String>>,
}

impl FakeServer {
    fn new(records: Vec<StageRecord>) -> Arc<Self> {
        Arc::new(FakeServer {
            records: Mutex::new(records),
            fail_persists: AtomicBool::new(false),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn check_failure(&self, call: String) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(call);
        if self.fail_persists.load(Ordering::SeqCst) {
            return Err(ApiError::Http {
                status: 500,
                body: "internal error".to_string(),
            });
        }
        Ok(())
    }
}

/// Worker-side handle; the test keeps its own `Arc` for assertions.
struct ServerHandle(Arc<FakeServer>);

impl BoardApi for ServerHandle {
    fn fetch_board(&self) -> Result<Vec<StageRecord>, ApiError> {
        Ok(self.0.records.lock().unwrap().clone())
    }

    fn reorder_stages(&self, product_id: &str, orders: &[(String, i64)]) -> Result<(), ApiError> {
        self.0.check_failure(format!("stages:{product_id}"))?;
        let mut records = self.0.records.lock().unwrap();
        for record in records.iter_mut().filter(|r| r.product_id == product_id) {
            if let Some((_, order)) = orders.iter().find(|(id, _)| *id == record.id) {
                record.order = Some(*order);
            }
        }
        Ok(())
    }

    fn reorder_products(&self, orders: &[(String, i64)]) -> Result<(), ApiError> {
        self.0.check_failure("products".to_string())?;
        let mut records = self.0.records.lock().unwrap();
        for record in records.iter_mut() {
            if let Some((_, order)) = orders.iter().find(|(id, _)| *id == record.product_id) {
                record.product_order = Some(*order);
            }
        }
        Ok(())
    }

    fn reorder_projects(&self, orders: &[(String, i64)]) -> Result<(), ApiError> {
        self.0.check_failure("projects".to_string())?;
        let mut records = self.0.records.lock().unwrap();
        for record in records.iter_mut() {
            if let Some((_, order)) = orders.iter().find(|(id, _)| *id == record.project_id) {
                record.project_order = Some(*order);
            }
        }
        Ok(())
    }

    fn set_project_status(&self, project_id: &str, status: ProjectStatus) -> Result<(), ApiError> {
        self.0.check_failure(format!("project-status:{project_id}"))?;
        let mut records = self.0.records.lock().unwrap();
        for record in records.iter_mut().filter(|r| r.project_id == project_id) {
            record.project_status = status;
        }
        Ok(())
    }

    fn set_product_status(
        &self,
        _project_id: &str,
        product_id: &str,
        version: i64,
        status: ProductStatus,
        _order_index: Option<i64>,
    ) -> Result<(), ApiError> {
        self.0.check_failure(format!("product-status:{product_id}"))?;
        let mut records = self.0.records.lock().unwrap();
        let current = records
            .iter()
            .find(|r| r.product_id == product_id)
            .map(|r| r.product_version)
            .unwrap_or(0);
        if current != version {
            return Err(ApiError::Conflict);
        }
        for record in records.iter_mut().filter(|r| r.product_id == product_id) {
            record.product_status = status;
            record.product_version = current + 1;
        }
        Ok(())
    }
}

fn rec(id: &str, order: i64, product: &str, project: &str) -> StageRecord {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "name": format!("stage {id}"),
        "startDate": "2026-03-02",
        "endDate": "2026-03-20",
        "order": order,
        "productId": product,
        "productName": format!("{product} name"),
        "productVersion": 1,
        "projectId": project,
        "projectName": format!("{project} name"),
    }))
    .unwrap()
}

fn fixture() -> Vec<StageRecord> {
    vec![
        rec("s0", 0, "p1", "pr1"),
        rec("s1", 1, "p1", "pr1"),
        rec("s2", 2, "p1", "pr1"),
        rec("t0", 0, "p2", "pr1"),
    ]
}

fn stage_ids(board: &BoardSnapshot, product_id: &str) -> Vec<String> {
    board
        .product(product_id)
        .map(|p| p.stages.iter().map(|s| s.id.clone()).collect())
        .unwrap_or_default()
}

/// Drain outcomes until `count` arrived or the wait times out.
fn wait_outcomes(handle: &SyncHandle, count: usize) -> Vec<(u64, SyncOutcome)> {
    let mut outcomes = Vec::new();
    for _ in 0..400 {
        outcomes.extend(handle.poll());
        if outcomes.len() >= count {
            return outcomes;
        }
        thread::sleep(Duration::from_millis(5));
    }
    panic!(
        "timed out waiting for sync outcomes ({} of {count})",
        outcomes.len()
    );
}

#[test]
fn drop_commits_optimistically_and_persists() {
    let server = FakeServer::new(fixture());
    let mut records = fixture();
    let mut board = BoardSnapshot::build(&records, &StatusFilter::default());

    // Drag s2 onto s0 within product p1
    let target = ReorderTarget::Stages {
        product_id: "p1".to_string(),
    };
    let DropOutcome::Planned(plan) = sync::resolve_drop(&board, &target, "s2", Some("s0")) else {
        panic!("expected a plan");
    };

    // The optimistic patch lands before any request is issued
    sync::apply_plan(&mut board, &mut records, &plan);
    assert_eq!(stage_ids(&board, "p1"), vec!["s2", "s0", "s1"]);
    assert!(server.calls.lock().unwrap().is_empty());

    let mut handle = SyncHandle::start(ServerHandle(server.clone()));
    let seq = handle.submit(SyncRequest::Reorder(plan));

    let outcomes = wait_outcomes(&handle, 1);
    let (got_seq, outcome) = &outcomes[0];
    assert_eq!(*got_seq, seq);
    match outcome {
        SyncOutcome::Persisted { result: Ok(()), .. } => {}
        other => panic!("expected a committed reorder, got {other:?}"),
    }

    // The server now agrees with the optimistic state
    let fresh = BoardSnapshot::build(&server.records.lock().unwrap(), &StatusFilter::default());
    assert_eq!(stage_ids(&fresh, "p1"), vec!["s2", "s0", "s1"]);
    assert_eq!(fresh, board);
}

#[test]
fn failed_persist_rolls_back_via_refetch() {
    let server = FakeServer::new(fixture());
    server.fail_persists.store(true, Ordering::SeqCst);

    let mut records = fixture();
    let mut board = BoardSnapshot::build(&records, &StatusFilter::default());

    let target = ReorderTarget::Stages {
        product_id: "p1".to_string(),
    };
    let DropOutcome::Planned(plan) = sync::resolve_drop(&board, &target, "s2", Some("s0")) else {
        panic!("expected a plan");
    };
    sync::apply_plan(&mut board, &mut records, &plan);
    assert_eq!(stage_ids(&board, "p1"), vec!["s2", "s0", "s1"]);

    let mut handle = SyncHandle::start(ServerHandle(server.clone()));
    handle.submit(SyncRequest::Reorder(plan));
    let outcomes = wait_outcomes(&handle, 1);
    match &outcomes[0].1 {
        SyncOutcome::Persisted { result: Err(_), .. } => {}
        other => panic!("expected a failed reorder, got {other:?}"),
    }

    // Rollback: discard the optimistic patch by re-fetching ground truth
    handle.submit(SyncRequest::FetchBoard);
    let outcomes = wait_outcomes(&handle, 1);
    let refetched = match &outcomes[0].1 {
        SyncOutcome::Board(Ok(records)) => records.clone(),
        other => panic!("expected a board, got {other:?}"),
    };

    let rolled_back = BoardSnapshot::build(&refetched, &StatusFilter::default());
    assert_eq!(stage_ids(&rolled_back, "p1"), vec!["s0", "s1", "s2"]);
    // The state equals a fresh fetch, not the failed optimistic order
    assert_ne!(rolled_back, board);
}

#[test]
fn requests_complete_in_submission_order() {
    let server = FakeServer::new(fixture());
    let mut handle = SyncHandle::start(ServerHandle(server.clone()));

    let first = handle.submit(SyncRequest::SetProjectStatus {
        project_id: "pr1".to_string(),
        status: ProjectStatus::Active,
    });
    let second = handle.submit(SyncRequest::FetchBoard);

    let outcomes = wait_outcomes(&handle, 2);
    assert_eq!(outcomes[0].0, first);
    assert_eq!(outcomes[1].0, second);

    // The fetch that follows the status change already sees it
    match &outcomes[1].1 {
        SyncOutcome::Board(Ok(records)) => {
            assert!(records.iter().all(|r| r.project_status == ProjectStatus::Active));
        }
        other => panic!("expected a board, got {other:?}"),
    }
}

#[test]
fn stale_product_version_is_a_conflict() {
    let server = FakeServer::new(fixture());
    let mut handle = SyncHandle::start(ServerHandle(server.clone()));

    handle.submit(SyncRequest::SetProductStatus {
        project_id: "pr1".to_string(),
        product_id: "p1".to_string(),
        version: 0, // server has version 1
        status: ProductStatus::Inwork,
        order_index: Some(0),
    });

    let outcomes = wait_outcomes(&handle, 1);
    match &outcomes[0].1 {
        SyncOutcome::Persisted {
            result: Err(ApiError::Conflict),
            ..
        } => {}
        other => panic!("expected a conflict, got {other:?}"),
    }
}

#[test]
fn product_reorder_round_trips_through_the_server() {
    let server = FakeServer::new(fixture());
    let mut records = fixture();
    let mut board = BoardSnapshot::build(&records, &StatusFilter::default());
    assert_eq!(
        board.projects[0]
            .products
            .iter()
            .map(|p| p.id.clone())
            .collect::<Vec<_>>(),
        vec!["p1", "p2"]
    );

    let target = ReorderTarget::Products {
        project_id: "pr1".to_string(),
    };
    let DropOutcome::Planned(plan) = sync::resolve_drop(&board, &target, "p2", Some("p1")) else {
        panic!("expected a plan");
    };
    sync::apply_plan(&mut board, &mut records, &plan);

    let mut handle = SyncHandle::start(ServerHandle(server.clone()));
    handle.submit(SyncRequest::Reorder(plan));
    wait_outcomes(&handle, 1);

    let fresh = BoardSnapshot::build(&server.records.lock().unwrap(), &StatusFilter::default());
    assert_eq!(
        fresh.projects[0]
            .products
            .iter()
            .map(|p| p.id.clone())
            .collect::<Vec<_>>(),
        vec!["p2", "p1"]
    );
    assert_eq!(fresh, board);
}
