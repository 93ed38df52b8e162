//! Background persistence worker.
//!
//! All network traffic runs on one worker thread; the UI thread submits
//! requests and drains outcomes each tick, so the board stays responsive
//! (and keeps showing the optimistic state) while a call is in flight.
//! Requests are processed in submission order and are never aborted; a
//! superseded request simply completes and its outcome is handled late.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use crate::api::{ApiError, BoardApi};
use crate::model::product::ProductStatus;
use crate::model::project::ProjectStatus;
use crate::model::stage::StageRecord;

use super::{ReorderPlan, ReorderTarget};

/// A unit of work for the worker thread.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncRequest {
    FetchBoard,
    Reorder(ReorderPlan),
    SetProjectStatus {
        project_id: String,
        status: ProjectStatus,
    },
    SetProductStatus {
        project_id: String,
        product_id: String,
        version: i64,
        status: ProductStatus,
        order_index: Option<i64>,
    },
}

/// What came back from the worker thread.
#[derive(Debug)]
pub enum SyncOutcome {
    Board(Result<Vec<StageRecord>, ApiError>),
    Persisted {
        request: SyncRequest,
        result: Result<(), ApiError>,
    },
}

/// Handle owned by the UI thread. Dropping it shuts the worker down.
pub struct SyncHandle {
    tx: Sender<(u64, SyncRequest)>,
    rx: Receiver<(u64, SyncOutcome)>,
    next_seq: u64,
}

impl SyncHandle {
    /// Spawn the worker thread around an API implementation.
    pub fn start<A>(api: A) -> Self
    where
        A: BoardApi + Send + 'static,
    {
        let (req_tx, req_rx) = mpsc::channel::<(u64, SyncRequest)>();
        let (out_tx, out_rx) = mpsc::channel::<(u64, SyncOutcome)>();

        thread::spawn(move || {
            while let Ok((seq, request)) = req_rx.recv() {
                let outcome = run_request(&api, request);
                if out_tx.send((seq, outcome)).is_err() {
                    break;
                }
            }
        });

        SyncHandle {
            tx: req_tx,
            rx: out_rx,
            next_seq: 0,
        }
    }

    /// Queue a request; returns its sequence number for matching outcomes.
    pub fn submit(&mut self, request: SyncRequest) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        let _ = self.tx.send((seq, request));
        seq
    }

    /// Non-blocking drain of completed outcomes, called once per UI tick.
    pub fn poll(&self) -> Vec<(u64, SyncOutcome)> {
        let mut outcomes = Vec::new();
        while let Ok(outcome) = self.rx.try_recv() {
            outcomes.push(outcome);
        }
        outcomes
    }
}

fn run_request<A: BoardApi>(api: &A, request: SyncRequest) -> SyncOutcome {
    match request {
        SyncRequest::FetchBoard => SyncOutcome::Board(api.fetch_board()),
        SyncRequest::Reorder(plan) => {
            let result = match &plan.target {
                ReorderTarget::Projects => api.reorder_projects(&plan.orders),
                ReorderTarget::Products { .. } => api.reorder_products(&plan.orders),
                ReorderTarget::Stages { product_id } => {
                    api.reorder_stages(product_id, &plan.orders)
                }
            };
            SyncOutcome::Persisted {
                request: SyncRequest::Reorder(plan),
                result,
            }
        }
        SyncRequest::SetProjectStatus { project_id, status } => {
            let result = api.set_project_status(&project_id, status);
            SyncOutcome::Persisted {
                request: SyncRequest::SetProjectStatus { project_id, status },
                result,
            }
        }
        SyncRequest::SetProductStatus {
            project_id,
            product_id,
            version,
            status,
            order_index,
        } => {
            let result =
                api.set_product_status(&project_id, &product_id, version, status, order_index);
            SyncOutcome::Persisted {
                request: SyncRequest::SetProductStatus {
                    project_id,
                    product_id,
                    version,
                    status,
                    order_index,
                },
                result,
            }
        }
    }
}
