//! Canned transport for service tests

use async_trait::async_trait;
use maestro_client::{BatchResult, Payload, RawResult, Transporter};
use std::collections::VecDeque;
use std::sync::Mutex;

/// A [`Transporter`] that replays canned results in order and records the
/// actions it was asked to execute
pub struct MockTransport {
    results: Mutex<VecDeque<RawResult>>,
    actions: Mutex<Vec<String>>,
}

impl MockTransport {
    pub fn with_results(results: Vec<RawResult>) -> Self {
        Self {
            results: Mutex::new(results.into()),
            actions: Mutex::new(Vec::new()),
        }
    }

    /// Number of executed payloads
    pub fn calls(&self) -> usize {
        self.actions.lock().unwrap().len()
    }

    /// Action name of the most recent payload
    pub fn last_action(&self) -> Option<String> {
        self.actions.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl Transporter for MockTransport {
    async fn execute(&self, payload: Payload) -> maestro_client::Result<BatchResult> {
        self.actions.lock().unwrap().push(payload.action);
        let result = self
            .results
            .lock()
            .unwrap()
            .pop_front()
            .expect("mock transport ran out of canned results");
        Ok(BatchResult {
            results: vec![result],
        })
    }
}
