#![allow(clippy::unwrap_used, dead_code)]
// In-memory transport for driving the synchronizer and executor under
// paused tokio time.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use futures_util::future::BoxFuture;
use serde_json::{Value, json};
use vacctl_api::{ApiRequest, Error, Transport};
use vacctl_core::{Protocol, Vacuum, VacuumConfig};

pub use vacctl_api::legacy::paths as legacy_paths;
pub use vacctl_api::modern::paths as modern_paths;

/// One scripted response.
#[derive(Debug, Clone)]
pub enum Reply {
    Json(Value),
    Raw(&'static str),
    Status(u16),
}

/// Scripted transport. Each path has a queue of replies; the last reply
/// in a queue repeats forever. Unscripted paths answer `200 OK`.
pub struct MockTransport {
    routes: Mutex<HashMap<String, VecDeque<Reply>>>,
    calls: Mutex<Vec<ApiRequest>>,
    latency: Duration,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Self::with_latency(Duration::ZERO)
    }

    pub fn with_latency(latency: Duration) -> Arc<Self> {
        Arc::new(Self {
            routes: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            latency,
        })
    }

    pub fn reply(&self, path: &str, reply: Reply) -> &Self {
        self.routes
            .lock()
            .unwrap()
            .entry(path.to_owned())
            .or_default()
            .push_back(reply);
        self
    }

    pub fn calls(&self) -> Vec<ApiRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, path: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.path == path)
            .count()
    }

    /// Requests other than status polls, in order.
    pub fn commands(&self) -> Vec<ApiRequest> {
        self.calls()
            .into_iter()
            .filter(|r| r.path != legacy_paths::STATUS && r.path != modern_paths::STATE_ATTRIBUTES)
            .collect()
    }

    fn next_reply(&self, path: &str) -> Option<Reply> {
        let mut routes = self.routes.lock().unwrap();
        let queue = routes.get_mut(path)?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

impl Transport for MockTransport {
    fn send(&self, request: ApiRequest) -> BoxFuture<'_, Result<Bytes, Error>> {
        Box::pin(async move {
            self.calls.lock().unwrap().push(request.clone());
            if !self.latency.is_zero() {
                tokio::time::sleep(self.latency).await;
            }
            match self.next_reply(&request.path) {
                None => Ok(Bytes::from_static(b"OK")),
                Some(Reply::Json(v)) => Ok(Bytes::from(serde_json::to_vec(&v).unwrap())),
                Some(Reply::Raw(s)) => Ok(Bytes::from_static(s.as_bytes())),
                Some(Reply::Status(status)) => Err(Error::Http {
                    status,
                    body: String::new(),
                }),
            }
        })
    }
}

// ── Fixtures ────────────────────────────────────────────────────────

pub fn modern_status(state: &str, battery: u8, fan: &str) -> Reply {
    Reply::Json(json!([
        { "__class": "StatusStateAttribute", "value": state, "flag": "none" },
        { "__class": "IntensityStateAttribute", "value": fan },
        { "__class": "BatteryStateAttribute", "level": battery, "flag": "discharging" },
    ]))
}

pub fn legacy_status(state: i64, battery: u8, fan_power: u8) -> Reply {
    Reply::Json(json!({ "state": state, "battery": battery, "fan_power": fan_power }))
}

pub fn config(protocol: Protocol) -> VacuumConfig {
    VacuumConfig::new("192.0.2.10", protocol)
}

pub fn vacuum(config: VacuumConfig, transport: &Arc<MockTransport>) -> Vacuum {
    let transport: Arc<dyn Transport> = transport.clone();
    Vacuum::with_transport(config, transport).unwrap()
}

/// Let spawned tasks run; with paused time this also advances the clock
/// by a millisecond.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}
