// ── Status synchronizer ──
//
// Owns the cached canonical status for one device and guarantees at most
// one outstanding status fetch. Concurrent callers queue behind the
// in-flight fetch and all receive its result, in arrival order. After
// every completed fetch, success or failure, a single-shot timer is armed
// for the adaptive refresh interval so polling heals itself.

mod timer;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::{broadcast, oneshot, watch};
use tokio::task::AbortHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use vacctl_api::Transport;

use crate::config::PollIntervals;
use crate::error::CoreError;
use crate::model::{CanonicalStatus, VacuumEvent};
use crate::protocol::Protocol;

/// Result delivered to every caller waiting on one fetch.
pub type StatusResult = Result<Arc<CanonicalStatus>, CoreError>;

type Waiter = oneshot::Sender<StatusResult>;

/// Last successful parse and when it happened. Replaced, never mutated.
#[derive(Debug, Clone)]
struct CacheEntry {
    status: Arc<CanonicalStatus>,
    fetched_at: Instant,
}

#[derive(Default)]
struct SyncState {
    cache: Option<CacheEntry>,
    /// `Some` exactly while a fetch is in flight.
    pending: Option<Vec<Waiter>>,
    timer: Option<AbortHandle>,
    /// Bumped on every arm; a timer only acts if it is still current.
    timer_epoch: u64,
}

pub(crate) struct SyncInner {
    transport: Arc<dyn Transport>,
    protocol: Protocol,
    intervals: PollIntervals,
    state: Mutex<SyncState>,
    status_tx: watch::Sender<Option<Arc<CanonicalStatus>>>,
    event_tx: broadcast::Sender<VacuumEvent>,
    cancel: CancellationToken,
}

/// Coalescing, caching status source for one vacuum.
///
/// Cheaply cloneable; all clones share the same cache and queue.
#[derive(Clone)]
pub struct StatusSynchronizer {
    inner: Arc<SyncInner>,
}

impl StatusSynchronizer {
    pub fn new(
        transport: Arc<dyn Transport>,
        protocol: Protocol,
        intervals: PollIntervals,
        event_tx: broadcast::Sender<VacuumEvent>,
    ) -> Self {
        let (status_tx, _) = watch::channel(None);
        Self {
            inner: Arc::new(SyncInner {
                transport,
                protocol,
                intervals,
                state: Mutex::new(SyncState::default()),
                status_tx,
                event_tx,
                cancel: CancellationToken::new(),
            }),
        }
    }

    /// Get the device status.
    ///
    /// Joins the in-flight fetch if there is one. Otherwise a non-forced
    /// call is answered from cache while the entry is younger than the
    /// refresh interval for its state; anything else starts a new fetch.
    pub async fn get_status(&self, forced: bool) -> StatusResult {
        let rx = {
            let mut state = self.inner.lock();

            if let Some(pending) = state.pending.as_mut() {
                let (tx, rx) = oneshot::channel();
                pending.push(tx);
                debug!(forced, waiters = pending.len(), "joining in-flight status fetch");
                rx
            } else if let Some(status) = self.inner.fresh(&state).filter(|_| !forced) {
                debug!("returning cached status");
                return Ok(status);
            } else {
                let (tx, rx) = oneshot::channel();
                SyncInner::start_fetch(&self.inner, &mut state, vec![tx], forced);
                rx
            }
        };

        rx.await
            .map_err(|_| CoreError::Internal("status fetch ended without a result".into()))?
    }

    /// Start a fetch without waiting for it. No-op while one is in flight.
    pub fn force_refresh(&self) {
        let mut state = self.inner.lock();
        if state.pending.is_none() {
            SyncInner::start_fetch(&self.inner, &mut state, Vec::new(), true);
        }
    }

    /// Last successfully parsed status, however old.
    pub fn cached(&self) -> Option<Arc<CanonicalStatus>> {
        self.inner.lock().cache.as_ref().map(|c| Arc::clone(&c.status))
    }

    /// Whether a status fetch is currently outstanding.
    pub fn is_fetching(&self) -> bool {
        self.inner.lock().pending.is_some()
    }

    /// Polling interval that applies to `status` (`None` before the first
    /// successful fetch).
    pub fn refresh_interval(&self, status: Option<&CanonicalStatus>) -> Duration {
        self.inner.refresh_interval(status)
    }

    /// Receive every successfully refreshed status.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<CanonicalStatus>>> {
        self.inner.status_tx.subscribe()
    }

    /// Stop background polling. In-flight fetches still complete and
    /// answer their waiters, but no timer is armed afterwards.
    pub fn shutdown(&self) {
        self.inner.cancel.cancel();
        if let Some(timer) = self.inner.lock().timer.take() {
            timer.abort();
        }
        debug!("status synchronizer shut down");
    }
}

impl SyncInner {
    fn lock(&self) -> MutexGuard<'_, SyncState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn refresh_interval(&self, status: Option<&CanonicalStatus>) -> Duration {
        match status {
            None => self.intervals.bootstrap,
            Some(s) if s.state.is_resting() => self.intervals.idle,
            Some(_) => self.intervals.busy,
        }
    }

    fn fresh(&self, state: &SyncState) -> Option<Arc<CanonicalStatus>> {
        let entry = state.cache.as_ref()?;
        (entry.fetched_at.elapsed() < self.refresh_interval(Some(&entry.status)))
            .then(|| Arc::clone(&entry.status))
    }

    /// Caller holds the lock and has checked that nothing is in flight.
    fn start_fetch(this: &Arc<Self>, state: &mut SyncState, waiters: Vec<Waiter>, forced: bool) {
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
        state.timer_epoch = state.timer_epoch.wrapping_add(1);
        state.pending = Some(waiters);
        debug!(forced, "starting status fetch");

        let inner = Arc::clone(this);
        tokio::spawn(async move {
            let result = inner.fetch().await;
            Self::complete(&inner, result);
        });
    }

    async fn fetch(&self) -> StatusResult {
        let body = self.transport.send(self.protocol.status_request()).await?;
        Ok(Arc::new(self.protocol.parse_status(&body)?))
    }

    fn complete(this: &Arc<Self>, result: StatusResult) {
        let waiters = {
            let mut state = this.lock();
            if let Ok(status) = &result {
                state.cache = Some(CacheEntry {
                    status: Arc::clone(status),
                    fetched_at: Instant::now(),
                });
            }
            let interval = this.refresh_interval(state.cache.as_ref().map(|c| &*c.status));
            Self::rearm(this, &mut state, interval);
            state.pending.take().unwrap_or_default()
        };

        debug!(waiters = waiters.len(), ok = result.is_ok(), "status fetch complete");
        for waiter in waiters {
            let _ = waiter.send(result.clone());
        }

        match result {
            Ok(status) => {
                this.status_tx.send_replace(Some(status));
            }
            Err(e) => {
                warn!(error = %e, "status refresh failed");
                let _ = this.event_tx.send(VacuumEvent::RefreshFailed {
                    message: e.to_string(),
                });
            }
        }
    }

    fn rearm(this: &Arc<Self>, state: &mut SyncState, interval: Duration) {
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
        if this.cancel.is_cancelled() {
            return;
        }
        state.timer_epoch = state.timer_epoch.wrapping_add(1);
        debug!(interval = ?interval, "next background refresh armed");
        state.timer = Some(timer::arm(
            Arc::downgrade(this),
            state.timer_epoch,
            interval,
            this.cancel.clone(),
        ));
    }

    fn timer_fired(this: &Arc<Self>, epoch: u64) {
        let mut state = this.lock();
        if state.timer_epoch != epoch {
            return;
        }
        // Drop our own handle rather than aborting the running task.
        state.timer = None;
        if state.pending.is_none() {
            Self::start_fetch(this, &mut state, Vec::new(), true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BatteryChargeState, CleanerState, CleaningMode};

    struct NeverTransport;

    impl Transport for NeverTransport {
        fn send(
            &self,
            _request: vacctl_api::ApiRequest,
        ) -> futures_util::future::BoxFuture<'_, Result<bytes::Bytes, vacctl_api::Error>> {
            Box::pin(std::future::pending())
        }
    }

    fn sync() -> StatusSynchronizer {
        let (event_tx, _) = broadcast::channel(4);
        StatusSynchronizer::new(
            Arc::new(NeverTransport),
            Protocol::Modern,
            PollIntervals::default(),
            event_tx,
        )
    }

    fn status(state: CleanerState) -> CanonicalStatus {
        CanonicalStatus {
            state,
            cleaning_mode: CleaningMode::None,
            battery_level: 90,
            battery_charge_state: BatteryChargeState::Charged,
            fan_power: None,
        }
    }

    #[test]
    fn interval_depends_on_state() {
        let sync = sync();
        assert_eq!(sync.refresh_interval(None), Duration::from_secs(10));
        assert_eq!(
            sync.refresh_interval(Some(&status(CleanerState::Docked))),
            Duration::from_secs(120)
        );
        assert_eq!(
            sync.refresh_interval(Some(&status(CleanerState::Charging))),
            Duration::from_secs(120)
        );
        assert_eq!(
            sync.refresh_interval(Some(&status(CleanerState::Cleaning))),
            Duration::from_secs(10)
        );
        assert_eq!(
            sync.refresh_interval(Some(&status(CleanerState::Error))),
            Duration::from_secs(10)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn force_refresh_while_in_flight_does_not_stack() {
        let sync = sync();
        sync.force_refresh();
        assert!(sync.is_fetching());
        sync.force_refresh();
        assert!(sync.is_fetching());
        assert!(sync.cached().is_none());
    }
}
