// ── Background refresh timer ──
//
// A single-shot sleep that forces a refresh when it fires. The task holds
// only a weak reference so a dropped synchronizer stops polling on its own.

use std::sync::Weak;
use std::time::Duration;

use tokio::task::AbortHandle;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use super::SyncInner;

pub(super) fn arm(
    inner: Weak<SyncInner>,
    epoch: u64,
    interval: Duration,
    cancel: CancellationToken,
) -> AbortHandle {
    let handle = tokio::spawn(async move {
        tokio::select! {
            biased;
            () = cancel.cancelled() => {}
            () = tokio::time::sleep(interval) => {
                if let Some(inner) = inner.upgrade() {
                    trace!("background refresh timer fired");
                    SyncInner::timer_fired(&inner, epoch);
                }
            }
        }
    });
    handle.abort_handle()
}
