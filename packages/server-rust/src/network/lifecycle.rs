//! Server health state and in-flight request tracking for graceful
//! shutdown.
//!
//! State machine: Starting -> Ready -> Draining -> Stopped. Transitions only
//! move forward.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Notify};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum HealthState {
    /// Listener bound, not yet serving.
    Starting,
    /// Serving requests.
    Ready,
    /// Shutdown requested; new page requests are refused.
    Draining,
    /// Every in-flight request finished.
    Stopped,
}

impl HealthState {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Starting => "starting",
            Self::Ready => "ready",
            Self::Draining => "draining",
            Self::Stopped => "stopped",
        }
    }
}

#[derive(Debug, Default)]
struct InFlight {
    count: AtomicU64,
    idle: Notify,
}

/// Shared lifecycle handle. Cheap to clone through `Arc`.
#[derive(Debug)]
pub struct Lifecycle {
    state: watch::Sender<HealthState>,
    in_flight: Arc<InFlight>,
}

impl Lifecycle {
    #[must_use]
    pub fn new() -> Self {
        let (state, _) = watch::channel(HealthState::Starting);
        Self {
            state,
            in_flight: Arc::new(InFlight::default()),
        }
    }

    #[must_use]
    pub fn health_state(&self) -> HealthState {
        *self.state.borrow()
    }

    pub fn set_ready(&self) {
        self.advance(HealthState::Ready);
    }

    /// Moves to `Draining`; page routes refuse new requests from here on.
    pub fn begin_drain(&self) {
        self.advance(HealthState::Draining);
    }

    /// Counts a request until the guard drops, panics included.
    #[must_use]
    pub fn in_flight_guard(&self) -> InFlightGuard {
        self.in_flight.count.fetch_add(1, Ordering::AcqRel);
        InFlightGuard {
            in_flight: Arc::clone(&self.in_flight),
        }
    }

    #[must_use]
    pub fn in_flight_count(&self) -> u64 {
        self.in_flight.count.load(Ordering::Acquire)
    }

    /// Waits until no request is in flight, then moves to `Stopped`.
    ///
    /// Returns `false` and stays `Draining` if `timeout` elapses first.
    pub async fn wait_for_drain(&self, timeout: Duration) -> bool {
        let drained = tokio::time::timeout(timeout, async {
            loop {
                let idle = self.in_flight.idle.notified();
                if self.in_flight_count() == 0 {
                    return;
                }
                idle.await;
            }
        })
        .await
        .is_ok();

        if drained {
            self.advance(HealthState::Stopped);
        }
        drained
    }

    fn advance(&self, next: HealthState) {
        self.state.send_if_modified(|state| {
            if next > *state {
                *state = next;
                true
            } else {
                false
            }
        });
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

/// Decrements the in-flight count on drop.
#[derive(Debug)]
pub struct InFlightGuard {
    in_flight: Arc<InFlight>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if self.in_flight.count.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.in_flight.idle.notify_waiters();
        }
    }
}
