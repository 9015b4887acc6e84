// ── Refresh scheduling ──
//
// `Countdown` is the pure state machine: one tick per second, fire and
// reset when the remaining time runs out. The async driver merges the
// ticker and the manual trigger into one loop and runs each refresh on
// its own task, so the countdown keeps moving while a request is out.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, info};

use crate::config::DEFAULT_REFRESH_INTERVAL;
use crate::stream::StateStream;

/// Countdown granularity.
const TICK: Duration = Duration::from_secs(1);

// ── Countdown ────────────────────────────────────────────────────────

/// Time left until the next automatic refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    interval: Duration,
    remaining: Duration,
}

impl Countdown {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            remaining: interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    /// Advance by `elapsed`. Returns `true` when the countdown ran out, in
    /// which case it has already been reset to the full interval.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        if self.remaining <= elapsed {
            self.remaining = self.interval;
            true
        } else {
            self.remaining -= elapsed;
            false
        }
    }

    /// Start over from the full interval.
    pub fn reset(&mut self) {
        self.remaining = self.interval;
    }
}

// ── Published state ──────────────────────────────────────────────────

/// What the scheduler looks like from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerState {
    pub remaining: Duration,
    /// True while at least one refresh is outstanding.
    pub refreshing: bool,
}

// ── Scheduler ────────────────────────────────────────────────────────

/// Builder for the periodic refresh task.
#[derive(Debug, Clone)]
pub struct RefreshScheduler {
    interval: Duration,
    initial_refresh: bool,
}

impl Default for RefreshScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_REFRESH_INTERVAL)
    }
}

impl RefreshScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            initial_refresh: false,
        }
    }

    /// Refresh once immediately on spawn.
    pub fn with_initial_refresh(mut self, enabled: bool) -> Self {
        self.initial_refresh = enabled;
        self
    }

    /// Start the driver. `refresh` is called once per firing; each call
    /// runs on its own task.
    ///
    /// Must be called inside a tokio runtime.
    pub fn spawn<F, Fut>(self, refresh: F) -> RefreshHandle
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let (trigger_tx, trigger_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(SchedulerState {
            remaining: self.interval,
            refreshing: false,
        });

        let driver = Driver {
            countdown: Countdown::new(self.interval),
            state: Arc::new(state_tx),
            in_flight: Arc::new(AtomicUsize::new(0)),
            cancel: cancel.clone(),
        };

        info!(
            interval_secs = self.interval.as_secs_f64(),
            "refresh scheduler started"
        );
        let task = tokio::spawn(driver.run(refresh, trigger_rx, self.initial_refresh));

        RefreshHandle {
            trigger: trigger_tx,
            state: state_rx,
            cancel: cancel.clone(),
            _guard: cancel.drop_guard(),
            task: Some(task),
        }
    }
}

struct Driver {
    countdown: Countdown,
    state: Arc<watch::Sender<SchedulerState>>,
    in_flight: Arc<AtomicUsize>,
    cancel: CancellationToken,
}

impl Driver {
    async fn run<F, Fut>(
        mut self,
        refresh: F,
        mut trigger: mpsc::UnboundedReceiver<()>,
        initial_refresh: bool,
    ) where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut ticker = tokio::time::interval_at(Instant::now() + TICK, TICK);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        if initial_refresh {
            self.fire(refresh());
        }

        loop {
            tokio::select! {
                biased;
                () = self.cancel.cancelled() => break,
                Some(()) = trigger.recv() => {
                    debug!("manual refresh");
                    self.countdown.reset();
                    self.publish_remaining();
                    self.fire(refresh());
                }
                _ = ticker.tick() => {
                    if self.countdown.tick(TICK) {
                        debug!("refresh interval elapsed");
                        self.fire(refresh());
                    }
                    self.publish_remaining();
                }
            }
        }

        info!("refresh scheduler stopped");
    }

    fn publish_remaining(&self) {
        let remaining = self.countdown.remaining();
        self.state.send_if_modified(|s| {
            if s.remaining == remaining {
                return false;
            }
            s.remaining = remaining;
            true
        });
    }

    /// Run one refresh on its own task. It is abandoned if the scheduler
    /// is cancelled before it completes.
    fn fire<Fut>(&self, refresh: Fut)
    where
        Fut: Future<Output = ()> + Send + 'static,
    {
        let state = Arc::clone(&self.state);
        let in_flight = Arc::clone(&self.in_flight);
        let cancel = self.cancel.clone();

        in_flight.fetch_add(1, Ordering::SeqCst);
        set_refreshing(&state, &in_flight);

        tokio::spawn(async move {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {}
                () = refresh => {}
            }
            in_flight.fetch_sub(1, Ordering::SeqCst);
            set_refreshing(&state, &in_flight);
        });
    }
}

fn set_refreshing(state: &watch::Sender<SchedulerState>, in_flight: &AtomicUsize) {
    state.send_if_modified(|s| {
        let refreshing = in_flight.load(Ordering::SeqCst) > 0;
        if s.refreshing == refreshing {
            return false;
        }
        s.refreshing = refreshing;
        true
    });
}

// ── Handle ───────────────────────────────────────────────────────────

/// Owner of a running scheduler. Dropping it stops the ticker and
/// abandons any outstanding refresh.
pub struct RefreshHandle {
    trigger: mpsc::UnboundedSender<()>,
    state: watch::Receiver<SchedulerState>,
    cancel: CancellationToken,
    _guard: DropGuard,
    task: Option<JoinHandle<()>>,
}

impl RefreshHandle {
    /// Refresh now and restart the countdown. Returns `false` if the
    /// scheduler has already stopped.
    pub fn refresh_now(&self) -> bool {
        !self.cancel.is_cancelled() && self.trigger.send(()).is_ok()
    }

    pub fn state(&self) -> SchedulerState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> StateStream<SchedulerState> {
        StateStream::new(self.state.clone())
    }

    /// Stop the scheduler and wait for the driver to exit.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}
