// ── Monitor facade ──
//
// Wires the store, the refresh scheduler and selection reconciliation
// together the way the dashboard uses them. Cheap to clone.

use std::future::Future;
use std::sync::Arc;

use iotmon_api::DeviceClient;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, info, warn};

use crate::chart::{self, ChartPoint, Summary};
use crate::config::MonitorConfig;
use crate::error::CoreError;
use crate::refresh::{RefreshHandle, RefreshScheduler, SchedulerState};
use crate::selection::reconcile;
use crate::store::{DeviceListState, DeviceStore};
use crate::stream::StateStream;

#[derive(Clone)]
pub struct Monitor {
    inner: Arc<MonitorInner>,
}

struct MonitorInner {
    config: MonitorConfig,
    store: DeviceStore,
    selection: watch::Sender<String>,
}

impl Monitor {
    /// Build the API client and an empty store. Starts nothing.
    pub fn new(config: MonitorConfig) -> Result<Self, CoreError> {
        config.validate()?;
        let client = DeviceClient::new(config.api_url.as_str(), &config.transport())
            .map_err(CoreError::Client)?;
        Ok(Self::with_client(config, client))
    }

    /// Build around an existing client.
    pub fn with_client(config: MonitorConfig, client: DeviceClient) -> Self {
        let (selection, _) = watch::channel(String::new());
        Self {
            inner: Arc::new(MonitorInner {
                config,
                store: DeviceStore::new(client),
                selection,
            }),
        }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &DeviceStore {
        &self.inner.store
    }

    pub fn snapshot(&self) -> Arc<DeviceListState> {
        self.inner.store.snapshot()
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Start background work: selection reconciliation on every store
    /// change, and the refresh scheduler with an immediate first refresh.
    ///
    /// Everything stops when the returned handle is dropped.
    pub fn start(&self) -> MonitorHandle {
        let cancel = CancellationToken::new();

        let selection_task = tokio::spawn(selection_task(
            self.clone(),
            self.inner.store.subscribe(),
            cancel.clone(),
        ));

        let endpoint = self.inner.config.refresh_endpoint;
        let monitor = self.clone();
        let refresh = RefreshScheduler::new(self.inner.config.refresh_interval)
            .with_initial_refresh(true)
            .spawn(move || {
                let monitor = monitor.clone();
                async move {
                    // Failures are already recorded in the store's error slot.
                    let _ = monitor.inner.store.fetch(endpoint).await;
                }
            });

        info!(api_url = %self.inner.config.api_url, %endpoint, "monitor started");

        MonitorHandle {
            monitor: self.clone(),
            refresh,
            cancel: cancel.clone(),
            _guard: cancel.drop_guard(),
            selection_task: Some(selection_task),
        }
    }

    /// Run `f` against a monitor with no background tasks.
    pub async fn oneshot<F, Fut, T>(config: MonitorConfig, f: F) -> Result<T, CoreError>
    where
        F: FnOnce(Monitor) -> Fut,
        Fut: Future<Output = Result<T, CoreError>>,
    {
        let monitor = Monitor::new(config)?;
        f(monitor).await
    }

    // ── Selection ────────────────────────────────────────────────────

    /// Select `device_id`. The choice is reconciled against the current
    /// list right away, so an unknown id falls back to the first device.
    pub fn select(&self, device_id: &str) -> String {
        let snapshot = self.inner.store.snapshot();
        let selected = reconcile(&snapshot.items, device_id);
        self.publish_selection(&selected);
        selected
    }

    /// The current selection: empty, or a device present in the list.
    pub fn selection(&self) -> String {
        self.inner.selection.borrow().clone()
    }

    pub fn subscribe_selection(&self) -> StateStream<String> {
        StateStream::new(self.inner.selection.subscribe())
    }

    fn publish_selection(&self, selected: &str) {
        self.inner.selection.send_if_modified(|current| {
            if current == selected {
                return false;
            }
            debug!(from = %current, to = selected, "selection changed");
            selected.clone_into(current);
            true
        });
    }

    // ── Derived views ────────────────────────────────────────────────

    /// Chart series for the current selection.
    pub fn series(&self) -> Vec<ChartPoint> {
        let snapshot = self.inner.store.snapshot();
        chart::series(
            &snapshot.items,
            &self.selection(),
            self.inner.config.series_limit,
        )
    }

    /// Summary for the current selection.
    pub fn summary(&self) -> Option<Summary> {
        let snapshot = self.inner.store.snapshot();
        chart::summary(&snapshot.items, &self.selection())
    }
}

/// Re-reconcile the selection every time the store publishes.
async fn selection_task(
    monitor: Monitor,
    mut states: StateStream<Arc<DeviceListState>>,
    cancel: CancellationToken,
) {
    let initial = reconcile(&states.current().items, &monitor.selection());
    monitor.publish_selection(&initial);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            state = states.changed() => {
                let Some(state) = state else { break };
                let selected = reconcile(&state.items, &monitor.selection());
                monitor.publish_selection(&selected);
            }
        }
    }
}

// ── Handle ───────────────────────────────────────────────────────────

/// A started monitor. Dropping it stops the scheduler and the selection
/// task.
pub struct MonitorHandle {
    monitor: Monitor,
    refresh: RefreshHandle,
    cancel: CancellationToken,
    _guard: DropGuard,
    selection_task: Option<JoinHandle<()>>,
}

impl MonitorHandle {
    pub fn monitor(&self) -> &Monitor {
        &self.monitor
    }

    /// Refresh now and restart the countdown.
    pub fn refresh_now(&self) -> bool {
        self.refresh.refresh_now()
    }

    pub fn scheduler_state(&self) -> SchedulerState {
        self.refresh.state()
    }

    /// Stop background work and wait for it to finish.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        let refresh = self.refresh;
        refresh.shutdown().await;
        if let Some(task) = self.selection_task.take() {
            if let Err(e) = task.await {
                warn!(error = %e, "selection task ended abnormally");
            }
        }
        info!("monitor stopped");
    }
}
