// ── Adapter facade ──
//
// The host-facing entry point. Owns the vendor client, the raw fleet
// snapshot, the presented view, and the single background refresh worker.
// Host calls never trigger a bulk fetch; they only read the snapshot, mark
// liveness, and (for controls) write through to the device.

use std::collections::BTreeMap;
use std::sync::Arc;

use indexmap::IndexMap;
use magicly_api::{MagicInfoClient, TlsMode, TransportConfig};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::{AdapterConfig, TlsVerification};
use crate::control::{self, ControlEntry};
use crate::error::CoreError;
use crate::fetcher;
use crate::format;
use crate::model::{DeviceId, DeviceType, PresentedDevice};
use crate::ping;
use crate::presentation;
use crate::registry;
use crate::resolver;
use crate::store::{FleetSnapshot, RefreshState};

/// Host view derived from the snapshot, guarded by the coarse host mutex.
#[derive(Default)]
struct HostView {
    presented: IndexMap<DeviceId, PresentedDevice>,
    /// Set by a successful control; the next listing skips re-derivation once.
    dirty: bool,
}

/// Polling adapter for one MagicInfo server.
///
/// Cheaply cloneable via `Arc<AdapterInner>`. The worker is started on the
/// first listing (or explicitly with [`start`](Self::start)) and runs until
/// [`stop`](Self::stop).
#[derive(Clone)]
pub struct Adapter {
    inner: Arc<AdapterInner>,
}

struct AdapterInner {
    config: AdapterConfig,
    client: MagicInfoClient,
    snapshot: FleetSnapshot,
    refresh: Mutex<RefreshState>,
    /// `None` until the first successful resolution (or after a failed one).
    target_ids: RwLock<Option<Vec<DeviceId>>>,
    device_types: RwLock<Vec<DeviceType>>,
    host: Mutex<HostView>,
    cancel: CancellationToken,
    /// Child token for the current worker; replaced on every start.
    cancel_child: Mutex<CancellationToken>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Adapter {
    /// Build an adapter. No network traffic happens until the first host call.
    pub fn new(config: AdapterConfig) -> Result<Self, CoreError> {
        let transport = build_transport(&config);
        let client = MagicInfoClient::new(config.url.clone(), config.credentials.clone(), &transport)?
            .with_token_ttl(config.token_ttl);
        let refresh = RefreshState::new(
            Instant::now(),
            config.refresh.cooldown,
            config.refresh.inactivity_timeout,
        );
        let cancel = CancellationToken::new();
        let cancel_child = cancel.child_token();

        Ok(Self {
            inner: Arc::new(AdapterInner {
                config,
                client,
                snapshot: FleetSnapshot::new(),
                refresh: Mutex::new(refresh),
                target_ids: RwLock::new(None),
                device_types: RwLock::new(Vec::new()),
                host: Mutex::new(HostView::default()),
                cancel,
                cancel_child: Mutex::new(cancel_child),
                worker: Mutex::new(None),
            }),
        })
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.inner.config
    }

    /// Raw snapshot, for change subscriptions and inspection.
    pub fn snapshot(&self) -> &FleetSnapshot {
        &self.inner.snapshot
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Spawn the refresh worker if it is not already running.
    pub async fn start(&self) {
        let mut worker = self.inner.worker.lock().await;
        if worker.as_ref().is_some_and(|h| !h.is_finished()) {
            return;
        }

        let child = self.inner.cancel.child_token();
        *self.inner.cancel_child.lock().await = child.clone();
        *self.inner.refresh.lock().await = RefreshState::new(
            Instant::now(),
            self.inner.config.refresh.cooldown,
            self.inner.config.refresh.inactivity_timeout,
        );

        *worker = Some(tokio::spawn(refresh_worker(self.clone(), child)));
        info!(url = %self.inner.config.url, "refresh worker started");
    }

    /// Cancel the worker and drop every cache, the target set, the device
    /// type catalog, and the token. Safe to call repeatedly.
    pub async fn stop(&self) {
        self.inner.cancel_child.lock().await.cancel();
        if let Some(handle) = self.inner.worker.lock().await.take() {
            let _ = handle.await;
        }

        self.inner.snapshot.clear().await;
        *self.inner.host.lock().await = HostView::default();
        *self.inner.target_ids.write().await = None;
        self.inner.device_types.write().await.clear();
        self.inner.client.invalidate_token().await;
        info!("adapter stopped");
    }

    /// Whether bulk fetching is currently paused for lack of host polls.
    pub async fn is_paused(&self) -> bool {
        self.inner.refresh.lock().await.is_paused()
    }

    // ── Host-facing reads ────────────────────────────────────────

    /// Fleet-wide counters, refreshed on every call.
    ///
    /// Also reloads the device type catalog and re-resolves the monitored
    /// id set, pruning devices that dropped out. Credential failures are
    /// returned; every other vendor failure is logged and reported as `None`.
    pub async fn get_statistics(&self) -> Result<BTreeMap<String, String>, CoreError> {
        let mut host = self.inner.host.lock().await;
        let client = &self.inner.client;
        client.ensure_token().await?;

        let mut stats = BTreeMap::new();
        let counts = match client.get_dashboard().await {
            Ok(status) => status,
            Err(e) => {
                let e = CoreError::from(e);
                if e.is_auth() {
                    return Err(e);
                }
                warn!(error = %e, "dashboard fetch failed");
                magicly_api::DashboardStatus::default()
            }
        };
        for (name, value) in [
            ("DevicesConnected", counts.connected.as_deref()),
            ("DevicesDisconnected", counts.disconnected.as_deref()),
            ("DevicesWithWarnings", counts.warning.as_deref()),
            ("DevicesInError", counts.error.as_deref()),
        ] {
            stats.insert(name.to_owned(), format::or_none(value));
        }

        match client.list_device_types().await {
            Ok(types) => *self.inner.device_types.write().await = types,
            Err(e) => warn!(error = %e, "device type catalog fetch failed"),
        }

        let ids = self.resolve_targets().await?;
        host.presented.retain(|id, _| ids.contains(id));
        stats.insert("MonitoredDevices".to_owned(), ids.len().to_string());

        Ok(stats)
    }

    /// Presented view of every monitored device.
    ///
    /// Never triggers a bulk fetch: before the worker's first fetch this is
    /// empty. Marks host liveness and starts the worker if needed.
    pub async fn list_aggregated(&self) -> Result<Vec<PresentedDevice>, CoreError> {
        match self.inner.client.ensure_token().await {
            Ok(()) => {}
            Err(magicly_api::Error::MissingCredentials) => {
                warn!("credentials not configured, serving cached view");
                let host = self.inner.host.lock().await;
                return Ok(host.presented.values().cloned().collect());
            }
            Err(e) => return Err(e.into()),
        }

        if self.inner.target_ids.read().await.is_none() {
            self.resolve_targets().await?;
        }
        let ids = self.target_ids().await;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        self.start().await;
        self.inner.refresh.lock().await.record_poll(Instant::now());

        let mut host = self.inner.host.lock().await;
        if host.dirty {
            host.dirty = false;
            debug!("control applied since last listing, reusing derived view");
        } else {
            let historical = &self.inner.config.historical_properties;
            host.presented = self
                .inner
                .snapshot
                .all()
                .await
                .iter()
                .map(|record| {
                    (
                        record.id.clone(),
                        presentation::present(record, historical),
                    )
                })
                .collect();
        }
        host.presented.retain(|id, _| ids.contains(id));

        Ok(host.presented.values().cloned().collect())
    }

    /// [`list_aggregated`](Self::list_aggregated) restricted to `ids`.
    pub async fn list_aggregated_by_ids(
        &self,
        ids: &[DeviceId],
    ) -> Result<Vec<PresentedDevice>, CoreError> {
        let all = self.list_aggregated().await?;
        Ok(all.into_iter().filter(|d| ids.contains(&d.id)).collect())
    }

    /// Device type catalog as of the last statistics call.
    pub async fn device_types(&self) -> Vec<DeviceType> {
        self.inner.device_types.read().await.clone()
    }

    /// Current monitored id set (empty when unresolved).
    pub async fn target_ids(&self) -> Vec<DeviceId> {
        self.inner
            .target_ids
            .read()
            .await
            .clone()
            .unwrap_or_default()
    }

    /// TCP reachability of the server: average latency in ms, or the
    /// configured timeout when an attempt times out.
    pub async fn ping(&self) -> Result<u64, CoreError> {
        ping::ping(&self.inner.config.url, &self.inner.config.ping).await
    }

    // ── Control ──────────────────────────────────────────────────

    /// Apply one property change to a device and wait for it to take.
    ///
    /// On success the cached record is patched and the presented device
    /// re-derived, so the next listing shows the new value even before the
    /// next bulk refresh.
    pub async fn apply_control(
        &self,
        device_id: &DeviceId,
        property: &str,
        value: &str,
    ) -> Result<(), CoreError> {
        let mut host = self.inner.host.lock().await;
        self.apply_locked(&mut host, device_id, property, value)
            .await
    }

    /// Apply several changes in order. Failures are logged and skipped.
    ///
    /// Returns how many entries were applied.
    pub async fn apply_controls(&self, entries: &[ControlEntry]) -> usize {
        let mut host = self.inner.host.lock().await;
        let mut applied = 0;
        for entry in entries {
            match self
                .apply_locked(&mut host, &entry.device_id, &entry.property, &entry.value)
                .await
            {
                Ok(()) => applied += 1,
                Err(e) => warn!(
                    device_id = %entry.device_id,
                    property = %entry.property,
                    error = %e,
                    "control failed"
                ),
            }
        }
        applied
    }

    async fn apply_locked(
        &self,
        host: &mut HostView,
        device_id: &DeviceId,
        property: &str,
        value: &str,
    ) -> Result<(), CoreError> {
        let inner = &self.inner;
        let record = inner
            .snapshot
            .get(device_id)
            .await
            .ok_or_else(|| CoreError::UnknownDevice {
                device_id: device_id.to_string(),
            })?;
        let spec = registry::lookup(property).ok_or_else(|| CoreError::UnsupportedProperty {
            property: property.to_owned(),
        })?;

        let cancel = inner.cancel_child.lock().await.clone();
        let patch = control::send(
            &inner.client,
            &record,
            spec,
            value,
            &inner.config.refresh,
            &cancel,
        )
        .await?;

        if !patch.is_empty() {
            inner.snapshot.patch(device_id, &patch).await;
        }
        if let Some(updated) = inner.snapshot.get(device_id).await {
            host.presented.insert(
                device_id.clone(),
                presentation::present(&updated, &inner.config.historical_properties),
            );
        }
        host.dirty = true;
        Ok(())
    }

    // ── Internals ────────────────────────────────────────────────

    /// Re-resolve the monitored set and prune the snapshot to it.
    ///
    /// Credential failures propagate; any other failure clears the set and
    /// is logged.
    async fn resolve_targets(&self) -> Result<Vec<DeviceId>, CoreError> {
        let inner = &self.inner;
        match resolver::resolve_target_ids(&inner.client, &inner.config.filters).await {
            Ok(ids) => {
                let pruned = inner.snapshot.prune(&ids).await;
                debug!(count = ids.len(), pruned, "target devices resolved");
                *inner.target_ids.write().await = Some(ids.clone());
                Ok(ids)
            }
            Err(e) if e.is_auth() => Err(e),
            Err(e) => {
                warn!(error = %e, "device identity resolution failed");
                *inner.target_ids.write().await = None;
                Ok(Vec::new())
            }
        }
    }

    /// One scheduler tick: fetch if due, never overlapping.
    async fn refresh_tick(&self, cancel: &CancellationToken) {
        let inner = &self.inner;
        let ids = self.target_ids().await;
        if !inner
            .refresh
            .lock()
            .await
            .decide(Instant::now(), !ids.is_empty())
        {
            return;
        }

        debug!(count = ids.len(), "bulk refresh starting");
        let result = tokio::select! {
            biased;
            () = cancel.cancelled() => None,
            r = fetcher::fetch_details(&inner.client, &ids) => Some(r),
        };
        match result {
            Some(Ok(records)) => {
                let count = records.len();
                inner.snapshot.replace(records).await;
                debug!(count, "bulk refresh applied");
            }
            Some(Err(e)) => warn!(error = %e, "bulk refresh failed, keeping previous snapshot"),
            None => debug!("bulk refresh abandoned on stop"),
        }
        inner.refresh.lock().await.finish_fetch(Instant::now());
    }
}

fn build_transport(config: &AdapterConfig) -> TransportConfig {
    TransportConfig {
        tls: match &config.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        },
        timeout: config.timeout,
    }
}

/// Background worker: ticks on a fixed interval until cancelled.
async fn refresh_worker(adapter: Adapter, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(adapter.inner.config.refresh.tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => adapter.refresh_tick(&cancel).await,
        }
    }
    debug!("refresh worker exited");
}
