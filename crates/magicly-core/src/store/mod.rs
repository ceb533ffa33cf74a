// ── Fleet snapshot store ──
//
// Raw device records keyed by id, in target-set order. The refresh worker
// is the only bulk writer; host reads take the read lock and clone out.

pub mod refresh;

use indexmap::IndexMap;
use tokio::sync::{RwLock, watch};

use crate::model::{DeviceId, DeviceRecord};

pub use refresh::RefreshState;

/// All device records as of the last completed refresh.
pub struct FleetSnapshot {
    records: RwLock<IndexMap<DeviceId, DeviceRecord>>,
    /// Bumped on every mutation.
    version: watch::Sender<u64>,
}

impl FleetSnapshot {
    pub fn new() -> Self {
        let (version, _) = watch::channel(0);
        Self {
            records: RwLock::new(IndexMap::new()),
            version,
        }
    }

    /// Replace each incoming record wholesale (remove, then reinsert).
    ///
    /// Records for ids not in `incoming` are left alone; only a successful
    /// identity resolution prunes them.
    pub async fn replace(&self, incoming: Vec<DeviceRecord>) {
        if incoming.is_empty() {
            return;
        }
        let mut records = self.records.write().await;
        for record in incoming {
            records.shift_remove(&record.id);
            records.insert(record.id.clone(), record);
        }
        drop(records);
        self.bump();
    }

    /// Drop every record whose id is not in `keep`.
    pub async fn prune(&self, keep: &[DeviceId]) -> usize {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|id, _| keep.contains(id));
        let removed = before - records.len();
        drop(records);
        if removed > 0 {
            self.bump();
        }
        removed
    }

    /// Overwrite individual raw fields after a confirmed control write.
    pub async fn patch(&self, id: &DeviceId, fields: &[(String, String)]) -> bool {
        let mut records = self.records.write().await;
        let Some(record) = records.get_mut(id) else {
            return false;
        };
        for (field, value) in fields {
            record.raw.insert(field.clone(), value.clone());
        }
        drop(records);
        self.bump();
        true
    }

    pub async fn get(&self, id: &DeviceId) -> Option<DeviceRecord> {
        self.records.read().await.get(id).cloned()
    }

    pub async fn all(&self) -> Vec<DeviceRecord> {
        self.records.read().await.values().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    pub async fn clear(&self) {
        self.records.write().await.clear();
        self.bump();
    }

    /// Change notifications, one tick per mutation.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }

    fn bump(&self) {
        self.version.send_modify(|v| *v = v.wrapping_add(1));
    }
}

impl Default for FleetSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawProperties;

    fn record(id: &str, volume: &str) -> DeviceRecord {
        let mut raw = RawProperties::new();
        raw.insert("basicVolume".into(), volume.into());
        DeviceRecord::new(DeviceId::from(id), raw)
    }

    #[tokio::test]
    async fn replace_keeps_devices_missing_from_cycle() {
        let store = FleetSnapshot::new();
        store.replace(vec![record("a", "1"), record("b", "2")]).await;
        store.replace(vec![record("b", "9")]).await;

        assert_eq!(store.len().await, 2);
        let b = store.get(&DeviceId::from("b")).await;
        assert_eq!(b.map(|r| r.raw["basicVolume"].clone()).as_deref(), Some("9"));
    }

    #[tokio::test]
    async fn replace_drops_stale_fields() {
        let store = FleetSnapshot::new();
        let mut first = record("a", "1");
        first.raw.insert("location".into(), "L1".into());
        store.replace(vec![first]).await;
        store.replace(vec![record("a", "2")]).await;

        let a = store.get(&DeviceId::from("a")).await;
        assert!(a.is_some_and(|r| !r.raw.contains_key("location")));
    }

    #[tokio::test]
    async fn prune_removes_unlisted_ids() {
        let store = FleetSnapshot::new();
        store.replace(vec![record("a", "1"), record("b", "2")]).await;
        let removed = store.prune(&[DeviceId::from("a")]).await;
        assert_eq!(removed, 1);
        assert!(store.get(&DeviceId::from("b")).await.is_none());
    }

    #[tokio::test]
    async fn empty_cycle_does_not_notify() {
        let store = FleetSnapshot::new();
        let mut rx = store.subscribe();
        store.replace(Vec::new()).await;
        {
            let mut changed = tokio_test::task::spawn(rx.changed());
            tokio_test::assert_pending!(changed.poll());
        }

        store.replace(vec![record("a", "1")]).await;
        let mut changed = tokio_test::task::spawn(rx.changed());
        tokio_test::assert_ready_ok!(changed.poll());
    }

    #[tokio::test]
    async fn patch_updates_fields_and_notifies() {
        let store = FleetSnapshot::new();
        let mut rx = store.subscribe();
        store.replace(vec![record("a", "1")]).await;
        assert!(store.patch(&DeviceId::from("a"), &[("basicVolume".into(), "70".into())]).await);
        assert!(!store.patch(&DeviceId::from("zz"), &[]).await);

        assert!(rx.has_changed().unwrap_or(false));
        let _ = rx.borrow_and_update();
        let a = store.get(&DeviceId::from("a")).await;
        assert_eq!(a.map(|r| r.raw["basicVolume"].clone()).as_deref(), Some("70"));
    }
}
