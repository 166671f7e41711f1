// ── Snapshot publication ──
//
// Holds the last good snapshot behind a `watch` channel. Only the
// coordinator writes, and only while holding its cycle lock, so
// generations are strictly increasing and readers never go backwards.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use crate::model::Snapshot;
use crate::stream::SnapshotStream;

/// A snapshot together with its publication metadata.
#[derive(Debug, Clone)]
pub struct Published {
    /// 1 for the first published snapshot, +1 for each after.
    pub generation: u64,
    pub snapshot: Arc<Snapshot>,
    pub published_at: DateTime<Utc>,
}

/// The single place a snapshot becomes visible to consumers.
pub struct SnapshotStore {
    current: watch::Sender<Option<Published>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        let (current, _) = watch::channel(None);
        Self { current }
    }

    /// Replace the visible snapshot and return its generation.
    pub(crate) fn publish(&self, snapshot: Arc<Snapshot>) -> u64 {
        let mut generation = 0;
        self.current.send_modify(|slot| {
            generation = slot.as_ref().map_or(0, |p| p.generation) + 1;
            *slot = Some(Published {
                generation,
                snapshot,
                published_at: Utc::now(),
            });
        });
        generation
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// The last good snapshot, if any cycle has succeeded yet.
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.current
            .borrow()
            .as_ref()
            .map(|p| Arc::clone(&p.snapshot))
    }

    pub fn published(&self) -> Option<Published> {
        self.current.borrow().clone()
    }

    /// Generation of the visible snapshot; 0 before the first publish.
    pub fn generation(&self) -> u64 {
        self.current.borrow().as_ref().map_or(0, |p| p.generation)
    }

    pub fn last_published(&self) -> Option<DateTime<Utc>> {
        self.current.borrow().as_ref().map(|p| p.published_at)
    }

    /// How long ago the visible snapshot was published.
    pub fn data_age(&self) -> Option<chrono::Duration> {
        self.last_published().map(|t| Utc::now() - t)
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe(&self) -> SnapshotStream {
        SnapshotStream::new(self.current.subscribe())
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{HouseholdInfoView, PrimaryCook, ShoppingListView, TodayView};
    use chrono::NaiveDate;
    use indexmap::IndexMap;

    fn snapshot(items: &[&str]) -> Arc<Snapshot> {
        let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        Arc::new(Snapshot {
            date,
            info: HouseholdInfoView {
                name: "Huize".into(),
                city: None,
                address: None,
                active: true,
                default_status: None,
                residents: Vec::new(),
                balances: IndexMap::new(),
            },
            today: TodayView {
                date,
                cook: PrimaryCook::Nobody,
                eating: Vec::new(),
                shopping: Vec::new(),
                not_eating: Vec::new(),
                unknown: Vec::new(),
                total_eaters: 0,
                food: None,
                open: false,
            },
            shopping_list: ShoppingListView {
                items: items.iter().map(|s| (*s).to_owned()).collect(),
            },
            forecasts: IndexMap::new(),
        })
    }

    #[test]
    fn empty_store_has_nothing_published() {
        let store = SnapshotStore::new();
        assert!(store.snapshot().is_none());
        assert_eq!(store.generation(), 0);
        assert!(store.data_age().is_none());
    }

    #[test]
    fn generations_increase_per_publish() {
        let store = SnapshotStore::new();
        assert_eq!(store.publish(snapshot(&["milk"])), 1);
        assert_eq!(store.publish(snapshot(&["eggs"])), 2);
        assert_eq!(store.generation(), 2);
        assert_eq!(store.snapshot().unwrap().shopping_list.items, ["eggs"]);
    }

    #[tokio::test]
    async fn subscribers_see_whole_snapshots() {
        let store = SnapshotStore::new();
        let mut stream = store.subscribe();
        assert!(stream.current().is_none());

        store.publish(snapshot(&["milk", "bread"]));
        let published = stream.changed().await.unwrap();
        assert_eq!(published.generation, 1);
        assert_eq!(published.snapshot.shopping_list.count(), 2);
        assert_eq!(stream.current().map(|p| p.generation), Some(1));
    }
}
