// ── Polling coordinator ──
//
// Owns the refresh cycle: fetches the four query families concurrently,
// normalizes them, checks the roster, projects, and publishes one
// snapshot. At most one cycle runs at a time; triggers that arrive
// while a cycle is in flight are coalesced.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use serde_json::Value;
use strum::Display;
use tokio::sync::{Mutex, broadcast, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use eetly_api::{GraphqlClient, TransportConfig};

use crate::config::CoordinatorConfig;
use crate::error::CoreError;
use crate::model::Snapshot;
use crate::normalize::{normalize_future, normalize_info, normalize_list, normalize_today};
use crate::projection::assemble_snapshot;
use crate::query::{QueryDocument, QueryFamily, QuerySet};
use crate::roster::{self, Roster, RosterCheck, RosterDiff};
use crate::store::SnapshotStore;
use crate::stream::SnapshotStream;
use crate::transport::QueryTransport;

const EVENT_CHANNEL_SIZE: usize = 64;

// ── CycleState ───────────────────────────────────────────────────

/// Where the coordinator is in its refresh cycle.
///
/// Every cycle starts from `Idle`, passes through `Fetching`, ends in
/// one of the three terminal states, and returns to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum CycleState {
    Idle,
    Fetching,
    Publishing,
    RosterChangeDetected,
    FetchFailed,
}

// ── CycleOutcome / CycleEvent ────────────────────────────────────

/// Result of one refresh trigger.
#[derive(Debug, Clone)]
pub enum CycleOutcome {
    /// A new snapshot replaced the previous one.
    Published(Arc<Snapshot>),
    /// The roster drifted. Nothing was published; rebuild consumers,
    /// call [`Coordinator::reset_roster`], then refresh again.
    RosterChanged(RosterDiff),
    /// Another cycle was already in flight; this trigger was dropped.
    Coalesced,
}

impl CycleOutcome {
    fn kind(&self) -> &'static str {
        match self {
            Self::Published(_) => "published",
            Self::RosterChanged(_) => "roster changed",
            Self::Coalesced => "coalesced",
        }
    }
}

/// Outward signals, broadcast to every subscriber.
#[derive(Debug, Clone)]
pub enum CycleEvent {
    SnapshotPublished {
        generation: u64,
        snapshot: Arc<Snapshot>,
    },
    RosterChangeRequired(RosterDiff),
    FetchFailed {
        family: QueryFamily,
        detail: String,
    },
}

// ── Coordinator ──────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<CoordinatorInner>`. The recorded roster
/// and the published snapshot are written only from inside a cycle,
/// and only one cycle holds the cycle lock at a time.
pub struct Coordinator<T: QueryTransport = GraphqlClient> {
    inner: Arc<CoordinatorInner<T>>,
}

impl<T: QueryTransport> Clone for Coordinator<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct CoordinatorInner<T> {
    transport: T,
    refresh_interval_secs: u64,
    store: SnapshotStore,
    cycle_state: watch::Sender<CycleState>,
    event_tx: broadcast::Sender<CycleEvent>,
    /// Held for the whole cycle; `try_lock` failure means coalesce.
    cycle: Mutex<()>,
    /// Locked by the running cycle, and briefly by roster readers.
    roster: Mutex<Option<Roster>>,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Coordinator<GraphqlClient> {
    /// Build a coordinator that talks to the GraphQL endpoint in `config`.
    /// Does not fetch anything; call [`refresh()`](Self::refresh) or
    /// [`start()`](Self::start).
    pub fn from_config(config: &CoordinatorConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig::default().with_timeout(config.timeout);
        let client = GraphqlClient::new(config.endpoint.as_str(), &config.token, &transport)?;
        Ok(Self::new(client, config.refresh_interval_secs))
    }

    // ── One-shot convenience ─────────────────────────────────────

    /// One-shot: run a single cycle, hand the snapshot to `f`, shut down.
    ///
    /// Optimized for CLI use: background polling is disabled.
    pub async fn oneshot<F, Fut, R>(config: CoordinatorConfig, f: F) -> Result<R, CoreError>
    where
        F: FnOnce(Arc<Snapshot>) -> Fut,
        Fut: Future<Output = Result<R, CoreError>>,
    {
        let mut cfg = config;
        cfg.refresh_interval_secs = 0;
        let coordinator = Self::from_config(&cfg)?;
        let outcome = coordinator.refresh().await;
        coordinator.shutdown().await;
        match outcome? {
            CycleOutcome::Published(snapshot) => f(snapshot).await,
            other => Err(CoreError::NotPublished {
                outcome: other.kind().to_owned(),
            }),
        }
    }
}

impl<T: QueryTransport> Coordinator<T> {
    /// Create a coordinator over any transport.
    ///
    /// `refresh_interval_secs` drives the background task started by
    /// [`start()`](Self::start); 0 disables it.
    pub fn new(transport: T, refresh_interval_secs: u64) -> Self {
        let (cycle_state, _) = watch::channel(CycleState::Idle);
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_SIZE);

        Self {
            inner: Arc::new(CoordinatorInner {
                transport,
                refresh_interval_secs,
                store: SnapshotStore::new(),
                cycle_state,
                event_tx,
                cycle: Mutex::new(()),
                roster: Mutex::new(None),
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn transport(&self) -> &T {
        &self.inner.transport
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.inner.store
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Spawn the periodic refresh task. The first cycle runs immediately.
    ///
    /// No-op when the refresh interval is 0 or the task is already
    /// running. A coordinator that has been shut down stays down.
    pub async fn start(&self) {
        let interval_secs = self.inner.refresh_interval_secs;
        if interval_secs == 0 {
            debug!("background refresh disabled");
            return;
        }

        let mut handles = self.inner.task_handles.lock().await;
        if !handles.is_empty() {
            return;
        }
        let coordinator = self.clone();
        let cancel = self.inner.cancel.clone();
        handles.push(tokio::spawn(refresh_task(coordinator, interval_secs, cancel)));
        info!(interval_secs, "background refresh started");
    }

    /// Cancel background tasks and wait for them to finish.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        debug!("coordinator shut down");
    }

    // ── Refresh cycle ────────────────────────────────────────────

    /// Run one cycle for the local calendar date.
    pub async fn refresh(&self) -> Result<CycleOutcome, CoreError> {
        self.refresh_for(chrono::Local::now().date_naive()).await
    }

    /// Run one cycle for `date`.
    ///
    /// On failure the previous snapshot stays visible and the error names
    /// the query family that failed. Nothing is retried.
    pub async fn refresh_for(&self, date: NaiveDate) -> Result<CycleOutcome, CoreError> {
        let Ok(_cycle) = self.inner.cycle.try_lock() else {
            debug!("cycle already in flight, coalescing trigger");
            return Ok(CycleOutcome::Coalesced);
        };
        let mut roster = self.inner.roster.lock().await;

        self.set_state(CycleState::Fetching);
        let result = self.run_cycle(date, &mut roster).await;

        match &result {
            Ok(CycleOutcome::RosterChanged(diff)) => {
                warn!(
                    added = diff.added.len(),
                    removed = diff.removed.len(),
                    "roster changed, rebuild required"
                );
                let _ = self
                    .inner
                    .event_tx
                    .send(CycleEvent::RosterChangeRequired(diff.clone()));
            }
            Ok(_) => {}
            Err(e) => {
                self.set_state(CycleState::FetchFailed);
                warn!(error = %e, "refresh cycle failed");
                if let Some(family) = e.family() {
                    let _ = self.inner.event_tx.send(CycleEvent::FetchFailed {
                        family,
                        detail: e.to_string(),
                    });
                }
            }
        }

        self.set_state(CycleState::Idle);
        result
    }

    async fn run_cycle(
        &self,
        date: NaiveDate,
        recorded: &mut Option<Roster>,
    ) -> Result<CycleOutcome, CoreError> {
        let queries = QuerySet::for_date(date);
        let (info, today, list, future) = self.fetch_all(&queries).await?;

        let info = normalize_info(info)?;
        let today = normalize_today(date, today)?;
        let list = normalize_list(list)?;
        let future = normalize_future(future)?;

        let active: &Roster = match roster::detect(recorded.as_ref(), &info.roster) {
            RosterCheck::Changed(diff) => {
                self.set_state(CycleState::RosterChangeDetected);
                return Ok(CycleOutcome::RosterChanged(diff));
            }
            RosterCheck::Established => {
                info!(residents = info.roster.len(), "roster established");
                recorded.insert(info.roster)
            }
            RosterCheck::Unchanged => recorded.as_ref().unwrap_or(&info.roster),
        };

        self.set_state(CycleState::Publishing);
        let snapshot = Arc::new(assemble_snapshot(
            date,
            active,
            &info.household,
            &today,
            &list,
            &future,
        ));
        let generation = self.inner.store.publish(Arc::clone(&snapshot));
        let _ = self.inner.event_tx.send(CycleEvent::SnapshotPublished {
            generation,
            snapshot: Arc::clone(&snapshot),
        });

        debug!(
            generation,
            residents = active.len(),
            shopping = snapshot.shopping_list.count(),
            "snapshot published"
        );
        Ok(CycleOutcome::Published(snapshot))
    }

    /// Issue all four queries concurrently; the first failure wins.
    async fn fetch_all(&self, queries: &QuerySet) -> Result<(Value, Value, Value, Value), CoreError> {
        let transport = &self.inner.transport;
        tokio::try_join!(
            fetch_family(transport, &queries.info),
            fetch_family(transport, &queries.today),
            fetch_family(transport, &queries.list),
            fetch_family(transport, &queries.future),
        )
    }

    /// Forget the recorded roster; the next cycle establishes a new one.
    ///
    /// Waits for an in-flight cycle to finish first.
    pub async fn reset_roster(&self) {
        *self.inner.roster.lock().await = None;
        debug!("recorded roster cleared");
    }

    /// The recorded roster, if a cycle has established one.
    pub async fn roster(&self) -> Option<Roster> {
        self.inner.roster.lock().await.clone()
    }

    fn set_state(&self, state: CycleState) {
        self.inner.cycle_state.send_replace(state);
    }

    // ── State observation ────────────────────────────────────────

    /// The last good snapshot.
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.inner.store.snapshot()
    }

    /// Subscribe to published snapshots.
    pub fn subscribe(&self) -> SnapshotStream {
        self.inner.store.subscribe()
    }

    /// Subscribe to the cycle event broadcast.
    pub fn events(&self) -> broadcast::Receiver<CycleEvent> {
        self.inner.event_tx.subscribe()
    }

    /// Subscribe to cycle state changes.
    pub fn cycle_state(&self) -> watch::Receiver<CycleState> {
        self.inner.cycle_state.subscribe()
    }
}

async fn fetch_family<T: QueryTransport>(
    transport: &T,
    query: &QueryDocument,
) -> Result<Value, CoreError> {
    debug!(family = %query.family, "fetching");
    transport
        .fetch(&query.body)
        .await
        .map_err(|e| CoreError::transport(query.family, e))
}

// ── Background tasks ─────────────────────────────────────────────

/// Periodically run a refresh cycle until cancelled.
async fn refresh_task<T: QueryTransport>(
    coordinator: Coordinator<T>,
    interval_secs: u64,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                match coordinator.refresh().await {
                    Ok(CycleOutcome::Coalesced) => debug!("periodic refresh coalesced"),
                    Ok(_) => {}
                    Err(e) => warn!(error = %e, "periodic refresh failed"),
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{PrimaryCook, ResidentId};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // ── In-memory transport ─────────────────────────────────────────

    struct FakeTransport {
        residents: StdMutex<Vec<(i64, &'static str)>>,
        failing: StdMutex<Option<QueryFamily>>,
        malformed: StdMutex<Option<QueryFamily>>,
        gate: watch::Sender<bool>,
        calls: AtomicUsize,
    }

    impl FakeTransport {
        fn new(residents: &[(i64, &'static str)]) -> Self {
            let (gate, _) = watch::channel(true);
            Self {
                residents: StdMutex::new(residents.to_vec()),
                failing: StdMutex::new(None),
                malformed: StdMutex::new(None),
                gate,
                calls: AtomicUsize::new(0),
            }
        }

        fn set_residents(&self, residents: &[(i64, &'static str)]) {
            *self.residents.lock().unwrap() = residents.to_vec();
        }

        fn fail(&self, family: Option<QueryFamily>) {
            *self.failing.lock().unwrap() = family;
        }

        /// Answer `family` with a well-formed body that lacks its key.
        fn malform(&self, family: Option<QueryFamily>) {
            *self.malformed.lock().unwrap() = family;
        }

        fn close_gate(&self) {
            self.gate.send_replace(false);
        }

        fn open_gate(&self) {
            self.gate.send_replace(true);
        }

        fn family_of(document: &str) -> QueryFamily {
            if document.contains("eetschema_group") {
                QueryFamily::Info
            } else if document.contains("eetschema_list") {
                QueryFamily::List
            } else if document.contains("limit:") {
                QueryFamily::Future
            } else {
                QueryFamily::Today
            }
        }

        fn attendees(&self, cook: Option<i64>) -> Vec<Value> {
            self.residents
                .lock()
                .unwrap()
                .iter()
                .map(|(id, name)| {
                    let status = if Some(*id) == cook { "cook" } else { "eat_only" };
                    json!({
                        "user": { "id": id, "name": name },
                        "status": status,
                        "order": id,
                        "number_guests": if Some(*id) == cook { 2 } else { 0 }
                    })
                })
                .collect()
        }

        fn response(&self, family: QueryFamily) -> Result<Value, eetly_api::Error> {
            if *self.failing.lock().unwrap() == Some(family) {
                return Err(eetly_api::Error::Http {
                    status: 502,
                    preview: "bad gateway".into(),
                });
            }
            if *self.malformed.lock().unwrap() == Some(family) {
                return Ok(json!({ format!("eetschema_{family}_typo"): [] }));
            }
            let residents = self.residents.lock().unwrap().clone();
            Ok(match family {
                QueryFamily::Info => json!({
                    "eetschema_group": [{
                        "name": "Huize",
                        "city": "Utrecht",
                        "address": "Oudegracht 1",
                        "active": true,
                        "default_status": "dont_know_yet",
                        "summary": residents.iter()
                            .map(|(id, _)| json!({ "user_id": id, "payed_total": id * 100 }))
                            .collect::<Vec<_>>(),
                        "users_in_groups": residents.iter()
                            .map(|(id, name)| json!({ "order": id, "user": { "id": id, "name": name } }))
                            .collect::<Vec<_>>(),
                    }]
                }),
                QueryFamily::Today => json!({
                    "eetschema_event": [{
                        "start_date": "2024-06-15T00:00:00+00:00",
                        "open": true,
                        "description": "Curry",
                        "event_attendees_all_users": self.attendees(Some(1)),
                    }]
                }),
                QueryFamily::List => json!({
                    "eetschema_list": [{ "text": "rice", "checked": false }]
                }),
                QueryFamily::Future => json!({
                    "eetschema_event": (15..22).map(|d| json!({
                        "start_date": format!("2024-06-{d}T00:00:00+00:00"),
                        "event_attendees_all_users": self.attendees(None),
                    })).collect::<Vec<_>>()
                }),
            })
        }
    }

    impl QueryTransport for Arc<FakeTransport> {
        fn fetch(
            &self,
            document: &str,
        ) -> impl Future<Output = Result<serde_json::Value, eetly_api::Error>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let response = self.response(FakeTransport::family_of(document));
            let mut gate = self.gate.subscribe();
            async move {
                let _ = gate.wait_for(|open| *open).await;
                response
            }
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn coordinator(residents: &[(i64, &'static str)]) -> (Coordinator<Arc<FakeTransport>>, Arc<FakeTransport>) {
        let fake = Arc::new(FakeTransport::new(residents));
        (Coordinator::new(Arc::clone(&fake), 0), fake)
    }

    fn published(outcome: CycleOutcome) -> Arc<Snapshot> {
        match outcome {
            CycleOutcome::Published(snapshot) => snapshot,
            other => panic!("expected Published, got {other:?}"),
        }
    }

    // ── Cycles ──────────────────────────────────────────────────────

    #[tokio::test]
    async fn first_cycle_establishes_roster_and_publishes() {
        let (coord, fake) = coordinator(&[(1, "Anna"), (2, "Bram")]);
        let mut events = coord.events();

        let snapshot = published(coord.refresh_for(date()).await.unwrap());

        assert_eq!(fake.calls.load(Ordering::SeqCst), 4);
        assert_eq!(snapshot.info.residents, ["Anna", "Bram"]);
        assert_eq!(snapshot.today.cook, PrimaryCook::Resident("Anna".into()));
        assert_eq!(snapshot.today.total_eaters, 4);
        assert_eq!(snapshot.shopping_list.items, ["rice"]);
        assert_eq!(snapshot.info.balances[&ResidentId::from("2")], 200);
        assert_eq!(
            snapshot.forecasts.keys().map(ResidentId::as_str).collect::<Vec<_>>(),
            ["1", "2"]
        );
        assert_eq!(coord.roster().await.unwrap().len(), 2);
        assert_eq!(coord.store().generation(), 1);
        assert!(matches!(
            events.recv().await.unwrap(),
            CycleEvent::SnapshotPublished { generation: 1, .. }
        ));
        assert_eq!(*coord.cycle_state().borrow(), CycleState::Idle);
    }

    #[tokio::test]
    async fn repeated_cycles_are_idempotent() {
        let (coord, _) = coordinator(&[(1, "Anna"), (2, "Bram")]);
        let a = published(coord.refresh_for(date()).await.unwrap());
        let b = published(coord.refresh_for(date()).await.unwrap());
        assert_eq!(*a, *b);
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(coord.store().generation(), 2);
    }

    #[tokio::test]
    async fn fetch_failure_keeps_previous_snapshot() {
        let (coord, fake) = coordinator(&[(1, "Anna")]);
        let first = published(coord.refresh_for(date()).await.unwrap());
        let mut events = coord.events();

        fake.fail(Some(QueryFamily::List));
        let err = coord.refresh_for(date()).await.unwrap_err();

        assert_eq!(err.family(), Some(QueryFamily::List));
        assert!(Arc::ptr_eq(&coord.snapshot().unwrap(), &first));
        assert_eq!(coord.store().generation(), 1);
        match events.recv().await.unwrap() {
            CycleEvent::FetchFailed { family, detail } => {
                assert_eq!(family, QueryFamily::List);
                assert!(detail.contains("502"));
            }
            other => panic!("expected FetchFailed, got {other:?}"),
        }
        assert_eq!(*coord.cycle_state().borrow(), CycleState::Idle);

        fake.fail(None);
        published(coord.refresh_for(date()).await.unwrap());
        assert_eq!(coord.store().generation(), 2);
    }

    #[tokio::test]
    async fn malformed_family_aborts_like_a_fetch_failure() {
        let (coord, fake) = coordinator(&[(1, "Anna"), (2, "Bram")]);
        let first = published(coord.refresh_for(date()).await.unwrap());
        let mut events = coord.events();

        fake.malform(Some(QueryFamily::List));
        let err = coord.refresh_for(date()).await.unwrap_err();

        assert!(matches!(
            err,
            CoreError::MalformedResponse {
                family: QueryFamily::List,
                ..
            }
        ));
        assert!(Arc::ptr_eq(&coord.snapshot().unwrap(), &first));
        assert_eq!(coord.store().generation(), 1);
        match events.recv().await.unwrap() {
            CycleEvent::FetchFailed { family, .. } => assert_eq!(family, QueryFamily::List),
            other => panic!("expected FetchFailed, got {other:?}"),
        }
        assert_eq!(*coord.cycle_state().borrow(), CycleState::Idle);

        fake.malform(None);
        published(coord.refresh_for(date()).await.unwrap());
        assert_eq!(coord.store().generation(), 2);
    }

    #[tokio::test]
    async fn first_cycle_failure_publishes_nothing() {
        let (coord, fake) = coordinator(&[(1, "Anna")]);
        fake.fail(Some(QueryFamily::Info));
        let err = coord.refresh_for(date()).await.unwrap_err();
        assert!(matches!(err, CoreError::Transport { family: QueryFamily::Info, .. }));
        assert!(coord.snapshot().is_none());
        assert!(coord.roster().await.is_none());
    }

    #[tokio::test]
    async fn roster_drift_aborts_before_projection() {
        let (coord, fake) = coordinator(&[(1, "Anna"), (2, "Bram")]);
        let first = published(coord.refresh_for(date()).await.unwrap());
        let mut events = coord.events();

        fake.set_residents(&[(1, "Anna")]);
        let diff = match coord.refresh_for(date()).await.unwrap() {
            CycleOutcome::RosterChanged(diff) => diff,
            other => panic!("expected RosterChanged, got {other:?}"),
        };

        assert_eq!(diff.removed, [ResidentId::from("2")]);
        assert!(Arc::ptr_eq(&coord.snapshot().unwrap(), &first));
        assert_eq!(coord.roster().await.unwrap().len(), 2);
        assert!(matches!(
            events.recv().await.unwrap(),
            CycleEvent::RosterChangeRequired(_)
        ));

        // The drift keeps being reported until the caller rebuilds.
        assert!(matches!(
            coord.refresh_for(date()).await.unwrap(),
            CycleOutcome::RosterChanged(_)
        ));

        coord.reset_roster().await;
        let rebuilt = published(coord.refresh_for(date()).await.unwrap());
        assert!(rebuilt.forecast(&ResidentId::from("2")).is_none());
        assert_eq!(rebuilt.forecasts.len(), 1);
    }

    #[tokio::test]
    async fn rename_is_not_a_roster_change() {
        let (coord, fake) = coordinator(&[(1, "Anna"), (2, "Bram")]);
        published(coord.refresh_for(date()).await.unwrap());

        fake.set_residents(&[(1, "Anna"), (2, "Bram B.")]);
        let snapshot = published(coord.refresh_for(date()).await.unwrap());
        // Recorded roster passes through untouched.
        assert_eq!(snapshot.info.residents, ["Anna", "Bram"]);
    }

    #[tokio::test]
    async fn trigger_during_cycle_is_coalesced() {
        let (coord, fake) = coordinator(&[(1, "Anna")]);
        fake.close_gate();

        let background = coord.clone();
        let first = tokio::spawn(async move { background.refresh_for(date()).await });

        let mut state = coord.cycle_state();
        state.wait_for(|s| *s == CycleState::Fetching).await.unwrap();

        assert!(matches!(
            coord.refresh_for(date()).await.unwrap(),
            CycleOutcome::Coalesced
        ));

        fake.open_gate();
        published(first.await.unwrap().unwrap());
        assert_eq!(fake.calls.load(Ordering::SeqCst), 4);
        assert_eq!(coord.store().generation(), 1);
    }

    #[tokio::test]
    async fn roster_reader_delays_but_never_coalesces_a_trigger() {
        let (coord, _) = coordinator(&[(1, "Anna")]);
        let reader = coord.inner.roster.lock().await;

        let background = coord.clone();
        let trigger = tokio::spawn(async move { background.refresh_for(date()).await });
        tokio::task::yield_now().await;
        assert!(!trigger.is_finished());

        drop(reader);
        published(trigger.await.unwrap().unwrap());
        assert_eq!(coord.store().generation(), 1);
    }

    #[tokio::test]
    async fn reset_roster_between_cycles_does_not_coalesce() {
        let (coord, _) = coordinator(&[(1, "Anna")]);
        published(coord.refresh_for(date()).await.unwrap());
        coord.reset_roster().await;
        assert!(coord.roster().await.is_none());
        published(coord.refresh_for(date()).await.unwrap());
        assert_eq!(coord.roster().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn subscribers_observe_generations_in_order() {
        let (coord, _) = coordinator(&[(1, "Anna")]);
        let mut stream = coord.subscribe();

        for expected in 1..=3 {
            published(coord.refresh_for(date()).await.unwrap());
            let seen = stream.changed().await.unwrap();
            assert_eq!(seen.generation, expected);
        }
        assert_eq!(stream.latest().unwrap().generation, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn background_task_refreshes_until_shutdown() {
        let fake = Arc::new(FakeTransport::new(&[(1, "Anna")]));
        let coord = Coordinator::new(Arc::clone(&fake), 60);
        let mut stream = coord.subscribe();

        coord.start().await;
        assert_eq!(stream.changed().await.unwrap().generation, 1);
        assert_eq!(stream.changed().await.unwrap().generation, 2);

        coord.shutdown().await;
        let calls = fake.calls.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(300)).await;
        assert_eq!(fake.calls.load(Ordering::SeqCst), calls);
    }

    #[tokio::test]
    async fn zero_interval_never_spawns() {
        let (coord, fake) = coordinator(&[(1, "Anna")]);
        coord.start().await;
        coord.shutdown().await;
        assert_eq!(fake.calls.load(Ordering::SeqCst), 0);
    }
}
