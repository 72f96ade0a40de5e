//! Debounce, generations, pre-emption and delivery.

use std::io;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use gridpath_core::{CancelToken, EventHub, GridStore, Point};
use gridpath_search::{EngineConfig, PathResult};

use crate::request::{PathEvent, Request, RequestKind};
use crate::worker::{self, Job};

/// Tuning knobs for [`Coordinator`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CoordinatorConfig {
    /// How long preview targets coalesce before one is dispatched.
    pub debounce: Duration,
    /// Dequeue budget for preview searches; finals are unbounded.
    pub preview_step_limit: usize,
    /// How long [`shutdown`](Coordinator::shutdown) waits for the worker
    /// before detaching it.
    pub shutdown_timeout: Duration,
    /// Tuning for the worker's search engine.
    pub engine: EngineConfig,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(50),
            preview_step_limit: 2_000,
            shutdown_timeout: Duration::from_secs(1),
            engine: EngineConfig::default(),
        }
    }
}

/// What the coordinator is doing right now.
///
/// A pending preview target is reported as [`Debouncing`](Phase::Debouncing)
/// even while an older computation is still draining in the background.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Nothing pending, nothing running.
    Idle,
    /// A preview target is waiting out the debounce window.
    Debouncing,
    /// A computation occupies the background slot.
    Running,
}

/// A preview target waiting out the debounce window.
#[derive(Clone, Copy, Debug)]
struct PendingPreview {
    target: Point,
    deadline: Instant,
}

/// The computation currently occupying the slot.
#[derive(Debug)]
struct Active {
    generation: u64,
    cancel: CancelToken,
}

/// Serialises path requests onto one background worker.
///
/// The coordinator is owned by the interactive context and driven by
/// [`poll`](Self::poll): requests never block, deadlines fire during
/// `poll`, and completed results are delivered during `poll` as
/// [`PathEvent`]s if they are still fresh. Freshness is decided purely
/// by generation numbers:
///
/// - a final result is fresh while it is the latest final dispatched;
/// - a preview result is fresh while it is the latest preview dispatched
///   *and* no final was dispatched after it.
///
/// Superseded and cancelled results are discarded without an event.
pub struct Coordinator {
    config: CoordinatorConfig,
    jobs: Option<Sender<Job>>,
    results: Receiver<PathEvent>,
    worker: Option<JoinHandle<()>>,
    events: EventHub<PathEvent>,
    /// Last generation handed out; both kinds share it.
    generation: u64,
    latest_preview: u64,
    latest_final: u64,
    pending: Option<PendingPreview>,
    active: Option<Active>,
}

impl Coordinator {
    /// Spawn the worker and return a ready coordinator. Fails only if
    /// the worker thread cannot be spawned.
    pub fn new(config: CoordinatorConfig) -> io::Result<Self> {
        let (job_tx, job_rx) = mpsc::channel();
        let (result_tx, result_rx) = mpsc::channel();
        let worker = worker::spawn(config.engine.clone(), job_rx, result_tx)?;
        Ok(Self {
            config,
            jobs: Some(job_tx),
            results: result_rx,
            worker: Some(worker),
            events: EventHub::new(),
            generation: 0,
            latest_preview: 0,
            latest_final: 0,
            pending: None,
            active: None,
        })
    }

    /// Register a subscriber for delivered results.
    pub fn subscribe(&mut self) -> Receiver<PathEvent> {
        self.events.subscribe()
    }

    /// The coordinator's configuration.
    #[inline]
    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// What the coordinator is doing right now.
    pub fn phase(&self) -> Phase {
        if self.pending.is_some() {
            Phase::Debouncing
        } else if self.active.is_some() {
            Phase::Running
        } else {
            Phase::Idle
        }
    }

    /// Time left before the pending preview dispatches, if one is
    /// waiting. Callers can sleep this long instead of spinning on
    /// [`poll`](Self::poll).
    pub fn debounce_remaining(&self) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|p| p.deadline.saturating_duration_since(Instant::now()))
    }

    /// Ask for a preview path to `target`.
    ///
    /// Never dispatches immediately: the target waits out the debounce
    /// window, each new request replacing the previous target and
    /// restarting the clock. The surviving target is dispatched by
    /// [`poll`](Self::poll) once the window closes.
    pub fn request_preview(&mut self, target: Point) {
        if self.jobs.is_none() {
            log::warn!("preview request after shutdown; ignoring");
            return;
        }
        self.pending = Some(PendingPreview {
            target,
            deadline: Instant::now() + self.config.debounce,
        });
    }

    /// Commit to a full path ending at the store's end marker.
    ///
    /// Drops any pending preview target, cancels whatever occupies the
    /// slot and dispatches an unbounded search at a fresh generation. If
    /// either marker is missing there is nothing to search: a
    /// [`PathResult::NotFound`] final event is emitted on the spot.
    pub fn request_final(&mut self, store: &GridStore) {
        if self.jobs.is_none() {
            log::warn!("final request after shutdown; ignoring");
            return;
        }
        self.pending = None;
        self.dispatch(store, RequestKind::Final, store.end_point());
    }

    /// Drive the coordinator: dispatch the pending preview if its
    /// deadline has passed (snapshotting the grid at this moment) and
    /// deliver any completed results that are still fresh.
    pub fn poll(&mut self, store: &GridStore) {
        if let Some(pending) = self.pending.take_if(|p| Instant::now() >= p.deadline) {
            self.dispatch(store, RequestKind::Preview, Some(pending.target));
        }
        while let Ok(event) = self.results.try_recv() {
            self.deliver(event);
        }
    }

    /// Stop the worker.
    ///
    /// Cancels the active search, closes the job channel and waits up to
    /// [`shutdown_timeout`](CoordinatorConfig::shutdown_timeout) for the
    /// thread to finish, draining (and discarding) any late results in
    /// the meantime. A worker that overruns the timeout is detached
    /// rather than joined. Idempotent; also runs on drop.
    pub fn shutdown(&mut self) {
        self.pending = None;
        if let Some(active) = self.active.take() {
            active.cancel.cancel();
        }
        self.jobs = None;
        let Some(worker) = self.worker.take() else {
            return;
        };

        let deadline = Instant::now() + self.config.shutdown_timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.results.recv_timeout(remaining) {
                // Late results; nobody is interested anymore.
                Ok(_) => continue,
                Err(RecvTimeoutError::Disconnected) => {
                    let _ = worker.join();
                    return;
                }
                Err(RecvTimeoutError::Timeout) => {
                    log::warn!(
                        "path worker ignored shutdown for {:?}; detaching",
                        self.config.shutdown_timeout
                    );
                    return;
                }
            }
        }
    }

    /// Cancel the slot's occupant, mint a generation and hand the search
    /// to the worker. `target == None` (or a missing start marker) emits
    /// an immediate `NotFound` instead of occupying the slot.
    fn dispatch(&mut self, store: &GridStore, kind: RequestKind, target: Option<Point>) {
        if let Some(active) = self.active.take() {
            active.cancel.cancel();
        }
        self.generation += 1;
        let generation = self.generation;
        match kind {
            RequestKind::Preview => self.latest_preview = generation,
            RequestKind::Final => self.latest_final = generation,
        }

        let (Some(origin), Some(target)) = (store.start_point(), target) else {
            self.events.emit(PathEvent {
                kind,
                generation,
                result: PathResult::NotFound,
            });
            return;
        };

        let cancel = CancelToken::new();
        let job = Job {
            request: Request {
                kind,
                target,
                generation,
            },
            origin,
            grid: store.snapshot(),
            cancel: cancel.clone(),
            step_limit: match kind {
                RequestKind::Preview => Some(self.config.preview_step_limit),
                RequestKind::Final => None,
            },
        };
        if let Some(jobs) = &self.jobs {
            if jobs.send(job).is_ok() {
                log::debug!("dispatched {kind:?} generation {generation} -> {target}");
                self.active = Some(Active { generation, cancel });
            } else {
                log::warn!("path worker is gone; dropping {kind:?} request");
            }
        }
    }

    /// Freshness-filter a completed result and emit it if it survives.
    fn deliver(&mut self, event: PathEvent) {
        if self
            .active
            .as_ref()
            .is_some_and(|a| a.generation == event.generation)
        {
            self.active = None;
        }
        if matches!(event.result, PathResult::Cancelled) {
            log::debug!(
                "discarding cancelled {:?} (generation {})",
                event.kind,
                event.generation
            );
            return;
        }
        if !self.is_fresh(&event) {
            log::debug!(
                "discarding stale {:?} (generation {})",
                event.kind,
                event.generation
            );
            return;
        }
        self.events.emit(event);
    }

    fn is_fresh(&self, event: &PathEvent) -> bool {
        match event.kind {
            RequestKind::Final => event.generation == self.latest_final,
            RequestKind::Preview => {
                event.generation == self.latest_preview && event.generation > self.latest_final
            }
        }
    }
}

impl Drop for Coordinator {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn store_with_markers() -> GridStore {
        let mut store = GridStore::new(5, 5);
        store.set_start(Point::new(0, 0));
        store.set_end(Point::new(4, 4));
        store
    }

    fn coordinator(debounce_ms: u64) -> Coordinator {
        Coordinator::new(CoordinatorConfig {
            debounce: Duration::from_millis(debounce_ms),
            ..CoordinatorConfig::default()
        })
        .unwrap()
    }

    /// Poll-and-collect until `window` elapses.
    fn drain_for(
        coordinator: &mut Coordinator,
        store: &GridStore,
        rx: &Receiver<PathEvent>,
        window: Duration,
    ) -> Vec<PathEvent> {
        let deadline = Instant::now() + window;
        let mut events = Vec::new();
        while Instant::now() < deadline {
            coordinator.poll(store);
            while let Ok(event) = rx.try_recv() {
                events.push(event);
            }
            thread::sleep(Duration::from_millis(1));
        }
        events
    }

    #[test]
    fn test_final_delivers_found_path() {
        let store = store_with_markers();
        let mut coordinator = coordinator(50);
        let rx = coordinator.subscribe();

        coordinator.request_final(&store);
        let events = drain_for(&mut coordinator, &store, &rx, Duration::from_millis(200));

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, RequestKind::Final);
        assert_eq!(events[0].generation, 1);
        assert_eq!(events[0].result.points().unwrap().len(), 9);
    }

    #[test]
    fn test_preview_waits_out_the_debounce_window() {
        let store = store_with_markers();
        let mut coordinator = coordinator(40);
        let rx = coordinator.subscribe();

        coordinator.request_preview(Point::new(4, 4));
        assert_eq!(coordinator.phase(), Phase::Debouncing);

        // Well inside the window: nothing must dispatch.
        let early = drain_for(&mut coordinator, &store, &rx, Duration::from_millis(10));
        assert!(early.is_empty());
        assert_eq!(coordinator.phase(), Phase::Debouncing);

        let events = drain_for(&mut coordinator, &store, &rx, Duration::from_millis(250));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, RequestKind::Preview);
        assert_eq!(events[0].result.points().unwrap().len(), 9);
        assert_eq!(coordinator.phase(), Phase::Idle);
    }

    #[test]
    fn test_rapid_previews_coalesce_to_last_target() {
        let store = store_with_markers();
        let mut coordinator = coordinator(30);
        let rx = coordinator.subscribe();

        for x in 0..9 {
            coordinator.request_preview(Point::new(x % 5, 4));
        }
        coordinator.request_preview(Point::new(4, 0));

        let events = drain_for(&mut coordinator, &store, &rx, Duration::from_millis(300));
        assert_eq!(events.len(), 1, "ten requests, one dispatch");
        let path = events[0].result.points().unwrap();
        assert_eq!(*path.last().unwrap(), Point::new(4, 0));
    }

    #[test]
    fn test_final_suppresses_pending_preview() {
        let store = store_with_markers();
        let mut coordinator = coordinator(30);
        let rx = coordinator.subscribe();

        coordinator.request_preview(Point::new(2, 2));
        coordinator.request_final(&store);
        assert_eq!(coordinator.debounce_remaining(), None);

        let events = drain_for(&mut coordinator, &store, &rx, Duration::from_millis(250));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, RequestKind::Final);
    }

    #[test]
    fn test_late_preview_never_replaces_a_final() {
        let store = store_with_markers();
        let mut coordinator = coordinator(1);

        // Get the preview dispatched (generation 1)...
        coordinator.request_preview(Point::new(2, 2));
        thread::sleep(Duration::from_millis(5));
        coordinator.poll(&store);
        let rx = coordinator.subscribe();
        // ...then immediately outrank it (generation 2). The preview's
        // result is still undelivered; whenever it surfaces, it must be
        // dropped.
        coordinator.request_final(&store);

        let events = drain_for(&mut coordinator, &store, &rx, Duration::from_millis(300));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, RequestKind::Final);
        assert_eq!(events[0].generation, 2);
    }

    #[test]
    fn test_fresh_preview_after_a_final_is_delivered() {
        let store = store_with_markers();
        let mut coordinator = coordinator(5);
        let rx = coordinator.subscribe();

        coordinator.request_final(&store);
        let finals = drain_for(&mut coordinator, &store, &rx, Duration::from_millis(200));
        assert_eq!(finals.len(), 1);

        coordinator.request_preview(Point::new(2, 0));
        let previews = drain_for(&mut coordinator, &store, &rx, Duration::from_millis(200));
        assert_eq!(previews.len(), 1);
        assert_eq!(previews[0].kind, RequestKind::Preview);
        assert!(previews[0].generation > finals[0].generation);
    }

    #[test]
    fn test_back_to_back_finals_deliver_only_the_latest() {
        let store = store_with_markers();
        let mut coordinator = coordinator(50);
        let rx = coordinator.subscribe();

        coordinator.request_final(&store);
        coordinator.request_final(&store);

        let events = drain_for(&mut coordinator, &store, &rx, Duration::from_millis(300));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].generation, 2);
    }

    #[test]
    fn test_final_without_markers_is_immediate_not_found() {
        let store = GridStore::new(5, 5);
        let mut coordinator = coordinator(50);
        let rx = coordinator.subscribe();

        coordinator.request_final(&store);
        // Emitted synchronously, no background work involved.
        let event = rx.try_recv().unwrap();
        assert_eq!(event.kind, RequestKind::Final);
        assert_eq!(event.result, PathResult::NotFound);
        assert_eq!(coordinator.phase(), Phase::Idle);
    }

    #[test]
    fn test_final_with_only_end_marker_is_not_found() {
        let mut store = GridStore::new(5, 5);
        store.set_end(Point::new(4, 4));
        let mut coordinator = coordinator(50);
        let rx = coordinator.subscribe();

        coordinator.request_final(&store);
        let event = rx.try_recv().unwrap();
        assert_eq!(event.result, PathResult::NotFound);
    }

    #[test]
    fn test_preview_without_start_is_immediate_not_found() {
        let store = GridStore::new(5, 5);
        let mut coordinator = coordinator(1);
        let rx = coordinator.subscribe();

        coordinator.request_preview(Point::new(2, 2));
        thread::sleep(Duration::from_millis(5));
        coordinator.poll(&store);

        let event = rx.try_recv().unwrap();
        assert_eq!(event.kind, RequestKind::Preview);
        assert_eq!(event.result, PathResult::NotFound);
    }

    #[test]
    fn test_preview_to_invalid_target_is_not_found() {
        let store = store_with_markers();
        let mut coordinator = coordinator(1);
        let rx = coordinator.subscribe();

        coordinator.request_preview(Point::new(99, 99));
        let events = drain_for(&mut coordinator, &store, &rx, Duration::from_millis(200));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].result, PathResult::NotFound);
    }

    #[test]
    fn test_preview_budget_yields_partial() {
        let mut store = GridStore::new(20, 20);
        store.set_start(Point::new(0, 0));
        store.set_end(Point::new(19, 19));
        let mut coordinator = Coordinator::new(CoordinatorConfig {
            debounce: Duration::from_millis(1),
            preview_step_limit: 5,
            ..CoordinatorConfig::default()
        })
        .unwrap();
        let rx = coordinator.subscribe();

        coordinator.request_preview(Point::new(19, 19));
        let events = drain_for(&mut coordinator, &store, &rx, Duration::from_millis(200));
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0].result, PathResult::Partial(_)));
    }

    #[test]
    fn test_phase_reports_running_after_dispatch() {
        let mut store = GridStore::new(20, 20);
        store.set_start(Point::new(0, 0));
        store.set_end(Point::new(19, 19));
        let mut coordinator = coordinator(1);

        coordinator.request_preview(Point::new(19, 19));
        thread::sleep(Duration::from_millis(5));
        coordinator.poll(&store);
        assert_eq!(coordinator.phase(), Phase::Running);

        let rx = coordinator.subscribe();
        let _ = drain_for(&mut coordinator, &store, &rx, Duration::from_millis(200));
        assert_eq!(coordinator.phase(), Phase::Idle);
    }

    #[test]
    fn test_freshness_rules() {
        let mut coordinator = coordinator(50);
        coordinator.latest_preview = 3;
        coordinator.latest_final = 2;

        let event = |kind, generation| PathEvent {
            kind,
            generation,
            result: PathResult::NotFound,
        };
        // Latest preview, dispatched after the latest final: fresh.
        assert!(coordinator.is_fresh(&event(RequestKind::Preview, 3)));
        // Superseded preview.
        assert!(!coordinator.is_fresh(&event(RequestKind::Preview, 1)));
        // Latest final: fresh.
        assert!(coordinator.is_fresh(&event(RequestKind::Final, 2)));
        // Superseded final.
        assert!(!coordinator.is_fresh(&event(RequestKind::Final, 1)));

        // A final dispatched after the latest preview outranks it even
        // though the preview generation still matches.
        coordinator.latest_final = 4;
        assert!(!coordinator.is_fresh(&event(RequestKind::Preview, 3)));
    }

    #[test]
    fn test_debounce_remaining() {
        let mut coordinator = coordinator(50);
        assert_eq!(coordinator.debounce_remaining(), None);

        coordinator.request_preview(Point::new(1, 1));
        let remaining = coordinator.debounce_remaining().unwrap();
        assert!(remaining <= Duration::from_millis(50));
    }

    #[test]
    fn test_shutdown_is_idempotent_and_ignores_requests() {
        let store = store_with_markers();
        let mut coordinator = coordinator(10);
        let rx = coordinator.subscribe();

        coordinator.request_final(&store);
        let events = drain_for(&mut coordinator, &store, &rx, Duration::from_millis(200));
        assert_eq!(events.len(), 1);

        coordinator.shutdown();
        coordinator.shutdown();

        coordinator.request_final(&store);
        coordinator.request_preview(Point::new(1, 1));
        coordinator.poll(&store);
        assert_eq!(coordinator.phase(), Phase::Idle);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_config_defaults() {
        let config = CoordinatorConfig::default();
        assert_eq!(config.debounce, Duration::from_millis(50));
        assert_eq!(config.preview_step_limit, 2_000);
        assert_eq!(config.shutdown_timeout, Duration::from_secs(1));
        assert_eq!(config.engine, EngineConfig::default());
    }
}
