//! Route/map view-model
//!
//! Holds the state behind the map view: which route is active, the
//! coordinate path currently drawn, and the user's last known position.
//!
//! Fetches and location requests run as spawned tokio tasks and report back
//! over a channel. Their results are applied only by the owner of the
//! view-model (through [`MapViewModel::poll`] once per frame, or
//! [`MapViewModel::next_event`]), so all state changes happen in one place.
//!
//! Every fetch is tagged with the route it was issued for. A result whose
//! route is no longer active when it is applied is dropped: the last
//! selected route wins, not the last fetch to finish.

use crate::catalog::{RouteDefinition, RouteKey};
use crate::coordinate::{Coordinate, CoordinatePath};
use crate::location::{GeolocationError, LocationProvider};
use crate::source::{FetchError, RouteSource};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Zoom level used when centering on the user
pub const LOCATE_ZOOM: f64 = 15.0;

/// Called from background tasks after they queue a result, typically to
/// request a UI repaint
pub type Notifier = Arc<dyn Fn() + Send + Sync>;

/// Camera movement requested by the view-model
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CameraCommand {
    /// Jump to a route's initial view
    SetView { center: Coordinate, zoom: f64 },
    /// Animate to the user's position
    FlyTo { target: Coordinate, zoom: f64 },
}

/// What happened to a background result once applied
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventOutcome {
    Applied,
    /// The result belonged to a route that is no longer active
    Discarded,
}

#[derive(Debug)]
enum ViewEvent {
    PathFetched {
        key: RouteKey,
        /// Issue order of the fetch, for telling the latest one apart
        seq: u64,
        result: Result<CoordinatePath, FetchError>,
    },
    Located(Result<Coordinate, GeolocationError>),
}

pub struct MapViewModel {
    source: Arc<dyn RouteSource>,
    locator: Option<Arc<dyn LocationProvider>>,
    notifier: Option<Notifier>,

    active_route: RouteKey,
    current_path: CoordinatePath,
    user_location: Option<Coordinate>,

    /// Sequence number handed to the next fetch
    next_fetch_seq: u64,
    /// Route and sequence number of the latest fetch, until it resolves
    loading: Option<(RouteKey, u64)>,
    /// A location request is in flight
    locating: bool,
    /// Center the camera once the pending location request resolves
    center_when_located: bool,
    /// Failure of a request started by [`Self::locate_me`], not yet taken
    locate_failure: Option<GeolocationError>,
    camera: Option<CameraCommand>,

    last_fetch_error: Option<FetchError>,
    last_location_error: Option<GeolocationError>,
    initialized: bool,

    events_tx: mpsc::UnboundedSender<ViewEvent>,
    events_rx: mpsc::UnboundedReceiver<ViewEvent>,
}

impl MapViewModel {
    /// Create a view-model showing the default route
    ///
    /// `locator` is `None` when the platform has no location capability.
    pub fn new(
        source: Arc<dyn RouteSource>,
        locator: Option<Arc<dyn LocationProvider>>,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            source,
            locator,
            notifier: None,
            active_route: RouteKey::DEFAULT,
            current_path: CoordinatePath::empty(),
            user_location: None,
            next_fetch_seq: 0,
            loading: None,
            locating: false,
            center_when_located: false,
            locate_failure: None,
            camera: None,
            last_fetch_error: None,
            last_location_error: None,
            initialized: false,
            events_tx,
            events_rx,
        }
    }

    /// Route shown on [`Self::initialize`]
    pub fn with_initial_route(mut self, key: RouteKey) -> Self {
        self.active_route = key;
        self
    }

    pub fn with_notifier(mut self, notifier: Notifier) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Start the initial location request and the fetch of the active route
    ///
    /// Neither blocks. Calling this more than once has no effect.
    pub fn initialize(&mut self) {
        if self.initialized {
            return;
        }
        self.initialized = true;

        if self.locator.is_some() {
            self.request_location();
        } else {
            tracing::debug!("No location provider; map starts without a user marker");
        }

        let def = self.active_route.definition();
        self.camera = Some(CameraCommand::SetView {
            center: def.center,
            zoom: f64::from(def.zoom),
        });
        self.start_fetch(self.active_route);
    }

    /// Make `key` the active route and fetch its path
    ///
    /// Reselecting the active route fetches it again, which is how a failed
    /// load is retried.
    pub fn select_route(&mut self, key: RouteKey) {
        if key != self.active_route {
            tracing::debug!("Switching route {} -> {}", self.active_route, key);
            self.active_route = key;
            self.current_path = CoordinatePath::empty();
        }

        let def = key.definition();
        self.camera = Some(CameraCommand::SetView {
            center: def.center,
            zoom: f64::from(def.zoom),
        });
        self.start_fetch(key);
    }

    /// Center on the user, requesting a position first if none is known
    pub fn locate_me(&mut self) -> Result<(), GeolocationError> {
        if let Some(target) = self.user_location {
            self.camera = Some(CameraCommand::FlyTo {
                target,
                zoom: LOCATE_ZOOM,
            });
            return Ok(());
        }

        if self.locator.is_none() {
            tracing::warn!("Locate requested but geolocation is not supported");
            self.last_location_error = Some(GeolocationError::Unsupported);
            return Err(GeolocationError::Unsupported);
        }

        self.center_when_located = true;
        if !self.locating {
            self.request_location();
        }
        Ok(())
    }

    /// Apply every result that has arrived, without waiting
    ///
    /// Returns how many results were applied (discarded ones excluded).
    pub fn poll(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            if self.apply(event) == EventOutcome::Applied {
                applied += 1;
            }
        }
        applied
    }

    /// Wait for the next background result and apply it
    pub async fn next_event(&mut self) -> Option<EventOutcome> {
        let event = self.events_rx.recv().await?;
        Some(self.apply(event))
    }

    fn apply(&mut self, event: ViewEvent) -> EventOutcome {
        match event {
            ViewEvent::PathFetched { key, seq, result } => {
                if self.loading == Some((key, seq)) {
                    self.loading = None;
                }
                if key != self.active_route {
                    tracing::debug!("Discarding stale path for {key} (active: {})", self.active_route);
                    return EventOutcome::Discarded;
                }
                match result {
                    Ok(path) => {
                        tracing::info!("Loaded route {key} ({} points)", path.len());
                        self.current_path = path;
                        self.last_fetch_error = None;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load route data for {key}: {e}");
                        self.current_path = CoordinatePath::empty();
                        self.last_fetch_error = Some(e);
                    }
                }
                EventOutcome::Applied
            }
            ViewEvent::Located(result) => {
                self.locating = false;
                let center = std::mem::take(&mut self.center_when_located);
                match result {
                    Ok(position) => {
                        tracing::debug!("User located at {:.5}, {:.5}", position.lat, position.lon);
                        self.user_location = Some(position);
                        self.last_location_error = None;
                        if center {
                            self.camera = Some(CameraCommand::FlyTo {
                                target: position,
                                zoom: LOCATE_ZOOM,
                            });
                        }
                    }
                    Err(e) => {
                        tracing::warn!("Error getting location: {e}");
                        if center {
                            self.locate_failure = Some(e.clone());
                        }
                        self.last_location_error = Some(e);
                    }
                }
                EventOutcome::Applied
            }
        }
    }

    fn start_fetch(&mut self, key: RouteKey) {
        let seq = self.next_fetch_seq;
        self.next_fetch_seq += 1;
        self.loading = Some((key, seq));
        let fetch = self.source.fetch(key);
        let tx = self.events_tx.clone();
        let notifier = self.notifier.clone();
        tokio::spawn(async move {
            let result = fetch.await;
            if tx.send(ViewEvent::PathFetched { key, seq, result }).is_err() {
                tracing::trace!("Map view closed before route {key} finished loading");
                return;
            }
            if let Some(notify) = notifier {
                notify();
            }
        });
    }

    fn request_location(&mut self) {
        let Some(locator) = self.locator.clone() else {
            return;
        };
        self.locating = true;
        let request = locator.current_position();
        let tx = self.events_tx.clone();
        let notifier = self.notifier.clone();
        tokio::spawn(async move {
            let result = request.await;
            if tx.send(ViewEvent::Located(result)).is_err() {
                return;
            }
            if let Some(notify) = notifier {
                notify();
            }
        });
    }

    #[inline]
    pub fn active_route(&self) -> RouteKey {
        self.active_route
    }

    #[inline]
    pub fn route(&self) -> &'static RouteDefinition {
        self.active_route.definition()
    }

    #[inline]
    pub fn current_path(&self) -> &CoordinatePath {
        &self.current_path
    }

    #[inline]
    pub fn user_location(&self) -> Option<Coordinate> {
        self.user_location
    }

    /// The active route's path is still being fetched
    pub fn is_loading(&self) -> bool {
        self.loading
            .is_some_and(|(key, _)| key == self.active_route)
    }

    pub fn is_locating(&self) -> bool {
        self.locating
    }

    /// Take the pending camera movement, if any
    pub fn take_camera_command(&mut self) -> Option<CameraCommand> {
        self.camera.take()
    }

    pub fn last_fetch_error(&self) -> Option<&FetchError> {
        self.last_fetch_error.as_ref()
    }

    pub fn last_location_error(&self) -> Option<&GeolocationError> {
        self.last_location_error.as_ref()
    }

    /// Take the error of a failed [`Self::locate_me`] request, if one arrived
    ///
    /// Failures of the silent request made by [`Self::initialize`] are only
    /// logged and never show up here.
    pub fn take_locate_failure(&mut self) -> Option<GeolocationError> {
        self.locate_failure.take()
    }

    pub fn source_description(&self) -> String {
        self.source.describe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{BoxFuture, DirRouteSource};
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::oneshot;

    type Gate = oneshot::Receiver<Result<CoordinatePath, FetchError>>;

    /// Source whose fetches resolve only when the test says so
    #[derive(Default)]
    struct GatedSource {
        /// Per route, handed out to fetches in the order they were installed
        gates: Mutex<HashMap<RouteKey, VecDeque<Gate>>>,
    }

    impl GatedSource {
        fn gate(&self, key: RouteKey) -> oneshot::Sender<Result<CoordinatePath, FetchError>> {
            let (tx, rx) = oneshot::channel();
            self.gates
                .lock()
                .unwrap()
                .entry(key)
                .or_default()
                .push_back(rx);
            tx
        }
    }

    impl RouteSource for GatedSource {
        fn fetch(&self, key: RouteKey) -> BoxFuture<Result<CoordinatePath, FetchError>> {
            let gate = self
                .gates
                .lock()
                .unwrap()
                .get_mut(&key)
                .and_then(VecDeque::pop_front);
            Box::pin(async move {
                match gate {
                    Some(rx) => rx.await.unwrap(),
                    None => Err(FetchError::Io {
                        path: key.definition().data_file.into(),
                        source: std::io::ErrorKind::NotFound.into(),
                    }),
                }
            })
        }

        fn describe(&self) -> String {
            "gated".to_string()
        }
    }

    struct CountingLocator {
        calls: Arc<AtomicUsize>,
        answer: Result<Coordinate, GeolocationError>,
    }

    impl LocationProvider for CountingLocator {
        fn current_position(&self) -> BoxFuture<Result<Coordinate, GeolocationError>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let answer = self.answer.clone();
            Box::pin(async move { answer })
        }
    }

    fn path_of(points: &[(f64, f64)]) -> CoordinatePath {
        points
            .iter()
            .map(|&(lat, lon)| Coordinate::new(lat, lon))
            .collect()
    }

    fn write_route(root: &std::path::Path, key: RouteKey, contents: &str) {
        let file = root.join(key.definition().data_file);
        std::fs::create_dir_all(file.parent().unwrap()).unwrap();
        std::fs::write(file, contents).unwrap();
    }

    #[tokio::test]
    async fn test_last_route_wins_when_first_fetch_resolves_late() {
        let source = Arc::new(GatedSource::default());
        let city = source.gate(RouteKey::City);
        let river = source.gate(RouteKey::River);
        let mut vm = MapViewModel::new(source.clone(), None);

        vm.select_route(RouteKey::City);
        vm.select_route(RouteKey::River);

        river.send(Ok(path_of(&[(52.35, 4.91)]))).unwrap();
        assert_eq!(vm.next_event().await, Some(EventOutcome::Applied));

        city.send(Ok(path_of(&[(52.36, 4.89), (52.37, 4.90)]))).unwrap();
        assert_eq!(vm.next_event().await, Some(EventOutcome::Discarded));

        assert_eq!(vm.active_route(), RouteKey::River);
        assert_eq!(vm.current_path(), &path_of(&[(52.35, 4.91)]));
        assert!(!vm.is_loading());
    }

    #[tokio::test]
    async fn test_stale_result_arriving_first_is_discarded() {
        let source = Arc::new(GatedSource::default());
        let city = source.gate(RouteKey::City);
        let river = source.gate(RouteKey::River);
        let mut vm = MapViewModel::new(source.clone(), None);

        vm.select_route(RouteKey::City);
        vm.select_route(RouteKey::River);

        city.send(Ok(path_of(&[(52.36, 4.89)]))).unwrap();
        assert_eq!(vm.next_event().await, Some(EventOutcome::Discarded));
        assert!(vm.current_path().is_empty());
        assert!(vm.is_loading());

        river.send(Ok(path_of(&[(52.35, 4.91), (52.34, 4.92)]))).unwrap();
        assert_eq!(vm.next_event().await, Some(EventOutcome::Applied));
        assert_eq!(vm.current_path().len(), 2);
    }

    #[tokio::test]
    async fn test_loading_until_latest_fetch_of_returning_route_resolves() {
        let source = Arc::new(GatedSource::default());
        let city_first = source.gate(RouteKey::City);
        let river = source.gate(RouteKey::River);
        let city_second = source.gate(RouteKey::City);
        let mut vm = MapViewModel::new(source.clone(), None);

        vm.select_route(RouteKey::City);
        vm.select_route(RouteKey::River);
        vm.select_route(RouteKey::City);

        // The first city fetch still applies, but a newer one is in flight
        city_first.send(Ok(path_of(&[(52.36, 4.89)]))).unwrap();
        assert_eq!(vm.next_event().await, Some(EventOutcome::Applied));
        assert_eq!(vm.current_path().len(), 1);
        assert!(vm.is_loading());

        river.send(Ok(path_of(&[(52.35, 4.91)]))).unwrap();
        assert_eq!(vm.next_event().await, Some(EventOutcome::Discarded));
        assert!(vm.is_loading());

        city_second
            .send(Ok(path_of(&[(52.36, 4.89), (52.37, 4.90)])))
            .unwrap();
        assert_eq!(vm.next_event().await, Some(EventOutcome::Applied));
        assert_eq!(vm.current_path().len(), 2);
        assert!(!vm.is_loading());
    }

    #[tokio::test]
    async fn test_fetch_failure_clears_path() {
        let dir = tempfile::tempdir().unwrap();
        write_route(dir.path(), RouteKey::Sanctuary, "[[52.35,4.86]]");
        write_route(dir.path(), RouteKey::City, "[[52.36, oops]]");

        let mut vm = MapViewModel::new(Arc::new(DirRouteSource::new(dir.path())), None);
        vm.initialize();
        vm.next_event().await;
        assert_eq!(vm.current_path().len(), 1);

        vm.select_route(RouteKey::City);
        assert_eq!(vm.next_event().await, Some(EventOutcome::Applied));
        assert!(vm.current_path().is_empty());
        assert!(matches!(vm.last_fetch_error(), Some(FetchError::Parse(_))));

        // Missing artifact behaves the same
        vm.select_route(RouteKey::River);
        vm.next_event().await;
        assert!(vm.current_path().is_empty());
        assert!(matches!(vm.last_fetch_error(), Some(FetchError::Io { .. })));
    }

    #[tokio::test]
    async fn test_reselecting_retries() {
        let source = Arc::new(GatedSource::default());
        let mut vm = MapViewModel::new(source.clone(), None);

        // No gate installed: the first fetch fails
        vm.select_route(RouteKey::City);
        vm.next_event().await;
        assert!(vm.last_fetch_error().is_some());

        let city = source.gate(RouteKey::City);
        vm.select_route(RouteKey::City);
        city.send(Ok(path_of(&[(1.0, 2.0)]))).unwrap();
        vm.next_event().await;
        assert_eq!(vm.current_path().len(), 1);
        assert!(vm.last_fetch_error().is_none());
    }

    #[tokio::test]
    async fn test_initialize_fetches_default_route_and_locates() {
        let dir = tempfile::tempdir().unwrap();
        write_route(dir.path(), RouteKey::Sanctuary, "[[52.35,4.86],[52.351,4.861]]");
        let calls = Arc::new(AtomicUsize::new(0));
        let locator = CountingLocator {
            calls: calls.clone(),
            answer: Ok(Coordinate::new(52.37, 4.89)),
        };

        let mut vm = MapViewModel::new(
            Arc::new(DirRouteSource::new(dir.path())),
            Some(Arc::new(locator)),
        );
        vm.initialize();
        vm.initialize();

        vm.next_event().await;
        vm.next_event().await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(vm.active_route(), RouteKey::Sanctuary);
        assert_eq!(vm.current_path().len(), 2);
        assert_eq!(vm.user_location(), Some(Coordinate::new(52.37, 4.89)));

        // Initial location does not move the camera away from the route
        let def = RouteKey::Sanctuary.definition();
        assert_eq!(
            vm.take_camera_command(),
            Some(CameraCommand::SetView {
                center: def.center,
                zoom: 14.0
            })
        );
        assert_eq!(vm.take_camera_command(), None);
    }

    #[tokio::test]
    async fn test_locate_me_requests_once_then_uses_cache() {
        let calls = Arc::new(AtomicUsize::new(0));
        let locator = CountingLocator {
            calls: calls.clone(),
            answer: Ok(Coordinate::new(52.37, 4.89)),
        };
        let mut vm = MapViewModel::new(
            Arc::new(GatedSource::default()),
            Some(Arc::new(locator)),
        );

        vm.locate_me().unwrap();
        assert!(vm.is_locating());
        assert_eq!(vm.next_event().await, Some(EventOutcome::Applied));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            vm.take_camera_command(),
            Some(CameraCommand::FlyTo {
                target: Coordinate::new(52.37, 4.89),
                zoom: LOCATE_ZOOM
            })
        );

        vm.locate_me().unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            vm.take_camera_command(),
            Some(CameraCommand::FlyTo {
                target: Coordinate::new(52.37, 4.89),
                zoom: LOCATE_ZOOM
            })
        );
    }

    #[tokio::test]
    async fn test_locate_me_while_request_pending_does_not_duplicate() {
        let calls = Arc::new(AtomicUsize::new(0));
        let locator = CountingLocator {
            calls: calls.clone(),
            answer: Ok(Coordinate::new(10.0, 20.0)),
        };
        let mut vm = MapViewModel::new(
            Arc::new(GatedSource::default()),
            Some(Arc::new(locator)),
        );

        vm.locate_me().unwrap();
        vm.locate_me().unwrap();
        vm.next_event().await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(
            vm.take_camera_command(),
            Some(CameraCommand::FlyTo { .. })
        ));
    }

    #[tokio::test]
    async fn test_locate_me_without_capability() {
        let mut vm = MapViewModel::new(Arc::new(GatedSource::default()), None);
        vm.initialize();

        assert_eq!(vm.locate_me(), Err(GeolocationError::Unsupported));
        assert_eq!(
            vm.last_location_error(),
            Some(&GeolocationError::Unsupported)
        );
        assert!(vm.user_location().is_none());
    }

    #[tokio::test]
    async fn test_denied_location_keeps_map_usable() {
        let source = Arc::new(GatedSource::default());
        let river = source.gate(RouteKey::River);
        let locator = CountingLocator {
            calls: Arc::new(AtomicUsize::new(0)),
            answer: Err(GeolocationError::Denied),
        };
        let mut vm = MapViewModel::new(source.clone(), Some(Arc::new(locator)))
            .with_initial_route(RouteKey::River);

        vm.initialize();
        vm.take_camera_command();
        river.send(Ok(path_of(&[(52.35, 4.91)]))).unwrap();
        vm.next_event().await;
        vm.next_event().await;

        assert!(vm.user_location().is_none());
        assert_eq!(vm.last_location_error(), Some(&GeolocationError::Denied));
        // The silent initial request does not report to the user
        assert_eq!(vm.take_locate_failure(), None);
        assert!(vm.last_fetch_error().is_none());
        assert_eq!(vm.current_path().len(), 1);
        assert_eq!(vm.take_camera_command(), None);
    }

    #[tokio::test]
    async fn test_failed_locate_me_is_reported_once() {
        let locator = CountingLocator {
            calls: Arc::new(AtomicUsize::new(0)),
            answer: Err(GeolocationError::Unavailable("no fix".to_string())),
        };
        let mut vm = MapViewModel::new(
            Arc::new(GatedSource::default()),
            Some(Arc::new(locator)),
        );

        vm.locate_me().unwrap();
        vm.next_event().await;

        assert_eq!(
            vm.take_locate_failure(),
            Some(GeolocationError::Unavailable("no fix".to_string()))
        );
        assert_eq!(vm.take_locate_failure(), None);
        assert_eq!(vm.take_camera_command(), None);
    }

    #[tokio::test]
    async fn test_poll_drains_without_waiting() {
        let source = Arc::new(GatedSource::default());
        let city = source.gate(RouteKey::City);
        let mut vm = MapViewModel::new(source.clone(), None);

        vm.select_route(RouteKey::City);
        assert_eq!(vm.poll(), 0);

        city.send(Ok(path_of(&[(1.0, 1.0)]))).unwrap();
        while vm.current_path().is_empty() {
            tokio::task::yield_now().await;
            vm.poll();
        }
        assert_eq!(vm.current_path().len(), 1);
    }

    #[tokio::test]
    async fn test_notifier_is_called() {
        let dir = tempfile::tempdir().unwrap();
        write_route(dir.path(), RouteKey::Sanctuary, "[]");
        let notified = Arc::new(AtomicUsize::new(0));
        let counter = notified.clone();

        let mut vm = MapViewModel::new(Arc::new(DirRouteSource::new(dir.path())), None)
            .with_notifier(Arc::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }));
        vm.initialize();
        vm.next_event().await;
        // The notification follows the send; give the task a chance to finish
        tokio::time::timeout(std::time::Duration::from_secs(5), async {
            while notified.load(Ordering::SeqCst) == 0 {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();
    }
}
