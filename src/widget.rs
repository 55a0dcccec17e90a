use crate::distance::{format_distance, haversine};
use crate::domain::{Coordinate, LocationState, RouteResult};
use crate::geolocation::GeolocationAcquirer;
use crate::map::MapRenderer;
use crate::routing::RoutingService;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};

/// Shows where the visitor is relative to a fixed reference location, and optionally the route between them.
#[derive(Debug)]
pub struct LocationWidget {
    acquirer: GeolocationAcquirer,
    renderer: Arc<MapRenderer>,
    router: Arc<dyn RoutingService>,
    reference: Coordinate,
    inner: Mutex<Inner>,
}

/// Results are applied to the renderer while this lock is held, so a generation check and
/// the renderer update it guards cannot be interleaved with a newer request.
#[derive(Debug, Default)]
struct Inner {
    state: LocationState,
    tracking: bool,
    locate_generation: u64,
    route_generation: u64,
}

impl LocationWidget {
    pub fn new(acquirer: GeolocationAcquirer, renderer: Arc<MapRenderer>, router: Arc<dyn RoutingService>, reference: Coordinate) -> Self {
        LocationWidget {
            acquirer,
            renderer,
            router,
            reference,
            inner: Mutex::new(Inner::default()),
        }
    }

    pub fn state(&self) -> LocationState {
        self.lock().state.clone()
    }

    pub fn renderer(&self) -> &Arc<MapRenderer> {
        &self.renderer
    }

    pub fn distance_label(&self) -> Option<String> {
        self.lock().state.distance_km.map(format_distance)
    }

    /// Acquires the visitor's position, measures the distance to the reference and places the user marker.
    /// A result that arrives after a newer `locate` or an unmount is dropped.
    #[instrument(skip(self))]
    pub async fn locate(&self) -> LocationState {
        let generation = {
            let mut inner = self.lock();
            inner.locate_generation += 1;
            inner.state = inner.state.acquiring();
            inner.locate_generation
        };

        let defaults = self.acquirer.defaults();
        let result = self.acquirer.acquire(defaults.high_accuracy, defaults.timeout).await;

        let mut inner = self.lock();
        if inner.locate_generation != generation {
            debug!(generation, "📍 Discarding stale position");
            return inner.state.clone();
        }

        // Whatever the outcome, routes resolved for the previous position no longer apply
        inner.route_generation += 1;
        inner.state = match result {
            Ok(coordinate) => {
                let distance_km = haversine(&coordinate, &self.reference);
                info!("📏 Visitor is {} away", format_distance(distance_km));

                self.renderer.show_user_location(coordinate);
                LocationState::acquired(coordinate, distance_km)
            }
            Err(error) => {
                self.renderer.clear_user_location();
                LocationState::failed(error)
            }
        };

        inner.state.clone()
    }

    /// Turns route tracking on or off. Turning it off supersedes any resolution in flight.
    pub fn set_tracking(&self, enabled: bool) {
        let mut inner = self.lock();
        let was_tracking = std::mem::replace(&mut inner.tracking, enabled);
        if was_tracking && !enabled {
            inner.route_generation += 1;
            self.renderer.clear_route();
            debug!("🛣️ Route tracking stopped");
        }
    }

    /// Resolves and draws the route from the visitor to the reference. Returns `None` when tracking is off,
    /// no position is known yet, or a newer request superseded this one.
    #[instrument(skip(self))]
    pub async fn track_route(&self) -> Option<RouteResult> {
        let (from, generation) = {
            let mut inner = self.lock();
            if !inner.tracking {
                return None;
            }
            let from = inner.state.user_coordinate?;
            inner.route_generation += 1;
            (from, inner.route_generation)
        };

        let route = self.router.resolve_route(from, self.reference).await;

        let inner = self.lock();
        if inner.route_generation != generation {
            debug!(generation, "🛣️ Discarding stale route");
            return None;
        }

        self.renderer.draw_route(&route);
        Some(route)
    }

    /// Runs [`LocationWidget::track_route`] in the background.
    pub fn spawn_tracking(self: &Arc<Self>) -> JoinHandle<Option<RouteResult>> {
        let widget = self.clone();
        tokio::spawn(async move { widget.track_route().await })
    }

    /// Resets the widget and releases the map.
    #[instrument(skip(self))]
    pub fn unmount(&self) {
        let mut inner = self.lock();
        inner.tracking = false;
        inner.locate_generation += 1;
        inner.route_generation += 1;
        inner.state = LocationState::default();
        self.renderer.teardown();
        debug!("Location widget unmounted");
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
