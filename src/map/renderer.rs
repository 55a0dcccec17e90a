use crate::app_config::AppConfig;
use crate::domain::{Bounds, Coordinate, RouteResult, TileServer};
use crate::map::styles::{reference_marker, route_style, user_marker};
use crate::map::{LayerId, MapContainer, MapError, MapLibrary, MapSurface, SurfaceEvent, ViewState};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::{debug, error, info, instrument, warn};

const USER_ZOOM: u8 = 15;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MapStatus {
    Uninitialized,
    Initializing,
    Ready,
    TornDown,
}

/// What to show in place of the map while it is not usable.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Placeholder {
    Loading,
    Unavailable,
}

#[derive(Clone, Debug)]
pub struct MapRendererOptions {
    pub reference: Coordinate,
    pub reference_label: String,
    pub reference_region: String,
    pub zoom: u8,
    pub tiles: Vec<TileServer>,
    pub max_zoom: u8,
    pub fit_padding_px: u32,
}

impl MapRendererOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        MapRendererOptions {
            reference: config.reference().location(),
            reference_label: config.reference().label().to_string(),
            reference_region: config.reference().region().to_string(),
            zoom: config.reference().zoom(),
            tiles: config.map().tiles().to_vec(),
            max_zoom: config.map().max_zoom(),
            fit_padding_px: config.routing().fit_padding_px(),
        }
    }
}

/// Owns the lifecycle of one map surface bound to one container.
#[derive(Debug)]
pub struct MapRenderer {
    library: Arc<dyn MapLibrary>,
    container: Option<MapContainer>,
    options: MapRendererOptions,
    inner: Mutex<Inner>,
    events_tx: Mutex<Option<UnboundedSender<SurfaceEvent>>>,
    events_rx: Mutex<Option<UnboundedReceiver<SurfaceEvent>>>,
}

#[derive(Debug)]
struct Inner {
    status: MapStatus,
    attempt: u64,
    last_error: Option<MapError>,
    surface: Option<Box<dyn MapSurface>>,
    tile_index: usize,
    tile_layer: Option<LayerId>,
    attempted_tiles: Vec<String>,
    reference_marker: Option<LayerId>,
    user_marker: Option<(LayerId, Coordinate)>,
    route_line: Option<(LayerId, RouteResult)>,
}

impl MapRenderer {
    pub fn new(library: Arc<dyn MapLibrary>, container: Option<MapContainer>, options: MapRendererOptions) -> Self {
        let (events_tx, events_rx) = unbounded_channel();

        MapRenderer {
            library,
            container,
            options,
            inner: Mutex::new(Inner {
                status: MapStatus::Uninitialized,
                attempt: 0,
                last_error: None,
                surface: None,
                tile_index: 0,
                tile_layer: None,
                attempted_tiles: Vec::new(),
                reference_marker: None,
                user_marker: None,
                route_line: None,
            }),
            events_tx: Mutex::new(Some(events_tx)),
            events_rx: Mutex::new(Some(events_rx)),
        }
    }

    /// Creates a renderer and initializes it. Failures are reported through [`MapRenderer::placeholder`].
    pub async fn open(library: Arc<dyn MapLibrary>, container: MapContainer, options: MapRendererOptions) -> Self {
        let renderer = MapRenderer::new(library, Some(container), options);
        renderer.initialize().await;
        renderer
    }

    pub fn status(&self) -> MapStatus {
        self.lock().status
    }

    pub fn last_error(&self) -> Option<MapError> {
        self.lock().last_error.clone()
    }

    pub fn placeholder(&self) -> Option<Placeholder> {
        let inner = self.lock();
        match inner.status {
            MapStatus::Ready | MapStatus::TornDown => None,
            _ if inner.last_error.is_some() => Some(Placeholder::Unavailable),
            _ => Some(Placeholder::Loading),
        }
    }

    /// Names of the tile servers tried so far, in the order they were tried.
    pub fn attempted_tile_servers(&self) -> Vec<String> {
        self.lock().attempted_tiles.clone()
    }

    pub fn active_tile_server(&self) -> Option<String> {
        let inner = self.lock();
        inner.tile_layer.and_then(|_| self.options.tiles.get(inner.tile_index)).map(|server| server.name.clone())
    }

    pub fn user_location(&self) -> Option<Coordinate> {
        self.lock().user_marker.map(|(_, coordinate)| coordinate)
    }

    /// The route currently drawn on the map.
    pub fn displayed_route(&self) -> Option<RouteResult> {
        self.lock().route_line.as_ref().map(|(_, route)| route.clone())
    }

    #[instrument(skip(self), fields(container = self.container.as_ref().map(|c| c.id())))]
    pub async fn initialize(&self) -> MapStatus {
        let attempt = {
            let mut inner = self.lock();
            if inner.status != MapStatus::Uninitialized {
                debug!(status = ?inner.status, "🗺️ Initializing map... skipped");
                return inner.status;
            }

            inner.status = MapStatus::Initializing;
            inner.last_error = None;
            inner.attempt += 1;
            inner.attempt
        };

        info!("🗺️ Initializing map...");
        let guard = InitializingGuard {
            renderer: self,
            attempt,
            armed: true,
        };
        let loaded = self.library.load().await;
        guard.disarm();

        let mut inner = self.lock();
        if inner.status == MapStatus::TornDown {
            debug!("🗺️ Initializing map... aborted, torn down while loading");
            return MapStatus::TornDown;
        }

        match loaded.and_then(|_| self.create_surface(&mut inner)) {
            Ok(()) => {
                inner.status = MapStatus::Ready;
                info!("🗺️ Initializing map... OK");
            }
            Err(e) => {
                warn!("⚠️ Initializing map... failed, {}", e);
                inner.status = MapStatus::Uninitialized;
                inner.last_error = Some(e);
            }
        }

        inner.status
    }

    fn create_surface(&self, inner: &mut Inner) -> Result<(), MapError> {
        let container = self.container.as_ref().ok_or(MapError::MissingContainer)?;
        if let Some(stale) = container.bound_surface() {
            debug!(surface = stale, "Clearing stale map binding from container '{}'", container.id());
            container.clear();
        }

        let events = self
            .events_tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or_else(|| MapError::Surface("renderer is closed".to_string()))?;
        let view = ViewState {
            center: self.options.reference,
            zoom: self.options.zoom,
        };
        let mut surface = self.library.create_surface(container, &view, events)?;

        let marker = reference_marker(self.options.reference, &self.options.reference_label, &self.options.reference_region);
        let reference = match surface.add_marker(&marker) {
            Ok(layer) => layer,
            Err(e) => {
                surface.remove();
                container.release(surface.id());
                return Err(e);
            }
        };

        inner.surface = Some(surface);
        inner.reference_marker = Some(reference);
        inner.tile_index = 0;
        inner.attempted_tiles.clear();
        inner.load_tile_server(&self.options);

        Ok(())
    }

    /// Consumes surface events until the renderer is torn down.
    #[instrument(skip(self))]
    pub async fn listen(&self) {
        let Some(mut rx) = self.events_rx.lock().unwrap_or_else(PoisonError::into_inner).take() else {
            warn!("⚠️ Map events are already being consumed");
            return;
        };

        while let Some(event) = rx.recv().await {
            self.handle_surface_event(event);
        }
        debug!("🗺️ Map event stream closed");
    }

    pub fn handle_surface_event(&self, event: SurfaceEvent) {
        let mut inner = self.lock();
        if inner.status != MapStatus::Ready {
            debug!(?event, "Ignoring map event, map is not ready");
            return;
        }

        match event {
            SurfaceEvent::TileLoaded { layer } => {
                debug!(layer = layer.0, "🧱 Tile loaded");
            }
            SurfaceEvent::TileError { layer } if inner.tile_layer == Some(layer) => {
                let failed = self.options.tiles.get(inner.tile_index).map(|server| server.name.as_str()).unwrap_or("unknown");
                warn!("⚠️ Tile server '{}' failed to load, trying the next one", failed);

                if let Some(surface) = inner.surface.as_mut() {
                    surface.remove_layer(layer);
                }
                inner.tile_layer = None;
                inner.tile_index += 1;
                inner.load_tile_server(&self.options);
            }
            SurfaceEvent::TileError { layer } => {
                debug!(layer = layer.0, "Ignoring tile error for an inactive layer");
            }
        }
    }

    /// Places the user marker, replacing any previous user marker and route.
    #[instrument(skip(self))]
    pub fn show_user_location(&self, coordinate: Coordinate) -> bool {
        let mut inner = self.lock();
        if inner.status != MapStatus::Ready {
            debug!("Not placing user marker, map is not ready");
            return false;
        }

        inner.remove_user_marker();
        inner.remove_route_line();

        let Some(surface) = inner.surface.as_mut() else {
            return false;
        };
        match surface.add_marker(&user_marker(coordinate)) {
            Ok(layer) => {
                inner.user_marker = Some((layer, coordinate));
                info!("📌 Placed user marker at {}", coordinate);
                true
            }
            Err(e) => {
                warn!("⚠️ Unable to place user marker: {}", e);
                false
            }
        }
    }

    /// Draws a route and fits the viewport to it, replacing any previous route.
    #[instrument(skip(self, route), fields(source = %route.source_mode, points = route.path.len()))]
    pub fn draw_route(&self, route: &RouteResult) -> bool {
        let mut inner = self.lock();
        if inner.status != MapStatus::Ready {
            debug!("Not drawing route, map is not ready");
            return false;
        }

        inner.remove_route_line();

        let Some(bounds) = Bounds::enclosing(&route.path) else {
            warn!("⚠️ Not drawing an empty route");
            return false;
        };
        let Some(surface) = inner.surface.as_mut() else {
            return false;
        };

        match surface.add_polyline(&route.path, &route_style(route.source_mode)) {
            Ok(layer) => {
                surface.fit_bounds(bounds, self.options.fit_padding_px);
                inner.route_line = Some((layer, route.clone()));
                info!("🛣️ Drew {} route", route.source_mode);
                true
            }
            Err(e) => {
                warn!("⚠️ Unable to draw route: {}", e);
                false
            }
        }
    }

    pub fn clear_route(&self) {
        self.lock().remove_route_line();
    }

    /// Removes the user marker together with the route that started from it.
    pub fn clear_user_location(&self) {
        let mut inner = self.lock();
        inner.remove_user_marker();
        inner.remove_route_line();
    }

    /// Zooms in on the user marker, if there is one.
    pub fn center_on_user(&self) -> bool {
        let mut inner = self.lock();
        let Some((_, coordinate)) = inner.user_marker else {
            return false;
        };

        match inner.surface.as_mut() {
            Some(surface) => {
                surface.set_view(ViewState {
                    center: coordinate,
                    zoom: USER_ZOOM,
                });
                true
            }
            None => false,
        }
    }

    /// Releases the surface, its layers and listeners, and the container binding. Terminal.
    #[instrument(skip(self))]
    pub fn teardown(&self) {
        let mut inner = self.lock();
        if inner.status == MapStatus::TornDown {
            return;
        }

        debug!("🗺️ Tearing down map...");
        inner.remove_user_marker();
        inner.remove_route_line();

        let tile_layer = inner.tile_layer.take();
        let reference = inner.reference_marker.take();
        if let Some(mut surface) = inner.surface.take() {
            for layer in tile_layer.into_iter().chain(reference) {
                surface.remove_layer(layer);
            }
            surface.remove();

            if let Some(container) = &self.container {
                container.release(surface.id());
            }
        }

        inner.status = MapStatus::TornDown;
        self.events_tx.lock().unwrap_or_else(PoisonError::into_inner).take();
        debug!("🗺️ Tearing down map... OK");
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for MapRenderer {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl Inner {
    /// Adds the tile layer for the current server, skipping servers that cannot be added at all.
    fn load_tile_server(&mut self, options: &MapRendererOptions) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };

        while let Some(server) = options.tiles.get(self.tile_index) {
            self.attempted_tiles.push(server.name.clone());
            match surface.add_tile_layer(server, options.max_zoom) {
                Ok(layer) => {
                    info!("🧱 Loading tiles from '{}'", server.name);
                    self.tile_layer = Some(layer);
                    return;
                }
                Err(e) => {
                    warn!("⚠️ Unable to add tile server '{}': {}", server.name, e);
                    self.tile_index += 1;
                }
            }
        }

        error!("❌ All tile servers failed to load");
    }

    fn remove_user_marker(&mut self) {
        if let (Some((layer, _)), Some(surface)) = (self.user_marker.take(), self.surface.as_mut()) {
            surface.remove_layer(layer);
        }
    }

    fn remove_route_line(&mut self) {
        if let (Some((layer, _)), Some(surface)) = (self.route_line.take(), self.surface.as_mut()) {
            surface.remove_layer(layer);
        }
    }
}

/// Puts an initialization that was dropped mid-load back to `Uninitialized`.
struct InitializingGuard<'a> {
    renderer: &'a MapRenderer,
    attempt: u64,
    armed: bool,
}

impl InitializingGuard<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InitializingGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        let mut inner = self.renderer.lock();
        if inner.status == MapStatus::Initializing && inner.attempt == self.attempt {
            debug!("🗺️ Initializing map... cancelled");
            inner.status = MapStatus::Uninitialized;
        }
    }
}
