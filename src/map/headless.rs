use crate::domain::{Bounds, Coordinate, TileServer};
use crate::map::{LayerId, LineStyle, MapContainer, MapError, MapLibrary, MapSurface, MarkerSpec, SurfaceEvent, SurfaceId, ViewState};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};

/// A map library without a display. Layers are kept in memory and tile servers are
/// probed over HTTP so tile failures surface the same way they would in a browser.
#[derive(Debug)]
pub struct HeadlessMapLibrary {
    client: Client,
    next_surface: AtomicU64,
}

impl HeadlessMapLibrary {
    pub fn new(client: Client) -> Self {
        HeadlessMapLibrary {
            client,
            next_surface: AtomicU64::new(1),
        }
    }
}

#[async_trait]
impl MapLibrary for HeadlessMapLibrary {
    /// Tile probes run as tasks, so the library is only usable inside a tokio runtime.
    async fn load(&self) -> Result<(), MapError> {
        Handle::try_current().map(|_| ()).map_err(|e| MapError::LibraryLoad(e.to_string()))
    }

    fn create_surface(
        &self,
        container: &MapContainer,
        view: &ViewState,
        events: UnboundedSender<SurfaceEvent>,
    ) -> Result<Box<dyn MapSurface>, MapError> {
        let id = self.next_surface.fetch_add(1, Ordering::SeqCst);
        container.bind(id)?;
        debug!(surface = id, "Created headless map in '{}' centered on {}", container.id(), view.center);

        Ok(Box::new(HeadlessSurface {
            id,
            client: self.client.clone(),
            events,
            next_layer: 0,
            layers: HashMap::new(),
        }))
    }
}

#[derive(Debug)]
enum Layer {
    Tiles(String),
    Marker(MarkerSpec),
    Polyline(usize),
}

impl Layer {
    fn describe(&self) -> String {
        match self {
            Layer::Tiles(name) => format!("tile layer '{}'", name),
            Layer::Marker(marker) => format!("{:?} marker at {}", marker.kind, marker.position),
            Layer::Polyline(points) => format!("polyline with {} points", points),
        }
    }
}

#[derive(Debug)]
pub struct HeadlessSurface {
    id: SurfaceId,
    client: Client,
    events: UnboundedSender<SurfaceEvent>,
    next_layer: u64,
    layers: HashMap<LayerId, Layer>,
}

impl HeadlessSurface {
    fn insert(&mut self, layer: Layer) -> LayerId {
        self.next_layer += 1;
        let id = LayerId(self.next_layer);
        self.layers.insert(id, layer);
        id
    }
}

impl MapSurface for HeadlessSurface {
    fn id(&self) -> SurfaceId {
        self.id
    }

    fn add_tile_layer(&mut self, server: &TileServer, _max_zoom: u8) -> Result<LayerId, MapError> {
        let runtime = Handle::try_current().map_err(|e| MapError::Surface(e.to_string()))?;
        let layer = self.insert(Layer::Tiles(server.name.clone()));

        let client = self.client.clone();
        let events = self.events.clone();
        let url = server.tile_url(0, 0, 0);
        runtime.spawn(async move {
            let event = match client.get(&url).send().await.and_then(|response| response.error_for_status()) {
                Ok(_) => SurfaceEvent::TileLoaded { layer },
                Err(e) => {
                    debug!("🧱 Tile request to {} failed: {}", url, e);
                    SurfaceEvent::TileError { layer }
                }
            };
            let _ = events.send(event);
        });

        Ok(layer)
    }

    fn add_marker(&mut self, marker: &MarkerSpec) -> Result<LayerId, MapError> {
        debug!(kind = ?marker.kind, "📌 Marker at {}", marker.position);
        Ok(self.insert(Layer::Marker(marker.clone())))
    }

    fn add_polyline(&mut self, path: &[Coordinate], style: &LineStyle) -> Result<LayerId, MapError> {
        debug!(color = %style.color, dashed = style.dash_array.is_some(), "Polyline with {} points", path.len());
        Ok(self.insert(Layer::Polyline(path.len())))
    }

    fn remove_layer(&mut self, layer: LayerId) {
        if let Some(removed) = self.layers.remove(&layer) {
            debug!(layer = layer.0, "Removed {}", removed.describe());
        }
    }

    fn fit_bounds(&mut self, bounds: Bounds, padding_px: u32) {
        info!(
            padding_px,
            "🔭 Viewport fitted to [{:.4}, {:.4}] - [{:.4}, {:.4}]", bounds.south, bounds.west, bounds.north, bounds.east
        );
    }

    fn set_view(&mut self, view: ViewState) {
        info!(zoom = view.zoom, "🔭 Viewport centered on {}", view.center);
    }

    fn remove(&mut self) {
        debug!(surface = self.id, "Removing headless map with {} layer(s)", self.layers.len());
        self.layers.clear();
    }
}
