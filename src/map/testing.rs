use crate::domain::{Bounds, Coordinate, TileServer};
use crate::map::{
    LayerId, LineStyle, MapContainer, MapError, MapLibrary, MapRendererOptions, MapSurface, MarkerKind, MarkerSpec, SurfaceEvent,
    SurfaceId, ViewState,
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use tokio::sync::mpsc::UnboundedSender;

#[derive(Clone, PartialEq, Debug)]
pub enum Op {
    AddTile(String, LayerId),
    AddMarker(MarkerKind, LayerId),
    AddLine(Vec<Coordinate>, Option<String>, LayerId),
    RemoveLayer(LayerId),
    FitBounds(Bounds, u32),
    SetView(ViewState),
    Remove,
}

pub type OpLog = Arc<Mutex<Vec<(u64, Op)>>>;

#[derive(Debug)]
pub struct FakeSurface {
    id: SurfaceId,
    next_layer: u64,
    failing_tiles: Vec<String>,
    events: UnboundedSender<SurfaceEvent>,
    log: OpLog,
}

impl FakeSurface {
    fn record(&mut self, op: Op) {
        self.log.lock().unwrap().push((self.id, op));
    }

    fn next_layer(&mut self) -> LayerId {
        self.next_layer += 1;
        LayerId(self.next_layer)
    }
}

impl MapSurface for FakeSurface {
    fn id(&self) -> SurfaceId {
        self.id
    }

    fn add_tile_layer(&mut self, server: &TileServer, _max_zoom: u8) -> Result<LayerId, MapError> {
        let layer = self.next_layer();
        self.record(Op::AddTile(server.name.clone(), layer));

        let event = if self.failing_tiles.contains(&server.name) {
            SurfaceEvent::TileError { layer }
        } else {
            SurfaceEvent::TileLoaded { layer }
        };
        let _ = self.events.send(event);

        Ok(layer)
    }

    fn add_marker(&mut self, marker: &MarkerSpec) -> Result<LayerId, MapError> {
        let layer = self.next_layer();
        self.record(Op::AddMarker(marker.kind, layer));
        Ok(layer)
    }

    fn add_polyline(&mut self, path: &[Coordinate], style: &LineStyle) -> Result<LayerId, MapError> {
        let layer = self.next_layer();
        self.record(Op::AddLine(path.to_vec(), style.dash_array.clone(), layer));
        Ok(layer)
    }

    fn remove_layer(&mut self, layer: LayerId) {
        self.record(Op::RemoveLayer(layer));
    }

    fn fit_bounds(&mut self, bounds: Bounds, padding_px: u32) {
        self.record(Op::FitBounds(bounds, padding_px));
    }

    fn set_view(&mut self, view: ViewState) {
        self.record(Op::SetView(view));
    }

    fn remove(&mut self) {
        self.record(Op::Remove);
    }
}

#[derive(Debug, Default)]
pub struct FakeLibrary {
    pub loads: AtomicUsize,
    pub next_surface: AtomicU64,
    pub fail_load: bool,
    pub gate: Option<Arc<Notify>>,
    pub failing_tiles: Vec<String>,
    pub log: OpLog,
}

impl FakeLibrary {
    pub fn ops(&self, surface: SurfaceId) -> Vec<Op> {
        self.log.lock().unwrap().iter().filter(|(id, _)| *id == surface).map(|(_, op)| op.clone()).collect()
    }

    pub fn surfaces_created(&self) -> u64 {
        self.next_surface.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MapLibrary for FakeLibrary {
    async fn load(&self) -> Result<(), MapError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        if self.fail_load {
            Err(MapError::LibraryLoad("network error".to_string()))
        } else {
            Ok(())
        }
    }

    fn create_surface(
        &self,
        container: &MapContainer,
        _view: &ViewState,
        events: UnboundedSender<SurfaceEvent>,
    ) -> Result<Box<dyn MapSurface>, MapError> {
        let id = self.next_surface.fetch_add(1, Ordering::SeqCst) + 1;
        container.bind(id)?;

        Ok(Box::new(FakeSurface {
            id,
            next_layer: 0,
            failing_tiles: self.failing_tiles.clone(),
            events,
            log: self.log.clone(),
        }))
    }
}

pub fn tile_server(name: &str) -> TileServer {
    TileServer {
        name: name.to_string(),
        url: format!("https://{}/{{z}}/{{x}}/{{y}}.png", name),
        attribution: name.to_string(),
    }
}

pub fn options(tiles: &[&str]) -> MapRendererOptions {
    MapRendererOptions {
        reference: bogor(),
        reference_label: "Bogor, Indonesia".to_string(),
        reference_region: "West Java Province".to_string(),
        zoom: 11,
        tiles: tiles.iter().map(|name| tile_server(name)).collect(),
        max_zoom: 19,
        fit_padding_px: 60,
    }
}

pub fn bogor() -> Coordinate {
    Coordinate::new(-6.5944, 106.7886).unwrap()
}

pub fn jakarta() -> Coordinate {
    Coordinate::new(-6.2088, 106.8456).unwrap()
}

pub async fn eventually(condition: impl Fn() -> bool) {
    for _ in 0..100 {
        if condition() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition was not met");
}
