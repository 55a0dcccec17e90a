use crate::domain::{Bounds, Coordinate, TileServer};
use crate::map::{MapContainer, MapError};
use async_trait::async_trait;
use std::fmt::Debug;
use tokio::sync::mpsc::UnboundedSender;

pub type SurfaceId = u64;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct LayerId(pub u64);

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct ViewState {
    pub center: Coordinate,
    pub zoom: u8,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MarkerKind {
    Reference,
    User,
}

#[derive(Clone, PartialEq, Debug)]
pub struct MarkerSpec {
    pub kind: MarkerKind,
    pub position: Coordinate,
    pub popup: String,
    pub z_index_offset: i32,
}

#[derive(Clone, PartialEq, Debug)]
pub struct LineStyle {
    pub color: String,
    pub weight: u32,
    pub opacity: f64,
    pub dash_array: Option<String>,
}

/// Asynchronous notifications a surface reports back to its renderer.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum SurfaceEvent {
    TileLoaded { layer: LayerId },
    TileError { layer: LayerId },
}

/// A live map bound to one container. Only the renderer mutates it.
pub trait MapSurface: Debug + Send {
    fn id(&self) -> SurfaceId;

    fn add_tile_layer(&mut self, server: &TileServer, max_zoom: u8) -> Result<LayerId, MapError>;

    fn add_marker(&mut self, marker: &MarkerSpec) -> Result<LayerId, MapError>;

    fn add_polyline(&mut self, path: &[Coordinate], style: &LineStyle) -> Result<LayerId, MapError>;

    fn remove_layer(&mut self, layer: LayerId);

    fn fit_bounds(&mut self, bounds: Bounds, padding_px: u32);

    fn set_view(&mut self, view: ViewState);

    /// Removes the map and all of its event listeners from the container.
    fn remove(&mut self);
}

/// The mapping library, handed to each renderer instead of living in a global.
#[async_trait]
pub trait MapLibrary: Debug + Send + Sync {
    async fn load(&self) -> Result<(), MapError>;

    fn create_surface(
        &self,
        container: &MapContainer,
        view: &ViewState,
        events: UnboundedSender<SurfaceEvent>,
    ) -> Result<Box<dyn MapSurface>, MapError>;
}
