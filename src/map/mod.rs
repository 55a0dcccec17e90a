mod container;
mod error;
mod headless;
mod renderer;
mod styles;
mod surface;
#[cfg(test)]
pub(crate) mod testing;

pub use container::MapContainer;
pub use error::MapError;
pub use headless::HeadlessMapLibrary;
pub use renderer::{MapRenderer, MapRendererOptions, MapStatus, Placeholder};
pub use surface::{LayerId, LineStyle, MapLibrary, MapSurface, MarkerKind, MarkerSpec, SurfaceEvent, SurfaceId, ViewState};
