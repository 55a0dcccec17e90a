mod bounds;
mod coordinate;
mod language;
mod location_state;
mod route;
mod tile_server;

pub use bounds::Bounds;
pub use coordinate::{Coordinate, CoordinateError};
pub use language::Language;
pub use location_state::{LocationState, LocationStatus};
pub use route::{RouteResult, SourceMode};
pub use tile_server::TileServer;
