mod osrm;
mod service;

pub use osrm::OsrmRouter;
pub use service::RoutingService;
