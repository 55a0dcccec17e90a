use crate::domain::{Coordinate, RouteResult};
use async_trait::async_trait;
use std::fmt::Debug;

/// Resolves a path between two coordinates. Implementations never fail; they fall back to a
/// straight line instead.
#[async_trait]
pub trait RoutingService: Debug + Send + Sync {
    async fn resolve_route(&self, from: Coordinate, to: Coordinate) -> RouteResult;
}
