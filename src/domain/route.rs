use crate::domain::Coordinate;
use std::fmt::{Display, Formatter};

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum SourceMode {
    /// Path returned by the routing service.
    Routed,
    /// Straight line between the two endpoints.
    Fallback,
}

impl Display for SourceMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceMode::Routed => write!(f, "routed"),
            SourceMode::Fallback => write!(f, "fallback"),
        }
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct RouteResult {
    pub path: Vec<Coordinate>,
    pub source_mode: SourceMode,
}

impl RouteResult {
    pub fn routed(path: Vec<Coordinate>) -> Self {
        RouteResult {
            path,
            source_mode: SourceMode::Routed,
        }
    }

    pub fn fallback(from: Coordinate, to: Coordinate) -> Self {
        RouteResult {
            path: vec![from, to],
            source_mode: SourceMode::Fallback,
        }
    }
}
