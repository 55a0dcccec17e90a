use crate::domain::Coordinate;
use crate::geolocation::PositionError;
use async_trait::async_trait;
use serde::Deserialize;
use std::fmt::Debug;
use std::time::Duration;

#[derive(Clone, PartialEq, Debug, Deserialize)]
pub struct PositionOptions {
    pub high_accuracy: bool,
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    /// How old a previously acquired position may be and still be returned.
    #[serde(with = "humantime_serde")]
    pub maximum_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        PositionOptions {
            high_accuracy: true,
            timeout: Duration::from_secs(15),
            maximum_age: Duration::from_secs(5 * 60),
        }
    }
}

/// The environment that owns the positioning hardware, usually a browser.
#[async_trait]
pub trait GeolocationHost: Debug + Send + Sync {
    fn supports_geolocation(&self) -> bool;

    /// The origin the widget is served from, e.g. `https://example.com`.
    fn origin(&self) -> &str;

    /// Requests a single position. May prompt the user for permission.
    async fn current_position(&self, options: &PositionOptions) -> Result<Coordinate, PositionError>;
}
