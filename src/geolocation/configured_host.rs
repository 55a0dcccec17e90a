use crate::app_config::Host;
use crate::domain::Coordinate;
use crate::geolocation::{GeolocationHost, PositionError, PositionOptions};
use async_trait::async_trait;
use tracing::debug;

/// A host whose position is fixed by configuration, for running the widget outside a browser.
#[derive(Debug)]
pub struct ConfiguredHost {
    origin: String,
    supported: bool,
    permission_granted: bool,
    position: Option<Coordinate>,
}

impl ConfiguredHost {
    pub fn new(config: &Host) -> Self {
        ConfiguredHost {
            origin: config.origin().to_string(),
            supported: config.supported(),
            permission_granted: config.permission_granted(),
            position: config.position(),
        }
    }
}

#[async_trait]
impl GeolocationHost for ConfiguredHost {
    fn supports_geolocation(&self) -> bool {
        self.supported
    }

    fn origin(&self) -> &str {
        &self.origin
    }

    async fn current_position(&self, options: &PositionOptions) -> Result<Coordinate, PositionError> {
        debug!(high_accuracy = options.high_accuracy, "Reading configured position");
        if !self.permission_granted {
            return Err(PositionError::PermissionDenied);
        }

        self.position.ok_or(PositionError::PositionUnavailable)
    }
}
