use thiserror::Error;

#[derive(Error, Clone, Copy, PartialEq, Eq, Debug)]
pub enum GeolocationError {
    #[error("permission to read the location was denied")]
    PermissionDenied,
    #[error("the location is unavailable")]
    PositionUnavailable,
    #[error("timed out while reading the location")]
    Timeout,
    #[error("geolocation is not supported by this host")]
    Unsupported,
    #[error("geolocation requires a secure context (https or localhost)")]
    InsecureContext,
}

impl GeolocationError {
    /// A message that tells the visitor what to do about the failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            GeolocationError::PermissionDenied => "Location access was denied. Allow location access in your browser settings and try again.",
            GeolocationError::PositionUnavailable => "Your location could not be determined. Check that location services are enabled and try again.",
            GeolocationError::Timeout => "Finding your location took too long. Move to an area with a better signal and try again.",
            GeolocationError::Unsupported => "Your browser does not support geolocation. Try a different browser.",
            GeolocationError::InsecureContext => "Location is only available over a secure connection. Open this page over https.",
        }
    }

    pub fn is_retryable(&self) -> bool {
        !matches!(self, GeolocationError::Unsupported | GeolocationError::InsecureContext)
    }
}

/// Failures a host can report for a single position request.
#[derive(Error, Clone, Copy, PartialEq, Eq, Debug)]
pub enum PositionError {
    #[error("permission denied")]
    PermissionDenied,
    #[error("position unavailable")]
    PositionUnavailable,
    #[error("timeout")]
    Timeout,
}

impl From<PositionError> for GeolocationError {
    fn from(error: PositionError) -> Self {
        match error {
            PositionError::PermissionDenied => GeolocationError::PermissionDenied,
            PositionError::PositionUnavailable => GeolocationError::PositionUnavailable,
            PositionError::Timeout => GeolocationError::Timeout,
        }
    }
}
