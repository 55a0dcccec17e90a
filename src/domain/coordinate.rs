use std::fmt::{Display, Formatter};
use thiserror::Error;

/// A WGS84 position in decimal degrees.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::Latitude(latitude));
        }

        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::Longitude(longitude));
        }

        Ok(Coordinate { latitude, longitude })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}°, {:.4}°", self.latitude, self.longitude)
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum CoordinateError {
    #[error("invalid latitude: {0}, must be between -90 and 90")]
    Latitude(f64),
    #[error("invalid longitude: {0}, must be between -180 and 180")]
    Longitude(f64),
}
