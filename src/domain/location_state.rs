use crate::domain::Coordinate;
use crate::geolocation::GeolocationError;

#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum LocationStatus {
    #[default]
    Idle,
    Acquiring,
    Acquired,
    Failed,
}

#[derive(Clone, PartialEq, Debug, Default)]
pub struct LocationState {
    pub user_coordinate: Option<Coordinate>,
    pub distance_km: Option<f64>,
    pub error: Option<GeolocationError>,
    pub status: LocationStatus,
}

impl LocationState {
    pub fn acquiring(&self) -> Self {
        LocationState {
            error: None,
            status: LocationStatus::Acquiring,
            ..self.clone()
        }
    }

    pub fn acquired(coordinate: Coordinate, distance_km: f64) -> Self {
        LocationState {
            user_coordinate: Some(coordinate),
            distance_km: Some(distance_km),
            error: None,
            status: LocationStatus::Acquired,
        }
    }

    pub fn failed(error: GeolocationError) -> Self {
        LocationState {
            user_coordinate: None,
            distance_km: None,
            error: Some(error),
            status: LocationStatus::Failed,
        }
    }
}
