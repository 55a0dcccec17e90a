use crate::domain::Coordinate;
use serde::de::Error;
use serde::{Deserialize, Deserializer};

impl<'de> Deserialize<'de> for Coordinate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Debug, Deserialize)]
        pub struct Inner {
            latitude: f64,
            longitude: f64,
        }

        let inner = Inner::deserialize(deserializer)?;
        Coordinate::new(inner.latitude, inner.longitude).map_err(|e| Error::custom(format!("invalid location {}", e)))
    }
}
