use crate::domain::Coordinate;
use crate::geolocation::{GeolocationHost, PositionError, PositionOptions};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Debug)]
pub struct FakeHost {
    pub supported: bool,
    pub origin: String,
    pub result: Result<Coordinate, PositionError>,
    pub delay: Duration,
    pub requests: AtomicUsize,
}

impl FakeHost {
    pub fn returning(result: Result<Coordinate, PositionError>) -> Self {
        FakeHost {
            supported: true,
            origin: "https://portfolio.example".to_string(),
            result,
            delay: Duration::ZERO,
            requests: AtomicUsize::new(0),
        }
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GeolocationHost for FakeHost {
    fn supports_geolocation(&self) -> bool {
        self.supported
    }

    fn origin(&self) -> &str {
        &self.origin
    }

    async fn current_position(&self, _options: &PositionOptions) -> Result<Coordinate, PositionError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.result
    }
}
