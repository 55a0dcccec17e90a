use crate::domain::Coordinate;
use crate::geolocation::{GeolocationError, GeolocationHost, PositionOptions};
use reqwest::Url;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::time::{Instant, timeout};
use tracing::{debug, info, instrument, warn};

#[derive(Debug)]
pub struct GeolocationAcquirer {
    host: Arc<dyn GeolocationHost>,
    defaults: PositionOptions,
    cached: Mutex<Option<CachedPosition>>,
}

#[derive(Clone, Copy, Debug)]
struct CachedPosition {
    coordinate: Coordinate,
    acquired_at: Instant,
}

impl GeolocationAcquirer {
    pub fn new(host: Arc<dyn GeolocationHost>, defaults: PositionOptions) -> Self {
        GeolocationAcquirer {
            host,
            defaults,
            cached: Mutex::new(None),
        }
    }

    pub fn defaults(&self) -> &PositionOptions {
        &self.defaults
    }

    pub async fn acquire(&self, high_accuracy: bool, timeout: Duration) -> Result<Coordinate, GeolocationError> {
        let options = PositionOptions {
            high_accuracy,
            timeout,
            ..self.defaults.clone()
        };
        self.acquire_with(&options).await
    }

    #[instrument(skip(self))]
    pub async fn acquire_with(&self, options: &PositionOptions) -> Result<Coordinate, GeolocationError> {
        if !self.host.supports_geolocation() {
            warn!("📍 Acquiring location... failed, geolocation is not supported");
            return Err(GeolocationError::Unsupported);
        }

        if !is_secure_origin(self.host.origin()) {
            warn!(origin = self.host.origin(), "📍 Acquiring location... failed, insecure context");
            return Err(GeolocationError::InsecureContext);
        }

        if let Some(cached) = self.cached_position(options.maximum_age) {
            debug!("📍 Acquiring location... OK, cached position {}", cached);
            return Ok(cached);
        }

        info!("📍 Acquiring location...");
        let coordinate = match timeout(options.timeout, self.host.current_position(options)).await {
            Ok(Ok(coordinate)) => coordinate,
            Ok(Err(error)) => {
                warn!("📍 Acquiring location... failed, {}", error);
                return Err(error.into());
            }
            Err(_) => {
                warn!("📍 Acquiring location... failed, no position after {:?}", options.timeout);
                return Err(GeolocationError::Timeout);
            }
        };

        *self.cached.lock().unwrap_or_else(PoisonError::into_inner) = Some(CachedPosition {
            coordinate,
            acquired_at: Instant::now(),
        });
        info!("📍 Acquiring location... OK, {}", coordinate);

        Ok(coordinate)
    }

    fn cached_position(&self, maximum_age: Duration) -> Option<Coordinate> {
        let cached = (*self.cached.lock().unwrap_or_else(PoisonError::into_inner))?;
        (cached.acquired_at.elapsed() <= maximum_age && !maximum_age.is_zero()).then_some(cached.coordinate)
    }
}

/// Geolocation is only offered to pages served over https or from a loopback host.
pub fn is_secure_origin(origin: &str) -> bool {
    let Ok(url) = Url::parse(origin) else {
        return false;
    };

    if url.scheme() == "https" {
        return true;
    }

    match url.host_str() {
        Some(host) => is_loopback_host(host),
        None => false,
    }
}

fn is_loopback_host(host: &str) -> bool {
    if host == "localhost" || host.ends_with(".localhost") {
        return true;
    }

    if let Ok(ip) = host.parse::<Ipv4Addr>() {
        return ip.is_loopback();
    }

    host.trim_start_matches('[')
        .trim_end_matches(']')
        .parse::<Ipv6Addr>()
        .is_ok_and(|ip| ip.is_loopback())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geolocation::PositionError;
    use crate::geolocation::testing::FakeHost;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn jakarta() -> Coordinate {
        Coordinate::new(-6.2088, 106.8456).unwrap()
    }

    #[rstest]
    #[case::https("https://portfolio.example", true)]
    #[case::https_with_port("https://portfolio.example:8443/about", true)]
    #[case::localhost("http://localhost:3000", true)]
    #[case::sub_localhost("http://app.localhost", true)]
    #[case::ipv4_loopback("http://127.0.0.1:8080", true)]
    #[case::ipv4_loopback_range("http://127.1.2.3", true)]
    #[case::ipv6_loopback("http://[::1]:3000", true)]
    #[case::http("http://portfolio.example", false)]
    #[case::lan_address("http://192.168.1.10:3000", false)]
    #[case::garbage("not an origin", false)]
    fn is_secure_origin_accepts_https_and_loopback(#[case] origin: &str, #[case] expected: bool) {
        assert_eq!(is_secure_origin(origin), expected);
    }

    #[test_log::test(tokio::test)]
    async fn acquire_returns_the_host_position() {
        let host = Arc::new(FakeHost::returning(Ok(jakarta())));
        let acquirer = GeolocationAcquirer::new(host.clone(), PositionOptions::default());

        let result = acquirer.acquire(true, Duration::from_secs(15)).await;

        assert_eq!(result, Ok(jakarta()));
        assert_eq!(host.requests(), 1);
    }

    #[test_log::test(tokio::test)]
    async fn acquire_fails_fast_when_geolocation_is_unsupported() {
        let host = Arc::new(FakeHost {
            supported: false,
            ..FakeHost::returning(Ok(jakarta()))
        });
        let acquirer = GeolocationAcquirer::new(host.clone(), PositionOptions::default());

        assert_eq!(acquirer.acquire(true, Duration::from_secs(15)).await, Err(GeolocationError::Unsupported));
        assert_eq!(host.requests(), 0);
    }

    #[test_log::test(tokio::test)]
    async fn acquire_rejects_an_insecure_context_before_prompting() {
        let host = Arc::new(FakeHost {
            origin: "http://portfolio.example".to_string(),
            ..FakeHost::returning(Ok(jakarta()))
        });
        let acquirer = GeolocationAcquirer::new(host.clone(), PositionOptions::default());

        assert_eq!(acquirer.acquire(true, Duration::from_secs(15)).await, Err(GeolocationError::InsecureContext));
        assert_eq!(host.requests(), 0);
    }

    #[rstest]
    #[case::denied(PositionError::PermissionDenied, GeolocationError::PermissionDenied)]
    #[case::unavailable(PositionError::PositionUnavailable, GeolocationError::PositionUnavailable)]
    #[case::host_timeout(PositionError::Timeout, GeolocationError::Timeout)]
    #[tokio::test]
    async fn acquire_maps_host_failures(#[case] failure: PositionError, #[case] expected: GeolocationError) {
        let host = Arc::new(FakeHost::returning(Err(failure)));
        let acquirer = GeolocationAcquirer::new(host.clone(), PositionOptions::default());

        assert_eq!(acquirer.acquire(true, Duration::from_secs(15)).await, Err(expected));
        assert_eq!(host.requests(), 1);
    }

    #[test_log::test(tokio::test(start_paused = true))]
    async fn acquire_times_out_when_the_host_does_not_answer() {
        let host = Arc::new(FakeHost {
            delay: Duration::from_secs(60),
            ..FakeHost::returning(Ok(jakarta()))
        });
        let acquirer = GeolocationAcquirer::new(host.clone(), PositionOptions::default());

        assert_eq!(acquirer.acquire(true, Duration::from_secs(15)).await, Err(GeolocationError::Timeout));
    }

    #[test_log::test(tokio::test(start_paused = true))]
    async fn acquire_reuses_a_cached_position_within_the_maximum_age() {
        let host = Arc::new(FakeHost::returning(Ok(jakarta())));
        let acquirer = GeolocationAcquirer::new(host.clone(), PositionOptions::default());

        acquirer.acquire(true, Duration::from_secs(15)).await.unwrap();
        tokio::time::advance(Duration::from_secs(60)).await;
        acquirer.acquire(true, Duration::from_secs(15)).await.unwrap();
        assert_eq!(host.requests(), 1);

        tokio::time::advance(Duration::from_secs(5 * 60)).await;
        acquirer.acquire(true, Duration::from_secs(15)).await.unwrap();
        assert_eq!(host.requests(), 2);
    }

    #[test_log::test(tokio::test)]
    async fn acquire_does_not_cache_failures() {
        let host = Arc::new(FakeHost::returning(Err(PositionError::PositionUnavailable)));
        let acquirer = GeolocationAcquirer::new(host.clone(), PositionOptions::default());

        let _ = acquirer.acquire(true, Duration::from_secs(15)).await;
        let _ = acquirer.acquire(true, Duration::from_secs(15)).await;

        assert_eq!(host.requests(), 2);
    }

    #[test]
    fn only_context_failures_are_not_retryable() {
        assert!(GeolocationError::PermissionDenied.is_retryable());
        assert!(GeolocationError::Timeout.is_retryable());
        assert!(!GeolocationError::Unsupported.is_retryable());
        assert!(!GeolocationError::InsecureContext.is_retryable());
    }
}
