mod acquirer;
mod configured_host;
mod error;
mod host;
#[cfg(test)]
pub(crate) mod testing;

pub use acquirer::GeolocationAcquirer;
pub use configured_host::ConfiguredHost;
pub use error::{GeolocationError, PositionError};
pub use host::{GeolocationHost, PositionOptions};
