use thiserror::Error;

#[derive(Error, Clone, PartialEq, Debug)]
pub enum MapError {
    #[error("no container to render the map into")]
    MissingContainer,
    #[error("container '{0}' is already bound to a map")]
    ContainerInUse(String),
    #[error("map library failed to load: {0}")]
    LibraryLoad(String),
    #[error("map surface error: {0}")]
    Surface(String),
}
